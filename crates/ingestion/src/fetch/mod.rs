//! Fetching a scene's selected bands as one geolocated raster.
//!
//! [`SceneFetcher`] is the pluggable fetch strategy used by the pipeline.
//! The default is [`FallbackFetcher`], which reads from a primary
//! [`BandSource`] and falls back to a secondary one on any failure.

mod geotiff;
mod sources;

pub use geotiff::{decode_band, GeoTiffBand};
pub use sources::{BandSource, HttpBandSource, ObjectStoreBandSource};

use async_trait::async_trait;
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, instrument};

use etl_common::SceneDescriptor;
use raster::{MultibandTile, ProjectedRaster, Raster};

use crate::config::{JobOptions, SourceConfig};
use crate::error::FetchError;

/// Relative tolerance when checking that bands share an extent.
const EXTENT_TOLERANCE: f64 = 1e-9;

/// What fetching one scene produced.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// The scene's bands, in their native CRS, and where they came from.
    Fetched {
        raster: ProjectedRaster,
        source: String,
    },
    /// Nothing could be read; one reason per source tried.
    NoData { reasons: Vec<String> },
}

impl FetchOutcome {
    pub fn into_raster(self) -> Option<ProjectedRaster> {
        match self {
            FetchOutcome::Fetched { raster, .. } => Some(raster),
            FetchOutcome::NoData { .. } => None,
        }
    }
}

/// Given a scene and job options, produce the scene's raster or nothing.
///
/// Failures are never raised: a scene that cannot be read is "no data".
#[async_trait]
pub trait SceneFetcher: Send + Sync {
    /// Fetch a scene, reporting where it came from or why it could not be
    /// read.
    async fn fetch_outcome(&self, scene: &SceneDescriptor, options: &JobOptions) -> FetchOutcome;

    /// Fetch a scene's selected bands as one raster in its native CRS.
    async fn fetch(&self, scene: &SceneDescriptor, options: &JobOptions) -> Option<ProjectedRaster> {
        self.fetch_outcome(scene, options).await.into_raster()
    }
}

/// Read every selected band of a scene from one source and stack them.
///
/// Each band file is passed to the job's cache hook before decoding.
#[instrument(skip(source, scene, options), fields(source = source.name(), scene = %scene.scene_id))]
pub async fn read_scene(
    source: &dyn BandSource,
    scene: &SceneDescriptor,
    options: &JobOptions,
) -> Result<ProjectedRaster, FetchError> {
    if options.bands.is_empty() {
        return Err(FetchError::NoBands);
    }

    let bands = try_join_all(options.bands.iter().map(|&band| async move {
        let location = source.locate(scene, band)?;
        let bytes = source.read(&location).await?;

        if let Some(hook) = &options.cache_hook {
            hook.store(&location, bytes.clone()).await;
        }

        let decoded = tokio::task::spawn_blocking(move || decode_band(&bytes))
            .await
            .map_err(|e| FetchError::Task(e.to_string()))??;
        Ok::<_, FetchError>(decoded)
    }))
    .await?;

    let raster = stack_bands(&options.bands, bands)?;
    debug!(
        cols = raster.raster.cols(),
        rows = raster.raster.rows(),
        crs = %raster.crs,
        "Read scene"
    );
    Ok(raster)
}

/// Stack decoded bands, checking they describe the same grid.
fn stack_bands(numbers: &[u8], bands: Vec<GeoTiffBand>) -> Result<ProjectedRaster, FetchError> {
    let first = bands.first().ok_or(FetchError::NoBands)?;
    let (extent, crs) = (first.extent, first.crs);
    let tolerance = EXTENT_TOLERANCE * extent.width().max(extent.height());

    for (number, band) in numbers.iter().zip(&bands).skip(1) {
        if band.crs != crs {
            return Err(FetchError::BandMismatch(format!(
                "band {} is in {}, band {} in {}",
                number, band.crs, numbers[0], crs
            )));
        }
        let offsets = [
            band.extent.min_x - extent.min_x,
            band.extent.min_y - extent.min_y,
            band.extent.max_x - extent.max_x,
            band.extent.max_y - extent.max_y,
        ];
        if offsets.iter().any(|d| d.abs() > tolerance) {
            return Err(FetchError::BandMismatch(format!(
                "band {} covers {:?}, band {} covers {:?}",
                number, band.extent, numbers[0], extent
            )));
        }
    }

    let tile = MultibandTile::new(bands.into_iter().map(|b| b.tile).collect())
        .map_err(|e| FetchError::BandMismatch(e.to_string()))?;
    Ok(ProjectedRaster::new(Raster::new(tile, extent), crs))
}

/// Reads every scene from a single source.
pub struct SourceFetcher {
    source: Arc<dyn BandSource>,
}

impl SourceFetcher {
    pub fn new(source: Arc<dyn BandSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl SceneFetcher for SourceFetcher {
    async fn fetch_outcome(&self, scene: &SceneDescriptor, options: &JobOptions) -> FetchOutcome {
        match read_scene(self.source.as_ref(), scene, options).await {
            Ok(raster) => FetchOutcome::Fetched {
                raster,
                source: self.source.name().to_string(),
            },
            Err(e) => {
                debug!(scene = %scene.scene_id, source = self.source.name(), error = %e, "Scene fetch failed");
                FetchOutcome::NoData {
                    reasons: vec![format!("{}: {}", self.source.name(), e)],
                }
            }
        }
    }
}

/// Primary source first; on any failure, the secondary.
///
/// Failures are only logged at debug level; the reasons travel with
/// [`FetchOutcome::NoData`] to whoever reports dropped scenes.
pub struct FallbackFetcher {
    primary: Arc<dyn BandSource>,
    secondary: Arc<dyn BandSource>,
}

impl FallbackFetcher {
    pub fn new(primary: Arc<dyn BandSource>, secondary: Arc<dyn BandSource>) -> Self {
        Self { primary, secondary }
    }

    /// The public Landsat bucket as primary and the HTTP mirror as
    /// secondary, as configured.
    pub fn from_config(config: &SourceConfig) -> Result<Self, FetchError> {
        Ok(Self::new(
            Arc::new(ObjectStoreBandSource::from_config(config)?),
            Arc::new(HttpBandSource::from_config(config)?),
        ))
    }
}

#[async_trait]
impl SceneFetcher for FallbackFetcher {
    async fn fetch_outcome(&self, scene: &SceneDescriptor, options: &JobOptions) -> FetchOutcome {
        let primary_err = match read_scene(self.primary.as_ref(), scene, options).await {
            Ok(raster) => {
                return FetchOutcome::Fetched {
                    raster,
                    source: self.primary.name().to_string(),
                }
            }
            Err(e) => e,
        };
        debug!(
            scene = %scene.scene_id,
            source = self.primary.name(),
            error = %primary_err,
            "Primary source failed, trying secondary"
        );

        match read_scene(self.secondary.as_ref(), scene, options).await {
            Ok(raster) => FetchOutcome::Fetched {
                raster,
                source: self.secondary.name().to_string(),
            },
            Err(secondary_err) => {
                debug!(
                    scene = %scene.scene_id,
                    source = self.secondary.name(),
                    error = %secondary_err,
                    "Secondary source failed, scene has no data"
                );
                FetchOutcome::NoData {
                    reasons: vec![
                        format!("{}: {}", self.primary.name(), primary_err),
                        format!("{}: {}", self.secondary.name(), secondary_err),
                    ],
                }
            }
        }
    }
}

/// Adapts a plain function into a [`SceneFetcher`].
///
/// The function runs on the blocking pool, so it may do synchronous I/O. A
/// panic inside it counts as no data.
pub struct FnFetcher<F> {
    name: String,
    f: Arc<F>,
}

impl<F> FnFetcher<F>
where
    F: Fn(&SceneDescriptor, &JobOptions) -> Option<ProjectedRaster> + Send + Sync + 'static,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f: Arc::new(f),
        }
    }
}

#[async_trait]
impl<F> SceneFetcher for FnFetcher<F>
where
    F: Fn(&SceneDescriptor, &JobOptions) -> Option<ProjectedRaster> + Send + Sync + 'static,
{
    async fn fetch_outcome(&self, scene: &SceneDescriptor, options: &JobOptions) -> FetchOutcome {
        let f = self.f.clone();
        let (scene, options) = (scene.clone(), options.clone());

        match tokio::task::spawn_blocking(move || f(&scene, &options)).await {
            Ok(Some(raster)) => FetchOutcome::Fetched {
                raster,
                source: self.name.clone(),
            },
            Ok(None) => FetchOutcome::NoData {
                reasons: vec![format!("{}: no data", self.name)],
            },
            Err(e) => FetchOutcome::NoData {
                reasons: vec![format!("{}: {}", self.name, e)],
            },
        }
    }
}
