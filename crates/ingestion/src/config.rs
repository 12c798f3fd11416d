//! Job configuration and scene batches.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use etl_common::{CrsCode, SceneDescriptor};
use raster::ResampleMethod;
use storage::{CacheHook, ObjectStorageConfig};

use crate::error::{IngestionError, Result};

/// Red, green, blue.
pub const DEFAULT_BANDS: [u8; 3] = [4, 3, 2];

pub const DEFAULT_MAX_ZOOM: u32 = 13;

/// Landsat 8 OLI/TIRS band files are numbered 1 to 11.
pub const MAX_BAND: u8 = 11;

/// Options shared by every scene of an ingestion job.
#[derive(Clone)]
pub struct JobOptions {
    /// Spectral bands to read, in output band order
    pub bands: Vec<u8>,
    /// Invoked with every band file successfully retrieved
    pub cache_hook: Option<Arc<dyn CacheHook>>,
    /// Zoom level of the destination layout
    pub max_zoom: u32,
    /// Destination CRS
    pub crs: CrsCode,
    /// Resampling used when reprojecting
    pub resample: ResampleMethod,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            bands: DEFAULT_BANDS.to_vec(),
            cache_hook: None,
            max_zoom: DEFAULT_MAX_ZOOM,
            crs: CrsCode::default(),
            resample: ResampleMethod::default(),
        }
    }
}

impl fmt::Debug for JobOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobOptions")
            .field("bands", &self.bands)
            .field("cache_hook", &self.cache_hook.is_some())
            .field("max_zoom", &self.max_zoom)
            .field("crs", &self.crs)
            .field("resample", &self.resample)
            .finish()
    }
}

impl JobOptions {
    /// Load options from environment variables, keeping defaults for
    /// anything unset or unparseable.
    pub fn from_env() -> Self {
        let mut options = Self::default();

        if let Ok(val) = std::env::var("LANDSAT_BANDS") {
            if let Ok(bands) = parse_bands(&val) {
                options.bands = bands;
            }
        }

        if let Ok(val) = std::env::var("LANDSAT_MAX_ZOOM") {
            if let Ok(zoom) = val.parse() {
                options.max_zoom = zoom;
            }
        }

        if let Ok(val) = std::env::var("LANDSAT_TARGET_CRS") {
            if let Ok(crs) = val.parse() {
                options.crs = crs;
            }
        }

        if let Ok(val) = std::env::var("LANDSAT_RESAMPLE") {
            if let Ok(method) = val.parse() {
                options.resample = method;
            }
        }

        options
    }

    pub fn with_bands(mut self, bands: impl Into<Vec<u8>>) -> Self {
        self.bands = bands.into();
        self
    }

    pub fn with_cache_hook(mut self, hook: Arc<dyn CacheHook>) -> Self {
        self.cache_hook = Some(hook);
        self
    }

    pub fn with_max_zoom(mut self, zoom: u32) -> Self {
        self.max_zoom = zoom;
        self
    }

    pub fn with_crs(mut self, crs: CrsCode) -> Self {
        self.crs = crs;
        self
    }

    pub fn with_resample(mut self, method: ResampleMethod) -> Self {
        self.resample = method;
        self
    }

    /// Validate the options.
    pub fn validate(&self) -> Result<()> {
        if self.bands.is_empty() {
            return Err(IngestionError::InvalidConfig(
                "at least one band must be selected".to_string(),
            ));
        }
        if let Some(band) = self.bands.iter().find(|&&b| b == 0 || b > MAX_BAND) {
            return Err(IngestionError::InvalidConfig(format!(
                "band {} is outside 1..={}",
                band, MAX_BAND
            )));
        }
        Ok(())
    }
}

/// Parse a comma separated band list such as `4,3,2`.
pub fn parse_bands(s: &str) -> Result<Vec<u8>> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u8>()
                .map_err(|_| IngestionError::InvalidConfig(format!("invalid band: {}", part)))
        })
        .collect()
}

/// Where band files are read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Primary bucket
    pub storage: ObjectStorageConfig,
    /// Key prefix of the Landsat 8 layout in the bucket
    pub prefix: String,
    /// Base URL of the secondary HTTP provider
    pub http_base_url: String,
    /// Per-request timeout of the secondary provider
    pub http_timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            storage: ObjectStorageConfig::default(),
            prefix: "L8".to_string(),
            http_base_url: "https://storage.googleapis.com/gcp-public-data-landsat/LC08/01"
                .to_string(),
            http_timeout_secs: 300,
        }
    }
}

impl SourceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self {
            storage: ObjectStorageConfig::from_env(),
            ..Self::default()
        };

        if let Ok(val) = std::env::var("LANDSAT_S3_PREFIX") {
            config.prefix = val;
        }

        if let Ok(val) = std::env::var("LANDSAT_HTTP_BASE_URL") {
            config.http_base_url = val;
        }

        if let Ok(val) = std::env::var("LANDSAT_HTTP_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                config.http_timeout_secs = secs;
            }
        }

        config
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

/// An immutable list of scenes to ingest.
///
/// Cloning shares the underlying list.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneBatch {
    scenes: Arc<[SceneDescriptor]>,
}

impl SceneBatch {
    pub fn new(scenes: Vec<SceneDescriptor>) -> Self {
        Self {
            scenes: scenes.into(),
        }
    }

    /// Parse a JSON array of scene descriptors.
    pub fn from_json(s: &str) -> Result<Self> {
        let scenes: Vec<SceneDescriptor> =
            serde_json::from_str(s).map_err(|e| IngestionError::CatalogParse(e.to_string()))?;
        Ok(Self::new(scenes))
    }

    /// Parse a YAML sequence of scene descriptors.
    pub fn from_yaml(s: &str) -> Result<Self> {
        let scenes: Vec<SceneDescriptor> =
            serde_yaml::from_str(s).map_err(|e| IngestionError::CatalogParse(e.to_string()))?;
        Ok(Self::new(scenes))
    }

    /// Load a catalog file, YAML for `.yaml`/`.yml` and JSON otherwise.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&contents),
            _ => Self::from_json(&contents),
        }
    }

    pub fn scenes(&self) -> &[SceneDescriptor] {
        &self.scenes
    }
}

impl Default for SceneBatch {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Deref for SceneBatch {
    type Target = [SceneDescriptor];

    fn deref(&self) -> &Self::Target {
        &self.scenes
    }
}

impl From<Vec<SceneDescriptor>> for SceneBatch {
    fn from(scenes: Vec<SceneDescriptor>) -> Self {
        Self::new(scenes)
    }
}

impl FromIterator<SceneDescriptor> for SceneBatch {
    fn from_iter<I: IntoIterator<Item = SceneDescriptor>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl FromStr for SceneBatch {
    type Err = IngestionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_json(s)
    }
}
