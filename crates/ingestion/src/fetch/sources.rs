//! Places a scene's band files can be read from.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use etl_common::SceneDescriptor;
use storage::{ObjectStorage, StoragePath};

use crate::config::SourceConfig;
use crate::error::FetchError;

/// A store of per-band GeoTIFF files.
#[async_trait]
pub trait BandSource: Send + Sync {
    /// Short description used in logs and reports.
    fn name(&self) -> &str;

    /// Object key or URL of one band file of a scene.
    fn locate(&self, scene: &SceneDescriptor, band: u8) -> Result<String, FetchError>;

    /// Read a file previously located with [`locate`](Self::locate).
    async fn read(&self, location: &str) -> Result<Bytes, FetchError>;

    /// Read one band file of a scene.
    async fn get_band(&self, scene: &SceneDescriptor, band: u8) -> Result<Bytes, FetchError> {
        let location = self.locate(scene, band)?;
        self.read(&location).await
    }
}

/// Band files in an S3-compatible bucket using the public Landsat 8 layout.
pub struct ObjectStoreBandSource {
    storage: Arc<ObjectStorage>,
    prefix: String,
    name: String,
}

impl ObjectStoreBandSource {
    pub fn new(storage: Arc<ObjectStorage>, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let name = format!("s3://{}/{}", storage.bucket(), prefix);
        Self {
            storage,
            prefix,
            name,
        }
    }

    pub fn from_config(config: &SourceConfig) -> Result<Self, FetchError> {
        let storage = ObjectStorage::new(&config.storage)?;
        Ok(Self::new(Arc::new(storage), config.prefix.clone()))
    }
}

#[async_trait]
impl BandSource for ObjectStoreBandSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn locate(&self, scene: &SceneDescriptor, band: u8) -> Result<String, FetchError> {
        Ok(StoragePath::landsat_band(
            &self.prefix,
            scene.wrs_path()?,
            scene.wrs_row()?,
            &scene.scene_id,
            band,
        ))
    }

    async fn read(&self, location: &str) -> Result<Bytes, FetchError> {
        Ok(self.storage.get(location).await?)
    }
}

/// Band files served over HTTP in the Collection-1 layout, keyed by product
/// id when one is known.
pub struct HttpBandSource {
    client: Client,
    base_url: String,
}

impl HttpBandSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &SourceConfig) -> Result<Self, FetchError> {
        Self::new(config.http_base_url.clone(), config.http_timeout())
    }
}

#[async_trait]
impl BandSource for HttpBandSource {
    fn name(&self) -> &str {
        &self.base_url
    }

    fn locate(&self, scene: &SceneDescriptor, band: u8) -> Result<String, FetchError> {
        let id = scene.product_id.as_deref().unwrap_or(&scene.scene_id);
        Ok(format!(
            "{}/{:03}/{:03}/{}/{}_B{}.TIF",
            self.base_url,
            scene.wrs_path()?,
            scene.wrs_row()?,
            id,
            id,
            band
        ))
    }

    #[instrument(skip(self))]
    async fn read(&self, location: &str) -> Result<Bytes, FetchError> {
        let response = self.client.get(location).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus {
                url: location.to_string(),
                status: response.status().as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        debug!(size = bytes.len(), "Downloaded band file");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use etl_common::{BoundingBox, Footprint};
    use object_store::memory::InMemory;

    fn scene() -> SceneDescriptor {
        SceneDescriptor::new(
            "LC80140322017245LGN00",
            Footprint::from_bbox(&BoundingBox::new(-75.0, 40.0, -73.0, 42.0)),
            chrono::Utc::now(),
        )
    }

    #[test]
    fn test_http_locate_prefers_product_id() {
        let source = HttpBandSource::new(
            "https://storage.googleapis.com/gcp-public-data-landsat/LC08/01/",
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(
            source.locate(&scene(), 4).unwrap(),
            "https://storage.googleapis.com/gcp-public-data-landsat/LC08/01/014/032/\
             LC80140322017245LGN00/LC80140322017245LGN00_B4.TIF"
        );

        let with_product = scene().with_product_id("LC08_L1TP_014032_20170902_20170915_01_T1");
        assert_eq!(
            source.locate(&with_product, 2).unwrap(),
            "https://storage.googleapis.com/gcp-public-data-landsat/LC08/01/014/032/\
             LC08_L1TP_014032_20170902_20170915_01_T1/LC08_L1TP_014032_20170902_20170915_01_T1_B2.TIF"
        );
    }

    #[test]
    fn test_bad_scene_id_cannot_be_located() {
        let source = ObjectStoreBandSource::new(
            Arc::new(ObjectStorage::from_store(Arc::new(InMemory::new()), "test")),
            "L8",
        );
        let mut bad = scene();
        bad.scene_id = "LC8".to_string();
        assert!(matches!(source.locate(&bad, 4), Err(FetchError::Scene(_))));
    }

    #[tokio::test]
    async fn test_object_store_get_band() {
        let storage = Arc::new(ObjectStorage::from_store(Arc::new(InMemory::new()), "landsat-pds"));
        let source = ObjectStoreBandSource::new(storage.clone(), "L8");
        assert_eq!(source.name(), "s3://landsat-pds/L8");

        let key = source.locate(&scene(), 3).unwrap();
        assert_eq!(key, "L8/014/032/LC80140322017245LGN00/LC80140322017245LGN00_B3.TIF");

        assert!(matches!(
            source.get_band(&scene(), 3).await,
            Err(FetchError::Storage(storage::StorageError::NotFound(_)))
        ));

        storage.put(&key, Bytes::from_static(b"tif")).await.unwrap();
        assert_eq!(source.get_band(&scene(), 3).await.unwrap(), Bytes::from_static(b"tif"));
    }
}
