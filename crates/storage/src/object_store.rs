//! Object storage interface for scene band files (S3 compatible).

use bytes::Bytes;
use object_store::{aws::AmazonS3Builder, path::Path, ObjectStore};
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::error::{Result, StorageError};

/// Configuration for object storage connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectStorageConfig {
    /// S3-compatible endpoint URL; `None` for AWS itself
    pub endpoint: Option<String>,
    /// Bucket name
    pub bucket: String,
    /// Access key ID; requests are unsigned when absent
    pub access_key_id: Option<String>,
    /// Secret access key
    pub secret_access_key: Option<String>,
    /// AWS region
    pub region: String,
    /// Allow HTTP (for local MinIO)
    pub allow_http: bool,
}

impl Default for ObjectStorageConfig {
    fn default() -> Self {
        // The public Landsat 8 bucket on AWS Open Data
        Self {
            endpoint: None,
            bucket: "landsat-pds".to_string(),
            access_key_id: None,
            secret_access_key: None,
            region: "us-west-2".to_string(),
            allow_http: false,
        }
    }
}

impl ObjectStorageConfig {
    /// Load configuration from `S3_*` environment variables, falling back
    /// to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            endpoint: env::var("S3_ENDPOINT").ok(),
            bucket: env::var("S3_BUCKET").unwrap_or(defaults.bucket),
            access_key_id: env::var("S3_ACCESS_KEY").ok(),
            secret_access_key: env::var("S3_SECRET_KEY").ok(),
            region: env::var("S3_REGION").unwrap_or(defaults.region),
            allow_http: env::var("S3_ALLOW_HTTP")
                .map(|v| v == "true")
                .unwrap_or(defaults.allow_http),
        }
    }
}

/// Object storage client for band files.
pub struct ObjectStorage {
    store: Arc<dyn ObjectStore>,
    bucket: String,
}

impl ObjectStorage {
    /// Create a new object storage client from config.
    pub fn new(config: &ObjectStorageConfig) -> Result<Self> {
        let mut builder = AmazonS3Builder::new()
            .with_bucket_name(&config.bucket)
            .with_region(&config.region);

        if let Some(endpoint) = &config.endpoint {
            builder = builder.with_endpoint(endpoint);
        }

        match (&config.access_key_id, &config.secret_access_key) {
            (Some(key), Some(secret)) => {
                builder = builder
                    .with_access_key_id(key)
                    .with_secret_access_key(secret);
            }
            (None, None) => {
                builder = builder.with_skip_signature(true);
            }
            _ => {
                return Err(StorageError::Config(
                    "access key and secret key must be set together".to_string(),
                ))
            }
        }

        if config.allow_http {
            builder = builder.with_allow_http(true);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::Config(format!("Failed to create S3 client: {}", e)))?;

        Ok(Self {
            store: Arc::new(store),
            bucket: config.bucket.clone(),
        })
    }

    /// Wrap an existing store, e.g. `object_store::memory::InMemory`.
    pub fn from_store(store: Arc<dyn ObjectStore>, bucket: impl Into<String>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Write bytes to a path in the bucket.
    #[instrument(skip(self, data), fields(bucket = %self.bucket, path = %path))]
    pub async fn put(&self, path: &str, data: Bytes) -> Result<()> {
        let location = Path::from(path);
        debug!(size = data.len(), "Writing object");

        self.store
            .put(&location, data.into())
            .await
            .map_err(|e| StorageError::Backend(format!("Failed to write {}: {}", path, e)))?;

        Ok(())
    }

    /// Read bytes from a path.
    #[instrument(skip(self), fields(bucket = %self.bucket, path = %path))]
    pub async fn get(&self, path: &str) -> Result<Bytes> {
        let location = Path::from(path);

        let result = self.store.get(&location).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => StorageError::NotFound(path.to_string()),
            e => StorageError::Backend(format!("Failed to read {}: {}", path, e)),
        })?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| StorageError::Backend(format!("Failed to read bytes: {}", e)))?;

        debug!(size = bytes.len(), "Read object");
        Ok(bytes)
    }
}

/// Path builder for the Landsat bucket layout.
pub struct StoragePath;

impl StoragePath {
    /// Key of one band file.
    /// Format: {prefix}/{path:03}/{row:03}/{scene_id}/{scene_id}_B{band}.TIF
    pub fn landsat_band(prefix: &str, path: u16, row: u16, scene_id: &str, band: u8) -> String {
        format!(
            "{}/{:03}/{:03}/{}/{}_B{}.TIF",
            prefix, path, row, scene_id, scene_id, band
        )
    }
}
