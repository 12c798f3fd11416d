//! Error types for the ingestion crate.

use etl_common::{CrsCode, EtlError};
use projection::ProjectionError;
use raster::RasterError;
use storage::StorageError;
use thiserror::Error;

/// Batch-level errors. These abort the calling job.
#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("Scene collection is empty")]
    EmptySceneSet,

    #[error("Destination CRS {0} has no world tiling extent")]
    UnsupportedCrs(CrsCode),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No tokio runtime available for the execution context")]
    NoRuntime,

    #[error("Failed to read scene catalog: {0}")]
    CatalogRead(#[from] std::io::Error),

    #[error("Failed to parse scene catalog: {0}")]
    CatalogParse(String),

    #[error(transparent)]
    Etl(#[from] EtlError),

    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestionError>;

/// Why one source could not produce a scene. Contained by the fetcher,
/// never raised to the batch.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("No bands selected")]
    NoBands,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("GeoTIFF decode failed: {0}")]
    Decode(#[from] tiff::TiffError),

    #[error("Unsupported band file: {0}")]
    UnsupportedFormat(String),

    #[error("Missing georeferencing: {0}")]
    Georeference(String),

    #[error("Bands disagree: {0}")]
    BandMismatch(String),

    #[error("Decoder task failed: {0}")]
    Task(String),

    #[error(transparent)]
    Scene(#[from] EtlError),

    #[error(transparent)]
    Raster(#[from] RasterError),
}
