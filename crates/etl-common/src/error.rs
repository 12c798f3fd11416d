//! Error types shared by the ETL crates.

use thiserror::Error;

/// Result type alias using EtlError.
pub type EtlResult<T> = Result<T, EtlError>;

/// Errors raised by the common tiling and layout types.
#[derive(Debug, Error)]
pub enum EtlError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unsupported CRS for tiling: {0}")]
    UnsupportedCrs(String),

    #[error("Invalid footprint: {0}")]
    InvalidFootprint(String),

    #[error("Invalid scene id: {0}")]
    InvalidSceneId(String),
}

impl From<crate::CrsParseError> for EtlError {
    fn from(err: crate::CrsParseError) -> Self {
        EtlError::UnsupportedCrs(err.to_string())
    }
}
