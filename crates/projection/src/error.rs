//! Error types for projection operations.

use thiserror::Error;

/// Errors raised while transforming coordinates.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// The input coordinate has no image in the target projection.
    #[error("coordinate ({x}, {y}) is outside the domain of {crs}")]
    OutOfDomain { x: f64, y: f64, crs: String },

    /// Invalid projection parameters.
    #[error("invalid projection parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for projection operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;
