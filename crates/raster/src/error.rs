//! Error types for raster operations.

use thiserror::Error;

/// Errors that can occur while building or transforming rasters.
#[derive(Error, Debug)]
pub enum RasterError {
    /// Zero-sized tile dimensions.
    #[error("invalid tile dimensions {cols}x{rows}: both must be positive")]
    InvalidDimensions { cols: usize, rows: usize },

    /// Cell buffer length does not match the tile dimensions.
    #[error("expected {expected} cells, got {actual}")]
    DataLength { expected: usize, actual: usize },

    /// Bands of one multiband tile disagree.
    #[error("band mismatch: {0}")]
    BandMismatch(String),

    /// A multiband tile needs at least one band.
    #[error("multiband tile has no bands")]
    NoBands,

    /// Crop window outside the tile.
    #[error("window {col}+{cols}, {row}+{rows} is outside a {tile_cols}x{tile_rows} tile")]
    WindowOutOfBounds {
        col: usize,
        row: usize,
        cols: usize,
        rows: usize,
        tile_cols: usize,
        tile_rows: usize,
    },

    /// Projection error.
    #[error("projection error: {0}")]
    Projection(#[from] projection::ProjectionError),
}

impl RasterError {
    /// Create an InvalidDimensions error.
    pub fn invalid_dimensions(cols: usize, rows: usize) -> Self {
        Self::InvalidDimensions { cols, rows }
    }

    /// Create a BandMismatch error.
    pub fn band_mismatch(msg: impl Into<String>) -> Self {
        Self::BandMismatch(msg.into())
    }
}

/// Result type for raster operations.
pub type Result<T> = std::result::Result<T, RasterError>;
