//! Numeric cell encodings for raster data.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric encoding of raster cells.
///
/// Each type carries the no-data sentinel used when a cell has no value.
/// Landsat band files are unsigned 16-bit with 0 as no-data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    Uint8,
    Uint16,
    Int16,
    Int32,
    Float32,
    Float64,
}

impl CellType {
    /// Size of one cell in bytes.
    pub fn bytes(&self) -> usize {
        match self {
            CellType::Uint8 => 1,
            CellType::Uint16 | CellType::Int16 => 2,
            CellType::Int32 | CellType::Float32 => 4,
            CellType::Float64 => 8,
        }
    }

    /// No-data sentinel expressed as f64.
    pub fn no_data(&self) -> f64 {
        match self {
            CellType::Uint8 | CellType::Uint16 => 0.0,
            CellType::Int16 => i16::MIN as f64,
            CellType::Int32 => i32::MIN as f64,
            CellType::Float32 | CellType::Float64 => f64::NAN,
        }
    }

    pub fn is_floating_point(&self) -> bool {
        matches!(self, CellType::Float32 | CellType::Float64)
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CellType::Uint8 => "uint8",
            CellType::Uint16 => "uint16",
            CellType::Int16 => "int16",
            CellType::Int32 => "int32",
            CellType::Float32 => "float32",
            CellType::Float64 => "float64",
        };
        write!(f, "{}", name)
    }
}
