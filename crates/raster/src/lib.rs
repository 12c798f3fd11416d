//! Raster tiles, reprojection and chunking for the Landsat ETL.
//!
//! # Architecture
//!
//! ```text
//! ProjectedRaster (native UTM, whole scene)
//!      │
//!      ▼
//! reproject(dst CRS)          rows warped in parallel (rayon)
//!      │
//!      ▼
//! split(256 x 256)            ceil grid, edge chunks keep their true size
//!      │
//!      ▼
//! Vec<Raster>                 one per chunk, each with its own sub-extent
//! ```
//!
//! Tiles store cells in their native numeric encoding ([`CellType`]);
//! resampling goes through `f64` one cell at a time.

pub mod error;
pub mod feature;
pub mod interpolation;
pub mod multiband;
pub mod raster;
pub mod reproject;
pub mod split;
pub mod tile;

pub use error::{RasterError, Result};
pub use etl_common::CellType;
pub use feature::TileFeature;
pub use interpolation::ResampleMethod;
pub use multiband::MultibandTile;
pub use raster::{ProjectedRaster, Raster, RasterExtent};
pub use reproject::reproject;
pub use split::{chunk_layout, split};
pub use tile::{ArrayTile, CellBuffer};
