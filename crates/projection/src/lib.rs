//! Coordinate reference system transformations.
//!
//! Implements the projections the Landsat ETL needs from scratch without
//! external dependencies:
//!
//! - Geographic WGS84 (EPSG:4326), the pivot for every transform
//! - Spherical Web Mercator (EPSG:3857), the default tiling CRS
//! - WGS84 UTM zones (EPSG:326xx / 327xx), the native CRS of Landsat scenes

pub mod error;
pub mod mercator;
pub mod transform;
pub mod utm;

pub use error::{ProjectionError, Result};
pub use mercator::WebMercator;
pub use transform::{from_geographic, to_geographic, Transform};
pub use utm::TransverseMercator;
