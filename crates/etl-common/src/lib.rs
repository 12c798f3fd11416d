//! Common types and utilities shared across the Landsat tiling ETL crates.

pub mod bbox;
pub mod cell;
pub mod crs;
pub mod error;
pub mod footprint;
pub mod key;
pub mod layout;
pub mod metadata;
pub mod scene;
pub mod temporal;

pub use bbox::BoundingBox;
pub use cell::CellType;
pub use crs::{CrsCode, CrsParseError};
pub use error::{EtlError, EtlResult};
pub use footprint::{Footprint, MultiFootprint};
pub use key::{GridBounds, KeyBounds, SpaceTimeKey, SpatialKey};
pub use layout::{LayoutDefinition, TileLayout, ZoomedLayoutScheme, DEFAULT_TILE_SIZE};
pub use metadata::LayerMetadata;
pub use scene::SceneDescriptor;
pub use temporal::TemporalProjectedExtent;
