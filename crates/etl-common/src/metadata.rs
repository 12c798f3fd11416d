//! Destination layer metadata.

use serde::{Deserialize, Serialize};

use crate::{BoundingBox, CellType, CrsCode, KeyBounds, LayoutDefinition, SpaceTimeKey};

/// Global description of a tiled destination layer.
///
/// Computed once per ingestion batch and read-only afterwards. Tiles
/// produced from a different scene set than the one these metadata were
/// computed from may fall outside `bounds`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerMetadata {
    /// Numeric encoding of every cell in the layer
    pub cell_type: CellType,
    /// Tiling layout at the layer's zoom level
    pub layout: LayoutDefinition,
    /// Combined extent of all source scenes, in `crs`
    pub extent: BoundingBox,
    /// Layer coordinate reference system
    pub crs: CrsCode,
    /// Minimum and maximum key of the layer's keyspace
    pub bounds: KeyBounds<SpaceTimeKey>,
}

impl LayerMetadata {
    /// Check whether a key falls inside the layer's declared keyspace.
    pub fn contains_key(&self, key: &SpaceTimeKey) -> bool {
        self.bounds.contains(key)
    }

    /// Number of spatial tiles covered by the key bounds.
    pub fn tile_count(&self) -> u64 {
        let grid = self.bounds.grid_bounds();
        grid.width() as u64 * grid.height() as u64
    }
}
