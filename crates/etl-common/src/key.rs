//! Keys addressing tiles within a layout, and their bounds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Column/row address of one tile in a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpatialKey {
    pub col: u32,
    pub row: u32,
}

impl SpatialKey {
    pub fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }

    pub fn with_instant(self, instant: i64) -> SpaceTimeKey {
        SpaceTimeKey::new(self.col, self.row, instant)
    }
}

/// Column/row/time address of one output chunk.
///
/// `instant` is epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpaceTimeKey {
    pub col: u32,
    pub row: u32,
    pub instant: i64,
}

impl SpaceTimeKey {
    pub fn new(col: u32, row: u32, instant: i64) -> Self {
        Self { col, row, instant }
    }

    pub fn spatial_key(&self) -> SpatialKey {
        SpatialKey::new(self.col, self.row)
    }
}

impl fmt::Display for SpaceTimeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.col, self.row, self.instant)
    }
}

/// Inclusive range of grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridBounds {
    pub col_min: u32,
    pub row_min: u32,
    pub col_max: u32,
    pub row_max: u32,
}

impl GridBounds {
    pub fn new(col_min: u32, row_min: u32, col_max: u32, row_max: u32) -> Self {
        Self {
            col_min,
            row_min,
            col_max,
            row_max,
        }
    }

    pub fn width(&self) -> u32 {
        self.col_max - self.col_min + 1
    }

    pub fn height(&self) -> u32 {
        self.row_max - self.row_min + 1
    }

    pub fn contains(&self, col: u32, row: u32) -> bool {
        col >= self.col_min && col <= self.col_max && row >= self.row_min && row <= self.row_max
    }

    /// Iterate every key inside the bounds, row by row.
    pub fn keys(&self) -> impl Iterator<Item = SpatialKey> + '_ {
        (self.row_min..=self.row_max)
            .flat_map(move |row| (self.col_min..=self.col_max).map(move |col| SpatialKey::new(col, row)))
    }
}

/// Minimum and maximum key of a layer's keyspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBounds<K> {
    pub min: K,
    pub max: K,
}

impl KeyBounds<SpaceTimeKey> {
    pub fn new(min: SpaceTimeKey, max: SpaceTimeKey) -> Self {
        Self { min, max }
    }

    /// Check that a key falls within the bounds on every dimension.
    pub fn contains(&self, key: &SpaceTimeKey) -> bool {
        key.col >= self.min.col
            && key.col <= self.max.col
            && key.row >= self.min.row
            && key.row <= self.max.row
            && key.instant >= self.min.instant
            && key.instant <= self.max.instant
    }

    pub fn grid_bounds(&self) -> GridBounds {
        GridBounds::new(self.min.col, self.min.row, self.max.col, self.max.row)
    }
}
