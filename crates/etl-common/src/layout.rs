//! Tiling layouts over a CRS's world extent.
//!
//! A [`LayoutDefinition`] pairs an extent with a regular grid of fixed-size
//! tiles and provides the map transform between map coordinates and tile
//! keys. [`ZoomedLayoutScheme`] builds the power-of-two layout for a zoom
//! level, the same pyramid used by web map tiles.

use serde::{Deserialize, Serialize};

use crate::{BoundingBox, CrsCode, EtlError, EtlResult, GridBounds, SpatialKey};

/// Tile edge in pixels used by the ETL output.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Deepest zoom level a layout scheme will build.
pub const MAX_ZOOM: u32 = 30;

/// Tolerance (in tile units) for coordinates landing on a tile edge.
const EDGE_EPSILON: f64 = 1e-7;

/// Number of tiles in the layout and pixels per tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileLayout {
    pub layout_cols: u32,
    pub layout_rows: u32,
    pub tile_cols: u32,
    pub tile_rows: u32,
}

impl TileLayout {
    pub fn new(layout_cols: u32, layout_rows: u32, tile_cols: u32, tile_rows: u32) -> Self {
        Self {
            layout_cols,
            layout_rows,
            tile_cols,
            tile_rows,
        }
    }

    /// Total pixel columns across the layout.
    pub fn total_cols(&self) -> u64 {
        self.layout_cols as u64 * self.tile_cols as u64
    }

    /// Total pixel rows across the layout.
    pub fn total_rows(&self) -> u64 {
        self.layout_rows as u64 * self.tile_rows as u64
    }
}

/// A tile grid laid over an extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutDefinition {
    pub extent: BoundingBox,
    pub tile_layout: TileLayout,
}

impl LayoutDefinition {
    pub fn new(extent: BoundingBox, tile_layout: TileLayout) -> Self {
        Self {
            extent,
            tile_layout,
        }
    }

    /// Width of one tile in map units.
    pub fn tile_width(&self) -> f64 {
        self.extent.width() / self.tile_layout.layout_cols as f64
    }

    /// Height of one tile in map units.
    pub fn tile_height(&self) -> f64 {
        self.extent.height() / self.tile_layout.layout_rows as f64
    }

    /// Map units per pixel `(x, y)`.
    pub fn cell_size(&self) -> (f64, f64) {
        (
            self.tile_width() / self.tile_layout.tile_cols as f64,
            self.tile_height() / self.tile_layout.tile_rows as f64,
        )
    }

    /// Fractional grid position of a map coordinate. Rows grow southwards.
    fn map_to_grid(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.extent.min_x) / self.tile_width(),
            (self.extent.max_y - y) / self.tile_height(),
        )
    }

    fn clamp_col(&self, col: f64) -> u32 {
        col.max(0.0).min((self.tile_layout.layout_cols - 1) as f64) as u32
    }

    fn clamp_row(&self, row: f64) -> u32 {
        row.max(0.0).min((self.tile_layout.layout_rows - 1) as f64) as u32
    }

    /// Key of the tile containing a map coordinate, clamped to the layout.
    pub fn key_for(&self, x: f64, y: f64) -> SpatialKey {
        let (gx, gy) = self.map_to_grid(x, y);
        SpatialKey::new(self.clamp_col(gx.floor()), self.clamp_row(gy.floor()))
    }

    /// Map extent covered by a tile key.
    pub fn key_extent(&self, key: SpatialKey) -> BoundingBox {
        let min_x = self.extent.min_x + key.col as f64 * self.tile_width();
        let max_y = self.extent.max_y - key.row as f64 * self.tile_height();
        BoundingBox::new(min_x, max_y - self.tile_height(), min_x + self.tile_width(), max_y)
    }

    /// Inclusive tile bounds covering an extent, clamped to the layout.
    ///
    /// A max edge falling exactly on a tile boundary does not pull in the
    /// neighbouring tile.
    pub fn extent_to_bounds(&self, extent: &BoundingBox) -> GridBounds {
        let (col_min, row_min) = self.map_to_grid(extent.min_x, extent.max_y);
        let (col_max, row_max) = self.map_to_grid(extent.max_x, extent.min_y);

        let col_min = inclusive_edge(col_min);
        let row_min = inclusive_edge(row_min);
        let col_max = exclusive_edge(col_max).max(col_min);
        let row_max = exclusive_edge(row_max).max(row_min);

        GridBounds::new(
            self.clamp_col(col_min),
            self.clamp_row(row_min),
            self.clamp_col(col_max),
            self.clamp_row(row_max),
        )
    }
}

fn inclusive_edge(grid: f64) -> f64 {
    let rounded = grid.round();
    if (grid - rounded).abs() < EDGE_EPSILON {
        rounded
    } else {
        grid.floor()
    }
}

fn exclusive_edge(grid: f64) -> f64 {
    let rounded = grid.round();
    if (grid - rounded).abs() < EDGE_EPSILON {
        rounded - 1.0
    } else {
        grid.floor()
    }
}

/// Power-of-two tile pyramid over a CRS's world extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomedLayoutScheme {
    crs: CrsCode,
    tile_size: u32,
}

impl ZoomedLayoutScheme {
    /// Create a scheme for a world-tiling CRS (EPSG:3857 or EPSG:4326).
    pub fn new(crs: CrsCode, tile_size: u32) -> EtlResult<Self> {
        if crs.world_extent().is_none() {
            return Err(EtlError::UnsupportedCrs(crs.to_string()));
        }
        if tile_size == 0 {
            return Err(EtlError::InvalidArgument("tile size must be positive".to_string()));
        }
        Ok(Self { crs, tile_size })
    }

    pub fn crs(&self) -> CrsCode {
        self.crs
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Layout for a zoom level.
    ///
    /// Web Mercator has `2^z x 2^z` tiles; geographic has `2^(z+1) x 2^z`.
    pub fn level_for_zoom(&self, zoom: u32) -> EtlResult<LayoutDefinition> {
        if zoom > MAX_ZOOM {
            return Err(EtlError::InvalidArgument(format!(
                "zoom {} exceeds the maximum of {}",
                zoom, MAX_ZOOM
            )));
        }
        let extent = self
            .crs
            .world_extent()
            .ok_or_else(|| EtlError::UnsupportedCrs(self.crs.to_string()))?;

        let rows = 1u32 << zoom;
        let cols = if self.crs.is_geographic() { rows * 2 } else { rows };

        Ok(LayoutDefinition::new(
            extent,
            TileLayout::new(cols, rows, self.tile_size, self.tile_size),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::WEB_MERCATOR_MAX_EXTENT;

    fn web_mercator(zoom: u32) -> LayoutDefinition {
        ZoomedLayoutScheme::new(CrsCode::Epsg3857, DEFAULT_TILE_SIZE)
            .unwrap()
            .level_for_zoom(zoom)
            .unwrap()
    }

    #[test]
    fn test_zoom_levels() {
        let z0 = web_mercator(0);
        assert_eq!(z0.tile_layout.layout_cols, 1);
        assert_eq!(z0.tile_layout.tile_cols, 256);

        let z13 = web_mercator(13);
        assert_eq!(z13.tile_layout.layout_cols, 8192);
        assert_eq!(z13.tile_layout.layout_rows, 8192);

        let geo = ZoomedLayoutScheme::new(CrsCode::Epsg4326, 256)
            .unwrap()
            .level_for_zoom(2)
            .unwrap();
        assert_eq!(geo.tile_layout.layout_cols, 8);
        assert_eq!(geo.tile_layout.layout_rows, 4);
    }

    #[test]
    fn test_scheme_rejects_regional_crs() {
        let utm = CrsCode::Utm {
            zone: 18,
            north: true,
        };
        assert!(ZoomedLayoutScheme::new(utm, 256).is_err());
        assert!(ZoomedLayoutScheme::new(CrsCode::Epsg3857, 256)
            .unwrap()
            .level_for_zoom(31)
            .is_err());
    }

    #[test]
    fn test_key_for_corners() {
        let layout = web_mercator(1);
        let m = WEB_MERCATOR_MAX_EXTENT;
        assert_eq!(layout.key_for(-m + 1.0, m - 1.0), SpatialKey::new(0, 0));
        assert_eq!(layout.key_for(m - 1.0, -m + 1.0), SpatialKey::new(1, 1));
        // Outside the world clamps to the edge tile.
        assert_eq!(layout.key_for(2.0 * m, 2.0 * m), SpatialKey::new(1, 0));
    }

    #[test]
    fn test_key_extent_roundtrip() {
        let layout = web_mercator(5);
        let key = SpatialKey::new(9, 12);
        let extent = layout.key_extent(key);
        let (cx, cy) = extent.center();
        assert_eq!(layout.key_for(cx, cy), key);
    }

    #[test]
    fn test_extent_to_bounds_exact_edges() {
        let layout = web_mercator(2);
        let tile = layout.key_extent(SpatialKey::new(1, 2));
        let bounds = layout.extent_to_bounds(&tile);
        assert_eq!(bounds, GridBounds::new(1, 2, 1, 2));

        let two_tiles = tile.combine(&layout.key_extent(SpatialKey::new(2, 2)));
        assert_eq!(layout.extent_to_bounds(&two_tiles), GridBounds::new(1, 2, 2, 2));
    }
}
