//! Georeferenced rasters.

use etl_common::{BoundingBox, CrsCode};

use crate::multiband::MultibandTile;

/// A pixel grid laid over a map extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterExtent {
    pub extent: BoundingBox,
    pub cols: usize,
    pub rows: usize,
}

impl RasterExtent {
    pub fn new(extent: BoundingBox, cols: usize, rows: usize) -> Self {
        Self { extent, cols, rows }
    }

    /// Map units per pixel horizontally.
    pub fn cell_width(&self) -> f64 {
        self.extent.width() / self.cols as f64
    }

    /// Map units per pixel vertically.
    pub fn cell_height(&self) -> f64 {
        self.extent.height() / self.rows as f64
    }

    /// Fractional `(col, row)` of a map coordinate; pixel `(0, 0)` spans
    /// `[0, 1)` from the top-left corner.
    pub fn map_to_grid(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.extent.min_x) / self.cell_width(),
            (self.extent.max_y - y) / self.cell_height(),
        )
    }

    /// Map coordinate of a pixel center.
    pub fn grid_to_map(&self, col: usize, row: usize) -> (f64, f64) {
        (
            self.extent.min_x + (col as f64 + 0.5) * self.cell_width(),
            self.extent.max_y - (row as f64 + 0.5) * self.cell_height(),
        )
    }

    /// Map extent of a pixel window.
    pub fn window_extent(&self, col: usize, row: usize, cols: usize, rows: usize) -> BoundingBox {
        let min_x = self.extent.min_x + col as f64 * self.cell_width();
        let max_y = self.extent.max_y - row as f64 * self.cell_height();
        BoundingBox::new(
            min_x,
            max_y - rows as f64 * self.cell_height(),
            min_x + cols as f64 * self.cell_width(),
            max_y,
        )
    }
}

/// A multiband tile with the map extent it covers.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    pub tile: MultibandTile,
    pub extent: BoundingBox,
}

impl Raster {
    pub fn new(tile: MultibandTile, extent: BoundingBox) -> Self {
        Self { tile, extent }
    }

    pub fn cols(&self) -> usize {
        self.tile.cols()
    }

    pub fn rows(&self) -> usize {
        self.tile.rows()
    }

    pub fn raster_extent(&self) -> RasterExtent {
        RasterExtent::new(self.extent, self.cols(), self.rows())
    }
}

/// A raster together with the CRS its extent is expressed in.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedRaster {
    pub raster: Raster,
    pub crs: CrsCode,
}

impl ProjectedRaster {
    pub fn new(raster: Raster, crs: CrsCode) -> Self {
        Self { raster, crs }
    }

    pub fn tile(&self) -> &MultibandTile {
        &self.raster.tile
    }

    pub fn extent(&self) -> BoundingBox {
        self.raster.extent
    }
}
