//! Multiband tiles.

use etl_common::CellType;

use crate::error::{RasterError, Result};
use crate::tile::ArrayTile;

/// Several bands of identical size and cell type.
#[derive(Debug, Clone, PartialEq)]
pub struct MultibandTile {
    bands: Vec<ArrayTile>,
}

impl MultibandTile {
    /// Stack bands, checking they agree on size and cell type.
    pub fn new(bands: Vec<ArrayTile>) -> Result<Self> {
        let first = bands.first().ok_or(RasterError::NoBands)?;
        let (cols, rows, cell_type) = (first.cols(), first.rows(), first.cell_type());

        for (index, band) in bands.iter().enumerate().skip(1) {
            if band.cols() != cols || band.rows() != rows {
                return Err(RasterError::band_mismatch(format!(
                    "band {} is {}x{}, band 0 is {}x{}",
                    index,
                    band.cols(),
                    band.rows(),
                    cols,
                    rows
                )));
            }
            if band.cell_type() != cell_type {
                return Err(RasterError::band_mismatch(format!(
                    "band {} is {}, band 0 is {}",
                    index,
                    band.cell_type(),
                    cell_type
                )));
            }
        }

        Ok(Self { bands })
    }

    /// `band_count` bands of all no-data cells.
    pub fn empty(cell_type: CellType, band_count: usize, cols: usize, rows: usize) -> Result<Self> {
        if band_count == 0 {
            return Err(RasterError::NoBands);
        }
        let band = ArrayTile::empty(cell_type, cols, rows)?;
        Ok(Self {
            bands: vec![band; band_count],
        })
    }

    /// An empty tile with this tile's band count, in another encoding and size.
    pub fn prototype(&self, cell_type: CellType, cols: usize, rows: usize) -> Result<Self> {
        Self::empty(cell_type, self.band_count(), cols, rows)
    }

    /// An empty tile with this tile's band count and encoding, in another size.
    pub fn prototype_like(&self, cols: usize, rows: usize) -> Result<Self> {
        self.prototype(self.cell_type(), cols, rows)
    }

    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    pub fn band(&self, index: usize) -> Option<&ArrayTile> {
        self.bands.get(index)
    }

    pub fn bands(&self) -> &[ArrayTile] {
        &self.bands
    }

    pub fn into_bands(self) -> Vec<ArrayTile> {
        self.bands
    }

    pub fn cols(&self) -> usize {
        self.bands[0].cols()
    }

    pub fn rows(&self) -> usize {
        self.bands[0].rows()
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols(), self.rows())
    }

    pub fn cell_type(&self) -> CellType {
        self.bands[0].cell_type()
    }

    /// Copy out the same window from every band.
    pub fn crop(&self, col: usize, row: usize, cols: usize, rows: usize) -> Result<Self> {
        let bands = self
            .bands
            .iter()
            .map(|band| band.crop(col, row, cols, rows))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { bands })
    }
}
