//! Tiles paired with an associated metadata record.

use etl_common::CellType;

use crate::error::Result;
use crate::multiband::MultibandTile;

/// A tile carrying an arbitrary piece of associated data.
#[derive(Debug, Clone, PartialEq)]
pub struct TileFeature<T, D> {
    pub tile: T,
    pub data: D,
}

impl<T, D> TileFeature<T, D> {
    pub fn new(tile: T, data: D) -> Self {
        Self { tile, data }
    }
}

impl<D: Default> TileFeature<MultibandTile, D> {
    /// An empty feature shaped like this one: all-no-data bands (same band
    /// count) in `cell_type` at `cols x rows`, with default data.
    ///
    /// Fails with `InvalidDimensions` when either dimension is zero.
    pub fn prototype(&self, cell_type: CellType, cols: usize, rows: usize) -> Result<Self> {
        Ok(TileFeature {
            tile: self.tile.prototype(cell_type, cols, rows)?,
            data: D::default(),
        })
    }

    /// As [`prototype`](Self::prototype), keeping this tile's cell type.
    pub fn prototype_like(&self, cols: usize, rows: usize) -> Result<Self> {
        self.prototype(self.tile.cell_type(), cols, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RasterError;
    use crate::tile::ArrayTile;
    use std::collections::HashMap;

    fn feature() -> TileFeature<MultibandTile, HashMap<String, String>> {
        let tile = MultibandTile::new(vec![
            ArrayTile::from_u16(2, 2, vec![1, 2, 3, 4]).unwrap(),
            ArrayTile::from_u16(2, 2, vec![5, 6, 7, 8]).unwrap(),
        ])
        .unwrap();
        let mut data = HashMap::new();
        data.insert("scene".to_string(), "LC80140322017245LGN00".to_string());
        TileFeature::new(tile, data)
    }

    #[test]
    fn test_prototype_has_empty_metadata() {
        let proto = feature().prototype(CellType::Int16, 256, 256).unwrap();
        assert!(proto.data.is_empty());
        assert_eq!(proto.tile.band_count(), 2);
        assert_eq!(proto.tile.cell_type(), CellType::Int16);
        assert_eq!(proto.tile.dimensions(), (256, 256));
        assert!(proto.tile.bands().iter().all(|b| b.data_count() == 0));
    }

    #[test]
    fn test_prototype_like_reuses_cell_type() {
        let proto = feature().prototype_like(10, 20).unwrap();
        assert_eq!(proto.tile.cell_type(), CellType::Uint16);
        assert_eq!(proto.tile.dimensions(), (10, 20));
    }

    #[test]
    fn test_zero_width_is_invalid_argument() {
        let err = feature().prototype_like(0, 10).unwrap_err();
        assert!(matches!(err, RasterError::InvalidDimensions { cols: 0, rows: 10 }));
    }
}
