//! Splitting rasters into fixed-size chunks.

use crate::error::{RasterError, Result};
use crate::raster::Raster;

/// Number of chunk columns and rows needed to cover a `cols x rows` grid
/// with `tile_cols x tile_rows` chunks.
pub fn chunk_layout(cols: usize, rows: usize, tile_cols: usize, tile_rows: usize) -> (usize, usize) {
    (cols.div_ceil(tile_cols), rows.div_ceil(tile_rows))
}

/// Split a raster into chunks of at most `tile_cols x tile_rows` pixels.
///
/// Chunks are returned in row-major order. Chunks on the right and bottom
/// edges keep whatever pixels remain and are not padded; each carries the
/// extent of exactly the pixels it holds.
pub fn split(raster: &Raster, tile_cols: usize, tile_rows: usize) -> Result<Vec<Raster>> {
    if tile_cols == 0 || tile_rows == 0 {
        return Err(RasterError::invalid_dimensions(tile_cols, tile_rows));
    }

    let re = raster.raster_extent();
    let (layout_cols, layout_rows) = chunk_layout(re.cols, re.rows, tile_cols, tile_rows);
    let mut chunks = Vec::with_capacity(layout_cols * layout_rows);

    for layout_row in 0..layout_rows {
        let row = layout_row * tile_rows;
        let rows = tile_rows.min(re.rows - row);

        for layout_col in 0..layout_cols {
            let col = layout_col * tile_cols;
            let cols = tile_cols.min(re.cols - col);

            let tile = raster.tile.crop(col, row, cols, rows)?;
            chunks.push(Raster::new(tile, re.window_extent(col, row, cols, rows)));
        }
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multiband::MultibandTile;
    use crate::tile::ArrayTile;
    use etl_common::BoundingBox;

    fn raster(cols: usize, rows: usize) -> Raster {
        let cells: Vec<u16> = (0..cols * rows).map(|i| (i % 60_000) as u16 + 1).collect();
        let band = ArrayTile::from_u16(cols, rows, cells).unwrap();
        Raster::new(
            MultibandTile::new(vec![band.clone(), band.clone(), band]).unwrap(),
            BoundingBox::new(0.0, 0.0, cols as f64, rows as f64),
        )
    }

    #[test]
    fn test_chunk_layout() {
        assert_eq!(chunk_layout(500, 260, 256, 256), (2, 2));
        assert_eq!(chunk_layout(256, 256, 256, 256), (1, 1));
        assert_eq!(chunk_layout(257, 1, 256, 256), (2, 1));
    }

    #[test]
    fn test_split_edge_chunks_keep_true_size() {
        let chunks = split(&raster(500, 260), 256, 256).unwrap();
        assert_eq!(chunks.len(), 4);

        let dims: Vec<_> = chunks.iter().map(|c| c.tile.dimensions()).collect();
        assert_eq!(dims, vec![(256, 256), (244, 256), (256, 4), (244, 4)]);

        assert_eq!(chunks[0].extent, BoundingBox::new(0.0, 4.0, 256.0, 260.0));
        assert_eq!(chunks[3].extent, BoundingBox::new(256.0, 0.0, 500.0, 4.0));
        assert!(chunks.iter().all(|c| c.tile.band_count() == 3));
    }

    #[test]
    fn test_split_preserves_cells() {
        let src = raster(300, 10);
        let chunks = split(&src, 256, 256).unwrap();
        let right = chunks[1].tile.band(0).unwrap();
        assert_eq!(
            right.get_double(0, 3),
            src.tile.band(0).unwrap().get_double(256, 3)
        );
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        assert!(split(&raster(10, 10), 0, 256).is_err());
    }
}
