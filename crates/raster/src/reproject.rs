//! Reprojection of whole rasters between coordinate systems.
//!
//! The destination grid covers the transformed envelope of the source
//! extent with roughly the same number of pixels as the source, using
//! square-ish cells. Each destination pixel center is mapped back into the
//! source grid and sampled; pixels falling outside the source are no-data.

use rayon::prelude::*;
use tracing::debug;

use etl_common::CrsCode;
use projection::Transform;

use crate::error::Result;
use crate::interpolation::{interpolate, ResampleMethod};
use crate::multiband::MultibandTile;
use crate::raster::{ProjectedRaster, Raster, RasterExtent};
use crate::tile::{map_cells, ArrayTile, CellBuffer, CellValue};

/// Points sampled along each edge when transforming the source extent.
const EDGE_SAMPLES: usize = 33;

/// Reproject a raster into `dst_crs`.
///
/// Rows of each band are warped in parallel.
pub fn reproject(
    src: &ProjectedRaster,
    dst_crs: CrsCode,
    method: ResampleMethod,
) -> Result<ProjectedRaster> {
    if src.crs == dst_crs {
        return Ok(src.clone());
    }

    let src_re = src.raster.raster_extent();
    let dst_re = destination_extent(&src_re, src.crs, dst_crs)?;
    let inverse = Transform::new(dst_crs, src.crs);

    debug!(
        src_crs = %src.crs,
        dst_crs = %dst_crs,
        src_cols = src_re.cols,
        src_rows = src_re.rows,
        dst_cols = dst_re.cols,
        dst_rows = dst_re.rows,
        method = %method,
        "Reprojecting raster"
    );

    let bands = src
        .tile()
        .bands()
        .iter()
        .map(|band| warp_band(band, &src_re, &dst_re, &inverse, method))
        .collect::<Result<Vec<_>>>()?;

    Ok(ProjectedRaster::new(
        Raster::new(MultibandTile::new(bands)?, dst_re.extent),
        dst_crs,
    ))
}

/// Destination grid for a reprojection, keeping the source pixel count.
fn destination_extent(src: &RasterExtent, src_crs: CrsCode, dst_crs: CrsCode) -> Result<RasterExtent> {
    let extent = Transform::new(src_crs, dst_crs).apply_bbox(&src.extent, EDGE_SAMPLES)?;

    let src_cells = (src.cols * src.rows) as f64;
    let cell_size = (extent.width() * extent.height() / src_cells).sqrt();

    let cols = ((extent.width() / cell_size).round() as usize).max(1);
    let rows = ((extent.height() / cell_size).round() as usize).max(1);

    Ok(RasterExtent::new(extent, cols, rows))
}

fn warp_band(
    band: &ArrayTile,
    src: &RasterExtent,
    dst: &RasterExtent,
    inverse: &Transform,
    method: ResampleMethod,
) -> Result<ArrayTile> {
    let no_data = band.cell_type().no_data();
    let cells = map_cells!(band.cells(), v => warp_cells(v, src, dst, inverse, method, no_data));
    ArrayTile::new(dst.cols, dst.rows, cells)
}

fn warp_cells<T: CellValue>(
    data: &[T],
    src: &RasterExtent,
    dst: &RasterExtent,
    inverse: &Transform,
    method: ResampleMethod,
    no_data: f64,
) -> Vec<T> {
    let mut out = vec![T::from_f64(no_data); dst.cols * dst.rows];

    out.par_chunks_mut(dst.cols)
        .enumerate()
        .for_each(|(row, out_row)| {
            for (col, cell) in out_row.iter_mut().enumerate() {
                let (x, y) = dst.grid_to_map(col, row);
                let Ok((sx, sy)) = inverse.apply(x, y) else {
                    continue;
                };
                let (gx, gy) = src.map_to_grid(sx, sy);
                if let Some(value) = interpolate(method, data, src.cols, src.rows, gx, gy, no_data) {
                    *cell = T::from_f64(value);
                }
            }
        });

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use etl_common::BoundingBox;

    const UTM_18N: CrsCode = CrsCode::Utm {
        zone: 18,
        north: true,
    };

    fn utm_raster(cols: usize, rows: usize) -> ProjectedRaster {
        // 30 m pixels near New York
        let extent = BoundingBox::new(
            580_000.0,
            4_500_000.0,
            580_000.0 + 30.0 * cols as f64,
            4_500_000.0 + 30.0 * rows as f64,
        );
        let cells: Vec<u16> = (0..cols * rows).map(|i| (i % 1000) as u16 + 1).collect();
        let band = ArrayTile::from_u16(cols, rows, cells).unwrap();
        let tile = MultibandTile::new(vec![band.clone(), band]).unwrap();
        ProjectedRaster::new(Raster::new(tile, extent), UTM_18N)
    }

    #[test]
    fn test_same_crs_is_identity() {
        let src = utm_raster(10, 10);
        let out = reproject(&src, UTM_18N, ResampleMethod::Nearest).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn test_reproject_to_web_mercator() {
        let src = utm_raster(120, 80);
        let out = reproject(&src, CrsCode::Epsg3857, ResampleMethod::Nearest).unwrap();

        assert_eq!(out.crs, CrsCode::Epsg3857);
        assert_eq!(out.tile().band_count(), 2);
        assert_eq!(out.tile().cell_type(), etl_common::CellType::Uint16);

        let (cols, rows) = out.tile().dimensions();
        let ratio = (cols * rows) as f64 / (120.0 * 80.0);
        assert!((0.9..1.1).contains(&ratio), "pixel count ratio {}", ratio);

        // Mercator stretches by ~1/cos(lat), the extent grows accordingly.
        assert!(out.extent().width() > src.extent().width());

        let band = out.tile().band(0).unwrap();
        assert!(band.data_count() > cols * rows / 2);
    }

    #[test]
    fn test_center_value_preserved_with_nearest() {
        let src = utm_raster(64, 64);
        let out = reproject(&src, CrsCode::Epsg3857, ResampleMethod::Nearest).unwrap();

        let src_re = src.raster.raster_extent();
        let dst_re = out.raster.raster_extent();
        let (cx, cy) = dst_re.grid_to_map(dst_re.cols / 2, dst_re.rows / 2);
        let (sx, sy) = Transform::new(CrsCode::Epsg3857, UTM_18N).apply(cx, cy).unwrap();
        let (gx, gy) = src_re.map_to_grid(sx, sy);

        let expected = src
            .tile()
            .band(0)
            .unwrap()
            .get_double(gx.floor() as usize, gy.floor() as usize);
        let actual = out
            .tile()
            .band(0)
            .unwrap()
            .get_double(dst_re.cols / 2, dst_re.rows / 2);
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_bilinear_stays_within_source_range() {
        let src = utm_raster(40, 40);
        let out = reproject(&src, CrsCode::Epsg4326, ResampleMethod::Bilinear).unwrap();
        let band = out.tile().band(1).unwrap();
        for row in 0..band.rows() {
            for col in 0..band.cols() {
                let v = band.get_double(col, row);
                assert!((0.0..=1000.0).contains(&v));
            }
        }
    }
}
