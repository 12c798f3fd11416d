//! Integration tests running synthetic scenes through reprojection and
//! chunking.

use etl_common::CrsCode;
use raster::{
    chunk_layout, reproject, split, ArrayTile, MultibandTile, ProjectedRaster, Raster,
    ResampleMethod,
};
use test_utils::{assert_approx_eq, new_york_scenes, SyntheticScene};

fn scene_raster(scene: &SyntheticScene) -> ProjectedRaster {
    let bands = [4, 3, 2]
        .iter()
        .map(|&b| ArrayTile::from_u16(scene.cols, scene.rows, scene.band_cells(b)).unwrap())
        .collect();
    ProjectedRaster::new(
        Raster::new(MultibandTile::new(bands).unwrap(), scene.extent),
        scene.crs,
    )
}

// =============================================================================
// Reprojection
// =============================================================================

#[test]
fn test_scene_reprojects_into_web_mercator() {
    let scene = &new_york_scenes(300, 200)[0];
    let src = scene_raster(scene);

    let out = reproject(&src, CrsCode::Epsg3857, ResampleMethod::Nearest).unwrap();
    assert_eq!(out.crs, CrsCode::Epsg3857);
    assert_eq!(out.tile().band_count(), 3);

    // The footprint and the reprojected extent describe the same area, up
    // to the slight bowing of reprojected edges.
    let footprint = scene.descriptor.footprint.envelope();
    let (west, south) = projection::to_geographic(CrsCode::Epsg3857, out.extent().min_x, out.extent().min_y);
    let (east, north) = projection::to_geographic(CrsCode::Epsg3857, out.extent().max_x, out.extent().max_y);
    assert_approx_eq!(west, footprint.min_x, 1e-4);
    assert_approx_eq!(south, footprint.min_y, 1e-4);
    assert_approx_eq!(east, footprint.max_x, 1e-4);
    assert_approx_eq!(north, footprint.max_y, 1e-4);
}

#[test]
fn test_bands_stay_distinct_after_reprojection() {
    let scene = &new_york_scenes(64, 64)[1];
    let out = reproject(&scene_raster(scene), CrsCode::Epsg3857, ResampleMethod::Nearest).unwrap();

    let (cols, rows) = out.tile().dimensions();
    let (col, row) = (cols / 2, rows / 2);
    let red = out.tile().band(0).unwrap().get_double(col, row);
    let green = out.tile().band(1).unwrap().get_double(col, row);
    let blue = out.tile().band(2).unwrap().get_double(col, row);

    // Bands differ only by their 1000 offsets.
    assert_eq!(red - green, 1000.0);
    assert_eq!(green - blue, 1000.0);
}

// =============================================================================
// Chunking
// =============================================================================

#[test]
fn test_reprojected_scene_chunks_cover_every_pixel() {
    let scene = &new_york_scenes(600, 300)[2];
    let out = reproject(&scene_raster(scene), CrsCode::Epsg3857, ResampleMethod::Nearest).unwrap();
    let (cols, rows) = out.tile().dimensions();

    let chunks = split(&out.raster, 256, 256).unwrap();
    let (layout_cols, layout_rows) = chunk_layout(cols, rows, 256, 256);
    assert_eq!(chunks.len(), layout_cols * layout_rows);

    let pixels: usize = chunks.iter().map(|c| c.cols() * c.rows()).sum();
    assert_eq!(pixels, cols * rows);

    let data: usize = chunks
        .iter()
        .map(|c| c.tile.band(0).unwrap().data_count())
        .sum();
    assert_eq!(data, out.tile().band(0).unwrap().data_count());

    assert_eq!(chunks[0].extent.min_x, out.extent().min_x);
    assert_eq!(chunks[0].extent.max_y, out.extent().max_y);
    assert!(chunks.iter().all(|c| c.cols() <= 256 && c.rows() <= 256));
}
