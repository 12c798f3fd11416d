//! Common test fixtures for Landsat ETL tests.
//!
//! Scenes here are small synthetic stand-ins for real Landsat 8 scenes:
//! north-up UTM rectangles of 30 m pixels whose footprints are the
//! geographic image of their corners.

use chrono::{DateTime, TimeZone, Utc};
use etl_common::{BoundingBox, CrsCode, Footprint, SceneDescriptor};

use crate::generators::create_band_cells;
use crate::geotiff::encode_geotiff_u16_pixel_is_point;

/// Landsat 8 pixel size in meters.
pub const PIXEL_SIZE: f64 = 30.0;

/// UTM zone 18 north, covering New York.
pub const UTM_18N: CrsCode = CrsCode::Utm {
    zone: 18,
    north: true,
};

/// Real pre-collection scene ids, used for their path/row fields.
pub mod scene_ids {
    /// Path 14, row 32
    pub const NEW_YORK: &str = "LC80140322017245LGN00";
    /// Path 13, row 32
    pub const LONG_ISLAND: &str = "LC80130322017238LGN00";
    /// Path 14, row 33
    pub const NEW_JERSEY: &str = "LC80140332017245LGN00";
}

/// A synthetic scene with its native grid.
#[derive(Debug, Clone)]
pub struct SyntheticScene {
    pub descriptor: SceneDescriptor,
    pub extent: BoundingBox,
    pub crs: CrsCode,
    pub cols: usize,
    pub rows: usize,
}

impl SyntheticScene {
    /// Band cells from [`create_band_cells`].
    pub fn band_cells(&self, band: u16) -> Vec<u16> {
        create_band_cells(self.cols, self.rows, band)
    }

    /// The band encoded as a GeoTIFF file, tied at the first pixel's center
    /// like a Landsat band file.
    pub fn band_geotiff(&self, band: u16) -> Vec<u8> {
        encode_geotiff_u16_pixel_is_point(
            self.cols as u32,
            self.rows as u32,
            &self.band_cells(band),
            &self.extent,
            self.crs,
        )
        .expect("encode fixture GeoTIFF")
    }
}

/// Build a scene whose top-left corner sits at `(easting, northing)` in
/// UTM 18N.
pub fn synthetic_scene(
    scene_id: &str,
    easting: f64,
    northing: f64,
    cols: usize,
    rows: usize,
    acquired: DateTime<Utc>,
) -> SyntheticScene {
    let extent = BoundingBox::new(
        easting,
        northing - rows as f64 * PIXEL_SIZE,
        easting + cols as f64 * PIXEL_SIZE,
        northing,
    );
    let ring = [
        (extent.min_x, extent.min_y),
        (extent.max_x, extent.min_y),
        (extent.max_x, extent.max_y),
        (extent.min_x, extent.max_y),
    ]
    .iter()
    .map(|&(x, y)| projection::to_geographic(UTM_18N, x, y))
    .collect();
    let footprint = Footprint::new(ring).expect("fixture footprint");

    SyntheticScene {
        descriptor: SceneDescriptor::new(scene_id, footprint, acquired),
        extent,
        crs: UTM_18N,
        cols,
        rows,
    }
}

/// Acquisition date of the path 14 scenes.
pub fn acquired_2017_09_02() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2017, 9, 2, 15, 34, 0).unwrap()
}

/// Acquisition date of the path 13 scene.
pub fn acquired_2017_08_26() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2017, 8, 26, 15, 28, 0).unwrap()
}

/// Three small neighbouring scenes around New York.
pub fn new_york_scenes(cols: usize, rows: usize) -> Vec<SyntheticScene> {
    vec![
        synthetic_scene(
            scene_ids::NEW_YORK,
            580_000.0,
            4_520_000.0,
            cols,
            rows,
            acquired_2017_09_02(),
        ),
        synthetic_scene(
            scene_ids::LONG_ISLAND,
            620_000.0,
            4_520_000.0,
            cols,
            rows,
            acquired_2017_08_26(),
        ),
        synthetic_scene(
            scene_ids::NEW_JERSEY,
            560_000.0,
            4_480_000.0,
            cols,
            rows,
            acquired_2017_09_02(),
        ),
    ]
}
