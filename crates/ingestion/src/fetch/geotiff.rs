//! Decoding of single-band GeoTIFF files.
//!
//! Only north-up files georeferenced by a pixel scale and a single tiepoint
//! are supported, which covers the Landsat band file layout.

use std::io::Cursor;

use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::tags::Tag;

use etl_common::{BoundingBox, CrsCode};
use raster::{ArrayTile, CellBuffer};

use crate::error::FetchError;

const MODEL_PIXEL_SCALE_TAG: u16 = 33550;
const MODEL_TIEPOINT_TAG: u16 = 33922;
const GEO_KEY_DIRECTORY_TAG: u16 = 34735;

const GT_RASTER_TYPE_GEO_KEY: u16 = 1025;
const GEOGRAPHIC_TYPE_GEO_KEY: u16 = 2048;
const PROJECTED_CS_TYPE_GEO_KEY: u16 = 3072;

const RASTER_PIXEL_IS_POINT: u16 = 2;

/// Largest decoded band accepted: a panchromatic Landsat 8 band in u16
/// with headroom.
const MAX_BAND_BYTES: usize = 512 * 1024 * 1024;

/// How the tiepoint relates to a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum RasterType {
    /// Tiepoint at the top-left corner of the pixel
    #[default]
    PixelIsArea,
    /// Tiepoint at the pixel center
    PixelIsPoint,
}

/// One decoded band with its georeferencing.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoTiffBand {
    pub tile: ArrayTile,
    pub extent: BoundingBox,
    pub crs: CrsCode,
}

/// Decode a band file held in memory.
pub fn decode_band(bytes: &[u8]) -> Result<GeoTiffBand, FetchError> {
    let mut decoder = Decoder::new(Cursor::new(bytes))?.with_limits(decoder_limits());
    let (cols, rows) = decoder.dimensions()?;

    let scale = decoder
        .get_tag_f64_vec(Tag::Unknown(MODEL_PIXEL_SCALE_TAG))
        .map_err(|_| FetchError::Georeference("no ModelPixelScale tag".to_string()))?;
    let tiepoint = decoder
        .get_tag_f64_vec(Tag::Unknown(MODEL_TIEPOINT_TAG))
        .map_err(|_| FetchError::Georeference("no ModelTiepoint tag".to_string()))?;
    let geokeys = decoder
        .get_tag_u16_vec(Tag::Unknown(GEO_KEY_DIRECTORY_TAG))
        .map_err(|_| FetchError::Georeference("no GeoKeyDirectory tag".to_string()))?;

    let (crs, raster_type) = crs_from_geokeys(&geokeys)?;
    let extent = extent_from_tags(&scale, &tiepoint, cols, rows, raster_type)?;

    let cells = match decoder.read_image()? {
        DecodingResult::U8(v) => CellBuffer::U8(v),
        DecodingResult::U16(v) => CellBuffer::U16(v),
        DecodingResult::I16(v) => CellBuffer::I16(v),
        DecodingResult::I32(v) => CellBuffer::I32(v),
        DecodingResult::F32(v) => CellBuffer::F32(v),
        DecodingResult::F64(v) => CellBuffer::F64(v),
        _ => {
            return Err(FetchError::UnsupportedFormat(
                "samples are not u8, u16, i16, i32, f32 or f64".to_string(),
            ))
        }
    };

    let tile = ArrayTile::new(cols as usize, rows as usize, cells)?;
    Ok(GeoTiffBand { tile, extent, crs })
}

fn decoder_limits() -> Limits {
    let mut limits = Limits::default();
    limits.decoding_buffer_size = MAX_BAND_BYTES;
    limits
}

/// Extent from `ModelPixelScale` and the first `ModelTiepoint`.
fn extent_from_tags(
    scale: &[f64],
    tiepoint: &[f64],
    cols: u32,
    rows: u32,
    raster_type: RasterType,
) -> Result<BoundingBox, FetchError> {
    if scale.len() < 2 || tiepoint.len() < 6 {
        return Err(FetchError::Georeference(format!(
            "malformed georeferencing: {} scale values, {} tiepoint values",
            scale.len(),
            tiepoint.len()
        )));
    }
    let (sx, sy) = (scale[0], scale[1]);
    if !(sx > 0.0 && sy > 0.0) {
        return Err(FetchError::Georeference(format!(
            "non-positive pixel scale ({}, {})",
            sx, sy
        )));
    }

    // Tiepoint: raster (I, J, K) to model (X, Y, Z)
    let (mut i, mut j, x, y) = (tiepoint[0], tiepoint[1], tiepoint[3], tiepoint[4]);
    if raster_type == RasterType::PixelIsPoint {
        // Raster coordinates name pixel centers
        i += 0.5;
        j += 0.5;
    }
    let min_x = x - i * sx;
    let max_y = y + j * sy;

    Ok(BoundingBox::new(
        min_x,
        max_y - rows as f64 * sy,
        min_x + cols as f64 * sx,
        max_y,
    ))
}

/// EPSG code from the GeoKey directory, projected or geographic, and the
/// raster type (area unless stated otherwise).
fn crs_from_geokeys(keys: &[u16]) -> Result<(CrsCode, RasterType), FetchError> {
    if keys.len() < 4 {
        return Err(FetchError::Georeference("truncated GeoKey directory".to_string()));
    }
    let count = keys[3] as usize;

    let entries = keys[4..].chunks_exact(4).take(count);
    let mut projected = None;
    let mut geographic = None;
    let mut raster_type = RasterType::default();
    for entry in entries {
        // Key id, tag location (0 = inline), count, value
        let (id, location, value) = (entry[0], entry[1], entry[3]);
        if location != 0 {
            continue;
        }
        match id {
            PROJECTED_CS_TYPE_GEO_KEY => projected = Some(value),
            GEOGRAPHIC_TYPE_GEO_KEY => geographic = Some(value),
            GT_RASTER_TYPE_GEO_KEY if value == RASTER_PIXEL_IS_POINT => {
                raster_type = RasterType::PixelIsPoint
            }
            _ => {}
        }
    }

    let code = projected
        .or(geographic)
        .ok_or_else(|| FetchError::Georeference("no EPSG code in GeoKeys".to_string()))?;
    Ok((epsg_to_crs(code)?, raster_type))
}

fn epsg_to_crs(code: u16) -> Result<CrsCode, FetchError> {
    CrsCode::from_epsg(code as u32)
        .map_err(|e| FetchError::Georeference(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{create_band_cells, encode_geotiff_u16, encode_geotiff_u16_pixel_is_point};

    #[test]
    fn test_decode_fixture_band() {
        let extent = BoundingBox::new(580_000.0, 4_510_000.0, 580_600.0, 4_510_300.0);
        let crs = CrsCode::Utm { zone: 18, north: true };
        let cells = create_band_cells(20, 10, 4);
        let bytes = encode_geotiff_u16(20, 10, &cells, &extent, crs).unwrap();

        let band = decode_band(&bytes).unwrap();
        assert_eq!(band.crs, crs);
        assert_eq!(band.extent, extent);
        assert_eq!(band.tile.cols(), 20);
        assert_eq!(band.tile.rows(), 10);
        assert_eq!(band.tile.cells(), &CellBuffer::U16(cells));
    }

    #[test]
    fn test_extent_from_offset_tiepoint() {
        // Pixel (10, 5) tied to (1000, 2000) with 30 m pixels
        let tiepoint = [10.0, 5.0, 0.0, 1000.0, 2000.0, 0.0];
        let extent =
            extent_from_tags(&[30.0, 30.0, 0.0], &tiepoint, 100, 50, RasterType::PixelIsArea).unwrap();
        assert_eq!(extent, BoundingBox::new(700.0, 650.0, 3700.0, 2150.0));

        // Same tiepoint naming the center of pixel (10, 5)
        let extent =
            extent_from_tags(&[30.0, 30.0, 0.0], &tiepoint, 100, 50, RasterType::PixelIsPoint).unwrap();
        assert_eq!(extent, BoundingBox::new(685.0, 665.0, 3685.0, 2165.0));
    }

    #[test]
    fn test_decode_pixel_is_point_band() {
        // Tiepoint (580015, 4510285) is the center of the top-left pixel
        let extent = BoundingBox::new(580_000.0, 4_510_000.0, 580_300.0, 4_510_300.0);
        let crs = CrsCode::Utm { zone: 18, north: true };
        let cells = create_band_cells(10, 10, 4);
        let bytes = encode_geotiff_u16_pixel_is_point(10, 10, &cells, &extent, crs).unwrap();

        let band = decode_band(&bytes).unwrap();
        assert_eq!(band.extent, extent);
        assert_eq!(band.crs, crs);
    }

    /// Rewrite the declared image size of a single-image TIFF.
    fn with_declared_size(mut bytes: Vec<u8>, cols: u16, rows: u16) -> Vec<u8> {
        let le = &bytes[0..2] == b"II";
        let read_u16 = |b: &[u8], at: usize| {
            let raw = [b[at], b[at + 1]];
            if le { u16::from_le_bytes(raw) } else { u16::from_be_bytes(raw) }
        };
        let raw = [bytes[4], bytes[5], bytes[6], bytes[7]];
        let ifd = (if le { u32::from_le_bytes(raw) } else { u32::from_be_bytes(raw) }) as usize;

        let count = read_u16(&bytes, ifd) as usize;
        for n in 0..count {
            let entry = ifd + 2 + n * 12;
            let value = match read_u16(&bytes, entry) {
                256 => cols as u32,
                257 => rows as u32,
                _ => continue,
            };
            // SHORT values sit in the first two bytes, LONG in all four
            let encoded: Vec<u8> = match (read_u16(&bytes, entry + 2), le) {
                (3, true) => (value as u16).to_le_bytes().to_vec(),
                (3, false) => (value as u16).to_be_bytes().to_vec(),
                (_, true) => value.to_le_bytes().to_vec(),
                (_, false) => value.to_be_bytes().to_vec(),
            };
            bytes[entry + 8..entry + 8 + encoded.len()].copy_from_slice(&encoded);
        }
        bytes
    }

    #[test]
    fn test_oversized_band_is_rejected() {
        let extent = BoundingBox::new(0.0, 0.0, 300.0, 300.0);
        let cells = create_band_cells(10, 10, 4);
        let bytes = encode_geotiff_u16(10, 10, &cells, &extent, CrsCode::Epsg3857).unwrap();

        // 60000 x 60000 u16 cells is far beyond any Landsat band
        let oversized = with_declared_size(bytes, 60_000, 60_000);
        assert!(decode_band(&oversized).is_err());
        assert!(60_000usize * 60_000 * 2 > decoder_limits().decoding_buffer_size);
    }

    #[test]
    fn test_crs_from_geokeys() {
        let projected = [1, 1, 0, 2, 1024, 0, 1, 1, 3072, 0, 1, 32718];
        assert_eq!(
            crs_from_geokeys(&projected).unwrap(),
            (CrsCode::Utm { zone: 18, north: false }, RasterType::PixelIsArea)
        );

        let geographic = [1, 1, 0, 1, 2048, 0, 1, 4326];
        assert_eq!(
            crs_from_geokeys(&geographic).unwrap(),
            (CrsCode::Epsg4326, RasterType::PixelIsArea)
        );

        // Raster type after the CRS key is still picked up
        let point = [1, 1, 0, 2, 3072, 0, 1, 32618, 1025, 0, 1, 2];
        assert_eq!(
            crs_from_geokeys(&point).unwrap(),
            (CrsCode::Utm { zone: 18, north: true }, RasterType::PixelIsPoint)
        );

        let none = [1, 1, 0, 1, 1024, 0, 1, 1];
        assert!(crs_from_geokeys(&none).is_err());
    }

    #[test]
    fn test_garbage_is_decode_error() {
        assert!(matches!(
            decode_band(b"not a tiff"),
            Err(FetchError::Decode(_))
        ));
    }
}
