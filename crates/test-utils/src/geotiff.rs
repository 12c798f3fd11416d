//! Minimal GeoTIFF encoding for fixture band files.
//!
//! Writes a single-band, unsigned 16-bit, uncompressed image georeferenced
//! with a pixel scale, one tiepoint for pixel (0, 0) and a GeoKey directory
//! naming the EPSG code and raster type.

use std::io::Cursor;

use etl_common::{BoundingBox, CrsCode};
use tiff::encoder::colortype::Gray16;
use tiff::encoder::TiffEncoder;
use tiff::tags::Tag;
use tiff::TiffResult;

pub const MODEL_PIXEL_SCALE_TAG: u16 = 33550;
pub const MODEL_TIEPOINT_TAG: u16 = 33922;
pub const GEO_KEY_DIRECTORY_TAG: u16 = 34735;

const GT_MODEL_TYPE_GEO_KEY: u16 = 1024;
const GT_RASTER_TYPE_GEO_KEY: u16 = 1025;
const GEOGRAPHIC_TYPE_GEO_KEY: u16 = 2048;
const PROJECTED_CS_TYPE_GEO_KEY: u16 = 3072;

const MODEL_TYPE_PROJECTED: u16 = 1;
const MODEL_TYPE_GEOGRAPHIC: u16 = 2;
const RASTER_PIXEL_IS_AREA: u16 = 1;
const RASTER_PIXEL_IS_POINT: u16 = 2;

/// Encode a band as an in-memory GeoTIFF, tied at the top-left corner of
/// the first pixel (`RasterPixelIsArea`).
pub fn encode_geotiff_u16(
    cols: u32,
    rows: u32,
    cells: &[u16],
    extent: &BoundingBox,
    crs: CrsCode,
) -> TiffResult<Vec<u8>> {
    encode(cols, rows, cells, extent, crs, RASTER_PIXEL_IS_AREA)
}

/// Encode a band tied at the center of the first pixel
/// (`RasterPixelIsPoint`), as Landsat band files are.
pub fn encode_geotiff_u16_pixel_is_point(
    cols: u32,
    rows: u32,
    cells: &[u16],
    extent: &BoundingBox,
    crs: CrsCode,
) -> TiffResult<Vec<u8>> {
    encode(cols, rows, cells, extent, crs, RASTER_PIXEL_IS_POINT)
}

fn encode(
    cols: u32,
    rows: u32,
    cells: &[u16],
    extent: &BoundingBox,
    crs: CrsCode,
    raster_type: u16,
) -> TiffResult<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut encoder = TiffEncoder::new(&mut cursor)?;
        let mut image = encoder.new_image::<Gray16>(cols, rows)?;

        let scale = [
            extent.width() / cols as f64,
            extent.height() / rows as f64,
            0.0,
        ];
        let (x, y) = if raster_type == RASTER_PIXEL_IS_POINT {
            (extent.min_x + scale[0] / 2.0, extent.max_y - scale[1] / 2.0)
        } else {
            (extent.min_x, extent.max_y)
        };
        let tiepoint = [0.0, 0.0, 0.0, x, y, 0.0];
        let geokeys = geokey_directory(crs, raster_type);

        let dir = image.encoder();
        dir.write_tag(Tag::Unknown(MODEL_PIXEL_SCALE_TAG), &scale[..])?;
        dir.write_tag(Tag::Unknown(MODEL_TIEPOINT_TAG), &tiepoint[..])?;
        dir.write_tag(Tag::Unknown(GEO_KEY_DIRECTORY_TAG), geokeys.as_slice())?;

        image.write_data(cells)?;
    }
    Ok(cursor.into_inner())
}

fn geokey_directory(crs: CrsCode, raster_type: u16) -> Vec<u16> {
    // Header: version, revision, minor revision, key count
    let mut keys = vec![1, 1, 0, 3];
    let code = crs.epsg() as u16;

    if crs.is_geographic() {
        keys.extend_from_slice(&[GT_MODEL_TYPE_GEO_KEY, 0, 1, MODEL_TYPE_GEOGRAPHIC]);
        keys.extend_from_slice(&[GT_RASTER_TYPE_GEO_KEY, 0, 1, raster_type]);
        keys.extend_from_slice(&[GEOGRAPHIC_TYPE_GEO_KEY, 0, 1, code]);
    } else {
        keys.extend_from_slice(&[GT_MODEL_TYPE_GEO_KEY, 0, 1, MODEL_TYPE_PROJECTED]);
        keys.extend_from_slice(&[GT_RASTER_TYPE_GEO_KEY, 0, 1, raster_type]);
        keys.extend_from_slice(&[PROJECTED_CS_TYPE_GEO_KEY, 0, 1, code]);
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiff::decoder::{Decoder, DecodingResult};

    #[test]
    fn test_encoded_file_decodes() {
        let extent = BoundingBox::new(580_000.0, 4_500_000.0, 580_300.0, 4_500_600.0);
        let cells: Vec<u16> = (1..=200).collect();
        let crs = CrsCode::Utm { zone: 18, north: true };
        let bytes = encode_geotiff_u16(10, 20, &cells, &extent, crs).unwrap();

        let mut decoder = Decoder::new(Cursor::new(bytes)).unwrap();
        assert_eq!(decoder.dimensions().unwrap(), (10, 20));

        let scale = decoder
            .get_tag_f64_vec(Tag::Unknown(MODEL_PIXEL_SCALE_TAG))
            .unwrap();
        assert_eq!(scale, vec![30.0, 30.0, 0.0]);

        let keys = decoder
            .get_tag_u16_vec(Tag::Unknown(GEO_KEY_DIRECTORY_TAG))
            .unwrap();
        assert_eq!(keys[keys.len() - 1], 32618);

        match decoder.read_image().unwrap() {
            DecodingResult::U16(data) => assert_eq!(data, cells),
            other => panic!("unexpected decoding result {:?}", other),
        }
    }

    #[test]
    fn test_pixel_is_point_ties_pixel_center() {
        let extent = BoundingBox::new(580_000.0, 4_510_000.0, 580_300.0, 4_510_300.0);
        let cells = vec![1u16; 100];
        let crs = CrsCode::Utm { zone: 18, north: true };
        let bytes = encode_geotiff_u16_pixel_is_point(10, 10, &cells, &extent, crs).unwrap();

        let mut decoder = Decoder::new(Cursor::new(bytes)).unwrap();
        let tiepoint = decoder
            .get_tag_f64_vec(Tag::Unknown(MODEL_TIEPOINT_TAG))
            .unwrap();
        assert_eq!(&tiepoint[3..5], &[580_015.0, 4_510_285.0]);

        let keys = decoder
            .get_tag_u16_vec(Tag::Unknown(GEO_KEY_DIRECTORY_TAG))
            .unwrap();
        assert!(keys.chunks(4).any(|k| k == [GT_RASTER_TYPE_GEO_KEY, 0, 1, RASTER_PIXEL_IS_POINT]));
    }
}
