//! Spherical Web Mercator projection (EPSG:3857).
//!
//! Uses the WGS84 semi-major axis as the sphere radius, as web map tiles
//! do. Latitudes beyond ±85.0511° have no finite image and are clamped.

use std::f64::consts::PI;

/// Sphere radius used by Web Mercator (meters).
pub const EARTH_RADIUS: f64 = 6378137.0;

/// Latitude at which the projected square world ends.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Web Mercator projection.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebMercator;

impl WebMercator {
    /// Project lon/lat degrees to meters. Latitude is clamped to [`MAX_LATITUDE`].
    pub fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
        let x = EARTH_RADIUS * lon.to_radians();
        let y = EARTH_RADIUS * (PI / 4.0 + lat.to_radians() / 2.0).tan().ln();
        (x, y)
    }

    /// Unproject meters to lon/lat degrees.
    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let lon = (x / EARTH_RADIUS).to_degrees();
        let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();
        (lon, lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use etl_common::crs::WEB_MERCATOR_MAX_EXTENT;

    #[test]
    fn test_origin() {
        let (x, y) = WebMercator.forward(0.0, 0.0);
        assert!(x.abs() < 1e-9);
        assert!(y.abs() < 1e-9);
    }

    #[test]
    fn test_world_corner() {
        let (x, y) = WebMercator.forward(180.0, MAX_LATITUDE);
        assert!((x - WEB_MERCATOR_MAX_EXTENT).abs() < 1e-3);
        assert!((y - WEB_MERCATOR_MAX_EXTENT).abs() < 1e-3);

        // Poles clamp to the square world edge instead of going infinite.
        let (_, y_pole) = WebMercator.forward(0.0, 90.0);
        assert!((y_pole - WEB_MERCATOR_MAX_EXTENT).abs() < 1e-3);
    }

    #[test]
    fn test_roundtrip() {
        for &(lon, lat) in &[(-74.0, 40.7), (139.7, 35.7), (-0.1, 51.5), (151.2, -33.9)] {
            let (x, y) = WebMercator.forward(lon, lat);
            let (lon2, lat2) = WebMercator.inverse(x, y);
            assert!((lon - lon2).abs() < 1e-9, "lon {} vs {}", lon, lon2);
            assert!((lat - lat2).abs() < 1e-9, "lat {} vs {}", lat, lat2);
        }
    }
}
