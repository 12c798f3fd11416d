//! Interpolation methods for raster resampling.
//!
//! Sample positions are fractional grid coordinates where pixel `(i, j)`
//! spans `[i, i + 1) x [j, j + 1)`, so pixel centers sit at `+0.5`.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::tile::CellValue;

/// Resampling method used when reprojecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleMethod {
    /// Nearest neighbor (preserves exact values).
    #[default]
    Nearest,
    /// Bilinear interpolation (smooth, slight value changes).
    Bilinear,
}

impl FromStr for ResampleMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nearest" | "nearest_neighbor" => Ok(Self::Nearest),
            "bilinear" => Ok(Self::Bilinear),
            other => Err(format!("unknown resample method: {}", other)),
        }
    }
}

impl std::fmt::Display for ResampleMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nearest => write!(f, "nearest"),
            Self::Bilinear => write!(f, "bilinear"),
        }
    }
}

fn is_no_data(value: f64, no_data: f64) -> bool {
    if no_data.is_nan() {
        value.is_nan()
    } else {
        value == no_data
    }
}

/// Nearest neighbor interpolation.
///
/// Returns the value of the pixel containing `(x, y)`, or `None` outside
/// the grid.
pub fn nearest_interpolate<T: CellValue>(
    data: &[T],
    width: usize,
    height: usize,
    x: f64,
    y: f64,
) -> Option<f64> {
    if !(x >= 0.0 && y >= 0.0) {
        return None;
    }
    let col = x.floor() as usize;
    let row = y.floor() as usize;

    if col >= width || row >= height {
        return None;
    }

    Some(data[row * width + col].to_f64())
}

/// Bilinear interpolation.
///
/// Smoothly interpolates between the four nearest pixel centers. Falls back
/// to nearest neighbor when any of the four is no-data, so no-data never
/// bleeds into valid cells.
pub fn bilinear_interpolate<T: CellValue>(
    data: &[T],
    width: usize,
    height: usize,
    x: f64,
    y: f64,
    no_data: f64,
) -> Option<f64> {
    let nearest = nearest_interpolate(data, width, height, x, y)?;

    let cx = (x - 0.5).clamp(0.0, (width - 1) as f64);
    let cy = (y - 0.5).clamp(0.0, (height - 1) as f64);

    let x0 = cx.floor() as usize;
    let y0 = cy.floor() as usize;
    let x1 = (x0 + 1).min(width - 1);
    let y1 = (y0 + 1).min(height - 1);

    let xf = cx - x0 as f64;
    let yf = cy - y0 as f64;

    let v00 = data[y0 * width + x0].to_f64();
    let v10 = data[y0 * width + x1].to_f64();
    let v01 = data[y1 * width + x0].to_f64();
    let v11 = data[y1 * width + x1].to_f64();

    if [v00, v10, v01, v11].iter().any(|&v| is_no_data(v, no_data)) {
        return Some(nearest);
    }

    // Bilinear interpolation formula
    let top = v00 * (1.0 - xf) + v10 * xf;
    let bottom = v01 * (1.0 - xf) + v11 * xf;
    Some(top * (1.0 - yf) + bottom * yf)
}

/// Sample a grid with the given method.
pub fn interpolate<T: CellValue>(
    method: ResampleMethod,
    data: &[T],
    width: usize,
    height: usize,
    x: f64,
    y: f64,
    no_data: f64,
) -> Option<f64> {
    match method {
        ResampleMethod::Nearest => nearest_interpolate(data, width, height, x, y),
        ResampleMethod::Bilinear => bilinear_interpolate(data, width, height, x, y, no_data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_interpolate() {
        let data: Vec<u16> = vec![1, 2, 3, 4, 5, 6, 7, 8, 9];

        assert_eq!(nearest_interpolate(&data, 3, 3, 0.2, 0.9), Some(1.0));
        assert_eq!(nearest_interpolate(&data, 3, 3, 1.5, 1.5), Some(5.0));
        assert_eq!(nearest_interpolate(&data, 3, 3, 2.99, 2.0), Some(9.0));
        assert_eq!(nearest_interpolate(&data, 3, 3, 3.0, 0.0), None);
        assert_eq!(nearest_interpolate(&data, 3, 3, -0.1, 0.0), None);
        assert_eq!(nearest_interpolate(&data, 3, 3, f64::NAN, 0.0), None);
    }

    #[test]
    fn test_bilinear_interpolate() {
        let data: Vec<f32> = vec![0.0, 10.0, 20.0, 30.0];

        // Pixel centers reproduce the stored values
        assert_eq!(bilinear_interpolate(&data, 2, 2, 0.5, 0.5, f64::NAN), Some(0.0));
        assert_eq!(bilinear_interpolate(&data, 2, 2, 1.5, 1.5, f64::NAN), Some(30.0));

        // Midway between all four centers
        assert_eq!(bilinear_interpolate(&data, 2, 2, 1.0, 1.0, f64::NAN), Some(15.0));
    }

    #[test]
    fn test_bilinear_with_no_data_falls_back() {
        let data: Vec<u16> = vec![0, 100, 100, 100];
        // Pixel (1, 1) holds 100; its bilinear neighbourhood touches no-data 0.
        assert_eq!(bilinear_interpolate(&data, 2, 2, 1.2, 1.2, 0.0), Some(100.0));
        assert_eq!(bilinear_interpolate(&data, 2, 2, 0.4, 0.4, 0.0), Some(0.0));
    }

    #[test]
    fn test_parse_method() {
        assert_eq!("Bilinear".parse::<ResampleMethod>().unwrap(), ResampleMethod::Bilinear);
        assert_eq!("nearest".parse::<ResampleMethod>().unwrap(), ResampleMethod::Nearest);
        assert!("cubic".parse::<ResampleMethod>().is_err());
    }
}
