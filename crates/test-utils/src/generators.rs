//! Test data generators for creating synthetic Landsat-like band data.
//!
//! These generators create predictable, verifiable test data patterns
//! that can be used across the test suite.

/// Creates a band with predictable, never-zero values.
///
/// Each cell value is `1 + band * 1000 + (col + row) % 997`, so every
/// band is distinguishable and no cell collides with the `0` no-data value
/// of Landsat's unsigned 16-bit encoding.
///
/// # Example
///
/// ```
/// use test_utils::create_band_cells;
///
/// let cells = create_band_cells(10, 5, 2);
/// assert_eq!(cells.len(), 50);
/// assert_eq!(cells[0], 2001);
/// assert_eq!(cells[11], 2003); // col=1, row=1
/// ```
pub fn create_band_cells(width: usize, height: usize, band: u16) -> Vec<u16> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push(1 + band * 1000 + ((col + row) % 997) as u16);
        }
    }
    data
}

/// Creates a band whose outer `collar` pixels are no-data (`0`).
///
/// Landsat band files are north-up rectangles around a rotated scene, so
/// their borders hold no data.
pub fn create_collared_band_cells(width: usize, height: usize, band: u16, collar: usize) -> Vec<u16> {
    let mut data = create_band_cells(width, height, band);
    for row in 0..height {
        for col in 0..width {
            let inside = col >= collar
                && row >= collar
                && col + collar < width
                && row + collar < height;
            if !inside {
                data[row * width + col] = 0;
            }
        }
    }
    data
}

/// Creates a band with every cell set to `value`.
pub fn create_constant_cells(width: usize, height: usize, value: u16) -> Vec<u16> {
    vec![value; width * height]
}
