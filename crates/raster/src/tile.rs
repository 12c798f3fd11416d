//! Single-band tiles stored in their native numeric encoding.

use etl_common::CellType;

use crate::error::{RasterError, Result};

/// A numeric type a tile cell can hold.
pub trait CellValue: Copy + Send + Sync + PartialEq + 'static {
    /// Convert from `f64`, rounding and saturating for integer types.
    fn from_f64(value: f64) -> Self;
    fn to_f64(self) -> f64;
}

macro_rules! int_cell_value {
    ($($t:ty),*) => {
        $(
            impl CellValue for $t {
                fn from_f64(value: f64) -> Self {
                    value.round().clamp(<$t>::MIN as f64, <$t>::MAX as f64) as $t
                }

                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

int_cell_value!(u8, u16, i16, i32);

impl CellValue for f32 {
    fn from_f64(value: f64) -> Self {
        value as f32
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl CellValue for f64 {
    fn from_f64(value: f64) -> Self {
        value
    }

    fn to_f64(self) -> f64 {
        self
    }
}

/// Row-major cell storage, one variant per [`CellType`].
#[derive(Debug, Clone, PartialEq)]
pub enum CellBuffer {
    U8(Vec<u8>),
    U16(Vec<u16>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

/// Run `$body` with `$v` bound to the inner vector, whatever its type.
macro_rules! with_cells {
    ($buf:expr, $v:ident => $body:expr) => {
        match $buf {
            CellBuffer::U8($v) => $body,
            CellBuffer::U16($v) => $body,
            CellBuffer::I16($v) => $body,
            CellBuffer::I32($v) => $body,
            CellBuffer::F32($v) => $body,
            CellBuffer::F64($v) => $body,
        }
    };
}

/// Like `with_cells!`, rewrapping the resulting vector in the same variant.
macro_rules! map_cells {
    ($buf:expr, $v:ident => $body:expr) => {
        match $buf {
            CellBuffer::U8($v) => CellBuffer::U8($body),
            CellBuffer::U16($v) => CellBuffer::U16($body),
            CellBuffer::I16($v) => CellBuffer::I16($body),
            CellBuffer::I32($v) => CellBuffer::I32($body),
            CellBuffer::F32($v) => CellBuffer::F32($body),
            CellBuffer::F64($v) => CellBuffer::F64($body),
        }
    };
}

pub(crate) use map_cells;
pub(crate) use with_cells;

impl CellBuffer {
    /// A buffer of `len` cells all set to `value`.
    pub fn filled(cell_type: CellType, len: usize, value: f64) -> Self {
        fn fill<T: CellValue>(len: usize, value: f64) -> Vec<T> {
            vec![T::from_f64(value); len]
        }

        match cell_type {
            CellType::Uint8 => CellBuffer::U8(fill(len, value)),
            CellType::Uint16 => CellBuffer::U16(fill(len, value)),
            CellType::Int16 => CellBuffer::I16(fill(len, value)),
            CellType::Int32 => CellBuffer::I32(fill(len, value)),
            CellType::Float32 => CellBuffer::F32(fill(len, value)),
            CellType::Float64 => CellBuffer::F64(fill(len, value)),
        }
    }

    pub fn cell_type(&self) -> CellType {
        match self {
            CellBuffer::U8(_) => CellType::Uint8,
            CellBuffer::U16(_) => CellType::Uint16,
            CellBuffer::I16(_) => CellType::Int16,
            CellBuffer::I32(_) => CellType::Int32,
            CellBuffer::F32(_) => CellType::Float32,
            CellBuffer::F64(_) => CellType::Float64,
        }
    }

    pub fn len(&self) -> usize {
        with_cells!(self, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get_f64(&self, index: usize) -> f64 {
        with_cells!(self, v => v[index].to_f64())
    }

    fn set_f64(&mut self, index: usize, value: f64) {
        with_cells!(self, v => v[index] = CellValue::from_f64(value))
    }
}

/// A single band of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayTile {
    cols: usize,
    rows: usize,
    cells: CellBuffer,
}

impl ArrayTile {
    /// Wrap a cell buffer, checking it holds exactly `cols * rows` cells.
    pub fn new(cols: usize, rows: usize, cells: CellBuffer) -> Result<Self> {
        if cols == 0 || rows == 0 {
            return Err(RasterError::invalid_dimensions(cols, rows));
        }
        if cells.len() != cols * rows {
            return Err(RasterError::DataLength {
                expected: cols * rows,
                actual: cells.len(),
            });
        }
        Ok(Self { cols, rows, cells })
    }

    /// A tile with every cell set to the cell type's no-data value.
    pub fn empty(cell_type: CellType, cols: usize, rows: usize) -> Result<Self> {
        if cols == 0 || rows == 0 {
            return Err(RasterError::invalid_dimensions(cols, rows));
        }
        let cells = CellBuffer::filled(cell_type, cols * rows, cell_type.no_data());
        Ok(Self { cols, rows, cells })
    }

    /// Unsigned 16-bit tile, the encoding of Landsat band files.
    pub fn from_u16(cols: usize, rows: usize, cells: Vec<u16>) -> Result<Self> {
        Self::new(cols, rows, CellBuffer::U16(cells))
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell_type(&self) -> CellType {
        self.cells.cell_type()
    }

    pub fn cells(&self) -> &CellBuffer {
        &self.cells
    }

    /// Cell value as `f64`. Panics when out of bounds.
    pub fn get_double(&self, col: usize, row: usize) -> f64 {
        self.cells.get_f64(row * self.cols + col)
    }

    /// Set a cell from an `f64`, converting to the tile's encoding.
    pub fn set_double(&mut self, col: usize, row: usize, value: f64) {
        self.cells.set_f64(row * self.cols + col, value)
    }

    /// Check whether a value is this tile's no-data sentinel.
    pub fn is_no_data_value(&self, value: f64) -> bool {
        let nd = self.cell_type().no_data();
        if nd.is_nan() {
            value.is_nan()
        } else {
            value == nd
        }
    }

    pub fn is_no_data(&self, col: usize, row: usize) -> bool {
        self.is_no_data_value(self.get_double(col, row))
    }

    /// Number of cells holding data.
    pub fn data_count(&self) -> usize {
        (0..self.rows)
            .flat_map(|row| (0..self.cols).map(move |col| (col, row)))
            .filter(|&(col, row)| !self.is_no_data(col, row))
            .count()
    }

    /// Copy out a window of cells.
    pub fn crop(&self, col: usize, row: usize, cols: usize, rows: usize) -> Result<ArrayTile> {
        if cols == 0 || rows == 0 || col + cols > self.cols || row + rows > self.rows {
            return Err(RasterError::WindowOutOfBounds {
                col,
                row,
                cols,
                rows,
                tile_cols: self.cols,
                tile_rows: self.rows,
            });
        }

        let src_cols = self.cols;
        let cells = map_cells!(&self.cells, v => crop_cells(v, src_cols, col, row, cols, rows));
        Ok(ArrayTile { cols, rows, cells })
    }
}

fn crop_cells<T: Copy>(
    src: &[T],
    src_cols: usize,
    col: usize,
    row: usize,
    cols: usize,
    rows: usize,
) -> Vec<T> {
    let mut out = Vec::with_capacity(cols * rows);
    for r in row..row + rows {
        let start = r * src_cols + col;
        out.extend_from_slice(&src[start..start + cols]);
    }
    out
}
