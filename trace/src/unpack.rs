//! Coefficient matrix reconstruction
//!
//! Coefficients are recorded in the order the decoder scanned them. These
//! functions put them back at their (row, col) frequency position so that
//! analysis code can address them spatially. No arithmetic is performed on
//! the coefficients themselves.

mod scan;

use crate::error::{Error, Result};
use crate::types::{Macroblock, MacroblockFlag, PictureStructure, Plane, TransformSize};
use std::ops::Index;

pub use scan::{raster_table, scan_table};

/// Which coefficient scan a block was coded with.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScanOrder {
    /// Zig-zag scan, used for frame macroblocks.
    Frame,

    /// Field scan, used for field pictures and field macroblocks.
    Field,
}

impl ScanOrder {
    /// Determine which scan the blocks of a macroblock were coded with.
    pub fn for_macroblock(structure: PictureStructure, macroblock: &Macroblock) -> Self {
        if structure.is_field() || macroblock.flags.contains(MacroblockFlag::FIELD_DECODING) {
            Self::Field
        } else {
            Self::Frame
        }
    }
}

impl Default for ScanOrder {
    fn default() -> Self {
        Self::Frame
    }
}

/// A square block of coefficients in raster order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoefficientMatrix {
    transform: TransformSize,

    /// Row-major (`row * side + col`) coefficients.
    data: Vec<i32>,
}

impl CoefficientMatrix {
    /// The width and height of the matrix.
    pub fn size(&self) -> usize {
        self.transform.side()
    }

    pub fn transform(&self) -> TransformSize {
        self.transform
    }

    /// Get the coefficient at a given frequency position.
    pub fn get(&self, row: usize, col: usize) -> Option<i32> {
        let side = self.size();

        if row < side && col < side {
            Some(self.data[row * side + col])
        } else {
            None
        }
    }

    /// Get one row of the matrix.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of range.
    pub fn row(&self, row: usize) -> &[i32] {
        let side = self.size();

        &self.data[row * side..(row + 1) * side]
    }

    /// Iterate over the rows of the matrix, top to bottom.
    pub fn rows(&self) -> std::slice::ChunksExact<'_, i32> {
        self.data.chunks_exact(self.size())
    }

    /// All coefficients in row-major order.
    pub fn as_slice(&self) -> &[i32] {
        &self.data
    }

    pub fn to_rows(&self) -> Vec<Vec<i32>> {
        self.rows().map(|row| row.to_vec()).collect()
    }

    pub fn into_vec(self) -> Vec<i32> {
        self.data
    }
}

impl Index<(usize, usize)> for CoefficientMatrix {
    type Output = i32;

    fn index(&self, (row, col): (usize, usize)) -> &i32 {
        assert!(col < self.size(), "column {} out of range", col);

        &self.row(row)[col]
    }
}

/// Reorder the zig-zag scanned coefficients of one block into a raster
/// matrix.
///
/// `values` must hold exactly `plane.block_size()` coefficients; otherwise
/// `Error::SizeMismatch` is returned.
pub fn unpack(plane: Plane, values: &[i32]) -> Result<CoefficientMatrix> {
    unpack_with_scan(plane, values, ScanOrder::Frame)
}

/// Reorder the scanned coefficients of one block into a raster matrix, using
/// a particular scan.
pub fn unpack_with_scan(
    plane: Plane,
    values: &[i32],
    order: ScanOrder,
) -> Result<CoefficientMatrix> {
    let transform = plane.transform();
    let expected = transform.block_size();

    if values.len() != expected {
        return Err(Error::SizeMismatch {
            expected,
            found: values.len(),
        });
    }

    let side = transform.side();
    let mut data = vec![0; expected];

    for (value, &(row, col)) in values.iter().zip(scan_table(transform, order)) {
        data[row as usize * side + col as usize] = *value;
    }

    Ok(CoefficientMatrix { transform, data })
}

/// Serialize a matrix back into scan order.
///
/// This is the inverse of `unpack_with_scan` for the same `order`.
pub fn pack(matrix: &CoefficientMatrix, order: ScanOrder) -> Vec<i32> {
    let side = matrix.size();

    scan_table(matrix.transform, order)
        .iter()
        .map(|&(row, col)| matrix.data[row as usize * side + col as usize])
        .collect()
}

/// Get the scan position of a frequency position within a block.
///
/// Yields `None` if `(row, col)` lies outside the block.
pub fn scan_position(
    transform: TransformSize,
    order: ScanOrder,
    row: usize,
    col: usize,
) -> Option<usize> {
    let side = transform.side();

    if row < side && col < side {
        Some(raster_table(transform, order)[row * side + col] as usize)
    } else {
        None
    }
}
