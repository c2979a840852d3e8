//! Coefficient scan tables

use crate::types::TransformSize;
use crate::unpack::ScanOrder;

/// H.264 Table 8-12, 4x4 frame (zig-zag) scan: scan position to (row, col).
static ZIGZAG_4X4: [(u8, u8); 16] = [
    (0, 0),
    (0, 1),
    (1, 0),
    (2, 0),
    (1, 1),
    (0, 2),
    (0, 3),
    (1, 2),
    (2, 1),
    (3, 0),
    (3, 1),
    (2, 2),
    (1, 3),
    (2, 3),
    (3, 2),
    (3, 3),
];

/// H.264 Table 8-12, 4x4 field scan: scan position to (row, col).
static FIELD_4X4: [(u8, u8); 16] = [
    (0, 0),
    (1, 0),
    (0, 1),
    (2, 0),
    (3, 0),
    (1, 1),
    (2, 1),
    (3, 1),
    (0, 2),
    (1, 2),
    (2, 2),
    (3, 2),
    (0, 3),
    (1, 3),
    (2, 3),
    (3, 3),
];

/// H.264 Table 8-13, 8x8 frame (zig-zag) scan: scan position to (row, col).
static ZIGZAG_8X8: [(u8, u8); 64] = [
    (0, 0),
    (0, 1),
    (1, 0),
    (2, 0),
    (1, 1),
    (0, 2),
    (0, 3),
    (1, 2),
    (2, 1),
    (3, 0),
    (4, 0),
    (3, 1),
    (2, 2),
    (1, 3),
    (0, 4),
    (0, 5),
    (1, 4),
    (2, 3),
    (3, 2),
    (4, 1),
    (5, 0),
    (6, 0),
    (5, 1),
    (4, 2),
    (3, 3),
    (2, 4),
    (1, 5),
    (0, 6),
    (0, 7),
    (1, 6),
    (2, 5),
    (3, 4),
    (4, 3),
    (5, 2),
    (6, 1),
    (7, 0),
    (7, 1),
    (6, 2),
    (5, 3),
    (4, 4),
    (3, 5),
    (2, 6),
    (1, 7),
    (2, 7),
    (3, 6),
    (4, 5),
    (5, 4),
    (6, 3),
    (7, 2),
    (7, 3),
    (6, 4),
    (5, 5),
    (4, 6),
    (3, 7),
    (4, 7),
    (5, 6),
    (6, 5),
    (7, 4),
    (7, 5),
    (6, 6),
    (5, 7),
    (6, 7),
    (7, 6),
    (7, 7),
];

/// H.264 Table 8-13, 8x8 field scan: scan position to (row, col).
static FIELD_8X8: [(u8, u8); 64] = [
    (0, 0),
    (1, 0),
    (2, 0),
    (0, 1),
    (1, 1),
    (3, 0),
    (4, 0),
    (2, 1),
    (0, 2),
    (3, 1),
    (5, 0),
    (6, 0),
    (7, 0),
    (4, 1),
    (1, 2),
    (0, 3),
    (2, 2),
    (5, 1),
    (6, 1),
    (7, 1),
    (3, 2),
    (1, 3),
    (0, 4),
    (2, 3),
    (4, 2),
    (5, 2),
    (6, 2),
    (7, 2),
    (3, 3),
    (1, 4),
    (0, 5),
    (2, 4),
    (4, 3),
    (5, 3),
    (6, 3),
    (7, 3),
    (3, 4),
    (1, 5),
    (0, 6),
    (2, 5),
    (4, 4),
    (5, 4),
    (6, 4),
    (7, 4),
    (3, 5),
    (1, 6),
    (2, 6),
    (4, 5),
    (5, 5),
    (6, 5),
    (7, 5),
    (3, 6),
    (0, 7),
    (1, 7),
    (4, 6),
    (5, 6),
    (6, 6),
    (7, 6),
    (2, 7),
    (3, 7),
    (4, 7),
    (5, 7),
    (6, 7),
    (7, 7),
];

/// Invert a scan table into a raster index to scan position lookup.
fn invert(table: &[(u8, u8)], side: usize) -> Vec<u8> {
    let mut inverse = vec![0; table.len()];

    for (scan_pos, &(row, col)) in table.iter().enumerate() {
        inverse[row as usize * side + col as usize] = scan_pos as u8;
    }

    inverse
}

lazy_static! {
    static ref RASTER_ZIGZAG_4X4: Vec<u8> = invert(&ZIGZAG_4X4, 4);
    static ref RASTER_FIELD_4X4: Vec<u8> = invert(&FIELD_4X4, 4);
    static ref RASTER_ZIGZAG_8X8: Vec<u8> = invert(&ZIGZAG_8X8, 8);
    static ref RASTER_FIELD_8X8: Vec<u8> = invert(&FIELD_8X8, 8);
}

/// Get the table mapping scan positions to (row, col) for a block.
pub fn scan_table(transform: TransformSize, order: ScanOrder) -> &'static [(u8, u8)] {
    match (transform, order) {
        (TransformSize::Transform4x4, ScanOrder::Frame) => &ZIGZAG_4X4[..],
        (TransformSize::Transform4x4, ScanOrder::Field) => &FIELD_4X4[..],
        (TransformSize::Transform8x8, ScanOrder::Frame) => &ZIGZAG_8X8[..],
        (TransformSize::Transform8x8, ScanOrder::Field) => &FIELD_8X8[..],
    }
}

/// Get the table mapping raster indices (`row * side + col`) back to scan
/// positions for a block.
pub fn raster_table(transform: TransformSize, order: ScanOrder) -> &'static [u8] {
    match (transform, order) {
        (TransformSize::Transform4x4, ScanOrder::Frame) => RASTER_ZIGZAG_4X4.as_slice(),
        (TransformSize::Transform4x4, ScanOrder::Field) => RASTER_FIELD_4X4.as_slice(),
        (TransformSize::Transform8x8, ScanOrder::Frame) => RASTER_ZIGZAG_8X8.as_slice(),
        (TransformSize::Transform8x8, ScanOrder::Field) => RASTER_FIELD_8X8.as_slice(),
    }
}
