//! Slice records

use crate::error::Result;
use crate::parser::macroblock::decode_macroblock;
use crate::parser::options::ReaderConfig;
use crate::parser::reader::TraceReader;
use crate::types::{Slice, SliceType};
use std::io::Read;

/// Reads a slice record and all of its macroblocks.
///
/// `next_address` is the address the next implicitly-addressed macroblock of
/// the current subpicture will receive. It is advanced past every macroblock
/// read here.
pub fn decode_slice<R>(
    reader: &mut TraceReader<R>,
    config: &ReaderConfig,
    next_address: &mut u32,
) -> Result<Slice>
where
    R: Read,
{
    let slice_type = SliceType::from_u8(reader.read_u8()?);
    let count = reader.read_count(config.limits.max_macroblocks, "macroblock count")?;

    log::trace!(
        "{:?} slice with {} macroblocks starting at address {}",
        slice_type,
        count,
        next_address
    );

    let mut macroblocks = Vec::new();
    for _ in 0..count {
        macroblocks.push(decode_macroblock(reader, config, next_address)?);
    }

    Ok(Slice {
        slice_type,
        macroblocks,
    })
}
