//! Macroblock and coefficient set records

use crate::error::{Error, Result};
use crate::parser::options::{ReaderConfig, ReaderOption};
use crate::parser::reader::TraceReader;
use crate::traits::ByteReadable;
use crate::types::{DctCoefficientSet, DctCoefficients, Macroblock, MacroblockFlag, Plane};
use std::io::Read;
use std::mem::size_of;

/// Reads a macroblock record and its coefficient sets.
///
/// The macroblock takes its explicit address if the trace carries one (and
/// `ReaderOption::IMPLICIT_ADDRESSES` is not set); otherwise it is given
/// `next_address`. Either way, `next_address` is left pointing just past the
/// macroblock.
pub fn decode_macroblock<R>(
    reader: &mut TraceReader<R>,
    config: &ReaderConfig,
    next_address: &mut u32,
) -> Result<Macroblock>
where
    R: Read,
{
    let flags = MacroblockFlag::from_bits(reader.read_u8()?)
        .ok_or(Error::CorruptFraming("reserved macroblock flags"))?;

    let mut address = *next_address;
    if flags.contains(MacroblockFlag::EXPLICIT_ADDRESS) {
        let explicit = reader.read_le::<u32>()?;

        if !config.options.contains(ReaderOption::IMPLICIT_ADDRESSES) {
            address = explicit;
        }
    }
    *next_address = address.saturating_add(1);

    let count = reader.read_count(
        config.limits.max_coefficient_sets,
        "coefficient set count",
    )?;

    let mut sets = Vec::with_capacity(count);
    for _ in 0..count {
        sets.push(decode_coefficient_set(reader)?);
    }

    let dct_coeffs = DctCoefficients::new(sets)
        .map_err(|_| Error::CorruptFraming("plane repeated within a macroblock"))?;

    Ok(Macroblock {
        address,
        flags,
        dct_coeffs,
    })
}

/// Reads one coefficient set: a plane identifier, a value count, and that many
/// signed 32-bit coefficients in scan order.
///
/// The value count must be exactly the block size of the plane. A negative
/// count is corrupt framing; any other mismatch is a malformed block.
pub fn decode_coefficient_set<R>(reader: &mut TraceReader<R>) -> Result<DctCoefficientSet>
where
    R: Read,
{
    let plane_id = reader.read_u8()?;
    let plane = Plane::from_u8(plane_id).ok_or(Error::UnknownPlane(plane_id))?;

    let length: i32 = reader.read_le()?;
    if length < 0 {
        return Err(Error::CorruptFraming("negative coefficient count"));
    }

    if length as usize != plane.block_size() {
        return Err(Error::MalformedCoefficientBlock {
            plane,
            length: length.into(),
        });
    }

    let mut raw = vec![0; plane.block_size() * size_of::<i32>()];
    reader.read_bytes(&mut raw)?;

    let values = raw
        .chunks_exact(size_of::<i32>())
        .map(i32::from_le_slice)
        .collect();

    Ok(DctCoefficientSet { plane, values })
}
