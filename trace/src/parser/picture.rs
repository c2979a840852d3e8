//! Picture and subpicture records

use crate::error::{Error, Result};
use crate::parser::options::ReaderConfig;
use crate::parser::reader::TraceReader;
use crate::parser::slice::decode_slice;
use crate::types::{Picture, PictureStructure, Subpicture};
use std::io::Read;

/// Reads a picture record and everything nested inside it.
///
/// Every picture holds at least one subpicture; a picture that declares none
/// is rejected as corrupt framing.
pub fn decode_picture<R>(reader: &mut TraceReader<R>, config: &ReaderConfig) -> Result<Picture>
where
    R: Read,
{
    let count = reader.read_count(config.limits.max_subpictures, "subpicture count")?;
    if count == 0 {
        return Err(Error::CorruptFraming("picture without subpictures"));
    }

    let mut subpictures = Vec::with_capacity(count);
    for _ in 0..count {
        subpictures.push(decode_subpicture(reader, config)?);
    }

    Ok(Picture { subpictures })
}

/// Reads a subpicture record: its structure code, then its slices.
///
/// Macroblocks without an explicit address are numbered from zero across all
/// slices of the subpicture.
pub fn decode_subpicture<R>(
    reader: &mut TraceReader<R>,
    config: &ReaderConfig,
) -> Result<Subpicture>
where
    R: Read,
{
    let structure = PictureStructure::from_u8(reader.read_u8()?)
        .ok_or(Error::CorruptFraming("unknown picture structure"))?;
    let count = reader.read_count(config.limits.max_slices, "slice count")?;

    let mut next_address = 0;
    let mut slices = Vec::new();
    for _ in 0..count {
        slices.push(decode_slice(reader, config, &mut next_address)?);
    }

    Ok(Subpicture { structure, slices })
}
