//! Internal reader adapter for reading coefficient traces.

use crate::error::{Error, Result};
use crate::traits::ByteReadable;
use std::io::{self, Read};
use std::mem::size_of;

/// A reader that walks a coefficient trace one field at a time.
///
/// Traces are strictly positional, so the reader only ever moves forward.
/// All multi-byte fields are little-endian.
pub struct TraceReader<R>
where
    R: Read,
{
    /// The data source to read bytes from.
    source: R,

    /// A byte that was pulled out of the source to check for the end of the
    /// trace, but not yet handed out.
    peeked: Option<u8>,

    /// How many bytes have been handed out so far.
    position: u64,
}

impl<R> TraceReader<R>
where
    R: Read,
{
    /// Wrap a source file in a reader.
    ///
    /// The reader pulls small fields one at a time; callers handing in a
    /// `File` should wrap it in a `BufReader` first.
    pub fn from_source(source: R) -> Self {
        Self {
            source,
            peeked: None,
            position: 0,
        }
    }

    /// The number of bytes consumed from the trace so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Fill `buf` completely from the trace.
    ///
    /// Running out of data yields `Error::TruncatedInput`. Any other I/O
    /// error is wrapped in `Error::UnhandledIoError`.
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        if buf.is_empty() {
            return Ok(());
        }

        let rest = match self.peeked.take() {
            Some(byte) => {
                buf[0] = byte;
                &mut buf[1..]
            }
            None => &mut buf[..],
        };

        self.source.read_exact(rest)?;
        self.position += buf.len() as u64;

        Ok(())
    }

    /// Read an integer stored in little-endian byte order.
    pub fn read_le<T: ByteReadable>(&mut self) -> Result<T> {
        let mut raw = [0; 8];
        let raw = &mut raw[..size_of::<T>()];

        self.read_bytes(raw)?;

        Ok(T::from_le_slice(raw))
    }

    /// Read a `u8` from the trace.
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_le()
    }

    /// Read a repetition count.
    ///
    /// Counts are stored as signed 32-bit integers. A negative count, or one
    /// above `limit`, means the framing of the trace can no longer be
    /// trusted, and yields `Error::CorruptFraming` with `what` as the reason.
    pub fn read_count(&mut self, limit: usize, what: &'static str) -> Result<usize> {
        let count: i32 = self.read_le()?;

        if count < 0 || count as usize > limit {
            return Err(Error::CorruptFraming(what));
        }

        Ok(count as usize)
    }

    /// Determine if the trace has been read to exhaustion.
    ///
    /// This may pull one byte out of the source, which will be handed out by
    /// the next read.
    pub fn is_at_end(&mut self) -> Result<bool> {
        if self.peeked.is_some() {
            return Ok(false);
        }

        let mut byte = [0];
        loop {
            match self.source.read(&mut byte) {
                Ok(0) => return Ok(true),
                Ok(_) => {
                    self.peeked = Some(byte[0]);
                    return Ok(false);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Discard the rest of the trace, returning how many bytes were skipped.
    pub fn skip_to_end(&mut self) -> Result<u64> {
        let peeked = self.peeked.take().map_or(0, |_| 1);
        let skipped = peeked + io::copy(&mut self.source, &mut io::sink())?;

        self.position += skipped;

        Ok(skipped)
    }
}
