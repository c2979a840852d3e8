//! Traits

use num_traits::FromBytes;

/// Any integer that can be read out of a trace as little-endian bytes.
pub trait ByteReadable: Copy + FromBytes {
    /// Decode a value from exactly `size_of::<Self>()` little-endian bytes.
    fn from_le_slice(bytes: &[u8]) -> Self;
}

impl<T> ByteReadable for T
where
    T: Copy + FromBytes,
    <T as FromBytes>::Bytes: Default,
{
    fn from_le_slice(bytes: &[u8]) -> Self {
        let mut raw = <T as FromBytes>::Bytes::default();
        raw.as_mut().copy_from_slice(bytes);

        T::from_le_bytes(&raw)
    }
}
