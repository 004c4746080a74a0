use bytes::Bytes;

use crate::error::{ReadError, Result};
use crate::reader::DEFAULT_MAX_FIELD_LEN;

/// Byte-oriented source positioned inside a NUT bitstream.
///
/// Implementors supply raw byte access and an offset counter; the NUT field
/// decoders (`v`, `s`, `vb`, fixed `u32`) are provided on top of those.
pub trait NutRead {
    /// Read a single byte.
    fn read_u8(&mut self) -> Result<u8>;

    /// Fill `buf` completely or fail with [`ReadError::Truncated`].
    fn read_exact_into(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Number of bytes consumed from the start of the source.
    fn offset(&self) -> u64;

    /// Upper bound accepted by [`NutRead::read_length_prefixed_bytes`].
    fn max_field_len(&self) -> usize {
        DEFAULT_MAX_FIELD_LEN
    }

    /// Read an unsigned variable-length integer (`v`).
    ///
    /// Seven bits per byte, most significant group first; a set high bit
    /// means another byte follows.
    fn read_uvarint(&mut self) -> Result<u64> {
        let mut value: u64 = 0;
        loop {
            let byte = self.read_u8()?;
            if value > (u64::MAX >> 7) {
                return Err(ReadError::VarintOverflow);
            }
            value = (value << 7) | u64::from(byte & 0x7f);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
    }

    /// Read a signed variable-length integer (`s`).
    ///
    /// The unsigned value `v` maps to `0, 1, -1, 2, -2, ...`.
    fn read_svarint(&mut self) -> Result<i64> {
        let raw = self.read_uvarint()?;
        unzigzag(raw).ok_or(ReadError::VarintOverflow)
    }

    /// Read a length-prefixed byte string (`vb`).
    fn read_length_prefixed_bytes(&mut self) -> Result<Bytes> {
        let len = self.read_uvarint()?;
        let max = self.max_field_len();
        let len = usize::try_from(len)
            .ok()
            .filter(|len| *len <= max)
            .ok_or(ReadError::FieldTooLong { len, max })?;

        let mut buf = vec![0u8; len];
        self.read_exact_into(&mut buf)?;
        Ok(Bytes::from(buf))
    }

    /// Read a fixed 4-byte big-endian integer.
    fn read_fixed_u32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.read_exact_into(&mut buf)?;
        Ok(u32::from_be_bytes(buf))
    }
}

impl<T: NutRead + ?Sized> NutRead for &mut T {
    fn read_u8(&mut self) -> Result<u8> {
        (**self).read_u8()
    }

    fn read_exact_into(&mut self, buf: &mut [u8]) -> Result<()> {
        (**self).read_exact_into(buf)
    }

    fn offset(&self) -> u64 {
        (**self).offset()
    }

    fn max_field_len(&self) -> usize {
        (**self).max_field_len()
    }
}

fn unzigzag(raw: u64) -> Option<i64> {
    // (raw + 1) / 2 without overflowing at u64::MAX
    let magnitude = i64::try_from((raw >> 1) + (raw & 1)).ok()?;
    if raw & 1 == 1 {
        Some(magnitude)
    } else {
        Some(-magnitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_mapping_alternates() {
        assert_eq!(unzigzag(0), Some(0));
        assert_eq!(unzigzag(1), Some(1));
        assert_eq!(unzigzag(2), Some(-1));
        assert_eq!(unzigzag(3), Some(2));
        assert_eq!(unzigzag(4), Some(-2));
        assert_eq!(unzigzag(5), Some(3));
    }

    #[test]
    fn signed_mapping_extremes() {
        assert_eq!(unzigzag(u64::MAX), None);
        assert_eq!(unzigzag(u64::MAX - 1), Some(i64::MIN + 1));
        assert_eq!(unzigzag(u64::MAX - 2), Some(i64::MAX));
    }
}
