//! Writers for the primitive field encodings.
//!
//! nutframe does not write frames; these exist so fixtures and tools can
//! build well-formed bitstreams byte for byte.

use bytes::BufMut;

/// Append an unsigned variable-length integer (`v`).
pub fn put_uvarint(dst: &mut impl BufMut, value: u64) {
    let mut groups = 1;
    while groups < 10 && value >> (7 * groups) != 0 {
        groups += 1;
    }
    for i in (0..groups).rev() {
        let group = ((value >> (7 * i)) & 0x7f) as u8;
        let more = if i == 0 { 0 } else { 0x80 };
        dst.put_u8(group | more);
    }
}

/// Append a signed variable-length integer (`s`).
///
/// # Panics
///
/// Panics on `i64::MIN`, which has no `s` encoding in 64 bits.
pub fn put_svarint(dst: &mut impl BufMut, value: i64) {
    assert_ne!(value, i64::MIN, "i64::MIN is not representable as `s`");
    let raw = if value > 0 {
        (value as u64) * 2 - 1
    } else {
        value.unsigned_abs() * 2
    };
    put_uvarint(dst, raw);
}

/// Append a length-prefixed byte string (`vb`).
pub fn put_bytes(dst: &mut impl BufMut, bytes: &[u8]) {
    put_uvarint(dst, bytes.len() as u64);
    dst.put_slice(bytes);
}
