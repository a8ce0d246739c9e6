//! Portable scalar kernels.
//!
//! These are the reference semantics. Every vector variant in
//! [`crate::simd`] hands its remainder to these functions and must agree
//! with them on every input.

use crate::lut::ByteTable;

/// Sum of all bytes modulo 2^32.
#[inline]
pub fn sum_u8(data: &[u8]) -> u32 {
    data.iter()
        .fold(0u32, |acc, &b| acc.wrapping_add(u32::from(b)))
}

/// Returns `true` if no byte has its high bit set.
#[inline]
pub fn is_ascii(data: &[u8]) -> bool {
    data.iter().all(|&b| b & 0x80 == 0)
}

/// Returns `true` if `table[b] != 0` for every byte `b`.
#[inline]
pub fn validate_u8_lut(data: &[u8], table: &ByteTable) -> bool {
    data.iter().all(|&b| table[usize::from(b)] != 0)
}

/// Bit `i` of the result is set iff `chunk[i] == needle`. `chunk` holds at
/// most 64 bytes.
#[inline]
pub fn eq_mask(chunk: &[u8], needle: u8) -> u64 {
    debug_assert!(chunk.len() <= 64);
    chunk
        .iter()
        .enumerate()
        .fold(0u64, |mask, (i, &b)| mask | (u64::from(b == needle) << i))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_wraps() {
        assert_eq!(sum_u8(&[]), 0);
        assert_eq!(sum_u8(&[1, 2, 3]), 6);
        assert_eq!(sum_u8(&[255; 4]), 1020);
    }

    #[test]
    fn ascii_high_bit() {
        assert!(is_ascii(b""));
        assert!(is_ascii(b"\x00\x7f"));
        assert!(!is_ascii(b"a\x80"));
    }

    #[test]
    fn eq_mask_bits() {
        assert_eq!(eq_mask(b"abca", b'a'), 0b1001);
        assert_eq!(eq_mask(b"", b'a'), 0);
        assert_eq!(eq_mask(&[7; 64], 7), u64::MAX);
    }
}
