//! 256-entry lookup-table kernels: predicate validation and byte remapping.
//!
//! A [`ByteTable`] is indexed by byte value. As a predicate, a nonzero entry
//! accepts the byte; as a mapping, the entry is the replacement byte. The
//! `const fn` builders below let callers bake tables into statics.

use crate::dispatch::kernels;
use crate::error::KernelError;

/// Lookup table indexed by byte value.
pub type ByteTable = [u8; 256];

/// Predicate table accepting exactly the listed bytes.
#[must_use]
pub const fn byte_set(bytes: &[u8]) -> ByteTable {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < bytes.len() {
        table[bytes[i] as usize] = 1;
        i += 1;
    }
    table
}

/// Predicate table accepting bytes in `lo..=hi` in addition to `base`.
#[must_use]
pub const fn with_range(mut base: ByteTable, lo: u8, hi: u8) -> ByteTable {
    let mut b = lo as usize;
    while b <= hi as usize {
        base[b] = 1;
        b += 1;
    }
    base
}

/// Mapping table where every byte maps to itself.
#[must_use]
pub const fn identity_table() -> ByteTable {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = i as u8;
        i += 1;
    }
    table
}

/// Predicate table from a classifier function.
pub fn byte_set_from_fn(mut accept: impl FnMut(u8) -> bool) -> ByteTable {
    let mut table = [0u8; 256];
    for (b, slot) in (0..=u8::MAX).zip(table.iter_mut()) {
        *slot = u8::from(accept(b));
    }
    table
}

/// Mapping table from a byte transform.
pub fn table_from_fn(mut f: impl FnMut(u8) -> u8) -> ByteTable {
    let mut table = [0u8; 256];
    for (b, slot) in (0..=u8::MAX).zip(table.iter_mut()) {
        *slot = f(b);
    }
    table
}

/// Maps `a-z` to `A-Z`, every other byte to itself.
pub static ASCII_UPPER_TABLE: ByteTable = {
    let mut table = identity_table();
    let mut b = b'a';
    while b <= b'z' {
        table[b as usize] = b - 32;
        b += 1;
    }
    table
};

/// Maps `A-Z` to `a-z`, every other byte to itself.
pub static ASCII_LOWER_TABLE: ByteTable = {
    let mut table = identity_table();
    let mut b = b'A';
    while b <= b'Z' {
        table[b as usize] = b + 32;
        b += 1;
    }
    table
};

/// Accepts `[A-Za-z0-9]`.
pub static ASCII_ALNUM_SET: ByteTable =
    with_range(with_range(with_range([0u8; 256], b'0', b'9'), b'A', b'Z'), b'a', b'z');

/// Returns `true` if `table[b] != 0` for every byte `b` in `data`.
///
/// Stops at the first vector block containing a rejected byte. An empty
/// buffer is valid.
#[inline]
pub fn validate_u8_lut(data: &[u8], table: &ByteTable) -> bool {
    kernels().validate_u8_lut(data, table)
}

/// Writes `dst[i] = table[src[i]]` for `i < min(src.len(), dst.len())` and
/// returns that count. Bytes of `dst` past the count are left untouched.
#[inline]
pub fn map_bytes(dst: &mut [u8], src: &[u8], table: &ByteTable) -> usize {
    kernels().map(src, dst, table)
}

/// Like [`map_bytes`] but refuses a destination shorter than `src`.
pub fn try_map_bytes(dst: &mut [u8], src: &[u8], table: &ByteTable) -> Result<usize, KernelError> {
    if dst.len() < src.len() {
        return Err(KernelError::OutputTooShort {
            needed: src.len(),
            available: dst.len(),
        });
    }
    Ok(map_bytes(dst, src, table))
}

/// Remaps every byte of `buf` through `table`.
#[inline]
pub fn map_bytes_in_place(buf: &mut [u8], table: &ByteTable) {
    kernels().map_in_place(buf, table);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_set_marks_listed_bytes() {
        let set = byte_set(b"ab");
        assert_eq!(set[usize::from(b'a')], 1);
        assert_eq!(set[usize::from(b'b')], 1);
        assert_eq!(set.iter().filter(|&&v| v != 0).count(), 2);
    }

    #[test]
    fn builders_agree() {
        let from_fn = byte_set_from_fn(|b| b.is_ascii_alphanumeric());
        assert_eq!(from_fn, ASCII_ALNUM_SET);
        assert_eq!(table_from_fn(|b| b), identity_table());
        assert_eq!(table_from_fn(|b| b.to_ascii_uppercase()), ASCII_UPPER_TABLE);
        assert_eq!(table_from_fn(|b| b.to_ascii_lowercase()), ASCII_LOWER_TABLE);
    }

    #[test]
    fn validate_alnum() {
        assert!(validate_u8_lut(b"abc123", &ASCII_ALNUM_SET));
        assert!(!validate_u8_lut(b"abc!23", &ASCII_ALNUM_SET));
        assert!(validate_u8_lut(b"", &[0u8; 256]));
    }

    #[test]
    fn validate_rejects_late_byte() {
        let mut data = vec![b'x'; 200];
        assert!(validate_u8_lut(&data, &ASCII_ALNUM_SET));
        data[199] = b' ';
        assert!(!validate_u8_lut(&data, &ASCII_ALNUM_SET));
    }

    #[test]
    fn map_upper() {
        let mut out = [0u8; 3];
        assert_eq!(map_bytes(&mut out, b"abc", &ASCII_UPPER_TABLE), 3);
        assert_eq!(&out, b"ABC");
    }

    #[test]
    fn map_empty_leaves_output_untouched() {
        let mut out = [7u8; 4];
        assert_eq!(map_bytes(&mut out, b"", &ASCII_UPPER_TABLE), 0);
        assert_eq!(out, [7; 4]);
    }

    #[test]
    fn map_truncates_to_shorter_side() {
        let mut out = [0u8; 2];
        assert_eq!(map_bytes(&mut out, b"abcd", &ASCII_UPPER_TABLE), 2);
        assert_eq!(&out, b"AB");

        let mut long = [b'-'; 6];
        assert_eq!(map_bytes(&mut long, b"xy", &ASCII_UPPER_TABLE), 2);
        assert_eq!(&long, b"XY----");
    }

    #[test]
    fn try_map_rejects_short_output() {
        let mut out = [0u8; 2];
        assert_eq!(
            try_map_bytes(&mut out, b"abc", &ASCII_UPPER_TABLE),
            Err(KernelError::OutputTooShort {
                needed: 3,
                available: 2
            })
        );
        let mut out = [0u8; 3];
        assert_eq!(try_map_bytes(&mut out, b"abc", &ASCII_UPPER_TABLE), Ok(3));
    }

    #[test]
    fn map_in_place_lowercases() {
        let mut buf = b"Hello, WORLD! 0123456789 The Quick Brown Fox".to_vec();
        map_bytes_in_place(&mut buf, &ASCII_LOWER_TABLE);
        assert_eq!(buf, b"hello, world! 0123456789 the quick brown fox");
    }
}
