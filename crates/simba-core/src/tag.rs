//! Tag grammar validation built on the LUT validator.
//!
//! A tag is 1 to 200 bytes. It starts with `[a-z:]`, continues with
//! `[a-z0-9:./_-]`, never contains `__` and does not end with `_`.

use crate::lut::{ByteTable, byte_set, validate_u8_lut, with_range};

/// Longest accepted tag, in bytes.
pub const MAX_TAG_LEN: usize = 200;

/// Bytes a tag may start with.
pub static TAG_START: ByteTable = with_range(byte_set(b":"), b'a', b'z');

/// Bytes allowed after the first.
pub static TAG_BODY: ByteTable =
    with_range(with_range(byte_set(b":./_-"), b'a', b'z'), b'0', b'9');

fn has_double_underscore(bytes: &[u8]) -> bool {
    bytes.windows(2).any(|w| w == b"__")
}

/// Checks the interior of a tag: every byte in `[a-z0-9:./_-]` and no two
/// adjacent underscores. An empty slice is valid.
#[must_use]
pub fn validate_tag_inner(mid: &[u8]) -> bool {
    validate_u8_lut(mid, &TAG_BODY) && !has_double_underscore(mid)
}

/// Checks a complete tag.
#[must_use]
pub fn validate_tag(tag: &[u8]) -> bool {
    let Some((&first, rest)) = tag.split_first() else {
        return false;
    };
    if tag.len() > MAX_TAG_LEN || TAG_START[usize::from(first)] == 0 {
        return false;
    }
    if rest.last() == Some(&b'_') {
        return false;
    }
    validate_tag_inner(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_good_tags() {
        for tag in ["a", "foo_bar", "abc:def", ":colon", "env:prod-1.2/x", "a_b_c"] {
            assert!(validate_tag(tag.as_bytes()), "{tag}");
        }
    }

    #[test]
    fn rejects_bad_tags() {
        for tag in ["", "_abc", "Abc", "abc__def", "abc_", "1abc", "abc def", "ab\u{e9}"] {
            assert!(!validate_tag(tag.as_bytes()), "{tag}");
        }
    }

    #[test]
    fn length_limit() {
        let ok = vec![b'a'; MAX_TAG_LEN];
        assert!(validate_tag(&ok));
        let too_long = vec![b'a'; MAX_TAG_LEN + 1];
        assert!(!validate_tag(&too_long));
    }

    #[test]
    fn inner_rules() {
        assert!(validate_tag_inner(b""));
        assert!(validate_tag_inner(b"abc_def:1.2/3-4"));
        assert!(validate_tag_inner(b"_"));
        assert!(!validate_tag_inner(b"a__b"));
        assert!(!validate_tag_inner(b"UPPER"));
        assert!(!validate_tag_inner(b"sp ace"));
    }

    #[test]
    fn long_inner_uses_vector_path() {
        let mut mid = b"abcdefghij0123456789:./-_".repeat(8);
        assert!(validate_tag_inner(&mid));
        let last = mid.len() - 1;
        mid[last] = b'A';
        assert!(!validate_tag_inner(&mid));
    }
}
