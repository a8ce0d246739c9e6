//! Every supported kernel level must agree with the scalar reference on
//! every length, alignment offset and content pattern.

use simba_core::dispatch::{KernelSet, Level};
use simba_core::lut::{ASCII_ALNUM_SET, ASCII_UPPER_TABLE, ByteTable, byte_set, table_from_fn};
use simba_core::simd::MASK_BLOCK;
use simba_core::{
    crc32c, crc32c_combine, crc32c_update, eq_masks, is_ascii, map_bytes, noop, sum_u8,
    validate_tag, validate_u8_lut,
};

const MAX_LEN: usize = 4 * 64 + 63;

// xorshift32; deterministic so failures reproduce.
fn pattern(len: usize, seed: u32) -> Vec<u8> {
    let mut state = seed | 1;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as u8
        })
        .collect()
}

fn vector_levels() -> Vec<&'static KernelSet> {
    Level::supported()
        .filter(|&level| level != Level::Scalar)
        .filter_map(KernelSet::for_level)
        .collect()
}

fn scalar() -> &'static KernelSet {
    KernelSet::scalar()
}

#[test]
fn sum_matches_scalar_for_every_length_and_offset() {
    let buf = pattern(MAX_LEN + 32, 0xC0FFEE);
    for set in vector_levels() {
        for offset in 0..4 {
            for len in 0..=MAX_LEN {
                let data = &buf[offset..offset + len];
                assert_eq!(
                    set.sum_u8(data),
                    scalar().sum_u8(data),
                    "level={} offset={offset} len={len}",
                    set.level()
                );
            }
        }
    }
}

#[test]
fn sum_of_all_byte_values() {
    let data: Vec<u8> = (0..=255).collect();
    for level in Level::supported() {
        let set = KernelSet::for_level(level).unwrap();
        assert_eq!(set.sum_u8(&data), 32_640, "level={level}");
    }
}

#[test]
fn sum_wraps_on_every_level() {
    let data = vec![0xFFu8; 16_843_010];
    let expected = (16_843_010u64 * 255 % (1u64 << 32)) as u32;
    for level in Level::supported() {
        let set = KernelSet::for_level(level).unwrap();
        assert_eq!(set.sum_u8(&data), expected, "level={level}");
    }
}

#[test]
fn ascii_detects_single_high_byte_everywhere() {
    for set in Level::supported().filter_map(KernelSet::for_level) {
        for offset in 0..3 {
            let base = vec![b'q'; MAX_LEN + offset];
            assert!(set.is_ascii(&base[offset..]), "level={}", set.level());
            for pos in 0..MAX_LEN {
                let mut buf = base.clone();
                buf[offset + pos] = 0x80 | (pos as u8);
                assert!(
                    !set.is_ascii(&buf[offset..]),
                    "level={} offset={offset} pos={pos}",
                    set.level()
                );
            }
        }
    }
}

#[test]
fn lut_validate_matches_scalar() {
    let tables: [ByteTable; 3] = [
        ASCII_ALNUM_SET,
        byte_set(&[0, 1, 2, 0x80, 0xFF]),
        table_from_fn(|b| u8::from(b % 3 != 0)),
    ];
    for set in vector_levels() {
        for table in &tables {
            for len in 0..=MAX_LEN {
                let accepted: Vec<u8> = (0..=255u8)
                    .filter(|&b| table[usize::from(b)] != 0)
                    .cycle()
                    .take(len)
                    .collect();
                assert!(set.validate_u8_lut(&accepted, table));
                let noisy = pattern(len, len as u32 + 11);
                assert_eq!(
                    set.validate_u8_lut(&noisy, table),
                    scalar().validate_u8_lut(&noisy, table),
                    "level={} len={len}",
                    set.level()
                );
            }
        }
    }
}

#[test]
fn lut_map_matches_scalar_for_every_byte_value() {
    let table = table_from_fn(|b| b.wrapping_mul(167).rotate_left(3));
    for set in vector_levels() {
        for len in 0..=MAX_LEN {
            let src = pattern(len, 0xBEEF ^ len as u32);
            let mut got = vec![0xA5u8; len + 5];
            let mut want = vec![0xA5u8; len + 5];
            assert_eq!(set.map(&src, &mut got, &table), len);
            scalar().map(&src, &mut want, &table);
            assert_eq!(got, want, "level={} len={len}", set.level());
        }
    }
}

#[test]
fn eq_mask_blocks_match_scalar() {
    let data = pattern(MASK_BLOCK, 99);
    for set in vector_levels() {
        for needle in 0..=255u8 {
            let block: &[u8; MASK_BLOCK] = data.first_chunk().unwrap();
            assert_eq!(
                set.eq_mask64(block, needle),
                scalar().eq_mask64(block, needle),
                "level={} needle={needle}",
                set.level()
            );
        }
    }
}

#[test]
fn crc_backends_agree() {
    for len in [0usize, 1, 7, 8, 9, 31, 64, 1500] {
        let data = pattern(len, 7);
        let expected = !scalar().crc32c_raw(!0, &data);
        for set in vector_levels() {
            assert_eq!(!set.crc32c_raw(!0, &data), expected, "level={} len={len}", set.level());
        }
    }
}

#[test]
fn dispatched_examples() {
    assert_eq!(sum_u8(&[]), 0);
    assert_eq!(sum_u8(&[1, 2, 3]), 6);
    assert_eq!(sum_u8(&[255; 4]), 1020);

    assert!(is_ascii(b""));
    assert!(is_ascii(b"Hello"));
    assert!(!is_ascii(&[0x48, 0x80]));

    assert!(validate_u8_lut(b"abc123", &ASCII_ALNUM_SET));
    assert!(!validate_u8_lut(b"abc!23", &ASCII_ALNUM_SET));

    let mut out = [0u8; 3];
    map_bytes(&mut out, b"abc", &ASCII_UPPER_TABLE);
    assert_eq!(&out, b"ABC");

    noop();
}

#[test]
fn crc_examples() {
    assert_eq!(crc32c(b"hello"), 0x9A71_BB4C);
    assert_eq!(crc32c(b"hello world"), 0xC994_65AA);
    let buf = vec![0xABu8; 1500];
    assert_eq!(crc32c_update(0, &buf), crc32c(&buf));
    let (a, b) = buf.split_at(700);
    assert_eq!(crc32c_combine(crc32c(a), crc32c(b), b.len()), crc32c(&buf));
}

#[test]
fn eq_masks_and_tags() {
    let csv = b"a,b,,c".repeat(32);
    let mut out = [0u64; 3];
    let processed = eq_masks(&csv, b',', &mut out);
    assert_eq!(processed, 192);
    assert_eq!(out[0].count_ones(), 32);

    assert!(validate_tag(b"service:web-frontend"));
    assert!(!validate_tag(b"service__web"));
}
