//! CRC-32C (Castagnoli).
//!
//! Reflected polynomial `0x82F63B78`, initial value and final xor
//! `0xFFFF_FFFF`. The hardware backend (SSE4.2 or ARMv8 CRC) comes from the
//! active [`KernelSet`](crate::dispatch::KernelSet); the software backend is
//! slicing-by-8 over const-generated tables.

use crate::dispatch::{Level, kernels};

const POLY: u32 = 0x82F6_3B78;

static TABLES: [[u32; 256]; 8] = build_tables();

const fn build_tables() -> [[u32; 256]; 8] {
    let mut tables = [[0u32; 256]; 8];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u32;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 { (crc >> 1) ^ POLY } else { crc >> 1 };
            bit += 1;
        }
        tables[0][i] = crc;
        i += 1;
    }
    let mut t = 1;
    while t < 8 {
        let mut i = 0;
        while i < 256 {
            let prev = tables[t - 1][i];
            tables[t][i] = (prev >> 8) ^ tables[0][(prev & 0xFF) as usize];
            i += 1;
        }
        t += 1;
    }
    tables
}

/// Advances a raw (non-inverted) CRC register over `data` in software.
pub(crate) fn update_software(state: u32, data: &[u8]) -> u32 {
    let mut crc = state;
    let mut rest = data;
    while let Some((word, tail)) = rest.split_first_chunk::<8>() {
        let lo = u32::from_le_bytes([word[0], word[1], word[2], word[3]]) ^ crc;
        crc = TABLES[7][(lo & 0xFF) as usize]
            ^ TABLES[6][((lo >> 8) & 0xFF) as usize]
            ^ TABLES[5][((lo >> 16) & 0xFF) as usize]
            ^ TABLES[4][(lo >> 24) as usize]
            ^ TABLES[3][usize::from(word[4])]
            ^ TABLES[2][usize::from(word[5])]
            ^ TABLES[1][usize::from(word[6])]
            ^ TABLES[0][usize::from(word[7])];
        rest = tail;
    }
    for &b in rest {
        crc = (crc >> 8) ^ TABLES[0][((crc ^ u32::from(b)) & 0xFF) as usize];
    }
    crc
}

/// CRC-32C of `data`.
#[inline]
#[must_use]
pub fn crc32c(data: &[u8]) -> u32 {
    crc32c_update(0, data)
}

/// Extends a finished CRC with more data:
/// `crc32c_update(crc32c(a), b) == crc32c(a ++ b)`, and
/// `crc32c_update(0, data) == crc32c(data)`.
#[inline]
#[must_use]
pub fn crc32c_update(crc: u32, data: &[u8]) -> u32 {
    if data.is_empty() {
        return crc;
    }
    !kernels().crc32c_raw(!crc, data)
}

/// Name of the CRC backend a level's kernel set uses.
#[must_use]
pub fn backend_name(level: Level) -> &'static str {
    match level {
        Level::Avx2 => "sse4.2",
        Level::Neon => "armv8-crc",
        Level::Scalar | Level::Ssse3 => "software",
    }
}

fn gf2_matrix_times(mat: &[u32; 32], mut vec: u32) -> u32 {
    let mut sum = 0;
    let mut row = 0;
    while vec != 0 {
        if vec & 1 != 0 {
            sum ^= mat[row];
        }
        vec >>= 1;
        row += 1;
    }
    sum
}

fn gf2_matrix_square(square: &mut [u32; 32], mat: &[u32; 32]) {
    for (n, slot) in square.iter_mut().enumerate() {
        *slot = gf2_matrix_times(mat, mat[n]);
    }
}

/// CRC-32C of `a ++ b` given `crc32c(a)`, `crc32c(b)` and `b.len()`.
///
/// Applies `len2` zero bytes to `crc1` by repeated squaring of the
/// one-zero-bit operator, then folds in `crc2`.
#[must_use]
pub fn crc32c_combine(crc1: u32, crc2: u32, len2: usize) -> u32 {
    if len2 == 0 {
        return crc1;
    }

    let mut even = [0u32; 32];
    let mut odd = [0u32; 32];

    // Operator for one zero bit.
    odd[0] = POLY;
    let mut row = 1u32;
    for slot in odd.iter_mut().skip(1) {
        *slot = row;
        row <<= 1;
    }

    // Two zero bits, then four.
    gf2_matrix_square(&mut even, &odd);
    gf2_matrix_square(&mut odd, &even);

    let mut crc1 = crc1;
    let mut len2 = len2;
    loop {
        gf2_matrix_square(&mut even, &odd);
        if len2 & 1 != 0 {
            crc1 = gf2_matrix_times(&even, crc1);
        }
        len2 >>= 1;
        if len2 == 0 {
            break;
        }

        gf2_matrix_square(&mut odd, &even);
        if len2 & 1 != 0 {
            crc1 = gf2_matrix_times(&odd, crc1);
        }
        len2 >>= 1;
        if len2 == 0 {
            break;
        }
    }

    crc1 ^ crc2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bitwise(data: &[u8]) -> u32 {
        let mut crc = !0u32;
        for &b in data {
            crc ^= u32::from(b);
            for _ in 0..8 {
                crc = if crc & 1 != 0 { (crc >> 1) ^ POLY } else { crc >> 1 };
            }
        }
        !crc
    }

    #[test]
    fn golden_vectors() {
        assert_eq!(crc32c(b""), 0);
        assert_eq!(crc32c(b"123456789"), 0xE306_9283);
        assert_eq!(crc32c(b"hello"), 0x9A71_BB4C);
        assert_eq!(crc32c(b"hello world"), 0xC994_65AA);
    }

    #[test]
    fn software_matches_bitwise() {
        let data: Vec<u8> = (0..1000u32).map(|i| (i * 31 + 7) as u8).collect();
        for len in [0, 1, 7, 8, 9, 63, 64, 65, 999] {
            assert_eq!(!update_software(!0, &data[..len]), bitwise(&data[..len]), "len={len}");
        }
    }

    #[test]
    fn every_backend_matches_software() {
        let data = vec![0xABu8; 1500];
        let expected = !update_software(!0, &data);
        for level in Level::supported() {
            let set = crate::dispatch::KernelSet::for_level(level).unwrap();
            assert_eq!(!set.crc32c_raw(!0, &data), expected, "level={level}");
        }
    }

    #[test]
    fn update_is_incremental() {
        let data = b"The quick brown fox jumps over the lazy dog";
        for split in 0..=data.len() {
            let (a, b) = data.split_at(split);
            assert_eq!(crc32c_update(crc32c(a), b), crc32c(data));
        }
        assert_eq!(crc32c_update(0xDEAD_BEEF, b""), 0xDEAD_BEEF);
    }

    #[test]
    fn combine_matches_one_shot() {
        let data: Vec<u8> = (0..300u32).map(|i| (i ^ (i >> 3)) as u8).collect();
        for split in [0, 1, 2, 3, 17, 64, 150, 299, 300] {
            let (a, b) = data.split_at(split);
            assert_eq!(
                crc32c_combine(crc32c(a), crc32c(b), b.len()),
                crc32c(&data),
                "split={split}"
            );
        }
    }

    #[test]
    fn combine_zero_length_returns_first() {
        assert_eq!(crc32c_combine(0x1234_5678, 0x9ABC_DEF0, 0), 0x1234_5678);
    }

    #[test]
    fn backend_names() {
        assert_eq!(backend_name(Level::Scalar), "software");
        assert_eq!(backend_name(Level::Avx2), "sse4.2");
    }
}
