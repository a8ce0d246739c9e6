//! x86_64 AVX2 kernels (32-byte lanes) and the SSE4.2 CRC-32C kernel.
//!
//! # Safety
//!
//! Every function requires AVX2 (the CRC kernel SSE4.2). Both are checked
//! before the `Level::Avx2` kernel set is handed out.

use std::arch::x86_64::*;

use super::{MASK_BLOCK, map_tail};
use crate::lut::ByteTable;
use crate::scalar;

const LANES: usize = 32;

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn load(ptr: *const u8) -> __m256i {
    // SAFETY: caller guarantees 32 readable bytes at `ptr`.
    unsafe { _mm256_loadu_si256(ptr.cast::<__m256i>()) }
}

#[target_feature(enable = "avx2")]
pub(super) unsafe fn sum_u8(data: &[u8]) -> u32 {
    let ptr = data.as_ptr();
    let len = data.len();
    let mut i = 0;
    let total = unsafe {
        let zero = _mm256_setzero_si256();
        let mut acc = _mm256_setzero_si256();
        while i + LANES <= len {
            acc = _mm256_add_epi64(acc, _mm256_sad_epu8(load(ptr.add(i)), zero));
            i += LANES;
        }
        let halves = _mm_add_epi64(
            _mm256_castsi256_si128(acc),
            _mm256_extracti128_si256(acc, 1),
        );
        let folded = _mm_add_epi64(halves, _mm_unpackhi_epi64(halves, halves));
        _mm_cvtsi128_si64(folded) as u32
    };
    total.wrapping_add(scalar::sum_u8(&data[i..]))
}

#[target_feature(enable = "avx2")]
pub(super) unsafe fn is_ascii(data: &[u8]) -> bool {
    let ptr = data.as_ptr();
    let len = data.len();
    let mut i = 0;
    unsafe {
        while i + 2 * LANES <= len {
            let any = _mm256_or_si256(load(ptr.add(i)), load(ptr.add(i + LANES)));
            if _mm256_movemask_epi8(any) != 0 {
                return false;
            }
            i += 2 * LANES;
        }
        while i + LANES <= len {
            if _mm256_movemask_epi8(load(ptr.add(i))) != 0 {
                return false;
            }
            i += LANES;
        }
    }
    scalar::is_ascii(&data[i..])
}

/// Sixteen 16-entry rows, each broadcast to both 128-bit halves because
/// `vpshufb` shuffles within a half.
#[inline]
#[target_feature(enable = "avx2")]
unsafe fn load_rows(table: &ByteTable) -> [__m256i; 16] {
    unsafe {
        let mut rows = [_mm256_setzero_si256(); 16];
        for (k, row) in rows.iter_mut().enumerate() {
            let half = _mm_loadu_si128(table.as_ptr().add(k * 16).cast::<__m128i>());
            *row = _mm256_broadcastsi128_si256(half);
        }
        rows
    }
}

#[inline]
#[target_feature(enable = "avx2")]
fn lookup(rows: &[__m256i; 16], v: __m256i) -> __m256i {
    let nibble = _mm256_set1_epi8(0x0F);
    let lo = _mm256_and_si256(v, nibble);
    let hi = _mm256_and_si256(_mm256_srli_epi16(v, 4), nibble);
    let mut out = _mm256_setzero_si256();
    for (k, row) in rows.iter().enumerate() {
        let hit = _mm256_cmpeq_epi8(hi, _mm256_set1_epi8(k as i8));
        out = _mm256_or_si256(out, _mm256_and_si256(_mm256_shuffle_epi8(*row, lo), hit));
    }
    out
}

#[target_feature(enable = "avx2")]
pub(super) unsafe fn validate_u8_lut(data: &[u8], table: &ByteTable) -> bool {
    let ptr = data.as_ptr();
    let len = data.len();
    let mut i = 0;
    unsafe {
        let rows = load_rows(table);
        let zero = _mm256_setzero_si256();
        while i + LANES <= len {
            let hits = lookup(&rows, load(ptr.add(i)));
            if _mm256_movemask_epi8(_mm256_cmpeq_epi8(hits, zero)) != 0 {
                return false;
            }
            i += LANES;
        }
    }
    scalar::validate_u8_lut(&data[i..], table)
}

#[target_feature(enable = "avx2")]
pub(super) unsafe fn map(src: *const u8, dst: *mut u8, len: usize, table: &ByteTable) {
    let mut i = 0;
    unsafe {
        let rows = load_rows(table);
        while i + LANES <= len {
            let mapped = lookup(&rows, load(src.add(i)));
            _mm256_storeu_si256(dst.add(i).cast::<__m256i>(), mapped);
            i += LANES;
        }
        map_tail(src.add(i), dst.add(i), len - i, table);
    }
}

#[target_feature(enable = "avx2")]
pub(super) unsafe fn eq_mask64(block: &[u8; MASK_BLOCK], needle: u8) -> u64 {
    let ptr = block.as_ptr();
    unsafe {
        let splat = _mm256_set1_epi8(needle as i8);
        let lo = _mm256_movemask_epi8(_mm256_cmpeq_epi8(load(ptr), splat)) as u32;
        let hi = _mm256_movemask_epi8(_mm256_cmpeq_epi8(load(ptr.add(LANES)), splat)) as u32;
        u64::from(lo) | (u64::from(hi) << LANES)
    }
}

/// Raw CRC-32C register update using the SSE4.2 `crc32` instruction.
#[target_feature(enable = "sse4.2")]
pub(super) unsafe fn crc32c_update(state: u32, data: &[u8]) -> u32 {
    let mut crc = u64::from(state);
    let mut rest = data;
    while let Some((word, tail)) = rest.split_first_chunk::<8>() {
        crc = _mm_crc32_u64(crc, u64::from_le_bytes(*word));
        rest = tail;
    }
    let mut crc = crc as u32;
    for &b in rest {
        crc = _mm_crc32_u8(crc, b);
    }
    crc
}
