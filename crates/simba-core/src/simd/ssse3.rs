//! x86_64 SSSE3 kernels (16-byte lanes).
//!
//! # Safety
//!
//! Every function requires SSSE3. They are only reachable through the
//! `Level::Ssse3` kernel set, which is handed out after runtime detection.

use std::arch::x86_64::*;

use super::{MASK_BLOCK, map_tail};
use crate::lut::ByteTable;
use crate::scalar;

const LANES: usize = 16;

#[inline]
#[target_feature(enable = "ssse3")]
unsafe fn load(ptr: *const u8) -> __m128i {
    // SAFETY: caller guarantees 16 readable bytes at `ptr`.
    unsafe { _mm_loadu_si128(ptr.cast::<__m128i>()) }
}

#[target_feature(enable = "ssse3")]
pub(super) unsafe fn sum_u8(data: &[u8]) -> u32 {
    let ptr = data.as_ptr();
    let len = data.len();
    let mut i = 0;
    let total = unsafe {
        let zero = _mm_setzero_si128();
        let mut acc = _mm_setzero_si128();
        while i + LANES <= len {
            // psadbw against zero widens each 8-byte half into a u64 lane.
            acc = _mm_add_epi64(acc, _mm_sad_epu8(load(ptr.add(i)), zero));
            i += LANES;
        }
        let folded = _mm_add_epi64(acc, _mm_unpackhi_epi64(acc, acc));
        _mm_cvtsi128_si64(folded) as u32
    };
    total.wrapping_add(scalar::sum_u8(&data[i..]))
}

#[target_feature(enable = "ssse3")]
pub(super) unsafe fn is_ascii(data: &[u8]) -> bool {
    let ptr = data.as_ptr();
    let len = data.len();
    let mut i = 0;
    unsafe {
        while i + 4 * LANES <= len {
            let a = _mm_or_si128(load(ptr.add(i)), load(ptr.add(i + LANES)));
            let b = _mm_or_si128(load(ptr.add(i + 2 * LANES)), load(ptr.add(i + 3 * LANES)));
            if _mm_movemask_epi8(_mm_or_si128(a, b)) != 0 {
                return false;
            }
            i += 4 * LANES;
        }
        while i + LANES <= len {
            if _mm_movemask_epi8(load(ptr.add(i))) != 0 {
                return false;
            }
            i += LANES;
        }
    }
    scalar::is_ascii(&data[i..])
}

/// The table as sixteen 16-entry rows; row `k` holds bytes `16k..16k + 16`.
#[inline]
#[target_feature(enable = "ssse3")]
unsafe fn load_rows(table: &ByteTable) -> [__m128i; 16] {
    unsafe {
        let mut rows = [_mm_setzero_si128(); 16];
        for (k, row) in rows.iter_mut().enumerate() {
            *row = load(table.as_ptr().add(k * LANES));
        }
        rows
    }
}

/// Per-lane `table[v]`: `pshufb` each row by the low nibble and keep the
/// lanes whose high nibble selects that row.
#[inline]
#[target_feature(enable = "ssse3")]
fn lookup(rows: &[__m128i; 16], v: __m128i) -> __m128i {
    let nibble = _mm_set1_epi8(0x0F);
    let lo = _mm_and_si128(v, nibble);
    let hi = _mm_and_si128(_mm_srli_epi16(v, 4), nibble);
    let mut out = _mm_setzero_si128();
    for (k, row) in rows.iter().enumerate() {
        let hit = _mm_cmpeq_epi8(hi, _mm_set1_epi8(k as i8));
        out = _mm_or_si128(out, _mm_and_si128(_mm_shuffle_epi8(*row, lo), hit));
    }
    out
}

#[target_feature(enable = "ssse3")]
pub(super) unsafe fn validate_u8_lut(data: &[u8], table: &ByteTable) -> bool {
    let ptr = data.as_ptr();
    let len = data.len();
    let mut i = 0;
    unsafe {
        let rows = load_rows(table);
        let zero = _mm_setzero_si128();
        while i + LANES <= len {
            let hits = lookup(&rows, load(ptr.add(i)));
            if _mm_movemask_epi8(_mm_cmpeq_epi8(hits, zero)) != 0 {
                return false;
            }
            i += LANES;
        }
    }
    scalar::validate_u8_lut(&data[i..], table)
}

#[target_feature(enable = "ssse3")]
pub(super) unsafe fn map(src: *const u8, dst: *mut u8, len: usize, table: &ByteTable) {
    let mut i = 0;
    unsafe {
        let rows = load_rows(table);
        while i + LANES <= len {
            let mapped = lookup(&rows, load(src.add(i)));
            _mm_storeu_si128(dst.add(i).cast::<__m128i>(), mapped);
            i += LANES;
        }
        map_tail(src.add(i), dst.add(i), len - i, table);
    }
}

#[target_feature(enable = "ssse3")]
pub(super) unsafe fn eq_mask64(block: &[u8; MASK_BLOCK], needle: u8) -> u64 {
    let ptr = block.as_ptr();
    unsafe {
        let splat = _mm_set1_epi8(needle as i8);
        let mut mask = 0u64;
        for k in 0..MASK_BLOCK / LANES {
            let eq = _mm_cmpeq_epi8(load(ptr.add(k * LANES)), splat);
            mask |= u64::from(_mm_movemask_epi8(eq) as u16) << (k * LANES);
        }
        mask
    }
}
