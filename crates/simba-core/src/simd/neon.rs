//! aarch64 NEON kernels (16-byte lanes) and the ARMv8 CRC-32C kernel.
//!
//! # Safety
//!
//! Every function requires NEON (the CRC kernel the `crc` extension). Both
//! are checked before the `Level::Neon` kernel set is handed out.

use std::arch::aarch64::*;

use super::{MASK_BLOCK, map_tail};
use crate::lut::ByteTable;
use crate::scalar;

const LANES: usize = 16;

/// Per-lane bit weights used to emulate x86 `movemask`.
const BIT_WEIGHTS: [u8; 16] = [1, 2, 4, 8, 16, 32, 64, 128, 1, 2, 4, 8, 16, 32, 64, 128];

#[target_feature(enable = "neon")]
pub(super) unsafe fn sum_u8(data: &[u8]) -> u32 {
    let ptr = data.as_ptr();
    let len = data.len();
    let mut i = 0;
    let total = unsafe {
        let mut acc = vdupq_n_u32(0);
        while i + LANES <= len {
            // Pairwise widen u8 -> u16, then accumulate pairs into u32 lanes.
            acc = vpadalq_u16(acc, vpaddlq_u8(vld1q_u8(ptr.add(i))));
            i += LANES;
        }
        vaddvq_u32(acc)
    };
    total.wrapping_add(scalar::sum_u8(&data[i..]))
}

#[target_feature(enable = "neon")]
pub(super) unsafe fn is_ascii(data: &[u8]) -> bool {
    let ptr = data.as_ptr();
    let len = data.len();
    let mut i = 0;
    unsafe {
        while i + 4 * LANES <= len {
            let a = vorrq_u8(vld1q_u8(ptr.add(i)), vld1q_u8(ptr.add(i + LANES)));
            let b = vorrq_u8(
                vld1q_u8(ptr.add(i + 2 * LANES)),
                vld1q_u8(ptr.add(i + 3 * LANES)),
            );
            if vmaxvq_u8(vorrq_u8(a, b)) & 0x80 != 0 {
                return false;
            }
            i += 4 * LANES;
        }
        while i + LANES <= len {
            if vmaxvq_u8(vld1q_u8(ptr.add(i))) & 0x80 != 0 {
                return false;
            }
            i += LANES;
        }
    }
    scalar::is_ascii(&data[i..])
}

/// The table as four 64-entry `tbl` operands.
#[inline]
#[target_feature(enable = "neon")]
unsafe fn load_quarters(table: &ByteTable) -> [uint8x16x4_t; 4] {
    let p = table.as_ptr();
    unsafe {
        [
            vld1q_u8_x4(p),
            vld1q_u8_x4(p.add(64)),
            vld1q_u8_x4(p.add(128)),
            vld1q_u8_x4(p.add(192)),
        ]
    }
}

/// Per-lane `table[v]`. `tbl` yields zero for indices past 63, so each
/// quarter only contributes for bytes inside its own 64-value window.
#[inline]
#[target_feature(enable = "neon")]
fn lookup(quarters: &[uint8x16x4_t; 4], v: uint8x16_t) -> uint8x16_t {
    let r0 = vqtbl4q_u8(quarters[0], v);
    let r1 = vqtbl4q_u8(quarters[1], vsubq_u8(v, vdupq_n_u8(64)));
    let r2 = vqtbl4q_u8(quarters[2], vsubq_u8(v, vdupq_n_u8(128)));
    let r3 = vqtbl4q_u8(quarters[3], vsubq_u8(v, vdupq_n_u8(192)));
    vorrq_u8(vorrq_u8(r0, r1), vorrq_u8(r2, r3))
}

#[target_feature(enable = "neon")]
pub(super) unsafe fn validate_u8_lut(data: &[u8], table: &ByteTable) -> bool {
    let ptr = data.as_ptr();
    let len = data.len();
    let mut i = 0;
    unsafe {
        let quarters = load_quarters(table);
        while i + LANES <= len {
            if vminvq_u8(lookup(&quarters, vld1q_u8(ptr.add(i)))) == 0 {
                return false;
            }
            i += LANES;
        }
    }
    scalar::validate_u8_lut(&data[i..], table)
}

#[target_feature(enable = "neon")]
pub(super) unsafe fn map(src: *const u8, dst: *mut u8, len: usize, table: &ByteTable) {
    let mut i = 0;
    unsafe {
        let quarters = load_quarters(table);
        while i + LANES <= len {
            vst1q_u8(dst.add(i), lookup(&quarters, vld1q_u8(src.add(i))));
            i += LANES;
        }
        map_tail(src.add(i), dst.add(i), len - i, table);
    }
}

#[target_feature(enable = "neon")]
pub(super) unsafe fn eq_mask64(block: &[u8; MASK_BLOCK], needle: u8) -> u64 {
    let ptr = block.as_ptr();
    unsafe {
        let splat = vdupq_n_u8(needle);
        let weights = vld1q_u8(BIT_WEIGHTS.as_ptr());
        let mut mask = 0u64;
        for k in 0..MASK_BLOCK / LANES {
            let bits = vandq_u8(vceqq_u8(vld1q_u8(ptr.add(k * LANES)), splat), weights);
            let lo = u64::from(vaddv_u8(vget_low_u8(bits)));
            let hi = u64::from(vaddv_u8(vget_high_u8(bits)));
            mask |= (lo | (hi << 8)) << (k * LANES);
        }
        mask
    }
}

/// Raw CRC-32C register update using the ARMv8 `crc32c*` instructions.
#[target_feature(enable = "crc")]
pub(super) unsafe fn crc32c_update(state: u32, data: &[u8]) -> u32 {
    let mut crc = state;
    let mut rest = data;
    while let Some((word, tail)) = rest.split_first_chunk::<8>() {
        crc = __crc32cd(crc, u64::from_le_bytes(*word));
        rest = tail;
    }
    for &b in rest {
        crc = __crc32cb(crc, b);
    }
    crc
}
