//! ABI layer for the five core kernels and the level query.

use libc::size_t;

use simba_core::lut::{map_bytes, map_bytes_in_place, validate_u8_lut as lut_validate};

use crate::util::{borrow_bytes, borrow_slice_mut, borrow_table};

abi_fn! {
    /// Sum of all bytes modulo 2^32.
    fn sum_u8(ptr: *const u8, len: size_t) -> u32 {
        simba_core::sum_u8(borrow_bytes(ptr, len))
    }
}

abi_fn! {
    /// 1 if every byte is below 0x80, else 0.
    fn is_ascii(ptr: *const u8, len: size_t) -> u8 {
        u8::from(simba_core::is_ascii(borrow_bytes(ptr, len)))
    }
}

/// Empty call used to measure boundary-crossing latency.
#[unsafe(no_mangle)]
pub extern "C" fn noop() {
    simba_core::noop();
}

abi_fn! {
    /// 1 if `lut[b] != 0` for every byte, else 0. A null `lut` yields 0 for
    /// non-empty input.
    fn validate_u8_lut(ptr: *const u8, len: size_t, lut: *const u8) -> u8 {
        let data = borrow_bytes(ptr, len);
        if data.is_empty() {
            return 1;
        }
        match borrow_table(lut) {
            Some(table) => u8::from(lut_validate(data, table)),
            None => 0,
        }
    }
}

abi_fn! {
    /// `dst[i] = lut[src[i]]` for `i < len`. `src == dst` remaps in place.
    /// A null `lut` or `dst` leaves the output untouched.
    fn map_u8_lut(src: *const u8, len: size_t, dst: *mut u8, lut: *const u8) {
        let Some(table) = borrow_table(lut) else {
            return;
        };
        if src == dst.cast_const() {
            map_bytes_in_place(borrow_slice_mut(dst, len), table);
            return;
        }
        let input = borrow_bytes(src, len);
        let output = borrow_slice_mut(dst, input.len());
        map_bytes(output, input, table);
    }
}

/// Active kernel level: 0 scalar, 1 ssse3, 2 avx2, 3 neon.
#[unsafe(no_mangle)]
pub extern "C" fn simba_simd_level() -> u8 {
    simba_core::active_level().code()
}
