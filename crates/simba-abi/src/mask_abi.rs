//! ABI layer for byte-equality bitmasks.
//!
//! Each function writes one mask word per whole chunk of `ptr`, at most
//! `out_len` words, and returns the number of input bytes processed.

use libc::size_t;

use simba_core::mask::{MaskWord, eq_masks};

use crate::util::{borrow_bytes, borrow_slice_mut};

unsafe fn masks<W: MaskWord>(
    ptr: *const u8,
    len: size_t,
    needle: u8,
    out: *mut W,
    out_len: size_t,
) -> size_t {
    // SAFETY: forwarded caller contract.
    let data = unsafe { borrow_bytes(ptr, len) };
    let out = unsafe { borrow_slice_mut(out, out_len) };
    eq_masks(data, needle, out)
}

abi_fn! {
    /// 16-byte chunks, one `uint16_t` per chunk.
    fn eq_u8_masks16(ptr: *const u8, len: size_t, needle: u8, out: *mut u16, out_len: size_t) -> size_t {
        masks(ptr, len, needle, out, out_len)
    }
}

abi_fn! {
    /// 32-byte chunks, one `uint32_t` per chunk.
    fn eq_u8_masks32(ptr: *const u8, len: size_t, needle: u8, out: *mut u32, out_len: size_t) -> size_t {
        masks(ptr, len, needle, out, out_len)
    }
}

abi_fn! {
    /// 64-byte chunks, one `uint64_t` per chunk.
    fn eq_u8_masks64(ptr: *const u8, len: size_t, needle: u8, out: *mut u64, out_len: size_t) -> size_t {
        masks(ptr, len, needle, out, out_len)
    }
}
