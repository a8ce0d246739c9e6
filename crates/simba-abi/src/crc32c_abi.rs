//! ABI layer for CRC-32C.

use libc::size_t;

use crate::util::borrow_bytes;

abi_fn! {
    /// Extends the finished CRC `init` with `len` bytes at `ptr`. Pass 0 to
    /// start a fresh checksum. Empty input returns `init`.
    fn crc32c_update(ptr: *const u8, len: size_t, init: u32) -> u32 {
        simba_core::crc32c_update(init, borrow_bytes(ptr, len))
    }
}

/// CRC of the concatenation of two buffers from their CRCs and the length of
/// the second.
#[unsafe(no_mangle)]
pub extern "C" fn crc32c_combine(crc1: u32, crc2: u32, len2: size_t) -> u32 {
    simba_core::crc32c_combine(crc1, crc2, len2)
}
