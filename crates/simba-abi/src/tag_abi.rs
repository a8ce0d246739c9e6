//! ABI layer for tag validation.

use libc::size_t;

use crate::util::borrow_bytes;

abi_fn! {
    /// 1 if every byte is in `[a-z0-9:./_-]` with no `__`, else 0.
    fn validate_tag_inner(ptr: *const u8, len: size_t) -> u8 {
        u8::from(simba_core::validate_tag_inner(borrow_bytes(ptr, len)))
    }
}

abi_fn! {
    /// 1 if the buffer is a well-formed tag, else 0.
    fn validate_tag(ptr: *const u8, len: size_t) -> u8 {
        u8::from(simba_core::validate_tag(borrow_bytes(ptr, len)))
    }
}
