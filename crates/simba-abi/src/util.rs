//! Raw-pointer to slice conversion for the ABI entry points.
//!
//! This is the only place where caller-provided addresses become Rust
//! references. Every helper maps a zero length (with any pointer, null
//! included) to an empty slice without touching the pointer.

use std::slice;

use simba_core::ByteTable;

/// Borrow `len` bytes at `ptr` for the duration of one call.
///
/// # Safety
///
/// If `len > 0`, `ptr` must be non-null and valid for `len` reads, and the
/// region must not be written during the call.
#[inline]
pub unsafe fn borrow_bytes<'a>(ptr: *const u8, len: usize) -> &'a [u8] {
    if ptr.is_null() || len == 0 {
        return &[];
    }
    // SAFETY: caller contract above.
    unsafe { slice::from_raw_parts(ptr, len) }
}

/// Mutably borrow `len` elements at `ptr` for the duration of one call.
///
/// # Safety
///
/// If `len > 0`, `ptr` must be non-null, aligned for `T`, valid for `len`
/// reads and writes, and not aliased by any other live borrow.
#[inline]
pub unsafe fn borrow_slice_mut<'a, T>(ptr: *mut T, len: usize) -> &'a mut [T] {
    if ptr.is_null() || len == 0 {
        return &mut [];
    }
    // SAFETY: caller contract above.
    unsafe { slice::from_raw_parts_mut(ptr, len) }
}

/// Borrow a 256-entry table. Returns `None` for a null pointer.
///
/// # Safety
///
/// A non-null `ptr` must be valid for 256 reads.
#[inline]
pub unsafe fn borrow_table<'a>(ptr: *const u8) -> Option<&'a ByteTable> {
    // SAFETY: `[u8; 256]` has alignment 1; validity is the caller's contract.
    unsafe { ptr.cast::<ByteTable>().as_ref() }
}
