//! 7-bit ASCII classification.

use crate::dispatch::kernels;

/// Returns `true` if every byte is in `0..=127`. An empty buffer is ASCII.
///
/// Returns as soon as a vector block with a high bit is seen.
#[inline]
#[must_use]
pub fn is_ascii(data: &[u8]) -> bool {
    kernels().is_ascii(data)
}
