//! Wrap-around byte summation.

use crate::dispatch::kernels;

/// Sum of all bytes modulo 2^32. An empty buffer sums to 0.
///
/// ```
/// assert_eq!(simba_core::sum_u8(&[1, 2, 3]), 6);
/// ```
#[inline]
#[must_use]
pub fn sum_u8(data: &[u8]) -> u32 {
    kernels().sum_u8(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_inputs() {
        assert_eq!(sum_u8(&[]), 0);
        assert_eq!(sum_u8(&[1, 2, 3]), 6);
        assert_eq!(sum_u8(&[255; 4]), 1020);
    }

    #[test]
    fn full_byte_range() {
        let data: Vec<u8> = (0..=255).collect();
        assert_eq!(sum_u8(&data), 32_640);
    }

    #[test]
    fn wraps_modulo_2_32() {
        // 16_843_010 * 255 = 2^32 + 254
        let data = vec![0xFFu8; 16_843_010];
        assert_eq!(sum_u8(&data), 254);
    }
}
