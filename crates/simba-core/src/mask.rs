//! Byte-equality bitmasks.
//!
//! [`eq_masks`] splits a buffer into chunks of `W::LANES` bytes and, for each
//! chunk, sets bit `i` of the output word iff byte `i` equals the needle.
//! Bulk work is done 64 bytes at a time by the active kernel set; each 64-bit
//! block mask is then sliced into the requested word width.

use crate::dispatch::kernels;
use crate::scalar;
use crate::simd::MASK_BLOCK;

mod sealed {
    pub trait Sealed {}
    impl Sealed for u16 {}
    impl Sealed for u32 {}
    impl Sealed for u64 {}
}

/// Output word for [`eq_masks`]: one bit per byte lane.
pub trait MaskWord: sealed::Sealed + Copy + Default {
    /// Bytes covered by one word.
    const LANES: usize;

    /// Truncate the low `LANES` bits of a 64-bit mask.
    fn from_bits(bits: u64) -> Self;
}

impl MaskWord for u16 {
    const LANES: usize = 16;

    #[inline]
    fn from_bits(bits: u64) -> Self {
        bits as u16
    }
}

impl MaskWord for u32 {
    const LANES: usize = 32;

    #[inline]
    fn from_bits(bits: u64) -> Self {
        bits as u32
    }
}

impl MaskWord for u64 {
    const LANES: usize = 64;

    #[inline]
    fn from_bits(bits: u64) -> Self {
        bits
    }
}

/// Fills `out[k]` with the equality mask of chunk `k` of `data`.
///
/// Processes `min(data.len() / W::LANES, out.len())` whole chunks; trailing
/// bytes that do not fill a chunk are ignored. Returns the number of bytes
/// processed.
pub fn eq_masks<W: MaskWord>(data: &[u8], needle: u8, out: &mut [W]) -> usize {
    let chunks = (data.len() / W::LANES).min(out.len());
    let words_per_block = MASK_BLOCK / W::LANES;
    let set = kernels();

    let mut words = out[..chunks].chunks_exact_mut(words_per_block);
    let mut blocks = data.chunks_exact(MASK_BLOCK);
    for (dst, block) in (&mut words).zip(&mut blocks) {
        let Some(block) = block.first_chunk::<MASK_BLOCK>() else {
            break;
        };
        let bits = set.eq_mask64(block, needle);
        for (j, word) in dst.iter_mut().enumerate() {
            *word = W::from_bits(bits >> (j * W::LANES));
        }
    }

    // Fewer than one block's worth of words left.
    let done = (chunks / words_per_block) * words_per_block;
    for (k, word) in out[done..chunks].iter_mut().enumerate() {
        let start = (done + k) * W::LANES;
        *word = W::from_bits(scalar::eq_mask(&data[start..start + W::LANES], needle));
    }

    chunks * W::LANES
}
