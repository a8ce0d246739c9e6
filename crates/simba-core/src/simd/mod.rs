//! Kernel variant tables.
//!
//! Each [`Level`] owns one immutable [`KernelSet`]: a bundle of function
//! pointers to the scalar or vector implementation of every kernel. The
//! vector bodies are `#[target_feature]` functions and therefore `unsafe` to
//! call; a `KernelSet` can only be obtained through [`KernelSet::for_level`],
//! which checks CPU support first, so its safe methods uphold that contract.
//!
//! Every vector body processes whole vectors and hands the remainder to the
//! scalar kernels, so results are bit-identical across levels.

use std::fmt;

use crate::crc32c::update_software;
use crate::dispatch::Level;
use crate::error::KernelError;
use crate::lut::ByteTable;
use crate::scalar;

#[cfg(target_arch = "x86_64")]
mod avx2;
#[cfg(target_arch = "aarch64")]
mod neon;
#[cfg(target_arch = "x86_64")]
mod ssse3;

/// Number of bytes covered by one `eq_mask64` call.
pub const MASK_BLOCK: usize = 64;

type SumFn = unsafe fn(&[u8]) -> u32;
type AsciiFn = unsafe fn(&[u8]) -> bool;
type ValidateFn = unsafe fn(&[u8], &ByteTable) -> bool;
type MapFn = unsafe fn(*const u8, *mut u8, usize, &ByteTable);
type EqMaskFn = unsafe fn(&[u8; MASK_BLOCK], u8) -> u64;
type CrcFn = unsafe fn(u32, &[u8]) -> u32;

/// Resolved kernel implementations for one capability level.
pub struct KernelSet {
    level: Level,
    sum_u8: SumFn,
    is_ascii: AsciiFn,
    validate_u8_lut: ValidateFn,
    map: MapFn,
    eq_mask64: EqMaskFn,
    crc32c: CrcFn,
}

impl fmt::Debug for KernelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KernelSet")
            .field("level", &self.level)
            .finish()
    }
}

static SCALAR: KernelSet = KernelSet {
    level: Level::Scalar,
    sum_u8: scalar::sum_u8,
    is_ascii: scalar::is_ascii,
    validate_u8_lut: scalar::validate_u8_lut,
    map: map_tail,
    eq_mask64: scalar_eq_mask64,
    crc32c: update_software,
};

#[cfg(target_arch = "x86_64")]
static SSSE3: KernelSet = KernelSet {
    level: Level::Ssse3,
    sum_u8: ssse3::sum_u8,
    is_ascii: ssse3::is_ascii,
    validate_u8_lut: ssse3::validate_u8_lut,
    map: ssse3::map,
    eq_mask64: ssse3::eq_mask64,
    crc32c: update_software,
};

#[cfg(target_arch = "x86_64")]
static AVX2: KernelSet = KernelSet {
    level: Level::Avx2,
    sum_u8: avx2::sum_u8,
    is_ascii: avx2::is_ascii,
    validate_u8_lut: avx2::validate_u8_lut,
    map: avx2::map,
    eq_mask64: avx2::eq_mask64,
    crc32c: avx2::crc32c_update,
};

#[cfg(target_arch = "aarch64")]
static NEON: KernelSet = KernelSet {
    level: Level::Neon,
    sum_u8: neon::sum_u8,
    is_ascii: neon::is_ascii,
    validate_u8_lut: neon::validate_u8_lut,
    map: neon::map,
    eq_mask64: neon::eq_mask64,
    crc32c: neon::crc32c_update,
};

impl KernelSet {
    /// Kernel set for `level`, or `None` if the CPU cannot run it.
    #[must_use]
    pub fn for_level(level: Level) -> Option<&'static KernelSet> {
        if !level.is_supported() {
            return None;
        }
        Self::resolved(level)
    }

    /// Kernel set for a level already known to be supported, without
    /// probing the CPU again. Only the dispatch cache calls this.
    pub(crate) fn resolved(level: Level) -> Option<&'static KernelSet> {
        match level {
            Level::Scalar => Some(&SCALAR),
            #[cfg(target_arch = "x86_64")]
            Level::Ssse3 => Some(&SSSE3),
            #[cfg(target_arch = "x86_64")]
            Level::Avx2 => Some(&AVX2),
            #[cfg(target_arch = "aarch64")]
            Level::Neon => Some(&NEON),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }

    /// Like [`KernelSet::for_level`] but reports why a level is unavailable.
    pub fn try_for_level(level: Level) -> Result<&'static KernelSet, KernelError> {
        Self::for_level(level).ok_or(KernelError::Unsupported(level))
    }

    /// The portable scalar set. Always available.
    #[must_use]
    pub fn scalar() -> &'static KernelSet {
        &SCALAR
    }

    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    /// Sum of all bytes modulo 2^32.
    #[inline]
    pub fn sum_u8(&self, data: &[u8]) -> u32 {
        // SAFETY: `for_level` only hands out sets the CPU supports.
        unsafe { (self.sum_u8)(data) }
    }

    /// Returns `true` if every byte is 7-bit ASCII.
    #[inline]
    pub fn is_ascii(&self, data: &[u8]) -> bool {
        // SAFETY: see `sum_u8`.
        unsafe { (self.is_ascii)(data) }
    }

    /// Returns `true` if `table[b] != 0` for every byte `b` of `data`.
    #[inline]
    pub fn validate_u8_lut(&self, data: &[u8], table: &ByteTable) -> bool {
        // SAFETY: see `sum_u8`.
        unsafe { (self.validate_u8_lut)(data, table) }
    }

    /// Maps `min(src.len(), dst.len())` bytes through `table`, returning the
    /// count written.
    #[inline]
    pub fn map(&self, src: &[u8], dst: &mut [u8], table: &ByteTable) -> usize {
        let n = src.len().min(dst.len());
        // SAFETY: both slices cover at least `n` bytes and cannot overlap
        // (one is borrowed shared, the other exclusively).
        unsafe { (self.map)(src.as_ptr(), dst.as_mut_ptr(), n, table) };
        n
    }

    /// Remaps `buf` through `table` in place.
    #[inline]
    pub fn map_in_place(&self, buf: &mut [u8], table: &ByteTable) {
        let len = buf.len();
        let ptr = buf.as_mut_ptr();
        // SAFETY: source and destination are the exact same region; every
        // variant loads a block before storing to it.
        unsafe { (self.map)(ptr.cast_const(), ptr, len, table) };
    }

    /// Equality bitmask for one 64-byte block: bit `i` set iff
    /// `block[i] == needle`.
    #[inline]
    pub fn eq_mask64(&self, block: &[u8; MASK_BLOCK], needle: u8) -> u64 {
        // SAFETY: see `sum_u8`.
        unsafe { (self.eq_mask64)(block, needle) }
    }

    /// Advances a raw (non-inverted) CRC-32C register over `data`.
    #[inline]
    pub fn crc32c_raw(&self, state: u32, data: &[u8]) -> u32 {
        // SAFETY: see `sum_u8`.
        unsafe { (self.crc32c)(state, data) }
    }
}

/// Byte-at-a-time remap over raw pointers.
///
/// Used as the scalar map kernel and as the remainder loop of every vector
/// map kernel. Each byte is read before the same index is written, so
/// `src == dst` is fine.
///
/// # Safety
///
/// `src` must be valid for `len` reads and `dst` for `len` writes; the two
/// regions are either identical or disjoint.
unsafe fn map_tail(src: *const u8, dst: *mut u8, len: usize, table: &ByteTable) {
    for i in 0..len {
        // SAFETY: `i < len`, within both regions per the contract above.
        unsafe { *dst.add(i) = table[usize::from(*src.add(i))] };
    }
}

fn scalar_eq_mask64(block: &[u8; MASK_BLOCK], needle: u8) -> u64 {
    scalar::eq_mask(block, needle)
}
