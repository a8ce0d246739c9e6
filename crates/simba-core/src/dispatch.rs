//! Runtime capability dispatch.
//!
//! The CPU is probed once per process. The detected level, optionally
//! narrowed by the `SIMBA_SIMD` environment variable (see [`crate::config`]),
//! selects one immutable [`KernelSet`] of function pointers that every public
//! kernel call goes through. Nothing is re-probed per call.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::config::{requested_level, resolve_level};
use crate::error::KernelError;

pub use crate::simd::KernelSet;

/// SIMD capability tier.
///
/// All variants exist on every target so that configuration, logs and the
/// C ABI speak one vocabulary; [`Level::is_supported`] reports whether the
/// running CPU can actually execute a tier.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
    /// Portable scalar kernels. Always available.
    #[default]
    Scalar,
    /// x86_64 SSSE3 (16-byte lanes, `pshufb` table lookups).
    Ssse3,
    /// x86_64 AVX2 + SSE4.2 (32-byte lanes, hardware CRC-32C).
    Avx2,
    /// aarch64 NEON + CRC (16-byte lanes, `tbl` table lookups).
    Neon,
}

impl Level {
    /// Every level, scalar first.
    pub const ALL: [Level; 4] = [Level::Scalar, Level::Ssse3, Level::Avx2, Level::Neon];

    /// Stable numeric code used across the C boundary.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Scalar => 0,
            Self::Ssse3 => 1,
            Self::Avx2 => 2,
            Self::Neon => 3,
        }
    }

    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Scalar),
            1 => Some(Self::Ssse3),
            2 => Some(Self::Avx2),
            3 => Some(Self::Neon),
            _ => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Ssse3 => "ssse3",
            Self::Avx2 => "avx2",
            Self::Neon => "neon",
        }
    }

    /// Width in bytes of one vector register at this level.
    #[must_use]
    pub const fn vector_width(self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Ssse3 | Self::Neon => 16,
            Self::Avx2 => 32,
        }
    }

    /// Returns true if the running CPU can execute this level.
    #[must_use]
    pub fn is_supported(self) -> bool {
        probe(self)
    }

    /// Levels the running CPU supports, scalar first.
    pub fn supported() -> impl Iterator<Item = Level> {
        Self::ALL.into_iter().filter(|level| level.is_supported())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Level {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| KernelError::UnknownLevel(s.to_string()))
    }
}

#[cfg(target_arch = "x86_64")]
fn probe(level: Level) -> bool {
    match level {
        Level::Scalar => true,
        Level::Ssse3 => std::arch::is_x86_feature_detected!("ssse3"),
        Level::Avx2 => {
            std::arch::is_x86_feature_detected!("avx2")
                && std::arch::is_x86_feature_detected!("sse4.2")
        }
        Level::Neon => false,
    }
}

#[cfg(target_arch = "aarch64")]
fn probe(level: Level) -> bool {
    match level {
        Level::Scalar => true,
        Level::Neon => {
            std::arch::is_aarch64_feature_detected!("neon")
                && std::arch::is_aarch64_feature_detected!("crc")
        }
        Level::Ssse3 | Level::Avx2 => false,
    }
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
fn probe(level: Level) -> bool {
    matches!(level, Level::Scalar)
}

/// Best level the running CPU supports, ignoring configuration.
#[must_use]
pub fn detect_level() -> Level {
    [Level::Avx2, Level::Ssse3, Level::Neon]
        .into_iter()
        .find(|level| level.is_supported())
        .unwrap_or(Level::Scalar)
}

// Atomic cache: 0..=3 = resolved level code, UNRESOLVED, RESOLVING.
// Same non-blocking shape as a OnceLock but without its futex wait: a caller
// that races the resolver gets the scalar set, which produces identical
// results, only slower.
static CACHED_LEVEL: AtomicU8 = AtomicU8::new(LEVEL_UNRESOLVED);

const LEVEL_UNRESOLVED: u8 = 254;
const LEVEL_RESOLVING: u8 = 255;

/// Level used by every dispatched kernel call in this process.
///
/// Resolved on first use from [`detect_level`] and the `SIMBA_SIMD`
/// environment variable, cached thereafter.
#[must_use]
pub fn active_level() -> Level {
    let cached = CACHED_LEVEL.load(Ordering::Acquire);
    if let Some(level) = Level::from_code(cached) {
        return level;
    }
    if cached == LEVEL_RESOLVING {
        return Level::Scalar;
    }

    if CACHED_LEVEL
        .compare_exchange(
            LEVEL_UNRESOLVED,
            LEVEL_RESOLVING,
            Ordering::SeqCst,
            Ordering::Relaxed,
        )
        .is_err()
    {
        return Level::from_code(CACHED_LEVEL.load(Ordering::Acquire)).unwrap_or(Level::Scalar);
    }

    let level = resolve_level(requested_level(), detect_level());
    CACHED_LEVEL.store(level.code(), Ordering::Release);
    level
}

/// Kernel set for the active level.
///
/// The cache only ever holds a level that passed [`Level::is_supported`]
/// when it was resolved, so this does a table lookup and no CPU probe.
#[inline]
#[must_use]
pub fn kernels() -> &'static KernelSet {
    KernelSet::resolved(active_level()).unwrap_or(KernelSet::scalar())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    // Serializes tests that observe or poke the process-wide cache.
    static CACHE_LOCK: Mutex<()> = Mutex::new(());

    // Waits out a resolver racing on another test thread.
    fn settled_level() -> Level {
        loop {
            let level = active_level();
            if Level::from_code(CACHED_LEVEL.load(Ordering::Acquire)) == Some(level) {
                return level;
            }
            std::hint::spin_loop();
        }
    }

    #[test]
    fn codes_round_trip() {
        for level in Level::ALL {
            assert_eq!(Level::from_code(level.code()), Some(level));
        }
        assert_eq!(Level::from_code(4), None);
        assert_eq!(Level::from_code(LEVEL_UNRESOLVED), None);
        assert_eq!(Level::from_code(LEVEL_RESOLVING), None);
    }

    #[test]
    fn parse_level_names() {
        assert_eq!("scalar".parse::<Level>(), Ok(Level::Scalar));
        assert_eq!("AVX2".parse::<Level>(), Ok(Level::Avx2));
        assert_eq!("Neon".parse::<Level>(), Ok(Level::Neon));
        assert_eq!(
            "sse9".parse::<Level>(),
            Err(KernelError::UnknownLevel("sse9".to_string()))
        );
    }

    #[test]
    fn scalar_always_supported() {
        assert!(Level::Scalar.is_supported());
        assert_eq!(Level::supported().next(), Some(Level::Scalar));
    }

    #[test]
    fn detected_level_is_supported() {
        assert!(detect_level().is_supported());
    }

    #[test]
    fn active_level_is_sticky_and_supported() {
        let _guard = CACHE_LOCK.lock().unwrap();
        let first = settled_level();
        assert!(first.is_supported());
        assert_eq!(active_level(), first);
        assert_eq!(kernels().level(), first);
    }

    #[test]
    fn kernels_returns_the_cached_set() {
        let _guard = CACHE_LOCK.lock().unwrap();
        let level = settled_level();
        let first = kernels();
        assert!(std::ptr::eq(first, kernels()));
        assert!(std::ptr::eq(first, KernelSet::for_level(level).unwrap()));
        assert_eq!(first.level(), level);
    }

    #[test]
    fn resolving_state_falls_back_to_scalar() {
        let _guard = CACHE_LOCK.lock().unwrap();
        let _ = settled_level();
        let previous = CACHED_LEVEL.swap(LEVEL_RESOLVING, Ordering::SeqCst);
        assert_eq!(active_level(), Level::Scalar);
        CACHED_LEVEL.store(previous, Ordering::SeqCst);
    }

    #[test]
    fn vector_widths() {
        assert_eq!(Level::Scalar.vector_width(), 1);
        assert_eq!(Level::Ssse3.vector_width(), 16);
        assert_eq!(Level::Avx2.vector_width(), 32);
        assert_eq!(Level::Neon.vector_width(), 16);
    }
}
