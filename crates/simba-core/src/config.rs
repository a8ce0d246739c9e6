//! Runtime SIMD level configuration.
//!
//! The level is chosen via the `SIMBA_SIMD` environment variable:
//! - `auto` (default): use the best level the CPU supports.
//! - `scalar`: force the portable scalar kernels (also disables hardware CRC).
//! - `ssse3`, `avx2`, `neon`: request a specific vector level. A request the
//!   CPU cannot honor falls back to the detected level.
//!
//! The variable is read once, on the first dispatched kernel call; see
//! [`crate::dispatch::active_level`].

use crate::dispatch::Level;

/// Environment variable consulted on first kernel use.
pub const SIMD_ENV: &str = "SIMBA_SIMD";

/// Parsed value of [`SIMD_ENV`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelRequest {
    /// Use whatever the CPU probe selects.
    #[default]
    Auto,
    /// Pin a specific level (subject to CPU support).
    Forced(Level),
}

impl LevelRequest {
    /// Parse from string (case-insensitive). Unknown values mean `Auto`.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "scalar" | "off" | "none" | "disabled" | "portable" => Self::Forced(Level::Scalar),
            "ssse3" | "sse" | "sse2" => Self::Forced(Level::Ssse3),
            "avx2" | "avx" => Self::Forced(Level::Avx2),
            "neon" | "asimd" => Self::Forced(Level::Neon),
            _ => Self::Auto,
        }
    }
}

/// Read [`SIMD_ENV`] from the process environment.
#[must_use]
pub fn requested_level() -> LevelRequest {
    std::env::var(SIMD_ENV)
        .map(|v| LevelRequest::from_str_loose(&v))
        .unwrap_or_default()
}

/// Combine a request with the detected level.
///
/// Scalar is always honored. Any other forced level is honored only when
/// the CPU supports it.
#[must_use]
pub fn resolve_level(request: LevelRequest, detected: Level) -> Level {
    match request {
        LevelRequest::Auto => detected,
        LevelRequest::Forced(level) if level.is_supported() => level,
        LevelRequest::Forced(_) => detected,
    }
}
