//! Error type for the fallible corners of the safe API.
//!
//! The kernels themselves cannot fail. Errors only arise when a caller asks
//! for something the slice API can check up front: an output buffer that is
//! too short, or a SIMD level that does not exist or is not available.

use crate::dispatch::Level;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KernelError {
    /// `try_map_bytes` was given a destination shorter than its source.
    #[error("output buffer too short: need {needed} bytes, have {available}")]
    OutputTooShort { needed: usize, available: usize },

    /// A level name did not match any known level.
    #[error("unknown SIMD level '{0}'")]
    UnknownLevel(String),

    /// The level exists but this CPU (or target architecture) lacks it.
    #[error("SIMD level '{0}' is not supported on this CPU")]
    Unsupported(Level),
}
