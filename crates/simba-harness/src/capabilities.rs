//! What this process will run: detected CPU level, configuration and the
//! level actually in use.

use serde::Serialize;
use simba_core::config::{LevelRequest, SIMD_ENV, requested_level};
use simba_core::crc32c::backend_name;
use simba_core::dispatch::{Level, active_level, detect_level};

#[derive(Debug, Clone, Serialize)]
pub struct Capabilities {
    pub arch: &'static str,
    pub detected: &'static str,
    /// Raw value of `SIMBA_SIMD`, if set.
    pub configured: Option<String>,
    /// Level requested by configuration, `auto` when unset or unrecognized.
    pub requested: &'static str,
    pub active: &'static str,
    pub supported: Vec<&'static str>,
    pub crc_backend: &'static str,
    pub vector_width: usize,
}

impl Capabilities {
    #[must_use]
    pub fn probe() -> Self {
        let active = active_level();
        let requested = match requested_level() {
            LevelRequest::Auto => "auto",
            LevelRequest::Forced(level) => level.name(),
        };
        Self {
            arch: std::env::consts::ARCH,
            detected: detect_level().name(),
            configured: std::env::var(SIMD_ENV).ok(),
            requested,
            active: active.name(),
            supported: Level::supported().map(Level::name).collect(),
            crc_backend: backend_name(active),
            vector_width: active.vector_width(),
        }
    }
}
