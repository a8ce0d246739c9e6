//! Verification harness for simba.
//!
//! This crate provides:
//! - Differential verification: every supported SIMD level against the
//!   scalar reference on deterministic pseudo-random buffers
//! - Structured JSONL logging with an artifact index (SHA-256 digests)
//! - Capability reporting and a boundary-latency probe

#![forbid(unsafe_code)]

pub mod capabilities;
pub mod differential;
pub mod error;
pub mod latency;
pub mod report;
pub mod structured_log;

pub use capabilities::Capabilities;
pub use differential::{DiffConfig, DiffReport, KernelId};
pub use error::HarnessError;
