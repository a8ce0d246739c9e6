use simba_core::KernelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Kernel(#[from] KernelError),
    #[error("invalid seed '{0}' (expected decimal or 0x-prefixed hex)")]
    InvalidSeed(String),
    #[error("{mismatches} differential mismatches across {cases} cases")]
    Mismatch { mismatches: u64, cases: u64 },
}
