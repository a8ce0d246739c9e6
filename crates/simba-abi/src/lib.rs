// Every export takes raw pointers from C callers under a documented
// precondition contract (see include/simba.h).
#![allow(clippy::missing_safety_doc)]
//! # simba-abi
//!
//! Flat `extern "C"` boundary for the simba kernels.
//!
//! This crate produces a `cdylib` (`libsimba.so`) exposing the symbols listed
//! in `include/simba.h`. Each entry point turns its `(pointer, length)`
//! arguments into borrowed slices (see [`util`]) and delegates to the safe
//! dispatched kernels in `simba-core`.
//!
//! ```text
//! C caller -> ABI entry (this crate) -> slice borrow -> simba_core kernel -> return
//! ```
//!
//! There is no error channel: a zero length is always valid and yields the
//! empty-input result, anything else (null with nonzero length, a short
//! table, partially overlapping buffers) is undefined behavior.

#[macro_use]
mod macros;

pub mod crc32c_abi;
pub mod kernel_abi;
pub mod mask_abi;
pub mod tag_abi;
pub mod util;
