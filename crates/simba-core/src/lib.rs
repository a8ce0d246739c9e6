//! # simba-core
//!
//! Safe Rust byte-buffer kernels with runtime SIMD dispatch.
//!
//! Every public function operates on borrowed slices and never allocates.
//! The CPU is probed once per process ([`dispatch::active_level`]) and the
//! matching [`dispatch::KernelSet`] is used for every subsequent call. The
//! scalar kernels in [`scalar`] define the reference results; each vector
//! variant must agree with them bit for bit.
//!
//! No `unsafe` code is permitted at the crate level. Vector intrinsics are
//! confined to the [`simd`] module.

#![deny(unsafe_code)]

pub mod ascii;
pub mod config;
pub mod crc32c;
pub mod dispatch;
pub mod error;
pub mod lut;
pub mod mask;
pub mod probe;
pub mod scalar;
#[allow(unsafe_code)]
pub mod simd;
pub mod sum;
pub mod tag;

// Re-export the kernel entry points.
pub use ascii::is_ascii;
pub use crc32c::{crc32c, crc32c_combine, crc32c_update};
pub use dispatch::{KernelSet, Level, active_level, kernels};
pub use error::KernelError;
pub use lut::{ByteTable, map_bytes, map_bytes_in_place, try_map_bytes, validate_u8_lut};
pub use mask::{MaskWord, eq_masks};
pub use probe::noop;
pub use sum::sum_u8;
pub use tag::{validate_tag, validate_tag_inner};
