//! Differential verification of SIMD kernels against the scalar reference.
//!
//! For every length `0..=max_len` a deterministic pseudo-random buffer is
//! generated from the seed and fed to each kernel at each level under test.
//! Results are compared with the scalar [`KernelSet`]; one summary entry is
//! logged per `(kernel, level)` pair.

use std::time::Instant;

use serde::Serialize;
use simba_core::dispatch::{KernelSet, Level};
use simba_core::lut::{ASCII_ALNUM_SET, ByteTable, table_from_fn};
use simba_core::simd::MASK_BLOCK;
use simba_core::tag::TAG_BODY;

use crate::error::HarnessError;
use crate::structured_log::{LogEmitter, LogEntry, LogLevel, Outcome, StreamKind};

/// Kernels exercised by the differential run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelId {
    SumU8,
    IsAscii,
    ValidateU8Lut,
    MapU8Lut,
    MapU8LutInPlace,
    EqMask64,
    Crc32c,
}

impl KernelId {
    pub const ALL: [KernelId; 7] = [
        KernelId::SumU8,
        KernelId::IsAscii,
        KernelId::ValidateU8Lut,
        KernelId::MapU8Lut,
        KernelId::MapU8LutInPlace,
        KernelId::EqMask64,
        KernelId::Crc32c,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SumU8 => "sum_u8",
            Self::IsAscii => "is_ascii",
            Self::ValidateU8Lut => "validate_u8_lut",
            Self::MapU8Lut => "map_u8_lut",
            Self::MapU8LutInPlace => "map_u8_lut_in_place",
            Self::EqMask64 => "eq_u8_masks64",
            Self::Crc32c => "crc32c",
        }
    }
}

/// Parameters for one differential run.
#[derive(Debug, Clone)]
pub struct DiffConfig {
    pub run_id: String,
    pub seed: u64,
    pub max_len: usize,
    /// Levels to check; `None` means every supported level.
    pub levels: Option<Vec<Level>>,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            run_id: "verify".to_string(),
            seed: DEFAULT_SEED,
            max_len: 4 * MASK_BLOCK + 63,
            levels: None,
        }
    }
}

pub const DEFAULT_SEED: u64 = 0x5EED_51BA_D1FF_2026;

/// First disagreement seen for a `(kernel, level)` pair.
#[derive(Debug, Clone, Serialize)]
pub struct Mismatch {
    pub len: usize,
    pub expected: String,
    pub actual: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct KernelOutcome {
    pub kernel: KernelId,
    pub level: &'static str,
    pub cases: u64,
    pub mismatches: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_mismatch: Option<Mismatch>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiffReport {
    pub run_id: String,
    pub seed: u64,
    pub max_len: usize,
    pub levels: Vec<&'static str>,
    pub total_cases: u64,
    pub total_mismatches: u64,
    pub duration_ms: u64,
    pub outcomes: Vec<KernelOutcome>,
}

impl DiffReport {
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.total_mismatches == 0
    }

    /// `Ok` when every case agreed, otherwise [`HarnessError::Mismatch`].
    pub fn into_result(self) -> Result<Self, HarnessError> {
        if self.all_passed() {
            Ok(self)
        } else {
            Err(HarnessError::Mismatch {
                mismatches: self.total_mismatches,
                cases: self.total_cases,
            })
        }
    }
}

/// splitmix64; tiny, seedable and good enough for test inputs.
#[derive(Debug, Clone)]
pub struct SplitMix64(u64);

impl SplitMix64 {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    pub fn fill(&mut self, buf: &mut [u8]) {
        for chunk in buf.chunks_mut(8) {
            let word = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
    }
}

/// Inputs for one length: noise plus variants biased toward the slow paths
/// (all-ASCII, all-accepted) so early exits do not hide tail bugs.
struct Inputs {
    noise: Vec<u8>,
    ascii: Vec<u8>,
    accepted: Vec<u8>,
}

impl Inputs {
    fn generate(rng: &mut SplitMix64, len: usize, table: &ByteTable) -> Self {
        let mut noise = vec![0u8; len];
        rng.fill(&mut noise);

        let mut ascii: Vec<u8> = noise.iter().map(|b| b & 0x7F).collect();
        // Plant one high byte in roughly half of the buffers.
        if len > 0 && rng.next_u64() & 1 == 0 {
            let pos = (rng.next_u64() % len as u64) as usize;
            ascii[pos] |= 0x80;
        }

        let allowed: Vec<u8> = (0..=u8::MAX).filter(|&b| table[usize::from(b)] != 0).collect();
        let mut accepted: Vec<u8> = noise
            .iter()
            .map(|&b| allowed[usize::from(b) % allowed.len()])
            .collect();
        if len > 0 && rng.next_u64() & 1 == 0 {
            let pos = (rng.next_u64() % len as u64) as usize;
            if let Some(rejected) = (0..=u8::MAX).find(|&b| table[usize::from(b)] == 0) {
                accepted[pos] = rejected;
            }
        }

        Self {
            noise,
            ascii,
            accepted,
        }
    }
}

fn tables() -> [ByteTable; 3] {
    [
        ASCII_ALNUM_SET,
        TAG_BODY,
        table_from_fn(|b| u8::from(b.count_ones() % 2 == 1)),
    ]
}

/// Mapping table: a byte permutation so every lane's source matters.
fn map_table() -> ByteTable {
    table_from_fn(|b| b.wrapping_mul(181).wrapping_add(7))
}

fn compare<T: PartialEq + std::fmt::Debug>(
    outcome: &mut KernelOutcome,
    len: usize,
    expected: T,
    actual: T,
) {
    outcome.cases += 1;
    if expected != actual {
        outcome.mismatches += 1;
        if outcome.first_mismatch.is_none() {
            outcome.first_mismatch = Some(Mismatch {
                len,
                expected: format!("{expected:?}"),
                actual: format!("{actual:?}"),
            });
        }
    }
}

fn check_kernel(
    kernel: KernelId,
    set: &KernelSet,
    reference: &KernelSet,
    config: &DiffConfig,
) -> KernelOutcome {
    let mut outcome = KernelOutcome {
        kernel,
        level: set.level().name(),
        cases: 0,
        mismatches: 0,
        first_mismatch: None,
    };
    let tables = tables();
    let map = map_table();
    // Same seed for every level so each sees identical inputs.
    let mut rng = SplitMix64::new(config.seed);

    for len in 0..=config.max_len {
        let table = &tables[len % tables.len()];
        let inputs = Inputs::generate(&mut rng, len, table);
        match kernel {
            KernelId::SumU8 => compare(
                &mut outcome,
                len,
                reference.sum_u8(&inputs.noise),
                set.sum_u8(&inputs.noise),
            ),
            KernelId::IsAscii => compare(
                &mut outcome,
                len,
                reference.is_ascii(&inputs.ascii),
                set.is_ascii(&inputs.ascii),
            ),
            KernelId::ValidateU8Lut => {
                for data in [&inputs.noise, &inputs.accepted] {
                    compare(
                        &mut outcome,
                        len,
                        reference.validate_u8_lut(data, table),
                        set.validate_u8_lut(data, table),
                    );
                }
            }
            KernelId::MapU8Lut => {
                // Output is one byte longer than the input to catch overruns.
                let mut want = vec![0xEEu8; len + 1];
                let mut got = vec![0xEEu8; len + 1];
                reference.map(&inputs.noise, &mut want, &map);
                set.map(&inputs.noise, &mut got, &map);
                compare(&mut outcome, len, want, got);
            }
            KernelId::MapU8LutInPlace => {
                let mut want = inputs.noise.clone();
                let mut got = inputs.noise.clone();
                reference.map_in_place(&mut want, &map);
                set.map_in_place(&mut got, &map);
                compare(&mut outcome, len, want, got);
            }
            KernelId::EqMask64 => {
                let needle = inputs.noise.first().copied().unwrap_or(0);
                for block in inputs.noise.chunks_exact(MASK_BLOCK) {
                    if let Some(block) = block.first_chunk::<MASK_BLOCK>() {
                        compare(
                            &mut outcome,
                            len,
                            reference.eq_mask64(block, needle),
                            set.eq_mask64(block, needle),
                        );
                    }
                }
            }
            KernelId::Crc32c => compare(
                &mut outcome,
                len,
                reference.crc32c_raw(!0, &inputs.noise),
                set.crc32c_raw(!0, &inputs.noise),
            ),
        }
    }
    outcome
}

/// Levels a config selects, restricted to what this CPU supports.
fn selected_levels(config: &DiffConfig) -> Result<Vec<&'static KernelSet>, HarnessError> {
    match &config.levels {
        None => Ok(Level::supported().filter_map(KernelSet::for_level).collect()),
        Some(levels) => levels
            .iter()
            .map(|&level| KernelSet::try_for_level(level).map_err(HarnessError::from))
            .collect(),
    }
}

/// Run every kernel at every selected level, logging one entry per pair.
pub fn run(config: &DiffConfig, log: &mut LogEmitter) -> Result<DiffReport, HarnessError> {
    let started = Instant::now();
    let reference = KernelSet::scalar();
    let sets = selected_levels(config)?;

    log.emit_entry(
        LogEntry::new("", LogLevel::Info, "verify_start")
            .with_stream(StreamKind::Differential)
            .with_seed(config.seed)
            .with_details(serde_json::json!({
                "max_len": config.max_len,
                "levels": sets.iter().map(|s| s.level().name()).collect::<Vec<_>>(),
            })),
    )?;

    let mut outcomes = Vec::new();
    for set in &sets {
        for kernel in KernelId::ALL {
            let outcome = check_kernel(kernel, set, reference, config);
            let (level, result) = if outcome.mismatches == 0 {
                (LogLevel::Info, Outcome::Pass)
            } else {
                (LogLevel::Error, Outcome::Fail)
            };
            let mut entry = LogEntry::new("", level, "kernel_result")
                .with_stream(StreamKind::Differential)
                .with_kernel(kernel.name(), set.level())
                .with_seed(config.seed)
                .with_counts(outcome.cases, outcome.mismatches)
                .with_outcome(result);
            if let Some(first) = &outcome.first_mismatch {
                entry = entry.with_details(serde_json::to_value(first)?);
            }
            log.emit_entry(entry)?;
            outcomes.push(outcome);
        }
    }

    let total_cases = outcomes.iter().map(|o| o.cases).sum();
    let total_mismatches = outcomes.iter().map(|o| o.mismatches).sum();
    let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let summary_outcome = if total_mismatches == 0 {
        Outcome::Pass
    } else {
        Outcome::Fail
    };
    log.emit_entry(
        LogEntry::new("", LogLevel::Info, "verify_summary")
            .with_stream(StreamKind::Differential)
            .with_seed(config.seed)
            .with_counts(total_cases, total_mismatches)
            .with_outcome(summary_outcome)
            .with_duration_ms(duration_ms),
    )?;
    log.flush()?;

    Ok(DiffReport {
        run_id: config.run_id.clone(),
        seed: config.seed,
        max_len: config.max_len,
        levels: sets.iter().map(|s| s.level().name()).collect(),
        total_cases,
        total_mismatches,
        duration_ms,
        outcomes,
    })
}

/// Parse a seed given as decimal or `0x`-prefixed hex (underscores allowed).
pub fn parse_seed(raw: &str) -> Result<u64, HarnessError> {
    let cleaned: String = raw.trim().chars().filter(|&c| c != '_').collect();
    let parsed = match cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => cleaned.parse(),
    };
    parsed.map_err(|_| HarnessError::InvalidSeed(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splitmix_is_deterministic() {
        let mut a = SplitMix64::new(1);
        let mut b = SplitMix64::new(1);
        assert_eq!(a.next_u64(), b.next_u64());
        let mut buf = [0u8; 13];
        a.fill(&mut buf);
        let mut buf2 = [0u8; 13];
        b.fill(&mut buf2);
        assert_eq!(buf, buf2);
    }

    #[test]
    fn seeds_parse() {
        assert_eq!(parse_seed("42").unwrap(), 42);
        assert_eq!(parse_seed("0xFF").unwrap(), 255);
        assert_eq!(parse_seed("0xDEAD_BEEF").unwrap(), 0xDEAD_BEEF);
        assert!(matches!(parse_seed("zz"), Err(HarnessError::InvalidSeed(_))));
    }

    #[test]
    fn accepted_inputs_mostly_pass_the_table() {
        let table = ASCII_ALNUM_SET;
        let mut rng = SplitMix64::new(9);
        let inputs = Inputs::generate(&mut rng, 300, &table);
        let rejected = inputs
            .accepted
            .iter()
            .filter(|&&b| table[usize::from(b)] == 0)
            .count();
        assert!(rejected <= 1);
    }

    #[test]
    fn scalar_only_run_passes() {
        let config = DiffConfig {
            max_len: 70,
            levels: Some(vec![Level::Scalar]),
            ..DiffConfig::default()
        };
        let mut log = LogEmitter::to_sink("unit");
        let report = run(&config, &mut log).unwrap();
        assert!(report.all_passed());
        assert_eq!(report.levels, vec!["scalar"]);
        assert_eq!(report.outcomes.len(), KernelId::ALL.len());
    }
}
