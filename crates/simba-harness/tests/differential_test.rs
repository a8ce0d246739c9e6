//! Differential runs across every supported level.

use simba_core::Level;
use simba_harness::differential::{self, DiffConfig, KernelId};
use simba_harness::structured_log::LogEmitter;
use simba_harness::{Capabilities, HarnessError};

#[test]
fn all_supported_levels_agree_with_scalar() {
    let config = DiffConfig::default();
    let mut log = LogEmitter::to_sink("diff-all");
    let report = differential::run(&config, &mut log).unwrap();

    let supported: Vec<&str> = Level::supported().map(Level::name).collect();
    assert_eq!(report.levels, supported);
    assert_eq!(report.outcomes.len(), supported.len() * KernelId::ALL.len());
    for outcome in &report.outcomes {
        assert_eq!(
            outcome.mismatches, 0,
            "{} at {}: {:?}",
            outcome.kernel.name(),
            outcome.level,
            outcome.first_mismatch
        );
        assert!(outcome.cases > 0 || outcome.kernel == KernelId::EqMask64);
    }
    assert!(report.into_result().is_ok());
}

#[test]
fn different_seeds_still_agree() {
    for seed in [1u64, 0xFFFF_FFFF_FFFF_FFFF, 0x1234_5678] {
        let config = DiffConfig {
            seed,
            max_len: 130,
            ..DiffConfig::default()
        };
        let report = differential::run(&config, &mut LogEmitter::to_sink("seeds")).unwrap();
        assert!(report.all_passed(), "seed={seed:#x}");
    }
}

#[test]
fn unsupported_level_is_an_error() {
    let Some(missing) = Level::ALL.into_iter().find(|l| !l.is_supported()) else {
        return;
    };
    let config = DiffConfig {
        levels: Some(vec![missing]),
        ..DiffConfig::default()
    };
    let err = differential::run(&config, &mut LogEmitter::to_sink("unsupported")).unwrap_err();
    assert!(matches!(err, HarnessError::Kernel(_)));
}

#[test]
fn capabilities_report_serializes() {
    let caps = Capabilities::probe();
    let json = serde_json::to_value(&caps).unwrap();
    assert_eq!(json["arch"], std::env::consts::ARCH);
    assert!(json["supported"].as_array().unwrap().len() >= 1);
    assert!(json["crc_backend"].is_string());
}
