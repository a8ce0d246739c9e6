//! CLI entrypoint for the simba verification harness.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use simba_core::Level;
use simba_harness::Capabilities;
use simba_harness::differential::{self, DiffConfig};
use simba_harness::latency;
use simba_harness::report::write_run_artifacts;
use simba_harness::structured_log::{LogEmitter, LogEntry, LogLevel, StreamKind};

/// Verification tooling for the simba kernels.
#[derive(Debug, Parser)]
#[command(name = "simba-harness")]
#[command(about = "Differential verification and latency harness for simba")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print detected, configured and active SIMD levels as JSON.
    Capabilities,
    /// Compare every supported SIMD level against the scalar kernels.
    Verify {
        /// Largest buffer length to test (every length from 0 is covered).
        #[arg(long, default_value_t = 319)]
        max_len: usize,
        /// Root seed (decimal or 0x...).
        #[arg(long, default_value = "0x5EED_51BA_D1FF_2026")]
        seed: String,
        /// Restrict to one level (`scalar`, `ssse3`, `avx2`, `neon`).
        #[arg(long)]
        level: Option<String>,
        /// Structured JSONL log output path.
        #[arg(long)]
        log: Option<PathBuf>,
        /// JSON report output path; an artifact index is written beside it.
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Time `noop` and small-buffer kernel calls.
    Latency {
        #[arg(long, default_value_t = 1_000_000)]
        iterations: u64,
        /// Structured JSONL log output path.
        #[arg(long)]
        log: Option<PathBuf>,
    },
}

fn run_id() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    format!("run-{secs}-{}", std::process::id())
}

fn emitter(log: Option<&PathBuf>, run_id: &str) -> std::io::Result<LogEmitter> {
    match log {
        Some(path) => LogEmitter::to_file(path, run_id),
        None => Ok(LogEmitter::to_sink(run_id)),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Capabilities => {
            let caps = Capabilities::probe();
            println!("{}", serde_json::to_string_pretty(&caps)?);
        }
        Command::Verify {
            max_len,
            seed,
            level,
            log,
            report,
        } => {
            let levels = match level {
                Some(name) => Some(vec![name.parse::<Level>()?]),
                None => None,
            };
            let config = DiffConfig {
                run_id: run_id(),
                seed: differential::parse_seed(&seed)?,
                max_len,
                levels,
            };
            let mut emitter = emitter(log.as_ref(), &config.run_id)?;
            eprintln!(
                "Verifying lengths 0..={} with seed {:#x}",
                config.max_len, config.seed
            );
            let result = differential::run(&config, &mut emitter)?;

            for outcome in &result.outcomes {
                eprintln!(
                    "{:<20} {:<7} cases={:<6} mismatches={}",
                    outcome.kernel.name(),
                    outcome.level,
                    outcome.cases,
                    outcome.mismatches
                );
            }
            eprintln!(
                "Verification complete: levels={}, cases={}, mismatches={}",
                result.levels.join(","),
                result.total_cases,
                result.total_mismatches
            );

            if let Some(report_path) = report {
                let index = write_run_artifacts(&result, &report_path, log.as_deref())?;
                eprintln!(
                    "Wrote report to {} (index {})",
                    report_path.display(),
                    index.display()
                );
            }

            result.into_result()?;
        }
        Command::Latency { iterations, log } => {
            let run_id = run_id();
            let mut emitter = emitter(log.as_ref(), &run_id)?;
            let samples = latency::measure(iterations);
            for sample in &samples {
                println!("{:<14} {:>10.2} ns/op", sample.name, sample.ns_per_op);
                emitter.emit_entry(
                    LogEntry::new("", LogLevel::Info, "latency_sample")
                        .with_stream(StreamKind::Latency)
                        .with_latency_ns(sample.ns_per_op)
                        .with_details(serde_json::json!({
                            "probe": sample.name,
                            "iterations": sample.iterations,
                        })),
                )?;
            }
            emitter.flush()?;
        }
    }

    Ok(())
}
