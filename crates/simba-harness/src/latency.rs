//! Boundary-latency probe.
//!
//! Times `noop` and a few small-buffer kernels with a plain `Instant` loop.
//! This is a measurement, not an assertion; criterion benches in
//! `simba-bench` are the precise tool.

use std::hint::black_box;
use std::time::Instant;

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct LatencySample {
    pub name: &'static str,
    pub iterations: u64,
    pub total_ns: u128,
    pub ns_per_op: f64,
}

fn time(name: &'static str, iterations: u64, mut op: impl FnMut()) -> LatencySample {
    let iterations = iterations.max(1);
    // Warm caches and the dispatch cache before timing.
    for _ in 0..iterations.min(1024) {
        op();
    }
    let start = Instant::now();
    for _ in 0..iterations {
        op();
    }
    let total_ns = start.elapsed().as_nanos();
    LatencySample {
        name,
        iterations,
        total_ns,
        ns_per_op: total_ns as f64 / iterations as f64,
    }
}

/// Measure every probe `iterations` times.
#[must_use]
pub fn measure(iterations: u64) -> Vec<LatencySample> {
    let small = [b'a'; 16];
    vec![
        time("noop", iterations, simba_core::noop),
        time("sum_u8/16", iterations, || {
            black_box(simba_core::sum_u8(black_box(&small)));
        }),
        time("is_ascii/16", iterations, || {
            black_box(simba_core::is_ascii(black_box(&small)));
        }),
        time("crc32c/16", iterations, || {
            black_box(simba_core::crc32c(black_box(&small)));
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_are_named_and_counted() {
        let samples = measure(100);
        assert_eq!(samples.len(), 4);
        assert_eq!(samples[0].name, "noop");
        assert!(samples.iter().all(|s| s.iterations == 100));
    }

    #[test]
    fn zero_iterations_clamps_to_one() {
        let samples = measure(0);
        assert!(samples.iter().all(|s| s.iterations == 1));
    }
}
