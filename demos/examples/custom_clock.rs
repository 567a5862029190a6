//! Custom Clocks: closure pairs and the hardware cycle counter
//!
//! Any pair of "read the time" and "difference of two readings" closures
//! can drive the engine. Durations are reported in whatever unit the
//! difference closure returns.
//!
//! Run with: cargo run --example custom_clock -p latbench-demos --release

use latbench::prelude::*;
use latbench::{CycleClock, FnClock, HAS_CYCLE_COUNTER};
use latbench_demos::{init_logging, print_table};
use std::hint::black_box;
use std::time::{Duration, Instant};

fn workload() {
    let v: Vec<u64> = (0..1_000).map(|i| i * i).collect();
    black_box(v.iter().sum::<u64>());
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let bounds = SamplerConfig {
        max_samples: Some(5_000),
        max_duration: Duration::from_secs(1),
        ..Default::default()
    };

    // Nanoseconds from Instant
    let nanos = FnClock::new(Instant::now, |a: &Instant, b: &Instant| {
        b.saturating_duration_since(*a).as_nanos() as f64
    });
    let mut bench = Benchmark::with_config(bounds.clone().with_clock(nanos));
    bench.measure("sum of squares", workload);
    print_table(bench.run()?, "ns");

    if HAS_CYCLE_COUNTER {
        let mut bench = Benchmark::with_config(bounds.with_clock(CycleClock));
        bench.measure("sum of squares", workload);
        print_table(bench.run()?, "cycles");
    } else {
        tracing::info!("no cycle counter on this platform; skipping");
    }
    Ok(())
}
