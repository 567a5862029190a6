//! Synchronous Measurements: blocking routines on the calling thread
//!
//! A routine returning `()` is timed by the engine. A routine returning
//! `f64` reports its own duration, which replaces the clock reading.
//! Sampling bounds come from `latbench.toml` when one is found.
//!
//! Run with: cargo run --example synchronous -p latbench-demos --release

use latbench::prelude::*;
use latbench::BenchConfig;
use latbench_demos::{init_logging, print_table};
use std::collections::{BTreeMap, HashMap};
use std::hint::black_box;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    init_logging();

    let mut bench = match BenchConfig::discover() {
        Some(config) => Benchmark::from_file_config(&config)?,
        None => Benchmark::with_config(SamplerConfig {
            max_samples: Some(2_000),
            ..Default::default()
        }),
    };

    bench
        .measure("vec sort 10k", || {
            let mut v: Vec<u64> = (0..10_000).rev().collect();
            v.sort_unstable();
            black_box(v);
        })
        .measure("hashmap insert 1k", || {
            let mut map = HashMap::with_capacity(1_000);
            for i in 0u64..1_000 {
                map.insert(i, i * 2);
            }
            black_box(map);
        })
        .measure("btreemap insert 1k", || {
            let mut map = BTreeMap::new();
            for i in 0u64..1_000 {
                map.insert(i, i * 2);
            }
            black_box(map);
        });

    // Self-timed: only the lookup loop is measured, not the build
    let map: HashMap<u64, u64> = (0..10_000).map(|i| (i, i)).collect();
    bench.measure("hashmap lookup (self-timed)", move || {
        let start = Instant::now();
        let mut hits = 0u64;
        for i in 0..10_000 {
            hits += u64::from(map.contains_key(&i));
        }
        black_box(hits);
        start.elapsed().as_secs_f64() * 1e3
    });

    let results = bench.run()?;
    print_table(results, "ms");
    Ok(())
}
