#![warn(missing_docs)]
//! # latbench
//!
//! Latency measurement for synchronous and asynchronous routines.
//!
//! latbench repeatedly invokes a routine, times each call and folds the
//! durations into running statistics without storing them:
//! - **Online Statistics**: Welford accumulation of count, mean, variance, min and max
//! - **Stopping Policy**: a sample floor that always wins, plus a ceiling and a time budget
//! - **Warm-up**: the first iterations are executed but excluded from the statistics
//! - **Async Routines**: completion-signal and future-returning routines, sampled at constant stack depth
//! - **Ordered Runs**: measurements run strictly one after another; the first failure halts the run
//! - **Pluggable Clocks**: monotonic wall clock, closure pair, or hardware cycle counter
//!
//! ## Quick Start
//!
//! ```no_run
//! use latbench::prelude::*;
//!
//! let mut bench = Benchmark::new();
//! bench
//!     .measure("sort 1k", || {
//!         let mut v: Vec<u32> = (0..1000).rev().collect();
//!         v.sort();
//!     })
//!     .measure_async("deferred", |done: Completion| {
//!         std::thread::spawn(move || done.done());
//!     });
//!
//! for stats in bench.run().unwrap() {
//!     println!("{}: {:.4} ms ± {:.2}%", stats.name, stats.mean, stats.relative_stddev());
//! }
//! ```
//!
//! ## Async Runs
//!
//! ```ignore
//! let results = bench.run_async().await?;
//! ```
//!
//! ## Configuration File
//!
//! Sampling bounds can live in `latbench.toml`; see [`BenchConfig`].

mod config;
mod error;
mod runner;

pub use config::{BenchConfig, CONFIG_FILE_NAME, SamplingConfig};
pub use error::BenchError;
pub use runner::{Benchmark, RunState};

// Re-export core types
pub use latbench_core::{
    BoxError, Clock, Completion, CycleClock, DEFAULT_DISCARD_FIRST, DEFAULT_MAX_DURATION,
    DEFAULT_MIN_SAMPLES, FnClock, HAS_CYCLE_COUNTER, IntoTiming, MeasurementError, Routine,
    SamplerConfig, StoppingPolicy, Timing, WallClock, run_asynchronous, run_synchronous,
};

// Re-export stats
pub use latbench_stats::{OnlineStatistics, SampleStatistics, Snapshot};

impl Benchmark<WallClock> {
    /// Create a runner from file configuration.
    pub fn from_file_config(config: &BenchConfig) -> anyhow::Result<Self> {
        Ok(Self::with_config(config.sampler_config()?))
    }
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BenchError, Benchmark, BoxError, Completion, RunState, SampleStatistics, SamplerConfig,
        Timing,
    };
}
