//! Sampling Loop
//!
//! `SamplingRun` is the per-measurement state both samplers drive: warm-up
//! counting, observation into the accumulator and the stopping decision.
//! The synchronous sampler lives here; the asynchronous one is in
//! `asynchronous`.
//!
//! Loop shape (shared by both samplers):
//!
//! ```text
//! t1 = clock.now() → call routine → t2 = clock.now()
//!        │
//!        ▼
//! duration = self-timed value, or clock.diff(t1, t2)
//!        │
//!        ▼
//! warm-up? ── yes ──► discard
//!        │ no
//!        ▼
//! observe(duration)
//!        │
//!        ▼
//! policy.should_continue(n, elapsed) ── yes ──► next iteration
//! ```

use crate::clock::Clock;
use crate::config::SamplerConfig;
use crate::policy::StoppingPolicy;
use crate::routine::Timing;
use latbench_stats::{OnlineStatistics, SampleStatistics};
use std::time::Instant;

/// State of one measurement while it is being sampled.
///
/// Owned by exactly one sampler for the duration of a measurement and
/// consumed into the final record.
#[derive(Debug)]
pub(crate) struct SamplingRun {
    stats: OnlineStatistics,
    policy: StoppingPolicy,
    discard_first: u64,
    /// Iterations executed so far, warm-up included
    iterations: u64,
    started: Instant,
}

impl SamplingRun {
    /// Begin a measurement; the elapsed-time budget starts now.
    pub(crate) fn start<C: Clock>(config: &SamplerConfig<C>) -> Self {
        Self {
            stats: OnlineStatistics::retaining(config.save_samples),
            policy: config.policy(),
            discard_first: config.discard_first,
            iterations: 0,
            started: Instant::now(),
        }
    }

    /// Account for one completed iteration.
    ///
    /// The first `discard_first` iterations are counted but not observed.
    #[inline]
    pub(crate) fn record(&mut self, timing: Timing, measured: f64) {
        self.iterations += 1;
        if self.iterations > self.discard_first {
            self.stats.observe(timing.or_measured(measured));
        } else if self.iterations == self.discard_first {
            tracing::trace!(iterations = self.iterations, "warm-up complete");
        }
    }

    /// Whether another iteration should run.
    ///
    /// Warm-up always runs in full and is always followed by at least one
    /// observed sample; after that the stopping policy decides.
    #[inline]
    pub(crate) fn should_continue(&self) -> bool {
        if self.iterations <= self.discard_first {
            return true;
        }
        self.policy.should_continue(self.stats.count(), self.started.elapsed())
    }

    /// Finalize into the named result record.
    pub(crate) fn finish(self, name: &str) -> SampleStatistics {
        let stats = self.stats.into_statistics(name);
        tracing::debug!(
            measurement = name,
            n = stats.n,
            mean = stats.mean,
            stddev = stats.stddev,
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "measurement finished"
        );
        stats
    }
}

/// Sample a synchronous routine on the calling thread until the stopping
/// policy says stop.
///
/// Never suspends. The routine's return value is a [`Timing`]: a self-timed
/// duration replaces the clock-derived one for that iteration.
pub fn run_synchronous<C, F>(
    name: &str,
    mut routine: F,
    config: &SamplerConfig<C>,
) -> SampleStatistics
where
    C: Clock,
    F: FnMut() -> Timing,
{
    let clock = &config.clock;
    let mut run = SamplingRun::start(config);

    loop {
        let t1 = clock.now();
        let timing = std::hint::black_box(routine());
        let t2 = clock.now();

        run.record(timing, clock.diff(&t1, &t2));

        if !run.should_continue() {
            break;
        }
    }

    run.finish(name)
}
