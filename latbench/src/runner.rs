//! Benchmark Runner
//!
//! Holds an ordered queue of named measurements and executes them strictly
//! one after another. Synchronous routines are sampled on the calling thread;
//! callback and future routines are driven by the asynchronous sampler.
//!
//! A run stops at the first measurement that fails. Measurements queued
//! behind it stay queued and are never invoked during that run.

use crate::error::BenchError;
use latbench_core::{
    Clock, Completion, IntoTiming, MeasurementError, Routine, SamplerConfig, WallClock,
    run_asynchronous, run_synchronous,
};
use latbench_stats::SampleStatistics;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

/// Lifecycle of a [`Benchmark`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Nothing has run yet
    Idle,
    /// A run is in progress
    Running,
    /// The last run finished, successfully or not
    Completed,
}

struct Measurement {
    name: String,
    routine: Routine,
}

/// An ordered set of latency measurements sharing one configuration.
///
/// ```
/// use latbench::{Benchmark, SamplerConfig};
///
/// let mut bench = Benchmark::with_config(SamplerConfig {
///     min_samples: 0,
///     max_samples: Some(5),
///     ..Default::default()
/// });
/// bench.measure("self-timed", || 1.0_f64);
///
/// let results = bench.run().unwrap();
/// assert_eq!(results[0].n, 5);
/// assert_eq!(results[0].mean, 1.0);
/// ```
pub struct Benchmark<C: Clock = WallClock> {
    config: SamplerConfig<C>,
    queue: VecDeque<Measurement>,
    results: Vec<SampleStatistics>,
    state: RunState,

    // Built on first blocking run that needs it, then reused
    runtime: Option<Runtime>,
}

impl Benchmark<WallClock> {
    /// Create a runner with the default configuration.
    pub fn new() -> Self {
        Self::with_config(SamplerConfig::default())
    }
}

impl Default for Benchmark<WallClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Benchmark<C> {
    /// Create a runner with an explicit configuration and clock.
    pub fn with_config(config: SamplerConfig<C>) -> Self {
        Self {
            config,
            queue: VecDeque::new(),
            results: Vec::new(),
            state: RunState::Idle,
            runtime: None,
        }
    }

    /// Queue a synchronous routine.
    ///
    /// Returning `()` lets the engine time each call; returning `f64` reports
    /// the call's own duration in the clock's unit.
    pub fn measure<F, T>(&mut self, name: impl Into<String>, routine: F) -> &mut Self
    where
        F: FnMut() -> T + 'static,
        T: IntoTiming,
    {
        self.enqueue(name, Routine::sync(routine))
    }

    /// Queue a routine that signals completion through the [`Completion`] it
    /// is handed on every call.
    pub fn measure_async<F>(&mut self, name: impl Into<String>, routine: F) -> &mut Self
    where
        F: FnMut(Completion) + 'static,
    {
        self.enqueue(name, Routine::callback(routine))
    }

    /// Queue a routine returning a fallible future; each call is complete when
    /// its future resolves.
    pub fn measure_future<F, Fut, T, E>(&mut self, name: impl Into<String>, routine: F) -> &mut Self
    where
        F: FnMut() -> Fut + 'static,
        Fut: Future<Output = Result<T, E>> + 'static,
        T: IntoTiming,
        E: Into<latbench_core::BoxError>,
    {
        self.enqueue(name, Routine::future(routine))
    }

    /// Queue an already-built routine.
    pub fn enqueue(&mut self, name: impl Into<String>, routine: Routine) -> &mut Self {
        let name = name.into();
        tracing::trace!(measurement = %name, kind = routine.kind(), "queued");
        self.queue.push_back(Measurement { name, routine });
        self
    }

    /// Execute every queued measurement in order, blocking the calling thread.
    ///
    /// Asynchronous measurements are driven on a private current-thread
    /// runtime, or on the ambient one when called from a multi-thread tokio
    /// runtime. Calling this from a current-thread runtime fails with
    /// [`BenchError::NestedRuntime`]; use [`run_async`](Self::run_async) there.
    ///
    /// Returns every result collected by this runner so far.
    pub fn run(&mut self) -> Result<&[SampleStatistics], BenchError> {
        self.drive()?;
        Ok(&self.results)
    }

    /// Execute the queue like [`run`](Self::run), then hand the outcome to
    /// `callback` together with the runner itself.
    ///
    /// Returns the runner so it can be re-configured or re-run.
    pub fn run_with<F>(&mut self, callback: F) -> &mut Self
    where
        F: FnOnce(&Self, Result<&[SampleStatistics], BenchError>),
    {
        let outcome = self.drive();
        let this: &Self = self;
        callback(this, outcome.map(|()| this.results()));
        self
    }

    /// Execute the queue from inside an async context.
    ///
    /// Synchronous measurements still block the current task while they run.
    pub async fn run_async(&mut self) -> Result<&[SampleStatistics], BenchError> {
        self.begin();
        while let Some(Measurement { name, mut routine }) = self.queue.pop_front() {
            let outcome = match sample(&name, &mut routine, &self.config) {
                Sampling::Finished(outcome) => outcome,
                Sampling::Pending(sampled) => sampled.await,
            };
            self.settle(name, outcome)?;
        }
        self.end();
        Ok(&self.results)
    }

    /// Results of every measurement completed so far, in queue order.
    pub fn results(&self) -> &[SampleStatistics] {
        &self.results
    }

    /// Number of measurements still queued.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// The configuration shared by every measurement.
    pub fn config(&self) -> &SamplerConfig<C> {
        &self.config
    }

    fn drive(&mut self) -> Result<(), BenchError> {
        self.begin();
        while let Some(Measurement { name, mut routine }) = self.queue.pop_front() {
            let driven = match sample(&name, &mut routine, &self.config) {
                Sampling::Finished(outcome) => Ok(outcome),
                Sampling::Pending(sampled) => block_on(&mut self.runtime, sampled),
            };
            let outcome = match driven {
                Ok(outcome) => outcome,
                Err(e) => {
                    // Never started; keep it for a later run_async
                    self.queue.push_front(Measurement { name, routine });
                    self.state = RunState::Completed;
                    return Err(e);
                }
            };
            self.settle(name, outcome)?;
        }
        self.end();
        Ok(())
    }

    fn begin(&mut self) {
        if self.state == RunState::Running {
            tracing::warn!("previous run did not finish; starting a new one");
        }
        self.state = RunState::Running;
        tracing::debug!(pending = self.queue.len(), "run started");
    }

    fn settle(
        &mut self,
        name: String,
        outcome: Result<SampleStatistics, MeasurementError>,
    ) -> Result<(), BenchError> {
        match outcome {
            Ok(stats) => {
                self.results.push(stats);
                Ok(())
            }
            Err(source) => {
                self.state = RunState::Completed;
                tracing::debug!(
                    measurement = %name,
                    skipped = self.queue.len(),
                    "run halted"
                );
                Err(BenchError::Measurement { name, source })
            }
        }
    }

    fn end(&mut self) {
        self.state = RunState::Completed;
        tracing::debug!(results = self.results.len(), "run completed");
    }
}

impl<C: Clock> std::fmt::Debug for Benchmark<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Benchmark")
            .field("state", &self.state)
            .field("pending", &self.queue.len())
            .field("results", &self.results.len())
            .finish()
    }
}

type SamplingFuture<'a> =
    Pin<Box<dyn Future<Output = Result<SampleStatistics, MeasurementError>> + 'a>>;

/// One measurement, dispatched on its routine shape.
enum Sampling<'a> {
    /// Synchronous routine, already sampled on the calling thread
    Finished(Result<SampleStatistics, MeasurementError>),
    /// Asynchronous routine; the caller drives the sampler
    Pending(SamplingFuture<'a>),
}

/// Pick the sampler for `routine`. Synchronous routines are sampled here.
fn sample<'a, C>(
    name: &'a str,
    routine: &'a mut Routine,
    config: &'a SamplerConfig<C>,
) -> Sampling<'a>
where
    C: Clock + 'a,
{
    match routine {
        Routine::Sync(f) => Sampling::Finished(Ok(run_synchronous(name, f, config))),
        routine => Sampling::Pending(Box::pin(run_asynchronous(name, routine, config))),
    }
}

/// Block on `fut`, reusing the ambient multi-thread runtime if there is one.
fn block_on<F: Future>(runtime: &mut Option<Runtime>, fut: F) -> Result<F::Output, BenchError> {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            Ok(tokio::task::block_in_place(|| handle.block_on(fut)))
        }
        Ok(_) => Err(BenchError::NestedRuntime),
        Err(_) => {
            let rt = match runtime.take() {
                Some(rt) => rt,
                None => tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()?,
            };
            let output = rt.block_on(fut);
            *runtime = Some(rt);
            Ok(output)
        }
    }
}
