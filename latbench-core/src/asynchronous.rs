//! Asynchronous Sampling
//!
//! Drives routines that complete later: a [`Routine::Callback`] is handed a
//! fresh [`Completion`] per call and the sampler suspends on the matching
//! one-shot receiver; a [`Routine::Future`] is simply awaited.
//!
//! The loop is a flat `loop` inside a single future. After every iteration it
//! yields back to the scheduler before starting the next one, so stack depth
//! stays constant no matter how quickly completions arrive (including
//! completions signalled synchronously from inside the routine).

use crate::clock::Clock;
use crate::config::SamplerConfig;
use crate::error::MeasurementError;
use crate::routine::{Completion, Routine, Timing};
use crate::sampler::SamplingRun;
use latbench_stats::SampleStatistics;

/// Invoke the routine once and wait for it to complete.
async fn call_once(routine: &mut Routine) -> Result<Timing, MeasurementError> {
    match routine {
        Routine::Sync(f) => Ok(f()),
        Routine::Callback(f) => {
            let (done, rx) = Completion::channel();
            f(done);
            rx.await.unwrap_or(Err(MeasurementError::Abandoned))
        }
        Routine::Future(f) => f().await,
    }
}

/// Sample a routine until the stopping policy says stop, suspending while
/// each call is in flight.
///
/// Resolves exactly once: with the finished statistics, or with the first
/// error a call reports. An error aborts immediately; no further calls are
/// made and no partial statistics are returned. There is no timeout:
/// `max_duration` only prevents new calls from starting.
pub async fn run_asynchronous<C: Clock>(
    name: &str,
    routine: &mut Routine,
    config: &SamplerConfig<C>,
) -> Result<SampleStatistics, MeasurementError> {
    let clock = &config.clock;
    let mut run = SamplingRun::start(config);

    loop {
        let t1 = clock.now();
        let outcome = call_once(routine).await;
        let t2 = clock.now();

        let timing = match outcome {
            Ok(timing) => timing,
            Err(e) => {
                tracing::debug!(measurement = name, error = %e, "measurement aborted");
                return Err(e);
            }
        };
        run.record(timing, clock.diff(&t1, &t2));

        if !run.should_continue() {
            break;
        }

        tokio::task::yield_now().await;
    }

    Ok(run.finish(name))
}
