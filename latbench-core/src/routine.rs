//! Measured Routines
//!
//! The shape of a routine decides how it is sampled:
//! - [`Routine::Sync`] returns when done (synchronous sampler)
//! - [`Routine::Callback`] is handed a [`Completion`] and signals it later
//! - [`Routine::Future`] returns a future that resolves when done
//!
//! Each call yields a [`Timing`]: either "time me" or a self-reported duration.

use crate::error::{BoxError, MeasurementError};
use std::future::Future;
use std::pin::Pin;
use tokio::sync::oneshot;

/// A pinned, boxed, non-`Send` future.
pub type LocalBoxFuture<T> = Pin<Box<dyn Future<Output = T>>>;

/// Outcome of one call of a measured routine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Timing {
    /// The engine derives the duration from its clock.
    #[default]
    Measured,
    /// The routine measured itself; the value is in the clock's unit.
    SelfTimed(f64),
}

impl Timing {
    /// Resolve to a duration, falling back to the clock-derived one.
    #[inline]
    pub fn or_measured(self, measured: f64) -> f64 {
        match self {
            Timing::Measured => measured,
            Timing::SelfTimed(duration) => duration,
        }
    }
}

/// Conversion from a routine's return value into a [`Timing`].
///
/// `()` means "time me"; `f64` is a self-reported duration.
pub trait IntoTiming {
    /// Perform the conversion.
    fn into_timing(self) -> Timing;
}

impl IntoTiming for Timing {
    #[inline]
    fn into_timing(self) -> Timing {
        self
    }
}

impl IntoTiming for () {
    #[inline]
    fn into_timing(self) -> Timing {
        Timing::Measured
    }
}

impl IntoTiming for f64 {
    #[inline]
    fn into_timing(self) -> Timing {
        Timing::SelfTimed(self)
    }
}

impl IntoTiming for Option<f64> {
    #[inline]
    fn into_timing(self) -> Timing {
        self.map_or(Timing::Measured, Timing::SelfTimed)
    }
}

/// Completion signal handed to a [`Routine::Callback`] on every call.
///
/// Every method consumes the signal, so it can be completed at most once.
/// Dropping it without completing aborts the measurement with
/// [`MeasurementError::Abandoned`]. The signal is `Send`: it may be completed
/// from another task or thread.
#[derive(Debug)]
#[must_use = "the measurement is abandoned if the completion is dropped"]
pub struct Completion {
    tx: oneshot::Sender<Result<Timing, MeasurementError>>,
}

impl Completion {
    pub(crate) fn channel() -> (Self, oneshot::Receiver<Result<Timing, MeasurementError>>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// The call finished; let the engine time it.
    pub fn done(self) {
        self.send(Ok(Timing::Measured));
    }

    /// The call finished and took `duration` (in the clock's unit).
    pub fn done_with(self, duration: f64) {
        self.send(Ok(Timing::SelfTimed(duration)));
    }

    /// The call failed; the measurement and the rest of the run are aborted.
    pub fn fail(self, error: impl Into<BoxError>) {
        self.send(Err(MeasurementError::Failed(error.into())));
    }

    /// Complete from a `Result`, e.g. the outcome of a fallible operation.
    pub fn finish<T, E>(self, result: Result<T, E>)
    where
        T: IntoTiming,
        E: Into<BoxError>,
    {
        match result {
            Ok(timing) => self.send(Ok(timing.into_timing())),
            Err(error) => self.fail(error),
        }
    }

    fn send(self, outcome: Result<Timing, MeasurementError>) {
        // The receiver is gone only if the sampler itself was dropped
        let _ = self.tx.send(outcome);
    }
}

/// A measured routine, tagged by how it reports completion.
pub enum Routine {
    /// Runs to completion before returning.
    Sync(Box<dyn FnMut() -> Timing>),
    /// Signals completion through the [`Completion`] it is given.
    Callback(Box<dyn FnMut(Completion)>),
    /// Returns a future that resolves when the call is complete.
    Future(Box<dyn FnMut() -> LocalBoxFuture<Result<Timing, MeasurementError>>>),
}

impl Routine {
    /// Wrap a synchronous closure.
    pub fn sync<F, T>(mut f: F) -> Self
    where
        F: FnMut() -> T + 'static,
        T: IntoTiming,
    {
        Routine::Sync(Box::new(move || f().into_timing()))
    }

    /// Wrap a completion-signal closure.
    pub fn callback<F>(f: F) -> Self
    where
        F: FnMut(Completion) + 'static,
    {
        Routine::Callback(Box::new(f))
    }

    /// Wrap a closure returning a fallible future.
    pub fn future<F, Fut, T, E>(mut f: F) -> Self
    where
        F: FnMut() -> Fut + 'static,
        Fut: Future<Output = Result<T, E>> + 'static,
        T: IntoTiming,
        E: Into<BoxError>,
    {
        Routine::Future(Box::new(move || {
            let fut = f();
            Box::pin(async move {
                fut.await
                    .map(IntoTiming::into_timing)
                    .map_err(|e| MeasurementError::Failed(e.into()))
            })
        }))
    }

    /// Whether this routine must be driven by the asynchronous sampler.
    pub fn is_async(&self) -> bool {
        !matches!(self, Routine::Sync(_))
    }

    /// Short label for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Routine::Sync(_) => "sync",
            Routine::Callback(_) => "callback",
            Routine::Future(_) => "future",
        }
    }
}

impl std::fmt::Debug for Routine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Routine").field(&self.kind()).finish()
    }
}
