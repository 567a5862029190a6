#![warn(missing_docs)]
//! latbench Core - Sampling Engine
//!
//! This crate provides the machinery that turns repeated calls into statistics:
//! - `Clock` time sources (monotonic wall clock, closures, hardware cycle counter)
//! - `SamplerConfig` and the `StoppingPolicy` floor/ceiling rule
//! - `Routine` shapes: synchronous, completion-signal, and future-returning
//! - `run_synchronous`, a blocking loop on the calling thread
//! - `run_asynchronous`, a suspend-and-resume loop with constant stack depth

mod asynchronous;
mod clock;
mod config;
mod error;
mod policy;
mod routine;
mod sampler;

pub use asynchronous::run_asynchronous;
pub use clock::{Clock, CycleClock, FnClock, HAS_CYCLE_COUNTER, WallClock};
pub use config::{DEFAULT_DISCARD_FIRST, DEFAULT_MAX_DURATION, DEFAULT_MIN_SAMPLES, SamplerConfig};
pub use error::{BoxError, MeasurementError};
pub use policy::StoppingPolicy;
pub use routine::{Completion, IntoTiming, LocalBoxFuture, Routine, Timing};
pub use sampler::run_synchronous;
