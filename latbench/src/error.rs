//! Runner errors

use latbench_core::MeasurementError;
use thiserror::Error;

/// Why a run stopped before draining its queue.
#[derive(Debug, Error)]
pub enum BenchError {
    /// A measured routine failed; the run halted at this measurement.
    #[error("measurement `{name}` failed: {source}")]
    Measurement {
        /// Name of the failing measurement
        name: String,
        /// What the routine reported
        #[source]
        source: MeasurementError,
    },

    /// The blocking driver was called from a current-thread tokio runtime.
    #[error("blocking run called inside a current-thread tokio runtime; use `run_async` instead")]
    NestedRuntime,

    /// The runtime for asynchronous measurements could not be created.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

impl BenchError {
    /// Name of the measurement that failed, if the run halted on one.
    pub fn measurement(&self) -> Option<&str> {
        match self {
            BenchError::Measurement { name, .. } => Some(name),
            _ => None,
        }
    }
}
