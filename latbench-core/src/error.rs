//! Sampler errors

use thiserror::Error;

/// Boxed error a measured routine can fail with.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A measured routine failed, aborting its measurement.
#[derive(Debug, Error)]
pub enum MeasurementError {
    /// The routine signalled failure.
    #[error("{0}")]
    Failed(BoxError),

    /// The routine dropped its completion signal without completing it.
    #[error("completion signal dropped without being completed")]
    Abandoned,
}

impl MeasurementError {
    /// Build a failure from any error or message.
    pub fn failed(error: impl Into<BoxError>) -> Self {
        MeasurementError::Failed(error.into())
    }
}
