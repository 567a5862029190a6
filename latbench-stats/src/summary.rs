//! Result Records
//!
//! `Snapshot` is the unnamed view of an accumulator at a point in time;
//! `SampleStatistics` is the finalized, named record produced once per
//! measurement and handed to the runner.

use serde::{Deserialize, Serialize};

/// Point-in-time statistics computed from an [`OnlineStatistics`](crate::OnlineStatistics).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    /// Number of observations
    pub n: u64,
    /// Smallest observation (`+inf` when empty)
    pub minimum: f64,
    /// Largest observation (`0.0` when empty)
    pub maximum: f64,
    /// Arithmetic mean
    pub mean: f64,
    /// Sample variance, NaN for fewer than two observations
    pub variance: f64,
    /// Square root of `variance`
    pub stddev: f64,
}

/// Summary statistics for one named measurement.
///
/// Durations are in whatever unit the configured clock reports
/// (milliseconds for the default wall clock).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleStatistics {
    /// Measurement name as given when it was queued
    pub name: String,
    /// Number of samples after warm-up discard
    pub n: u64,
    /// Smallest sample
    pub minimum: f64,
    /// Largest sample
    pub maximum: f64,
    /// Mean sample
    pub mean: f64,
    /// Sample variance (NaN when `n < 2`)
    pub variance: f64,
    /// Standard deviation (NaN when `n < 2`)
    pub stddev: f64,
    /// Raw samples in observation order, present only when retention was enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub samples: Option<Vec<f64>>,
}

impl SampleStatistics {
    /// Attach a name (and optionally raw samples) to a snapshot.
    pub fn from_snapshot(
        name: impl Into<String>,
        snapshot: Snapshot,
        samples: Option<Vec<f64>>,
    ) -> Self {
        Self {
            name: name.into(),
            n: snapshot.n,
            minimum: snapshot.minimum,
            maximum: snapshot.maximum,
            mean: snapshot.mean,
            variance: snapshot.variance,
            stddev: snapshot.stddev,
            samples,
        }
    }

    /// The statistics without name or samples.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            n: self.n,
            minimum: self.minimum,
            maximum: self.maximum,
            mean: self.mean,
            variance: self.variance,
            stddev: self.stddev,
        }
    }

    /// Standard deviation as a percentage of the mean.
    ///
    /// Not guarded against a zero mean: the result is then `inf` or NaN and
    /// renderers are expected to cope.
    pub fn relative_stddev(&self) -> f64 {
        self.stddev / self.mean * 100.0
    }

    /// Whether variance and standard deviation are defined (n >= 2).
    pub fn is_determinate(&self) -> bool {
        self.n >= 2
    }
}
