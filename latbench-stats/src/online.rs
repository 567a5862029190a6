//! Online Statistics
//!
//! Single-pass accumulation of count, mean and variance using Welford's
//! algorithm. Memory is O(1) unless raw sample retention is requested.

use crate::summary::{SampleStatistics, Snapshot};

/// Incremental accumulator for a stream of duration observations.
///
/// Minimum starts at `+inf` and maximum at `0.0`: durations are assumed
/// non-negative, so a routine that always yields `0.0` reports a maximum of
/// `0.0` rather than `-inf`.
///
/// # Example
///
/// ```
/// use latbench_stats::OnlineStatistics;
///
/// let mut stats = OnlineStatistics::new();
/// for x in [1.0, 2.0, 3.0, 4.0, 5.0] {
///     stats.observe(x);
/// }
/// let snapshot = stats.snapshot();
/// assert_eq!(snapshot.n, 5);
/// assert!((snapshot.mean - 3.0).abs() < 1e-12);
/// assert!((snapshot.variance - 2.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct OnlineStatistics {
    n: u64,
    mean: f64,
    /// Sum of squared deviations from the running mean.
    m2: f64,
    minimum: f64,
    maximum: f64,
    samples: Option<Vec<f64>>,
}

impl Default for OnlineStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl OnlineStatistics {
    /// Create an empty accumulator that does not retain raw samples.
    pub fn new() -> Self {
        Self {
            n: 0,
            mean: 0.0,
            m2: 0.0,
            minimum: f64::INFINITY,
            maximum: 0.0,
            samples: None,
        }
    }

    /// Create an empty accumulator that also keeps every observed value in order.
    pub fn with_sample_retention() -> Self {
        Self {
            samples: Some(Vec::new()),
            ..Self::new()
        }
    }

    /// Create an accumulator, retaining raw samples only if `save_samples` is set.
    pub fn retaining(save_samples: bool) -> Self {
        if save_samples {
            Self::with_sample_retention()
        } else {
            Self::new()
        }
    }

    /// Feed one observation.
    #[inline]
    pub fn observe(&mut self, value: f64) {
        self.n += 1;
        let delta = value - self.mean;
        self.mean += delta / self.n as f64;
        self.m2 += delta * (value - self.mean);

        self.minimum = self.minimum.min(value);
        self.maximum = self.maximum.max(value);

        if let Some(samples) = self.samples.as_mut() {
            samples.push(value);
        }
    }

    /// Number of observations so far.
    pub fn count(&self) -> u64 {
        self.n
    }

    /// Current running mean (0.0 before any observation).
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Retained raw samples, if retention is enabled.
    pub fn samples(&self) -> Option<&[f64]> {
        self.samples.as_deref()
    }

    /// Compute the current statistics without mutating the accumulator.
    ///
    /// Variance is the sample variance `m2 / (n - 1)` and is NaN for fewer
    /// than two observations.
    pub fn snapshot(&self) -> Snapshot {
        let variance = if self.n < 2 {
            f64::NAN
        } else {
            self.m2 / (self.n - 1) as f64
        };

        Snapshot {
            n: self.n,
            minimum: self.minimum,
            maximum: self.maximum,
            mean: self.mean,
            variance,
            stddev: variance.sqrt(),
        }
    }

    /// Finalize into a named result record, moving any retained samples.
    pub fn into_statistics(self, name: impl Into<String>) -> SampleStatistics {
        let snapshot = self.snapshot();
        SampleStatistics::from_snapshot(name, snapshot, self.samples)
    }
}
