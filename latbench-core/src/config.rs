//! Sampler Configuration

use crate::clock::{Clock, WallClock};
use crate::policy::StoppingPolicy;
use std::time::Duration;

/// Default minimum number of post-warm-up samples
pub const DEFAULT_MIN_SAMPLES: u64 = 10;

/// Default number of warm-up iterations excluded from statistics
pub const DEFAULT_DISCARD_FIRST: u64 = 10;

/// Default time budget
pub const DEFAULT_MAX_DURATION: Duration = Duration::from_secs(5);

/// Configuration shared by every measurement of a run.
///
/// Unspecified fields fall back to defaults through struct update syntax:
///
/// ```
/// use latbench_core::SamplerConfig;
///
/// let config = SamplerConfig {
///     max_samples: Some(5),
///     min_samples: 0,
///     ..Default::default()
/// };
/// assert_eq!(config.discard_first, 10);
/// ```
///
/// `min_samples <= max_samples` is not enforced; the minimum wins.
#[derive(Debug, Clone)]
pub struct SamplerConfig<C = WallClock> {
    /// Samples collected regardless of time budget or ceiling
    pub min_samples: u64,
    /// Sample ceiling (`None` = unbounded)
    pub max_samples: Option<u64>,
    /// Time budget after which no new samples are started once `min_samples` is met.
    /// Zero means no budget beyond `min_samples`.
    pub max_duration: Duration,
    /// Warm-up iterations executed but not observed
    pub discard_first: u64,
    /// Keep every raw sample in the result
    pub save_samples: bool,
    /// Time source for per-call durations
    pub clock: C,
}

impl Default for SamplerConfig<WallClock> {
    fn default() -> Self {
        Self {
            min_samples: DEFAULT_MIN_SAMPLES,
            max_samples: None,
            max_duration: DEFAULT_MAX_DURATION,
            discard_first: DEFAULT_DISCARD_FIRST,
            save_samples: false,
            clock: WallClock,
        }
    }
}

impl<C: Clock> SamplerConfig<C> {
    /// Replace the clock, keeping every other setting.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> SamplerConfig<C2> {
        SamplerConfig {
            min_samples: self.min_samples,
            max_samples: self.max_samples,
            max_duration: self.max_duration,
            discard_first: self.discard_first,
            save_samples: self.save_samples,
            clock,
        }
    }

    /// The stopping rule derived from this configuration.
    pub fn policy(&self) -> StoppingPolicy {
        StoppingPolicy {
            min_samples: self.min_samples,
            max_samples: self.max_samples,
            max_duration: self.max_duration,
        }
    }
}
