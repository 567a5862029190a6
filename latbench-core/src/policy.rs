//! Stopping Policy
//!
//! Decides whether another sample is taken. `min_samples` is a hard floor
//! that overrides both the ceiling and the time budget.

use std::time::Duration;

/// Floor/ceiling rule over sample count and elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoppingPolicy {
    /// Hard floor
    pub min_samples: u64,
    /// Hard ceiling, unless below the floor (`None` = unbounded)
    pub max_samples: Option<u64>,
    /// Time budget, unless below the floor
    pub max_duration: Duration,
}

impl StoppingPolicy {
    /// Continue while `(taken < max AND elapsed < budget) OR taken < min`.
    #[inline]
    pub fn should_continue(&self, samples_taken: u64, elapsed: Duration) -> bool {
        let below_ceiling = self.max_samples.map_or(true, |max| samples_taken < max);
        let within_budget = elapsed < self.max_duration;

        (below_ceiling && within_budget) || samples_taken < self.min_samples
    }
}
