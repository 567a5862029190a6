//! Time Sources
//!
//! The samplers never read the time directly for durations; they ask a
//! [`Clock`] for an opaque timestamp before and after each call and let the
//! clock turn the pair into a number. Elapsed-budget checks use a separate
//! monotonic instant (see `sampler`).

use std::time::Instant;

/// A pluggable time source.
///
/// `Timestamp` is opaque to the engine: only [`Clock::diff`] interprets it.
/// The unit of `diff` is the unit of every statistic in the results.
pub trait Clock {
    /// Timestamp captured around each call of the measured routine.
    type Timestamp;

    /// Capture the current time.
    fn now(&self) -> Self::Timestamp;

    /// Duration between two timestamps, as a plain number.
    fn diff(&self, start: &Self::Timestamp, end: &Self::Timestamp) -> f64;
}

/// Monotonic wall clock reporting milliseconds as `f64`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallClock;

impl Clock for WallClock {
    type Timestamp = Instant;

    #[inline(always)]
    fn now(&self) -> Instant {
        Instant::now()
    }

    #[inline(always)]
    fn diff(&self, start: &Instant, end: &Instant) -> f64 {
        end.saturating_duration_since(*start).as_secs_f64() * 1e3
    }
}

/// Clock assembled from a "get time" and a "time difference" function.
///
/// ```
/// use latbench_core::{Clock, FnClock};
/// use std::time::{Duration, Instant};
///
/// // Microsecond resolution instead of the default milliseconds
/// let clock = FnClock::new(Instant::now, |a: &Instant, b: &Instant| {
///     b.duration_since(*a).as_secs_f64() * 1e6
/// });
/// let t1 = clock.now();
/// std::thread::sleep(Duration::from_millis(1));
/// assert!(clock.diff(&t1, &clock.now()) >= 1000.0);
/// ```
#[derive(Clone, Copy)]
pub struct FnClock<N, D> {
    get_time: N,
    get_time_diff: D,
}

impl<N, D> FnClock<N, D> {
    /// Build a clock from `get_time` and `get_time_diff`.
    pub fn new<T>(get_time: N, get_time_diff: D) -> Self
    where
        N: Fn() -> T,
        D: Fn(&T, &T) -> f64,
    {
        Self {
            get_time,
            get_time_diff,
        }
    }
}

impl<N, D, T> Clock for FnClock<N, D>
where
    N: Fn() -> T,
    D: Fn(&T, &T) -> f64,
{
    type Timestamp = T;

    fn now(&self) -> T {
        (self.get_time)()
    }

    fn diff(&self, start: &T, end: &T) -> f64 {
        (self.get_time_diff)(start, end)
    }
}

impl<N, D> std::fmt::Debug for FnClock<N, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnClock").finish_non_exhaustive()
    }
}

// ─── Cycle counter ───────────────────────────────────────────────────────────

/// Read the CPU cycle/tick counter (platform-specific).
#[cfg(target_arch = "x86_64")]
#[inline(always)]
fn read_cycles() -> u64 {
    // SAFETY: RDTSCP is available on all x86_64 CPUs since ~2006 and waits
    // for prior instructions to retire before reading the counter.
    unsafe {
        let mut _aux: u32 = 0;
        std::arch::x86_64::__rdtscp(&mut _aux)
    }
}

/// Read the virtual counter timer on AArch64 (comparable to x86 TSC).
#[cfg(target_arch = "aarch64")]
#[inline(always)]
fn read_cycles() -> u64 {
    let cnt: u64;
    // SAFETY: CNTVCT_EL0 is readable from EL0 on all AArch64 implementations.
    unsafe {
        std::arch::asm!("mrs {}, cntvct_el0", out(reg) cnt, options(nostack, nomem));
    }
    cnt
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
#[inline(always)]
fn read_cycles() -> u64 {
    0
}

/// Whether this platform provides a hardware cycle counter.
/// When `false`, [`CycleClock`] reports every duration as 0.
pub const HAS_CYCLE_COUNTER: bool = cfg!(target_arch = "x86_64") || cfg!(target_arch = "aarch64");

/// Hardware cycle counter (RDTSCP on x86_64, CNTVCT_EL0 on AArch64).
///
/// Durations are raw ticks; no conversion to time units is attempted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleClock;

impl Clock for CycleClock {
    type Timestamp = u64;

    #[inline(always)]
    fn now(&self) -> u64 {
        read_cycles()
    }

    #[inline(always)]
    fn diff(&self, start: &u64, end: &u64) -> f64 {
        end.saturating_sub(*start) as f64
    }
}
