#![warn(missing_docs)]
//! latbench Statistical Engine
//!
//! Provides the statistics side of latency measurement:
//! - Welford online accumulator with O(1) memory (optional raw sample retention)
//! - Point-in-time snapshots that never mutate the accumulator
//! - Named, serializable result records handed from samplers to the runner

mod online;
mod summary;

pub use online::OnlineStatistics;
pub use summary::{SampleStatistics, Snapshot};
