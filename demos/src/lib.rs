//! latbench Demos
//!
//! Runnable demonstrations of latbench. This crate is not published; it
//! exists solely to host examples that depend on `latbench`.
//!
//! Run any example with:
//! ```sh
//! cargo run --example <name> -p latbench-demos --release
//! ```
//!
//! | Example | Feature |
//! |---------|---------|
//! | `synchronous` | Engine-timed and self-timed blocking routines, `latbench.toml` discovery |
//! | `asynchronous` | Completion signals, futures, `run_async`, halting on failure |
//! | `custom_clock` | `FnClock` closure pairs and the hardware `CycleClock` |
//!
//! Set `RUST_LOG=latbench=debug` to see per-measurement events.

use latbench::SampleStatistics;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset. Covers the demos' own events too.
pub const DEFAULT_FILTER: &str = "info";

/// Install a `fmt` subscriber, honoring `RUST_LOG` when set.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Render results as an aligned plain-text table.
pub fn format_table(results: &[SampleStatistics], unit: &str) -> String {
    let width = results
        .iter()
        .map(|s| s.name.len())
        .max()
        .unwrap_or(0)
        .max("name".len());

    let mut out = format!(
        "{:<width$}  {:>8}  {:>12}  {:>12}  {:>12}  {:>8}\n",
        "name",
        "n",
        format!("mean ({unit})"),
        "min",
        "max",
        "rsd %",
    );
    for s in results {
        let rsd = if s.is_determinate() {
            format!("{:.2}", s.relative_stddev())
        } else {
            "-".to_string()
        };
        out.push_str(&format!(
            "{:<width$}  {:>8}  {:>12.4}  {:>12.4}  {:>12.4}  {:>8}\n",
            s.name, s.n, s.mean, s.minimum, s.maximum, rsd,
        ));
    }
    out
}

/// Print results to stdout.
pub fn print_table(results: &[SampleStatistics], unit: &str) {
    print!("{}", format_table(results, unit));
}
