//! Asynchronous Measurements: completion signals and futures
//!
//! A callback routine receives a `Completion` and signals it whenever the
//! work finishes, from any task or thread. A future routine is complete
//! when its future resolves. The run halts at the first failure and the
//! measurements queued behind it are never started.
//!
//! Run with: cargo run --example asynchronous -p latbench-demos --release

use latbench::prelude::*;
use latbench_demos::{init_logging, print_table};
use std::time::Duration;
use tokio::sync::mpsc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = SamplerConfig {
        min_samples: 20,
        max_samples: Some(200),
        max_duration: Duration::from_secs(2),
        ..Default::default()
    };

    let mut bench = Benchmark::with_config(config.clone());
    bench
        .measure_async("spawned task", |done: Completion| {
            tokio::spawn(async move { done.done() });
        })
        .measure_async("os thread", |done: Completion| {
            std::thread::spawn(move || done.done());
        })
        .measure_future("sleep 1ms", || async {
            tokio::time::sleep(Duration::from_millis(1)).await;
            Ok::<_, BoxError>(())
        })
        .measure_future("channel round trip", || async {
            let (tx, mut rx) = mpsc::channel::<u64>(1);
            tokio::spawn(async move { tx.send(42).await });
            rx.recv().await.ok_or("sender dropped")?;
            Ok::<_, BoxError>(())
        });

    let results = bench.run_async().await?;
    print_table(results, "ms");

    // A failing measurement halts the run
    let mut failing = Benchmark::with_config(config);
    let mut calls = 0u32;
    failing
        .measure_async("flaky", move |done: Completion| {
            calls += 1;
            if calls == 5 {
                done.fail("service unavailable");
            } else {
                done.done();
            }
        })
        .measure("never runs", || ());

    if let Err(e) = failing.run_async().await.map(|_| ()) {
        tracing::warn!(error = %e, skipped = failing.pending(), "run halted");
    }
    Ok(())
}
