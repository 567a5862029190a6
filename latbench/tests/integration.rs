//! Integration tests for latbench
//!
//! These tests verify the end-to-end behavior of the measurement runner.

use latbench::{
    BenchConfig, BenchError, Benchmark, Completion, FnClock, MeasurementError, RunState,
    SamplerConfig,
};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

fn bounded(min: u64, max: u64) -> SamplerConfig {
    SamplerConfig {
        min_samples: min,
        max_samples: Some(max),
        ..Default::default()
    }
}

/// Test that the floor is honored for every routine shape
#[test]
fn test_minimum_samples_collected() {
    let mut bench = Benchmark::with_config(SamplerConfig {
        min_samples: 25,
        max_samples: Some(5),
        ..Default::default()
    });
    bench
        .measure("sync", || ())
        .measure_async("callback", |done: Completion| done.done())
        .measure_future("future", || async { Ok::<_, MeasurementError>(()) });

    let results = bench.run().unwrap();
    assert_eq!(results.len(), 3);
    for stats in results {
        assert!(stats.n >= 25, "{} collected {}", stats.name, stats.n);
    }
}

/// Test that constant self-timed routines produce exact statistics
#[test]
fn test_constant_value_statistics() {
    let mut bench = Benchmark::with_config(bounded(0, 5));
    bench
        .measure("sync one", || 1.0_f64)
        .measure_async("async one", |done: Completion| {
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(1)).await;
                done.done_with(1.0);
            });
        });

    let results = bench.run().unwrap();
    for stats in results {
        assert_eq!(stats.n, 5);
        assert_eq!(stats.mean, 1.0);
        assert_eq!(stats.variance, 0.0);
        assert_eq!(stats.stddev, 0.0);
        assert_eq!(stats.minimum, 1.0);
        assert_eq!(stats.maximum, 1.0);
    }
}

/// Test that measurements run strictly in queue order across shapes
#[test]
fn test_measurements_run_in_order() {
    let log = Rc::new(std::cell::RefCell::new(Vec::new()));

    let a = log.clone();
    let b = log.clone();
    let c = log.clone();
    let mut bench = Benchmark::with_config(bounded(0, 3));
    bench
        .measure_async("A", move |done: Completion| {
            a.borrow_mut().push('A');
            tokio::spawn(async move { done.done() });
        })
        .measure("B", move || b.borrow_mut().push('B'))
        .measure_future("C", move || {
            c.borrow_mut().push('C');
            async { Ok::<_, MeasurementError>(()) }
        });

    let results = bench.run().unwrap();
    let names: Vec<_> = results.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["A", "B", "C"]);

    // Every call of A finished before the first call of B
    let log = log.borrow();
    let first_b = log.iter().position(|&x| x == 'B').unwrap();
    let last_a = log.iter().rposition(|&x| x == 'A').unwrap();
    let first_c = log.iter().position(|&x| x == 'C').unwrap();
    let last_b = log.iter().rposition(|&x| x == 'B').unwrap();
    assert!(last_a < first_b);
    assert!(last_b < first_c);
}

/// Test that 100k immediately-completed async calls finish without stack growth
#[test]
fn test_immediate_completions_are_stack_safe() {
    let mut bench = Benchmark::with_config(SamplerConfig {
        min_samples: 0,
        max_samples: Some(100_000),
        max_duration: Duration::from_secs(600),
        ..Default::default()
    });
    bench.measure_async("immediate", |done: Completion| done.done_with(1.0));

    let results = bench.run().unwrap();
    assert_eq!(results[0].n, 100_000);
    assert_eq!(results[0].mean, 1.0);
}

/// Test that the first failure halts the run and later measurements never start
#[test]
fn test_error_halts_run() {
    let calls = Rc::new(Cell::new(0u32));
    let later_calls = Rc::new(Cell::new(0u32));

    let counter = calls.clone();
    let later = later_calls.clone();
    let mut bench = Benchmark::with_config(SamplerConfig {
        min_samples: 10,
        max_duration: Duration::ZERO,
        ..Default::default()
    });
    bench
        .measure("ok", || 1.0_f64)
        .measure_async("failing", move |done: Completion| {
            counter.set(counter.get() + 1);
            let call = counter.get();
            tokio::spawn(async move {
                if call == 8 {
                    done.fail("Error encountered");
                } else {
                    done.done_with(1.0);
                }
            });
        })
        .measure("never", move || later.set(later.get() + 1));

    let observed = Rc::new(Cell::new(false));
    let seen = observed.clone();
    bench.run_with(move |bench, outcome| {
        let err = outcome.unwrap_err();
        assert!(err.to_string().contains("Error encountered"));
        assert_eq!(err.measurement(), Some("failing"));
        assert!(matches!(
            err,
            BenchError::Measurement {
                source: MeasurementError::Failed(_),
                ..
            }
        ));

        assert_eq!(bench.results().len(), 1);
        assert_eq!(bench.results()[0].name, "ok");
        assert_eq!(bench.pending(), 1);
        seen.set(true);
    });

    assert!(observed.get());
    assert_eq!(calls.get(), 8);
    assert_eq!(later_calls.get(), 0);
    assert_eq!(bench.state(), RunState::Completed);
}

/// Test that an abandoned completion is reported as an error
#[test]
fn test_abandoned_completion() {
    let mut bench = Benchmark::with_config(bounded(0, 3));
    bench.measure_async("dropped", |done: Completion| drop(done));

    let err = bench.run().unwrap_err();
    assert!(matches!(
        err,
        BenchError::Measurement {
            source: MeasurementError::Abandoned,
            ..
        }
    ));
}

/// Test that saved samples are returned in call order
#[test]
fn test_saved_samples() {
    let mut sync_count = 0.0;
    let async_count = Rc::new(Cell::new(0.0));
    let counter = async_count.clone();

    let mut bench = Benchmark::with_config(SamplerConfig {
        min_samples: 5,
        max_samples: Some(5),
        discard_first: 0,
        save_samples: true,
        ..Default::default()
    });
    bench
        .measure("sync", move || {
            sync_count += 1.0;
            sync_count
        })
        .measure_async("async", move |done: Completion| {
            counter.set(counter.get() + 1.0);
            let value = counter.get();
            tokio::spawn(async move { done.done_with(value) });
        });

    let results = bench.run().unwrap();
    for stats in results {
        assert_eq!(stats.samples, Some(vec![1.0, 2.0, 3.0, 4.0, 5.0]));
        assert_eq!(stats.mean, 3.0);
    }
}

/// Test that the callback receives the runner and its results
#[test]
fn test_callback_sees_runner() {
    let mut bench = Benchmark::with_config(bounded(0, 2));
    bench.measure("noop", || ());

    let mut called = 0;
    bench.run_with(|bench, outcome| {
        called += 1;
        let results = outcome.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(bench.results().len(), 1);
        assert_eq!(bench.state(), RunState::Completed);
        assert_eq!(bench.config().max_samples, Some(2));
    });
    assert_eq!(called, 1);
}

/// Test that a zero time budget still yields exactly the floor
#[test]
fn test_zero_budget_yields_floor() {
    let mut bench = Benchmark::with_config(SamplerConfig {
        min_samples: 10,
        max_duration: Duration::ZERO,
        ..Default::default()
    });
    bench
        .measure("slow sync", || {
            std::thread::sleep(Duration::from_millis(1));
            1.0_f64
        })
        .measure_async("slow async", |done: Completion| {
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(1)).await;
                done.done_with(1.0);
            });
        });

    let results = bench.run().unwrap();
    for stats in results {
        assert_eq!(stats.n, 10);
        assert_eq!(stats.mean, 1.0);
    }
}

/// Test that running an empty queue completes immediately
#[test]
fn test_empty_run() {
    let mut called = false;
    Benchmark::new().run_with(|bench, outcome| {
        assert!(outcome.unwrap().is_empty());
        assert_eq!(bench.state(), RunState::Completed);
        called = true;
    });
    assert!(called);
}

/// Test that repeated runs keep earlier results and do not re-run measurements
#[test]
fn test_repeated_runs() {
    let calls = Rc::new(Cell::new(0u32));
    let counter = calls.clone();

    let mut bench = Benchmark::with_config(SamplerConfig {
        min_samples: 0,
        max_samples: Some(3),
        discard_first: 0,
        ..Default::default()
    });
    bench
        .measure("once", move || counter.set(counter.get() + 1))
        .run_with(|_, outcome| assert_eq!(outcome.unwrap().len(), 1))
        .run_with(|_, outcome| assert_eq!(outcome.unwrap().len(), 1))
        .run_with(|bench, outcome| {
            assert_eq!(outcome.unwrap().len(), 1);
            assert_eq!(bench.results()[0].name, "once");
        });

    assert_eq!(calls.get(), 3);

    bench.measure("second", || 2.0_f64);
    let results = bench.run().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[1].mean, 2.0);
}

/// Test the async driver inside a tokio runtime
#[tokio::test]
async fn test_run_async() {
    let mut bench = Benchmark::with_config(bounded(0, 4));
    bench
        .measure_future("sleep", || async {
            tokio::time::sleep(Duration::from_millis(1)).await;
            Ok::<_, MeasurementError>(())
        })
        .measure("sync", || 0.5_f64);

    let results = bench.run_async().await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].n, 4);
    assert!(results[0].mean >= 0.5);
    assert_eq!(results[1].mean, 0.5);
}

/// Test that the blocking driver refuses to nest inside a current-thread runtime
#[tokio::test(flavor = "current_thread")]
async fn test_nested_runtime_rejected() {
    let mut bench = Benchmark::with_config(bounded(0, 2));
    bench.measure_async("nested", |done: Completion| done.done());

    assert!(matches!(bench.run(), Err(BenchError::NestedRuntime)));
    assert_eq!(bench.pending(), 1);
}

/// Test measuring with a custom clock pair
#[test]
fn test_custom_clock() {
    let ticks = Rc::new(Cell::new(0.0));
    let source = ticks.clone();
    let clock = FnClock::new(
        move || {
            source.set(source.get() + 3.0);
            source.get()
        },
        |a: &f64, b: &f64| b - a,
    );

    let mut bench = Benchmark::with_config(bounded(0, 4).with_clock(clock));
    bench.measure("ticks", || ());

    let results = bench.run().unwrap();
    assert_eq!(results[0].mean, 3.0);
    assert_eq!(results[0].variance, 0.0);
}

/// Test constructing a runner from file configuration
#[test]
fn test_runner_from_file_config() {
    let config: BenchConfig = toml::from_str(
        r#"
        [sampling]
        min_samples = 0
        max_samples = 2
        max_duration = "50ms"
        discard_first = 1
        "#,
    )
    .unwrap();

    let mut bench = Benchmark::from_file_config(&config).unwrap();
    assert_eq!(bench.config().max_duration, Duration::from_millis(50));

    bench.measure("configured", || 1.0_f64);
    assert_eq!(bench.run().unwrap()[0].n, 2);
}

/// Test that results serialize for downstream tooling
#[test]
fn test_results_serialize() {
    let mut bench = Benchmark::with_config(bounded(0, 3));
    bench.measure("json", || 1.0_f64);

    let results = bench.run().unwrap();
    let json = serde_json::to_value(results).unwrap();
    assert_eq!(json[0]["name"], "json");
    assert_eq!(json[0]["n"], 3);
    assert!(json[0].get("samples").is_none());
}

/// Test that the prelude alone is enough to write fallible future routines
mod prelude_only {
    use latbench::prelude::*;

    #[test]
    fn test_future_routine_with_prelude_error_type() {
        let mut bench = Benchmark::with_config(SamplerConfig {
            min_samples: 0,
            max_samples: Some(2),
            ..Default::default()
        });
        bench
            .measure_future("ok", || async { Ok::<_, BoxError>(1.0_f64) })
            .measure_future("lookup", || async {
                let value: Option<u64> = None;
                value.ok_or("missing value")?;
                Ok::<_, BoxError>(())
            });

        let err = bench.run().unwrap_err();
        assert_eq!(err.measurement(), Some("lookup"));
        assert!(err.to_string().contains("missing value"));
        assert_eq!(bench.results().len(), 1);
    }
}
