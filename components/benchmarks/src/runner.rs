//! Benchmark runner
//!
//! Loads a benchmark's unit, times a single call of its entry point with the
//! host clock and verifies the result against the registered value.

use crate::registry::BenchmarkDescriptor;
use core_types::{HarnessError, HarnessResult, Value};
use host_env::{HostEnvironment, LoadContext, ScopedEnv, Timestamp};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// One timed invocation of a benchmark.
#[derive(Debug, Clone)]
pub struct BenchmarkRun {
    /// Clock reading just before the call
    pub started: Timestamp,
    /// Clock reading just after the call resolved
    pub finished: Timestamp,
    /// Time spent in the call
    pub elapsed: Duration,
    /// Value the entry point returned
    pub actual: Value,
}

/// Runs benchmarks whose units live under a suite root.
#[derive(Debug, Clone)]
pub struct BenchmarkRunner {
    suite_root: PathBuf,
}

impl BenchmarkRunner {
    /// Creates a runner resolving unit directories against `suite_root`.
    pub fn new(suite_root: impl Into<PathBuf>) -> Self {
        Self {
            suite_root: suite_root.into(),
        }
    }

    /// Directory the unit directories are resolved against.
    pub fn suite_root(&self) -> &Path {
        &self.suite_root
    }

    /// File scope of a run of `benchmark`.
    pub fn scope_for(&self, benchmark: &BenchmarkDescriptor) -> LoadContext {
        LoadContext::new(self.suite_root.join(&benchmark.dir_name))
    }

    /// Loads and calls the benchmark once, without verifying the result.
    ///
    /// Loading happens before the clock starts.
    pub async fn execute(
        &self,
        benchmark: &BenchmarkDescriptor,
        env: &HostEnvironment,
    ) -> HarnessResult<BenchmarkRun> {
        let scope = self.scope_for(benchmark);
        let scoped = ScopedEnv::new(env, &scope);

        let unit = benchmark.loader.load(scoped).await?;

        let timer = env.timer();
        let started = timer.now();
        let actual = unit
            .call(&benchmark.entry_point, scoped, &benchmark.args)
            .await?;
        let finished = timer.now();
        let elapsed = timer.elapsed(started, finished);

        tracing::debug!(
            id = %benchmark.id,
            size = %benchmark.size,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "benchmark call finished"
        );

        Ok(BenchmarkRun {
            started,
            finished,
            elapsed,
            actual,
        })
    }

    /// Runs the benchmark and returns the elapsed time in seconds.
    ///
    /// A result that is not strictly equal to the registered one is an error.
    pub async fn run(
        &self,
        benchmark: &BenchmarkDescriptor,
        env: &HostEnvironment,
    ) -> HarnessResult<f64> {
        let run = self.execute(benchmark, env).await?;
        if !run.actual.strict_equals(&benchmark.expected) {
            return Err(HarnessError::UnexpectedResult {
                subject: benchmark.id.clone(),
                actual: run.actual,
                expected: benchmark.expected.clone(),
            });
        }
        Ok(run.elapsed.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{BenchmarkRegistry, SizeClass, DEFAULT_SUITE_ROOT};
    use crate::unit::{BenchmarkUnit, UnitLoader};
    use futures::future::LocalBoxFuture;
    use futures::FutureExt;
    use host_env::{detect, HostProbe};
    use std::sync::Arc;

    const LOAD_DELAY: Duration = Duration::from_millis(60);
    const CALL_DELAY: Duration = Duration::from_millis(20);

    struct SlowLoader {
        result: i32,
    }

    struct SlowUnit {
        result: i32,
    }

    impl UnitLoader for SlowLoader {
        fn load<'a>(
            &'a self,
            _env: ScopedEnv<'a>,
        ) -> LocalBoxFuture<'a, HarnessResult<Box<dyn BenchmarkUnit>>> {
            async move {
                std::thread::sleep(LOAD_DELAY);
                Ok(Box::new(SlowUnit {
                    result: self.result,
                }) as Box<dyn BenchmarkUnit>)
            }
            .boxed_local()
        }
    }

    impl BenchmarkUnit for SlowUnit {
        fn entry_points(&self) -> Vec<String> {
            vec!["run".to_string()]
        }

        fn call<'a>(
            &'a self,
            _entry: &'a str,
            _env: ScopedEnv<'a>,
            _args: &'a [Value],
        ) -> LocalBoxFuture<'a, HarnessResult<Value>> {
            async move {
                std::thread::sleep(CALL_DELAY);
                Ok(Value::Smi(self.result))
            }
            .boxed_local()
        }
    }

    fn slow(result: i32, expected: i32) -> BenchmarkDescriptor {
        BenchmarkDescriptor {
            size: SizeClass::Small,
            id: "slow".to_string(),
            dir_name: "slow".to_string(),
            loader: Arc::new(SlowLoader { result }),
            entry_point: "run".to_string(),
            args: Vec::new(),
            expected: Value::Smi(expected),
        }
    }

    fn process_env() -> HostEnvironment {
        detect(HostProbe::from_process("runner-test", Vec::new()))
    }

    #[test]
    fn test_load_time_is_not_measured() {
        let env = process_env();
        let runner = BenchmarkRunner::new("unused");
        let elapsed = futures::executor::block_on(runner.run(&slow(1, 1), &env)).unwrap();

        assert!(elapsed >= CALL_DELAY.as_secs_f64());
        assert!(elapsed < LOAD_DELAY.as_secs_f64());
    }

    #[test]
    fn test_wrong_result_is_unexpected() {
        let env = process_env();
        let runner = BenchmarkRunner::new("unused");
        let err = futures::executor::block_on(runner.run(&slow(1, 2), &env)).unwrap_err();
        assert_eq!(err.to_string(), "Unexpected result from slow: 1 (expected 2)");
    }

    #[test]
    fn test_scope_joins_suite_root() {
        let runner = BenchmarkRunner::new("/suites");
        assert_eq!(
            runner.scope_for(&slow(0, 0)).prefix(),
            Path::new("/suites/slow")
        );
    }

    #[test]
    fn test_runs_shipped_fib() {
        let env = process_env();
        let registry = BenchmarkRegistry::builtin().unwrap();
        let runner = BenchmarkRunner::new(DEFAULT_SUITE_ROOT);
        let fib = registry.lookup("small", "schism-eval-fib").unwrap();

        let run = futures::executor::block_on(runner.execute(fib, &env)).unwrap();
        assert_eq!(run.actual, Value::Smi(6765));
        assert_eq!(run.elapsed, env.timer().elapsed(run.started, run.finished));
    }
}
