//! Running Scheme-module benchmarks against real suite directories

use benchmarks::scheme::SchemeModule;
use benchmarks::{BenchmarkDescriptor, BenchmarkRegistry, BenchmarkRunner, SizeClass};
use core_types::{HarnessError, Value};
use host_env::{detect, BrowserContext, HostEnvironment, HostProbe, ShellPrimitives};
use std::path::Path;
use std::sync::Arc;

const DOUBLER: &str = "; test unit\n(define (run n) (* n 2))\n";

fn suite_with(dir: &str, source: &str) -> tempfile::TempDir {
    let root = tempfile::tempdir().unwrap();
    std::fs::create_dir(root.path().join(dir)).unwrap();
    std::fs::write(root.path().join(dir).join("main.scm"), source).unwrap();
    root
}

fn doubler(expected: i32) -> BenchmarkDescriptor {
    BenchmarkDescriptor {
        size: SizeClass::Small,
        id: "doubler".to_string(),
        dir_name: "doubler".to_string(),
        loader: Arc::new(SchemeModule::new("main.scm")),
        entry_point: "run".to_string(),
        args: vec![Value::Smi(21)],
        expected: Value::Smi(expected),
    }
}

fn run_on(env: &HostEnvironment, root: &Path, benchmark: &BenchmarkDescriptor) -> Result<f64, HarnessError> {
    let runner = BenchmarkRunner::new(root);
    futures::executor::block_on(runner.run(benchmark, env))
}

#[test]
fn test_runs_on_process_host() {
    let root = suite_with("doubler", DOUBLER);
    let env = detect(HostProbe::from_process("hostbench", vec![]));
    let elapsed = run_on(&env, root.path(), &doubler(42)).unwrap();
    assert!(elapsed >= 0.0);
}

#[test]
fn test_runs_on_native_shell() {
    let root = suite_with("doubler", DOUBLER);
    let env = detect(HostProbe::native_shell("runner", vec![]));
    assert!(run_on(&env, root.path(), &doubler(42)).is_ok());
}

#[test]
fn test_wrong_value_is_reported_with_both_values() {
    let root = suite_with("doubler", DOUBLER);
    let env = detect(HostProbe::from_process("hostbench", vec![]));
    match run_on(&env, root.path(), &doubler(43)).unwrap_err() {
        HarnessError::UnexpectedResult {
            subject,
            actual,
            expected,
        } => {
            assert_eq!(subject, "doubler");
            assert_eq!(actual, Value::Smi(42));
            assert_eq!(expected, Value::Smi(43));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_unit_file_is_a_read_error() {
    let root = tempfile::tempdir().unwrap();
    let env = detect(HostProbe::from_process("hostbench", vec![]));
    let err = run_on(&env, root.path(), &doubler(42)).unwrap_err();
    assert!(matches!(err, HarnessError::FileRead { .. }));
}

#[test]
fn test_shell_without_read_fails_at_load() {
    let root = suite_with("doubler", DOUBLER);
    let env = detect(HostProbe::new("runner").with_shell(ShellPrimitives::new()));
    let err = run_on(&env, root.path(), &doubler(42)).unwrap_err();
    assert!(matches!(err, HarnessError::CapabilityUnavailable("readBinaryFile")));
}

#[test]
fn test_browser_cannot_load_file_units() {
    let root = suite_with("doubler", DOUBLER);
    let env = detect(HostProbe::new("page").with_window(BrowserContext::default()));
    let err = run_on(&env, root.path(), &doubler(42)).unwrap_err();
    assert!(matches!(err, HarnessError::CapabilityUnavailable("readBinaryFile")));
}

#[test]
fn test_unit_errors_keep_their_cause() {
    let root = suite_with("doubler", "(define (run n) (+ n #t))");
    let env = detect(HostProbe::from_process("hostbench", vec![]));
    let err = run_on(&env, root.path(), &doubler(42)).unwrap_err();
    assert_eq!(err.to_string(), "run failed");
    assert_eq!(err.causes(), vec!["expected integer, got #t".to_string()]);
}

#[test]
fn test_shipped_fib_small_and_medium() {
    let env = detect(HostProbe::from_process("hostbench", vec![]));
    let registry = BenchmarkRegistry::builtin().unwrap();
    let runner = BenchmarkRunner::new(benchmarks::DEFAULT_SUITE_ROOT);
    for size in ["small", "medium"] {
        let fib = registry.lookup(size, "schism-eval-fib").unwrap();
        assert!(futures::executor::block_on(runner.run(fib, &env)).is_ok(), "size {size}");
    }
}

#[test]
#[ignore = "fib(30) through the evaluator takes seconds"]
fn test_shipped_fib_large() {
    let env = detect(HostProbe::from_process("hostbench", vec![]));
    let registry = BenchmarkRegistry::builtin().unwrap();
    let runner = BenchmarkRunner::new(benchmarks::DEFAULT_SUITE_ROOT);
    let fib = registry.lookup("large", "schism-eval-fib").unwrap();
    assert_eq!(fib.expected, Value::Smi(832040));
    let run = futures::executor::block_on(runner.execute(fib, &env)).unwrap();
    assert_eq!(run.actual, Value::Smi(832040));
}
