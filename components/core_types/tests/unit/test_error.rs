//! Unit tests for HarnessError rendering

use core_types::{HarnessError, Value};

#[test]
fn test_unexpected_result_carries_both_values() {
    let error = HarnessError::UnexpectedResult {
        subject: "threshold dest".to_string(),
        actual: Value::from("00"),
        expected: Value::from("ff"),
    };

    assert_eq!(
        error.to_string(),
        "Unexpected result from threshold dest: 00 (expected ff)"
    );
    match error {
        HarnessError::UnexpectedResult {
            actual, expected, ..
        } => {
            assert_eq!(actual, Value::from("00"));
            assert_eq!(expected, Value::from("ff"));
        }
        other => panic!("unexpected variant: {other:?}"),
    }
}

#[test]
fn test_workload_failure_keeps_source() {
    let io = std::io::Error::new(std::io::ErrorKind::Other, "engine trap");
    let error = HarnessError::workload_with("read-and-eval failed", io);

    assert_eq!(error.to_string(), "read-and-eval failed");
    assert_eq!(error.causes(), vec!["engine trap".to_string()]);
}

#[test]
fn test_benchmark_failure_names_benchmark() {
    let error = HarnessError::BenchmarkFailed {
        id: "schism-eval-fib".to_string(),
        size: "large".to_string(),
        source: Box::new(HarnessError::CapabilityUnavailable("waitFor")),
    };

    assert_eq!(error.to_string(), "Benchmark schism-eval-fib/large failed");
    assert_eq!(error.causes(), vec!["no waitFor() available".to_string()]);
}

#[test]
fn test_duplicate_benchmark_message() {
    let error = HarnessError::DuplicateBenchmark {
        size: "small".to_string(),
        id: "schism-eval-fib".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "benchmark 'schism-eval-fib' is already registered for size 'small'"
    );
}
