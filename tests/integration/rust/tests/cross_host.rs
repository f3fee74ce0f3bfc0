//! Cross-host integration tests
//!
//! The same command line goes through detection, dispatch, the runner and
//! the Scheme evaluator on every host kind.

use bench_cli::{dispatch, Harness};
use benchmarks::{BenchmarkRegistry, BenchmarkRunner, DEFAULT_SUITE_ROOT};
use host_env::{detect, BrowserContext, HostKind, HostProbe, OutputWidget, ShellPrimitives};
use std::cell::RefCell;
use std::rc::Rc;

fn harness(probe: HostProbe) -> Harness {
    Harness::new(
        detect(probe),
        BenchmarkRegistry::builtin().unwrap(),
        BenchmarkRunner::new(DEFAULT_SUITE_ROOT),
    )
}

fn dispatch_own_args(harness: &Harness) -> i32 {
    dispatch::main(harness, harness.env().args())
}

/// Test: shell scriptArgs with a leading `--` run the small benchmark
#[test]
fn test_shell_runs_small_fib() {
    let out = Rc::new(RefCell::new(Vec::new()));
    let sink = out.clone();
    let shell = ShellPrimitives::new()
        .with_print(move |line| sink.borrow_mut().push(line.to_string()))
        .with_read(|path| std::fs::read(path))
        .with_drain_job_queue()
        .with_script_args(
            ["--", "run", "small", "schism-eval-fib"]
                .map(String::from)
                .to_vec(),
        );
    let harness = harness(HostProbe::new("runner").with_shell(shell));
    assert_eq!(harness.env().kind(), HostKind::Shell);

    assert_eq!(dispatch_own_args(&harness), 0);
    let out = out.borrow();
    assert_eq!(out.len(), 1);
    assert!(out[0].starts_with("schism-eval-fib/small: "));
}

/// Test: the process host runs the medium benchmark
#[test]
fn test_process_runs_medium_fib() {
    let args = ["run", "medium", "schism-eval-fib"].map(String::from).to_vec();
    let harness = harness(HostProbe::from_process("hostbench", args));
    assert_eq!(harness.env().kind(), HostKind::Process);
    assert_eq!(dispatch_own_args(&harness), 0);
}

/// Test: a page lists benchmarks into its output widget
#[test]
fn test_browser_lists_into_widget() {
    let widget = OutputWidget::new();
    let page = BrowserContext::new("?list&large", widget.clone()).with_test_runner();
    let harness = harness(HostProbe::new("runner").with_window(page));

    assert_eq!(dispatch_own_args(&harness), 0);
    assert_eq!(widget.lines(), vec!["schism-eval-fib"]);
}

/// Test: a page cannot load file-backed units, and says why
#[test]
fn test_browser_run_fails_without_file_reads() {
    let widget = OutputWidget::new();
    let page = BrowserContext::new("?run&small&schism-eval-fib", widget.clone()).with_test_runner();
    let harness = harness(HostProbe::new("runner").with_window(page));

    assert_eq!(dispatch_own_args(&harness), 1);
    assert_eq!(
        widget.lines(),
        vec![
            "Error running command run: Benchmark schism-eval-fib/small failed",
            "  caused by: no readBinaryFile() available",
        ]
    );
}

/// Test: a page without test-runner hooks still answers `help`
#[test]
fn test_browser_without_test_runner_prints_help() {
    let widget = OutputWidget::new();
    let page = BrowserContext::new("?help", widget.clone());
    let harness = harness(HostProbe::new("runner").with_window(page));

    assert_eq!(dispatch_own_args(&harness), 0);
    assert_eq!(widget.lines()[0], "Usage: runner COMMAND ARG...");
    assert_eq!(widget.lines()[1], "Available commands:");
}
