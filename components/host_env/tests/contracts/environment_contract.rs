//! HostEnvironment behaviour that must hold whichever host was detected

use core_types::HarnessError;
use host_env::{
    detect, BrowserContext, HostKind, HostProbe, LoadContext, OutputWidget, ScopedEnv,
    ShellPrimitives,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

fn unit_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("schism-eval-fib")).unwrap();
    std::fs::write(dir.path().join("schism-eval-fib/main.scm"), b"(define (run n) n)").unwrap();
    dir
}

#[test]
fn test_scoped_reads_on_process_host() {
    let dir = unit_dir();
    let env = detect(HostProbe::from_process("hostbench", vec![]));
    let scope = LoadContext::new(dir.path().join("schism-eval-fib"));

    let bytes = ScopedEnv::new(&env, &scope)
        .read_binary_file("main.scm")
        .unwrap();
    assert_eq!(bytes, b"(define (run n) n)");
}

#[test]
fn test_scoped_reads_on_native_shell() {
    let dir = unit_dir();
    let env = detect(HostProbe::native_shell("runner", vec![]));
    assert_eq!(env.kind(), HostKind::Shell);

    let scope = LoadContext::new(dir.path().join("schism-eval-fib"));
    assert!(env.read_binary_file(&scope, "main.scm").is_ok());

    let other = LoadContext::new(dir.path());
    assert!(matches!(
        env.read_binary_file(&other, "main.scm"),
        Err(HarnessError::FileRead { .. })
    ));
}

#[test]
fn test_browser_cannot_read_files() {
    let env = detect(HostProbe::new("page").with_window(BrowserContext::default()));
    let err = env
        .read_binary_file(&LoadContext::default(), "main.scm")
        .unwrap_err();
    assert!(matches!(err, HarnessError::CapabilityUnavailable("readBinaryFile")));
}

#[test]
fn test_wait_completes_on_every_waiting_host() {
    let envs = vec![
        detect(HostProbe::from_process("p", vec![])),
        detect(HostProbe::new("s").with_shell(ShellPrimitives::new().with_drain_job_queue())),
        detect(HostProbe::new("b").with_window(BrowserContext::default().with_test_runner())),
    ];

    for env in envs {
        let steps = Rc::new(RefCell::new(Vec::new()));
        let s = steps.clone();
        env.wait(async move {
            s.borrow_mut().push("started");
            futures::future::ready(()).await;
            s.borrow_mut().push("finished");
            Ok(())
        })
        .unwrap();
        assert_eq!(*steps.borrow(), vec!["started", "finished"], "{:?}", env.kind());
    }
}

#[test]
fn test_wait_without_primitive_fails_only_for_pending_work() {
    // Detection itself succeeds
    let env = detect(HostProbe::new("bare"));
    assert_eq!(env.kind(), HostKind::Shell);

    assert!(env.wait(async { Ok(()) }).is_ok());
    let err = env
        .wait(async {
            futures::future::pending::<()>().await;
            Ok(())
        })
        .unwrap_err();
    assert_eq!(err.to_string(), "no waitFor() available");
}

#[test]
fn test_timers_measure_sleep_on_every_host() {
    let envs = vec![
        detect(HostProbe::from_process("p", vec![])),
        detect(HostProbe::new("s")),
        detect(HostProbe::new("b").with_window(BrowserContext::default())),
    ];

    for env in envs {
        let timer = env.timer();
        let start = timer.now();
        std::thread::sleep(Duration::from_millis(20));
        let elapsed = timer.since(start);
        assert!(elapsed >= Duration::from_millis(19), "{:?}: {:?}", env.kind(), elapsed);
        assert!(elapsed < Duration::from_secs(5));
    }
}

#[test]
fn test_browser_output_goes_to_widget() {
    let widget = OutputWidget::new();
    let env = detect(
        HostProbe::new("page").with_window(BrowserContext::new("?help", widget.clone())),
    );

    env.print("Usage: page COMMAND ARG...");
    assert_eq!(env.args(), ["help"]);
    assert_eq!(widget.lines(), vec!["Usage: page COMMAND ARG..."]);
}
