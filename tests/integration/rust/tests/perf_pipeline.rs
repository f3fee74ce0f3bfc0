//! Image-kernel suite across hosts
//!
//! The suite only prints and reads the clock, so it runs on every host,
//! including a page.

use benchmarks::perf::{self, PerfOptions};
use benchmarks::SizeClass;
use core_types::HarnessError;
use host_env::{detect, BrowserContext, HostProbe, OutputWidget};

fn page() -> (host_env::HostEnvironment, OutputWidget) {
    let widget = OutputWidget::new();
    let ctx = BrowserContext::new("?small", widget.clone()).with_test_runner();
    (detect(HostProbe::new("perf").with_window(ctx)), widget)
}

/// Test: small suite in a page reports every operation into the widget
#[test]
fn test_small_suite_in_page() {
    let (env, widget) = page();
    env.wait(perf::run_suite(&env, SizeClass::Small, 3)).unwrap();

    let lines = widget.lines();
    assert_eq!(lines[0], "image kernels loaded");
    for heading in ["=== cvtColor ===", "=== threshold ===", "=== integral ==="] {
        let at = lines.iter().position(|l| l == heading).unwrap();
        assert!(lines[at + 1].starts_with("elapsed time: "));
        assert!(lines[at + 2].starts_with("average time: "));
        assert!(lines[at + 3].starts_with("stddev: "));
        assert!(lines[at + 3].ends_with("%)"));
    }
}

/// Test: a wrong integral hash fails after the timings were printed
#[test]
fn test_wrong_hash_fails_on_process_host() {
    let env = detect(HostProbe::from_process("perf", Vec::new()));
    let options = PerfOptions {
        integral_sqsum: "not-a-hash",
        ..PerfOptions::for_size(SizeClass::Small)
    };

    let err = env.wait(perf::run_with_options(&env, &options, 1)).unwrap_err();
    match err {
        HarnessError::UnexpectedResult { subject, .. } => assert_eq!(subject, "integral sqsum"),
        other => panic!("unexpected error: {other}"),
    }
}
