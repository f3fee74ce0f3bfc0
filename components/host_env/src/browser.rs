//! Page host.
//!
//! Output goes to an output widget owned by the embedder, arguments come from
//! the location query string. A page cannot read files synchronously, and it
//! can only wait for async work when the embedder exposes test-runner hooks.

use crate::host::{Host, HostKind};
use crate::timer::{PerformanceTimer, Timer};
use core_types::{HarnessError, HarnessResult};
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;

/// Text area that receives everything the harness prints.
#[derive(Debug, Clone, Default)]
pub struct OutputWidget {
    text: Arc<Mutex<String>>,
}

impl OutputWidget {
    /// Creates an empty widget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one line.
    pub fn append_line(&self, line: &str) {
        let mut text = self.text.lock();
        text.push_str(line);
        text.push('\n');
    }

    /// Current contents.
    pub fn contents(&self) -> String {
        self.text.lock().clone()
    }

    /// Current contents split into lines.
    pub fn lines(&self) -> Vec<String> {
        self.text.lock().lines().map(str::to_string).collect()
    }

    /// Empties the widget.
    pub fn clear(&self) {
        self.text.lock().clear();
    }
}

/// What the embedding page provides.
#[derive(Debug, Clone, Default)]
pub struct BrowserContext {
    /// `location.search`, with or without the leading `?`
    pub location_search: String,
    /// Output widget
    pub output: OutputWidget,
    /// Whether `waitUntilDone`/`notifyDone` test-runner hooks exist
    pub test_runner: bool,
}

impl BrowserContext {
    /// Context for a page at `location_search`.
    pub fn new(location_search: impl Into<String>, output: OutputWidget) -> Self {
        Self {
            location_search: location_search.into(),
            output,
            test_runner: false,
        }
    }

    /// Marks the test-runner hooks as present.
    pub fn with_test_runner(mut self) -> Self {
        self.test_runner = true;
        self
    }

    /// Query string split on `&`, empty parts dropped.
    pub fn normalized_args(&self) -> Vec<String> {
        self.location_search
            .strip_prefix('?')
            .unwrap_or(&self.location_search)
            .split('&')
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Host backed by a page.
#[derive(Debug)]
pub struct BrowserHost {
    output: OutputWidget,
    test_runner: bool,
    timer: PerformanceTimer,
}

impl BrowserHost {
    /// Builds the host from the page context.
    pub fn new(context: &BrowserContext) -> Self {
        Self {
            output: context.output.clone(),
            test_runner: context.test_runner,
            timer: PerformanceTimer::new(),
        }
    }
}

impl Host for BrowserHost {
    fn kind(&self) -> HostKind {
        HostKind::Browser
    }

    fn print(&self, line: &str) {
        self.output.append_line(line);
    }

    fn print_err(&self, line: &str) {
        self.output.append_line(line);
    }

    fn read_binary_file(&self, _path: &Path) -> HarnessResult<Vec<u8>> {
        Err(HarnessError::CapabilityUnavailable("readBinaryFile"))
    }

    fn drive<'a>(&self, work: LocalBoxFuture<'a, HarnessResult<()>>) -> HarnessResult<()> {
        if !self.test_runner {
            return work
                .now_or_never()
                .unwrap_or(Err(HarnessError::CapabilityUnavailable("waitFor")));
        }
        futures::executor::block_on(work)
    }

    fn timer(&self) -> &dyn Timer {
        &self.timer
    }

    fn quit(&self, code: i32) -> ! {
        std::process::exit(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_becomes_args() {
        let ctx = BrowserContext::new("?run&small&schism-eval-fib", OutputWidget::new());
        assert_eq!(ctx.normalized_args(), vec!["run", "small", "schism-eval-fib"]);
    }

    #[test]
    fn test_empty_query_has_no_args() {
        assert!(BrowserContext::new("", OutputWidget::new())
            .normalized_args()
            .is_empty());
        assert!(BrowserContext::new("?", OutputWidget::new())
            .normalized_args()
            .is_empty());
    }

    #[test]
    fn test_prints_land_in_widget() {
        let widget = OutputWidget::new();
        let host = BrowserHost::new(&BrowserContext::new("", widget.clone()));

        host.print("opencv.js loaded");
        host.print_err("warning");
        assert_eq!(widget.contents(), "opencv.js loaded\nwarning\n");
        widget.clear();
        assert!(widget.lines().is_empty());
    }

    #[test]
    fn test_wait_requires_test_runner() {
        let ctx = BrowserContext::new("", OutputWidget::new());
        let host = BrowserHost::new(&ctx);
        assert!(matches!(
            host.drive(Box::pin(async {
                futures::future::pending::<()>().await;
                Ok(())
            })),
            Err(HarnessError::CapabilityUnavailable("waitFor"))
        ));
        assert!(host.drive(Box::pin(async { Ok(()) })).is_ok());

        let host = BrowserHost::new(&ctx.with_test_runner());
        assert!(host.drive(Box::pin(async { Ok(()) })).is_ok());
    }

    #[test]
    fn test_no_file_reads() {
        let host = BrowserHost::new(&BrowserContext::default());
        assert!(matches!(
            host.read_binary_file(Path::new("a")),
            Err(HarnessError::CapabilityUnavailable("readBinaryFile"))
        ));
    }
}
