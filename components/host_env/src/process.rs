//! Process runtime host.

use crate::host::{Host, HostKind};
use crate::timer::{HrTimer, Timer};
use core_types::{HarnessError, HarnessResult};
use futures::future::LocalBoxFuture;
use std::io::Write;
use std::path::Path;

/// Host backed by the operating-system process: stdout/stderr, the
/// filesystem, an `hrtime` clock and a current-thread async runtime.
#[derive(Debug, Default)]
pub struct ProcessHost {
    timer: HrTimer,
}

impl ProcessHost {
    /// Creates the host; the clock origin is now.
    pub fn new() -> Self {
        Self {
            timer: HrTimer::new(),
        }
    }
}

impl Host for ProcessHost {
    fn kind(&self) -> HostKind {
        HostKind::Process
    }

    fn print(&self, line: &str) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{}", line);
    }

    fn print_err(&self, line: &str) {
        let mut err = std::io::stderr().lock();
        let _ = writeln!(err, "{}", line);
    }

    fn read_binary_file(&self, path: &Path) -> HarnessResult<Vec<u8>> {
        std::fs::read(path).map_err(|source| HarnessError::FileRead {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Pending futures alone would not keep a process around, so the work is
    /// driven on a dedicated runtime that lives until the future resolves.
    fn drive<'a>(&self, work: LocalBoxFuture<'a, HarnessResult<()>>) -> HarnessResult<()> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(|e| HarnessError::workload_with("cannot start async runtime", e))?;
        runtime.block_on(work)
    }

    fn timer(&self) -> &dyn Timer {
        &self.timer
    }

    fn quit(&self, code: i32) -> ! {
        let _ = std::io::stdout().flush();
        let _ = std::io::stderr().flush();
        std::process::exit(code)
    }
}
