//! Bare script-engine shell host.
//!
//! Shells differ in which globals they expose. [`ShellPrimitives`] records
//! what is available; [`ShellHost`] uses what it finds and degrades the rest:
//! a missing `printErr` falls back to `print`, while a missing `read` or
//! `drainJobQueue` only fails once somebody calls it.

use crate::host::{Host, HostKind};
use crate::timer::{DateTimer, Timer};
use core_types::{HarnessError, HarnessResult};
use futures::executor::LocalPool;
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use std::fmt;
use std::io::Write;
use std::path::Path;

/// Line printer primitive.
pub type PrintFn = Box<dyn Fn(&str)>;
/// Binary file read primitive.
pub type ReadFn = Box<dyn Fn(&Path) -> std::io::Result<Vec<u8>>>;
/// Quit primitive.
pub type QuitFn = Box<dyn Fn(i32)>;

/// The optional globals a shell may provide.
#[derive(Default)]
pub struct ShellPrimitives {
    /// `print`
    pub print: Option<PrintFn>,
    /// `printErr`
    pub print_err: Option<PrintFn>,
    /// `read(file, 'binary')`
    pub read: Option<ReadFn>,
    /// Whether `drainJobQueue` exists
    pub drain_job_queue: bool,
    /// `quit`
    pub quit: Option<QuitFn>,
    /// `scriptArgs`
    pub script_args: Option<Vec<String>>,
}

impl ShellPrimitives {
    /// A shell with no primitives at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// The full set of primitives, wired to the current process.
    pub fn native(script_args: Vec<String>) -> Self {
        Self::new()
            .with_print(|line| {
                let _ = writeln!(std::io::stdout().lock(), "{}", line);
            })
            .with_print_err(|line| {
                let _ = writeln!(std::io::stderr().lock(), "{}", line);
            })
            .with_read(|path| std::fs::read(path))
            .with_drain_job_queue()
            .with_script_args(script_args)
    }

    /// Provides `print`.
    pub fn with_print(mut self, f: impl Fn(&str) + 'static) -> Self {
        self.print = Some(Box::new(f));
        self
    }

    /// Provides `printErr`.
    pub fn with_print_err(mut self, f: impl Fn(&str) + 'static) -> Self {
        self.print_err = Some(Box::new(f));
        self
    }

    /// Provides a binary file read.
    pub fn with_read(mut self, f: impl Fn(&Path) -> std::io::Result<Vec<u8>> + 'static) -> Self {
        self.read = Some(Box::new(f));
        self
    }

    /// Provides `drainJobQueue`.
    pub fn with_drain_job_queue(mut self) -> Self {
        self.drain_job_queue = true;
        self
    }

    /// Provides `quit`.
    pub fn with_quit(mut self, f: impl Fn(i32) + 'static) -> Self {
        self.quit = Some(Box::new(f));
        self
    }

    /// Provides `scriptArgs`.
    pub fn with_script_args(mut self, args: Vec<String>) -> Self {
        self.script_args = Some(args);
        self
    }

    /// Normalized argument vector: `scriptArgs` without a leading `--`.
    ///
    /// Some engines only stop treating arguments as files after `--`, others
    /// pass it through verbatim.
    pub fn normalized_args(&self) -> Vec<String> {
        let mut args = self.script_args.clone().unwrap_or_default();
        if args.first().map(String::as_str) == Some("--") {
            args.remove(0);
        }
        args
    }
}

impl fmt::Debug for ShellPrimitives {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShellPrimitives")
            .field("print", &self.print.is_some())
            .field("print_err", &self.print_err.is_some())
            .field("read", &self.read.is_some())
            .field("drain_job_queue", &self.drain_job_queue)
            .field("quit", &self.quit.is_some())
            .field("script_args", &self.script_args)
            .finish()
    }
}

/// Host built from a shell's primitives.
pub struct ShellHost {
    primitives: ShellPrimitives,
    timer: DateTimer,
}

impl ShellHost {
    /// Wraps the available primitives.
    pub fn new(primitives: ShellPrimitives) -> Self {
        Self {
            primitives,
            timer: DateTimer::new(),
        }
    }
}

impl Host for ShellHost {
    fn kind(&self) -> HostKind {
        HostKind::Shell
    }

    fn print(&self, line: &str) {
        match &self.primitives.print {
            Some(print) => print(line),
            None => {
                let _ = writeln!(std::io::stdout().lock(), "{}", line);
            }
        }
    }

    fn print_err(&self, line: &str) {
        match &self.primitives.print_err {
            Some(print_err) => print_err(line),
            None => self.print(line),
        }
    }

    fn read_binary_file(&self, path: &Path) -> HarnessResult<Vec<u8>> {
        let read = self
            .primitives
            .read
            .as_ref()
            .ok_or(HarnessError::CapabilityUnavailable("readBinaryFile"))?;
        read(path).map_err(|source| HarnessError::FileRead {
            path: path.to_path_buf(),
            source,
        })
    }

    fn drive<'a>(&self, work: LocalBoxFuture<'a, HarnessResult<()>>) -> HarnessResult<()> {
        if !self.primitives.drain_job_queue {
            // Work that settles on its first poll needs no job queue.
            return work
                .now_or_never()
                .unwrap_or(Err(HarnessError::CapabilityUnavailable("waitFor")));
        }
        let mut jobs = LocalPool::new();
        jobs.run_until(work)
    }

    fn timer(&self) -> &dyn Timer {
        &self.timer
    }

    fn quit(&self, code: i32) -> ! {
        if let Some(quit) = &self.primitives.quit {
            quit(code);
        }
        std::process::exit(code)
    }
}

impl fmt::Debug for ShellHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShellHost")
            .field("primitives", &self.primitives)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn(&str) + 'static) {
        let lines = Rc::new(RefCell::new(Vec::new()));
        let sink = lines.clone();
        (lines, move |line: &str| sink.borrow_mut().push(line.to_string()))
    }

    #[test]
    fn test_print_err_falls_back_to_print() {
        let (lines, print) = recorder();
        let host = ShellHost::new(ShellPrimitives::new().with_print(print));

        host.print("out");
        host.print_err("err");
        assert_eq!(*lines.borrow(), vec!["out".to_string(), "err".to_string()]);
    }

    #[test]
    fn test_print_err_uses_dedicated_channel() {
        let (out, print) = recorder();
        let (err, print_err) = recorder();
        let host = ShellHost::new(
            ShellPrimitives::new()
                .with_print(print)
                .with_print_err(print_err),
        );

        host.print_err("oops");
        assert!(out.borrow().is_empty());
        assert_eq!(*err.borrow(), vec!["oops".to_string()]);
    }

    #[test]
    fn test_missing_read_fails_at_use() {
        let host = ShellHost::new(ShellPrimitives::new());
        let err = host.read_binary_file(Path::new("x.bin")).unwrap_err();
        assert_eq!(err.to_string(), "no readBinaryFile() available");
    }

    #[test]
    fn test_missing_drain_fails_only_for_pending_work() {
        let host = ShellHost::new(ShellPrimitives::new());
        let err = host
            .drive(Box::pin(async {
                futures::future::pending::<()>().await;
                Ok(())
            }))
            .unwrap_err();
        assert!(matches!(err, HarnessError::CapabilityUnavailable("waitFor")));
    }

    #[test]
    fn test_missing_drain_runs_ready_work() {
        let host = ShellHost::new(ShellPrimitives::new());
        let mut ran = false;
        host.drive(Box::pin(async {
            ran = true;
            Ok(())
        }))
        .unwrap();
        assert!(ran);

        let err = host
            .drive(Box::pin(async { Err(HarnessError::CapabilityUnavailable("readBinaryFile")) }))
            .unwrap_err();
        assert!(matches!(err, HarnessError::CapabilityUnavailable("readBinaryFile")));
    }

    #[test]
    fn test_drain_runs_jobs() {
        let host = ShellHost::new(ShellPrimitives::new().with_drain_job_queue());
        let mut ran = false;
        host.drive(Box::pin(async {
            futures::future::ready(()).await;
            ran = true;
            Ok(())
        }))
        .unwrap();
        assert!(ran);
    }

    #[test]
    fn test_leading_double_dash_is_dropped() {
        let primitives = ShellPrimitives::new().with_script_args(vec![
            "--".to_string(),
            "run".to_string(),
            "small".to_string(),
        ]);
        assert_eq!(primitives.normalized_args(), vec!["run", "small"]);
    }

    #[test]
    fn test_missing_script_args_is_empty() {
        assert!(ShellPrimitives::new().normalized_args().is_empty());
    }
}
