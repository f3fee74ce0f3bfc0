//! The normalized host environment.
//!
//! A [`Host`] is one capability provider (process runtime, shell, page).
//! [`HostEnvironment`] wraps the selected provider together with the
//! normalized argument vector and is the only thing the rest of the harness
//! talks to.

use crate::scope::LoadContext;
use crate::timer::Timer;
use core_types::HarnessResult;
use futures::future::LocalBoxFuture;
use std::fmt;
use std::future::Future;
use std::path::Path;

/// Which kind of host is running the harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostKind {
    /// A page with an output widget
    Browser,
    /// A process runtime with argv and a high-resolution clock
    Process,
    /// A bare script-engine shell
    Shell,
}

impl HostKind {
    /// Lowercase name of the host kind.
    pub fn as_str(self) -> &'static str {
        match self {
            HostKind::Browser => "browser",
            HostKind::Process => "process",
            HostKind::Shell => "shell",
        }
    }
}

impl fmt::Display for HostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capabilities every host implementation provides.
///
/// A host that lacks a primitive still implements the method and fails with
/// [`core_types::HarnessError::CapabilityUnavailable`] when it is called.
pub trait Host {
    /// Kind of host.
    fn kind(&self) -> HostKind;

    /// Writes one line to standard output.
    fn print(&self, line: &str);

    /// Writes one line to the error channel.
    fn print_err(&self, line: &str);

    /// Reads a whole file as bytes.
    fn read_binary_file(&self, path: &Path) -> HarnessResult<Vec<u8>>;

    /// Drives `work` to completion, keeping the host alive until it finishes.
    fn drive<'a>(&self, work: LocalBoxFuture<'a, HarnessResult<()>>) -> HarnessResult<()>;

    /// The host clock.
    fn timer(&self) -> &dyn Timer;

    /// Terminates with `code`. Never returns.
    fn quit(&self, code: i32) -> !;
}

/// The single environment instance of a harness process.
pub struct HostEnvironment {
    program: String,
    args: Vec<String>,
    host: Box<dyn Host>,
}

impl HostEnvironment {
    /// Wraps a host provider with its normalized argument vector.
    pub fn new(program: impl Into<String>, args: Vec<String>, host: Box<dyn Host>) -> Self {
        Self {
            program: program.into(),
            args,
            host,
        }
    }

    /// Program name used in usage text.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Normalized argument vector.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Kind of the selected host.
    pub fn kind(&self) -> HostKind {
        self.host.kind()
    }

    /// Writes one line to standard output.
    pub fn print(&self, line: &str) {
        self.host.print(line);
    }

    /// Writes one line to the error channel.
    pub fn print_err(&self, line: &str) {
        self.host.print_err(line);
    }

    /// Reads `name` relative to the scope of the current run.
    pub fn read_binary_file(&self, scope: &LoadContext, name: &str) -> HarnessResult<Vec<u8>> {
        let path = scope.resolve(name);
        tracing::trace!(path = %path.display(), "reading file");
        self.host.read_binary_file(&path)
    }

    /// Waits for `work` to complete.
    pub fn wait<'a, F>(&self, work: F) -> HarnessResult<()>
    where
        F: Future<Output = HarnessResult<()>> + 'a,
    {
        self.host.drive(Box::pin(work))
    }

    /// The host clock.
    pub fn timer(&self) -> &dyn Timer {
        self.host.timer()
    }

    /// Terminates the process with `code`.
    pub fn quit(&self, code: i32) -> ! {
        tracing::debug!(code, host = %self.kind(), "quitting");
        self.host.quit(code)
    }
}

impl fmt::Debug for HostEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostEnvironment")
            .field("program", &self.program)
            .field("kind", &self.kind())
            .field("args", &self.args)
            .finish()
    }
}
