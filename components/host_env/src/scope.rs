//! Per-run file scoping.
//!
//! A benchmark unit reads its data files relative to its own directory. The
//! directory is carried by an immutable [`LoadContext`] built for each run and
//! passed explicitly to the loader and the entry point, never stored on the
//! shared environment.

use crate::host::HostEnvironment;
use core_types::HarnessResult;
use std::path::{Path, PathBuf};

/// Prefix applied to relative file reads during one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadContext {
    read_file_prefix: PathBuf,
}

impl LoadContext {
    /// Scope reads to `prefix`.
    pub fn new(prefix: impl Into<PathBuf>) -> Self {
        Self {
            read_file_prefix: prefix.into(),
        }
    }

    /// The prefix itself.
    pub fn prefix(&self) -> &Path {
        &self.read_file_prefix
    }

    /// Resolves `name` against the prefix. Absolute names are left alone.
    pub fn resolve(&self, name: &str) -> PathBuf {
        self.read_file_prefix.join(name)
    }
}

/// The environment as seen by one benchmark run.
#[derive(Debug, Clone, Copy)]
pub struct ScopedEnv<'a> {
    /// Shared host environment
    pub host: &'a HostEnvironment,
    /// Scope of this run
    pub scope: &'a LoadContext,
}

impl<'a> ScopedEnv<'a> {
    /// Pairs the environment with a run scope.
    pub fn new(host: &'a HostEnvironment, scope: &'a LoadContext) -> Self {
        Self { host, scope }
    }

    /// Reads `name` from the run's directory.
    pub fn read_binary_file(&self, name: &str) -> HarnessResult<Vec<u8>> {
        self.host.read_binary_file(self.scope, name)
    }

    /// Writes one line to standard output.
    pub fn print(&self, line: &str) {
        self.host.print(line);
    }
}
