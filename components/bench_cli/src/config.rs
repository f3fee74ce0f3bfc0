//! Harness configuration resolved from the command line and environment.

use crate::cli::{Cli, HostChoice};
use benchmarks::DEFAULT_SUITE_ROOT;
use host_env::HostProbe;
use std::path::{Path, PathBuf};

/// Settings for one harness process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Directory the benchmark unit directories live in
    pub suite_root: PathBuf,
    /// Forced host, if any
    pub host: Option<HostChoice>,
    /// Log filter expression, if any
    pub log_filter: Option<String>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            suite_root: locate_suite_root(std::env::current_exe().ok().as_deref()),
            host: None,
            log_filter: None,
        }
    }
}

/// Suite root used when none is configured.
///
/// The build tree's suites win while they exist. An installed binary falls
/// back to a `suites` directory next to the executable.
pub fn locate_suite_root(exe: Option<&Path>) -> PathBuf {
    pick_suite_root(PathBuf::from(DEFAULT_SUITE_ROOT), exe)
}

fn pick_suite_root(built: PathBuf, exe: Option<&Path>) -> PathBuf {
    if built.is_dir() {
        return built;
    }
    match exe.and_then(Path::parent).map(|dir| dir.join("suites")) {
        Some(beside) if beside.is_dir() => {
            tracing::debug!(root = %beside.display(), "using suites next to the executable");
            beside
        }
        _ => built,
    }
}

impl HarnessConfig {
    /// Configuration from parsed arguments; unset options keep their defaults.
    pub fn from_cli(cli: &Cli) -> Self {
        let defaults = Self::default();
        Self {
            suite_root: cli.suites.clone().unwrap_or(defaults.suite_root),
            host: cli.host,
            log_filter: cli.log.clone(),
        }
    }

    /// Probe for host detection, carrying `args` as the command line.
    pub fn probe(&self, program: &str, args: Vec<String>) -> HostProbe {
        host_probe(self.host, program, args)
    }
}

/// Probe for `choice`; no choice means this process.
pub fn host_probe(choice: Option<HostChoice>, program: &str, args: Vec<String>) -> HostProbe {
    match choice {
        Some(HostChoice::Shell) => HostProbe::native_shell(program, args),
        Some(HostChoice::Process) | None => HostProbe::from_process(program, args),
    }
}
