//! Command-line arguments

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Host to run under when detection should be overridden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HostChoice {
    /// stdout/stderr, filesystem reads, high-resolution clock
    Process,
    /// Shell primitives wired to this process, millisecond clock
    Shell,
}

/// Cross-host benchmark harness
///
/// Everything after the global options is handed to the command dispatcher
/// untouched, including `--help` and `-h`.
#[derive(Debug, Parser)]
#[command(name = "hostbench", disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// Directory containing the benchmark unit directories
    ///
    /// Defaults to the suites of the build tree, then to `suites` next to the
    /// executable.
    #[arg(long, env = "HOSTBENCH_SUITES", value_name = "DIR")]
    pub suites: Option<PathBuf>,

    /// Force a host instead of detecting one
    #[arg(long, value_enum, value_name = "HOST")]
    pub host: Option<HostChoice>,

    /// Log filter (tracing `EnvFilter` syntax)
    #[arg(long, env = "HOSTBENCH_LOG", value_name = "FILTER")]
    pub log: Option<String>,

    /// Command and its arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

/// Image-kernel performance suite
#[derive(Debug, Parser)]
#[command(name = "hostbench-perf")]
pub struct PerfCli {
    /// Timed trials per operation
    #[arg(long, default_value_t = benchmarks::perf::SAMPLES)]
    pub samples: usize,

    /// Force a host instead of detecting one
    #[arg(long, value_enum, value_name = "HOST")]
    pub host: Option<HostChoice>,

    /// Log filter (tracing `EnvFilter` syntax)
    #[arg(long, env = "HOSTBENCH_LOG", value_name = "FILTER")]
    pub log: Option<String>,

    /// Size class; anything unknown runs `small`
    #[arg(value_name = "SIZE")]
    pub size: Option<String>,
}
