//! Command-line front end of the benchmark harness
//!
//! Provides argument parsing, configuration, logging setup and the command
//! dispatcher shared by the `hostbench` and `hostbench-perf` binaries.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod logging;

pub use cli::{Cli, HostChoice, PerfCli};
pub use config::HarnessConfig;
pub use dispatch::Harness;

/// Program name shown in usage text.
pub const PROGRAM: &str = "hostbench";
