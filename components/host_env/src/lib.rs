//! Host environment abstraction for the benchmark harness.
//!
//! Hosts disagree on how to print, read files, pass arguments, wait for async
//! work, measure time and exit. This crate detects which host is running and
//! produces a single [`HostEnvironment`] that exposes all of them uniformly.
//!
//! # Overview
//!
//! - [`detect`] - Ordered host detection from a [`HostProbe`]
//! - [`Host`] - Capability provider trait, one implementation per host
//! - [`Timer`] - Host clock normalized to [`std::time::Duration`]
//! - [`LoadContext`] - Per-run file scope threaded into loaders
//!
//! # Examples
//!
//! ```
//! use host_env::{detect, HostKind, HostProbe, ShellPrimitives};
//!
//! let shell = ShellPrimitives::new()
//!     .with_script_args(vec!["--".into(), "list".into(), "small".into()]);
//! let env = detect(HostProbe::new("runner").with_shell(shell));
//!
//! assert_eq!(env.kind(), HostKind::Shell);
//! assert_eq!(env.args(), ["list", "small"]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod browser;
pub mod detect;
pub mod host;
pub mod process;
pub mod scope;
pub mod shell;
pub mod timer;

pub use browser::{BrowserContext, BrowserHost, OutputWidget};
pub use detect::{detect, detect_kind, HostProbe};
pub use host::{Host, HostEnvironment, HostKind};
pub use process::ProcessHost;
pub use scope::{LoadContext, ScopedEnv};
pub use shell::{ShellHost, ShellPrimitives};
pub use timer::{DateTimer, HrTimer, PerformanceTimer, Timer, Timestamp};
