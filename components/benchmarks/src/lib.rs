//! Benchmark registry, runner and workloads for the harness
//!
//! This crate provides everything between command dispatch and the host:
//!
//! - [`registry`] - Benchmarks by size class and id
//! - [`runner`] - Loads a unit, times its entry point, verifies the result
//! - [`unit`] - The contract benchmark units implement
//! - [`scheme`] - Scheme evaluator backing Scheme-module units
//! - [`perf`] - Image-kernel sampling suite with hash verification
//!
//! # Examples
//!
//! ```rust,no_run
//! use benchmarks::{BenchmarkRegistry, BenchmarkRunner, DEFAULT_SUITE_ROOT};
//! use host_env::{detect, HostProbe};
//!
//! let env = detect(HostProbe::from_process("hostbench", vec![]));
//! let registry = BenchmarkRegistry::builtin().unwrap();
//! let runner = BenchmarkRunner::new(DEFAULT_SUITE_ROOT);
//! let fib = registry.lookup("small", "schism-eval-fib").unwrap();
//!
//! env.wait(async {
//!     let seconds = runner.run(fib, &env).await;
//!     seconds.map(|s| env.print(&format!("schism-eval-fib/small: {} seconds", s)))
//! })
//! .unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod hash;
pub mod kernels;
pub mod perf;
pub mod registry;
pub mod runner;
pub mod scheme;
pub mod stats;
pub mod unit;

pub use registry::{BenchmarkDescriptor, BenchmarkRegistry, LookupError, SizeClass, DEFAULT_SUITE_ROOT};
pub use runner::{BenchmarkRun, BenchmarkRunner};
pub use unit::{BenchmarkUnit, UnitLoader};
