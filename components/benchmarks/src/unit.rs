//! Benchmark unit contract.
//!
//! A unit is loaded once per run by a [`UnitLoader`] and exposes named entry
//! points. Loading and calling are both asynchronous; only the call is timed.

use core_types::{HarnessError, HarnessResult, Value};
use futures::future::LocalBoxFuture;
use host_env::ScopedEnv;

/// A loaded benchmark unit.
pub trait BenchmarkUnit {
    /// Names of the callable entry points.
    fn entry_points(&self) -> Vec<String>;

    /// Calls `entry` with `args` and resolves to its result.
    fn call<'a>(
        &'a self,
        entry: &'a str,
        env: ScopedEnv<'a>,
        args: &'a [Value],
    ) -> LocalBoxFuture<'a, HarnessResult<Value>>;
}

/// Produces a unit from the run's directory.
pub trait UnitLoader: Send + Sync {
    /// Loads the unit, reading any files through `env`.
    fn load<'a>(&'a self, env: ScopedEnv<'a>)
        -> LocalBoxFuture<'a, HarnessResult<Box<dyn BenchmarkUnit>>>;
}

/// Error for a call to an entry point the unit does not export.
pub fn missing_entry_point(unit: &dyn BenchmarkUnit, entry: &str) -> HarnessError {
    let mut available = unit.entry_points();
    available.sort();
    HarnessError::workload(format!(
        "unit has no entry point '{}' (exports: {})",
        entry,
        available.join(", ")
    ))
}
