//! Integration test suite for the benchmark harness
//!
//! This crate verifies that host detection, the registry, the runner and the
//! dispatcher work together across component boundaries.

/// Re-export components for test convenience
pub mod components {
    pub use bench_cli;
    pub use benchmarks;
    pub use core_types;
    pub use host_env;
}
