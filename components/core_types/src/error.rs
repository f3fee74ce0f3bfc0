//! Harness error taxonomy.
//!
//! Every failure the harness can report is one of the [`HarnessError`]
//! variants. None of them is retried: a wrong result is always fatal to the
//! run that produced it.

use crate::Value;
use std::path::PathBuf;
use thiserror::Error;

/// Boxed error produced by a workload.
pub type WorkloadError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while dispatching, loading, running or verifying benchmarks.
///
/// # Examples
///
/// ```
/// use core_types::{HarnessError, Value};
///
/// let error = HarnessError::UnexpectedResult {
///     subject: "schism-eval-fib".to_string(),
///     actual: Value::Smi(1),
///     expected: Value::Smi(6765),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Unexpected result from schism-eval-fib: 1 (expected 6765)"
/// );
/// ```
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Malformed command line, unknown size class or unknown benchmark id.
    #[error("{summary}")]
    Usage {
        /// First diagnostic line
        summary: String,
        /// Follow-up lines (usage text, available alternatives)
        guidance: Vec<String>,
    },

    /// A workload produced a value or output hash other than the registered one.
    #[error("Unexpected result from {subject}: {actual} (expected {expected})")]
    UnexpectedResult {
        /// What produced the result: a benchmark id or an operation/buffer pair
        subject: String,
        /// Observed value
        actual: Value,
        /// Registered value
        expected: Value,
    },

    /// The host does not provide a primitive that was just used.
    #[error("no {0}() available")]
    CapabilityUnavailable(&'static str),

    /// A workload failed on its own terms.
    #[error("{message}")]
    WorkloadFailure {
        /// Description of the failure
        message: String,
        /// Underlying cause, if any
        #[source]
        source: Option<WorkloadError>,
    },

    /// Reading a file through the host failed.
    #[error("cannot read '{}'", path.display())]
    FileRead {
        /// Resolved path of the file
        path: PathBuf,
        /// I/O error reported by the host
        #[source]
        source: std::io::Error,
    },

    /// A benchmark run failed; the cause is kept as the error source.
    #[error("Benchmark {id}/{size} failed")]
    BenchmarkFailed {
        /// Benchmark id
        id: String,
        /// Size class name
        size: String,
        /// What went wrong
        #[source]
        source: Box<HarnessError>,
    },

    /// Two benchmarks were registered under the same id and size class.
    #[error("benchmark '{id}' is already registered for size '{size}'")]
    DuplicateBenchmark {
        /// Size class name
        size: String,
        /// Benchmark id
        id: String,
    },
}

impl HarnessError {
    /// Usage error with a single line of text.
    pub fn usage(summary: impl Into<String>) -> Self {
        HarnessError::Usage {
            summary: summary.into(),
            guidance: Vec::new(),
        }
    }

    /// Workload failure without an underlying cause.
    pub fn workload(message: impl Into<String>) -> Self {
        HarnessError::WorkloadFailure {
            message: message.into(),
            source: None,
        }
    }

    /// Workload failure caused by another error.
    pub fn workload_with(message: impl Into<String>, source: impl Into<WorkloadError>) -> Self {
        HarnessError::WorkloadFailure {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns the messages of every error in the source chain, outermost excluded.
    pub fn causes(&self) -> Vec<String> {
        let mut causes = Vec::new();
        let mut current = std::error::Error::source(self);
        while let Some(cause) = current {
            causes.push(cause.to_string());
            current = cause.source();
        }
        causes
    }
}

/// Result type for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;
