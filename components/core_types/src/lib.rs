//! Core value and error types shared by the benchmark harness.
//!
//! # Overview
//!
//! - [`Value`] - Result of a benchmark entry point, compared strictly
//! - [`HarnessError`] - Closed set of failures the harness can report
//! - [`HarnessResult`] - Result alias used across the workspace
//!
//! # Examples
//!
//! ```
//! use core_types::{HarnessError, Value};
//!
//! let expected = Value::Smi(75025);
//! assert!(expected.strict_equals(&Value::Double(75025.0)));
//!
//! let error = HarnessError::CapabilityUnavailable("readBinaryFile");
//! assert_eq!(error.to_string(), "no readBinaryFile() available");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod value;

pub use error::{HarnessError, HarnessResult, WorkloadError};
pub use value::Value;
