//! A small Scheme for evaluator-style workloads.
//!
//! Supports `define`, `lambda`, `if`, `let` (plain and named), `begin` and
//! `quote` over exact integers and booleans. Arithmetic is checked: an
//! overflow is an error, never a wrapped result.

mod eval;
pub mod reader;

pub use eval::{Interpreter, Obj};

use crate::unit::{missing_entry_point, BenchmarkUnit, UnitLoader};
use core_types::{HarnessError, HarnessResult, Value};
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use host_env::ScopedEnv;
use thiserror::Error;

/// Errors raised while reading or evaluating Scheme source.
#[derive(Debug, Error)]
pub enum SchemeError {
    /// Malformed source text.
    #[error("read error at byte {pos}: {message}")]
    Read {
        /// Byte offset of the offending token
        pos: usize,
        /// What was wrong
        message: String,
    },
    /// Reference to a name with no binding.
    #[error("unbound variable: {0}")]
    Unbound(String),
    /// Application of something that is not a procedure.
    #[error("not a procedure: {0}")]
    NotProcedure(String),
    /// Wrong number of arguments.
    #[error("wrong number of arguments: expected {expected}, got {got}")]
    Arity {
        /// Number of parameters
        expected: usize,
        /// Number of arguments supplied
        got: usize,
    },
    /// Operand of the wrong type.
    #[error("expected {expected}, got {got}")]
    Type {
        /// Expected type
        expected: &'static str,
        /// Offending value
        got: String,
    },
    /// Malformed special form.
    #[error("syntax error: {0}")]
    Syntax(String),
    /// Integer arithmetic overflowed.
    #[error("integer overflow")]
    Overflow,
}

/// Loads a Scheme source file from the run's directory.
#[derive(Debug, Clone)]
pub struct SchemeModule {
    file: String,
}

impl SchemeModule {
    /// Loader for `file`, relative to the benchmark directory.
    pub fn new(file: impl Into<String>) -> Self {
        Self { file: file.into() }
    }

    /// Evaluates `src` into a unit. Used by the loader after reading the file.
    pub fn compile(&self, src: &str) -> HarnessResult<SchemeUnit> {
        let mut interp = Interpreter::new();
        interp
            .eval_source(src)
            .map_err(|e| HarnessError::workload_with(format!("failed to load {}", self.file), e))?;
        Ok(SchemeUnit { interp })
    }
}

impl UnitLoader for SchemeModule {
    fn load<'a>(
        &'a self,
        env: ScopedEnv<'a>,
    ) -> LocalBoxFuture<'a, HarnessResult<Box<dyn BenchmarkUnit>>> {
        async move {
            let bytes = env.read_binary_file(&self.file)?;
            let src = String::from_utf8(bytes).map_err(|e| {
                HarnessError::workload_with(format!("{} is not valid UTF-8", self.file), e)
            })?;
            let unit = self.compile(&src)?;
            tracing::debug!(file = %self.file, exports = ?unit.entry_points(), "scheme module loaded");
            Ok(Box::new(unit) as Box<dyn BenchmarkUnit>)
        }
        .boxed_local()
    }
}

/// An evaluated Scheme module; its global procedures are the entry points.
pub struct SchemeUnit {
    interp: Interpreter,
}

fn to_obj(value: &Value) -> HarnessResult<Obj> {
    match value {
        Value::Smi(n) => Ok(Obj::Int(i64::from(*n))),
        Value::Double(d) if d.fract() == 0.0 && d.abs() < 9.007_199_254_740_992e15 => {
            Ok(Obj::Int(*d as i64))
        }
        Value::Boolean(b) => Ok(Obj::Bool(*b)),
        other => Err(HarnessError::workload(format!(
            "cannot pass {} to a scheme procedure",
            other.type_of()
        ))),
    }
}

fn to_value(obj: Obj) -> Value {
    match obj {
        Obj::Int(n) => Value::from(n),
        Obj::Bool(b) => Value::Boolean(b),
        Obj::Unspecified => Value::Undefined,
        other => Value::String(other.to_string()),
    }
}

impl BenchmarkUnit for SchemeUnit {
    fn entry_points(&self) -> Vec<String> {
        self.interp.global_procedures()
    }

    fn call<'a>(
        &'a self,
        entry: &'a str,
        _env: ScopedEnv<'a>,
        args: &'a [Value],
    ) -> LocalBoxFuture<'a, HarnessResult<Value>> {
        async move {
            if !self.entry_points().iter().any(|name| name == entry) {
                return Err(missing_entry_point(self, entry));
            }
            let args = args.iter().map(to_obj).collect::<HarnessResult<Vec<_>>>()?;
            let result = self
                .interp
                .call_global(entry, args)
                .map_err(|e| HarnessError::workload_with(format!("{} failed", entry), e))?;
            Ok(to_value(result))
        }
        .boxed_local()
    }
}
