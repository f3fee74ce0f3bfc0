//! Benchmark result values.
//!
//! Entry points of benchmark units return a dynamically typed [`Value`] which
//! the runner compares against the value registered for the benchmark.

use std::fmt;

/// A value produced by a benchmark entry point or passed to one as an argument.
///
/// # Examples
///
/// ```
/// use core_types::Value;
///
/// let fib = Value::Smi(6765);
/// assert!(fib.strict_equals(&Value::Double(6765.0)));
/// assert_eq!(fib.type_of(), "number");
/// assert_eq!(fib.to_string(), "6765");
/// ```
#[derive(Debug, Clone)]
pub enum Value {
    /// No value was produced
    Undefined,
    /// Explicit absence of a value
    Null,
    /// Boolean result
    Boolean(bool),
    /// Small integer (fits in 32 bits)
    Smi(i32),
    /// IEEE 754 double-precision floating point
    Double(f64),
    /// String result, e.g. a hex digest
    String(std::string::String),
}

impl Value {
    /// Strict equality as used for result verification.
    ///
    /// Numbers compare numerically regardless of representation, so
    /// `Smi(2)` equals `Double(2.0)`. `NaN` never equals anything, itself
    /// included. All other kinds compare by kind and content.
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (a, b) => match (a.as_number(), b.as_number()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            },
        }
    }

    /// Returns the numeric value of `Smi` and `Double`, `None` otherwise.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Smi(n) => Some(f64::from(*n)),
            Value::Double(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the kind of value the way `typeof` reports it.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_types::Value;
    ///
    /// assert_eq!(Value::Undefined.type_of(), "undefined");
    /// assert_eq!(Value::Null.type_of(), "object");
    /// assert_eq!(Value::from("abc").type_of(), "string");
    /// ```
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Boolean(_) => "boolean",
            Value::Smi(_) | Value::Double(_) => "number",
            Value::String(_) => "string",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.strict_equals(other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Smi(n) => write!(f, "{}", n),
            Value::Double(n) => {
                if n.is_nan() {
                    write!(f, "NaN")
                } else if n.is_infinite() {
                    if n.is_sign_positive() {
                        write!(f, "Infinity")
                    } else {
                        write!(f, "-Infinity")
                    }
                } else if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Smi(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        match i32::try_from(n) {
            Ok(small) => Value::Smi(small),
            Err(_) => Value::Double(n as f64),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Double(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<std::string::String> for Value {
    fn from(s: std::string::String) -> Self {
        Value::String(s)
    }
}
