//! Dynamically-typed parameter values.
//!
//! Wrapped command-line tools accept booleans (bare flags), numbers and
//! strings in no particular pattern, so a parameter's value is a small
//! closed enum rather than a generic type parameter. [`Value::to_string`]
//! produces exactly the text that ends up in the argument vector.

use std::fmt;

/// A parameter value as it will be rendered on the command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean flag state. `true` renders the bare flag; `false` turns the
    /// parameter off entirely.
    Bool(bool),
    /// Signed integer operand.
    Int(i64),
    /// Floating-point operand.
    Float(f64),
    /// String operand, rendered verbatim (no quoting is added here).
    Str(String),
}

impl Value {
    /// Returns `true` only for `Value::Bool(true)`.
    #[must_use]
    pub const fn is_true(&self) -> bool {
        matches!(self, Self::Bool(true))
    }

    /// Numeric view of the value, if it has one.
    ///
    /// Used by range validators; booleans and strings are not numbers.
    ///
    /// Converting `i64` may round for very large magnitudes, which is
    /// acceptable for range checks on tool parameters.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Bool(_) | Self::Str(_) => None,
        }
    }

    /// String view of the value, if it is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}
