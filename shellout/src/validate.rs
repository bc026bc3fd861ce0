//! Value validators.
//!
//! A validator is a pure function from a candidate [`Value`] to either an
//! accepted (possibly transformed) value or a rejection message. Validators
//! run on every assignment, so an illegal value can never be stored.
//!
//! The built-ins cover the common cases: [`OneOf`] for enumerated
//! choices, [`InRange`] for numeric bounds and [`ShellQuote`] for
//! embedding untrusted strings in a displayed command line. Anything else
//! can be supplied as a closure:
//!
//! ```
//! use shellout::{Validate, Value};
//!
//! let ends_with_cm = |v: Value| match v.as_str() {
//!     Some(s) if s.ends_with(".cm") => Ok(v),
//!     _ => Err("expected a .cm file".to_owned()),
//! };
//! assert!(ends_with_cm.validate(Value::from("riboswitch.cm")).is_ok());
//! ```

use crate::value::Value;

/// Validates (and may transform) a parameter value on assignment.
///
/// Implementations must be free of side effects other than rejecting: the
/// same input must always produce the same output.
pub trait Validate: Send + Sync {
    /// Checks `value`, returning the value to store or a rejection
    /// message.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message when the value is illegal. The
    /// owning [`Param`](crate::Param) wraps it in
    /// [`ShelloutError::InvalidValue`](crate::ShelloutError::InvalidValue).
    fn validate(&self, value: Value) -> Result<Value, String>;
}

impl<F> Validate for F
where
    F: Fn(Value) -> Result<Value, String> + Send + Sync,
{
    fn validate(&self, value: Value) -> Result<Value, String> {
        self(value)
    }
}

/// The default validator: accepts every value unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAny;

impl Validate for AcceptAny {
    fn validate(&self, value: Value) -> Result<Value, String> {
        Ok(value)
    }
}

/// Accepts only values drawn from a fixed set of choices.
#[derive(Debug, Clone)]
pub struct OneOf {
    choices: Vec<Value>,
}

impl OneOf {
    /// Creates a membership validator over `choices`.
    #[must_use]
    pub fn new<I, V>(choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }
}

impl Validate for OneOf {
    fn validate(&self, value: Value) -> Result<Value, String> {
        if self.choices.contains(&value) {
            Ok(value)
        } else {
            Err(format!("illegal value: {value}"))
        }
    }
}

/// Accepts numeric values strictly between two bounds.
///
/// Both bounds are exclusive: `minimum < v < maximum`. Non-numeric values
/// are rejected outright.
#[derive(Debug, Clone, Copy)]
pub struct InRange {
    minimum: f64,
    maximum: f64,
}

impl InRange {
    /// Creates an exclusive-range validator.
    #[must_use]
    pub const fn new(minimum: f64, maximum: f64) -> Self {
        Self { minimum, maximum }
    }
}

impl Validate for InRange {
    fn validate(&self, value: Value) -> Result<Value, String> {
        match value.as_f64() {
            Some(v) if self.minimum < v && v < self.maximum => Ok(value),
            Some(_) => Err(format!(
                "illegal value: {value} (expected {} < v < {})",
                self.minimum, self.maximum
            )),
            None => Err(format!("illegal value: {value} (expected a number)")),
        }
    }
}

/// Quotes string values for safe display in a POSIX shell.
///
/// The serialized argument vector is handed to the operating system
/// without shell interpretation, so quoting is never required for
/// correctness; it keeps rendered command lines copy-pasteable when a
/// value contains whitespace or shell metacharacters. Non-string values
/// pass through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellQuote;

impl Validate for ShellQuote {
    fn validate(&self, value: Value) -> Result<Value, String> {
        match value {
            Value::Str(s) => Ok(Value::Str(quote(&s))),
            other => Ok(other),
        }
    }
}

fn is_shell_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || "_@%+=:,./-".contains(c)
}

fn quote(s: &str) -> String {
    if !s.is_empty() && s.chars().all(is_shell_safe) {
        return s.to_owned();
    }
    // Single quotes preserve everything except single quotes themselves,
    // which are closed, escaped and reopened.
    format!("'{}'", s.replace('\'', "'\"'\"'"))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{AcceptAny, InRange, OneOf, ShellQuote, Validate};
    use crate::value::Value;

    #[test]
    fn accept_any_is_identity() {
        let v = Value::from("anything");
        assert_eq!(AcceptAny.validate(v.clone()), Ok(v));
    }

    #[rstest]
    #[case(Value::Int(1), true)]
    #[case(Value::Int(2), true)]
    #[case(Value::Int(5), false)]
    #[case(Value::from("1"), false)]
    fn one_of_checks_membership(#[case] value: Value, #[case] legal: bool) {
        let checker = OneOf::new([0i64, 1, 2]);
        assert_eq!(checker.validate(value.clone()).is_ok(), legal);
        if legal {
            assert_eq!(checker.validate(value.clone()), Ok(value));
        }
    }

    #[rstest]
    #[case(Value::Int(3), true)]
    #[case(Value::Float(0.1), true)]
    #[case(Value::Int(0), false)] // bounds are exclusive
    #[case(Value::Int(9), false)]
    #[case(Value::Int(11), false)]
    #[case(Value::from("3"), false)]
    fn in_range_checks_exclusive_bounds(#[case] value: Value, #[case] legal: bool) {
        let checker = InRange::new(0.0, 9.0);
        assert_eq!(checker.validate(value).is_ok(), legal);
    }

    #[rstest]
    #[case("plain.txt", "plain.txt")]
    #[case("file path", "'file path'")]
    #[case("", "''")]
    #[case("it's", "'it'\"'\"'s'")]
    fn shell_quote_strings(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(
            ShellQuote.validate(Value::from(input)),
            Ok(Value::from(expected))
        );
    }

    #[test]
    fn shell_quote_passes_non_strings_through() {
        assert_eq!(ShellQuote.validate(Value::Int(3)), Ok(Value::Int(3)));
    }

    #[test]
    fn closures_are_validators() {
        let reject_all = |_: Value| -> Result<Value, String> { Err("no".to_owned()) };
        assert!(reject_all.validate(Value::Bool(true)).is_err());
    }
}
