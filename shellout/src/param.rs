//! A single named, validated, toggleable command-line parameter.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::error::ShelloutError;
use crate::validate::{AcceptAny, Validate};
use crate::value::Value;

/// Rust keywords, rejected as parameter aliases.
const RESERVED_WORDS: &[&str] = &[
    "as", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern", "false", "fn",
    "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref",
    "return", "self", "Self", "static", "struct", "super", "trait", "true", "type", "unsafe",
    "use", "where", "while", "async", "await", "abstract", "become", "box", "do", "final",
    "macro", "override", "priv", "try", "typeof", "unsized", "virtual", "yield",
];

/// How a parameter serializes onto the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ParamStyle {
    /// Bare operand, no flag.
    Positional,
    /// Flagged option; `delimiter` joins flag and value into one token
    /// unless it is whitespace, in which case they stay separate tokens.
    Option { delimiter: String },
}

/// A single command-line parameter.
///
/// A `Param` is either *positional* (its serialized form is just its
/// value) or an *option* (a flag such as `-e` or `--output`, optionally
/// followed by an operand). Identity — the `name`, and for options the
/// `alias` — is fixed at construction; the value is the only mutable
/// state and every assignment passes through the attached validator.
///
/// A param is *off* when its value is absent or boolean `false`; off
/// params contribute no tokens. Boolean `true` is the bare-flag value:
/// the flag itself appears with no operand.
///
/// # Examples
///
/// ```
/// use shellout::{InRange, Param};
///
/// let mut evalue = Param::option("-e")?
///     .with_validator(InRange::new(0.0, 1000.0))
///     .with_value(0.1)?;
/// assert_eq!(evalue.alias(), Some("e"));
/// assert_eq!(evalue.to_tokens(), ["-e", "0.1"]);
///
/// evalue.off();
/// assert!(evalue.to_tokens().is_empty());
/// # Ok::<(), shellout::ShelloutError>(())
/// ```
#[derive(Clone)]
pub struct Param {
    name: String,
    alias: Option<String>,
    style: ParamStyle,
    value: Option<Value>,
    validator: Arc<dyn Validate>,
    help: String,
}

impl Param {
    /// Creates a positional parameter.
    ///
    /// Positional parameters have no alias; they are addressed by `name`
    /// alone.
    #[must_use]
    pub fn positional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            style: ParamStyle::Positional,
            value: None,
            validator: Arc::new(AcceptAny),
            help: String::new(),
        }
    }

    /// Creates an option parameter, deriving the alias from the flag.
    ///
    /// The alias is the flag with its leading non-alphanumeric prefix
    /// stripped and interior `-` replaced by `_` (`--max-hits` becomes
    /// `max_hits`); a leading digit gains a `_` prefix (`-1` becomes
    /// `_1`).
    ///
    /// # Errors
    ///
    /// Returns [`ShelloutError::InvalidAlias`] when the derived alias is
    /// not a legal bare identifier.
    pub fn option(flag: impl Into<String>) -> Result<Self, ShelloutError> {
        let flag = flag.into();
        let alias = derive_alias(&flag);
        Self::option_as(flag, alias)
    }

    /// Creates an option parameter with an explicit alias.
    ///
    /// # Errors
    ///
    /// Returns [`ShelloutError::InvalidAlias`] when `alias` is not a
    /// legal bare identifier or is a reserved word.
    pub fn option_as(
        flag: impl Into<String>,
        alias: impl Into<String>,
    ) -> Result<Self, ShelloutError> {
        let alias = alias.into();
        if !is_legal_alias(&alias) {
            return Err(ShelloutError::InvalidAlias { alias });
        }
        Ok(Self {
            name: flag.into(),
            alias: Some(alias),
            style: ParamStyle::Option {
                delimiter: " ".to_owned(),
            },
            value: None,
            validator: Arc::new(AcceptAny),
            help: String::new(),
        })
    }

    /// Sets the help text.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// Sets the flag/value delimiter (options only; ignored for
    /// positional parameters).
    ///
    /// A whitespace delimiter keeps flag and value as two separate
    /// tokens; anything else joins them into one.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        if let ParamStyle::Option { delimiter: d } = &mut self.style {
            *d = delimiter.into();
        }
        self
    }

    /// Replaces the validator.
    ///
    /// Set the validator before assigning a value; it is consulted on
    /// every subsequent assignment, not retroactively.
    #[must_use]
    pub fn with_validator(mut self, validator: impl Validate + 'static) -> Self {
        self.validator = Arc::new(validator);
        self
    }

    /// Assigns an initial value during construction.
    ///
    /// # Errors
    ///
    /// Returns [`ShelloutError::InvalidValue`] when the validator rejects
    /// the value.
    pub fn with_value(mut self, value: impl Into<Value>) -> Result<Self, ShelloutError> {
        self.on(value)?;
        Ok(self)
    }

    /// The primary name (the flag text for options).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The alias, present only for option parameters.
    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// The help text.
    #[must_use]
    pub fn help(&self) -> &str {
        &self.help
    }

    /// The current value, if any.
    #[must_use]
    pub const fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Validates and stores a new value.
    ///
    /// The assignment is all-or-nothing: on rejection the previously
    /// stored value is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ShelloutError::InvalidValue`] when the validator rejects
    /// the value.
    pub fn on(&mut self, value: impl Into<Value>) -> Result<&mut Self, ShelloutError> {
        let validated =
            self.validator
                .validate(value.into())
                .map_err(|message| ShelloutError::InvalidValue {
                    param: self.name.clone(),
                    message,
                })?;
        trace!(param = %self.name, value = %validated, "parameter set");
        self.value = Some(validated);
        Ok(self)
    }

    /// Clears the value, turning the parameter off. Never fails and does
    /// not consult the validator.
    pub fn off(&mut self) -> &mut Self {
        trace!(param = %self.name, "parameter cleared");
        self.value = None;
        self
    }

    /// Whether the parameter contributes tokens to the command line.
    #[must_use]
    pub fn is_on(&self) -> bool {
        !self.is_off()
    }

    /// Whether the parameter is off: no value, or boolean `false`.
    #[must_use]
    pub fn is_off(&self) -> bool {
        match &self.value {
            None => true,
            Some(v) => *v == Value::Bool(false),
        }
    }

    /// The ordered tokens this parameter contributes to the argument
    /// vector.
    #[must_use]
    pub fn to_tokens(&self) -> Vec<String> {
        let Some(value) = self.value.as_ref().filter(|_| self.is_on()) else {
            return Vec::new();
        };
        match &self.style {
            ParamStyle::Positional => vec![value.to_string()],
            ParamStyle::Option { delimiter } => {
                if value.is_true() {
                    vec![self.name.clone()]
                } else if is_whitespace(delimiter) {
                    vec![self.name.clone(), value.to_string()]
                } else {
                    vec![format!("{}{delimiter}{value}", self.name)]
                }
            }
        }
    }
}

/// Equality covers identity (`name`, and `alias` for options) and the
/// current value; validators and help text are not compared.
impl PartialEq for Param {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.alias == other.alias && self.value == other.value
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Param")
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("style", &self.style)
            .field("value", &self.value)
            .field("help", &self.help)
            .finish_non_exhaustive()
    }
}

/// Renders the parameter as it would appear on the command line; off
/// parameters render as the empty string.
impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_tokens().join(" "))
    }
}

fn is_whitespace(s: &str) -> bool {
    !s.is_empty() && s.chars().all(char::is_whitespace)
}

fn derive_alias(flag: &str) -> String {
    let stripped = flag
        .trim()
        .trim_start_matches(|c: char| !c.is_ascii_alphanumeric() && c != '_');
    let mut alias = stripped.replace('-', "_");
    if alias.starts_with(|c: char| c.is_ascii_digit()) {
        alias.insert(0, '_');
    }
    alias
}

fn is_legal_alias(s: &str) -> bool {
    let mut chars = s.chars();
    let leading_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    leading_ok
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !RESERVED_WORDS.contains(&s)
}
