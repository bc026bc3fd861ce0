//! Ordered, dual-keyed collection of [`Param`]s.
//!
//! Parameters are held in construction order, which is also the order in
//! which they serialize onto the command line. Every param is reachable
//! by its primary name and, for options, by its alias; both resolve to
//! the same underlying object.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::trace;

use crate::error::ShelloutError;
use crate::param::Param;
use crate::value::Value;

/// An ordered, duplicate-free collection of [`Param`]s keyed by both
/// name and alias.
///
/// # Examples
///
/// ```
/// use shellout::{Param, Parameters, Value};
///
/// let mut params = Parameters::new([
///     Param::option("-f")?.with_help("force overwriting"),
///     Param::positional("input").with_help("input cm file"),
/// ])?;
///
/// params.set("f", Value::Bool(true))?;
/// params.set("input", Value::from("riboswitch.cm"))?;
/// assert_eq!(params.to_tokens(), ["-f", "riboswitch.cm"]);
/// # Ok::<(), shellout::ShelloutError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    params: IndexMap<String, Param>,
    aliases: HashMap<String, String>,
}

impl Parameters {
    /// Builds a collection from params in serialization order.
    ///
    /// The collection takes ownership; callers that want to keep their
    /// own copy clone before handing params over.
    ///
    /// # Errors
    ///
    /// Returns [`ShelloutError::DuplicateKey`] when two params share a
    /// name, or [`ShelloutError::InvalidAlias`] when an alias collides
    /// with an existing name or alias (or a name with an existing alias).
    pub fn new(params: impl IntoIterator<Item = Param>) -> Result<Self, ShelloutError> {
        let mut collected = Self::default();
        for param in params {
            collected.insert(param)?;
        }
        Ok(collected)
    }

    fn insert(&mut self, param: Param) -> Result<(), ShelloutError> {
        let name = param.name().to_owned();
        if self.params.contains_key(&name) {
            return Err(ShelloutError::DuplicateKey { name });
        }
        if self.aliases.contains_key(&name) {
            // A name shadowing an earlier alias would make that alias
            // ambiguous.
            return Err(ShelloutError::InvalidAlias { alias: name });
        }
        if let Some(alias) = param.alias() {
            let collides = alias != name
                && (self.params.contains_key(alias) || self.aliases.contains_key(alias));
            if collides {
                return Err(ShelloutError::InvalidAlias {
                    alias: alias.to_owned(),
                });
            }
            self.aliases.insert(alias.to_owned(), name.clone());
        }
        self.params.insert(name, param);
        Ok(())
    }

    fn index_of(&self, key: &str) -> Option<usize> {
        self.params.get_index_of(key).or_else(|| {
            self.aliases
                .get(key)
                .and_then(|name| self.params.get_index_of(name))
        })
    }

    /// Whether `key` matches any name or alias.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.index_of(key).is_some()
    }

    /// Resolves `key` against names first, then aliases.
    ///
    /// # Errors
    ///
    /// Returns [`ShelloutError::UnknownKey`] when `key` matches neither.
    pub fn get(&self, key: &str) -> Result<&Param, ShelloutError> {
        self.index_of(key)
            .and_then(|i| self.params.get_index(i))
            .map(|(_, param)| param)
            .ok_or_else(|| ShelloutError::UnknownKey {
                key: key.to_owned(),
            })
    }

    /// Mutable variant of [`get`](Self::get).
    ///
    /// # Errors
    ///
    /// Returns [`ShelloutError::UnknownKey`] when `key` matches neither a
    /// name nor an alias.
    pub fn get_mut(&mut self, key: &str) -> Result<&mut Param, ShelloutError> {
        let index = self.index_of(key).ok_or_else(|| ShelloutError::UnknownKey {
            key: key.to_owned(),
        })?;
        self.params
            .get_index_mut(index)
            .map(|(_, param)| param)
            .ok_or_else(|| ShelloutError::UnknownKey {
                key: key.to_owned(),
            })
    }

    /// Resolves `key` and assigns `value` to the param it names.
    ///
    /// # Errors
    ///
    /// Returns [`ShelloutError::UnknownKey`] for an unresolved key and
    /// propagates [`ShelloutError::InvalidValue`] from the param's
    /// validator.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<(), ShelloutError> {
        self.get_mut(key)?.on(value)?;
        Ok(())
    }

    /// Applies [`set`](Self::set) for each entry in iteration order.
    ///
    /// Entries are applied independently: the batch stops at the first
    /// failing entry and earlier successful assignments are *not* rolled
    /// back.
    ///
    /// # Errors
    ///
    /// Returns the first [`ShelloutError::UnknownKey`] or
    /// [`ShelloutError::InvalidValue`] encountered.
    pub fn update<I, K, V>(&mut self, entries: I) -> Result<(), ShelloutError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (key, value) in entries {
            self.set(key.as_ref(), value)?;
        }
        Ok(())
    }

    /// Turns every param off, regardless of current state.
    pub fn turn_off_all(&mut self) {
        trace!("all parameters cleared");
        for param in self.params.values_mut() {
            param.off();
        }
    }

    /// Number of params.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Params in construction (= serialization) order.
    pub fn iter(&self) -> impl Iterator<Item = &Param> {
        self.params.values()
    }

    /// Primary names in construction order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    /// Concatenated [`Param::to_tokens`] output of every param, in
    /// construction order.
    #[must_use]
    pub fn to_tokens(&self) -> Vec<String> {
        self.iter().flat_map(Param::to_tokens).collect()
    }
}

/// Renders the serialized form of every on parameter, joined by single
/// spaces; an all-off collection renders as the empty string.
impl std::fmt::Display for Parameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_tokens().join(" "))
    }
}

impl<'a> IntoIterator for &'a Parameters {
    type Item = &'a Param;
    type IntoIter = indexmap::map::Values<'a, String, Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.values()
    }
}
