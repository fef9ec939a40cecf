//! Storage for parsed option values.
//!
//! The parser only needs last-write-wins `set`, `get`, `has`, and `reset`
//! from its storage, so that contract is the [`OptionsStore`] trait.
//! [`ParsedOptions`] is the store [`CliOptions`](crate::CliOptions) uses.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::OptionValue;

/// Minimal map contract the parser writes results through.
pub trait OptionsStore {
    /// Stores `value` under `name`, replacing anything already there.
    fn set(&mut self, name: &str, value: OptionValue);

    fn get(&self, name: &str) -> Option<&OptionValue>;

    fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Forgets every stored value.
    fn reset(&mut self);
}

/// Option name to parsed value, ordered by name.
///
/// # Examples
///
/// ```
/// use protoargs_core::{OptionValue, OptionsStore, ParsedOptions};
///
/// let mut parsed = ParsedOptions::new();
/// parsed.set("color", OptionValue::from("red"));
/// assert!(parsed.has("color"));
/// assert_eq!(parsed.value_of("color"), Some("red"));
///
/// parsed.reset();
/// assert!(parsed.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParsedOptions {
    values: BTreeMap<String, OptionValue>,
}

impl ParsedOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the string of a flag or single value.
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(OptionValue::as_str)
    }

    /// Returns every value stored for `name` (empty if absent).
    pub fn values_of(&self, name: &str) -> &[String] {
        self.values
            .get(name)
            .map(OptionValue::values)
            .unwrap_or(&[])
    }

    /// Iterates `(name, value)` pairs ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl OptionsStore for ParsedOptions {
    fn set(&mut self, name: &str, value: OptionValue) {
        self.values.insert(name.to_string(), value);
    }

    fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    fn reset(&mut self) {
        self.values.clear();
    }
}
