//! Parsed option values.

use serde::Serialize;

/// The value recorded for one option.
///
/// Serializes untagged: flags and single values as strings, multiple values
/// as a list.
///
/// # Examples
///
/// ```
/// use protoargs_core::OptionValue;
///
/// let flag = OptionValue::Flag("-v".into());
/// assert!(flag.is_flag());
/// assert_eq!(flag.as_str(), Some("-v"));
///
/// let many = OptionValue::Multiple(vec!["a".into(), "b".into()]);
/// assert_eq!(many.as_str(), None);
/// assert_eq!(many.values(), ["a", "b"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// A non-valued option was present; holds the label that matched.
    Flag(String),
    /// A valued, non-multiple option.
    Single(String),
    /// A multiple option; values are unique and in arrival order.
    Multiple(Vec<String>),
}

impl OptionValue {
    /// Returns the string for flags and single values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Flag(s) | OptionValue::Single(s) => Some(s),
            OptionValue::Multiple(_) => None,
        }
    }

    /// Returns every value as a slice; flags and single values yield one.
    pub fn values(&self) -> &[String] {
        match self {
            OptionValue::Flag(s) | OptionValue::Single(s) => std::slice::from_ref(s),
            OptionValue::Multiple(values) => values,
        }
    }

    pub fn is_flag(&self) -> bool {
        matches!(self, OptionValue::Flag(_))
    }

    /// Appends `values` to this one, skipping any already present.
    ///
    /// Flags and single values are promoted to [`OptionValue::Multiple`].
    pub fn merge(self, values: impl IntoIterator<Item = String>) -> Self {
        let mut merged = match self {
            OptionValue::Flag(s) | OptionValue::Single(s) => vec![s],
            OptionValue::Multiple(existing) => existing,
        };
        for value in values {
            if !merged.contains(&value) {
                merged.push(value);
            }
        }
        OptionValue::Multiple(merged)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Single(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Single(value)
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(values: Vec<String>) -> Self {
        OptionValue::Multiple(values)
    }
}
