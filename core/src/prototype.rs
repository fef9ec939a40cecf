//! Typed option prototypes.
//!
//! An [`OptionPrototype`] is the validated form of one option declaration.
//! Build one directly with the constructor and builder methods, or coerce a
//! loose [`Properties`] bag with [`OptionPrototype::from_properties`].

use crate::error::{OptionsError, Result};
use crate::{OptionValue, Properties, Property, PropertyValue};

/// Title used when a prototype does not set `helpTitle`.
pub const DEFAULT_HELP_TITLE: &str = "{{labels}}";

/// Declarative definition of one recognized option.
///
/// # Examples
///
/// ```
/// use protoargs_core::OptionPrototype;
///
/// let verbose = OptionPrototype::flag(["-v", "--verbose"]).with_help("Print more output");
/// assert!(!verbose.valued);
/// assert!(verbose.matches("-v"));
///
/// let color = OptionPrototype::with_value(["--color", "--color="])
///     .with_valid_values(["red", "blue"])
///     .required();
/// assert!(color.valued && color.required);
/// assert!(color.accepts("red"));
/// assert!(!color.accepts("green"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionPrototype {
    /// Tokens that resolve to this option. Empty means "the option name".
    pub labels: Vec<String>,
    /// Group used to filter help output.
    pub help_group: String,
    /// First line of the option's help block.
    pub help_title: String,
    /// Help body lines.
    pub help: Vec<String>,
    /// Parsing fails if the option is absent and has no default.
    pub required: bool,
    /// The option consumes following token(s) as values.
    pub valued: bool,
    /// Repeats and extra values accumulate instead of failing.
    pub multiple: bool,
    /// When non-empty, every value must be one of these.
    pub valid_values: Vec<String>,
    /// Applied after parsing if the option never appeared.
    pub default: Option<OptionValue>,
    /// Parsing stops right after this option is matched.
    pub stop_here: bool,
}

impl Default for OptionPrototype {
    fn default() -> Self {
        Self {
            labels: Vec::new(),
            help_group: String::new(),
            help_title: DEFAULT_HELP_TITLE.to_string(),
            help: Vec::new(),
            required: false,
            valued: false,
            multiple: false,
            valid_values: Vec::new(),
            default: None,
            stop_here: false,
        }
    }
}

impl OptionPrototype {
    /// Creates a presence-only option matched by `labels`.
    pub fn flag<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::default().with_labels(labels)
    }

    /// Creates an option that consumes a value, matched by `labels`.
    pub fn with_value<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            valued: true,
            ..Self::flag(labels)
        }
    }

    /// Replaces the labels. Duplicates are dropped, first spelling wins.
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = unique(labels.into_iter().map(Into::into));
        self
    }

    /// Appends a help line.
    pub fn with_help(mut self, line: &str) -> Self {
        self.help.push(line.to_string());
        self
    }

    pub fn with_help_title(mut self, title: &str) -> Self {
        self.help_title = title.to_string();
        self
    }

    pub fn with_help_group(mut self, group: &str) -> Self {
        self.help_group = group.to_string();
        self
    }

    /// Restricts accepted values.
    pub fn with_valid_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.valid_values = unique(values.into_iter().map(Into::into));
        self
    }

    pub fn with_default(mut self, value: impl Into<OptionValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Marks the option as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks the option as accumulating repeats and extra values.
    pub fn allow_multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    /// Makes parsing stop once this option is matched.
    pub fn stop_here(mut self) -> Self {
        self.stop_here = true;
        self
    }

    /// Checks whether `token` is one of this option's labels (exact match).
    pub fn matches(&self, token: &str) -> bool {
        self.labels.iter().any(|label| label == token)
    }

    /// Checks `value` against the valid values; anything goes when unset.
    pub fn accepts(&self, value: &str) -> bool {
        self.valid_values.is_empty() || self.valid_values.iter().any(|v| v == value)
    }

    /// Coerces a loose property bag into a prototype for `option`.
    ///
    /// Labels default to the option name. `labels` and `validValues` accept a
    /// list or a `|`-separated string, `help` a list or a newline-separated
    /// string; the boolean properties accept anything
    /// [`PropertyValue::as_bool`] understands.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::InvalidProperty`] for unknown keys and
    /// [`OptionsError::InvalidPropertyValue`] for values of the wrong shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use protoargs_core::{OptionPrototype, OptionsError, Properties};
    ///
    /// let props = Properties::new()
    ///     .set("labels", "--level|-l")
    ///     .set("valued", "TRUE")
    ///     .set("validValues", vec!["low", "high"]);
    /// let level = OptionPrototype::from_properties("level", &props).unwrap();
    /// assert_eq!(level.labels, ["--level", "-l"]);
    /// assert!(level.valued);
    ///
    /// let bad = Properties::new().set("multiple", "sometimes");
    /// assert!(matches!(
    ///     OptionPrototype::from_properties("level", &bad),
    ///     Err(OptionsError::InvalidPropertyValue { .. })
    /// ));
    /// ```
    pub fn from_properties(option: &str, properties: &Properties) -> Result<Self> {
        let mut prototype = Self {
            labels: vec![option.to_string()],
            ..Self::default()
        };

        for (key, value) in properties.iter() {
            let property =
                Property::from_name(key).ok_or_else(|| OptionsError::invalid_property(key, option))?;
            let invalid = || OptionsError::invalid_property_value(value, key, option);

            match property {
                Property::Labels => {
                    prototype.labels = unique(value.as_list('|').ok_or_else(invalid)?);
                }
                Property::ValidValues => {
                    prototype.valid_values = unique(value.as_list('|').ok_or_else(invalid)?);
                }
                Property::Help => {
                    prototype.help = value.as_list('\n').ok_or_else(invalid)?;
                }
                Property::HelpGroup => {
                    prototype.help_group = value.as_text().ok_or_else(invalid)?.to_string();
                }
                Property::HelpTitle => {
                    prototype.help_title = value.as_text().ok_or_else(invalid)?.to_string();
                }
                Property::Required => prototype.required = value.as_bool().ok_or_else(invalid)?,
                Property::Valued => prototype.valued = value.as_bool().ok_or_else(invalid)?,
                Property::Multiple => prototype.multiple = value.as_bool().ok_or_else(invalid)?,
                Property::StopHere => prototype.stop_here = value.as_bool().ok_or_else(invalid)?,
                Property::Default => prototype.default = default_value(value).ok_or_else(invalid)?,
            }
        }

        Ok(prototype)
    }
}

/// `Some(None)` for null, `None` when the shape cannot be a default.
fn default_value(value: &PropertyValue) -> Option<Option<OptionValue>> {
    match value {
        PropertyValue::Null => Some(None),
        PropertyValue::List(_) => value
            .as_list('|')
            .map(|values| Some(OptionValue::Multiple(unique(values)))),
        PropertyValue::Table(_) => None,
        scalar => scalar.as_scalar().map(|s| Some(OptionValue::Single(s))),
    }
}

fn unique(values: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}
