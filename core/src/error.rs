//! Error types for prototype registration, token parsing, and spec loading.
//!
//! [`OptionsError`] covers every failure the registry and the parser can
//! report. Each variant carries the offending token, option, property, or
//! value so callers can match on structure instead of message text.
//! [`LoadError`] wraps I/O and deserialization failures that happen before a
//! spec ever reaches the registry.

use thiserror::Error;

/// Errors raised while registering prototypes or parsing tokens.
///
/// # Examples
///
/// ```
/// use protoargs_core::{CliOptions, OptionsError, Properties, PrototypeSpec};
///
/// let spec = PrototypeSpec::new().option("verbose", Properties::new().set("labels", "-v"));
/// let mut options = CliOptions::new(&spec).unwrap();
///
/// let err = options.parse(["-x"], false).unwrap_err();
/// assert_eq!(err, OptionsError::InvalidToken("-x".into()));
/// assert_eq!(err.to_string(), "Invalid token: -x.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    /// The prototype specification has no options.
    #[error("No data supplied.")]
    NoDataSupplied,

    /// An option name was registered twice.
    #[error("Already defined option: {0}.")]
    AlreadyDefinedOption(String),

    /// A non-multiple option was matched a second time.
    #[error("Already parsed option: {0}.")]
    AlreadyParsedOption(String),

    /// A `--flag=value` token was given for an option that takes no value.
    #[error("Option {0} does not accept value.")]
    OptionDoesNotAcceptValue(String),

    /// A valued option collected nothing, or a required option is missing.
    #[error("Option needs a value: {0}.")]
    OptionNeedsValue(String),

    /// A prototype used a property key outside the recognized set.
    #[error("Invalid property '{property}' in option {option}.")]
    InvalidProperty { property: String, option: String },

    /// A property value could not be coerced to the shape it requires.
    #[error("Invalid value for property '{property}' in option {option}: {value}")]
    InvalidPropertyValue {
        property: String,
        option: String,
        value: String,
    },

    /// A token did not resolve to any declared option (strict mode only).
    #[error("Invalid token: {0}.")]
    InvalidToken(String),

    /// A collected value is not one of the option's valid values.
    #[error(
        "Invalid value for option {option}: {value} (valid values: {}).",
        .valid_values.join(", ")
    )]
    InvalidValue {
        option: String,
        valid_values: Vec<String>,
        value: String,
    },
}

impl OptionsError {
    pub(crate) fn invalid_property(property: &str, option: &str) -> Self {
        Self::InvalidProperty {
            property: property.to_string(),
            option: option.to_string(),
        }
    }

    pub(crate) fn invalid_property_value(
        value: impl std::fmt::Display,
        property: &str,
        option: &str,
    ) -> Self {
        Self::InvalidPropertyValue {
            property: property.to_string(),
            option: option.to_string(),
            value: value.to_string(),
        }
    }

    pub(crate) fn invalid_value(option: &str, valid_values: &[String], value: &str) -> Self {
        Self::InvalidValue {
            option: option.to_string(),
            valid_values: valid_values.to_vec(),
            value: value.to_string(),
        }
    }
}

/// Errors that can occur while loading a prototype spec from text or disk.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The spec parsed but was rejected by the registry.
    #[error(transparent)]
    Options(#[from] OptionsError),
}

/// Convenience alias for results with [`OptionsError`].
pub type Result<T> = std::result::Result<T, OptionsError>;
