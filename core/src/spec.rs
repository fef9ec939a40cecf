//! Prototype specifications: option names mapped to property bags.
//!
//! A [`PrototypeSpec`] is the loose, caller-facing description of an option
//! set. It can be assembled in code or loaded from YAML/JSON, and is turned
//! into a validated [`PrototypeRegistry`](crate::PrototypeRegistry) by
//! [`PrototypeRegistry::from_spec`](crate::PrototypeRegistry::from_spec).
//!
//! # Example YAML
//!
//! ```yaml
//! color:
//!   labels: "--color|-c"
//!   valued: true
//!   validValues: [red, blue]
//! verbose:
//!   labels: [--verbose, -v]
//!   help: "Print more output"
//! ```

use std::path::Path;

use serde::de::{self, Deserialize, Deserializer};
use tracing::debug;

use crate::error::LoadError;
use crate::{Properties, PropertyValue};

/// Ordered mapping from option name to its raw properties.
///
/// Option order is declaration order: it decides which option wins when two
/// share a label and the order options appear in help output.
///
/// # Examples
///
/// ```
/// use protoargs_core::{Properties, PrototypeSpec};
///
/// let spec = PrototypeSpec::new()
///     .option("verbose", Properties::new().set("labels", "-v|--verbose"))
///     .option("name", Properties::new().set("valued", true).set("required", true));
/// assert_eq!(spec.len(), 2);
/// assert_eq!(spec.names().collect::<Vec<_>>(), ["verbose", "name"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrototypeSpec {
    options: Vec<(String, Properties)>,
}

impl PrototypeSpec {
    /// Creates an empty spec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an option declaration.
    ///
    /// Names are not checked here; duplicates are reported when the spec is
    /// registered.
    pub fn option(mut self, name: impl Into<String>, properties: Properties) -> Self {
        self.options.push((name.into(), properties));
        self
    }

    /// Iterates `(name, properties)` in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Properties)> {
        self.options.iter().map(|(name, props)| (name.as_str(), props))
    }

    /// Iterates option names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Parses a spec from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Yaml`] if the text is not valid YAML or is not a
    /// mapping of option names to property mappings.
    pub fn from_yaml_str(text: &str) -> Result<Self, LoadError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Parses a spec from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Json`] if the text is not valid JSON or is not an
    /// object of option names to property objects.
    ///
    /// # Examples
    ///
    /// ```
    /// use protoargs_core::PrototypeSpec;
    ///
    /// let spec = PrototypeSpec::from_json_str(r#"{"quiet": {"labels": "-q"}, "name": null}"#).unwrap();
    /// assert_eq!(spec.names().collect::<Vec<_>>(), ["quiet", "name"]);
    /// ```
    pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Loads a spec file, as JSON when the extension is `.json` and as YAML
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] if the file cannot be read, or the parse
    /// error of the chosen format.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let spec = if is_json {
            Self::from_json_str(&text)?
        } else {
            Self::from_yaml_str(&text)?
        };
        debug!(path = %path.display(), options = spec.len(), "loaded prototype spec");
        Ok(spec)
    }

    fn from_value(value: PropertyValue) -> Result<Self, String> {
        let entries = match value {
            PropertyValue::Null => return Ok(Self::new()),
            PropertyValue::Table(entries) => entries,
            other => {
                return Err(format!(
                    "expected a mapping of option names to properties, found {other}"
                ));
            }
        };

        let mut spec = Self::new();
        for (name, properties) in entries {
            let properties = match properties {
                PropertyValue::Null => Properties::new(),
                PropertyValue::Table(props) => Properties::from(props),
                other => {
                    return Err(format!(
                        "option {name} must be a mapping of properties, found {other}"
                    ));
                }
            };
            spec = spec.option(name, properties);
        }
        Ok(spec)
    }
}

impl<'de> Deserialize<'de> for PrototypeSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = PropertyValue::deserialize(deserializer)?;
        Self::from_value(value).map_err(de::Error::custom)
    }
}
