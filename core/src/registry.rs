//! Validated, ordered set of option prototypes.

use tracing::{debug, trace};

use crate::error::{OptionsError, Result};
use crate::{OptionPrototype, PrototypeSpec};

/// Option name to [`OptionPrototype`], in declaration order.
///
/// Names are unique. Lookup by token scans options in declaration order and
/// returns the first whose labels contain the token.
///
/// # Examples
///
/// ```
/// use protoargs_core::{OptionPrototype, PrototypeRegistry};
///
/// let mut registry = PrototypeRegistry::new();
/// registry.define("verbose", OptionPrototype::flag(["-v", "--verbose"])).unwrap();
/// registry.define("name", OptionPrototype::with_value(["--name", "--name="])).unwrap();
///
/// assert_eq!(registry.option_from_token("--name="), Some("name"));
/// assert_eq!(registry.option_from_token("--verb"), None);
/// assert!(registry.define("verbose", OptionPrototype::default()).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrototypeRegistry {
    prototypes: Vec<(String, OptionPrototype)>,
}

impl PrototypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and registers every option of `spec`.
    ///
    /// # Errors
    ///
    /// - [`OptionsError::NoDataSupplied`] if `spec` is empty.
    /// - [`OptionsError::AlreadyDefinedOption`] if a name repeats.
    /// - [`OptionsError::InvalidProperty`] / [`OptionsError::InvalidPropertyValue`]
    ///   if a property bag cannot be coerced.
    ///
    /// # Examples
    ///
    /// ```
    /// use protoargs_core::{OptionsError, Properties, PrototypeRegistry, PrototypeSpec};
    ///
    /// let spec = PrototypeSpec::new()
    ///     .option("tag", Properties::new().set("valued", true))
    ///     .option("tag", Properties::new());
    /// assert_eq!(
    ///     PrototypeRegistry::from_spec(&spec),
    ///     Err(OptionsError::AlreadyDefinedOption("tag".into()))
    /// );
    /// assert_eq!(
    ///     PrototypeRegistry::from_spec(&PrototypeSpec::new()),
    ///     Err(OptionsError::NoDataSupplied)
    /// );
    /// ```
    pub fn from_spec(spec: &PrototypeSpec) -> Result<Self> {
        if spec.is_empty() {
            return Err(OptionsError::NoDataSupplied);
        }

        let mut registry = Self::new();
        for (name, properties) in spec.iter() {
            if registry.contains(name) {
                return Err(OptionsError::AlreadyDefinedOption(name.to_string()));
            }
            let prototype = OptionPrototype::from_properties(name, properties)?;
            registry.define(name, prototype)?;
        }

        debug!(options = registry.len(), "registered option prototypes");
        Ok(registry)
    }

    /// Builds a registry from already typed prototypes.
    ///
    /// # Errors
    ///
    /// Same as [`from_spec`](Self::from_spec), minus the property coercion
    /// errors.
    pub fn from_prototypes<I, S>(prototypes: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, OptionPrototype)>,
        S: Into<String>,
    {
        let mut registry = Self::new();
        for (name, prototype) in prototypes {
            registry.define(name, prototype)?;
        }
        if registry.is_empty() {
            return Err(OptionsError::NoDataSupplied);
        }
        Ok(registry)
    }

    /// Registers one prototype under `name`.
    ///
    /// A prototype without labels is matched by its name.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::AlreadyDefinedOption`] if `name` is taken.
    pub fn define(&mut self, name: impl Into<String>, mut prototype: OptionPrototype) -> Result<()> {
        let name = name.into();
        if self.contains(&name) {
            return Err(OptionsError::AlreadyDefinedOption(name));
        }
        if prototype.labels.is_empty() {
            prototype.labels.push(name.clone());
        }
        trace!(option = %name, labels = ?prototype.labels, "defined option");
        self.prototypes.push((name, prototype));
        Ok(())
    }

    /// Returns the option name whose labels contain `token` exactly.
    pub fn option_from_token(&self, token: &str) -> Option<&str> {
        self.resolve(token).map(|(name, _)| name)
    }

    /// Like [`option_from_token`](Self::option_from_token), also returning
    /// the prototype.
    pub fn resolve(&self, token: &str) -> Option<(&str, &OptionPrototype)> {
        self.prototypes
            .iter()
            .find(|(_, prototype)| prototype.matches(token))
            .map(|(name, prototype)| (name.as_str(), prototype))
    }

    pub fn get(&self, name: &str) -> Option<&OptionPrototype> {
        self.prototypes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, prototype)| prototype)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates `(name, prototype)` in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionPrototype)> {
        self.prototypes.iter().map(|(name, p)| (name.as_str(), p))
    }

    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }
}
