//! Loosely typed property values as they arrive from spec files or callers.
//!
//! A prototype is described by a bag of named properties whose values may be
//! strings, booleans, numbers, or lists. [`PropertyValue`] keeps that raw
//! shape (including document order for mappings) until
//! [`OptionPrototype::from_properties`](crate::OptionPrototype::from_properties)
//! coerces it into a typed prototype.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};

/// Recognized prototype property names.
///
/// Names are matched case-sensitively, exactly as they appear in a spec.
///
/// # Examples
///
/// ```
/// use protoargs_core::Property;
///
/// assert_eq!(Property::from_name("validValues"), Some(Property::ValidValues));
/// assert_eq!(Property::from_name("validvalues"), None);
/// assert_eq!(Property::StopHere.name(), "stopHere");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Labels,
    HelpGroup,
    HelpTitle,
    Help,
    Required,
    Valued,
    Multiple,
    ValidValues,
    Default,
    StopHere,
}

impl Property {
    /// Every recognized property, in the order they are documented.
    pub const ALL: [Property; 10] = [
        Property::Labels,
        Property::HelpGroup,
        Property::HelpTitle,
        Property::Help,
        Property::Required,
        Property::Valued,
        Property::Multiple,
        Property::ValidValues,
        Property::Default,
        Property::StopHere,
    ];

    /// Returns the spelling used in specs.
    pub fn name(self) -> &'static str {
        match self {
            Property::Labels => "labels",
            Property::HelpGroup => "helpGroup",
            Property::HelpTitle => "helpTitle",
            Property::Help => "help",
            Property::Required => "required",
            Property::Valued => "valued",
            Property::Multiple => "multiple",
            Property::ValidValues => "validValues",
            Property::Default => "default",
            Property::StopHere => "stopHere",
        }
    }

    /// Looks up a property by its declared spelling.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A raw, not yet validated property value.
///
/// Mappings keep their entries in document order, which matters for option
/// declaration order (it decides label lookup priority and help order).
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<PropertyValue>),
    Table(Vec<(String, PropertyValue)>),
}

impl PropertyValue {
    /// Renders scalars as plain strings; `None` for null, lists and tables.
    pub fn as_scalar(&self) -> Option<String> {
        match self {
            PropertyValue::Bool(b) => Some(b.to_string()),
            PropertyValue::Integer(n) => Some(n.to_string()),
            PropertyValue::Float(n) => Some(n.to_string()),
            PropertyValue::Text(s) => Some(s.clone()),
            PropertyValue::Null | PropertyValue::List(_) | PropertyValue::Table(_) => None,
        }
    }

    /// Interprets the value as a boolean.
    ///
    /// Strings are compared case-insensitively against the usual spellings
    /// (`true`/`false`, `yes`/`no`, `on`/`off`, `1`/`0`, and the empty string
    /// for false). Integers accept `1` and `0`. Null reads as false.
    ///
    /// # Examples
    ///
    /// ```
    /// use protoargs_core::PropertyValue;
    ///
    /// assert_eq!(PropertyValue::from("TRUE").as_bool(), Some(true));
    /// assert_eq!(PropertyValue::from("off").as_bool(), Some(false));
    /// assert_eq!(PropertyValue::from("maybe").as_bool(), None);
    /// assert_eq!(PropertyValue::Integer(2).as_bool(), None);
    /// ```
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            PropertyValue::Null => Some(false),
            PropertyValue::Integer(1) => Some(true),
            PropertyValue::Integer(0) => Some(false),
            PropertyValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Some(true),
                "false" | "0" | "no" | "off" | "" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Interprets the value as a list of strings.
    ///
    /// A string is split on `separator`; a list must contain only scalars.
    ///
    /// # Examples
    ///
    /// ```
    /// use protoargs_core::PropertyValue;
    ///
    /// let labels = PropertyValue::from("--color|-c");
    /// assert_eq!(labels.as_list('|'), Some(vec!["--color".to_string(), "-c".to_string()]));
    /// assert_eq!(PropertyValue::Bool(true).as_list('|'), None);
    /// ```
    pub fn as_list(&self, separator: char) -> Option<Vec<String>> {
        match self {
            PropertyValue::Text(s) => Some(s.split(separator).map(String::from).collect()),
            PropertyValue::List(items) => items.iter().map(PropertyValue::as_scalar).collect(),
            _ => None,
        }
    }

    /// Returns the value if it is a string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Null => f.write_str("null"),
            PropertyValue::Bool(b) => write!(f, "{b}"),
            PropertyValue::Integer(n) => write!(f, "{n}"),
            PropertyValue::Float(n) => write!(f, "{n}"),
            PropertyValue::Text(s) => write!(f, "{s:?}"),
            PropertyValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            PropertyValue::Table(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Integer(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl<T: Into<PropertyValue>> From<Vec<T>> for PropertyValue {
    fn from(values: Vec<T>) -> Self {
        PropertyValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<PropertyValue>> From<Option<T>> for PropertyValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(PropertyValue::Null, Into::into)
    }
}

impl<'de> Deserialize<'de> for PropertyValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(PropertyValueVisitor)
    }
}

struct PropertyValueVisitor;

impl<'de> Visitor<'de> for PropertyValueVisitor {
    type Value = PropertyValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, boolean, number, list, or mapping")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(PropertyValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(PropertyValue::Integer(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(i64::try_from(v)
            .map(PropertyValue::Integer)
            .unwrap_or(PropertyValue::Float(v as f64)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(PropertyValue::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(PropertyValue::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(PropertyValue::Text(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(PropertyValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(PropertyValue::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        PropertyValue::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(PropertyValue::List(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, PropertyValue>()? {
            entries.push((key, value));
        }
        Ok(PropertyValue::Table(entries))
    }
}

/// Ordered property bag for one option, as written in a spec.
///
/// # Examples
///
/// ```
/// use protoargs_core::{Properties, PropertyValue};
///
/// let props = Properties::new()
///     .set("labels", "--name|-n")
///     .set("valued", true);
/// assert_eq!(props.len(), 2);
/// assert_eq!(props.get("valued"), Some(&PropertyValue::Bool(true)));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    entries: Vec<(String, PropertyValue)>,
}

impl Properties {
    /// Creates an empty property bag (all properties take their defaults).
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a property.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    /// Returns the last value written for `key`.
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<(String, PropertyValue)>> for Properties {
    fn from(entries: Vec<(String, PropertyValue)>) -> Self {
        Self { entries }
    }
}
