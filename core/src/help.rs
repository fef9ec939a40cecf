//! Help text rendering for declared options.
//!
//! Each option renders as one block: its title at the base indent, then a
//! `(Required)` marker and its help lines one level deeper. Titles and lines
//! may use placeholders:
//!
//! - `{{option}}`: the option name
//! - `{{labels}}`: labels joined with `, `
//! - `{{labels:pipe}}`: labels joined with ` | `
//!
//! Blocks are separated by a blank line.

use crate::{OptionPrototype, PrototypeRegistry};

const BODY_INDENT: &str = "    ";

/// Selects which options appear in help output and how it is indented.
///
/// # Examples
///
/// ```
/// use protoargs_core::{CliOptions, HelpFilter, Properties, PrototypeSpec};
///
/// let spec = PrototypeSpec::new()
///     .option("name", Properties::new()
///         .set("labels", "--name|-n")
///         .set("required", true)
///         .set("help", "Who to greet"))
///     .option("loud", Properties::new()
///         .set("labels", "--loud")
///         .set("helpGroup", "style")
///         .set("helpTitle", "{{labels:pipe}} (flag)"));
/// let options = CliOptions::new(&spec).unwrap();
///
/// assert_eq!(
///     options.help(&HelpFilter::default()),
///     "    --name, -n\n        (Required)\n        Who to greet\n\n    --loud (flag)"
/// );
/// assert_eq!(
///     options.help(&HelpFilter::default().in_group("style").with_indent("")),
///     "--loud (flag)"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpFilter {
    /// Only these options, when non-empty.
    pub options: Vec<String>,
    /// Only options whose `helpGroup` equals this, when set and non-empty.
    pub group: Option<String>,
    /// Base indent for every block.
    pub indent: String,
}

impl Default for HelpFilter {
    fn default() -> Self {
        Self {
            options: Vec::new(),
            group: None,
            indent: BODY_INDENT.to_string(),
        }
    }
}

impl HelpFilter {
    /// Restricts output to the named options.
    pub fn only<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn in_group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }

    pub fn with_indent(mut self, indent: &str) -> Self {
        self.indent = indent.to_string();
        self
    }

    fn includes(&self, name: &str, prototype: &OptionPrototype) -> bool {
        if !self.options.is_empty() && !self.options.iter().any(|o| o == name) {
            return false;
        }
        match self.group.as_deref() {
            Some(group) if !group.is_empty() => group == prototype.help_group,
            _ => true,
        }
    }
}

pub(crate) fn render(registry: &PrototypeRegistry, filter: &HelpFilter) -> String {
    let mut blocks: Vec<String> = Vec::new();

    for (name, prototype) in registry.iter() {
        if !filter.includes(name, prototype) {
            continue;
        }

        let mut lines = Vec::new();
        let mut indent = filter.indent.clone();
        if !prototype.help_title.is_empty() {
            lines.push(expand(name, prototype, &indent, &prototype.help_title));
            indent.push_str(BODY_INDENT);
        }
        if prototype.required {
            lines.push(format!("{indent}(Required)"));
        }
        for line in &prototype.help {
            lines.push(expand(name, prototype, &indent, line));
        }

        if !lines.is_empty() {
            blocks.push(lines.join("\n"));
        }
    }

    blocks.join("\n\n")
}

fn expand(name: &str, prototype: &OptionPrototype, indent: &str, text: &str) -> String {
    let text = text
        .replace("{{option}}", name)
        .replace("{{labels}}", &prototype.labels.join(", "))
        .replace("{{labels:pipe}}", &prototype.labels.join(" | "));
    format!("{indent}{text}")
}
