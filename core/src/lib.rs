//! Prototype-driven command-line token parsing.
//!
//! This crate turns a declarative set of option prototypes and a raw argument
//! vector into typed option values:
//!
//! - [`PrototypeSpec`]: loose option declarations (name to property bag),
//!   built in code or loaded from YAML/JSON.
//! - [`OptionPrototype`]: the validated, typed form of one declaration.
//! - [`PrototypeRegistry`]: ordered, unique set of prototypes with label
//!   lookup.
//! - [`CliOptions`]: a registry plus parse results; [`CliOptions::parse`]
//!   consumes tokens and returns whatever it left unconsumed.
//! - [`OptionValue`] / [`ParsedOptions`]: parsed values behind the
//!   [`OptionsStore`] contract.
//! - [`CliAction`] / [`ActionRunner`]: a small harness that runs an action
//!   and reports errors or help.
//!
//! Every failure is an [`OptionsError`] variant carrying the offending token,
//! option, property, or value.
//!
//! # Example
//!
//! ```
//! use protoargs_core::*;
//!
//! let spec = PrototypeSpec::from_yaml_str(r#"
//! output:
//!   labels: "-o|--output|--output="
//!   valued: true
//!   default: out.txt
//! include:
//!   labels: [-I]
//!   valued: true
//!   multiple: true
//! verbose:
//!   labels: "-v"
//! "#).unwrap();
//!
//! let mut options = CliOptions::new(&spec).unwrap();
//! let rest = options.parse(["-I", "src", "lib", "-v", "main.c"], true).unwrap();
//!
//! assert_eq!(options.values_of("include"), ["src", "lib"]);
//! assert_eq!(options.value_of("output"), Some("out.txt"));
//! assert!(options.has("verbose"));
//! assert_eq!(rest, ["main.c"]);
//!
//! let err = options.parse(["-v", "-v"], false).unwrap_err();
//! assert_eq!(err, OptionsError::AlreadyParsedOption("-v".into()));
//! ```

mod action;
mod error;
mod help;
mod parser;
mod property;
mod prototype;
mod registry;
mod spec;
mod store;
mod value;

pub use action::{ActionOutcome, ActionRunner, CliAction, HELP_OPTION};
pub use error::{LoadError, OptionsError, Result};
pub use help::HelpFilter;
pub use parser::{CliOptions, parse_tokens};
pub use property::{Properties, Property, PropertyValue};
pub use prototype::{DEFAULT_HELP_TITLE, OptionPrototype};
pub use registry::PrototypeRegistry;
pub use spec::PrototypeSpec;
pub use store::{OptionsStore, ParsedOptions};
pub use value::OptionValue;
