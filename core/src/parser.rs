//! Prototype-driven token parser.
//!
//! Tokens are consumed left to right in a single pass. Each token is split on
//! its first `=` (the key keeps the `=`, so `--name=` is a label of its own),
//! resolved against the registry, and then either recorded as a flag or used
//! as the start of a value run. Defaults and required checks run once the
//! tokens are exhausted or a `stopHere` option ends the pass.
//!
//! The parser never reorders tokens. Whatever it does not consume (tokens
//! skipped in lenient mode, and everything after a `stopHere` option) is
//! handed back in order as the remainder.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::error::{OptionsError, Result};
use crate::{
    HelpFilter, OptionPrototype, OptionValue, OptionsStore, ParsedOptions, PrototypeRegistry,
    PrototypeSpec,
};

/// A registry plus the results of the last parse.
///
/// # Examples
///
/// ```
/// use protoargs_core::{CliOptions, Properties, PrototypeSpec};
///
/// let spec = PrototypeSpec::new()
///     .option("color", Properties::new()
///         .set("labels", "--color|--color=")
///         .set("valued", true)
///         .set("validValues", "red|blue"))
///     .option("tags", Properties::new()
///         .set("labels", "--tag")
///         .set("valued", true)
///         .set("multiple", true))
///     .option("run", Properties::new().set("stopHere", true));
///
/// let mut options = CliOptions::new(&spec).unwrap();
/// let rest = options
///     .parse(["--tag", "a", "b", "a", "--color=red", "run", "--color", "blue"], false)
///     .unwrap();
///
/// assert_eq!(options.value_of("color"), Some("red"));
/// assert_eq!(options.values_of("tags"), ["a", "b"]);
/// assert!(options.has("run"));
/// assert_eq!(rest, ["--color", "blue"]);
/// ```
#[derive(Debug, Clone)]
pub struct CliOptions {
    registry: PrototypeRegistry,
    parsed: ParsedOptions,
}

impl CliOptions {
    /// Builds the registry for `spec`.
    ///
    /// # Errors
    ///
    /// See [`PrototypeRegistry::from_spec`].
    pub fn new(spec: &PrototypeSpec) -> Result<Self> {
        Ok(Self::from_registry(PrototypeRegistry::from_spec(spec)?))
    }

    /// Wraps an already built registry with empty results.
    pub fn from_registry(registry: PrototypeRegistry) -> Self {
        Self {
            registry,
            parsed: ParsedOptions::new(),
        }
    }

    /// Builds a parser for `spec` and parses `tokens` strictly.
    ///
    /// Unconsumed tokens (only possible after a `stopHere` option) are
    /// dropped.
    ///
    /// # Errors
    ///
    /// Any registration or parse error.
    pub fn make<I, S>(spec: &PrototypeSpec, tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut options = Self::new(spec)?;
        options.parse(tokens, false)?;
        Ok(options)
    }

    /// Replaces the prototypes and clears parsed results.
    ///
    /// On error the previous prototypes stay in place.
    ///
    /// # Errors
    ///
    /// See [`PrototypeRegistry::from_spec`].
    pub fn set_prototypes(&mut self, spec: &PrototypeSpec) -> Result<()> {
        self.parsed.reset();
        self.registry = PrototypeRegistry::from_spec(spec)?;
        Ok(())
    }

    /// Parses `tokens`, replacing any previous results.
    ///
    /// With `ignore_invalid_tokens`, tokens that resolve to no option are
    /// left for the caller instead of failing, so one argument vector can be
    /// parsed against several option sets in turn.
    ///
    /// Returns the tokens that were not consumed, in their original order.
    ///
    /// # Errors
    ///
    /// - [`OptionsError::InvalidToken`] for an unknown token in strict mode.
    /// - [`OptionsError::AlreadyParsedOption`] when a non-multiple option repeats.
    /// - [`OptionsError::OptionDoesNotAcceptValue`] for `label=value` on a flag.
    /// - [`OptionsError::InvalidValue`] when a value is not a valid value.
    /// - [`OptionsError::OptionNeedsValue`] when a valued option gets no value,
    ///   or a required option without default is missing.
    pub fn parse<I, S>(&mut self, tokens: I, ignore_invalid_tokens: bool) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        parse_tokens(&self.registry, &mut self.parsed, tokens, ignore_invalid_tokens)
    }

    /// Returns the option name whose labels contain `token` exactly.
    pub fn option_from_token(&self, token: &str) -> Option<&str> {
        self.registry.option_from_token(token)
    }

    /// Returns the prototype declared as `name`.
    pub fn prototype(&self, name: &str) -> Option<&OptionPrototype> {
        self.registry.get(name)
    }

    /// Returns the declared prototypes.
    pub fn registry(&self) -> &PrototypeRegistry {
        &self.registry
    }

    /// Results of the last parse. Not authoritative if that parse failed.
    pub fn options(&self) -> &ParsedOptions {
        &self.parsed
    }

    /// Returns the parsed value of `name`.
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.parsed.get(name)
    }

    /// Checks whether `name` was parsed or defaulted.
    pub fn has(&self, name: &str) -> bool {
        self.parsed.has(name)
    }

    /// Returns the string of a flag or single value.
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.parsed.value_of(name)
    }

    /// Returns every value of `name`, empty if absent.
    pub fn values_of(&self, name: &str) -> &[String] {
        self.parsed.values_of(name)
    }

    /// Renders help for the declared options.
    pub fn help(&self, filter: &HelpFilter) -> String {
        crate::help::render(&self.registry, filter)
    }
}

impl OptionsStore for CliOptions {
    fn set(&mut self, name: &str, value: OptionValue) {
        self.parsed.set(name, value);
    }

    fn get(&self, name: &str) -> Option<&OptionValue> {
        self.parsed.get(name)
    }

    fn reset(&mut self) {
        self.parsed.reset();
    }
}

/// Parses `tokens` against `registry`, writing results into `store`.
///
/// `store` is reset first. Returns the unconsumed tokens in order. This is
/// the engine behind [`CliOptions::parse`] for callers that bring their own
/// [`OptionsStore`].
///
/// # Errors
///
/// See [`CliOptions::parse`].
pub fn parse_tokens<St, I, S>(
    registry: &PrototypeRegistry,
    store: &mut St,
    tokens: I,
    ignore_invalid_tokens: bool,
) -> Result<Vec<String>>
where
    St: OptionsStore,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    store.reset();
    let pending: VecDeque<String> = tokens.into_iter().map(Into::into).collect();
    debug!(tokens = pending.len(), ignore_invalid_tokens, "parsing tokens");

    let mut tokenizer = Tokenizer {
        registry,
        store,
        pending,
        skipped: Vec::new(),
    };
    tokenizer.consume(ignore_invalid_tokens)?;
    tokenizer.apply_defaults()?;

    let Tokenizer {
        pending, skipped, ..
    } = tokenizer;
    let mut remaining = skipped;
    remaining.extend(pending);
    Ok(remaining)
}

struct Tokenizer<'a, St> {
    registry: &'a PrototypeRegistry,
    store: &'a mut St,
    pending: VecDeque<String>,
    skipped: Vec<String>,
}

impl<St: OptionsStore> Tokenizer<'_, St> {
    fn consume(&mut self, ignore_invalid_tokens: bool) -> Result<()> {
        let registry = self.registry;

        while let Some(token) = self.pending.pop_front() {
            let (key, inline) = split_token(&token);

            let Some((option, prototype)) = registry.resolve(key) else {
                if ignore_invalid_tokens {
                    trace!(token = %token, "skipping unknown token");
                    self.skipped.push(token);
                    continue;
                }
                return Err(OptionsError::InvalidToken(key.to_string()));
            };
            trace!(token = %token, option, "resolved token");

            if self.store.has(option) && !prototype.multiple {
                return Err(OptionsError::AlreadyParsedOption(key.to_string()));
            }

            if prototype.valued {
                let values = self.collect_values(key, inline, prototype)?;
                let value = if prototype.multiple {
                    match self.store.get(option) {
                        Some(existing) => existing.clone().merge(values),
                        None => OptionValue::Multiple(values),
                    }
                } else {
                    let first = values
                        .into_iter()
                        .next()
                        .ok_or_else(|| OptionsError::OptionNeedsValue(key.to_string()))?;
                    OptionValue::Single(first)
                };
                self.store.set(option, value);
            } else {
                if inline.is_some() {
                    return Err(OptionsError::OptionDoesNotAcceptValue(key.to_string()));
                }
                self.store.set(option, OptionValue::Flag(key.to_string()));
            }

            if prototype.stop_here {
                debug!(option, remaining = self.pending.len(), "stopping at option");
                break;
            }
        }

        Ok(())
    }

    /// Collects the value run of a valued option.
    ///
    /// The inline value is taken as-is even if it starts with `-`; following
    /// tokens are taken only while they do not start with `-`, and only one
    /// value is taken unless the option is multiple.
    fn collect_values(
        &mut self,
        key: &str,
        inline: Option<&str>,
        prototype: &OptionPrototype,
    ) -> Result<Vec<String>> {
        let mut inline = inline.map(String::from);
        let mut values: Vec<String> = Vec::new();

        loop {
            if !prototype.multiple && !values.is_empty() {
                break;
            }

            let value = match inline.take() {
                Some(value) => value,
                None => match self.pending.pop_front() {
                    Some(next) if !looks_like_option(&next) => next,
                    Some(next) => {
                        self.pending.push_front(next);
                        break;
                    }
                    None => break,
                },
            };

            if !prototype.accepts(&value) {
                return Err(OptionsError::invalid_value(
                    key,
                    &prototype.valid_values,
                    &value,
                ));
            }
            if !values.contains(&value) {
                values.push(value);
            }
        }

        if values.is_empty() {
            return Err(OptionsError::OptionNeedsValue(key.to_string()));
        }
        Ok(values)
    }

    fn apply_defaults(&mut self) -> Result<()> {
        for (name, prototype) in self.registry.iter() {
            if self.store.has(name) {
                continue;
            }
            if let Some(default) = &prototype.default {
                trace!(option = name, "applying default");
                self.store.set(name, default.clone());
            } else if prototype.required {
                return Err(OptionsError::OptionNeedsValue(name.to_string()));
            }
        }
        Ok(())
    }
}

/// Splits on the first `=`: the key keeps the `=`, the rest is the value.
fn split_token(token: &str) -> (&str, Option<&str>) {
    match token.find('=') {
        Some(pos) => (&token[..=pos], Some(&token[pos + 1..])),
        None => (token, None),
    }
}

fn looks_like_option(token: &str) -> bool {
    token.starts_with('-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Properties;

    fn spec() -> PrototypeSpec {
        PrototypeSpec::new()
            .option(
                "name",
                Properties::new()
                    .set("labels", "--name|--name=|-n")
                    .set("valued", true),
            )
            .option(
                "tags",
                Properties::new()
                    .set("labels", "--tag|--tag=|-t")
                    .set("valued", true)
                    .set("multiple", true),
            )
            .option(
                "color",
                Properties::new()
                    .set("labels", "--color|--color=")
                    .set("valued", true)
                    .set("validValues", vec!["red", "blue"]),
            )
            .option("verbose", Properties::new().set("labels", "-v|--verbose|-v="))
            .option(
                "debug",
                Properties::new().set("labels", "-d").set("multiple", true),
            )
            .option(
                "command",
                Properties::new().set("labels", "run|build").set("stopHere", true),
            )
    }

    fn options() -> CliOptions {
        CliOptions::new(&spec()).unwrap()
    }

    #[test]
    fn test_empty_tokens_parse_to_nothing() {
        let mut opts = options();
        let rest = opts.parse(Vec::<String>::new(), false).unwrap();
        assert!(rest.is_empty());
        assert!(opts.options().is_empty());
    }

    #[test]
    fn test_inline_value() {
        let mut opts = options();
        opts.parse(["--name=alice"], false).unwrap();
        assert_eq!(opts.get("name"), Some(&OptionValue::Single("alice".into())));
    }

    #[test]
    fn test_separate_value() {
        let mut opts = options();
        opts.parse(["-n", "bob"], false).unwrap();
        assert_eq!(opts.value_of("name"), Some("bob"));
    }

    #[test]
    fn test_inline_value_may_start_with_dash() {
        let mut opts = options();
        opts.parse(["--name=-x"], false).unwrap();
        assert_eq!(opts.value_of("name"), Some("-x"));
    }

    #[test]
    fn test_empty_inline_value_is_kept() {
        let mut opts = options();
        opts.parse(["--name="], false).unwrap();
        assert_eq!(opts.value_of("name"), Some(""));
    }

    #[test]
    fn test_multiple_collects_run_and_dedupes() {
        let mut opts = options();
        opts.parse(["--tag", "a", "b", "a", "c"], false).unwrap();
        assert_eq!(
            opts.get("tags"),
            Some(&OptionValue::Multiple(vec![
                "a".into(),
                "b".into(),
                "c".into()
            ]))
        );
    }

    #[test]
    fn test_multiple_inline_continues_with_bare_tokens() {
        let mut opts = options();
        opts.parse(["--tag=a", "b", "-v"], false).unwrap();
        assert_eq!(opts.values_of("tags"), ["a", "b"]);
        assert!(opts.has("verbose"));
    }

    #[test]
    fn test_multiple_merges_across_occurrences() {
        let mut opts = options();
        opts.parse(["-t", "a", "b", "--tag=b", "c"], false).unwrap();
        assert_eq!(opts.values_of("tags"), ["a", "b", "c"]);
    }

    #[test]
    fn test_value_run_stops_at_dash_token() {
        let mut opts = options();
        let rest = opts.parse(["--tag", "a", "-v", "b"], true).unwrap();
        assert_eq!(opts.values_of("tags"), ["a"]);
        assert_eq!(rest, ["b"]);
    }

    #[test]
    fn test_non_multiple_takes_only_first_bare_value() {
        let mut opts = options();
        let rest = opts.parse(["--name", "a", "b"], true).unwrap();
        assert_eq!(opts.value_of("name"), Some("a"));
        assert_eq!(rest, ["b"]);

        let err = opts.parse(["--name", "a", "b"], false).unwrap_err();
        assert_eq!(err, OptionsError::InvalidToken("b".into()));
    }

    #[test]
    fn test_valued_option_without_value() {
        let mut opts = options();
        assert_eq!(
            opts.parse(["--name"], false),
            Err(OptionsError::OptionNeedsValue("--name".into()))
        );
        assert_eq!(
            opts.parse(["--name", "-v"], false),
            Err(OptionsError::OptionNeedsValue("--name".into()))
        );
    }

    #[test]
    fn test_flag_records_matched_label() {
        let mut opts = options();
        opts.parse(["--verbose"], false).unwrap();
        assert_eq!(opts.get("verbose"), Some(&OptionValue::Flag("--verbose".into())));
    }

    #[test]
    fn test_flag_rejects_inline_value() {
        let mut opts = options();
        assert_eq!(
            opts.parse(["-v=yes"], false),
            Err(OptionsError::OptionDoesNotAcceptValue("-v=".into()))
        );
    }

    #[test]
    fn test_repeated_option() {
        let mut opts = options();
        assert_eq!(
            opts.parse(["-v", "--verbose"], false),
            Err(OptionsError::AlreadyParsedOption("--verbose".into()))
        );
        assert_eq!(
            opts.parse(["--name=a", "-n", "b"], false),
            Err(OptionsError::AlreadyParsedOption("-n".into()))
        );

        opts.parse(["-d", "-d"], false).unwrap();
        assert!(opts.get("debug").is_some_and(OptionValue::is_flag));
    }

    #[test]
    fn test_unknown_token() {
        let mut opts = options();
        assert_eq!(
            opts.parse(["-v", "--nope=1"], false),
            Err(OptionsError::InvalidToken("--nope=".into()))
        );

        let rest = opts.parse(["sub", "-v", "--nope=1", "extra"], true).unwrap();
        assert_eq!(rest, ["sub", "--nope=1", "extra"]);
        assert!(opts.has("verbose"));
    }

    #[test]
    fn test_valid_values() {
        let mut opts = options();
        assert_eq!(
            opts.parse(["--color", "green"], false),
            Err(OptionsError::InvalidValue {
                option: "--color".into(),
                valid_values: vec!["red".into(), "blue".into()],
                value: "green".into(),
            })
        );
        opts.parse(["--color=blue"], false).unwrap();
        assert_eq!(opts.value_of("color"), Some("blue"));
    }

    #[test]
    fn test_stop_here_leaves_tail_untouched() {
        let mut opts = options();
        let rest = opts
            .parse(["-v", "run", "--name", "x", "-v", "whatever"], false)
            .unwrap();
        assert_eq!(opts.value_of("command"), Some("run"));
        assert!(!opts.has("name"));
        assert_eq!(rest, ["--name", "x", "-v", "whatever"]);
    }

    #[test]
    fn test_skipped_tokens_precede_stop_tail() {
        let mut opts = options();
        let rest = opts.parse(["pre", "build", "post"], true).unwrap();
        assert_eq!(rest, ["pre", "post"]);
    }

    #[test]
    fn test_valued_stop_here() {
        let spec = PrototypeSpec::new().option(
            "exec",
            Properties::new()
                .set("labels", "--exec")
                .set("valued", true)
                .set("stopHere", true),
        );
        let mut opts = CliOptions::new(&spec).unwrap();
        let rest = opts.parse(["--exec", "ls", "-la"], false).unwrap();
        assert_eq!(opts.value_of("exec"), Some("ls"));
        assert_eq!(rest, ["-la"]);
    }

    #[test]
    fn test_defaults_and_required() {
        let spec = PrototypeSpec::new()
            .option(
                "mode",
                Properties::new()
                    .set("labels", "--mode")
                    .set("valued", true)
                    .set("required", true)
                    .set("default", "fast"),
            )
            .option(
                "target",
                Properties::new()
                    .set("labels", "--target")
                    .set("valued", true)
                    .set("required", true),
            );
        let mut opts = CliOptions::new(&spec).unwrap();

        assert_eq!(
            opts.parse(Vec::<String>::new(), false),
            Err(OptionsError::OptionNeedsValue("target".into()))
        );

        opts.parse(["--target", "x86"], false).unwrap();
        assert_eq!(opts.value_of("mode"), Some("fast"));
        assert_eq!(opts.value_of("target"), Some("x86"));
    }

    #[test]
    fn test_parse_resets_previous_results() {
        let mut opts = options();
        opts.parse(["-v"], false).unwrap();
        opts.parse(["--name=x"], false).unwrap();
        assert!(!opts.has("verbose"));
        assert!(opts.has("name"));
    }

    #[test]
    fn test_set_prototypes_replaces_registry() {
        let mut opts = options();
        opts.parse(["-v"], false).unwrap();

        let other = PrototypeSpec::new().option("quiet", Properties::new().set("labels", "-q"));
        opts.set_prototypes(&other).unwrap();
        assert!(opts.options().is_empty());
        assert_eq!(opts.option_from_token("-q"), Some("quiet"));
        assert_eq!(opts.option_from_token("-v"), None);

        assert_eq!(
            opts.set_prototypes(&PrototypeSpec::new()),
            Err(OptionsError::NoDataSupplied)
        );
        assert_eq!(opts.option_from_token("-q"), Some("quiet"));
    }

    #[test]
    fn test_make_parses_strictly() {
        let opts = CliOptions::make(&spec(), ["-n", "x"]).unwrap();
        assert_eq!(opts.value_of("name"), Some("x"));
        assert!(CliOptions::make(&spec(), ["bogus"]).is_err());
    }

    #[test]
    fn test_split_token() {
        assert_eq!(split_token("--a=b=c"), ("--a=", Some("b=c")));
        assert_eq!(split_token("--a"), ("--a", None));
        assert_eq!(split_token("="), ("=", Some("")));
    }

    #[test]
    fn test_custom_store() {
        #[derive(Default)]
        struct Recorder {
            writes: Vec<(String, OptionValue)>,
        }
        impl OptionsStore for Recorder {
            fn set(&mut self, name: &str, value: OptionValue) {
                self.writes.push((name.to_string(), value));
            }
            fn get(&self, name: &str) -> Option<&OptionValue> {
                self.writes.iter().rev().find(|(n, _)| n == name).map(|(_, v)| v)
            }
            fn reset(&mut self) {
                self.writes.clear();
            }
        }

        let registry = PrototypeRegistry::from_spec(&spec()).unwrap();
        let mut store = Recorder::default();
        parse_tokens(&registry, &mut store, ["-t", "a", "-t", "b"], false).unwrap();
        assert_eq!(store.writes.len(), 2);
        assert_eq!(store.get("tags").unwrap().values(), ["a", "b"]);
    }
}
