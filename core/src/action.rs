//! Thin harness for running an action against parsed options.
//!
//! An action implements [`CliAction`]; an [`ActionRunner`] owns the action
//! and its [`CliOptions`], runs it, and turns a failure into either help
//! output (when the failed parse had already recorded a `help` option) or an
//! `ERROR:` report. The caller decides what to do with the resulting
//! [`ActionOutcome`], usually exiting with [`ActionOutcome::exit_code`].

use std::io::{self, Write};

use tracing::debug;

use crate::error::{OptionsError, Result};
use crate::{CliOptions, HelpFilter, PrototypeSpec};

/// Option name that switches a failed run to help output.
pub const HELP_OPTION: &str = "help";

/// A command driven by a prototype spec.
pub trait CliAction {
    /// Runs the action, usually starting with `options.parse(args, ..)`.
    ///
    /// # Errors
    ///
    /// Whatever parse or validation error stops the action.
    fn run(&mut self, options: &mut CliOptions, args: Vec<String>) -> Result<()>;

    /// Help text shown when a failed run had recorded the `help` option.
    fn help(&self, options: &CliOptions) -> String {
        options.help(&HelpFilter::default())
    }
}

/// How a run through [`ActionRunner::exec`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Completed,
    /// The run failed but `help` was present, so help was printed.
    Help,
    /// The run failed and the error was reported.
    Failed(OptionsError),
}

impl ActionOutcome {
    /// `0` for completed runs and help, `1` for failures.
    pub fn exit_code(&self) -> u8 {
        match self {
            ActionOutcome::Completed | ActionOutcome::Help => 0,
            ActionOutcome::Failed(_) => 1,
        }
    }
}

/// Owns an action and the options it parses into.
///
/// # Examples
///
/// ```
/// use protoargs_core::{
///     ActionOutcome, ActionRunner, CliAction, CliOptions, Properties, PrototypeSpec, Result,
/// };
///
/// struct Greet;
///
/// impl CliAction for Greet {
///     fn run(&mut self, options: &mut CliOptions, args: Vec<String>) -> Result<()> {
///         options.parse(args, false)?;
///         Ok(())
///     }
/// }
///
/// let spec = PrototypeSpec::new()
///     .option("name", Properties::new().set("labels", "--name").set("valued", true).set("required", true))
///     .option("help", Properties::new().set("labels", "--help").set("help", "Show this help"));
/// let mut runner = ActionRunner::new(Greet, &spec).unwrap();
///
/// let (mut out, mut err) = (Vec::new(), Vec::new());
/// let outcome = runner.exec(vec!["--bogus".into()], &mut out, &mut err).unwrap();
/// assert_eq!(outcome.exit_code(), 1);
/// assert_eq!(String::from_utf8(err).unwrap(), "\nERROR: Invalid token: --bogus.\n\n");
///
/// let (mut out, mut err) = (Vec::new(), Vec::new());
/// let outcome = runner.exec(vec!["--help".into()], &mut out, &mut err).unwrap();
/// assert_eq!(outcome, ActionOutcome::Help);
/// assert!(String::from_utf8(out).unwrap().contains("Show this help"));
/// ```
#[derive(Debug)]
pub struct ActionRunner<A> {
    action: A,
    options: CliOptions,
}

impl<A: CliAction> ActionRunner<A> {
    /// Builds the options for `spec` and wraps `action`.
    ///
    /// # Errors
    ///
    /// See [`PrototypeRegistry::from_spec`](crate::PrototypeRegistry::from_spec).
    pub fn new(action: A, spec: &PrototypeSpec) -> Result<Self> {
        Ok(Self::with_options(action, CliOptions::new(spec)?))
    }

    pub fn with_options(action: A, options: CliOptions) -> Self {
        Self { action, options }
    }

    /// Runs the action with `args`.
    ///
    /// Help goes to `out`, error reports to `err`.
    ///
    /// # Errors
    ///
    /// Only I/O errors from writing help or the error report.
    pub fn exec<O, E>(
        &mut self,
        args: Vec<String>,
        out: &mut O,
        err: &mut E,
    ) -> io::Result<ActionOutcome>
    where
        O: Write,
        E: Write,
    {
        let error = match self.action.run(&mut self.options, args) {
            Ok(()) => return Ok(ActionOutcome::Completed),
            Err(error) => error,
        };

        if self.options.has(HELP_OPTION) {
            debug!(%error, "showing help after failed run");
            writeln!(out, "{}", self.action.help(&self.options))?;
            return Ok(ActionOutcome::Help);
        }

        write!(err, "\nERROR: {error}\n\n")?;
        Ok(ActionOutcome::Failed(error))
    }

    pub fn action(&self) -> &A {
        &self.action
    }

    pub fn options(&self) -> &CliOptions {
        &self.options
    }
}
