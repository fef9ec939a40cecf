use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use protoargs_core::{
    ActionOutcome, ActionRunner, CliAction, CliOptions, HelpFilter, ParsedOptions,
    PrototypeRegistry, PrototypeSpec,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Output format for parse results.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "protoargs", version, disable_help_subcommand = true)]
#[command(about = "Parse argument vectors against declarative option prototypes")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse tokens given after `--` and print the options and remainder.
    Parse(ParseArgs),
    /// Render help text for the options of a spec file.
    Help(HelpArgs),
    /// Validate a spec file.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// YAML or JSON prototype spec file.
    #[arg(long)]
    spec: PathBuf,
    /// Keep unknown tokens in the remainder instead of failing.
    #[arg(long)]
    ignore_invalid_tokens: bool,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Tokens to parse.
    #[arg(last = true)]
    tokens: Vec<String>,
}

#[derive(Debug, Args)]
struct HelpArgs {
    /// YAML or JSON prototype spec file.
    #[arg(long)]
    spec: PathBuf,
    /// Only options in this help group.
    #[arg(long)]
    group: Option<String>,
    /// Only these options (repeatable).
    #[arg(long = "option")]
    options: Vec<String>,
    /// Base indent in spaces.
    #[arg(long, default_value_t = 4)]
    indent: usize,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// YAML or JSON prototype spec file.
    #[arg(long)]
    spec: PathBuf,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Help(args) => run_help(args).map(|()| 0),
        Command::Check(args) => run_check(args).map(|()| 0),
    };

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(i32::from(code)),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn load_spec(path: &Path) -> Result<PrototypeSpec, String> {
    PrototypeSpec::load(path).map_err(|e| format!("Failed to load {}: {e}", path.display()))
}

// ---------------------------------------------------------------------------
// parse command
// ---------------------------------------------------------------------------

/// Parses the forwarded tokens and keeps what was left over.
struct PrintAction {
    ignore_invalid_tokens: bool,
    remaining: Vec<String>,
}

impl CliAction for PrintAction {
    fn run(&mut self, options: &mut CliOptions, args: Vec<String>) -> protoargs_core::Result<()> {
        self.remaining = options.parse(args, self.ignore_invalid_tokens)?;
        Ok(())
    }
}

#[derive(serde::Serialize)]
struct ParseOutput<'a> {
    options: &'a ParsedOptions,
    remaining: &'a [String],
}

fn run_parse(args: ParseArgs) -> Result<u8, String> {
    let spec = load_spec(&args.spec)?;
    let action = PrintAction {
        ignore_invalid_tokens: args.ignore_invalid_tokens,
        remaining: Vec::new(),
    };
    let mut runner = ActionRunner::new(action, &spec).map_err(|e| e.to_string())?;

    debug!(tokens = args.tokens.len(), "parsing forwarded tokens");
    let outcome = runner
        .exec(args.tokens, &mut io::stdout(), &mut io::stderr())
        .map_err(|e| format!("Failed to write output: {e}"))?;
    if outcome != ActionOutcome::Completed {
        return Ok(outcome.exit_code());
    }

    let output = ParseOutput {
        options: runner.options().options(),
        remaining: &runner.action().remaining,
    };
    let rendered = match args.format {
        CliOutputFormat::Json => serde_json::to_string_pretty(&output)
            .map_err(|e| format!("Failed to serialize output: {e}"))?,
        CliOutputFormat::Yaml => serde_yaml::to_string(&output)
            .map_err(|e| format!("Failed to serialize output: {e}"))?,
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", rendered.trim_end())
        .map_err(|e| format!("Failed to write output: {e}"))?;
    Ok(0)
}

// ---------------------------------------------------------------------------
// help and check commands
// ---------------------------------------------------------------------------

fn run_help(args: HelpArgs) -> Result<(), String> {
    let spec = load_spec(&args.spec)?;
    let options = CliOptions::new(&spec).map_err(|e| e.to_string())?;

    let mut filter = HelpFilter::default()
        .only(args.options)
        .with_indent(&" ".repeat(args.indent));
    if let Some(group) = args.group.as_deref() {
        filter = filter.in_group(group);
    }

    let help = options.help(&filter);
    if !help.is_empty() {
        println!("{help}");
    }
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let spec = load_spec(&args.spec)?;
    let registry = PrototypeRegistry::from_spec(&spec).map_err(|e| e.to_string())?;
    println!(
        "{}: {} option(s) defined.",
        args.spec.display(),
        registry.len()
    );
    Ok(())
}
