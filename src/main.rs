use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use fzr::config::AppConfig;
use fzr::error::FilterError;
use fzr::output;
use fzr::query::{FilterPlan, LineFilter};
use fzr::source::{self, LineSource, ReadOptions};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use termcolor::ColorChoice;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fzr")]
#[command(about = "Filter and rank lines with fuzzy and exact query tokens")]
struct Cli {
    /// Query tokens (`|` joins the next token into the previous group)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    tokens: Vec<String>,

    /// Directory to scan for candidate files
    #[arg(short, long, conflicts_with = "cmd")]
    dir: Option<PathBuf>,

    /// Shell command whose output lines are the candidates
    #[arg(short, long)]
    cmd: Option<String>,

    /// Maximum number of candidate lines to read
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Deadline for --cmd in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Seed for predicate colors
    #[arg(long)]
    seed: Option<u64>,

    /// When to color stdout
    #[arg(long, value_enum, default_value_t = ColorMode::Always)]
    color: ColorMode,

    /// Evaluate lines on a single thread
    #[arg(long)]
    sequential: bool,

    /// Honour .gitignore files when scanning a directory
    #[arg(long)]
    gitignore: bool,

    /// Do not write the highlight document to stderr
    #[arg(long)]
    no_document: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn choice(self) -> ColorChoice {
        match self {
            ColorMode::Auto if io::stdout().is_terminal() => ColorChoice::Auto,
            ColorMode::Auto | ColorMode::Never => ColorChoice::Never,
            ColorMode::Always => ColorChoice::Always,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "off" };
    let filter = EnvFilter::try_from_env("FZR_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> Result<()> {
    let mut cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = AppConfig::load()?;
    if let Some(limit) = cli.limit {
        config.max_lines = limit;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.command_timeout_ms = timeout_ms;
    }
    if cli.sequential {
        config.parallel = false;
    }
    if cli.gitignore {
        config.respect_gitignore = true;
    }

    let source = match LineSource::resolve(
        cli.cmd.take(),
        cli.dir.take(),
        io::stdin().is_terminal(),
        &mut cli.tokens,
    ) {
        Ok(source) => source,
        Err(e @ FilterError::MissingInput) => Cli::command()
            .error(ErrorKind::MissingRequiredArgument, e)
            .exit(),
        Err(e) => return Err(e.into()),
    };

    let options = ReadOptions {
        max_lines: config.max_lines,
        cap_stdin: cli.limit.is_some(),
        timeout: config.command_timeout(),
        respect_gitignore: config.respect_gitignore,
    };
    let lines = source::read_lines(&source, &options)?;

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let plan = FilterPlan::from_tokens(&cli.tokens, rng);
    let ranked = LineFilter::new(&plan).parallel(config.parallel).run(&lines);

    output::print_colored(&ranked, cli.color.choice()).context("Failed to write results")?;
    if !cli.no_document {
        output::write_document(io::stderr().lock(), &ranked)
            .context("Failed to write highlight document")?;
    }

    Ok(())
}
