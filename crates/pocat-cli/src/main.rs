//! pocat CLI entry point.
//!
//! Provides command-line tools for gettext `.po` catalogs:
//! - `pocat check` - Validate catalogs, reporting the failing line
//! - `pocat stats` - Translation progress per file
//! - `pocat fuzzy` - List entries waiting for review
//! - `pocat lint` - Report catalog problems
//! - `pocat get` - Look up a single message
//! - `pocat fmt` - Rewrite catalogs in canonical form

mod commands;
mod config;
mod output;

use std::io;
use std::path::PathBuf;
use std::process::exit;

use clap::{Parser, Subcommand, ValueEnum};
use commands::{
    run_check, run_fmt, run_fuzzy, run_get, run_lint, run_stats, CheckArgs, FilesArgs, FmtArgs,
    GetArgs, LintArgs,
};
use config::Config;
use tracing_subscriber::EnvFilter;

/// gettext catalog tools.
#[derive(Debug, Parser)]
#[command(name = "pocat")]
#[command(about = "gettext .po catalog tools", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Color output control
    #[arg(long, value_enum, default_value_t = ColorWhen::Auto, global = true)]
    pub color: ColorWhen,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to ./pocat.toml when present)
    #[arg(long, global = true, env = "POCAT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// When to use colored output.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check that catalogs load
    Check(CheckArgs),
    /// Report translation progress
    Stats(FilesArgs),
    /// List fuzzy entries
    Fuzzy(FilesArgs),
    /// Report lint warnings
    Lint(LintArgs),
    /// Look up a message in a catalog
    Get(GetArgs),
    /// Rewrite catalogs in canonical form
    Fmt(FmtArgs),
}

/// Set up color output based on user preference.
fn setup_colors(color_when: ColorWhen) {
    match color_when {
        ColorWhen::Auto => {
            // owo-colors automatically checks TTY, NO_COLOR, FORCE_COLOR
        }
        ColorWhen::Always => {
            owo_colors::set_override(true);
        }
        ColorWhen::Never => {
            owo_colors::set_override(false);
        }
    }
}

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    setup_colors(cli.color);
    setup_logging(cli.verbose);

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))?;

    let config = Config::load(cli.config.as_deref())?;
    tracing::debug!(?config, "configuration loaded");

    let result = match cli.command {
        Commands::Check(args) => run_check(args),
        Commands::Stats(args) => run_stats(args, &config),
        Commands::Fuzzy(args) => run_fuzzy(args),
        Commands::Lint(args) => run_lint(args, &config),
        Commands::Get(args) => run_get(args),
        Commands::Fmt(args) => run_fmt(args, &config),
    };

    match result {
        Ok(code) => exit(code),
        Err(e) => {
            eprintln!("{:?}", e);
            exit(exitcode::SOFTWARE);
        }
    }
}
