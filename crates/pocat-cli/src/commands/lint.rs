//! Implementation of the `pocat lint` command.

use std::path::PathBuf;

use miette::IntoDiagnostic;
use owo_colors::OwoColorize;
use pocat::lint_catalog;
use serde::Serialize;

use super::{read_catalogs, report_failure};
use crate::config::Config;

/// Arguments for the lint command.
#[derive(Debug, clap::Args)]
pub struct LintArgs {
    /// Catalog files (.po)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Exit with a non-zero code if any warning is reported
    #[arg(long)]
    pub strict: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for one warning.
#[derive(Debug, Serialize)]
struct WarningJson {
    file: String,
    warning: String,
}

/// Run the lint command.
pub fn run_lint(args: LintArgs, config: &Config) -> miette::Result<i32> {
    let catalogs = match read_catalogs(&args.files) {
        Ok(catalogs) => catalogs,
        Err(failure) => return Ok(report_failure(failure)),
    };

    let mut warnings = Vec::new();
    for (path, catalog) in &catalogs {
        let file = path.display().to_string();
        for warning in lint_catalog(catalog) {
            warnings.push(WarningJson {
                file: file.clone(),
                warning: warning.to_string(),
            });
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&warnings).into_diagnostic()?);
    } else {
        for warning in &warnings {
            println!("{}: {} {}", warning.file, "warning:".yellow().bold(), warning.warning);
        }
        if warnings.is_empty() {
            println!("{}", "no warnings".green());
        }
    }

    let strict = args.strict || config.strict_lint;
    if strict && !warnings.is_empty() {
        Ok(exitcode::DATAERR)
    } else {
        Ok(exitcode::OK)
    }
}
