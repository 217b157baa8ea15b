//! Implementation of the `pocat check` command.

use std::path::PathBuf;

use owo_colors::OwoColorize;
use pocat::Catalog;
use serde::Serialize;

use super::read_catalog;

/// Arguments for the check command.
#[derive(Debug, clap::Args)]
pub struct CheckArgs {
    /// Catalog files to check (.po)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for one checked file.
#[derive(Debug, Serialize)]
struct CheckResult {
    file: String,
    ok: bool,
    messages: Option<usize>,
    error: Option<String>,
}

/// Run the check command.
///
/// Every file is checked even after a failure. Unreadable files take
/// precedence over parse failures in the exit code.
pub fn run_check(args: CheckArgs) -> miette::Result<i32> {
    let mut results = Vec::with_capacity(args.files.len());
    let mut code = exitcode::OK;

    for path in &args.files {
        let file = path.display().to_string();
        match read_catalog(path) {
            Ok(catalog) => {
                if !args.json {
                    print_ok(&file, &catalog);
                }
                results.push(CheckResult {
                    file,
                    ok: true,
                    messages: Some(catalog.len()),
                    error: None,
                });
            }
            Err(failure) => {
                if code != exitcode::NOINPUT {
                    code = failure.code;
                }
                let error = failure.report.to_string();
                if !args.json {
                    eprintln!("{:?}", failure.report);
                }
                results.push(CheckResult {
                    file,
                    ok: false,
                    messages: None,
                    error: Some(error),
                });
            }
        }
    }

    if args.json {
        let output = serde_json::to_string_pretty(&results)
            .map_err(|e| miette::miette!("Failed to serialize results: {}", e))?;
        println!("{}", output);
    }
    Ok(code)
}

fn print_ok(file: &str, catalog: &Catalog) {
    println!(
        "{} {} ({} messages)",
        "ok".green().bold(),
        file,
        catalog.len()
    );
}
