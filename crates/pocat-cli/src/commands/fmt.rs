//! Implementation of the `pocat fmt` command.

use std::fs;
use std::path::PathBuf;

use miette::miette;
use owo_colors::OwoColorize;
use pocat::FormatOptions;

use super::{read_catalog_bytes, report_failure};
use crate::config::Config;

/// Arguments for the fmt command.
#[derive(Debug, clap::Args)]
pub struct FmtArgs {
    /// Catalog files to format (.po)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Maximum line width (overrides the config file)
    #[arg(long, conflicts_with = "no_wrap")]
    pub width: Option<usize>,

    /// Never wrap long strings
    #[arg(long)]
    pub no_wrap: bool,

    /// Report files that would change without writing them
    #[arg(long)]
    pub check: bool,
}

impl FmtArgs {
    fn options(&self, config: &Config) -> FormatOptions {
        if self.no_wrap {
            return FormatOptions::no_wrap();
        }
        FormatOptions {
            width: self.width.or(config.wrap_width),
        }
    }
}

/// Run the fmt command.
pub fn run_fmt(args: FmtArgs, config: &Config) -> miette::Result<i32> {
    let options = args.options(config);
    let mut changed = 0;

    for path in &args.files {
        let (catalog, original) = match read_catalog_bytes(path) {
            Ok(loaded) => loaded,
            Err(failure) => return Ok(report_failure(failure)),
        };
        let formatted = catalog.to_bytes(&options);
        if formatted == original {
            continue;
        }
        changed += 1;
        if args.check {
            println!("{} {}", "would reformat".yellow(), path.display());
        } else {
            fs::write(path, &formatted)
                .map_err(|e| miette!("Cannot write {}: {}", path.display(), e))?;
            tracing::info!(path = %path.display(), "reformatted catalog");
            println!("{} {}", "formatted".green(), path.display());
        }
    }

    if args.check && changed > 0 {
        Ok(exitcode::DATAERR)
    } else {
        Ok(exitcode::OK)
    }
}
