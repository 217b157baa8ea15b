//! Implementation of the `pocat stats` command.

use miette::IntoDiagnostic;
use pocat::CatalogStats;
use serde::Serialize;

use super::{read_catalogs, report_failure, FilesArgs};
use crate::config::Config;
use crate::output::table::{format_stats_table, FileStats};

/// JSON output for one file.
#[derive(Debug, Serialize)]
struct StatsJson {
    file: String,
    language: Option<String>,
    #[serde(flatten)]
    stats: CatalogStats,
    percent_translated: f64,
}

/// Run the stats command.
pub fn run_stats(args: FilesArgs, config: &Config) -> miette::Result<i32> {
    let catalogs = match read_catalogs(&args.files) {
        Ok(catalogs) => catalogs,
        Err(failure) => return Ok(report_failure(failure)),
    };

    let rows: Vec<FileStats> = catalogs
        .iter()
        .map(|(path, catalog)| FileStats {
            file: path.display().to_string(),
            language: catalog.language().map(str::to_string),
            stats: catalog.stats(),
        })
        .collect();

    if args.json {
        let json: Vec<StatsJson> = rows
            .iter()
            .map(|row| StatsJson {
                file: row.file.clone(),
                language: row.language.clone(),
                stats: row.stats,
                percent_translated: row.stats.percent_translated(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&json).into_diagnostic()?);
    } else {
        if let Some(source) = &config.source_language {
            println!("Source language: {}", source);
        }
        println!("{}", format_stats_table(&rows));
    }
    Ok(exitcode::OK)
}
