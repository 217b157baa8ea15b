//! Implementation of the `pocat fuzzy` command.

use miette::IntoDiagnostic;
use owo_colors::OwoColorize;
use pocat::Entry;
use serde::Serialize;

use super::{read_catalogs, report_failure, FilesArgs};

/// JSON output for one fuzzy entry.
#[derive(Debug, Serialize)]
struct FuzzyJson<'a> {
    file: String,
    line: usize,
    context: Option<&'a str>,
    msgid: &'a str,
    msgstr: &'a [String],
    previous_msgid: Option<&'a str>,
    references: Vec<String>,
}

/// Run the fuzzy command.
pub fn run_fuzzy(args: FilesArgs) -> miette::Result<i32> {
    let catalogs = match read_catalogs(&args.files) {
        Ok(catalogs) => catalogs,
        Err(failure) => return Ok(report_failure(failure)),
    };

    let mut json = Vec::new();
    for (path, catalog) in &catalogs {
        let file = path.display().to_string();
        for entry in catalog.fuzzy_entries() {
            if args.json {
                json.push(to_json(&file, entry));
            } else {
                print_entry(&file, entry);
            }
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&json).into_diagnostic()?);
    }
    Ok(exitcode::OK)
}

fn to_json<'a>(file: &str, entry: &'a Entry) -> FuzzyJson<'a> {
    FuzzyJson {
        file: file.to_string(),
        line: entry.line,
        context: entry.context.as_deref(),
        msgid: &entry.msgid,
        msgstr: &entry.msgstr,
        previous_msgid: entry.previous_msgid.as_deref(),
        references: entry.references.iter().map(ToString::to_string).collect(),
    }
}

fn print_entry(file: &str, entry: &Entry) {
    let location = format!("{}:{}", file, entry.line);
    match &entry.context {
        Some(context) => println!("{} [{}] {}", location.cyan(), context, entry.msgid),
        None => println!("{} {}", location.cyan(), entry.msgid),
    }
    if let Some(previous) = &entry.previous_msgid {
        println!("    {} {}", "was:".dimmed(), previous);
    }
    for reference in &entry.references {
        println!("    {} {}", "at:".dimmed(), reference);
    }
}
