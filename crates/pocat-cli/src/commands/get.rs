//! Implementation of the `pocat get` command.

use std::path::PathBuf;

use miette::IntoDiagnostic;
use owo_colors::OwoColorize;
use pocat::{Catalog, Entry};
use serde::Serialize;

use super::{read_catalog, report_failure};

/// Arguments for the get command.
#[derive(Debug, clap::Args)]
pub struct GetArgs {
    /// Catalog file (.po)
    pub file: PathBuf,

    /// Message-id to look up
    #[arg(long)]
    pub msgid: String,

    /// Message context (msgctxt)
    #[arg(long)]
    pub context: Option<String>,

    /// Plural message-id, used as the fallback when the count is not 1
    #[arg(long)]
    pub plural: Option<String>,

    /// Count used to select the plural form
    #[arg(long)]
    pub count: Option<u64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for a lookup.
#[derive(Debug, Serialize)]
struct GetJson<'a> {
    msgid: &'a str,
    context: Option<&'a str>,
    translation: &'a str,
    fallback: bool,
    plural_index: Option<usize>,
    suggestions: Vec<String>,
}

/// Run the get command.
///
/// A miss is not an error: the source string is printed and the exit code
/// stays OK.
pub fn run_get(args: GetArgs) -> miette::Result<i32> {
    let catalog = match read_catalog(&args.file) {
        Ok(catalog) => catalog,
        Err(failure) => return Ok(report_failure(failure)),
    };

    let context = args.context.as_deref();
    let translation = translate(&catalog, &args);
    let fallback = !catalog
        .entry(context, &args.msgid)
        .is_some_and(Entry::is_usable);
    let suggestions = if fallback {
        catalog.suggest(&args.msgid)
    } else {
        Vec::new()
    };
    let plural_index = args.count.map(|n| catalog.plural_index(n));

    if args.json {
        let output = GetJson {
            msgid: &args.msgid,
            context,
            translation,
            fallback,
            plural_index,
            suggestions,
        };
        println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
        return Ok(exitcode::OK);
    }

    println!("{}", translation);
    if fallback {
        eprintln!(
            "{} no usable translation, showing the source string",
            "note:".yellow().bold()
        );
        if !suggestions.is_empty() {
            eprintln!("{} did you mean: {}", "help:".cyan().bold(), suggestions.join(", "));
        }
    }
    Ok(exitcode::OK)
}

fn translate<'a>(catalog: &'a Catalog, args: &'a GetArgs) -> &'a str {
    let msgid = args.msgid.as_str();
    let n = args.count.unwrap_or(1);
    match (&args.plural, &args.context) {
        (Some(plural), Some(context)) => catalog.npgettext(context, msgid, plural, n),
        (Some(plural), None) => catalog.ngettext(msgid, plural, n),
        (None, Some(context)) => catalog.pgettext(context, msgid),
        (None, None) if args.count.is_some() => catalog.lookup_plural(msgid, n),
        (None, None) => catalog.gettext(msgid),
    }
}
