//! Error and warning types for catalog loading and linting.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::parser::ParseError;

/// Errors that occur while loading catalogs from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File I/O error when reading a catalog or scanning a directory.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The catalog file is malformed.
    #[error("{path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// Attempted to reload a catalog that was loaded from a string.
    #[error("cannot reload '{language}/{domain}': was loaded from string, not file")]
    NoPathForReload { language: String, domain: String },
}

impl LoadError {
    /// The parse error behind this load error, if any.
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            LoadError::Parse { source, .. } => Some(source),
            LoadError::Io { .. } | LoadError::NoPathForReload { .. } => None,
        }
    }
}

/// A non-fatal finding about a loaded catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LintWarning {
    /// Translation is flagged fuzzy and is not served to readers.
    #[error("line {line}: '{msgid}' is fuzzy and needs review")]
    Fuzzy { msgid: String, line: usize },

    /// Entry has no complete translation.
    #[error("line {line}: '{msgid}' is untranslated")]
    Untranslated { msgid: String, line: usize },

    /// Entry was commented out by a merge tool.
    #[error("line {line}: '{msgid}' is obsolete")]
    ObsoleteEntry { msgid: String, line: usize },

    /// The header has no `Language` field.
    #[error("header has no Language field")]
    MissingLanguage,

    /// `nplurals` disagrees with the CLDR plural categories of the language.
    #[error(
        "Plural-Forms declares nplurals={declared}, but CLDR defines {expected} integer plural categories for '{language}'"
    )]
    PluralCountMismatch {
        language: String,
        declared: usize,
        expected: usize,
    },

    /// Placeholders differ between source and translation.
    #[error("line {line}: '{msgid}' placeholders do not match the source ({flag}): expected [{}], found [{}]", expected.join(", "), found.join(", "))]
    FormatMismatch {
        msgid: String,
        line: usize,
        flag: String,
        expected: Vec<String>,
        found: Vec<String>,
    },
}

/// Minimum similarity for a message-id to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.7;

/// Maximum number of suggestions returned.
const MAX_SUGGESTIONS: usize = 3;

/// Rank `available` keys by similarity to `key`, closest first.
///
/// ```
/// use pocat::compute_suggestions;
///
/// let suggestions = compute_suggestions("Instalation", &["Installing", "Installation", "Quickstart"]);
/// assert_eq!(suggestions.first().map(String::as_str), Some("Installation"));
/// ```
pub fn compute_suggestions(key: &str, available: &[&str]) -> Vec<String> {
    let mut scored: Vec<(f64, &str)> = available
        .iter()
        .filter(|candidate| !candidate.is_empty() && **candidate != key)
        .map(|candidate| (strsim::normalized_levenshtein(key, candidate), *candidate))
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}
