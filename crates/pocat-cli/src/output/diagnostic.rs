//! Miette diagnostic wrapper for catalog parse errors.

use std::path::Path;

use miette::{Diagnostic, NamedSource, SourceSpan};
use pocat::ParseError;
use thiserror::Error;

/// A miette-compatible diagnostic for catalog parse errors.
///
/// Note: Fields are read by miette derive macros, not directly by code.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(pocat::parse))]
pub struct PoDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    message: String,

    #[help]
    help: Option<String>,
}

impl PoDiagnostic {
    /// Create a diagnostic from a ParseError with source context.
    ///
    /// Errors without a column label the whole line.
    pub fn from_parse_error(path: &Path, content: &str, err: &ParseError) -> Self {
        let line = err.line().max(1);
        let line_start = content
            .split_inclusive('\n')
            .take(line - 1)
            .map(str::len)
            .sum::<usize>()
            .min(content.len());
        let line_text = content[line_start..].lines().next().unwrap_or_default();

        let span = match err.column() {
            Some(column) => {
                let offset = line_start + byte_offset(line_text, column.saturating_sub(1));
                (offset, 1)
            }
            None => (line_start, line_text.len()),
        };

        PoDiagnostic {
            src: NamedSource::new(path.display().to_string(), content.to_string()),
            span: span.into(),
            message: err.to_string(),
            help: help_for(err),
        }
    }
}

/// Byte offset of the character at `column` (0-based) within a line.
fn byte_offset(line: &str, column: usize) -> usize {
    line.char_indices()
        .nth(column)
        .map_or(line.len(), |(offset, _)| offset)
}

fn help_for(err: &ParseError) -> Option<String> {
    match err {
        ParseError::DuplicateMessage { first_line, .. } => Some(format!(
            "remove one of the entries or give them different msgctxt values (first entry is at line {first_line})"
        )),
        ParseError::PluralCountMismatch { expected, .. } => Some(format!(
            "add msgstr[0] through msgstr[{}]",
            expected.saturating_sub(1)
        )),
        ParseError::UnterminatedString { .. } => {
            Some("close the string with '\"' on the same line".to_string())
        }
        ParseError::UnexpectedEof { .. } => Some("add a msgstr line".to_string()),
        ParseError::UnsupportedCharset { .. } => {
            Some("declare a charset such as UTF-8 in the Content-Type header".to_string())
        }
        _ => None,
    }
}
