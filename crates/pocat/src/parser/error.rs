//! Parse error types for `.po` catalogs.

use thiserror::Error;

/// An error that makes a catalog unloadable.
///
/// Every variant carries the 1-based line of the offending input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A syntax error with location information.
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    /// A quoted string without its closing quote.
    #[error("unterminated string at line {line}")]
    UnterminatedString { line: usize },

    /// A backslash escape gettext does not define.
    #[error("invalid escape sequence '\\{sequence}' at line {line}")]
    InvalidEscape { line: usize, sequence: String },

    /// Input ended in the middle of an entry.
    #[error("unexpected end of input at line {line}: entry has no msgstr")]
    UnexpectedEof { line: usize },

    /// The same (context, message-id) pair appears twice.
    #[error("duplicate message {} at line {line} (first defined at line {first_line})", describe(.context, .msgid))]
    DuplicateMessage {
        line: usize,
        first_line: usize,
        context: Option<String>,
        msgid: String,
    },

    /// Plural entry whose msgstr count disagrees with the header's `nplurals`.
    #[error("message '{msgid}' at line {line} has {found} plural forms, but the catalog declares nplurals={expected}")]
    PluralCountMismatch {
        line: usize,
        msgid: String,
        expected: usize,
        found: usize,
    },

    /// `msgstr[i]` without `msgid_plural`, or plain `msgstr` with it.
    #[error("message '{msgid}' at line {line}: {message}")]
    InconsistentPlural {
        line: usize,
        msgid: String,
        message: String,
    },

    /// The header's `Plural-Forms` value could not be used.
    #[error("invalid Plural-Forms at line {line}: {source}")]
    InvalidPluralForms {
        line: usize,
        source: PluralFormsError,
    },

    /// The header declares a charset with no known decoder.
    #[error("unsupported charset '{charset}' declared at line {line}")]
    UnsupportedCharset { line: usize, charset: String },

    /// The bytes are not valid in the declared charset.
    #[error("input is not valid {charset} near line {line}")]
    InvalidEncoding { line: usize, charset: String },

    /// Two different keys produced the same [`MessageId`](crate::MessageId).
    #[error("message id collision at line {line}: '{msgid}' and '{other}' hash to the same id")]
    IdCollision {
        line: usize,
        msgid: String,
        other: String,
    },
}

impl ParseError {
    /// The 1-based line the error points at.
    pub fn line(&self) -> usize {
        match self {
            ParseError::Syntax { line, .. }
            | ParseError::UnterminatedString { line }
            | ParseError::InvalidEscape { line, .. }
            | ParseError::UnexpectedEof { line }
            | ParseError::DuplicateMessage { line, .. }
            | ParseError::PluralCountMismatch { line, .. }
            | ParseError::InconsistentPlural { line, .. }
            | ParseError::InvalidPluralForms { line, .. }
            | ParseError::UnsupportedCharset { line, .. }
            | ParseError::InvalidEncoding { line, .. }
            | ParseError::IdCollision { line, .. } => *line,
        }
    }

    /// The 1-based column, when the error knows one.
    pub fn column(&self) -> Option<usize> {
        match self {
            ParseError::Syntax { column, .. } => Some(*column),
            _ => None,
        }
    }
}

fn describe(context: &Option<String>, msgid: &str) -> String {
    match context {
        Some(context) => format!("'{msgid}' (context '{context}')"),
        None => format!("'{msgid}'"),
    }
}

/// Errors in a `Plural-Forms` header value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PluralFormsError {
    #[error("missing 'nplurals='")]
    MissingNplurals,

    #[error("missing 'plural='")]
    MissingPlural,

    #[error("nplurals must be a positive integer, got '{value}'")]
    InvalidNplurals { value: String },

    #[error("unknown field '{name}'")]
    UnknownField { name: String },

    #[error("cannot parse expression '{expression}' at offset {offset}")]
    InvalidExpression { expression: String, offset: usize },

    #[error("plural expression is {len} bytes long, the limit is {limit}")]
    TooLong { len: usize, limit: usize },

    #[error("plural expression nests deeper than {limit} levels at offset {offset}")]
    TooDeep { offset: usize, limit: usize },

    #[error("plural expression yields index {index} for n={n}, but nplurals={nplurals}")]
    IndexOutOfRange { n: u64, index: u64, nplurals: usize },
}
