//! `.po` file parser.
//!
//! Parses catalog text into entries. The format is line oriented: each line
//! is lexed on its own, then a small state machine groups lines into
//! entries.

use std::mem;

use winnow::ascii::{digit1, space1};
use winnow::combinator::{alt, delimited, opt, preceded, repeat};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{any, take_while};

use super::error::ParseError;
use super::escape::unescape;
use crate::types::{Entry, Flag, SourceRef};

/// Parse catalog text into entries, header included, in file order.
///
/// Only syntax is checked here. Use [`Catalog::parse`](crate::Catalog::parse)
/// to also validate duplicates and plural forms.
///
/// ```
/// use pocat::parser::parse_entries;
///
/// let entries = parse_entries("msgid \"Introduction\"\nmsgstr \"はじめに\"\n").unwrap();
/// assert_eq!(entries.len(), 1);
/// assert_eq!(entries[0].msgstr, vec!["はじめに"]);
/// ```
pub fn parse_entries(input: &str) -> Result<Vec<Entry>, ParseError> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut state = EntryState::default();
    for (index, text) in input.lines().enumerate() {
        let number = index + 1;
        let line = lex_line(text, number)?;
        state.accept(line, number)?;
    }
    state.finish()
}

/// Where a keyword or string line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Active,
    Obsolete,
    Previous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    Msgctxt,
    Msgid,
    MsgidPlural,
    Msgstr(Option<usize>),
}

/// One lexed line.
#[derive(Debug)]
enum Line<'a> {
    Blank,
    Translator(&'a str),
    Extracted(&'a str),
    References(&'a str),
    Flags(&'a str),
    Keyword {
        origin: Origin,
        keyword: Keyword,
        value: String,
    },
    Continuation {
        origin: Origin,
        value: String,
    },
}

/// Lex a single line of input.
fn lex_line(text: &str, line: usize) -> Result<Line<'_>, ParseError> {
    // Trailing whitespace is only dropped for keyword lines; comment text keeps it.
    let trimmed = text.trim_start();
    let indent = text.len() - trimmed.len();

    if trimmed.trim_end().is_empty() {
        return Ok(Line::Blank);
    }
    if let Some(rest) = trimmed.strip_prefix("#~") {
        let rest_trimmed = rest.trim_start();
        let offset = indent + trimmed.len() - rest_trimmed.len();
        if rest_trimmed.trim_end().is_empty() {
            return Ok(Line::Blank);
        }
        return match rest_trimmed.strip_prefix('|') {
            Some(previous) => {
                let previous_trimmed = previous.trim_start();
                let offset = offset + rest_trimmed.len() - previous_trimmed.len();
                lex_value_line(previous_trimmed, line, offset, Origin::Previous)
            }
            None => lex_value_line(rest_trimmed, line, offset, Origin::Obsolete),
        };
    }
    if let Some(rest) = trimmed.strip_prefix("#|") {
        let rest_trimmed = rest.trim_start();
        let offset = indent + trimmed.len() - rest_trimmed.len();
        return lex_value_line(rest_trimmed, line, offset, Origin::Previous);
    }
    if let Some(rest) = trimmed.strip_prefix("#:") {
        return Ok(Line::References(rest.trim()));
    }
    if let Some(rest) = trimmed.strip_prefix("#,") {
        return Ok(Line::Flags(rest.trim()));
    }
    if let Some(rest) = trimmed.strip_prefix("#.") {
        return Ok(Line::Extracted(comment_text(rest)));
    }
    if let Some(rest) = trimmed.strip_prefix('#') {
        return Ok(Line::Translator(comment_text(rest)));
    }
    lex_value_line(trimmed.trim_end(), line, indent, Origin::Active)
}

/// Comment text after the marker, without the single separating space.
fn comment_text(rest: &str) -> &str {
    rest.strip_prefix(' ').unwrap_or(rest)
}

/// Lex a keyword line (`msgid "..."`) or a bare string continuation line.
fn lex_value_line(
    text: &str,
    line: usize,
    offset: usize,
    origin: Origin,
) -> Result<Line<'static>, ParseError> {
    let mut remaining = text;

    let keyword = if text.starts_with('"') {
        None
    } else {
        let keyword = keyword_token(&mut remaining).map_err(|_| ParseError::Syntax {
            line,
            column: offset + 1,
            message: format!("expected a keyword or a quoted string, found '{text}'"),
        })?;
        let spaced: ModalResult<&str> = space1.parse_next(&mut remaining);
        if spaced.is_err() {
            return Err(ParseError::Syntax {
                line,
                column: offset + text.len() - remaining.len() + 1,
                message: "expected whitespace before the quoted string".to_string(),
            });
        }
        Some(keyword)
    };

    let column = offset + text.len() - remaining.len() + 1;
    let raw = quoted_string(&mut remaining, line, column)?;
    if !remaining.trim().is_empty() {
        return Err(ParseError::Syntax {
            line,
            column: offset + text.len() - remaining.trim_start().len() + 1,
            message: format!("unexpected text after string: '{}'", remaining.trim()),
        });
    }
    let value = unescape(raw, line)?;

    Ok(match keyword {
        Some(keyword) => Line::Keyword {
            origin,
            keyword,
            value,
        },
        None => Line::Continuation { origin, value },
    })
}

/// Parse a keyword, including the `[N]` index of `msgstr[N]`.
fn keyword_token(input: &mut &str) -> ModalResult<Keyword> {
    alt((
        "msgctxt".value(Keyword::Msgctxt),
        "msgid_plural".value(Keyword::MsgidPlural),
        "msgid".value(Keyword::Msgid),
        preceded(
            "msgstr",
            opt(delimited('[', digit1.try_map(str::parse::<usize>), ']')),
        )
        .map(Keyword::Msgstr),
    ))
    .parse_next(input)
}

/// Parse a double-quoted string, returning the raw body with escapes intact.
fn quoted_string<'i>(input: &mut &'i str, line: usize, column: usize) -> Result<&'i str, ParseError> {
    let start = *input;
    let opened: Result<char, ErrMode<ContextError>> = '"'.parse_next(input);
    if opened.is_err() {
        return Err(ParseError::Syntax {
            line,
            column,
            message: "expected '\"'".to_string(),
        });
    }
    let body_start = *input;
    let _: ModalResult<Vec<()>> = repeat(
        0..,
        alt((
            ('\\', any).void(),
            take_while(1.., |c: char| c != '"' && c != '\\').void(),
        )),
    )
    .parse_next(input);
    let body = &body_start[..body_start.len() - input.len()];
    let closed: Result<char, ErrMode<ContextError>> = '"'.parse_next(input);
    if closed.is_err() {
        *input = start;
        return Err(ParseError::UnterminatedString { line });
    }
    Ok(body)
}

/// Which string field continuation lines append to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Context,
    Msgid,
    MsgidPlural,
    Msgstr(usize),
    PreviousContext,
    PreviousMsgid,
    PreviousMsgidPlural,
}

/// Groups lexed lines into entries.
#[derive(Debug, Default)]
struct EntryState {
    entries: Vec<Entry>,
    current: Entry,
    has_msgid: bool,
    last: Option<Field>,
    last_previous: Option<Field>,
}

impl EntryState {
    fn accept(&mut self, line: Line<'_>, number: usize) -> Result<(), ParseError> {
        match line {
            Line::Blank => {
                if self.is_complete() {
                    self.flush();
                }
            }
            Line::Translator(text) => {
                self.flush_if_complete();
                self.current.translator_comments.push(text.to_string());
            }
            Line::Extracted(text) => {
                self.flush_if_complete();
                self.current.extracted_comments.push(text.to_string());
            }
            Line::References(text) => {
                self.flush_if_complete();
                self.current.references.extend(SourceRef::parse_line(text));
            }
            Line::Flags(text) => {
                self.flush_if_complete();
                self.current.flags.extend(
                    text.split(',')
                        .map(str::trim)
                        .filter(|flag| !flag.is_empty())
                        .map(Flag::from),
                );
            }
            Line::Keyword {
                origin: Origin::Previous,
                keyword,
                value,
            } => {
                self.flush_if_complete();
                self.previous_keyword(keyword, value, number)?;
            }
            Line::Continuation {
                origin: Origin::Previous,
                value,
            } => {
                let Some(field) = self.last_previous else {
                    return Err(continuation_error(number));
                };
                self.append(field, &value);
            }
            Line::Keyword {
                origin,
                keyword,
                value,
            } => self.keyword(origin, keyword, value, number)?,
            Line::Continuation { value, .. } => {
                let Some(field) = self.last else {
                    return Err(continuation_error(number));
                };
                self.append(field, &value);
            }
        }
        Ok(())
    }

    fn keyword(
        &mut self,
        origin: Origin,
        keyword: Keyword,
        value: String,
        number: usize,
    ) -> Result<(), ParseError> {
        match keyword {
            Keyword::Msgctxt => {
                self.flush_if_complete();
                if self.has_msgid || self.current.context.is_some() {
                    return Err(syntax(number, "unexpected msgctxt: previous entry has no msgstr"));
                }
                self.current.context = Some(value);
                self.current.obsolete = origin == Origin::Obsolete;
                self.last = Some(Field::Context);
            }
            Keyword::Msgid => {
                self.flush_if_complete();
                if self.has_msgid {
                    return Err(syntax(number, "unexpected msgid: previous entry has no msgstr"));
                }
                self.current.msgid = value;
                self.current.line = number;
                self.current.obsolete = origin == Origin::Obsolete;
                self.has_msgid = true;
                self.last = Some(Field::Msgid);
            }
            Keyword::MsgidPlural => {
                if !self.has_msgid || !self.current.msgstr.is_empty() {
                    return Err(syntax(number, "msgid_plural must directly follow msgid"));
                }
                if self.current.msgid_plural.is_some() {
                    return Err(syntax(number, "duplicate msgid_plural"));
                }
                self.current.msgid_plural = Some(value);
                self.last = Some(Field::MsgidPlural);
            }
            Keyword::Msgstr(index) => {
                if !self.has_msgid {
                    return Err(syntax(number, "msgstr without a preceding msgid"));
                }
                let indexed = index.is_some();
                if indexed != self.current.msgid_plural.is_some() {
                    let message = if indexed {
                        "msgstr[N] requires msgid_plural"
                    } else {
                        "plural entry requires msgstr[N] instead of msgstr"
                    };
                    return Err(ParseError::InconsistentPlural {
                        line: number,
                        msgid: self.current.msgid.clone(),
                        message: message.to_string(),
                    });
                }
                let expected = self.current.msgstr.len();
                match index {
                    Some(i) if i != expected => {
                        return Err(syntax(
                            number,
                            &format!("expected msgstr[{expected}], found msgstr[{i}]"),
                        ));
                    }
                    None if expected > 0 => {
                        return Err(syntax(number, "duplicate msgstr"));
                    }
                    _ => {}
                }
                self.current.msgstr.push(value);
                self.last = Some(Field::Msgstr(expected));
            }
        }
        Ok(())
    }

    fn previous_keyword(
        &mut self,
        keyword: Keyword,
        value: String,
        number: usize,
    ) -> Result<(), ParseError> {
        let field = match keyword {
            Keyword::Msgctxt => Field::PreviousContext,
            Keyword::Msgid => Field::PreviousMsgid,
            Keyword::MsgidPlural => Field::PreviousMsgidPlural,
            Keyword::Msgstr(_) => {
                return Err(syntax(number, "msgstr is not allowed in a '#|' comment"));
            }
        };
        let slot = match field {
            Field::PreviousContext => &mut self.current.previous_context,
            Field::PreviousMsgidPlural => &mut self.current.previous_msgid_plural,
            _ => &mut self.current.previous_msgid,
        };
        *slot = Some(value);
        self.last_previous = Some(field);
        Ok(())
    }

    fn append(&mut self, field: Field, value: &str) {
        let target = match field {
            Field::Context => self.current.context.get_or_insert_with(String::new),
            Field::Msgid => &mut self.current.msgid,
            Field::MsgidPlural => self.current.msgid_plural.get_or_insert_with(String::new),
            Field::Msgstr(index) => match self.current.msgstr.get_mut(index) {
                Some(target) => target,
                None => return,
            },
            Field::PreviousContext => self.current.previous_context.get_or_insert_with(String::new),
            Field::PreviousMsgid => self.current.previous_msgid.get_or_insert_with(String::new),
            Field::PreviousMsgidPlural => self
                .current
                .previous_msgid_plural
                .get_or_insert_with(String::new),
        };
        target.push_str(value);
    }

    fn is_complete(&self) -> bool {
        self.has_msgid && !self.current.msgstr.is_empty()
    }

    fn flush_if_complete(&mut self) {
        if self.is_complete() {
            self.flush();
        }
    }

    fn flush(&mut self) {
        let entry = mem::take(&mut self.current);
        self.entries.push(entry);
        self.has_msgid = false;
        self.last = None;
        self.last_previous = None;
    }

    fn finish(mut self) -> Result<Vec<Entry>, ParseError> {
        if self.is_complete() {
            self.flush();
        } else if self.has_msgid {
            return Err(ParseError::UnexpectedEof {
                line: self.current.line,
            });
        } else if self.current != Entry::default() {
            tracing::trace!("dropping trailing comments without an entry");
        }
        Ok(self.entries)
    }
}

fn syntax(line: usize, message: &str) -> ParseError {
    ParseError::Syntax {
        line,
        column: 1,
        message: message.to_string(),
    }
}

fn continuation_error(line: usize) -> ParseError {
    syntax(line, "string continuation without a preceding keyword")
}
