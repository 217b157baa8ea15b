//! Serializes catalogs back to `.po` text.
//!
//! Output follows the layout `msgmerge` produces: comments in a fixed
//! order, then the keyword lines. Long strings are split into quoted
//! continuation lines at word boundaries, and strings with embedded
//! newlines always break after each `\n` and start with an empty `""`.

use std::mem;

use unicode_segmentation::UnicodeSegmentation;

use crate::catalog::Catalog;
use crate::parser::escape::escape;
use crate::types::{Entry, Flag, SourceRef};

/// Column limit used by `msgmerge` and `msgcat`.
pub const DEFAULT_WIDTH: usize = 79;

/// Output options for [`format_catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// Maximum line width in characters. `None` keeps every string on one line
    /// (except for breaks after embedded newlines).
    pub width: Option<usize>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            width: Some(DEFAULT_WIDTH),
        }
    }
}

impl FormatOptions {
    /// Options that never wrap long lines.
    pub fn no_wrap() -> Self {
        FormatOptions { width: None }
    }
}

/// Formats a complete catalog: the header, then every entry in file order,
/// separated by blank lines.
///
/// ```
/// use pocat::{Catalog, FormatOptions, format_catalog};
///
/// let catalog = Catalog::parse("msgid \"Yes\"\nmsgstr \"はい\"\n").unwrap();
/// let text = format_catalog(&catalog, &FormatOptions::default());
///
/// assert!(text.ends_with("msgid \"Yes\"\nmsgstr \"はい\"\n"));
/// assert_eq!(Catalog::parse(&text).unwrap().gettext("Yes"), "はい");
/// ```
pub fn format_catalog(catalog: &Catalog, options: &FormatOptions) -> String {
    let nplurals = catalog.plural_forms().nplurals();
    let mut blocks = vec![format_entry(&catalog.header().to_entry(), options, nplurals)];
    blocks.extend(
        catalog
            .entries()
            .iter()
            .map(|entry| format_entry(entry, options, nplurals)),
    );
    blocks.join("\n")
}

/// Formats one entry block, ending with a newline.
///
/// `nplurals` is the number of empty `msgstr[i]` lines written for an
/// untranslated plural entry that has no variants at all.
pub fn format_entry(entry: &Entry, options: &FormatOptions, nplurals: usize) -> String {
    let mut out = String::new();
    let width = if entry.has_flag(Flag::NO_WRAP) {
        None
    } else {
        options.width
    };

    for comment in &entry.translator_comments {
        push_comment(&mut out, "#", comment);
    }
    for comment in &entry.extracted_comments {
        push_comment(&mut out, "#.", comment);
    }
    write_references(&mut out, &entry.references, width);
    if !entry.flags.is_empty() {
        let flags: Vec<&str> = entry.flags.iter().map(Flag::as_str).collect();
        out.push_str("#, ");
        out.push_str(&flags.join(", "));
        out.push('\n');
    }

    let previous_prefix = if entry.obsolete { "#~| " } else { "#| " };
    if let Some(context) = &entry.previous_context {
        write_string(&mut out, previous_prefix, "msgctxt", context, width);
    }
    if let Some(msgid) = &entry.previous_msgid {
        write_string(&mut out, previous_prefix, "msgid", msgid, width);
    }
    if let Some(plural) = &entry.previous_msgid_plural {
        write_string(&mut out, previous_prefix, "msgid_plural", plural, width);
    }

    let prefix = if entry.obsolete { "#~ " } else { "" };
    if let Some(context) = &entry.context {
        write_string(&mut out, prefix, "msgctxt", context, width);
    }
    write_string(&mut out, prefix, "msgid", &entry.msgid, width);
    match &entry.msgid_plural {
        Some(plural) => {
            write_string(&mut out, prefix, "msgid_plural", plural, width);
            if entry.msgstr.is_empty() {
                for index in 0..nplurals.max(1) {
                    write_string(&mut out, prefix, &format!("msgstr[{index}]"), "", width);
                }
            }
            for (index, msgstr) in entry.msgstr.iter().enumerate() {
                write_string(&mut out, prefix, &format!("msgstr[{index}]"), msgstr, width);
            }
        }
        None => {
            let msgstr = entry.msgstr.first().map(String::as_str).unwrap_or_default();
            write_string(&mut out, prefix, "msgstr", msgstr, width);
        }
    }
    out
}

fn push_comment(out: &mut String, marker: &str, text: &str) {
    out.push_str(marker);
    if !text.is_empty() {
        out.push(' ');
        out.push_str(text);
    }
    out.push('\n');
}

/// Writes `#:` lines, starting a new line when the next reference would
/// overflow the width.
fn write_references(out: &mut String, references: &[SourceRef], width: Option<usize>) {
    if references.is_empty() {
        return;
    }
    let mut line = String::from("#:");
    for reference in references {
        let token = reference.to_string();
        let fits = width.is_none_or(|w| char_len(&line) + 1 + char_len(&token) <= w);
        if !fits && line != "#:" {
            out.push_str(&line);
            out.push('\n');
            line = String::from("#:");
        }
        line.push(' ');
        line.push_str(&token);
    }
    out.push_str(&line);
    out.push('\n');
}

/// Writes a keyword line followed by any continuation lines.
fn write_string(out: &mut String, prefix: &str, keyword: &str, text: &str, width: Option<usize>) {
    let escaped = escape(text);
    let single = format!("{prefix}{keyword} \"{escaped}\"");
    let pieces: Vec<&str> = text.split_inclusive('\n').collect();
    let fits = width.is_none_or(|w| char_len(&single) <= w);
    if pieces.len() <= 1 && fits {
        out.push_str(&single);
        out.push('\n');
        return;
    }

    out.push_str(prefix);
    out.push_str(keyword);
    out.push_str(" \"\"\n");
    // Two columns for the quotes.
    let available = width.map(|w| w.saturating_sub(char_len(prefix) + 2));
    for piece in pieces {
        for line in wrap_piece(piece, available) {
            out.push_str(prefix);
            out.push('"');
            out.push_str(&line);
            out.push_str("\"\n");
        }
    }
}

/// Splits one newline-terminated piece into escaped lines of at most
/// `available` characters where word boundaries allow it.
///
/// Whitespace (the trailing newline included) stays at the end of the line
/// it follows, so a continuation line never starts with a space.
fn wrap_piece(piece: &str, available: Option<usize>) -> Vec<String> {
    let Some(available) = available else {
        return vec![escape(piece)];
    };
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in piece.split_word_bounds() {
        let escaped = escape(word);
        let is_space = word.chars().all(char::is_whitespace);
        let overflows = char_len(&current) + char_len(&escaped) > available;
        if overflows && !is_space && !current.is_empty() {
            lines.push(mem::take(&mut current));
        }
        current.push_str(&escaped);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
