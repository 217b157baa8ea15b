//! Lint rules for loaded catalogs.
//!
//! Lint never rejects a catalog; it reports entries that translation
//! tooling should look at: unreviewed (fuzzy) and untranslated entries,
//! header problems, and translations whose format placeholders drift from
//! the source string.

use crate::catalog::cldr::cldr_plural_count;
use crate::catalog::error::LintWarning;
use crate::catalog::store::Catalog;
use crate::types::Entry;

/// Runs every lint rule over a catalog, returning warnings in file order
/// after the header warnings.
pub fn lint_catalog(catalog: &Catalog) -> Vec<LintWarning> {
    let mut warnings = Vec::new();
    lint_header(catalog, &mut warnings);
    for entry in catalog.entries() {
        lint_entry(entry, &mut warnings);
    }
    warnings
}

fn lint_header(catalog: &Catalog, warnings: &mut Vec<LintWarning>) {
    let Some(language) = catalog.language() else {
        warnings.push(LintWarning::MissingLanguage);
        return;
    };
    let declared = catalog.plural_forms().nplurals();
    if let Some(expected) = cldr_plural_count(language) {
        if expected != declared {
            warnings.push(LintWarning::PluralCountMismatch {
                language: language.to_string(),
                declared,
                expected,
            });
        }
    }
}

fn lint_entry(entry: &Entry, warnings: &mut Vec<LintWarning>) {
    if entry.obsolete {
        warnings.push(LintWarning::ObsoleteEntry {
            msgid: entry.msgid.clone(),
            line: entry.line,
        });
        return;
    }
    if entry.is_fuzzy() {
        warnings.push(LintWarning::Fuzzy {
            msgid: entry.msgid.clone(),
            line: entry.line,
        });
        return;
    }
    if !entry.is_translated() {
        warnings.push(LintWarning::Untranslated {
            msgid: entry.msgid.clone(),
            line: entry.line,
        });
        return;
    }
    lint_format(entry, warnings);
}

/// Compares placeholders for entries carrying a `*-format` flag.
///
/// Singular entries must use exactly the source's placeholders. Plural
/// variants may drop placeholders (a singular form often spells out the
/// count) but must not introduce ones the plural source lacks.
fn lint_format(entry: &Entry, warnings: &mut Vec<LintWarning>) {
    for flag in &entry.flags {
        let Some(language) = flag.format_language() else {
            continue;
        };
        let Some(extract) = placeholder_extractor(language) else {
            continue;
        };

        match &entry.msgid_plural {
            None => {
                let expected = extract(&entry.msgid);
                let found = entry.msgstr.first().map(|s| extract(s)).unwrap_or_default();
                if expected != found {
                    warnings.push(format_mismatch(entry, flag.as_str(), expected, found));
                }
            }
            Some(plural) => {
                let mut expected = extract(plural);
                expected.extend(extract(&entry.msgid));
                expected.sort();
                expected.dedup();
                for variant in &entry.msgstr {
                    let mut found = extract(variant);
                    found.dedup();
                    if found.iter().any(|p| !expected.contains(p)) {
                        warnings.push(format_mismatch(entry, flag.as_str(), expected, found));
                        break;
                    }
                }
            }
        }
    }
}

fn format_mismatch(entry: &Entry, flag: &str, expected: Vec<String>, found: Vec<String>) -> LintWarning {
    LintWarning::FormatMismatch {
        msgid: entry.msgid.clone(),
        line: entry.line,
        flag: flag.to_string(),
        expected,
        found,
    }
}

type Extractor = fn(&str) -> Vec<String>;

fn placeholder_extractor(language: &str) -> Option<Extractor> {
    match language {
        "python" | "c" => Some(printf_placeholders),
        "python-brace" => Some(brace_placeholders),
        _ => None,
    }
}

/// Sorted printf-style placeholders: `%s`, `%5.2f`, `%(name)s`. `%%` is skipped.
fn printf_placeholders(text: &str) -> Vec<String> {
    let mut found = Vec::new();
    let mut chars = text.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        if c != '%' {
            continue;
        }
        if let Some((_, '%')) = chars.peek() {
            chars.next();
            continue;
        }
        let mut end = None;
        let mut in_name = false;
        for (i, c) in chars.by_ref() {
            match c {
                '(' if !in_name => in_name = true,
                ')' if in_name => in_name = false,
                _ if in_name => {}
                c if c.is_ascii_alphabetic() && !matches!(c, 'h' | 'l' | 'L' | 'q' | 'j' | 'z' | 't') => {
                    end = Some(i + c.len_utf8());
                    break;
                }
                c if c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | ' ' | '#' | '*' | 'h' | 'l' | 'L' | 'q' | 'j' | 'z' | 't') => {}
                _ => break,
            }
        }
        if let Some(end) = end {
            found.push(text[start..end].to_string());
        }
    }
    found.sort();
    found
}

/// Sorted `str.format` placeholders: `{}`, `{0}`, `{name!r:>10}`. `{{`/`}}` are skipped.
fn brace_placeholders(text: &str) -> Vec<String> {
    let mut found = Vec::new();
    let mut chars = text.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        match c {
            '{' if matches!(chars.peek(), Some((_, '{'))) => {
                chars.next();
            }
            '}' if matches!(chars.peek(), Some((_, '}'))) => {
                chars.next();
            }
            '{' => {
                let Some((end, _)) = chars.by_ref().find(|(_, c)| *c == '}') else {
                    break;
                };
                let field = &text[start + 1..end];
                let name = field.split([':', '!']).next().unwrap_or_default();
                found.push(format!("{{{name}}}"));
            }
            _ => {}
        }
    }
    found.sort();
    found
}
