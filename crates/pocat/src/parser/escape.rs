//! C-style string escapes used inside `.po` quoted strings.

use std::fmt::Write;

use super::error::ParseError;

/// Resolve backslash escapes in the body of a quoted string.
///
/// Supports the escapes gettext writes and reads: `\n \t \r \\ \"`, the
/// remaining C mnemonics, octal `\ooo` and hexadecimal `\xHH`.
///
/// ```
/// use pocat::parser::escape::unescape;
///
/// assert_eq!(unescape(r#"say \"hi\"\n"#, 1).unwrap(), "say \"hi\"\n");
/// assert_eq!(unescape(r"\101\x42", 1).unwrap(), "AB");
/// ```
pub fn unescape(raw: &str, line: usize) -> Result<String, ParseError> {
    if !raw.contains('\\') {
        return Ok(raw.to_string());
    }

    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        let Some(escape) = chars.next() else {
            return Err(ParseError::InvalidEscape {
                line,
                sequence: String::new(),
            });
        };
        match escape {
            'n' => result.push('\n'),
            't' => result.push('\t'),
            'r' => result.push('\r'),
            'a' => result.push('\u{7}'),
            'b' => result.push('\u{8}'),
            'f' => result.push('\u{c}'),
            'v' => result.push('\u{b}'),
            '\\' | '"' | '\'' | '?' => result.push(escape),
            '0'..='7' => {
                let mut digits = String::from(escape);
                while digits.len() < 3 {
                    match chars.peek() {
                        Some(d @ '0'..='7') => {
                            digits.push(*d);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                push_code(&mut result, &digits, 8, line)?;
            }
            'x' => {
                let mut digits = String::new();
                while digits.len() < 2 {
                    match chars.peek() {
                        Some(d) if d.is_ascii_hexdigit() => {
                            digits.push(*d);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                if digits.is_empty() {
                    return Err(ParseError::InvalidEscape {
                        line,
                        sequence: "x".to_string(),
                    });
                }
                push_code(&mut result, &digits, 16, line)?;
            }
            other => {
                return Err(ParseError::InvalidEscape {
                    line,
                    sequence: other.to_string(),
                });
            }
        }
    }
    Ok(result)
}

/// Push the character for a numeric escape.
fn push_code(result: &mut String, digits: &str, radix: u32, line: usize) -> Result<(), ParseError> {
    let invalid = || ParseError::InvalidEscape {
        line,
        sequence: digits.to_string(),
    };
    let code = u32::from_str_radix(digits, radix).map_err(|_| invalid())?;
    let c = char::from_u32(code).ok_or_else(invalid)?;
    result.push(c);
    Ok(())
}

/// Escape a string for output between double quotes.
///
/// ```
/// use pocat::parser::escape::escape;
///
/// assert_eq!(escape("a\tb\n"), r"a\tb\n");
/// assert_eq!(escape(r#"C:\ "x""#), r#"C:\\ \"x\""#);
/// ```
pub fn escape(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            '\t' => result.push_str("\\t"),
            '\r' => result.push_str("\\r"),
            '\u{7}' => result.push_str("\\a"),
            '\u{8}' => result.push_str("\\b"),
            '\u{c}' => result.push_str("\\f"),
            '\u{b}' => result.push_str("\\v"),
            c if c.is_ascii_control() => {
                let _ = write!(result, "\\{:03o}", u32::from(c));
            }
            c => result.push(c),
        }
    }
    result
}
