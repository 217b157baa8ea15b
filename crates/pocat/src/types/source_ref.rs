use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// Isolate marks gettext wraps around reference paths that contain spaces.
const FSI: char = '\u{2068}';
const PDI: char = '\u{2069}';

/// A `#:` source-location back-reference: a document path and optional line.
///
/// References are informational only. The document they point to may have
/// moved or changed since the catalog was generated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRef {
    pub path: String,
    pub line: Option<usize>,
}

impl SourceRef {
    pub fn new(path: impl Into<String>, line: Option<usize>) -> Self {
        Self {
            path: path.into(),
            line,
        }
    }

    /// Parse every reference on the content of one `#:` line.
    ///
    /// ```
    /// use pocat::SourceRef;
    ///
    /// let refs = SourceRef::parse_line("../../intro.rst:12 ../../intro.rst:40 conf.py");
    /// assert_eq!(refs.len(), 3);
    /// assert_eq!(refs[1], SourceRef::new("../../intro.rst", Some(40)));
    /// assert_eq!(refs[2].line, None);
    /// ```
    pub fn parse_line(content: &str) -> Vec<SourceRef> {
        let mut refs = Vec::new();
        let mut rest = content.trim();
        while !rest.is_empty() {
            let token = if let Some(isolated) = rest.strip_prefix(FSI) {
                match isolated.find(PDI) {
                    Some(end) => {
                        let path = &isolated[..end];
                        let after = &isolated[end + PDI.len_utf8()..];
                        let (suffix, remaining) = split_token(after);
                        rest = remaining;
                        refs.push(Self::from_parts(path, suffix));
                        continue;
                    }
                    None => {
                        let (token, remaining) = split_token(isolated);
                        rest = remaining;
                        token
                    }
                }
            } else {
                let (token, remaining) = split_token(rest);
                rest = remaining;
                token
            };
            refs.push(Self::parse_token(token));
        }
        refs
    }

    /// Parse a single `path:line` token.
    fn parse_token(token: &str) -> SourceRef {
        match token.rsplit_once(':') {
            Some((path, line)) if !path.is_empty() => match line.parse() {
                Ok(line) => SourceRef::new(path, Some(line)),
                Err(_) => SourceRef::new(token, None),
            },
            _ => SourceRef::new(token, None),
        }
    }

    /// Build a reference from an isolated path and the `:line` text after it.
    fn from_parts(path: &str, suffix: &str) -> SourceRef {
        let line = suffix.strip_prefix(':').and_then(|l| l.parse().ok());
        SourceRef::new(path, line)
    }
}

/// Split off the next whitespace-delimited token.
fn split_token(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.find(char::is_whitespace) {
        Some(end) => (&input[..end], input[end..].trim_start()),
        None => (input, ""),
    }
}

impl Display for SourceRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if self.path.contains(char::is_whitespace) {
            write!(f, "{FSI}{}{PDI}", self.path)?;
        } else {
            write!(f, "{}", self.path)?;
        }
        if let Some(line) = self.line {
            write!(f, ":{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_isolated_path_with_spaces() {
        let refs = SourceRef::parse_line("\u{2068}my docs/intro.rst\u{2069}:7 api.rst:3");
        assert_eq!(
            refs,
            vec![
                SourceRef::new("my docs/intro.rst", Some(7)),
                SourceRef::new("api.rst", Some(3)),
            ]
        );
    }

    #[test]
    fn display_isolates_paths_with_spaces() {
        let r = SourceRef::new("my docs/intro.rst", Some(7));
        assert_eq!(r.to_string(), "\u{2068}my docs/intro.rst\u{2069}:7");
        assert_eq!(SourceRef::parse_line(&r.to_string()), vec![r]);
    }

    #[test]
    fn non_numeric_suffix_stays_in_path() {
        let refs = SourceRef::parse_line("C:file");
        assert_eq!(refs, vec![SourceRef::new("C:file", None)]);
    }
}
