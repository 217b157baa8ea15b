use serde::Serialize;

use super::{Entry, Flag};

/// Catalog metadata carried by the entry with an empty `msgid`.
///
/// The header's msgstr holds newline-delimited `Key: Value` fields. Field
/// order is preserved so the header serializes back the way it was read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    fields: Vec<(String, String)>,
    /// `# ` comments above the header (usually title and copyright).
    pub translator_comments: Vec<String>,
    /// Flags on the header entry; `fuzzy` is common on fresh templates.
    pub flags: Vec<Flag>,
    /// 1-based line of the header's `msgid`, 0 when synthesized.
    #[serde(skip)]
    pub line: usize,
}

/// Plural rule gettext assumes when a catalog declares none.
pub const DEFAULT_PLURAL_FORMS: &str = "nplurals=2; plural=(n != 1);";

impl Default for Header {
    fn default() -> Self {
        Header {
            fields: vec![
                ("MIME-Version".to_string(), "1.0".to_string()),
                (
                    "Content-Type".to_string(),
                    "text/plain; charset=UTF-8".to_string(),
                ),
                ("Content-Transfer-Encoding".to_string(), "8bit".to_string()),
                ("Plural-Forms".to_string(), DEFAULT_PLURAL_FORMS.to_string()),
            ],
            translator_comments: Vec::new(),
            flags: Vec::new(),
            line: 0,
        }
    }
}

impl Header {
    /// Build a header from explicit fields.
    pub fn from_fields(fields: Vec<(String, String)>) -> Self {
        Header {
            fields,
            translator_comments: Vec::new(),
            flags: Vec::new(),
            line: 0,
        }
    }

    /// Build a header from the parsed header entry.
    pub fn from_entry(entry: &Entry) -> Self {
        let text = entry.msgstr.first().map(String::as_str).unwrap_or_default();
        Header {
            fields: parse_fields(text),
            translator_comments: entry.translator_comments.clone(),
            flags: entry.flags.clone(),
            line: entry.line,
        }
    }

    /// Render the header back into an entry with an empty `msgid`.
    pub fn to_entry(&self) -> Entry {
        Entry::builder()
            .msgid(String::new())
            .msgstr(vec![self.to_msgstr()])
            .translator_comments(self.translator_comments.clone())
            .flags(self.flags.clone())
            .line(self.line)
            .build()
    }

    /// The header msgstr text: one `Key: Value\n` line per field.
    pub fn to_msgstr(&self) -> String {
        self.fields
            .iter()
            .map(|(key, value)| format!("{key}: {value}\n"))
            .collect()
    }

    /// All fields in declaration order.
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Look up a field by key, ignoring ASCII case.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn project_id_version(&self) -> Option<&str> {
        self.get("Project-Id-Version")
    }

    /// The `Language` field, e.g. `ja_JP`. Empty values count as absent.
    pub fn language(&self) -> Option<&str> {
        self.get("Language").filter(|l| !l.is_empty())
    }

    /// The raw `Plural-Forms` field.
    pub fn plural_forms(&self) -> Option<&str> {
        self.get("Plural-Forms").filter(|p| !p.is_empty())
    }

    /// The `charset` parameter of the `Content-Type` field.
    ///
    /// ```
    /// use pocat::Header;
    ///
    /// let header = Header::from_fields(vec![(
    ///     "Content-Type".to_string(),
    ///     "text/plain; charset=EUC-JP".to_string(),
    /// )]);
    /// assert_eq!(header.charset(), Some("EUC-JP"));
    /// ```
    pub fn charset(&self) -> Option<&str> {
        self.get("Content-Type").and_then(charset_param)
    }
}

/// Extract `charset=...` from a Content-Type value.
pub(crate) fn charset_param(content_type: &str) -> Option<&str> {
    content_type.split(';').find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if name.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches('"'))
        } else {
            None
        }
    })
}

/// Split header text into `Key: Value` pairs.
fn parse_fields(text: &str) -> Vec<(String, String)> {
    let mut fields = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match line.split_once(':') {
            Some((key, value)) => fields.push((key.trim().to_string(), value.trim().to_string())),
            None => tracing::warn!(line, "ignoring header line without a key"),
        }
    }
    fields
}
