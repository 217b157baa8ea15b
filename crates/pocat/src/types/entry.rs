use bon::Builder;
use serde::Serialize;

use super::{Flag, MessageId, SourceRef};

/// One message block of a catalog.
///
/// An entry pairs a source string (`msgid`, optionally scoped by a
/// `msgctxt`) with its translation. Plural entries carry a `msgid_plural`
/// and one `msgstr` variant per plural form declared by the catalog.
///
/// # Example
///
/// ```
/// use pocat::{Entry, SourceRef};
///
/// let entry = Entry::builder()
///     .msgid("Introduction")
///     .msgstr(vec!["はじめに".to_string()])
///     .references(vec![SourceRef::new("../../intro.rst", Some(2))])
///     .build();
///
/// assert!(entry.is_translated());
/// assert!(!entry.is_fuzzy());
/// assert_eq!(entry.translation(0), Some("はじめに"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder, Serialize)]
#[builder(on(String, into))]
pub struct Entry {
    /// Disambiguating context (`msgctxt`).
    pub context: Option<String>,

    /// Source-language string used as the lookup key.
    pub msgid: String,

    /// Source-language plural string (`msgid_plural`).
    pub msgid_plural: Option<String>,

    /// Translations: one element for singular entries, `nplurals` for plural ones.
    #[builder(default)]
    pub msgstr: Vec<String>,

    /// `#:` source locations.
    #[builder(default)]
    pub references: Vec<SourceRef>,

    /// `#,` flags.
    #[builder(default)]
    pub flags: Vec<Flag>,

    /// `# ` translator comments, one element per line.
    #[builder(default)]
    pub translator_comments: Vec<String>,

    /// `#.` comments written by the extraction tool.
    #[builder(default)]
    pub extracted_comments: Vec<String>,

    /// `#| msgctxt` recorded when the entry was marked fuzzy.
    pub previous_context: Option<String>,

    /// `#| msgid` recorded when the entry was marked fuzzy.
    pub previous_msgid: Option<String>,

    /// `#| msgid_plural` recorded when the entry was marked fuzzy.
    pub previous_msgid_plural: Option<String>,

    /// Entry was commented out with `#~` by a merge tool.
    #[builder(default)]
    pub obsolete: bool,

    /// 1-based line where the entry starts in its source file (0 when built in code).
    #[builder(default)]
    #[serde(skip)]
    pub line: usize,
}

impl Entry {
    /// The id this entry is indexed under.
    pub fn id(&self) -> MessageId {
        MessageId::new(self.context.as_deref(), &self.msgid)
    }

    /// Returns true for the metadata entry (empty `msgid`, no context).
    pub fn is_header(&self) -> bool {
        self.msgid.is_empty() && self.context.is_none()
    }

    /// Returns true if the entry carries a `msgid_plural`.
    pub fn is_plural(&self) -> bool {
        self.msgid_plural.is_some()
    }

    /// Returns true if the entry is flagged `fuzzy`.
    pub fn is_fuzzy(&self) -> bool {
        self.flags.iter().any(Flag::is_fuzzy)
    }

    /// Returns true if the entry carries the named flag.
    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.iter().any(|flag| flag.as_str() == name)
    }

    /// Returns true if every translation variant is non-empty.
    ///
    /// Fuzzy entries can still be translated; callers that need a
    /// trustworthy translation should also check [`Entry::is_fuzzy`].
    pub fn is_translated(&self) -> bool {
        !self.msgstr.is_empty() && self.msgstr.iter().all(|s| !s.is_empty())
    }

    /// Returns true if the translation can be served to readers: complete,
    /// not fuzzy, not obsolete.
    pub fn is_usable(&self) -> bool {
        !self.obsolete && !self.is_fuzzy() && self.is_translated()
    }

    /// The translation variant at `index`, if present and non-empty.
    pub fn translation(&self, index: usize) -> Option<&str> {
        self.msgstr
            .get(index)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    /// The source string shown for count `n` when no translation applies.
    pub fn source_for(&self, n: u64) -> &str {
        match &self.msgid_plural {
            Some(plural) if n != 1 => plural,
            _ => &self.msgid,
        }
    }
}
