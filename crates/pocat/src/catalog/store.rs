//! Catalog storage, validation and lookup.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str;

use encoding_rs::{Encoding, UTF_8};
use serde::Serialize;

use crate::catalog::error::{LoadError, compute_suggestions};
use crate::formatter::{FormatOptions, format_catalog};
use crate::parser::{ParseError, PluralForms, parse_entries};
use crate::types::{DEFAULT_PLURAL_FORMS, Entry, Header, MessageId};

/// Charset placeholder left in freshly extracted `.pot` templates.
const CHARSET_PLACEHOLDER: &str = "CHARSET";

/// A loaded, validated, read-only translation catalog.
///
/// A catalog owns its header and entries. It is immutable after loading,
/// so it can be shared between threads without locking.
///
/// # Example
///
/// ```
/// use pocat::Catalog;
///
/// let catalog = Catalog::parse(r#"
/// msgid ""
/// msgstr ""
/// "Language: ja_JP\n"
/// "Plural-Forms: nplurals=1; plural=0;\n"
///
/// msgid "Introduction"
/// msgstr "はじめに"
/// "#).unwrap();
///
/// assert_eq!(catalog.language(), Some("ja_JP"));
/// assert_eq!(catalog.gettext("Introduction"), "はじめに");
/// assert_eq!(catalog.gettext("Nonexistent"), "Nonexistent");
/// ```
#[derive(Debug, Clone)]
pub struct Catalog {
    header: Header,
    plural_forms: PluralForms,
    encoding: &'static Encoding,
    /// Non-header entries in file order, obsolete ones included.
    entries: Vec<Entry>,
    /// Active entries by id, pointing into `entries`.
    index: HashMap<MessageId, usize>,
}

/// Translation progress counts for one catalog.
///
/// Obsolete entries are counted separately and excluded from `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub total: usize,
    pub translated: usize,
    pub fuzzy: usize,
    pub untranslated: usize,
    pub obsolete: usize,
}

impl CatalogStats {
    /// Share of translated entries in percent; 100 for an empty catalog.
    pub fn percent_translated(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.translated as f64 * 100.0 / self.total as f64
    }
}

impl Catalog {
    // =========================================================================
    // Loading
    // =========================================================================

    /// Parse and validate catalog text.
    ///
    /// Fails with the offending line on syntax errors, duplicate messages,
    /// plural entries whose form count disagrees with `nplurals`, invalid
    /// `Plural-Forms` and unknown charsets.
    pub fn parse(input: &str) -> Result<Catalog, ParseError> {
        Self::from_entries(parse_entries(input)?)
    }

    /// Decode raw file bytes using the charset the header declares, then parse.
    ///
    /// ```
    /// use pocat::Catalog;
    ///
    /// let text = "msgid \"\"\nmsgstr \"Content-Type: text/plain; charset=EUC-JP\\n\"\n\nmsgid \"Yes\"\nmsgstr \"はい\"\n";
    /// let (bytes, _, _) = encoding_rs::EUC_JP.encode(text);
    ///
    /// let catalog = Catalog::from_bytes(&bytes).unwrap();
    /// assert_eq!(catalog.gettext("Yes"), "はい");
    /// assert_eq!(catalog.charset(), "EUC-JP");
    /// ```
    pub fn from_bytes(bytes: &[u8]) -> Result<Catalog, ParseError> {
        let bytes = bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(bytes);
        let encoding = sniff_charset(bytes)?.unwrap_or(UTF_8);
        let entries = parse_entries(&decode(bytes, encoding)?)?;
        match declared_encoding(&entries)? {
            Some(declared) if declared != encoding => {
                tracing::debug!(
                    sniffed = encoding.name(),
                    declared = declared.name(),
                    "header is not the first entry, decoding again"
                );
                let entries = parse_entries(&decode(bytes, declared)?)?;
                Self::build(entries, declared)
            }
            _ => Self::build(entries, encoding),
        }
    }

    /// Parse bytes read from `path`, logging the result.
    ///
    /// [`Catalog::load`] goes through here; callers that read the file
    /// themselves (to keep the bytes for diagnostics) should too.
    pub fn from_file_bytes(path: &Path, bytes: &[u8]) -> Result<Catalog, ParseError> {
        let catalog = Catalog::from_bytes(bytes)?;
        tracing::debug!(
            path = %path.display(),
            entries = catalog.len(),
            language = catalog.language().unwrap_or_default(),
            charset = catalog.charset(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    /// Read and parse a catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Catalog, LoadError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Catalog::from_file_bytes(path, &bytes).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validate parsed entries and build the lookup index.
    ///
    /// The entry with an empty `msgid` becomes the header; a missing header
    /// is replaced by [`Header::default`].
    pub fn from_entries(entries: Vec<Entry>) -> Result<Catalog, ParseError> {
        let encoding = declared_encoding(&entries)?;
        Self::build(entries, encoding.unwrap_or(UTF_8))
    }

    fn build(entries: Vec<Entry>, encoding: &'static Encoding) -> Result<Catalog, ParseError> {
        let mut header: Option<Header> = None;
        let mut body = Vec::with_capacity(entries.len());
        for entry in entries {
            if !entry.is_header() || entry.obsolete {
                body.push(entry);
                continue;
            }
            if let Some(existing) = &header {
                return Err(ParseError::DuplicateMessage {
                    line: entry.line,
                    first_line: existing.line,
                    context: None,
                    msgid: String::new(),
                });
            }
            header = Some(Header::from_entry(&entry));
        }

        let header = header.unwrap_or_else(|| {
            tracing::warn!("catalog has no header entry, using defaults");
            Header::default()
        });
        let plural_forms = plural_forms_for(&header)?;

        let mut index = HashMap::with_capacity(body.len());
        for (position, entry) in body.iter().enumerate() {
            if entry.obsolete {
                continue;
            }
            check_plural_count(entry, plural_forms.nplurals())?;
            let id = entry.id();
            if let Some(first) = index.get(&id).and_then(|&i: &usize| body.get(i)) {
                return Err(if first.context == entry.context && first.msgid == entry.msgid {
                    ParseError::DuplicateMessage {
                        line: entry.line,
                        first_line: first.line,
                        context: entry.context.clone(),
                        msgid: entry.msgid.clone(),
                    }
                } else {
                    ParseError::IdCollision {
                        line: entry.line,
                        msgid: entry.msgid.clone(),
                        other: first.msgid.clone(),
                    }
                });
            }
            index.insert(id, position);
        }

        Ok(Catalog {
            header,
            plural_forms,
            encoding,
            entries: body,
            index,
        })
    }

    // =========================================================================
    // Metadata
    // =========================================================================

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Target locale from the header, e.g. `ja_JP`.
    pub fn language(&self) -> Option<&str> {
        self.header.language()
    }

    /// Name of the catalog's character encoding, e.g. `UTF-8`.
    pub fn charset(&self) -> &'static str {
        self.encoding.name()
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    pub fn plural_forms(&self) -> &PluralForms {
        &self.plural_forms
    }

    /// Plural-form index for count `n`.
    pub fn plural_index(&self, n: u64) -> usize {
        self.plural_forms.index(n)
    }

    // =========================================================================
    // Entries
    // =========================================================================

    /// All non-header entries in file order, obsolete ones included.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Active (non-obsolete) entries in file order.
    pub fn messages(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|entry| !entry.obsolete)
    }

    /// Number of active entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Find the active entry for a context and message-id.
    pub fn entry(&self, context: Option<&str>, msgid: &str) -> Option<&Entry> {
        self.entry_by_id(MessageId::new(context, msgid))
            .filter(|entry| entry.context.as_deref() == context && entry.msgid == msgid)
    }

    /// Find the active entry for a precomputed id.
    pub fn entry_by_id(&self, id: MessageId) -> Option<&Entry> {
        self.index.get(&id).and_then(|&i| self.entries.get(i))
    }

    /// Entries flagged fuzzy: translations waiting for review.
    pub fn fuzzy_entries(&self) -> impl Iterator<Item = &Entry> {
        self.messages().filter(|entry| entry.is_fuzzy())
    }

    /// Entries with no complete translation and no fuzzy flag.
    pub fn untranslated_entries(&self) -> impl Iterator<Item = &Entry> {
        self.messages()
            .filter(|entry| !entry.is_fuzzy() && !entry.is_translated())
    }

    /// Entries commented out with `#~`.
    pub fn obsolete_entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|entry| entry.obsolete)
    }

    pub fn stats(&self) -> CatalogStats {
        let mut stats = CatalogStats::default();
        for entry in &self.entries {
            if entry.obsolete {
                stats.obsolete += 1;
                continue;
            }
            stats.total += 1;
            if entry.is_fuzzy() {
                stats.fuzzy += 1;
            } else if entry.is_translated() {
                stats.translated += 1;
            } else {
                stats.untranslated += 1;
            }
        }
        stats
    }

    /// Message-ids similar to `msgid`, closest first.
    pub fn suggest(&self, msgid: &str) -> Vec<String> {
        let available: Vec<&str> = self.messages().map(|entry| entry.msgid.as_str()).collect();
        compute_suggestions(msgid, &available)
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Translate `msgid`, falling back to `msgid` itself.
    ///
    /// The empty message-id is reserved for the header and always returns
    /// the empty string.
    pub fn gettext<'a>(&'a self, msgid: &'a str) -> &'a str {
        self.translate(None, msgid)
    }

    /// Translate `msgid` within a message context.
    pub fn pgettext<'a>(&'a self, context: &str, msgid: &'a str) -> &'a str {
        self.translate(Some(context), msgid)
    }

    /// Translate a plural message for count `n`.
    ///
    /// Falls back to `msgid` when `n == 1` and to `msgid_plural` otherwise.
    pub fn ngettext<'a>(&'a self, msgid: &'a str, msgid_plural: &'a str, n: u64) -> &'a str {
        self.translate_plural(None, msgid, msgid_plural, n)
    }

    /// Translate a plural message within a message context.
    pub fn npgettext<'a>(
        &'a self,
        context: &str,
        msgid: &'a str,
        msgid_plural: &'a str,
        n: u64,
    ) -> &'a str {
        self.translate_plural(Some(context), msgid, msgid_plural, n)
    }

    /// Translate `msgid` without context. Same as [`Catalog::gettext`].
    pub fn lookup<'a>(&'a self, msgid: &'a str) -> &'a str {
        self.gettext(msgid)
    }

    /// Translate `msgid` for count `n`, using the entry's own `msgid_plural`
    /// as the fallback for `n != 1`.
    pub fn lookup_plural<'a>(&'a self, msgid: &'a str, n: u64) -> &'a str {
        match self.entry(None, msgid) {
            Some(entry) => self
                .usable_variant(entry, n)
                .unwrap_or_else(|| entry.source_for(n)),
            None => msgid,
        }
    }

    fn translate<'a>(&'a self, context: Option<&str>, msgid: &'a str) -> &'a str {
        if msgid.is_empty() {
            return msgid;
        }
        let translation = self
            .entry(context, msgid)
            .filter(|entry| entry.is_usable())
            .and_then(|entry| entry.translation(0));
        match translation {
            Some(translation) => translation,
            None => {
                tracing::trace!(msgid, "no usable translation, returning source string");
                msgid
            }
        }
    }

    fn translate_plural<'a>(
        &'a self,
        context: Option<&str>,
        msgid: &'a str,
        msgid_plural: &'a str,
        n: u64,
    ) -> &'a str {
        let fallback = if n == 1 { msgid } else { msgid_plural };
        if msgid.is_empty() {
            return fallback;
        }
        self.entry(context, msgid)
            .and_then(|entry| self.usable_variant(entry, n))
            .unwrap_or(fallback)
    }

    /// The translation variant for count `n` if the entry may be served.
    fn usable_variant<'a>(&self, entry: &'a Entry, n: u64) -> Option<&'a str> {
        if !entry.is_usable() {
            return None;
        }
        let index = if entry.is_plural() {
            self.plural_index(n)
        } else {
            0
        };
        entry.translation(index)
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    /// Serialize with default options (79-column wrapping).
    pub fn to_po_string(&self) -> String {
        format_catalog(self, &FormatOptions::default())
    }

    /// Serialize and encode with the catalog's declared charset.
    pub fn to_bytes(&self, options: &FormatOptions) -> Vec<u8> {
        let text = format_catalog(self, options);
        if self.encoding == UTF_8 {
            return text.into_bytes();
        }
        let (bytes, _, had_errors) = self.encoding.encode(&text);
        if had_errors {
            tracing::warn!(
                charset = self.encoding.name(),
                "some characters cannot be represented in the catalog charset"
            );
        }
        bytes.into_owned()
    }
}

/// Map a declared charset label to a decoder. `None` means UTF-8.
fn resolve_charset(
    label: Option<&str>,
    line: usize,
) -> Result<Option<&'static Encoding>, ParseError> {
    match label.map(str::trim) {
        None | Some("") | Some(CHARSET_PLACEHOLDER) => Ok(None),
        Some(label) => Encoding::for_label(label.as_bytes())
            .map(Some)
            .ok_or_else(|| ParseError::UnsupportedCharset {
                line,
                charset: label.to_string(),
            }),
    }
}

/// The charset declared by the first active header entry. `None` means UTF-8.
fn declared_encoding(entries: &[Entry]) -> Result<Option<&'static Encoding>, ParseError> {
    match entries.iter().find(|entry| entry.is_header() && !entry.obsolete) {
        Some(entry) => resolve_charset(Header::from_entry(entry).charset(), entry.line),
        None => Ok(None),
    }
}

/// Read the charset from the header before the file is decoded.
///
/// Only the leading entry is lexed, so message text that happens to contain
/// `charset=` never picks the decoder. Header fields are ASCII, which every
/// supported charset shares, so a lossy UTF-8 view of that block is enough.
fn sniff_charset(bytes: &[u8]) -> Result<Option<&'static Encoding>, ParseError> {
    let block = String::from_utf8_lossy(leading_entry(bytes));
    let Ok(entries) = parse_entries(&block) else {
        return Ok(None);
    };
    match entries.first() {
        Some(entry) if entry.is_header() => declared_encoding(&entries[..1]),
        _ => Ok(None),
    }
}

/// Bytes up to the end of the first entry's `msgstr` and its continuations.
fn leading_entry(bytes: &[u8]) -> &[u8] {
    let mut end = 0;
    let mut in_msgstr = false;
    for line in bytes.split_inclusive(|&b| b == b'\n') {
        let trimmed = line.trim_ascii();
        if in_msgstr && !trimmed.starts_with(b"\"") {
            break;
        }
        in_msgstr |= trimmed.starts_with(b"msgstr");
        end += line.len();
    }
    &bytes[..end]
}

/// Decode bytes, rejecting sequences that are invalid for the charset.
fn decode<'a>(
    bytes: &'a [u8],
    encoding: &'static Encoding,
) -> Result<Cow<'a, str>, ParseError> {
    if encoding == UTF_8 {
        return str::from_utf8(bytes)
            .map(Cow::Borrowed)
            .map_err(|e| ParseError::InvalidEncoding {
                line: line_at(&bytes[..e.valid_up_to()]),
                charset: UTF_8.name().to_string(),
            });
    }
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        let valid = text.find('\u{fffd}').map_or(text.as_ref(), |end| &text[..end]);
        return Err(ParseError::InvalidEncoding {
            line: valid.matches('\n').count() + 1,
            charset: encoding.name().to_string(),
        });
    }
    Ok(text)
}

fn line_at(prefix: &[u8]) -> usize {
    prefix.iter().filter(|&&b| b == b'\n').count() + 1
}

/// Parse the header's plural rule, defaulting when absent or a placeholder.
fn plural_forms_for(header: &Header) -> Result<PluralForms, ParseError> {
    let value = match header.plural_forms() {
        Some(value) if value.contains("INTEGER") || value.contains("EXPRESSION") => {
            tracing::warn!(value, "Plural-Forms is a template placeholder, using defaults");
            DEFAULT_PLURAL_FORMS
        }
        Some(value) => value,
        None => DEFAULT_PLURAL_FORMS,
    };
    PluralForms::parse(value).map_err(|source| ParseError::InvalidPluralForms {
        line: header.line,
        source,
    })
}

/// Plural entries must carry exactly `nplurals` translations.
fn check_plural_count(entry: &Entry, nplurals: usize) -> Result<(), ParseError> {
    if entry.is_plural() && entry.msgstr.len() != nplurals {
        return Err(ParseError::PluralCountMismatch {
            line: entry.line,
            msgid: entry.msgid.clone(),
            expected: nplurals,
            found: entry.msgstr.len(),
        });
    }
    Ok(())
}
