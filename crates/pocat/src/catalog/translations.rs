//! Catalogs grouped by language and domain.
//!
//! Documentation projects built with sphinx-intl keep one catalog per
//! source document, laid out as `<root>/<language>/LC_MESSAGES/<domain>.po`
//! where the domain may contain slashes (`ext/commands/api`).
//! [`Translations`] loads such a tree and answers lookups for the current
//! language, trying the base language (`ja` for `ja_JP`) before falling
//! back to the source string.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use bon::Builder;

use crate::catalog::error::LoadError;
use crate::catalog::store::Catalog;
use crate::types::Entry;

/// Directory between the language directory and the catalogs.
const MESSAGES_DIR: &str = "LC_MESSAGES";

/// Registry of catalogs keyed by language, then domain.
///
/// Loading a catalog for a language/domain pair that is already present
/// replaces it.
///
/// # Example
///
/// ```
/// use pocat::Translations;
///
/// let mut translations = Translations::builder().language("ja_JP").build();
/// translations
///     .load_catalog_str("ja", "intro", "msgid \"Introduction\"\nmsgstr \"はじめに\"\n")
///     .unwrap();
///
/// // `ja_JP` has no catalog of its own, so the `ja` catalog answers.
/// assert_eq!(translations.gettext("intro", "Introduction"), "はじめに");
/// assert_eq!(translations.gettext("intro", "Quickstart"), "Quickstart");
/// ```
#[derive(Debug, Builder)]
#[builder(on(String, into))]
pub struct Translations {
    /// Current language code (e.g., "ja_JP", "ja").
    #[builder(default = "en".to_string())]
    language: String,

    /// language -> domain -> catalog.
    #[builder(skip)]
    catalogs: BTreeMap<String, BTreeMap<String, Catalog>>,

    /// File paths for hot-reload support: (language, domain) -> PathBuf.
    /// Only populated for file-loaded catalogs.
    #[builder(skip)]
    loaded_paths: BTreeMap<(String, String), PathBuf>,
}

impl Default for Translations {
    fn default() -> Self {
        Translations::builder().build()
    }
}

impl Translations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language(language: impl Into<String>) -> Self {
        Translations::builder().language(language.into()).build()
    }

    // =========================================================================
    // Language Management
    // =========================================================================

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Change the current language. Catalogs are not reloaded.
    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = language.into();
    }

    /// Languages with at least one loaded catalog, sorted.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.catalogs.keys().map(String::as_str)
    }

    /// Domains loaded for a language, sorted.
    pub fn domains(&self, language: &str) -> impl Iterator<Item = &str> {
        self.catalogs
            .get(language)
            .into_iter()
            .flat_map(|domains| domains.keys().map(String::as_str))
    }

    pub fn catalog(&self, language: &str, domain: &str) -> Option<&Catalog> {
        self.catalogs.get(language)?.get(domain)
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Load a catalog file for a language and domain.
    ///
    /// The path is kept for [`Translations::reload`].
    pub fn load_catalog(
        &mut self,
        language: &str,
        domain: &str,
        path: impl AsRef<Path>,
    ) -> Result<usize, LoadError> {
        let path = path.as_ref();
        let catalog = Catalog::load(path)?;
        let count = catalog.len();
        self.insert(language, domain, catalog);
        self.loaded_paths
            .insert(key(language, domain), path.to_path_buf());
        Ok(count)
    }

    /// Load a catalog from a string. It cannot be reloaded later.
    pub fn load_catalog_str(
        &mut self,
        language: &str,
        domain: &str,
        content: &str,
    ) -> Result<usize, LoadError> {
        let catalog = Catalog::parse(content).map_err(|source| LoadError::Parse {
            path: PathBuf::from(format!("<{language}/{domain}>")),
            source,
        })?;
        let count = catalog.len();
        self.loaded_paths.remove(&key(language, domain));
        self.insert(language, domain, catalog);
        Ok(count)
    }

    /// Add an already loaded catalog.
    pub fn insert(&mut self, language: &str, domain: &str, catalog: Catalog) {
        self.catalogs
            .entry(language.to_string())
            .or_default()
            .insert(domain.to_string(), catalog);
    }

    /// Re-read a file-loaded catalog from its original path.
    pub fn reload(&mut self, language: &str, domain: &str) -> Result<usize, LoadError> {
        let path = self
            .loaded_paths
            .get(&key(language, domain))
            .cloned()
            .ok_or_else(|| LoadError::NoPathForReload {
                language: language.to_string(),
                domain: domain.to_string(),
            })?;
        self.load_catalog(language, domain, path)
    }

    /// Load every `<root>/<language>/LC_MESSAGES/**/*.po` catalog.
    ///
    /// Returns the number of catalogs loaded. Language directories without
    /// an `LC_MESSAGES` directory are skipped.
    pub fn load_dir(&mut self, root: impl AsRef<Path>) -> Result<usize, LoadError> {
        let root = root.as_ref();
        let mut loaded = 0;
        for language_dir in sorted_dir(root)? {
            if !language_dir.is_dir() {
                continue;
            }
            let Some(language) = language_dir.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let messages = language_dir.join(MESSAGES_DIR);
            if !messages.is_dir() {
                tracing::warn!(path = %language_dir.display(), "skipping directory without LC_MESSAGES");
                continue;
            }
            let language = language.to_string();
            let mut files = Vec::new();
            collect_catalogs(&messages, &mut files)?;
            for file in files {
                let domain = domain_name(&messages, &file);
                self.load_catalog(&language, &domain, &file)?;
                loaded += 1;
            }
        }
        tracing::debug!(root = %root.display(), catalogs = loaded, "loaded catalog tree");
        Ok(loaded)
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Translate `msgid` in a domain for the current language.
    pub fn gettext<'a>(&'a self, domain: &str, msgid: &'a str) -> &'a str {
        self.pgettext_inner(domain, None, msgid)
    }

    /// Translate `msgid` in a domain within a message context.
    pub fn pgettext<'a>(&'a self, domain: &str, context: &str, msgid: &'a str) -> &'a str {
        self.pgettext_inner(domain, Some(context), msgid)
    }

    /// Translate a plural message in a domain for count `n`.
    pub fn ngettext<'a>(
        &'a self,
        domain: &str,
        msgid: &'a str,
        msgid_plural: &'a str,
        n: u64,
    ) -> &'a str {
        for catalog in self.candidates(domain) {
            if catalog.entry(None, msgid).is_some_and(Entry::is_usable) {
                return catalog.ngettext(msgid, msgid_plural, n);
            }
        }
        if n == 1 { msgid } else { msgid_plural }
    }

    fn pgettext_inner<'a>(&'a self, domain: &str, context: Option<&str>, msgid: &'a str) -> &'a str {
        for catalog in self.candidates(domain) {
            if catalog.entry(context, msgid).is_some_and(Entry::is_usable) {
                return match context {
                    Some(context) => catalog.pgettext(context, msgid),
                    None => catalog.gettext(msgid),
                };
            }
        }
        msgid
    }

    /// Catalogs to search for the current language: exact, then base language.
    fn candidates<'a>(&'a self, domain: &str) -> impl Iterator<Item = &'a Catalog> {
        let exact = self.language.as_str();
        let base = base_language(exact);
        let fallback = (base != exact).then_some(base);
        [Some(exact), fallback]
            .into_iter()
            .flatten()
            .filter_map(move |language| self.catalog(language, domain))
    }
}

fn key(language: &str, domain: &str) -> (String, String) {
    (language.to_string(), domain.to_string())
}

/// `ja_JP` -> `ja`, `sr@latin` -> `sr`.
fn base_language(language: &str) -> &str {
    language
        .split(['_', '-', '@', '.'])
        .next()
        .unwrap_or(language)
}

/// Directory entries sorted by path so loading order is deterministic.
fn sorted_dir(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let io_error = |source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        paths.push(entry.map_err(io_error)?.path());
    }
    paths.sort();
    Ok(paths)
}

/// Recursively collect `.po` files below `dir`.
fn collect_catalogs(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), LoadError> {
    for path in sorted_dir(dir)? {
        if path.is_dir() {
            collect_catalogs(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "po") {
            files.push(path);
        }
    }
    Ok(())
}

/// Domain name of a catalog: its path below `LC_MESSAGES`, without
/// extension, with `/` separators.
fn domain_name(messages: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(messages).unwrap_or(file);
    let without_ext = relative.with_extension("");
    without_ext
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
