//! Reading, querying and writing gettext `.po` translation catalogs.
//!
//! ```
//! use pocat::Catalog;
//!
//! let catalog = Catalog::parse(r#"
//! msgid ""
//! msgstr ""
//! "Language: ja_JP\n"
//! "Plural-Forms: nplurals=1; plural=0;\n"
//!
//! #: ../../intro.rst:2
//! msgid "Introduction"
//! msgstr "はじめに"
//! "#).unwrap();
//!
//! assert_eq!(catalog.gettext("Introduction"), "はじめに");
//! assert_eq!(catalog.ngettext("Introduction", "Introductions", 5), "はじめに");
//! ```

pub mod catalog;
pub mod formatter;
#[cfg(feature = "global-catalog")]
pub mod global;
pub mod parser;
pub mod types;

pub use catalog::{
    Catalog, CatalogStats, LintWarning, LoadError, Translations, cldr_plural_count,
    compute_suggestions, lint_catalog, plural_category,
};
pub use formatter::{FormatOptions, format_catalog, format_entry};
pub use parser::{ParseError, PluralForms, PluralFormsError};
pub use types::{Entry, Flag, Header, MessageId, SourceRef};
