//! The translation catalog store.
//!
//! [`Catalog`] holds one parsed and validated `.po` file and answers
//! lookups. [`Translations`] groups catalogs by language and domain.
//! Lookups never fail: a missing, fuzzy or incomplete translation falls
//! back to the source string.

mod cldr;
mod error;
mod lint;
mod store;
mod translations;

pub use cldr::{cldr_plural_count, plural_category};
pub use error::{LintWarning, LoadError, compute_suggestions};
pub use lint::lint_catalog;
pub use store::{Catalog, CatalogStats};
pub use translations::Translations;
