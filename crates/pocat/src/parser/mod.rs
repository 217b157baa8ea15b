//! `.po` catalog parser.
//!
//! This module turns catalog text into [`Entry`](crate::Entry) values and
//! parses the `Plural-Forms` header expression. Semantic validation
//! (duplicates, plural counts, charsets) happens when a
//! [`Catalog`](crate::Catalog) is built from the parsed entries.

pub mod error;
pub mod escape;
mod file;
mod plural;

pub use error::{ParseError, PluralFormsError};
pub use file::parse_entries;
pub use plural::{BinaryOp, PluralExpr, PluralForms};
