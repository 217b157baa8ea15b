use std::fmt::{Display, Formatter, Result as FmtResult};
use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// A flag attached to a catalog entry on a `#,` comment line.
///
/// Flags carry tooling state such as `fuzzy` (the translation may be stale)
/// or format hints like `python-format`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Flag(String);

impl Flag {
    /// The translation may be stale relative to the current source string.
    pub const FUZZY: &'static str = "fuzzy";

    /// The entry's strings must never be line-wrapped when serialized.
    pub const NO_WRAP: &'static str = "no-wrap";

    /// Create a new flag from any string-like value.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the flag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the `fuzzy` flag.
    pub fn is_fuzzy(&self) -> bool {
        self.0 == Self::FUZZY
    }

    /// Returns the format language for flags like `python-format`.
    ///
    /// Negated flags (`no-python-format`) and other flags return `None`.
    pub fn format_language(&self) -> Option<&str> {
        if self.0.starts_with("no-") {
            return None;
        }
        self.0.strip_suffix("-format")
    }
}

impl Deref for Flag {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<&str> for Flag {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Flag {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for Flag {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}
