//! Process-wide translations for the `global-catalog` feature.
//!
//! Lets applications translate without threading a `&Translations` through
//! every call site. Lookups return owned strings because the lock is
//! released before the caller sees the result.

use std::sync::{LazyLock, PoisonError, RwLock};

use crate::Translations;

static GLOBAL_TRANSLATIONS: LazyLock<RwLock<Translations>> =
    LazyLock::new(|| RwLock::new(Translations::new()));

/// Provides read access to the global translations.
pub fn with_translations<T>(f: impl FnOnce(&Translations) -> T) -> T {
    let guard = GLOBAL_TRANSLATIONS
        .read()
        .unwrap_or_else(PoisonError::into_inner);
    f(&guard)
}

/// Provides write access to the global translations.
pub fn with_translations_mut<T>(f: impl FnOnce(&mut Translations) -> T) -> T {
    let mut guard = GLOBAL_TRANSLATIONS
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}

/// Sets the current language of the global translations.
pub fn set_language(language: impl Into<String>) {
    with_translations_mut(|translations| translations.set_language(language));
}

/// Returns the current language of the global translations.
pub fn language() -> String {
    with_translations(|translations| translations.language().to_owned())
}

/// Translates `msgid` in `domain` with the global translations.
pub fn gettext(domain: &str, msgid: &str) -> String {
    with_translations(|translations| translations.gettext(domain, msgid).to_owned())
}

/// Translates a plural message in `domain` with the global translations.
pub fn ngettext(domain: &str, msgid: &str, msgid_plural: &str, n: u64) -> String {
    with_translations(|translations| {
        translations
            .ngettext(domain, msgid, msgid_plural, n)
            .to_owned()
    })
}
