//! CLDR plural categories.
//!
//! gettext catalogs carry their own plural rule, but that rule is written
//! by hand. CLDR data (via `icu_plurals`) gives an independent count of the
//! plural categories a language needs for integers, which lint compares
//! against the declared `nplurals`.
//!
//! Plural rules are cached per thread per language to avoid re-creating
//! `PluralRules` instances on every call.

use std::cell::RefCell;
use std::collections::BTreeSet;

use icu_locale_core::Locale;
use icu_plurals::{PluralCategory, PluralRuleType, PluralRules};

/// Integer counts sampled when collecting a language's categories.
const SAMPLED_COUNTS: i64 = 1000;

thread_local! {
    /// Per-thread cache of `PluralRules` keyed by normalized language tag.
    static PLURAL_RULES_CACHE: RefCell<Vec<(String, PluralRules)>> = const { RefCell::new(Vec::new()) };
}

/// Convert a gettext locale name (`ja_JP`, `sr@latin`, `pt_BR.UTF-8`) to a
/// BCP-47 tag.
fn normalize_tag(language: &str) -> String {
    let base = language
        .split(['@', '.'])
        .next()
        .unwrap_or(language)
        .trim();
    base.replace('_', "-")
}

fn build_rules(tag: &str) -> Option<PluralRules> {
    let locale = tag.parse::<Locale>().ok()?;
    PluralRules::try_new(locale.into(), PluralRuleType::Cardinal.into()).ok()
}

/// Translate a `PluralCategory` enum to its string representation.
fn category_str(category: PluralCategory) -> &'static str {
    match category {
        PluralCategory::Zero => "zero",
        PluralCategory::One => "one",
        PluralCategory::Two => "two",
        PluralCategory::Few => "few",
        PluralCategory::Many => "many",
        PluralCategory::Other => "other",
    }
}

/// Run `f` with the cached rules for a language, building them on first use.
fn with_rules<T>(language: &str, f: impl FnOnce(&PluralRules) -> T) -> Option<T> {
    let tag = normalize_tag(language);
    PLURAL_RULES_CACHE.with_borrow_mut(|cache| {
        if let Some((_, rules)) = cache.iter().find(|(code, _)| *code == tag) {
            return Some(f(rules));
        }
        let rules = build_rules(&tag)?;
        let result = f(&rules);
        cache.push((tag, rules));
        Some(result)
    })
}

/// CLDR plural category for a count in a language.
///
/// Returns `None` when the language tag cannot be parsed.
///
/// ```
/// use pocat::plural_category;
///
/// assert_eq!(plural_category("en", 1), Some("one"));
/// assert_eq!(plural_category("ru_RU", 3), Some("few"));
/// assert_eq!(plural_category("ja_JP", 1), Some("other"));
/// ```
pub fn plural_category(language: &str, n: i64) -> Option<&'static str> {
    with_rules(language, |rules| category_str(rules.category_for(n)))
}

/// Number of distinct CLDR categories used by non-negative integers.
///
/// This is the `nplurals` a gettext catalog for the language should
/// normally declare.
///
/// ```
/// use pocat::cldr_plural_count;
///
/// assert_eq!(cldr_plural_count("ja_JP"), Some(1));
/// assert_eq!(cldr_plural_count("en"), Some(2));
/// assert_eq!(cldr_plural_count("ru"), Some(3));
/// ```
pub fn cldr_plural_count(language: &str) -> Option<usize> {
    with_rules(language, |rules| {
        (0..=SAMPLED_COUNTS)
            .map(|n| category_str(rules.category_for(n)))
            .collect::<BTreeSet<_>>()
            .len()
    })
}
