//! Integration tests for the multi-language `Translations` registry.

use std::fs;
use std::path::Path;

use pocat::{LoadError, ParseError, Translations};
use tempfile::TempDir;

const JA_INTRO: &str = r#"msgid ""
msgstr ""
"Language: ja\n"
"Plural-Forms: nplurals=1; plural=0;\n"

msgid "Introduction"
msgstr "はじめに"

#, fuzzy
msgid "Quickstart"
msgstr "クイックスタート"

msgid "%d cog"
msgid_plural "%d cogs"
msgstr[0] "%d 個のコグ"

msgctxt "heading"
msgid "Events"
msgstr "イベント"
"#;

const JA_JP_INTRO: &str = r#"msgid ""
msgstr ""
"Language: ja_JP\n"
"Plural-Forms: nplurals=1; plural=0;\n"

msgid "Introduction"
msgstr "イントロダクション"

msgid "Quickstart"
msgstr ""
"#;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

// =========================================================================
// Builder and language management
// =========================================================================

#[test]
fn default_language_is_english() {
    assert_eq!(Translations::new().language(), "en");
    assert_eq!(Translations::builder().language("ja_JP").build().language(), "ja_JP");
    assert_eq!(Translations::with_language("de").language(), "de");
}

#[test]
fn set_language_switches_lookups() {
    let mut translations = Translations::new();
    translations.load_catalog_str("ja", "intro", JA_INTRO).unwrap();
    assert_eq!(translations.gettext("intro", "Introduction"), "Introduction");

    translations.set_language("ja");
    assert_eq!(translations.gettext("intro", "Introduction"), "はじめに");
}

// =========================================================================
// Lookup with fallback
// =========================================================================

#[test]
fn exact_language_wins_over_base_language() {
    let mut translations = Translations::with_language("ja_JP");
    translations.load_catalog_str("ja", "intro", JA_INTRO).unwrap();
    translations.load_catalog_str("ja_JP", "intro", JA_JP_INTRO).unwrap();
    assert_eq!(translations.gettext("intro", "Introduction"), "イントロダクション");
}

#[test]
fn untranslated_entry_falls_through_to_base_language() {
    let mut translations = Translations::with_language("ja_JP");
    translations.load_catalog_str("ja", "intro", JA_INTRO).unwrap();
    translations.load_catalog_str("ja_JP", "intro", JA_JP_INTRO).unwrap();
    // Empty in ja_JP, fuzzy in ja: nothing usable.
    assert_eq!(translations.gettext("intro", "Quickstart"), "Quickstart");
}

#[test]
fn plural_and_context_lookups() {
    let mut translations = Translations::with_language("ja_JP");
    translations.load_catalog_str("ja", "intro", JA_INTRO).unwrap();
    assert_eq!(translations.ngettext("intro", "%d cog", "%d cogs", 4), "%d 個のコグ");
    assert_eq!(translations.ngettext("intro", "%d dog", "%d dogs", 4), "%d dogs");
    assert_eq!(translations.pgettext("intro", "heading", "Events"), "イベント");
    assert_eq!(translations.gettext("intro", "Events"), "Events");
}

#[test]
fn unknown_domain_returns_source() {
    let mut translations = Translations::with_language("ja");
    translations.load_catalog_str("ja", "intro", JA_INTRO).unwrap();
    assert_eq!(translations.gettext("api", "Introduction"), "Introduction");
}

// =========================================================================
// Loading
// =========================================================================

#[test]
fn load_catalog_str_replaces_existing() {
    let mut translations = Translations::with_language("ja");
    translations.load_catalog_str("ja", "intro", JA_INTRO).unwrap();
    let count = translations
        .load_catalog_str("ja", "intro", "msgid \"Introduction\"\nmsgstr \"序論\"\n")
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(translations.gettext("intro", "Introduction"), "序論");
    assert_eq!(translations.gettext("intro", "Events"), "Events");
}

#[test]
fn load_catalog_str_reports_parse_errors() {
    let mut translations = Translations::new();
    let err = translations
        .load_catalog_str("ja", "intro", "msgid \"a\"\nmsgstr \"b\"\nmsgid \"a\"\nmsgstr \"c\"\n")
        .unwrap_err();
    assert!(matches!(
        err.parse_error(),
        Some(ParseError::DuplicateMessage { line: 3, .. })
    ));
    assert!(err.to_string().contains("<ja/intro>"), "{err}");
}

#[test]
fn load_dir_reads_sphinx_layout() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "ja/LC_MESSAGES/intro.po", JA_INTRO);
    write(dir.path(), "ja/LC_MESSAGES/ext/commands/api.po", "msgid \"Bot\"\nmsgstr \"ボット\"\n");
    write(dir.path(), "ja/LC_MESSAGES/notes.txt", "not a catalog");
    write(dir.path(), "ja_JP/LC_MESSAGES/intro.po", JA_JP_INTRO);
    write(dir.path(), "README.md", "locale tree");
    fs::create_dir_all(dir.path().join("de")).unwrap();

    let mut translations = Translations::with_language("ja");
    assert_eq!(translations.load_dir(dir.path()).unwrap(), 3);

    assert_eq!(translations.languages().collect::<Vec<_>>(), vec!["ja", "ja_JP"]);
    assert_eq!(
        translations.domains("ja").collect::<Vec<_>>(),
        vec!["ext/commands/api", "intro"]
    );
    assert_eq!(translations.gettext("ext/commands/api", "Bot"), "ボット");
    assert!(translations.catalog("ja_JP", "intro").is_some());
    assert!(translations.catalog("de", "intro").is_none());
}

#[test]
fn load_dir_missing_root_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = Translations::new()
        .load_dir(dir.path().join("missing"))
        .unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[test]
fn load_dir_reports_broken_file_path() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "ja/LC_MESSAGES/broken.po", "msgid \"a\"\nmsgstr \"unterminated\n");
    let err = Translations::new().load_dir(dir.path()).unwrap_err();
    match err {
        LoadError::Parse { path, source } => {
            assert!(path.ends_with("broken.po"));
            assert_eq!(source.line(), 2);
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn reload_rereads_file() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "intro.po", JA_INTRO);

    let mut translations = Translations::with_language("ja");
    translations
        .load_catalog("ja", "intro", dir.path().join("intro.po"))
        .unwrap();
    assert_eq!(translations.gettext("intro", "Introduction"), "はじめに");

    write(dir.path(), "intro.po", "msgid \"Introduction\"\nmsgstr \"序論\"\n");
    assert_eq!(translations.reload("ja", "intro").unwrap(), 1);
    assert_eq!(translations.gettext("intro", "Introduction"), "序論");
}

#[test]
fn reload_string_catalog_fails() {
    let mut translations = Translations::new();
    translations.load_catalog_str("ja", "intro", JA_INTRO).unwrap();
    let err = translations.reload("ja", "intro").unwrap_err();
    assert!(matches!(err, LoadError::NoPathForReload { .. }));
}

#[test]
fn load_catalog_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = Translations::new()
        .load_catalog("ja", "intro", dir.path().join("nope.po"))
        .unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}
