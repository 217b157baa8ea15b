//! Integration tests for serializing catalogs.

use std::str;

use pocat::{Catalog, Entry, FormatOptions, SourceRef, format_catalog, format_entry};

const SPHINX: &str = r#"# SOME DESCRIPTIVE TITLE.
#, fuzzy
msgid ""
msgstr ""
"Project-Id-Version: disnake\n"
"Language: ja_JP\n"
"Content-Type: text/plain; charset=UTF-8\n"
"Plural-Forms: nplurals=1; plural=0;\n"

#: ../../api.rst:10 ../../api.rst:250
msgid "Client"
msgstr "クライアント"

#. Extracted note
#: ../../intro.rst:2
#, python-format
msgid "Loaded %(count)d cogs"
msgstr "%(count)d 個の Cog を読み込みました"

msgctxt "button"
msgid "Save"
msgstr "保存"

msgid "%d file"
msgid_plural "%d files"
msgstr[0] "%d 個のファイル"

#, fuzzy
#| msgid "Old text"
msgid "New text"
msgstr "古いテキスト"

#~ msgid "Removed"
#~ msgstr "削除済み"
"#;

/// Entries with their load-time line numbers cleared.
fn comparable(catalog: &Catalog) -> Vec<Entry> {
    catalog
        .entries()
        .iter()
        .cloned()
        .map(|entry| Entry { line: 0, ..entry })
        .collect()
}

fn assert_round_trip(input: &str, options: &FormatOptions) {
    let original = Catalog::parse(input).unwrap();
    let text = format_catalog(&original, options);
    let reparsed = Catalog::parse(&text).unwrap_or_else(|e| panic!("{e}\n{text}"));
    assert_eq!(comparable(&reparsed), comparable(&original), "{text}");
    assert_eq!(reparsed.header().fields(), original.header().fields());
    assert_eq!(format_catalog(&reparsed, options), text, "output is not stable");
}

// =========================================================================
// Layout
// =========================================================================

#[test]
fn formats_sphinx_catalog() {
    let catalog = Catalog::parse(SPHINX).unwrap();
    insta::assert_snapshot!(catalog.to_po_string(), @r#"
    # SOME DESCRIPTIVE TITLE.
    #, fuzzy
    msgid ""
    msgstr ""
    "Project-Id-Version: disnake\n"
    "Language: ja_JP\n"
    "Content-Type: text/plain; charset=UTF-8\n"
    "Plural-Forms: nplurals=1; plural=0;\n"

    #: ../../api.rst:10 ../../api.rst:250
    msgid "Client"
    msgstr "クライアント"

    #. Extracted note
    #: ../../intro.rst:2
    #, python-format
    msgid "Loaded %(count)d cogs"
    msgstr "%(count)d 個の Cog を読み込みました"

    msgctxt "button"
    msgid "Save"
    msgstr "保存"

    msgid "%d file"
    msgid_plural "%d files"
    msgstr[0] "%d 個のファイル"

    #, fuzzy
    #| msgid "Old text"
    msgid "New text"
    msgstr "古いテキスト"

    #~ msgid "Removed"
    #~ msgstr "削除済み"
    "#);
}

#[test]
fn long_strings_wrap_at_width() {
    let input = r#"msgid ""
msgstr ""
"Language: de\n"

msgid "A long source sentence that will certainly not fit on a single seventy nine column line."
msgstr ""
"#;
    let catalog = Catalog::parse(input).unwrap();
    let text = format_catalog(&catalog, &FormatOptions { width: Some(40) });
    insta::assert_snapshot!(text, @r#"
    msgid ""
    msgstr "Language: de\n"

    msgid ""
    "A long source sentence that will "
    "certainly not fit on a single seventy "
    "nine column line."
    msgstr ""
    "#);
}

#[test]
fn no_wrap_flag_keeps_long_lines() {
    let entry = Entry::builder()
        .msgid("word ".repeat(30).trim_end())
        .flags(vec!["no-wrap".into()])
        .build();
    let text = format_entry(&entry, &FormatOptions::default(), 2);
    assert_eq!(text.lines().count(), 3);
    assert!(text.lines().nth(1).is_some_and(|line| line.len() > 79));
}

#[test]
fn untranslated_plural_gets_one_line_per_form() {
    let entry = Entry::builder()
        .msgid("apple")
        .msgid_plural("apples".to_string())
        .build();
    insta::assert_snapshot!(format_entry(&entry, &FormatOptions::default(), 3), @r#"
    msgid "apple"
    msgid_plural "apples"
    msgstr[0] ""
    msgstr[1] ""
    msgstr[2] ""
    "#);
}

#[test]
fn paths_with_spaces_are_isolated() {
    let entry = Entry::builder()
        .msgid("Hi")
        .references(vec![SourceRef::new("my docs/intro.rst", Some(3))])
        .build();
    let text = format_entry(&entry, &FormatOptions::default(), 2);
    assert!(text.starts_with("#: \u{2068}my docs/intro.rst\u{2069}:3\n"), "{text}");
}

#[test]
fn escapes_special_characters() {
    let entry = Entry::builder()
        .msgid("Tab\there \"quoted\" back\\slash")
        .msgstr(vec!["x".to_string()])
        .build();
    let text = format_entry(&entry, &FormatOptions::default(), 2);
    assert_eq!(
        text,
        "msgid \"Tab\\there \\\"quoted\\\" back\\\\slash\"\nmsgstr \"x\"\n"
    );
}

// =========================================================================
// Round trip
// =========================================================================

#[test]
fn round_trip_preserves_entries() {
    assert_round_trip(SPHINX, &FormatOptions::default());
    assert_round_trip(SPHINX, &FormatOptions::no_wrap());
    assert_round_trip(SPHINX, &FormatOptions { width: Some(20) });
}

#[test]
fn round_trip_keeps_repeated_references() {
    let catalog = Catalog::parse(SPHINX).unwrap();
    let reparsed = Catalog::parse(&catalog.to_po_string()).unwrap();
    let entry = reparsed.entry(None, "Client").unwrap();
    assert_eq!(
        entry.references,
        vec![
            SourceRef::new("../../api.rst", Some(10)),
            SourceRef::new("../../api.rst", Some(250)),
        ]
    );
}

#[test]
fn round_trip_multiline_and_escapes() {
    let input = r#"msgid ""
"First line\n"
"Second line with a \"quote\" and a tab\t\n"
"Third"
msgstr ""
"一行目\n"
"二行目\n"
"三行目"

msgid "bell\a and null-ish \001"
msgstr "ok"
"#;
    assert_round_trip(input, &FormatOptions::default());
    assert_round_trip(input, &FormatOptions { width: Some(12) });
}

#[test]
fn round_trip_keeps_trailing_comment_whitespace() {
    let input = "# note trailing spaces   \n#. extracted\t\nmsgid \"a\"\nmsgstr \"b\"\n";
    assert_round_trip(input, &FormatOptions::default());
    let reparsed = Catalog::parse(&Catalog::parse(input).unwrap().to_po_string()).unwrap();
    let entry = reparsed.entry(None, "a").unwrap();
    assert_eq!(entry.translator_comments, vec!["note trailing spaces   "]);
    assert_eq!(entry.extracted_comments, vec!["extracted\t"]);
}

#[test]
fn round_trip_keeps_mapping_for_long_text() {
    let long = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor incididunt ut labore et dolore magna aliqua.";
    let input = format!("msgid \"{long}\"\nmsgstr \"{long}\"\n\n#, python-brace-format\nmsgid \"{{name}} joined\"\nmsgstr \"{{name}} が参加しました\"\n");
    assert_round_trip(&input, &FormatOptions::default());
    let reparsed = Catalog::parse(&Catalog::parse(&input).unwrap().to_po_string()).unwrap();
    assert_eq!(reparsed.gettext(long), long);
    assert_eq!(reparsed.gettext("{name} joined"), "{name} が参加しました");
}

#[test]
fn encodes_with_declared_charset() {
    let input = "msgid \"\"\nmsgstr \"Content-Type: text/plain; charset=EUC-JP\\n\"\n\nmsgid \"Yes\"\nmsgstr \"はい\"\n";
    let catalog = Catalog::parse(input).unwrap();
    let bytes = catalog.to_bytes(&FormatOptions::default());
    assert!(str::from_utf8(&bytes).is_err());
    let reloaded = Catalog::from_bytes(&bytes).unwrap();
    assert_eq!(reloaded.gettext("Yes"), "はい");
}
