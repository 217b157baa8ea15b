//! End-to-end tests for the `pocat` binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const JA: &str = r#"msgid ""
msgstr ""
"Language: ja_JP\n"
"Plural-Forms: nplurals=1; plural=0;\n"

#: ../../intro.rst:2
msgid "Introduction"
msgstr "はじめに"

#, fuzzy
#| msgid "Quick start"
msgid "Quickstart"
msgstr "クイックスタート"

msgid "Installing"
msgstr ""
"#;

fn pocat(args: &[&str], dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pocat"))
        .args(args)
        .arg("--color=never")
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn catalog(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn check_accepts_valid_catalog() {
    let dir = TempDir::new().unwrap();
    catalog(&dir, "ja.po", JA);
    let output = pocat(&["check", "ja.po"], dir.path());
    assert_eq!(output.status.code(), Some(exitcode::OK));
    assert!(stdout(&output).contains("ja.po (3 messages)"));
}

#[test]
fn check_reports_failing_line() {
    let dir = TempDir::new().unwrap();
    catalog(&dir, "bad.po", "msgid \"a\"\nmsgstr \"b\"\n\nmsgid \"a\"\nmsgstr \"c\"\n");
    let output = pocat(&["check", "--json", "bad.po"], dir.path());
    assert_eq!(output.status.code(), Some(exitcode::DATAERR));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["ok"], false);
    assert!(json[0]["error"].as_str().unwrap().contains("line 4"));
}

#[test]
fn check_missing_file_is_noinput() {
    let dir = TempDir::new().unwrap();
    let output = pocat(&["check", "missing.po"], dir.path());
    assert_eq!(output.status.code(), Some(exitcode::NOINPUT));
}

#[test]
fn verbose_check_logs_each_loaded_catalog() {
    let dir = TempDir::new().unwrap();
    catalog(&dir, "ja.po", JA);
    let output = pocat(&["-v", "check", "ja.po"], dir.path());
    assert_eq!(output.status.code(), Some(exitcode::OK));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("loaded catalog"), "{stderr}");
}

#[test]
fn fmt_missing_file_is_noinput() {
    let dir = TempDir::new().unwrap();
    let output = pocat(&["fmt", "missing.po"], dir.path());
    assert_eq!(output.status.code(), Some(exitcode::NOINPUT));
}

#[test]
fn stats_json_counts_entries() {
    let dir = TempDir::new().unwrap();
    catalog(&dir, "ja.po", JA);
    let output = pocat(&["stats", "--json", "ja.po"], dir.path());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["language"], "ja_JP");
    assert_eq!(json[0]["translated"], 1);
    assert_eq!(json[0]["fuzzy"], 1);
    assert_eq!(json[0]["untranslated"], 1);
}

#[test]
fn fuzzy_lists_previous_msgid() {
    let dir = TempDir::new().unwrap();
    catalog(&dir, "ja.po", JA);
    let output = pocat(&["fuzzy", "ja.po"], dir.path());
    let text = stdout(&output);
    assert!(text.contains("ja.po:12 Quickstart"), "{text}");
    assert!(text.contains("was: Quick start"), "{text}");
}

#[test]
fn lint_strict_fails_on_warnings() {
    let dir = TempDir::new().unwrap();
    catalog(&dir, "ja.po", JA);
    assert_eq!(pocat(&["lint", "ja.po"], dir.path()).status.code(), Some(exitcode::OK));
    let output = pocat(&["lint", "--strict", "ja.po"], dir.path());
    assert_eq!(output.status.code(), Some(exitcode::DATAERR));
    assert!(stdout(&output).contains("'Installing' is untranslated"));
}

#[test]
fn config_file_enables_strict_lint() {
    let dir = TempDir::new().unwrap();
    catalog(&dir, "ja.po", JA);
    fs::write(dir.path().join("pocat.toml"), "strict_lint = true\n").unwrap();
    let output = pocat(&["lint", "ja.po"], dir.path());
    assert_eq!(output.status.code(), Some(exitcode::DATAERR));
}

#[test]
fn get_translates_and_falls_back() {
    let dir = TempDir::new().unwrap();
    catalog(&dir, "ja.po", JA);
    let output = pocat(&["get", "ja.po", "--msgid", "Introduction"], dir.path());
    assert_eq!(stdout(&output).trim(), "はじめに");

    let output = pocat(&["get", "ja.po", "--msgid", "Introductoin", "--json"], dir.path());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["translation"], "Introductoin");
    assert_eq!(json["fallback"], true);
    assert_eq!(json["suggestions"][0], "Introduction");
}

#[test]
fn fmt_check_then_rewrite() {
    let dir = TempDir::new().unwrap();
    let path = catalog(&dir, "ja.po", &JA.replace("\n\n", "\n\n\n"));
    let output = pocat(&["fmt", "--check", "ja.po"], dir.path());
    assert_eq!(output.status.code(), Some(exitcode::DATAERR));

    let output = pocat(&["fmt", "ja.po"], dir.path());
    assert_eq!(output.status.code(), Some(exitcode::OK));
    assert_eq!(fs::read_to_string(&path).unwrap(), JA);

    let output = pocat(&["fmt", "--check", "ja.po"], dir.path());
    assert_eq!(output.status.code(), Some(exitcode::OK));
}
