//! Integration tests for the `tables` binary.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const LAYOUT: &str = r#"{
    "columns": [
        {"header": "Name"},
        {"header": "Count", "datatype": "int", "summary": "sum"}
    ]
}"#;

const DATA: &str = r#"[{"name": "a", "count": 3}, {"name": "bb", "count": 5}]"#;

const TABLE: &str = "\
╭──────┬───────╮
│ Name │ Count │
├──────┼───────┤
│ a    │ 3     │
│ bb   │ 5     │
├──────┼───────┤
│      │ 8     │
╰──────┴───────╯
";

fn tables_cmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tables"));
    // Keep warnings out of the assertions unless a test asks for them.
    cmd.env("RUST_LOG", "error");
    cmd.env_remove("TABLES_THEME");
    cmd
}

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn renders_table_to_stdout() {
    let dir = TempDir::new().unwrap();
    let layout = write(&dir, "layout.json", LAYOUT);
    let data = write(&dir, "data.json", DATA);

    tables_cmd()
        .arg(&layout)
        .arg(&data)
        .arg("--no-color")
        .assert()
        .success()
        .stdout(TABLE)
        .stderr("");
}

#[test]
fn colored_by_default() {
    let dir = TempDir::new().unwrap();
    let layout = write(&dir, "layout.json", LAYOUT);
    let data = write(&dir, "data.json", DATA);

    tables_cmd()
        .arg(&layout)
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("\u{1b}["));
}

#[test]
fn reads_data_from_stdin() {
    let dir = TempDir::new().unwrap();
    let layout = write(&dir, "layout.json", LAYOUT);

    tables_cmd()
        .arg(&layout)
        .arg("-")
        .arg("--no-color")
        .write_stdin(DATA)
        .assert()
        .success()
        .stdout(TABLE);
}

#[test]
fn rejects_two_stdin_documents() {
    tables_cmd()
        .args(["-", "-"])
        .write_stdin(DATA)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("only one of LAYOUT and DATA"));
}

#[test]
fn theme_flag_and_env_override_layout() {
    let dir = TempDir::new().unwrap();
    let layout = write(&dir, "layout.json", LAYOUT);
    let data = write(&dir, "data.json", DATA);

    tables_cmd()
        .arg(&layout)
        .arg(&data)
        .args(["--no-color", "--theme", "blue"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("┌"));

    tables_cmd()
        .env("TABLES_THEME", "Blue")
        .arg(&layout)
        .arg(&data)
        .arg("--no-color")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("┌"));
}

#[test]
fn unknown_theme_warns_and_falls_back() {
    let dir = TempDir::new().unwrap();
    let layout = write(&dir, "layout.json", LAYOUT);
    let data = write(&dir, "data.json", DATA);

    tables_cmd()
        .env_remove("RUST_LOG")
        .arg(&layout)
        .arg(&data)
        .args(["--no-color", "--theme", "Plaid"])
        .assert()
        .success()
        .stdout(TABLE)
        .stderr(predicate::str::contains("unknown theme"));
}

#[test]
fn missing_layout_file_fails() {
    let dir = TempDir::new().unwrap();
    let data = write(&dir, "data.json", DATA);

    tables_cmd()
        .arg(dir.path().join("nope.json"))
        .arg(&data)
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::starts_with("tables: cannot read layout file"));
}

#[test]
fn empty_data_file_fails() {
    let dir = TempDir::new().unwrap();
    let layout = write(&dir, "layout.json", LAYOUT);
    let data = write(&dir, "data.json", "\n");

    tables_cmd()
        .arg(&layout)
        .arg(&data)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("data document is empty"));
}

#[test]
fn layout_without_columns_fails() {
    let dir = TempDir::new().unwrap();
    let layout = write(&dir, "layout.json", r#"{"theme": "Red", "columns": []}"#);
    let data = write(&dir, "data.json", DATA);

    tables_cmd()
        .arg(&layout)
        .arg(&data)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("layout defines no columns"));
}

#[test]
fn column_without_header_fails() {
    let dir = TempDir::new().unwrap();
    let layout = write(&dir, "layout.json", r#"{"columns": [{"key": "name"}]}"#);
    let data = write(&dir, "data.json", DATA);

    tables_cmd()
        .arg(&layout)
        .arg(&data)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("column 0 has an empty header"));
}

#[test]
fn malformed_json_names_the_document() {
    let dir = TempDir::new().unwrap();
    let layout = write(&dir, "layout.json", LAYOUT);
    let data = write(&dir, "data.json", "[{");

    tables_cmd()
        .arg(&layout)
        .arg(&data)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid data document"));
}

#[test]
fn missing_arguments_exit_with_one() {
    tables_cmd()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("LAYOUT"));
}

#[test]
fn help_exits_cleanly() {
    tables_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--no-color"));
}
