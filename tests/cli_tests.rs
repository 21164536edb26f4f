#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[allow(deprecated)]
fn run_cli(data_file: &Path, script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.env("HOMEWORK_DATA_FILE", data_file)
        .write_stdin(script.to_string())
        .assert()
}

#[test]
fn cli_add_persists_to_data_file() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("assignments.txt");
    run_cli(&data, "add Essay History 2024-05-01\nquit\n")
        .success()
        .stdout(str_contains("Added 'Essay' (History) due 2024-05-01."));
    assert_eq!(
        fs::read_to_string(&data).unwrap(),
        "Essay|History|2024-05-01|none\n"
    );
}

#[test]
fn cli_reports_validation_errors() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("assignments.txt");
    run_cli(&data, "add Essay History 05/01/2024\ndelete 3\nquit\n")
        .success()
        .stdout(str_contains("Error: bad date"))
        .stdout(str_contains("Error: invalid index"));
}

#[test]
fn cli_delete_uses_file_index() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("assignments.txt");
    fs::write(
        &data,
        "Essay|History|2024-05-01|none\nQuiz|Math|2024-04-20|weekly\n",
    )
    .unwrap();
    run_cli(&data, "delete 0\nlist\nquit\n")
        .success()
        .stdout(str_contains("Deleted 'Essay'."));
    assert_eq!(
        fs::read_to_string(&data).unwrap(),
        "Quiz|Math|2024-04-20|weekly\n"
    );
}

#[test]
fn cli_export_then_import_json() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("assignments.txt");
    let export = dir.path().join("export.json");
    fs::write(&data, "Quiz|Math|2024-04-20|weekly\n").unwrap();
    let script = format!(
        "export json {}\nimport json {}\nquit\n",
        export.display(),
        export.display()
    );
    run_cli(&data, &script)
        .success()
        .stdout(str_contains("Exported 1 assignments"))
        .stdout(str_contains("Imported 1 assignments"));
    assert_eq!(fs::read_to_string(&data).unwrap().lines().count(), 2);
}
