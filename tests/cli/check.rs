//! Check subcommand tests

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_check_directory() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("a.md"), "# A\n\n- one\n- two\n").unwrap();
    fs::create_dir(temp_dir.path().join("nested")).unwrap();
    fs::write(
        temp_dir.path().join("nested").join("b.markdown"),
        "> quote\nlazy\n\n```\ncode\n```\n",
    )
    .unwrap();
    fs::write(temp_dir.path().join("notes.txt"), "not markdown").unwrap();

    cargo_bin_cmd!("tokenmark")
        .args(["check", temp_dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Checked 2 file(s), no problems found"));
}

#[test]
fn test_check_explicit_file() {
    let temp_dir = TempDir::new().unwrap();
    let test_file = temp_dir.path().join("README");
    fs::write(&test_file, "[foo\nbar\n").unwrap();

    cargo_bin_cmd!("tokenmark")
        .args(["check", test_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Checked 1 file(s)"));
}

#[test]
fn test_check_reports_unreadable_file() {
    let temp_dir = TempDir::new().unwrap();
    let test_file = temp_dir.path().join("bad.md");
    fs::write(&test_file, [0xff, 0xfe, 0x00]).unwrap();

    cargo_bin_cmd!("tokenmark")
        .args(["check", test_file.to_str().unwrap()])
        .assert()
        .failure()
        .stdout(predicate::str::contains("bad.md"))
        .stdout(predicate::str::contains("1 of 1 file(s) failed"));
}
