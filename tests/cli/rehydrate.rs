//! Rehydrate subcommand tests

use assert_cmd::cargo::cargo_bin_cmd;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_rehydrate_stdin_is_lossless() {
    let input = "> - a\n>\tb\n\n    code\n\n[x]: /url\n";
    cargo_bin_cmd!("tokenmark")
        .arg("rehydrate")
        .write_stdin(input)
        .assert()
        .success()
        .stdout(input);
}

#[test]
fn test_rehydrate_normalizes_crlf() {
    let temp_dir = TempDir::new().unwrap();
    let test_file = temp_dir.path().join("crlf.md");
    fs::write(&test_file, "# A\r\n\r\ntext\r\n").unwrap();

    cargo_bin_cmd!("tokenmark")
        .args(["rehydrate", test_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout("# A\n\ntext\n");
}
