//! Tokens subcommand tests

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_tokens_stdin() {
    cargo_bin_cmd!("tokenmark")
        .arg("tokens")
        .write_stdin("> line one\nline two\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[block-quote(1,1)::> \\n]"))
        .stdout(predicate::str::contains("[text(1,3):line one\\nline two:]"))
        .stdout(predicate::str::contains("[end-block-quote::true]"));
}

#[test]
fn test_tokens_file() {
    let temp_dir = TempDir::new().unwrap();
    let test_file = temp_dir.path().join("doc.md");
    fs::write(&test_file, "# Heading\n").unwrap();

    cargo_bin_cmd!("tokenmark")
        .args(["tokens", test_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("[atx(1,1):1:: ]"))
        .stdout(predicate::str::contains("[text(1,3):Heading:]"));
}

#[test]
fn test_tokens_json() {
    let output = cargo_bin_cmd!("tokenmark")
        .args(["tokens", "--json"])
        .write_stdin("- a\n")
        .output()
        .unwrap();
    assert!(output.status.success());

    let tokens: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let tokens = tokens.as_array().unwrap();
    assert_eq!(tokens[0]["line_number"], 1);
    assert_eq!(tokens[0]["kind"]["type"], "unordered_list");
    assert_eq!(tokens[0]["kind"]["indent_level"], 2);
}

#[test]
fn test_output_format_from_config() {
    let temp_dir = TempDir::new().unwrap();
    let test_file = temp_dir.path().join("doc.md");
    fs::write(&test_file, "text\n").unwrap();
    fs::write(temp_dir.path().join(".tokenmark.toml"), "output = \"json\"\n").unwrap();

    cargo_bin_cmd!("tokenmark")
        .args(["tokens", test_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("["))
        .stdout(predicate::str::contains("\"type\": \"paragraph\""));
}

#[test]
fn test_container_depth_from_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("custom.toml");
    fs::write(&config_file, "max_container_depth = 1\n").unwrap();

    cargo_bin_cmd!("tokenmark")
        .args(["tokens", "--config", config_file.to_str().unwrap()])
        .write_stdin("> > a\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[text(1,3):> a:]"));
}
