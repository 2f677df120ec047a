//! Cross-cutting CLI tests (help, version, error handling)

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help() {
    cargo_bin_cmd!("tokenmark")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Tokenmark splits CommonMark documents"));
}

#[test]
fn test_version() {
    cargo_bin_cmd!("tokenmark")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_no_subcommand() {
    cargo_bin_cmd!("tokenmark")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_invalid_subcommand() {
    cargo_bin_cmd!("tokenmark")
        .arg("invalid")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_check_help() {
    cargo_bin_cmd!("tokenmark")
        .args(["check", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tokenize every Markdown file"));
}

#[test]
fn test_missing_explicit_config_fails() {
    cargo_bin_cmd!("tokenmark")
        .args(["tokens", "--config", "/nonexistent/tokenmark.toml"])
        .write_stdin("text\n")
        .assert()
        .failure();
}
