//! CLI integration tests for tokenmark.
//!
//! These tests execute the compiled binary and verify CLI behavior including:
//! - Subcommand behavior (tokens, check, rehydrate)
//! - Stdin/stdout handling
//! - Exit codes
//! - Config discovery

mod check;
mod common;
mod rehydrate;
mod tokens;
