use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tokenmark")]
#[command(author, version)]
#[command(about = "A lossless block tokenizer for CommonMark documents")]
#[command(
    long_about = "Tokenmark splits CommonMark documents into a flat stream of block tokens \
    (block quotes, lists, paragraphs, headings, code, HTML, link reference definitions) that \
    keep every byte of container prefix and indentation, so the source can be rebuilt exactly."
)]
#[command(after_help = "\
EXAMPLES:

    # Print the token stream of a file
    tokenmark tokens README.md

    # Tokens as JSON, from stdin
    cat README.md | tokenmark tokens --json

    # Verify every Markdown file under docs/
    tokenmark check docs/

    # Rebuild a document from its tokens
    tokenmark rehydrate README.md

CONFIGURATION:

Tokenmark looks for configuration files in this order:
  1. Explicit --config path
  2. tokenmark.toml or .tokenmark.toml in current/parent directories
  3. $XDG_CONFIG_HOME/tokenmark/config.toml or the platform config directory
  4. Built-in defaults

Example .tokenmark.toml:

    max_container_depth = 64
    output = \"text\"
    verify_rehydration = true")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, global = true, env = "TOKENMARK_CONFIG")]
    #[arg(help = "Path to configuration file")]
    #[arg(
        long_help = "Path to a custom configuration file. If not specified, tokenmark will \
        search for .tokenmark.toml or tokenmark.toml in the input's directory and its parents, \
        then fall back to the user configuration directory."
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the block token stream of a document
    #[command(after_help = "\
EXAMPLES:

    tokenmark tokens document.md
    echo '> quote' | tokenmark tokens
    tokenmark tokens --json document.md")]
    Tokens {
        /// Input file (stdin if not provided)
        #[arg(help = "Input file path")]
        file: Option<PathBuf>,

        /// Print tokens as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Verify token balance and lossless rehydration
    #[command(
        long_about = "Tokenize every Markdown file under the given paths and verify that each \
        token stream is balanced and rebuilds the source byte for byte. Directories are walked \
        respecting .gitignore. Exits with code 1 if any document fails."
    )]
    Check {
        /// Files or directories to check (current directory if none)
        paths: Vec<PathBuf>,
    },
    /// Rebuild a document from its token stream
    Rehydrate {
        /// Input file (stdin if not provided)
        #[arg(help = "Input file path")]
        file: Option<PathBuf>,
    },
}
