//! Lossless CommonMark block tokenizer.
//!
//! The tokenizer consumes a document one line at a time and emits a flat
//! stream of [`MarkdownToken`]s describing the block structure: containers
//! (block quotes, lists), leaf blocks (paragraphs, headings, code, HTML,
//! link reference definitions) and blank lines. Every byte of leading
//! whitespace and container prefix is kept on the tokens, so
//! [`rehydrate`] can rebuild the original text exactly.

pub mod block_parser;
pub mod error;
pub mod line_source;
pub mod options;
pub mod rehydrate;
pub mod token_stream;
pub mod tokens;

pub use block_parser::Tokenizer;
pub use error::TokenizeError;
pub use line_source::{LineSource, ReaderLineSource, StrLineSource};
pub use options::ParserOptions;
pub use rehydrate::rehydrate;
pub use tokens::{BlockKind, MarkdownToken, TokenKind};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Tokenizes a complete document with default options.
///
/// `\r\n` line endings are normalized to `\n` before tokenizing, so
/// rehydrating the result yields the `\n`-normalized input.
///
/// # Examples
///
/// ```no_run
/// let tokens = tokenmark_parser::tokenize("> quote\n").unwrap();
/// assert_eq!(tokens[0].to_string(), "[block-quote(1,1)::> ]");
/// ```
pub fn tokenize(input: &str) -> Result<Vec<MarkdownToken>, TokenizeError> {
    #[cfg(debug_assertions)]
    {
        init_logger();
    }

    Tokenizer::new(ParserOptions::default()).tokenize_str(input)
}
