//! Errors surfaced by the tokenizer.

/// Errors that can occur while tokenizing a document.
///
/// Malformed Markdown is never an error; every input has a token stream.
/// These variants only report broken internal invariants and I/O failures
/// of a streaming line source.
#[derive(Debug, Clone)]
pub enum TokenizeError {
    /// An internal invariant was violated while processing a line.
    Internal {
        message: String,
        line_number: usize,
        line: String,
        /// Names of the open blocks, outermost first.
        stack: Vec<String>,
    },
    /// The line source failed to produce the next line.
    Source(String),
}

impl std::fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Internal {
                message,
                line_number,
                line,
                stack,
            } => write!(
                f,
                "internal tokenizer error at line {}: {} (line: {:?}, open blocks: [{}])",
                line_number,
                message,
                line,
                stack.join(", ")
            ),
            Self::Source(msg) => write!(f, "failed to read input: {}", msg),
        }
    }
}

impl std::error::Error for TokenizeError {}

impl From<std::io::Error> for TokenizeError {
    fn from(err: std::io::Error) -> Self {
        Self::Source(err.to_string())
    }
}
