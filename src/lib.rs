pub mod config;

pub use config::Config;
pub use config::ConfigBuilder;
pub use config::OutputFormat;
pub use tokenmark_parser::{
    BlockKind, MarkdownToken, TokenKind, TokenizeError, Tokenizer, rehydrate,
};

use std::fmt;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Tokenizes a document with the parser options of `config`.
///
/// # Examples
///
/// ```no_run
/// let tokens = tokenmark::tokenize("- item\n", None).unwrap();
/// assert_eq!(tokens[0].to_string(), "[ulist(1,1):-:2::tight:- \\n]");
/// ```
pub fn tokenize(input: &str, config: Option<Config>) -> Result<Vec<MarkdownToken>, TokenizeError> {
    #[cfg(debug_assertions)]
    {
        init_logger();
    }

    let config = config.unwrap_or_default();
    Tokenizer::new(config.parser_options()).tokenize_str(input)
}

/// Something `check_document` found wrong with a token stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    /// The tokenizer gave up on the document.
    Internal(String),
    /// An end token did not close the most recently opened block.
    Mismatched { index: usize, expected: Option<BlockKind> },
    /// Blocks still open when the stream ended.
    Unclosed(Vec<BlockKind>),
    /// Rehydrated text differs from the input, first at `line` (1-based).
    Rehydration { line: usize },
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Problem::Internal(message) => write!(f, "{message}"),
            Problem::Mismatched { index, expected } => match expected {
                Some(kind) => write!(f, "token {index} does not close open {}", kind.name()),
                None => write!(f, "token {index} closes a block that was never opened"),
            },
            Problem::Unclosed(kinds) => {
                let names: Vec<_> = kinds.iter().map(|kind| kind.name()).collect();
                write!(f, "blocks left open: {}", names.join(", "))
            }
            Problem::Rehydration { line } => {
                write!(f, "rehydrated text differs from the input at line {line}")
            }
        }
    }
}

/// Check that every start token is closed in order.
pub fn check_balance(tokens: &[MarkdownToken]) -> Vec<Problem> {
    let mut open: Vec<BlockKind> = Vec::new();
    let mut problems = Vec::new();
    for (index, token) in tokens.iter().enumerate() {
        if let Some(kind) = token.kind.started_block() {
            open.push(kind);
        } else if let TokenKind::End(end) = &token.kind {
            let expected = open.pop();
            if expected != Some(end.block) {
                problems.push(Problem::Mismatched { index, expected });
            }
        }
    }
    if !open.is_empty() {
        problems.push(Problem::Unclosed(open));
    }
    problems
}

/// Tokenize `input` and verify the stream is balanced and, when the
/// config asks for it, rehydrates to the `\n`-normalized input.
pub fn check_document(input: &str, config: &Config) -> Vec<Problem> {
    let tokens = match tokenize(input, Some(config.clone())) {
        Ok(tokens) => tokens,
        Err(e) => return vec![Problem::Internal(e.to_string())],
    };
    let mut problems = check_balance(&tokens);

    if config.verify_rehydration {
        let normalized = input.replace("\r\n", "\n");
        let rebuilt = rehydrate(&tokens);
        if rebuilt != normalized {
            let line = normalized
                .split('\n')
                .zip(rebuilt.split('\n'))
                .position(|(a, b)| a != b)
                .unwrap_or_else(|| normalized.lines().count().min(rebuilt.lines().count()))
                + 1;
            problems.push(Problem::Rehydration { line });
        }
    }
    problems
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_document_accepts_nested_containers() {
        let input = "> - a\n>   b\n>\n> 1. c\n\n```\ncode\n```\n";
        assert!(check_document(input, &Config::default()).is_empty());
    }

    #[test]
    fn test_check_balance_reports_unclosed_block() {
        let mut tokens = tokenize("> quote\n", None).unwrap();
        let last_end = tokens.iter().rposition(|t| t.kind.is_end()).unwrap();
        tokens.remove(last_end);
        let problems = check_balance(&tokens);
        assert_eq!(problems, vec![Problem::Unclosed(vec![BlockKind::BlockQuote])]);
    }

    #[test]
    fn test_check_balance_reports_wrong_end() {
        let tokens = vec![
            MarkdownToken::new(1, 1, TokenKind::IndentedCodeBlock),
            MarkdownToken::end(BlockKind::Paragraph, true, None),
        ];
        assert_eq!(
            check_balance(&tokens),
            vec![Problem::Mismatched {
                index: 1,
                expected: Some(BlockKind::IndentedCodeBlock),
            }]
        );
    }

    #[test]
    fn test_depth_from_config_is_used() {
        let config = ConfigBuilder::default().max_container_depth(1).build();
        let tokens = tokenize("> > a\n", Some(config)).unwrap();
        let quotes = tokens
            .iter()
            .filter(|t| matches!(t.kind, TokenKind::BlockQuote(_)))
            .count();
        assert_eq!(quotes, 1);
    }
}
