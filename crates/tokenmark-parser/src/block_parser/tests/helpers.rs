use crate::block_parser::Tokenizer;
use crate::options::ParserOptions;
use crate::rehydrate::rehydrate;
use crate::tokens::MarkdownToken;

pub fn tokenize_default(input: &str) -> Vec<MarkdownToken> {
    crate::init_logger();
    Tokenizer::new(ParserOptions::default())
        .tokenize_str(input)
        .expect("tokenizing never fails on well-formed input")
}

/// Display form of every token.
pub fn token_strings(input: &str) -> Vec<String> {
    tokenize_default(input)
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// Just the token names (`para`, `end-para`, `BLANK`, ...).
pub fn token_names(input: &str) -> Vec<String> {
    token_strings(input)
        .iter()
        .map(|token| {
            let body = &token[1..];
            let end = body.find(['(', ':', ']']).unwrap_or(body.len());
            body[..end].to_string()
        })
        .collect()
}

pub fn assert_tokens(input: &str, expected: &[&str]) {
    let expected: Vec<String> = expected.iter().map(|s| s.to_string()).collect();
    similar_asserts::assert_eq!(
        token_strings(input),
        expected,
        "token stream did not match for input:\n{}",
        input
    );
}

pub fn assert_token_names(input: &str, expected: &[&str]) {
    let expected: Vec<String> = expected.iter().map(|s| s.to_string()).collect();
    similar_asserts::assert_eq!(
        token_names(input),
        expected,
        "token kinds did not match for input:\n{}",
        input
    );
}

pub fn assert_round_trip(input: &str) {
    let tokens = tokenize_default(input);
    similar_asserts::assert_eq!(
        rehydrate(&tokens).as_str(),
        input,
        "rehydration must reproduce the input"
    );
}
