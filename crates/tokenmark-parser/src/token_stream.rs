//! Append-only token buffer with handles to still-open start tokens.

use crate::tokens::{MarkdownToken, TokenKind};

/// Index of a token inside a [`TokenStream`].
pub type TokenId = usize;

#[derive(Debug, Default, Clone)]
pub struct TokenStream {
    tokens: Vec<MarkdownToken>,
}

/// Size of the growable parts of a token at some point in time.
///
/// Open tokens only ever grow (container prefixes, paragraph lines, text)
/// or, for a paragraph, turn into a setext heading. Recording the sizes is
/// enough to rewind them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenMark {
    Container { prefixes: usize, is_loose: bool },
    Paragraph { lines: usize },
    Text { len: usize },
    Fixed,
}

impl TokenStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: MarkdownToken) -> TokenId {
        log::trace!("emit {}", token);
        self.tokens.push(token);
        self.tokens.len() - 1
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, id: TokenId) -> &MarkdownToken {
        &self.tokens[id]
    }

    pub fn get_mut(&mut self, id: TokenId) -> &mut MarkdownToken {
        &mut self.tokens[id]
    }

    pub fn as_slice(&self) -> &[MarkdownToken] {
        &self.tokens
    }

    pub fn into_vec(self) -> Vec<MarkdownToken> {
        self.tokens
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.tokens.truncate(len);
    }

    /// Whether anything other than blank lines was emitted after `id`.
    pub(crate) fn has_content_after(&self, id: TokenId) -> bool {
        self.tokens[id + 1..]
            .iter()
            .any(|token| !token.kind.is_blank_line())
    }

    pub(crate) fn mark(&self, id: TokenId) -> TokenMark {
        match &self.tokens[id].kind {
            TokenKind::BlockQuote(bq) => TokenMark::Container {
                prefixes: bq.leading_spaces.len(),
                is_loose: false,
            },
            TokenKind::UnorderedList(list) | TokenKind::OrderedList(list) => {
                TokenMark::Container {
                    prefixes: list.leading_spaces.len(),
                    is_loose: list.is_loose,
                }
            }
            TokenKind::Paragraph(para) => TokenMark::Paragraph {
                lines: para.extracted_whitespace.len(),
            },
            TokenKind::SetextHeading(setext) => TokenMark::Paragraph {
                lines: setext.extracted_whitespace.len(),
            },
            TokenKind::Text(text) => TokenMark::Text {
                len: text.text.len(),
            },
            _ => TokenMark::Fixed,
        }
    }

    pub(crate) fn rewind(&mut self, id: TokenId, mark: &TokenMark) {
        let token = &mut self.tokens[id];
        match (mark, &mut token.kind) {
            (TokenMark::Container { prefixes, is_loose }, TokenKind::BlockQuote(bq)) => {
                debug_assert!(!is_loose);
                bq.leading_spaces.truncate(*prefixes);
            }
            (
                TokenMark::Container { prefixes, is_loose },
                TokenKind::UnorderedList(list) | TokenKind::OrderedList(list),
            ) => {
                list.leading_spaces.truncate(*prefixes);
                list.is_loose = *is_loose;
            }
            (TokenMark::Paragraph { lines }, TokenKind::Paragraph(para)) => {
                para.extracted_whitespace.truncate(*lines);
            }
            (TokenMark::Paragraph { lines }, TokenKind::SetextHeading(setext)) => {
                let mut whitespace = std::mem::take(&mut setext.extracted_whitespace);
                whitespace.truncate(*lines);
                token.kind = TokenKind::Paragraph(crate::tokens::ParagraphStart {
                    extracted_whitespace: whitespace,
                });
            }
            (TokenMark::Text { len }, TokenKind::Text(text)) => {
                text.text.truncate(*len);
            }
            (TokenMark::Fixed, _) => {}
            (mark, kind) => {
                panic!("token {id} cannot be rewound to {mark:?}: it is now {kind:?}")
            }
        }
    }
}
