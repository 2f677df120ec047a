//! Stack of currently open blocks.
//!
//! The bottom entry is always the document. Containers (block quotes and
//! lists) sit directly above it in nesting order, and at most one leaf block
//! sits on top.

use super::position::SourceLine;
use crate::token_stream::TokenId;
use crate::tokens::BlockKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListKind {
    Bullet(u8),
    Ordered(u8),
}

impl ListKind {
    pub fn block_kind(self) -> BlockKind {
        match self {
            ListKind::Bullet(_) => BlockKind::UnorderedList,
            ListKind::Ordered(_) => BlockKind::OrderedList,
        }
    }

    pub fn marker_char(self) -> char {
        match self {
            ListKind::Bullet(c) | ListKind::Ordered(c) => c as char,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ListEntry {
    pub token: TokenId,
    /// The list start token for the first item, then the latest
    /// new-list-item token.
    pub item_token: TokenId,
    pub kind: ListKind,
    /// Columns of item content relative to where the list's parent content
    /// begins.
    pub content_offset: usize,
    /// Absolute column of the current item's content.
    pub indent_level: usize,
    /// The current item's marker line had nothing after the marker.
    pub item_started_blank: bool,
    /// The current item ended at a blank line; only a new item can
    /// continue the list.
    pub item_closed: bool,
}

/// A blank line seen inside an indented code block whose fate (inside or
/// after the block) is not known yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HeldBlankLine {
    pub line_number: usize,
    pub column_number: usize,
    pub whitespace: String,
}

/// One line buffered by a link reference definition that has not been
/// resolved yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefinitionLine {
    pub source: SourceLine,
    /// The line after its container prefixes.
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingDefinition {
    pub line_number: usize,
    pub column_number: usize,
    pub lines: Vec<DefinitionLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StackEntry {
    Document,
    BlockQuote {
        token: TokenId,
    },
    List(ListEntry),
    Paragraph {
        token: TokenId,
        text: TokenId,
    },
    FencedCode {
        token: TokenId,
        fence_char: u8,
        fence_count: usize,
        fence_indent: usize,
    },
    IndentedCode {
        token: TokenId,
        held_blank_lines: Vec<HeldBlankLine>,
    },
    HtmlBlock {
        token: TokenId,
        kind: u8,
    },
    LinkDefinition(PendingDefinition),
}

impl StackEntry {
    pub fn token(&self) -> Option<TokenId> {
        match self {
            StackEntry::Document | StackEntry::LinkDefinition(_) => None,
            StackEntry::BlockQuote { token }
            | StackEntry::Paragraph { token, .. }
            | StackEntry::FencedCode { token, .. }
            | StackEntry::IndentedCode { token, .. }
            | StackEntry::HtmlBlock { token, .. } => Some(*token),
            StackEntry::List(list) => Some(list.token),
        }
    }

    pub fn block_kind(&self) -> Option<BlockKind> {
        match self {
            StackEntry::Document => None,
            StackEntry::BlockQuote { .. } => Some(BlockKind::BlockQuote),
            StackEntry::List(list) => Some(list.kind.block_kind()),
            StackEntry::Paragraph { .. } => Some(BlockKind::Paragraph),
            StackEntry::FencedCode { .. } => Some(BlockKind::FencedCodeBlock),
            StackEntry::IndentedCode { .. } => Some(BlockKind::IndentedCodeBlock),
            StackEntry::HtmlBlock { .. } => Some(BlockKind::HtmlBlock),
            StackEntry::LinkDefinition(_) => Some(BlockKind::LinkReferenceDefinition),
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(
            self,
            StackEntry::Document | StackEntry::BlockQuote { .. } | StackEntry::List(_)
        )
    }

    pub fn is_block_quote(&self) -> bool {
        matches!(self, StackEntry::BlockQuote { .. })
    }

    pub fn is_list(&self) -> bool {
        matches!(self, StackEntry::List(_))
    }

    /// Paragraphs and pending definitions both accept lazy continuation
    /// lines and cannot be interrupted by everything that starts a block.
    pub fn is_paragraph_like(&self) -> bool {
        matches!(
            self,
            StackEntry::Paragraph { .. } | StackEntry::LinkDefinition(_)
        )
    }

    /// Blocks whose lines are kept verbatim and suppress container starts.
    pub fn is_raw_block(&self) -> bool {
        matches!(
            self,
            StackEntry::FencedCode { .. } | StackEntry::HtmlBlock { .. }
        )
    }

    pub fn name(&self) -> &'static str {
        self.block_kind().map_or("document", BlockKind::name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OpenBlockStack {
    entries: Vec<StackEntry>,
}

impl Default for OpenBlockStack {
    fn default() -> Self {
        Self {
            entries: vec![StackEntry::Document],
        }
    }
}

impl OpenBlockStack {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, index: usize) -> &StackEntry {
        &self.entries[index]
    }

    pub fn get_mut(&mut self, index: usize) -> &mut StackEntry {
        &mut self.entries[index]
    }

    pub fn last(&self) -> &StackEntry {
        self.entries.last().unwrap_or(&StackEntry::Document)
    }

    pub fn last_mut(&mut self) -> &mut StackEntry {
        let last = self.entries.len() - 1;
        &mut self.entries[last]
    }

    pub fn push(&mut self, entry: StackEntry) {
        assert!(
            self.last().is_container(),
            "cannot open {} inside leaf block {}",
            entry.name(),
            self.last().name()
        );
        self.entries.push(entry);
    }

    pub fn pop(&mut self) -> StackEntry {
        assert!(self.entries.len() > 1, "the document block cannot be closed");
        let Some(entry) = self.entries.pop() else {
            unreachable!()
        };
        entry
    }

    /// Number of container entries, the document included.
    pub fn container_count(&self) -> usize {
        self.entries.iter().take_while(|e| e.is_container()).count()
    }

    pub fn block_quote_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_block_quote()).count()
    }

    /// Tokens of open block quotes and lists, outermost first.
    pub fn container_tokens(&self) -> impl Iterator<Item = TokenId> + '_ {
        self.entries
            .iter()
            .filter(|e| e.is_block_quote() || e.is_list())
            .filter_map(StackEntry::token)
    }

    /// Tokens whose contents can still change while their block is open.
    pub fn open_tokens(&self) -> impl Iterator<Item = TokenId> + '_ {
        self.entries.iter().flat_map(|entry| {
            let text = match entry {
                StackEntry::Paragraph { text, .. } => Some(*text),
                _ => None,
            };
            entry.token().into_iter().chain(text)
        })
    }

    pub fn describe(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name().to_string()).collect()
    }
}
