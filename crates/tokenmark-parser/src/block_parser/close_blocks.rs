//! Closing open blocks and handling blank lines.
//!
//! Both operations need the whole stack and token stream, so the container
//! and leaf logic reach them through the [`CloseOpenBlocks`] and
//! [`HandleBlankLine`] traits rather than calling back into the driver.

use super::html_blocks::HtmlBlockType;
use super::leaf_blocks::resolve_pending_definition;
use super::open_stack::{HeldBlankLine, StackEntry};
use super::position::LineContext;
use super::state::{ParserState, Requeue};
use crate::token_stream::{TokenId, TokenStream};
use crate::tokens::{BlankLine, BlockKind, MarkdownToken, TokenKind};

pub(crate) trait CloseOpenBlocks {
    /// Close blocks from the top of the stack until `keep` entries remain.
    fn close_open_blocks(&self, state: &mut ParserState, keep: usize) -> Result<(), Requeue>;
}

pub(crate) trait HandleBlankLine {
    /// Process a line that is blank after its matched container prefixes.
    fn handle_blank_line(
        &self,
        state: &mut ParserState,
        ctx: &mut LineContext<'_>,
    ) -> Result<(), Requeue>;
}

/// Collaborators handed to the container and leaf stages.
#[derive(Clone, Copy)]
pub(crate) struct Hooks<'a> {
    pub closer: &'a dyn CloseOpenBlocks,
    pub blank_lines: &'a dyn HandleBlankLine,
}

/// Default implementation of both strategies, writing into the token
/// stream held by [`ParserState`].
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct TokenStreamManager;

impl TokenStreamManager {
    pub fn hooks(&self) -> Hooks<'_> {
        Hooks {
            closer: self,
            blank_lines: self,
        }
    }
}

impl CloseOpenBlocks for TokenStreamManager {
    fn close_open_blocks(&self, state: &mut ParserState, keep: usize) -> Result<(), Requeue> {
        let keep = keep.max(1);
        while state.stack.len() > keep {
            if let StackEntry::LinkDefinition(_) = state.stack.last() {
                resolve_pending_definition(state)?;
                continue;
            }
            let entry = state.stack.pop();
            log::debug!("closing {}", entry.name());
            close_entry(state, entry);
        }
        Ok(())
    }
}

impl HandleBlankLine for TokenStreamManager {
    fn handle_blank_line(
        &self,
        state: &mut ParserState,
        ctx: &mut LineContext<'_>,
    ) -> Result<(), Requeue> {
        if !ctx.all_matched {
            self.close_open_blocks(state, ctx.last_matched + 1)?;
        } else {
            match state.stack.last() {
                StackEntry::Paragraph { .. } | StackEntry::LinkDefinition(_) => {
                    let keep = state.stack.len() - 1;
                    self.close_open_blocks(state, keep)?;
                }
                StackEntry::HtmlBlock { kind, .. }
                    if HtmlBlockType::from_kind(*kind).is_some_and(HtmlBlockType::ends_at_blank_line) =>
                {
                    let keep = state.stack.len() - 1;
                    self.close_open_blocks(state, keep)?;
                }
                StackEntry::IndentedCode { .. } => {
                    ctx.commit_prefixes(state);
                    let held = HeldBlankLine {
                        line_number: ctx.line_number(),
                        column_number: ctx.cursor_column(),
                        whitespace: ctx.cursor.remainder().to_string(),
                    };
                    if let StackEntry::IndentedCode {
                        held_blank_lines, ..
                    } = state.stack.last_mut()
                    {
                        held_blank_lines.push(held);
                    }
                    return Ok(());
                }
                StackEntry::Document
                | StackEntry::BlockQuote { .. }
                | StackEntry::List(_)
                | StackEntry::FencedCode { .. }
                | StackEntry::HtmlBlock { .. } => {}
            }
        }

        ctx.commit_prefixes(state);
        state.emit(MarkdownToken::new(
            ctx.line_number(),
            ctx.cursor_column(),
            TokenKind::BlankLine(BlankLine {
                extracted_whitespace: ctx.cursor.remainder().to_string(),
            }),
        ));
        Ok(())
    }
}

pub(crate) fn emit_held_blank_lines(state: &mut ParserState, held: Vec<HeldBlankLine>) {
    for blank in held {
        state.emit(MarkdownToken::new(
            blank.line_number,
            blank.column_number,
            TokenKind::BlankLine(BlankLine {
                extracted_whitespace: blank.whitespace,
            }),
        ));
    }
}

fn close_entry(state: &mut ParserState, entry: StackEntry) {
    let end = |block| MarkdownToken::end(block, true, None);
    match entry {
        StackEntry::Document | StackEntry::LinkDefinition(_) => {
            panic!("{} cannot be closed as a regular block", entry.name())
        }
        StackEntry::BlockQuote { .. } => {
            state.emit(end(BlockKind::BlockQuote));
        }
        StackEntry::List(list) => {
            let loose = is_loose_list(&state.tokens, list.token);
            match &mut state.tokens.get_mut(list.token).kind {
                TokenKind::UnorderedList(start) | TokenKind::OrderedList(start) => {
                    start.is_loose = loose;
                }
                other => panic!("list entry points at {other:?}"),
            }
            state.emit(end(list.kind.block_kind()));
        }
        StackEntry::Paragraph { .. } => {
            state.emit(end(BlockKind::Paragraph));
        }
        StackEntry::FencedCode { .. } => {
            state.emit(end(BlockKind::FencedCodeBlock));
        }
        StackEntry::IndentedCode {
            held_blank_lines, ..
        } => {
            state.emit(end(BlockKind::IndentedCodeBlock));
            emit_held_blank_lines(state, held_blank_lines);
        }
        StackEntry::HtmlBlock { .. } => {
            state.emit(end(BlockKind::HtmlBlock));
        }
    }
}

/// A list is loose when a blank line separates two of its items, or two
/// blocks directly inside one item.
///
/// Blank lines at the end of a nested list count for the enclosing list.
/// Blank lines inside block quotes or leaf blocks do not, and neither does
/// the blank remainder of an empty item's own marker line.
pub(crate) fn is_loose_list(tokens: &TokenStream, list: TokenId) -> bool {
    let all = tokens.as_slice();
    let mut open: Vec<BlockKind> = Vec::new();
    let mut blank_pending = false;
    let mut item_line = all[list].line_number;

    for token in &all[list + 1..] {
        match &token.kind {
            TokenKind::End(_) => {
                if open.pop().is_none() {
                    // End of the list itself.
                    break;
                }
            }
            TokenKind::BlankLine(_) => {
                if token.line_number != item_line && open.iter().all(|kind| kind.is_list()) {
                    blank_pending = true;
                }
            }
            kind => {
                if open.is_empty() {
                    if blank_pending {
                        return true;
                    }
                } else if !matches!(kind, TokenKind::Text(_)) {
                    blank_pending = false;
                }
                if matches!(
                    kind,
                    TokenKind::NewListItem(_) | TokenKind::UnorderedList(_) | TokenKind::OrderedList(_)
                ) {
                    item_line = token.line_number;
                }
                if let Some(block) = kind.started_block() {
                    open.push(block);
                }
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block_parser::tests::helpers::tokenize_default;

    fn first_list_is_loose(input: &str) -> bool {
        let tokens = tokenize_default(input);
        tokens
            .iter()
            .find_map(|t| match &t.kind {
                TokenKind::UnorderedList(start) | TokenKind::OrderedList(start) => {
                    Some(start.is_loose)
                }
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_tight_list() {
        assert!(!first_list_is_loose("- a\n- b\n"));
    }

    #[test]
    fn test_blank_between_items_is_loose() {
        assert!(first_list_is_loose("- a\n\n- b\n"));
    }

    #[test]
    fn test_blank_between_blocks_in_item_is_loose() {
        assert!(first_list_is_loose("- a\n\n  b\n- c\n"));
    }

    #[test]
    fn test_trailing_blank_is_tight() {
        assert!(!first_list_is_loose("- a\n- b\n\nparagraph\n"));
    }

    #[test]
    fn test_blank_inside_fenced_code_is_tight() {
        assert!(!first_list_is_loose("- ```\n\n  ```\n- b\n"));
    }

    #[test]
    fn test_empty_item_marker_line_is_tight() {
        assert!(!first_list_is_loose("-\n  foo\n- bar\n"));
    }

    #[test]
    fn test_blank_ending_nested_list_loosens_outer() {
        assert!(first_list_is_loose("- a\n  - b\n\n- c\n"));
    }

    #[test]
    fn test_blank_inside_nested_list_keeps_outer_tight() {
        assert!(!first_list_is_loose("- a\n  - b\n\n  - c\n- d\n"));
    }
}
