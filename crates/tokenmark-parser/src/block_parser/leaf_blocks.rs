//! Leaf block dispatch.
//!
//! Runs after container markers have been matched and new containers opened.
//! Decides what the rest of the line is, in order: continuation of a
//! verbatim block, blank line, ATX heading, fenced code start, HTML block
//! start, setext underline, thematic break, indented code, and finally
//! paragraph text or a link reference definition.

use super::close_blocks::{Hooks, emit_held_blank_lines};
use super::code_blocks::{is_closing_fence, try_parse_fence_open};
use super::headings::{try_parse_atx_heading, try_parse_setext_underline};
use super::horizontal_rules::try_parse_thematic_break;
use super::html_blocks::{HtmlBlockType, try_parse_html_block_start};
use super::indented_code::{is_indented_code_line, strip_code_indent};
use super::open_stack::{DefinitionLine, PendingDefinition, StackEntry};
use super::position::{LineContext, LineFlags};
use super::reference_definitions::{
    DefinitionScan, LinkDefinition, longest_definition_prefix, scan_link_reference_definition,
};
use super::state::{ParserState, Requeue};
use crate::tokens::{
    AtxHeadingStart, BlockKind, FencedCodeStart, HtmlBlockStart, LinkReferenceDefinitionStart,
    MarkdownToken, ParagraphStart, SetextHeadingStart, TextSpan, ThematicBreakStart, TokenKind,
};

pub(crate) fn parse_leaf_block(
    state: &mut ParserState,
    ctx: &mut LineContext<'_>,
    hooks: Hooks<'_>,
) -> Result<(), Requeue> {
    if ctx.all_matched && continue_verbatim_block(state, ctx, hooks)? {
        return Ok(());
    }
    if ctx.cursor.is_blank() {
        return hooks.blank_lines.handle_blank_line(state, ctx);
    }

    let paragraph_open = ctx.flags.continue_lazily || state.stack.last().is_paragraph_like();
    if ctx.cursor.indent() < 4 {
        let rest = ctx.cursor.rest_after_indent();
        if try_parse_atx_heading(rest).is_some() {
            return start_atx_heading(state, ctx, hooks);
        }
        if try_parse_fence_open(rest).is_some() {
            return start_fenced_code(state, ctx, hooks);
        }
        if let Some(kind) = try_parse_html_block_start(rest, paragraph_open) {
            return start_html_block(state, ctx, hooks, kind);
        }
        if ctx.all_matched
            && !ctx.flags.continue_lazily
            && let Some(marker) = try_parse_setext_underline(rest)
        {
            match state.stack.last() {
                StackEntry::Paragraph { .. } => {
                    finish_setext_heading(state, ctx, marker);
                    return Ok(());
                }
                StackEntry::LinkDefinition(_) => {
                    // The definition cannot become a heading; settle it and
                    // treat the underline as ordinary text.
                    let keep = state.stack.len() - 1;
                    hooks.closer.close_open_blocks(state, keep)?;
                }
                _ => {}
            }
        }
        if try_parse_thematic_break(rest).is_some() {
            return thematic_break(state, ctx, hooks);
        }
    } else if !paragraph_open && is_indented_code_line(&ctx.cursor) {
        return indented_code_line(state, ctx, hooks);
    }

    match state.stack.last() {
        StackEntry::LinkDefinition(_) => continue_definition(state, ctx, hooks),
        StackEntry::Paragraph { .. } => {
            continue_paragraph(state, ctx);
            Ok(())
        }
        _ => start_paragraph_or_definition(state, ctx, hooks),
    }
}

/// Continue an open fenced code or HTML block. Returns `false` when the
/// line is not part of such a block.
fn continue_verbatim_block(
    state: &mut ParserState,
    ctx: &mut LineContext<'_>,
    hooks: Hooks<'_>,
) -> Result<bool, Requeue> {
    match *state.stack.last() {
        StackEntry::FencedCode {
            fence_char,
            fence_count,
            fence_indent,
            ..
        } => {
            if ctx.cursor.is_blank() {
                hooks.blank_lines.handle_blank_line(state, ctx)?;
                return Ok(true);
            }
            ctx.commit_prefixes(state);
            if ctx.cursor.indent() < 4
                && is_closing_fence(ctx.cursor.rest_after_indent(), fence_char, fence_count)
            {
                state.stack.pop();
                state.emit(MarkdownToken::end(
                    BlockKind::FencedCodeBlock,
                    false,
                    Some(ctx.cursor.remainder().to_string()),
                ));
                return Ok(true);
            }
            let strip = ctx.cursor.indent().min(fence_indent);
            let start = ctx.cursor.byte_offset();
            ctx.cursor.advance_columns(strip);
            let whitespace = ctx.cursor.consumed_since(start).to_string();
            emit_text(state, ctx, whitespace, ctx.cursor.remainder().to_string());
            Ok(true)
        }
        StackEntry::HtmlBlock { kind, .. } => {
            if ctx.cursor.is_blank() {
                hooks.blank_lines.handle_blank_line(state, ctx)?;
                return Ok(true);
            }
            ctx.commit_prefixes(state);
            let line = ctx.cursor.remainder();
            emit_text(state, ctx, String::new(), line.to_string());
            if HtmlBlockType::from_kind(kind).is_some_and(|kind| kind.is_closed_by(line)) {
                state.stack.pop();
                state.emit(MarkdownToken::end(BlockKind::HtmlBlock, false, None));
            }
            Ok(true)
        }
        _ => Ok(false),
    }
}

fn emit_text(state: &mut ParserState, ctx: &LineContext<'_>, whitespace: String, text: String) {
    state.emit(MarkdownToken::new(
        ctx.line_number(),
        ctx.cursor_column(),
        TokenKind::Text(TextSpan {
            text,
            extracted_whitespace: whitespace,
        }),
    ));
}

/// Close unmatched containers and any open leaf before a new leaf block.
fn close_for_new_block(
    state: &mut ParserState,
    ctx: &mut LineContext<'_>,
    hooks: Hooks<'_>,
) -> Result<(), Requeue> {
    hooks
        .closer
        .close_open_blocks(state, ctx.last_matched + 1)?;
    ctx.commit_prefixes(state);
    Ok(())
}

fn start_atx_heading(
    state: &mut ParserState,
    ctx: &mut LineContext<'_>,
    hooks: Hooks<'_>,
) -> Result<(), Requeue> {
    close_for_new_block(state, ctx, hooks)?;
    let column = ctx.content_column();
    let whitespace = ctx.cursor.leading_whitespace().to_string();
    let rest = ctx.cursor.rest_after_indent();
    let Some(heading) = try_parse_atx_heading(rest) else {
        panic!("line {} is no longer an ATX heading", ctx.line_number());
    };

    state.emit(MarkdownToken::new(
        ctx.line_number(),
        column,
        TokenKind::AtxHeading(AtxHeadingStart {
            level: heading.level,
            extracted_whitespace: whitespace,
            whitespace_after_marker: heading.whitespace_after_marker.to_string(),
        }),
    ));
    if !heading.text.is_empty() {
        let mut text_cursor = ctx.cursor.clone();
        text_cursor.advance_to_nonspace();
        text_cursor.advance_bytes(heading.level);
        text_cursor.advance_to_nonspace();
        state.emit(MarkdownToken::new(
            ctx.line_number(),
            text_cursor.column() + 1,
            TokenKind::Text(TextSpan {
                text: heading.text.to_string(),
                extracted_whitespace: String::new(),
            }),
        ));
    }
    let closing = (!heading.closing.is_empty()).then(|| heading.closing.to_string());
    state.emit(MarkdownToken::end(BlockKind::AtxHeading, false, closing));
    Ok(())
}

fn start_fenced_code(
    state: &mut ParserState,
    ctx: &mut LineContext<'_>,
    hooks: Hooks<'_>,
) -> Result<(), Requeue> {
    close_for_new_block(state, ctx, hooks)?;
    let fence_indent = ctx.cursor.indent();
    let column = ctx.content_column();
    let whitespace = ctx.cursor.leading_whitespace().to_string();
    let Some(fence) = try_parse_fence_open(ctx.cursor.rest_after_indent()) else {
        panic!("line {} is no longer a code fence", ctx.line_number());
    };

    let token = state.emit(MarkdownToken::new(
        ctx.line_number(),
        column,
        TokenKind::FencedCodeBlock(FencedCodeStart {
            fence_char: fence.fence_char,
            fence_count: fence.fence_count,
            extracted_whitespace: whitespace,
            whitespace_before_info: fence.whitespace_before_info.to_string(),
            info_string: fence.info_string.to_string(),
        }),
    ));
    state.stack.push(StackEntry::FencedCode {
        token,
        fence_char: fence.fence_char as u8,
        fence_count: fence.fence_count,
        fence_indent,
    });
    Ok(())
}

fn start_html_block(
    state: &mut ParserState,
    ctx: &mut LineContext<'_>,
    hooks: Hooks<'_>,
    kind: HtmlBlockType,
) -> Result<(), Requeue> {
    close_for_new_block(state, ctx, hooks)?;
    let token = state.emit(MarkdownToken::new(
        ctx.line_number(),
        ctx.content_column(),
        TokenKind::HtmlBlock(HtmlBlockStart { kind: kind.kind() }),
    ));
    let line = ctx.cursor.remainder();
    emit_text(state, ctx, String::new(), line.to_string());
    if kind.is_closed_by(line) {
        state.emit(MarkdownToken::end(BlockKind::HtmlBlock, false, None));
    } else {
        state.stack.push(StackEntry::HtmlBlock {
            token,
            kind: kind.kind(),
        });
    }
    Ok(())
}

fn finish_setext_heading(state: &mut ParserState, ctx: &mut LineContext<'_>, marker: char) {
    ctx.commit_prefixes(state);
    let StackEntry::Paragraph { token, .. } = state.stack.pop() else {
        panic!("setext underline without an open paragraph");
    };
    let heading = state.tokens.get_mut(token);
    let TokenKind::Paragraph(paragraph) = &mut heading.kind else {
        panic!("paragraph entry {token} is not a paragraph token");
    };
    let extracted_whitespace = std::mem::take(&mut paragraph.extracted_whitespace);
    heading.kind = TokenKind::SetextHeading(SetextHeadingStart {
        marker,
        extracted_whitespace,
    });
    state.emit(MarkdownToken::end(
        BlockKind::SetextHeading,
        false,
        Some(ctx.cursor.remainder().to_string()),
    ));
}

fn thematic_break(
    state: &mut ParserState,
    ctx: &mut LineContext<'_>,
    hooks: Hooks<'_>,
) -> Result<(), Requeue> {
    close_for_new_block(state, ctx, hooks)?;
    let rest = ctx.cursor.rest_after_indent();
    let Some(marker) = try_parse_thematic_break(rest) else {
        panic!("line {} is no longer a thematic break", ctx.line_number());
    };
    state.emit(MarkdownToken::new(
        ctx.line_number(),
        ctx.content_column(),
        TokenKind::ThematicBreak(ThematicBreakStart {
            marker,
            extracted_whitespace: ctx.cursor.leading_whitespace().to_string(),
            rest_of_line: rest.to_string(),
        }),
    ));
    state.emit(MarkdownToken::end(BlockKind::ThematicBreak, false, None));
    Ok(())
}

fn indented_code_line(
    state: &mut ParserState,
    ctx: &mut LineContext<'_>,
    hooks: Hooks<'_>,
) -> Result<(), Requeue> {
    let continues = ctx.all_matched && matches!(state.stack.last(), StackEntry::IndentedCode { .. });
    if continues {
        ctx.commit_prefixes(state);
        if let StackEntry::IndentedCode {
            held_blank_lines, ..
        } = state.stack.last_mut()
        {
            let held = std::mem::take(held_blank_lines);
            emit_held_blank_lines(state, held);
        }
    } else {
        close_for_new_block(state, ctx, hooks)?;
        let token = state.emit(MarkdownToken::new(
            ctx.line_number(),
            ctx.cursor_column(),
            TokenKind::IndentedCodeBlock,
        ));
        state.stack.push(StackEntry::IndentedCode {
            token,
            held_blank_lines: Vec::new(),
        });
    }

    let whitespace = strip_code_indent(&mut ctx.cursor).to_string();
    emit_text(state, ctx, whitespace, ctx.cursor.remainder().to_string());
    Ok(())
}

fn continue_paragraph(state: &mut ParserState, ctx: &mut LineContext<'_>) {
    ctx.commit_prefixes(state);
    let StackEntry::Paragraph { token, text } = *state.stack.last() else {
        panic!("no paragraph to continue on line {}", ctx.line_number());
    };
    if let TokenKind::Paragraph(paragraph) = &mut state.tokens.get_mut(token).kind {
        paragraph
            .extracted_whitespace
            .push(ctx.cursor.leading_whitespace().to_string());
    }
    if let TokenKind::Text(span) = &mut state.tokens.get_mut(text).kind {
        span.text.push('\n');
        span.text.push_str(ctx.cursor.rest_after_indent());
    }
}

fn start_paragraph_or_definition(
    state: &mut ParserState,
    ctx: &mut LineContext<'_>,
    hooks: Hooks<'_>,
) -> Result<(), Requeue> {
    // A replayed lazy line stays inside the containers it did not match.
    let keep = if ctx.flags.continue_lazily {
        state.stack.container_count()
    } else {
        ctx.last_matched + 1
    };
    hooks.closer.close_open_blocks(state, keep)?;
    ctx.commit_prefixes(state);

    let column = ctx.content_column();
    let content = ctx.cursor.remainder();
    if !ctx.flags.disable_definition
        && ctx.cursor.peek_nonspace() == Some(b'[')
        && scan_link_reference_definition(&[content]) != DefinitionScan::Invalid
    {
        log::debug!("line {}: possible link reference definition", ctx.line_number());
        state.definition_checkpoints = vec![state.line_checkpoint.clone()];
        state.stack.push(StackEntry::LinkDefinition(PendingDefinition {
            line_number: ctx.line_number(),
            column_number: column,
            lines: vec![DefinitionLine {
                source: ctx.line.clone(),
                content: content.to_string(),
            }],
        }));
        return Ok(());
    }

    let token = state.emit(MarkdownToken::new(
        ctx.line_number(),
        column,
        TokenKind::Paragraph(ParagraphStart {
            extracted_whitespace: vec![ctx.cursor.leading_whitespace().to_string()],
        }),
    ));
    let text = state.emit(MarkdownToken::new(
        ctx.line_number(),
        column,
        TokenKind::Text(TextSpan {
            text: ctx.cursor.rest_after_indent().to_string(),
            extracted_whitespace: String::new(),
        }),
    ));
    state.stack.push(StackEntry::Paragraph { token, text });
    Ok(())
}

/// Feed one more line to the pending definition, settling it when the line
/// cannot belong to it.
fn continue_definition(
    state: &mut ParserState,
    ctx: &mut LineContext<'_>,
    hooks: Hooks<'_>,
) -> Result<(), Requeue> {
    let content = ctx.cursor.remainder();
    let StackEntry::LinkDefinition(pending) = state.stack.last() else {
        panic!("no pending definition on line {}", ctx.line_number());
    };
    let mut candidate: Vec<&str> = pending.lines.iter().map(|l| l.content.as_str()).collect();
    candidate.push(content);
    let keep_going = match scan_link_reference_definition(&candidate) {
        DefinitionScan::Incomplete => true,
        DefinitionScan::Complete { lines_used, .. } => lines_used == candidate.len(),
        DefinitionScan::Invalid => false,
    };

    if keep_going {
        ctx.commit_prefixes(state);
        let checkpoint = state.line_checkpoint.clone();
        state.definition_checkpoints.push(checkpoint);
        let line = DefinitionLine {
            source: ctx.line.clone(),
            content: content.to_string(),
        };
        if let StackEntry::LinkDefinition(pending) = state.stack.last_mut() {
            pending.lines.push(line);
        }
        return Ok(());
    }

    // Every buffered line is a definition; this line starts over inside the
    // same containers, even when it only continued them lazily.
    let keep = state.stack.len() - 1;
    hooks.closer.close_open_blocks(state, keep)?;
    if !ctx.all_matched {
        ctx.flags.continue_lazily = true;
    }
    start_paragraph_or_definition(state, ctx, hooks)
}

/// Settle the pending definition on top of the stack.
///
/// When all buffered lines form a definition it is emitted in place.
/// Otherwise the longest complete prefix wins: the state is rolled back to
/// the first line after that prefix, and everything from there is replayed.
pub(crate) fn resolve_pending_definition(state: &mut ParserState) -> Result<(), Requeue> {
    let StackEntry::LinkDefinition(pending) = state.stack.last() else {
        panic!("no pending definition to resolve");
    };
    let contents: Vec<&str> = pending.lines.iter().map(|l| l.content.as_str()).collect();
    let found = longest_definition_prefix(&contents);
    let total = contents.len();

    match found {
        Some((used, definition)) if used == total => {
            let StackEntry::LinkDefinition(pending) = state.stack.pop() else {
                unreachable!()
            };
            emit_definition(state, pending, definition);
            state.definition_checkpoints.clear();
            Ok(())
        }
        found => {
            let used = found.as_ref().map_or(0, |(used, _)| *used);
            log::debug!(
                "definition at line {} settled on {} of {} lines; requeueing",
                pending.line_number,
                used,
                total
            );
            let lines = pending.lines[used..]
                .iter()
                .map(|l| l.source.clone())
                .collect();
            let restore = state.definition_checkpoints.swap_remove(used);
            state.definition_checkpoints.clear();
            Err(Requeue {
                restore,
                definition: found.map(|(_, definition)| definition),
                lines,
                flags: LineFlags {
                    disable_definition: used == 0,
                    continue_lazily: used > 0,
                },
            })
        }
    }
}

/// Emit a definition built from the first `raw_lines.len()` lines of
/// `pending`.
pub(crate) fn emit_definition(
    state: &mut ParserState,
    pending: PendingDefinition,
    definition: LinkDefinition,
) {
    let LinkDefinition {
        label,
        destination,
        title,
    } = definition;
    state.emit(MarkdownToken::new(
        pending.line_number,
        pending.column_number,
        TokenKind::LinkReferenceDefinition(LinkReferenceDefinitionStart {
            label,
            destination,
            title,
            raw_lines: pending.lines.into_iter().map(|l| l.content).collect(),
        }),
    ));
    state.emit(MarkdownToken::end(
        BlockKind::LinkReferenceDefinition,
        false,
        None,
    ));
}
