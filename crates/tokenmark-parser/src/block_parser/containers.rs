//! Container reconciliation.
//!
//! Every line first walks the open block quotes and list items from the
//! outside in, consuming the prefix each one requires. What is left may
//! start further containers (`- > - text`), which are opened recursively
//! before the remainder goes to the leaf dispatcher.

use super::blockquotes::{count_block_quote_markers, try_parse_block_quote_marker};
use super::close_blocks::Hooks;
use super::lists::{ListMarker, consume_list_marker, markers_match, try_parse_list_marker};
use super::open_stack::{ListEntry, ListKind, StackEntry};
use super::position::{BlockQuoteData, LineContext};
use super::state::{ParserState, Requeue};
use crate::tokens::{BlockQuoteStart, ListStart, MarkdownToken, NewListItem, TokenKind};

/// Match the line against the containers already open, consuming their
/// prefixes. Stops at the first container the line does not continue.
pub(crate) fn match_open_containers(state: &mut ParserState, ctx: &mut LineContext<'_>) {
    ctx.block_quotes = BlockQuoteData::default();
    ctx.last_matched = 0;

    let containers = state.stack.container_count();
    for index in 1..containers {
        let matched = if let StackEntry::BlockQuote { token } = *state.stack.get(index) {
            let start = ctx.cursor.byte_offset();
            let found = try_parse_block_quote_marker(&mut ctx.cursor);
            if found {
                ctx.record_prefix(token, start);
                ctx.block_quotes.current_count += 1;
            }
            found
        } else {
            match_list_item(state, ctx, index)
        };
        if !matched {
            break;
        }
        ctx.last_matched = index;
    }

    ctx.all_matched = ctx.last_matched + 1 == containers;
    log::trace!(
        "line {}: matched {} of {} containers, quotes {:?}",
        ctx.line_number(),
        ctx.last_matched,
        containers - 1,
        ctx.block_quotes
    );
}

/// A blank line always continues a list. An item that began with a blank
/// line and got no content is closed by the next blank line; the list stays
/// open for a sibling item but no longer takes indented content.
fn match_list_item(state: &mut ParserState, ctx: &mut LineContext<'_>, index: usize) -> bool {
    let StackEntry::List(list) = state.stack.get(index) else {
        panic!(
            "{} found among open containers",
            state.stack.get(index).name()
        );
    };
    if ctx.cursor.is_blank() {
        if !list.item_closed
            && list.item_started_blank
            && !state.tokens.has_content_after(list.item_token)
        {
            log::debug!("line {}: empty list item closed", ctx.line_number());
            if let StackEntry::List(list) = state.stack.get_mut(index) {
                list.item_closed = true;
            }
        }
        return true;
    }
    if list.item_closed || ctx.cursor.indent() < list.content_offset {
        return false;
    }
    let (token, content_offset) = (list.token, list.content_offset);
    let start = ctx.cursor.byte_offset();
    ctx.cursor.advance_columns(content_offset);
    ctx.record_prefix(token, start);
    true
}

/// Open the block quotes and list items that start at the cursor, one level
/// per call.
pub(crate) fn open_new_containers(
    state: &mut ParserState,
    ctx: &mut LineContext<'_>,
    hooks: Hooks<'_>,
    depth: usize,
) -> Result<(), Requeue> {
    let inside_raw_block = ctx.all_matched && state.stack.last().is_raw_block();
    let scan = count_block_quote_markers(&ctx.cursor, ctx.block_quotes, inside_raw_block);
    ctx.avoid_container_starts = scan.avoid_container_starts;
    if ctx.avoid_container_starts || ctx.cursor.indent() >= 4 || ctx.cursor.is_blank() {
        return Ok(());
    }
    if state.stack.container_count() > state.options.max_container_depth {
        log::warn!(
            "line {}: container depth limit of {} reached",
            ctx.line_number(),
            state.options.max_container_depth
        );
        return Ok(());
    }

    if scan.current_count > ctx.block_quotes.current_count {
        log::debug!(
            "line {}: block quote {} opens at depth {}",
            ctx.line_number(),
            ctx.block_quotes.current_count + 1,
            depth
        );
        start_block_quote(state, ctx, hooks)?;
        return open_new_containers(state, ctx, hooks, depth + 1);
    }

    // Only an item that can interrupt the open paragraph may start here.
    let interrupts_paragraph = ctx.flags.continue_lazily
        || (ctx.all_matched && state.stack.last().is_paragraph_like());
    let Some(marker) = try_parse_list_marker(&ctx.cursor, interrupts_paragraph) else {
        return Ok(());
    };

    let next = ctx.last_matched + 1;
    let continues_list = next < state.stack.len()
        && matches!(state.stack.get(next), StackEntry::List(list) if markers_match(list.kind, &marker));
    if continues_list {
        log::debug!("line {}: new item in list at {}", ctx.line_number(), next);
        hooks.closer.close_open_blocks(state, next + 1)?;
        start_list_item(state, ctx, &marker, next);
    } else {
        log::debug!(
            "line {}: {:?} list opens at depth {}",
            ctx.line_number(),
            marker.kind,
            depth
        );
        hooks.closer.close_open_blocks(state, next)?;
        start_list(state, ctx, &marker);
    }
    open_new_containers(state, ctx, hooks, depth + 1)
}

fn start_block_quote(
    state: &mut ParserState,
    ctx: &mut LineContext<'_>,
    hooks: Hooks<'_>,
) -> Result<(), Requeue> {
    hooks.closer.close_open_blocks(state, ctx.last_matched + 1)?;

    let column = ctx.content_column();
    let whitespace = ctx.cursor.leading_whitespace().to_string();
    let start = ctx.cursor.byte_offset();
    if !try_parse_block_quote_marker(&mut ctx.cursor) {
        panic!("line {} lost its block quote marker", ctx.line_number());
    }

    let token = state.emit(MarkdownToken::new(
        ctx.line_number(),
        column,
        TokenKind::BlockQuote(BlockQuoteStart {
            extracted_whitespace: whitespace,
            ..Default::default()
        }),
    ));
    state.stack.push(StackEntry::BlockQuote { token });
    ctx.record_prefix(token, start);
    ctx.block_quotes.current_count += 1;
    ctx.last_matched = state.stack.len() - 1;
    ctx.all_matched = true;
    Ok(())
}

fn start_list(state: &mut ParserState, ctx: &mut LineContext<'_>, marker: &ListMarker) {
    let column = ctx.content_column();
    let whitespace = ctx.cursor.leading_whitespace().to_string();
    let indent_level = ctx.cursor.column() + marker.content_offset();

    let start = ListStart {
        marker: marker.kind.marker_char(),
        start_number: marker.start_number.clone(),
        indent_level,
        extracted_whitespace: whitespace,
        ..Default::default()
    };
    let kind = match marker.kind {
        ListKind::Ordered(_) => TokenKind::OrderedList(start),
        ListKind::Bullet(_) => TokenKind::UnorderedList(start),
    };
    let token = state.emit(MarkdownToken::new(ctx.line_number(), column, kind));
    state.stack.push(StackEntry::List(ListEntry {
        token,
        item_token: token,
        kind: marker.kind,
        content_offset: marker.content_offset(),
        indent_level,
        item_started_blank: marker.blank_after,
        item_closed: false,
    }));

    let from = ctx.cursor.byte_offset();
    consume_list_marker(&mut ctx.cursor, marker);
    ctx.record_prefix(token, from);
    ctx.last_matched = state.stack.len() - 1;
    ctx.all_matched = true;
}

fn start_list_item(
    state: &mut ParserState,
    ctx: &mut LineContext<'_>,
    marker: &ListMarker,
    index: usize,
) {
    let column = ctx.content_column();
    let whitespace = ctx.cursor.leading_whitespace().to_string();
    let indent_level = ctx.cursor.column() + marker.content_offset();

    let item = state.emit(MarkdownToken::new(
        ctx.line_number(),
        column,
        TokenKind::NewListItem(NewListItem {
            indent_level,
            extracted_whitespace: whitespace,
            marker: marker.kind.marker_char(),
            start_number: marker.start_number.clone(),
        }),
    ));
    let StackEntry::List(list) = state.stack.get_mut(index) else {
        panic!("stack entry {index} is not a list");
    };
    list.item_token = item;
    list.content_offset = marker.content_offset();
    list.indent_level = indent_level;
    list.item_started_blank = marker.blank_after;
    list.item_closed = false;
    let token = list.token;

    let from = ctx.cursor.byte_offset();
    consume_list_marker(&mut ctx.cursor, marker);
    ctx.record_prefix(token, from);
    ctx.last_matched = index;
    ctx.all_matched = true;
}
