//! Block quote markers.

use super::position::{BlockQuoteData, LineCursor};

/// Result of looking ahead for `>` markers on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BlockQuoteScan {
    /// Open block quotes plus the markers found from the scan position.
    pub current_count: usize,
    /// The innermost matched block is verbatim content (a fenced code or
    /// HTML block), so further markers on the line are content.
    pub avoid_container_starts: bool,
}

/// Consume a block quote marker (up to 3 columns of indentation, `>`, one
/// optional space) if the cursor is at one.
pub(crate) fn try_parse_block_quote_marker(cursor: &mut LineCursor<'_>) -> bool {
    if cursor.indent() > 3 || cursor.peek_nonspace() != Some(b'>') {
        return false;
    }
    cursor.advance_to_nonspace();
    cursor.advance_bytes(1);
    cursor.advance_optional_space();
    true
}

/// Count the `>` markers that follow `cursor` without consuming them.
///
/// Each marker may be preceded by up to 3 columns of whitespace, so
/// `> > >` and `>>>` both count three markers.
pub(crate) fn count_block_quote_markers(
    cursor: &LineCursor<'_>,
    data: BlockQuoteData,
    inside_raw_block: bool,
) -> BlockQuoteScan {
    let mut lookahead = cursor.clone();
    let mut count = data.current_count;
    if !inside_raw_block {
        while try_parse_block_quote_marker(&mut lookahead) {
            count += 1;
        }
    }
    BlockQuoteScan {
        current_count: count,
        avoid_container_starts: inside_raw_block,
    }
}
