//! Indented code block recognition.
//!
//! A line indented four or more columns starts (or continues) an indented
//! code block. Exactly four columns are stripped; the rest is content.
//! Blank lines in the verbatim text need not be indented.

use super::position::LineCursor;

pub(crate) const CODE_INDENT: usize = 4;

/// Check if the line at `cursor` is indented enough for indented code.
pub(crate) fn is_indented_code_line(cursor: &LineCursor<'_>) -> bool {
    !cursor.is_blank() && cursor.indent() >= CODE_INDENT
}

/// Consume the code indentation and return the raw whitespace it covered.
pub(crate) fn strip_code_indent<'a>(cursor: &mut LineCursor<'a>) -> &'a str {
    let start = cursor.byte_offset();
    cursor.advance_columns(CODE_INDENT);
    cursor.consumed_since(start)
}
