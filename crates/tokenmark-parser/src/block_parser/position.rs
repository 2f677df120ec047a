//! Per-line scanning position and the mutable context of the line being
//! tokenized.

use super::state::ParserState;
use crate::token_stream::TokenId;

const TAB_STOP: usize = 4;

/// A physical source line, without its terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SourceLine {
    pub number: usize,
    pub text: String,
}

/// Column-aware cursor over a single line.
///
/// Tabs advance to the next multiple of 4 columns. When a container
/// consumes only part of a tab, the tab's byte is considered consumed and
/// the remaining columns are carried in `partial`.
#[derive(Debug, Clone)]
pub(crate) struct LineCursor<'a> {
    text: &'a str,
    byte: usize,
    col: usize,
    partial: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            byte: 0,
            col: 0,
            partial: 0,
        }
    }

    pub fn byte_offset(&self) -> usize {
        self.byte
    }

    /// Zero-based column of the cursor.
    pub fn column(&self) -> usize {
        self.col
    }

    pub fn remainder(&self) -> &'a str {
        &self.text[self.byte..]
    }

    /// Raw text between `from` (a byte offset) and the cursor.
    pub fn consumed_since(&self, from: usize) -> &'a str {
        &self.text[from..self.byte]
    }

    /// Column and byte offset of the first non-whitespace character at or
    /// after the cursor (or of the end of the line).
    fn nonspace(&self) -> (usize, usize) {
        let bytes = self.text.as_bytes();
        let mut col = self.col + self.partial;
        let mut off = self.byte;
        while off < bytes.len() {
            match bytes[off] {
                b' ' => col += 1,
                b'\t' => col += TAB_STOP - (col % TAB_STOP),
                _ => break,
            }
            off += 1;
        }
        (col, off)
    }

    /// Columns of whitespace between the cursor and the next non-space.
    pub fn indent(&self) -> usize {
        self.nonspace().0 - self.col
    }

    /// Zero-based column of the next non-space character.
    pub fn nonspace_column(&self) -> usize {
        self.nonspace().0
    }

    pub fn peek_nonspace(&self) -> Option<u8> {
        self.text.as_bytes().get(self.nonspace().1).copied()
    }

    /// Text starting at the next non-space character.
    pub fn rest_after_indent(&self) -> &'a str {
        &self.text[self.nonspace().1..]
    }

    /// Raw whitespace between the cursor and the next non-space.
    pub fn leading_whitespace(&self) -> &'a str {
        &self.text[self.byte..self.nonspace().1]
    }

    pub fn is_blank(&self) -> bool {
        self.nonspace().1 >= self.text.len()
    }

    /// Consume up to `n` columns of whitespace, splitting a tab if needed.
    /// Returns the number of columns consumed.
    pub fn advance_columns(&mut self, n: usize) -> usize {
        let bytes = self.text.as_bytes();
        let mut consumed = 0;
        if self.partial > 0 {
            let take = self.partial.min(n);
            self.partial -= take;
            self.col += take;
            consumed += take;
        }
        while consumed < n && self.byte < bytes.len() {
            match bytes[self.byte] {
                b' ' => {
                    self.byte += 1;
                    self.col += 1;
                    consumed += 1;
                }
                b'\t' => {
                    let width = TAB_STOP - (self.col % TAB_STOP);
                    let wanted = n - consumed;
                    self.byte += 1;
                    if width <= wanted {
                        self.col += width;
                        consumed += width;
                    } else {
                        self.col += wanted;
                        self.partial = width - wanted;
                        consumed += wanted;
                    }
                }
                _ => break,
            }
        }
        consumed
    }

    /// Consume all whitespace up to the next non-space character.
    pub fn advance_to_nonspace(&mut self) {
        let (col, off) = self.nonspace();
        self.col = col;
        self.byte = off;
        self.partial = 0;
    }

    /// Consume `n` bytes of non-whitespace ASCII (a marker).
    pub fn advance_bytes(&mut self, n: usize) {
        debug_assert_eq!(self.partial, 0, "marker consumed inside a tab");
        self.byte = (self.byte + n).min(self.text.len());
        self.col += n;
    }

    /// Consume a single column if the next character is a space or tab.
    pub fn advance_optional_space(&mut self) {
        if self.partial > 0 || matches!(self.text.as_bytes().get(self.byte), Some(b' ' | b'\t'))
        {
            self.advance_columns(1);
        }
    }
}

/// Block quote markers matched so far on the current line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct BlockQuoteData {
    pub current_count: usize,
}

/// Per-line overrides set when a line is replayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct LineFlags {
    /// Do not try to start a link reference definition on this line.
    pub disable_definition: bool,
    /// The line was a lazy continuation of a definition that turned out to
    /// end earlier; keep it in the unmatched containers.
    pub continue_lazily: bool,
}

pub(crate) struct LineContext<'a> {
    pub line: &'a SourceLine,
    pub cursor: LineCursor<'a>,
    /// Stack index of the innermost container matched by this line.
    pub last_matched: usize,
    pub all_matched: bool,
    pub block_quotes: BlockQuoteData,
    pub avoid_container_starts: bool,
    pub flags: LineFlags,
    prefixes: Vec<(TokenId, String)>,
    prefixes_committed: bool,
}

impl<'a> LineContext<'a> {
    pub fn new(line: &'a SourceLine, flags: LineFlags) -> Self {
        Self {
            line,
            cursor: LineCursor::new(&line.text),
            last_matched: 0,
            all_matched: true,
            block_quotes: BlockQuoteData::default(),
            avoid_container_starts: false,
            flags,
            prefixes: Vec::new(),
            prefixes_committed: false,
        }
    }

    pub fn line_number(&self) -> usize {
        self.line.number
    }

    /// One-based column of the next non-space character.
    pub fn content_column(&self) -> usize {
        self.cursor.nonspace_column() + 1
    }

    /// One-based column of the cursor.
    pub fn cursor_column(&self) -> usize {
        self.cursor.column() + 1
    }

    /// Remember what `token`'s container consumed from this line, starting
    /// at byte `from`.
    pub fn record_prefix(&mut self, token: TokenId, from: usize) {
        debug_assert!(!self.prefixes_committed, "prefix recorded after commit");
        let piece = self.cursor.consumed_since(from).to_string();
        match self.prefixes.iter_mut().find(|(id, _)| *id == token) {
            Some((_, existing)) => existing.push_str(&piece),
            None => self.prefixes.push((token, piece)),
        }
    }

    /// Append this line's prefix to every open container, `""` for
    /// containers that did not consume anything (lazy continuation).
    pub fn commit_prefixes(&mut self, state: &mut ParserState) {
        if self.prefixes_committed {
            return;
        }
        self.prefixes_committed = true;
        let containers: Vec<TokenId> = state.stack.container_tokens().collect();
        for token in containers {
            let piece = self
                .prefixes
                .iter()
                .find(|(id, _)| *id == token)
                .map(|(_, piece)| piece.clone())
                .unwrap_or_default();
            let Some(leading) = state.tokens.get_mut(token).kind.leading_spaces_mut() else {
                panic!("container token {token} has no prefix list");
            };
            leading.push(piece);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_counts_tab_stops() {
        let cursor = LineCursor::new(" \tfoo");
        assert_eq!(cursor.indent(), 4);
        assert_eq!(cursor.peek_nonspace(), Some(b'f'));
        assert_eq!(cursor.rest_after_indent(), "foo");
    }

    #[test]
    fn test_advance_columns_splits_tab() {
        let mut cursor = LineCursor::new(">\tfoo");
        cursor.advance_bytes(1);
        cursor.advance_optional_space();
        // The tab spans columns 1..4; one column went to the marker.
        assert_eq!(cursor.byte_offset(), 2);
        assert_eq!(cursor.column(), 2);
        assert_eq!(cursor.indent(), 2);
        assert_eq!(cursor.leading_whitespace(), "");
    }

    #[test]
    fn test_partial_tab_then_more_columns() {
        let mut cursor = LineCursor::new("-\t\tbar");
        cursor.advance_bytes(1);
        cursor.advance_columns(1);
        assert_eq!(cursor.indent(), 6);
        assert_eq!(cursor.advance_columns(4), 4);
        assert_eq!(cursor.column(), 6);
        assert_eq!(cursor.indent(), 2);
    }

    #[test]
    fn test_blank_detection() {
        assert!(LineCursor::new("").is_blank());
        assert!(LineCursor::new(" \t ").is_blank());
        assert!(!LineCursor::new("  x").is_blank());
    }

    #[test]
    fn test_consumed_since() {
        let mut cursor = LineCursor::new("  > foo");
        let start = cursor.byte_offset();
        cursor.advance_to_nonspace();
        cursor.advance_bytes(1);
        cursor.advance_optional_space();
        assert_eq!(cursor.consumed_since(start), "  > ");
        assert_eq!(cursor.remainder(), "foo");
    }
}
