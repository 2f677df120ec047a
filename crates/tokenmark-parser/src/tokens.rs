//! Token model for the block tokenizer.
//!
//! Positions are 1-based. Columns count tab-expanded columns (tab stops
//! every 4 columns), measured from the start of the physical line.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MarkdownToken {
    pub line_number: usize,
    pub column_number: usize,
    pub kind: TokenKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum TokenKind {
    BlockQuote(BlockQuoteStart),
    UnorderedList(ListStart),
    OrderedList(ListStart),
    NewListItem(NewListItem),
    Paragraph(ParagraphStart),
    AtxHeading(AtxHeadingStart),
    SetextHeading(SetextHeadingStart),
    ThematicBreak(ThematicBreakStart),
    FencedCodeBlock(FencedCodeStart),
    IndentedCodeBlock,
    HtmlBlock(HtmlBlockStart),
    LinkReferenceDefinition(LinkReferenceDefinitionStart),
    Text(TextSpan),
    BlankLine(BlankLine),
    End(EndToken),
}

/// Start of a block quote.
///
/// `leading_spaces` holds one entry per physical line the quote spans: the
/// raw text this quote consumed from that line (`"> "`, `">"`, or `""` for a
/// lazy continuation line).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BlockQuoteStart {
    pub extracted_whitespace: String,
    pub leading_spaces: Vec<String>,
    pub leading_text_index: usize,
}

/// Start of an ordered or unordered list; also describes its first item.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ListStart {
    /// Bullet character, or the delimiter (`.` / `)`) of an ordered list.
    pub marker: char,
    /// Digits of the first item's number, for ordered lists.
    pub start_number: Option<String>,
    /// Absolute column at which the first item's content starts.
    pub indent_level: usize,
    pub extracted_whitespace: String,
    pub is_loose: bool,
    pub leading_spaces: Vec<String>,
    pub leading_text_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NewListItem {
    pub indent_level: usize,
    pub extracted_whitespace: String,
    pub marker: char,
    pub start_number: Option<String>,
}

/// Start of a paragraph. One whitespace entry per line of the paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParagraphStart {
    pub extracted_whitespace: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AtxHeadingStart {
    pub level: usize,
    pub extracted_whitespace: String,
    pub whitespace_after_marker: String,
}

/// A paragraph that was turned into a heading by a following underline.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SetextHeadingStart {
    pub marker: char,
    pub extracted_whitespace: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ThematicBreakStart {
    pub marker: char,
    pub extracted_whitespace: String,
    pub rest_of_line: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FencedCodeStart {
    pub fence_char: char,
    pub fence_count: usize,
    pub extracted_whitespace: String,
    pub whitespace_before_info: String,
    pub info_string: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HtmlBlockStart {
    /// CommonMark HTML block kind, 1 through 7.
    pub kind: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LinkReferenceDefinitionStart {
    pub label: String,
    pub destination: String,
    pub title: Option<String>,
    /// The definition's source lines, after any container prefixes.
    pub raw_lines: Vec<String>,
}

/// Literal text of a leaf block.
///
/// Inside paragraphs and setext headings `text` holds every line joined
/// with `\n` and the per-line whitespace lives on the start token. In code
/// and HTML blocks there is one text token per line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TextSpan {
    pub text: String,
    pub extracted_whitespace: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BlankLine {
    pub extracted_whitespace: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EndToken {
    pub block: BlockKind,
    /// True when the block was closed by something other than its own
    /// terminator (a blank line, an interrupting block, end of input).
    pub was_forced: bool,
    /// Source text that belongs to the block's end: an ATX closing
    /// sequence, a setext underline, or a closing fence line.
    pub extra_end_data: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BlockKind {
    BlockQuote,
    UnorderedList,
    OrderedList,
    Paragraph,
    AtxHeading,
    SetextHeading,
    ThematicBreak,
    FencedCodeBlock,
    IndentedCodeBlock,
    HtmlBlock,
    LinkReferenceDefinition,
}

impl BlockKind {
    pub fn name(self) -> &'static str {
        match self {
            BlockKind::BlockQuote => "block-quote",
            BlockKind::UnorderedList => "ulist",
            BlockKind::OrderedList => "olist",
            BlockKind::Paragraph => "para",
            BlockKind::AtxHeading => "atx",
            BlockKind::SetextHeading => "setext",
            BlockKind::ThematicBreak => "tbreak",
            BlockKind::FencedCodeBlock => "fcode-block",
            BlockKind::IndentedCodeBlock => "icode-block",
            BlockKind::HtmlBlock => "html-block",
            BlockKind::LinkReferenceDefinition => "link-ref-def",
        }
    }

    pub fn is_container(self) -> bool {
        matches!(
            self,
            BlockKind::BlockQuote | BlockKind::UnorderedList | BlockKind::OrderedList
        )
    }

    pub fn is_list(self) -> bool {
        matches!(self, BlockKind::UnorderedList | BlockKind::OrderedList)
    }
}

impl TokenKind {
    /// The block this token starts, if it is a start token.
    pub fn started_block(&self) -> Option<BlockKind> {
        match self {
            TokenKind::BlockQuote(_) => Some(BlockKind::BlockQuote),
            TokenKind::UnorderedList(_) => Some(BlockKind::UnorderedList),
            TokenKind::OrderedList(_) => Some(BlockKind::OrderedList),
            TokenKind::Paragraph(_) => Some(BlockKind::Paragraph),
            TokenKind::AtxHeading(_) => Some(BlockKind::AtxHeading),
            TokenKind::SetextHeading(_) => Some(BlockKind::SetextHeading),
            TokenKind::ThematicBreak(_) => Some(BlockKind::ThematicBreak),
            TokenKind::FencedCodeBlock(_) => Some(BlockKind::FencedCodeBlock),
            TokenKind::IndentedCodeBlock => Some(BlockKind::IndentedCodeBlock),
            TokenKind::HtmlBlock(_) => Some(BlockKind::HtmlBlock),
            TokenKind::LinkReferenceDefinition(_) => Some(BlockKind::LinkReferenceDefinition),
            TokenKind::NewListItem(_)
            | TokenKind::Text(_)
            | TokenKind::BlankLine(_)
            | TokenKind::End(_) => None,
        }
    }

    pub fn is_start(&self) -> bool {
        self.started_block().is_some()
    }

    pub fn is_end(&self) -> bool {
        matches!(self, TokenKind::End(_))
    }

    pub fn is_blank_line(&self) -> bool {
        matches!(self, TokenKind::BlankLine(_))
    }

    pub fn is_new_list_item(&self) -> bool {
        matches!(self, TokenKind::NewListItem(_))
    }

    /// Container prefixes recorded on a block quote or list start.
    pub fn leading_spaces(&self) -> Option<&[String]> {
        match self {
            TokenKind::BlockQuote(start) => Some(&start.leading_spaces),
            TokenKind::UnorderedList(start) | TokenKind::OrderedList(start) => {
                Some(&start.leading_spaces)
            }
            _ => None,
        }
    }

    pub(crate) fn leading_spaces_mut(&mut self) -> Option<&mut Vec<String>> {
        match self {
            TokenKind::BlockQuote(start) => Some(&mut start.leading_spaces),
            TokenKind::UnorderedList(start) | TokenKind::OrderedList(start) => {
                Some(&mut start.leading_spaces)
            }
            _ => None,
        }
    }
}

impl MarkdownToken {
    pub fn new(line_number: usize, column_number: usize, kind: TokenKind) -> Self {
        Self {
            line_number,
            column_number,
            kind,
        }
    }

    pub fn end(block: BlockKind, was_forced: bool, extra_end_data: Option<String>) -> Self {
        // End tokens carry no position of their own.
        Self::new(
            0,
            0,
            TokenKind::End(EndToken {
                block,
                was_forced,
                extra_end_data,
            }),
        )
    }
}

fn escape(text: &str) -> String {
    text.replace('\n', "\\n").replace('\t', "\\t")
}

fn join_lines(entries: &[String]) -> String {
    escape(&entries.join("\n"))
}

impl fmt::Display for MarkdownToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (line, col) = (self.line_number, self.column_number);
        match &self.kind {
            TokenKind::BlockQuote(bq) => write!(
                f,
                "[block-quote({line},{col}):{}:{}]",
                escape(&bq.extracted_whitespace),
                join_lines(&bq.leading_spaces)
            ),
            TokenKind::UnorderedList(list) | TokenKind::OrderedList(list) => {
                let name = if matches!(self.kind, TokenKind::UnorderedList(_)) {
                    "ulist"
                } else {
                    "olist"
                };
                write!(
                    f,
                    "[{name}({line},{col}):{}{}:{}:{}:{}:{}]",
                    list.start_number.as_deref().unwrap_or(""),
                    list.marker,
                    list.indent_level,
                    escape(&list.extracted_whitespace),
                    if list.is_loose { "loose" } else { "tight" },
                    join_lines(&list.leading_spaces)
                )
            }
            TokenKind::NewListItem(item) => write!(
                f,
                "[li({line},{col}):{}:{}:{}{}]",
                item.indent_level,
                escape(&item.extracted_whitespace),
                item.start_number.as_deref().unwrap_or(""),
                item.marker
            ),
            TokenKind::Paragraph(para) => write!(
                f,
                "[para({line},{col}):{}]",
                join_lines(&para.extracted_whitespace)
            ),
            TokenKind::AtxHeading(atx) => write!(
                f,
                "[atx({line},{col}):{}:{}:{}]",
                atx.level,
                escape(&atx.extracted_whitespace),
                escape(&atx.whitespace_after_marker)
            ),
            TokenKind::SetextHeading(setext) => write!(
                f,
                "[setext({line},{col}):{}:{}]",
                setext.marker,
                join_lines(&setext.extracted_whitespace)
            ),
            TokenKind::ThematicBreak(tbreak) => write!(
                f,
                "[tbreak({line},{col}):{}:{}:{}]",
                tbreak.marker,
                escape(&tbreak.extracted_whitespace),
                escape(&tbreak.rest_of_line)
            ),
            TokenKind::FencedCodeBlock(fence) => write!(
                f,
                "[fcode-block({line},{col}):{}:{}:{}:{}:{}]",
                fence.fence_char,
                fence.fence_count,
                escape(&fence.extracted_whitespace),
                escape(&fence.whitespace_before_info),
                escape(&fence.info_string)
            ),
            TokenKind::IndentedCodeBlock => write!(f, "[icode-block({line},{col})]"),
            TokenKind::HtmlBlock(html) => write!(f, "[html-block({line},{col}):{}]", html.kind),
            TokenKind::LinkReferenceDefinition(def) => write!(
                f,
                "[link-ref-def({line},{col}):{}:{}:{}]",
                escape(&def.label),
                escape(&def.destination),
                escape(def.title.as_deref().unwrap_or(""))
            ),
            TokenKind::Text(text) => write!(
                f,
                "[text({line},{col}):{}:{}]",
                escape(&text.text),
                escape(&text.extracted_whitespace)
            ),
            TokenKind::BlankLine(blank) => write!(
                f,
                "[BLANK({line},{col}):{}]",
                escape(&blank.extracted_whitespace)
            ),
            TokenKind::End(end) => write!(
                f,
                "[end-{}:{}:{}]",
                end.block.name(),
                escape(end.extra_end_data.as_deref().unwrap_or("")),
                end.was_forced
            ),
        }
    }
}
