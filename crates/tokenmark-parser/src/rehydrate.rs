//! Rebuild source text from a token stream.
//!
//! Every physical line is the concatenation of the prefixes recorded on the
//! containers open at that point, in nesting order, followed by the leaf
//! content for the line.

use crate::tokens::{BlockKind, MarkdownToken, TokenKind};

struct OpenContainer<'a> {
    leading_spaces: &'a [String],
    next: usize,
}

enum Leaf<'a> {
    Paragraph(&'a [String]),
    Atx { opening: String, text: &'a str },
    Verbatim,
}

#[derive(Default)]
struct Rehydrator<'a> {
    lines: Vec<String>,
    containers: Vec<OpenContainer<'a>>,
    /// Every open block, `true` for containers.
    open: Vec<bool>,
    leaf: Option<Leaf<'a>>,
}

impl<'a> Rehydrator<'a> {
    fn push_line(&mut self, content: &str) {
        let mut line = String::new();
        for container in &mut self.containers {
            if let Some(prefix) = container.leading_spaces.get(container.next) {
                line.push_str(prefix);
            }
            container.next += 1;
        }
        line.push_str(content);
        self.lines.push(line);
    }

    fn open_container(&mut self, leading_spaces: &'a [String], start: usize) {
        self.containers.push(OpenContainer {
            leading_spaces,
            next: start,
        });
        self.open.push(true);
    }

    fn open_leaf(&mut self, leaf: Leaf<'a>) {
        self.leaf = Some(leaf);
        self.open.push(false);
    }

    fn token(&mut self, token: &'a MarkdownToken) {
        match &token.kind {
            TokenKind::BlockQuote(start) => {
                self.open_container(&start.leading_spaces, start.leading_text_index)
            }
            TokenKind::UnorderedList(start) | TokenKind::OrderedList(start) => {
                self.open_container(&start.leading_spaces, start.leading_text_index)
            }
            TokenKind::NewListItem(_) => {}
            TokenKind::Paragraph(para) => self.open_leaf(Leaf::Paragraph(&para.extracted_whitespace)),
            TokenKind::SetextHeading(setext) => {
                self.open_leaf(Leaf::Paragraph(&setext.extracted_whitespace))
            }
            TokenKind::AtxHeading(atx) => self.open_leaf(Leaf::Atx {
                opening: format!(
                    "{}{}{}",
                    atx.extracted_whitespace,
                    "#".repeat(atx.level),
                    atx.whitespace_after_marker
                ),
                text: "",
            }),
            TokenKind::ThematicBreak(tbreak) => {
                self.push_line(&format!(
                    "{}{}",
                    tbreak.extracted_whitespace, tbreak.rest_of_line
                ));
                self.open_leaf(Leaf::Verbatim);
            }
            TokenKind::FencedCodeBlock(fence) => {
                self.push_line(&format!(
                    "{}{}{}{}",
                    fence.extracted_whitespace,
                    fence.fence_char.to_string().repeat(fence.fence_count),
                    fence.whitespace_before_info,
                    fence.info_string
                ));
                self.open_leaf(Leaf::Verbatim);
            }
            TokenKind::IndentedCodeBlock | TokenKind::HtmlBlock(_) => {
                self.open_leaf(Leaf::Verbatim)
            }
            TokenKind::LinkReferenceDefinition(def) => {
                for line in &def.raw_lines {
                    self.push_line(line);
                }
                self.open_leaf(Leaf::Verbatim);
            }
            TokenKind::Text(span) => match &mut self.leaf {
                Some(Leaf::Paragraph(whitespace)) => {
                    let whitespace = *whitespace;
                    for (i, text) in span.text.split('\n').enumerate() {
                        let ws = whitespace.get(i).map_or("", String::as_str);
                        self.push_line(&format!("{ws}{text}"));
                    }
                }
                Some(Leaf::Atx { text, .. }) => *text = &span.text,
                Some(Leaf::Verbatim) | None => {
                    self.push_line(&format!("{}{}", span.extracted_whitespace, span.text))
                }
            },
            TokenKind::BlankLine(blank) => self.push_line(&blank.extracted_whitespace),
            TokenKind::End(end) => {
                if self.open.pop() == Some(true) {
                    self.containers.pop();
                    return;
                }
                let leaf = self.leaf.take();
                match (end.block, leaf) {
                    (BlockKind::AtxHeading, Some(Leaf::Atx { opening, text })) => {
                        let closing = end.extra_end_data.as_deref().unwrap_or("");
                        self.push_line(&format!("{opening}{text}{closing}"));
                    }
                    (BlockKind::SetextHeading | BlockKind::FencedCodeBlock, _) => {
                        if let Some(extra) = &end.extra_end_data {
                            self.push_line(extra);
                        }
                    }
                    _ => {}
                }
            }
        }
    }
}

/// Reconstruct the document a token stream was produced from.
///
/// Line terminators come back as `\n`; everything else is reproduced byte
/// for byte.
pub fn rehydrate(tokens: &[MarkdownToken]) -> String {
    let mut rehydrator = Rehydrator::default();
    for token in tokens {
        rehydrator.token(token);
    }
    rehydrator.lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize;

    #[test]
    fn test_rehydrate_block_quote_with_lazy_line() {
        let input = "> line one\nline two\n";
        let tokens = tokenize(input).unwrap();
        assert_eq!(rehydrate(&tokens), input);
    }

    #[test]
    fn test_rehydrate_empty_document() {
        let tokens = tokenize("").unwrap();
        assert_eq!(rehydrate(&tokens), "");
    }

    #[test]
    fn test_rehydrate_heading_with_closing_sequence() {
        let input = "  ## Title ##  \n";
        let tokens = tokenize(input).unwrap();
        assert_eq!(rehydrate(&tokens), input);
    }
}
