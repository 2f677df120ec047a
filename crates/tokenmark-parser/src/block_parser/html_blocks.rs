//! HTML block recognition.

use std::sync::LazyLock;

use regex::Regex;

/// Tag names that start a kind 6 HTML block.
const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "base",
    "basefont",
    "blockquote",
    "body",
    "caption",
    "center",
    "col",
    "colgroup",
    "dd",
    "details",
    "dialog",
    "dir",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "frame",
    "frameset",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "head",
    "header",
    "hr",
    "html",
    "iframe",
    "legend",
    "li",
    "link",
    "main",
    "menu",
    "menuitem",
    "nav",
    "noframes",
    "ol",
    "optgroup",
    "option",
    "p",
    "param",
    "section",
    "source",
    "summary",
    "table",
    "tbody",
    "td",
    "tfoot",
    "th",
    "thead",
    "title",
    "tr",
    "track",
    "ul",
];

/// Tags whose content is raw text; their block ends at the closing tag.
const VERBATIM_TAGS: &[&str] = &["pre", "script", "style", "textarea"];

static OPEN_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^<[A-Za-z][A-Za-z0-9-]*(?:\s+[A-Za-z_:][A-Za-z0-9_.:-]*(?:\s*=\s*(?:[^\s"'=<>`]+|'[^']*'|"[^"]*"))?)*\s*/?>\s*$"#,
    )
    .unwrap()
});

static CLOSING_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^</[A-Za-z][A-Za-z0-9-]*\s*>\s*$").unwrap());

/// The seven kinds of HTML block, in CommonMark's numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HtmlBlockType {
    /// `<pre`, `<script`, `<style`, `<textarea`
    Verbatim,
    /// `<!--`
    Comment,
    /// `<?`
    ProcessingInstruction,
    /// `<!` followed by a letter
    Declaration,
    /// `<![CDATA[`
    CData,
    /// Opening or closing block-level tag
    BlockTag,
    /// Any other complete tag alone on its line
    CompleteTag,
}

impl HtmlBlockType {
    pub fn kind(self) -> u8 {
        match self {
            Self::Verbatim => 1,
            Self::Comment => 2,
            Self::ProcessingInstruction => 3,
            Self::Declaration => 4,
            Self::CData => 5,
            Self::BlockTag => 6,
            Self::CompleteTag => 7,
        }
    }

    pub fn from_kind(kind: u8) -> Option<Self> {
        Some(match kind {
            1 => Self::Verbatim,
            2 => Self::Comment,
            3 => Self::ProcessingInstruction,
            4 => Self::Declaration,
            5 => Self::CData,
            6 => Self::BlockTag,
            7 => Self::CompleteTag,
            _ => return None,
        })
    }

    /// Kinds 6 and 7 end at a blank line; the others at a closing marker.
    pub fn ends_at_blank_line(self) -> bool {
        matches!(self, Self::BlockTag | Self::CompleteTag)
    }

    /// Whether `line` contains this block's closing marker.
    pub fn is_closed_by(self, line: &str) -> bool {
        match self {
            Self::Verbatim => {
                let lower = line.to_ascii_lowercase();
                VERBATIM_TAGS
                    .iter()
                    .any(|tag| lower.contains(&format!("</{}>", tag)))
            }
            Self::Comment => line.contains("-->"),
            Self::ProcessingInstruction => line.contains("?>"),
            Self::Declaration => line.contains('>'),
            Self::CData => line.contains("]]>"),
            Self::BlockTag | Self::CompleteTag => false,
        }
    }
}

/// Leading tag name after `<` or `</`, with the text that follows it.
fn extract_tag_name(after_bracket: &str) -> Option<(&str, &str)> {
    let bytes = after_bracket.as_bytes();
    if !bytes.first()?.is_ascii_alphabetic() {
        return None;
    }
    let len = bytes
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric() || **b == b'-')
        .count();
    Some((&after_bracket[..len], &after_bracket[len..]))
}

/// Try to detect an HTML block opening in the text after its indentation.
pub(crate) fn try_parse_html_block_start(
    rest: &str,
    interrupts_paragraph: bool,
) -> Option<HtmlBlockType> {
    let after_bracket = rest.strip_prefix('<')?;

    if let Some((name, after)) = extract_tag_name(after_bracket)
        && VERBATIM_TAGS.contains(&name.to_ascii_lowercase().as_str())
        && (after.is_empty() || after.starts_with([' ', '\t', '>']))
    {
        return Some(HtmlBlockType::Verbatim);
    }
    if rest.starts_with("<!--") {
        return Some(HtmlBlockType::Comment);
    }
    if rest.starts_with("<?") {
        return Some(HtmlBlockType::ProcessingInstruction);
    }
    if rest.starts_with("<![CDATA[") {
        return Some(HtmlBlockType::CData);
    }
    if let Some(after_bang) = rest.strip_prefix("<!")
        && after_bang
            .as_bytes()
            .first()
            .is_some_and(u8::is_ascii_alphabetic)
    {
        return Some(HtmlBlockType::Declaration);
    }

    let tag_start = after_bracket.strip_prefix('/').unwrap_or(after_bracket);
    if let Some((name, after)) = extract_tag_name(tag_start)
        && BLOCK_TAGS.contains(&name.to_ascii_lowercase().as_str())
        && (after.is_empty() || after.starts_with([' ', '\t', '>']) || after.starts_with("/>"))
    {
        return Some(HtmlBlockType::BlockTag);
    }

    if !interrupts_paragraph && (OPEN_TAG.is_match(rest) || CLOSING_TAG.is_match(rest)) {
        let is_verbatim = extract_tag_name(tag_start).is_some_and(|(name, _)| {
            VERBATIM_TAGS.contains(&name.to_ascii_lowercase().as_str())
        });
        if !is_verbatim {
            return Some(HtmlBlockType::CompleteTag);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbatim_tags() {
        assert_eq!(
            try_parse_html_block_start("<pre>", false),
            Some(HtmlBlockType::Verbatim)
        );
        assert_eq!(
            try_parse_html_block_start("<SCRIPT type=\"x\">", false),
            Some(HtmlBlockType::Verbatim)
        );
        assert_ne!(
            try_parse_html_block_start("<prefix>", false),
            Some(HtmlBlockType::Verbatim)
        );
    }

    #[test]
    fn test_comment_and_friends() {
        assert_eq!(
            try_parse_html_block_start("<!-- x", true),
            Some(HtmlBlockType::Comment)
        );
        assert_eq!(
            try_parse_html_block_start("<?php", true),
            Some(HtmlBlockType::ProcessingInstruction)
        );
        assert_eq!(
            try_parse_html_block_start("<!DOCTYPE html>", true),
            Some(HtmlBlockType::Declaration)
        );
        assert_eq!(
            try_parse_html_block_start("<![CDATA[", true),
            Some(HtmlBlockType::CData)
        );
    }

    #[test]
    fn test_block_tags() {
        assert_eq!(
            try_parse_html_block_start("<div class=\"x\">", true),
            Some(HtmlBlockType::BlockTag)
        );
        assert_eq!(
            try_parse_html_block_start("</TABLE>", true),
            Some(HtmlBlockType::BlockTag)
        );
        assert_eq!(
            try_parse_html_block_start("<hr/>", true),
            Some(HtmlBlockType::BlockTag)
        );
        assert_eq!(try_parse_html_block_start("<divx>", true), None);
    }

    #[test]
    fn test_complete_tag_cannot_interrupt_paragraph() {
        assert_eq!(
            try_parse_html_block_start("<a href=\"foo\">", false),
            Some(HtmlBlockType::CompleteTag)
        );
        assert_eq!(try_parse_html_block_start("<a href=\"foo\">", true), None);
        assert_eq!(
            try_parse_html_block_start("</span>  ", false),
            Some(HtmlBlockType::CompleteTag)
        );
        assert_eq!(try_parse_html_block_start("<a href=\"foo\"> text", false), None);
    }

    #[test]
    fn test_end_conditions() {
        assert!(HtmlBlockType::Verbatim.is_closed_by("x </STYLE> y"));
        assert!(HtmlBlockType::Comment.is_closed_by("-->"));
        assert!(!HtmlBlockType::Comment.is_closed_by("--"));
        assert!(HtmlBlockType::CData.is_closed_by("]]>"));
        assert!(!HtmlBlockType::BlockTag.is_closed_by("</div>"));
        assert!(HtmlBlockType::BlockTag.ends_at_blank_line());
    }

    #[test]
    fn test_kind_numbers_round_trip() {
        for kind in 1..=7 {
            assert_eq!(HtmlBlockType::from_kind(kind).map(HtmlBlockType::kind), Some(kind));
        }
        assert_eq!(HtmlBlockType::from_kind(8), None);
    }
}
