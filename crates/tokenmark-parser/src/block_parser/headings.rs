//! ATX heading and setext underline recognition.

/// Pieces of an ATX heading line, all raw slices of the text after the
/// heading's indentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AtxHeading<'a> {
    pub level: usize,
    pub whitespace_after_marker: &'a str,
    pub text: &'a str,
    /// Optional closing `#` sequence plus any trailing whitespace.
    pub closing: &'a str,
}

/// Try to parse an ATX heading from the text after its indentation.
pub(crate) fn try_parse_atx_heading(rest: &str) -> Option<AtxHeading<'_>> {
    let level = rest.bytes().take_while(|&b| b == b'#').count();
    if level == 0 || level > 6 {
        return None;
    }

    let after_hashes = &rest[level..];
    if !after_hashes.is_empty() && !after_hashes.starts_with([' ', '\t']) {
        return None;
    }

    let content = after_hashes.trim_start_matches([' ', '\t']);
    let whitespace_after_marker = &after_hashes[..after_hashes.len() - content.len()];

    let without_trailing = content.trim_end_matches([' ', '\t']);
    let without_hashes = without_trailing.trim_end_matches('#');
    let text_len = if without_hashes.is_empty() {
        0
    } else if without_hashes.len() < without_trailing.len()
        && without_hashes.ends_with([' ', '\t'])
    {
        without_hashes.trim_end_matches([' ', '\t']).len()
    } else {
        without_trailing.len()
    };

    Some(AtxHeading {
        level,
        whitespace_after_marker,
        text: &content[..text_len],
        closing: &content[text_len..],
    })
}

/// Try to parse a setext underline from the text after its indentation.
/// Returns the underline character.
pub(crate) fn try_parse_setext_underline(rest: &str) -> Option<char> {
    let marker = match rest.as_bytes().first()? {
        b'=' => '=',
        b'-' => '-',
        _ => return None,
    };
    let after = rest.trim_start_matches(marker);
    after
        .bytes()
        .all(|b| b == b' ' || b == b'\t')
        .then_some(marker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_heading() {
        let heading = try_parse_atx_heading("# Heading").unwrap();
        assert_eq!(heading.level, 1);
        assert_eq!(heading.whitespace_after_marker, " ");
        assert_eq!(heading.text, "Heading");
        assert_eq!(heading.closing, "");
    }

    #[test]
    fn test_level_6() {
        assert_eq!(try_parse_atx_heading("###### H6").unwrap().level, 6);
    }

    #[test]
    fn test_level_7_invalid() {
        assert_eq!(try_parse_atx_heading("####### Too many"), None);
    }

    #[test]
    fn test_no_space_after_hash() {
        assert_eq!(try_parse_atx_heading("#NoSpace"), None);
    }

    #[test]
    fn test_empty_heading() {
        let heading = try_parse_atx_heading("#").unwrap();
        assert_eq!(heading.text, "");
        assert_eq!(heading.closing, "");

        let heading = try_parse_atx_heading("##   ").unwrap();
        assert_eq!(heading.whitespace_after_marker, "   ");
        assert_eq!(heading.text, "");
    }

    #[test]
    fn test_closing_sequence() {
        let heading = try_parse_atx_heading("## foo ##  ").unwrap();
        assert_eq!(heading.text, "foo");
        assert_eq!(heading.closing, " ##  ");
    }

    #[test]
    fn test_hash_glued_to_text_is_content() {
        let heading = try_parse_atx_heading("# foo#").unwrap();
        assert_eq!(heading.text, "foo#");
        assert_eq!(heading.closing, "");
    }

    #[test]
    fn test_only_closing_hashes() {
        let heading = try_parse_atx_heading("### ###").unwrap();
        assert_eq!(heading.whitespace_after_marker, " ");
        assert_eq!(heading.text, "");
        assert_eq!(heading.closing, "###");
    }

    #[test]
    fn test_setext_underlines() {
        assert_eq!(try_parse_setext_underline("==="), Some('='));
        assert_eq!(try_parse_setext_underline("-  "), Some('-'));
        assert_eq!(try_parse_setext_underline("= ="), None);
        assert_eq!(try_parse_setext_underline("--- a"), None);
        assert_eq!(try_parse_setext_underline("***"), None);
    }
}
