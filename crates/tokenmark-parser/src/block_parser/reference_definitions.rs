//! Link reference definition recognition.
//!
//! Reference definitions have the form:
//! ```markdown
//! [label]: url "optional title"
//! [label]: url 'optional title'
//! [label]: url (optional title)
//! [label]: <url> "title"
//! ```
//!
//! A definition may span several lines, so the scanner works on the lines
//! buffered so far and reports whether more lines could still complete it.

const MAX_LABEL_LENGTH: usize = 999;
const MAX_PAREN_DEPTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LinkDefinition {
    pub label: String,
    pub destination: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DefinitionScan {
    /// No number of further lines can make this a definition.
    Invalid,
    /// Not a definition yet, but a following line might complete it.
    Incomplete,
    /// The first `lines_used` lines form a definition.
    Complete {
        lines_used: usize,
        definition: LinkDefinition,
    },
}

enum TitleScan {
    Closed(usize),
    Unterminated,
    Invalid,
}

fn skip_spaces(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && matches!(bytes[pos], b' ' | b'\t') {
        pos += 1;
    }
    pos
}

fn line_of(text: &str, pos: usize) -> usize {
    text[..pos].bytes().filter(|&b| b == b'\n').count()
}

/// Scan a quoted or parenthesized title whose opener is at `pos`.
fn scan_title(bytes: &[u8], pos: usize) -> TitleScan {
    let opener = bytes[pos];
    let closer = if opener == b'(' { b')' } else { opener };
    let mut i = pos + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            c if c == closer => return TitleScan::Closed(i + 1),
            b'(' if opener == b'(' => return TitleScan::Invalid,
            _ => i += 1,
        }
    }
    TitleScan::Unterminated
}

/// Scan a link destination at `pos`. Returns the raw destination and the
/// position after it, or `None` if there is no valid destination.
fn scan_destination(text: &str, pos: usize) -> Option<(String, usize)> {
    let bytes = text.as_bytes();
    if bytes[pos] == b'<' {
        let mut i = pos + 1;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' if i + 1 < bytes.len() && bytes[i + 1] != b'\n' => i += 2,
                b'>' => return Some((text[pos + 1..i].to_string(), i + 1)),
                b'<' | b'\n' => return None,
                _ => i += 1,
            }
        }
        return None;
    }

    let mut depth = 0usize;
    let mut i = pos;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if i + 1 < bytes.len() && bytes[i + 1].is_ascii_punctuation() => i += 2,
            b'(' => {
                depth += 1;
                if depth > MAX_PAREN_DEPTH {
                    return None;
                }
                i += 1;
            }
            b')' if depth == 0 => break,
            b')' => {
                depth -= 1;
                i += 1;
            }
            b if b <= b' ' || b == 0x7f => break,
            _ => i += 1,
        }
    }
    if i == pos || depth != 0 {
        return None;
    }
    Some((text[pos..i].to_string(), i))
}

/// Scan buffered lines (container prefixes already removed) for a link
/// reference definition starting at the first line.
pub(crate) fn scan_link_reference_definition<S: AsRef<str>>(lines: &[S]) -> DefinitionScan {
    let text = lines
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n");
    let bytes = text.as_bytes();

    let mut pos = skip_spaces(bytes, 0);
    if bytes.get(pos) != Some(&b'[') {
        return DefinitionScan::Invalid;
    }
    let label_start = pos + 1;
    pos = label_start;
    loop {
        match bytes.get(pos) {
            None => {
                return if pos - label_start > MAX_LABEL_LENGTH {
                    DefinitionScan::Invalid
                } else {
                    DefinitionScan::Incomplete
                };
            }
            Some(b'\\') => pos += 2,
            Some(b'[') => return DefinitionScan::Invalid,
            Some(b']') => break,
            Some(_) => pos += 1,
        }
    }
    let label = &text[label_start..pos];
    if label.len() > MAX_LABEL_LENGTH || label.trim().is_empty() {
        return DefinitionScan::Invalid;
    }
    pos += 1;
    if bytes.get(pos) != Some(&b':') {
        return DefinitionScan::Invalid;
    }
    pos = skip_spaces(bytes, pos + 1);
    if bytes.get(pos) == Some(&b'\n') {
        pos = skip_spaces(bytes, pos + 1);
    }
    if pos >= bytes.len() {
        return DefinitionScan::Incomplete;
    }

    let Some((destination, dest_end)) = scan_destination(&text, pos) else {
        return DefinitionScan::Invalid;
    };
    let complete = |lines_used: usize, title: Option<String>| DefinitionScan::Complete {
        lines_used,
        definition: LinkDefinition {
            label: label.to_string(),
            destination: destination.clone(),
            title,
        },
    };
    let without_title = complete(line_of(&text, dest_end) + 1, None);

    pos = skip_spaces(bytes, dest_end);
    let had_space = pos > dest_end;
    match bytes.get(pos) {
        None => return without_title,
        Some(b'\n') => {
            // A title on the following line is optional; the definition
            // already stands without it.
            let title_start = skip_spaces(bytes, pos + 1);
            if !matches!(bytes.get(title_start), Some(b'"' | b'\'' | b'(')) {
                return without_title;
            }
            match scan_title(bytes, title_start) {
                TitleScan::Unterminated => DefinitionScan::Incomplete,
                TitleScan::Invalid => without_title,
                TitleScan::Closed(end) => {
                    let after = skip_spaces(bytes, end);
                    if matches!(bytes.get(after), None | Some(b'\n')) {
                        complete(
                            line_of(&text, end) + 1,
                            Some(text[title_start + 1..end - 1].to_string()),
                        )
                    } else {
                        without_title
                    }
                }
            }
        }
        Some(b'"' | b'\'' | b'(') if had_space => match scan_title(bytes, pos) {
            TitleScan::Unterminated => DefinitionScan::Incomplete,
            TitleScan::Invalid => DefinitionScan::Invalid,
            TitleScan::Closed(end) => {
                let after = skip_spaces(bytes, end);
                if matches!(bytes.get(after), None | Some(b'\n')) {
                    complete(
                        line_of(&text, end) + 1,
                        Some(text[pos + 1..end - 1].to_string()),
                    )
                } else {
                    DefinitionScan::Invalid
                }
            }
        },
        Some(_) => DefinitionScan::Invalid,
    }
}

/// Longest prefix of `lines` that forms a complete definition, found by
/// peeling lines off the end until the scan completes.
pub(crate) fn longest_definition_prefix<S: AsRef<str>>(
    lines: &[S],
) -> Option<(usize, LinkDefinition)> {
    (1..=lines.len())
        .rev()
        .find_map(|end| match scan_link_reference_definition(&lines[..end]) {
            DefinitionScan::Complete {
                lines_used,
                definition,
            } => Some((lines_used, definition)),
            DefinitionScan::Invalid | DefinitionScan::Incomplete => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete(lines_used: usize, label: &str, dest: &str, title: Option<&str>) -> DefinitionScan {
        DefinitionScan::Complete {
            lines_used,
            definition: LinkDefinition {
                label: label.to_string(),
                destination: dest.to_string(),
                title: title.map(str::to_string),
            },
        }
    }

    #[test]
    fn test_simple_definition() {
        assert_eq!(
            scan_link_reference_definition(&["[foo]: /url"]),
            complete(1, "foo", "/url", None)
        );
    }

    #[test]
    fn test_definition_with_title() {
        assert_eq!(
            scan_link_reference_definition(&["   [foo]: <my url> 'the title'  "]),
            complete(1, "foo", "my url", Some("the title"))
        );
    }

    #[test]
    fn test_unterminated_label_is_incomplete() {
        assert_eq!(
            scan_link_reference_definition(&["[foo"]),
            DefinitionScan::Incomplete
        );
        assert_eq!(
            scan_link_reference_definition(&["[foo", "bar"]),
            DefinitionScan::Incomplete
        );
    }

    #[test]
    fn test_missing_colon_is_invalid() {
        assert_eq!(
            scan_link_reference_definition(&["[foo] /url"]),
            DefinitionScan::Invalid
        );
        assert_eq!(
            scan_link_reference_definition(&["[foo]"]),
            DefinitionScan::Invalid
        );
    }

    #[test]
    fn test_destination_on_next_line() {
        assert_eq!(
            scan_link_reference_definition(&["[foo]:"]),
            DefinitionScan::Incomplete
        );
        assert_eq!(
            scan_link_reference_definition(&["[foo]:", "/url"]),
            complete(2, "foo", "/url", None)
        );
    }

    #[test]
    fn test_title_on_next_line() {
        assert_eq!(
            scan_link_reference_definition(&["[foo]: /url", "\"title\""]),
            complete(2, "foo", "/url", Some("title"))
        );
    }

    #[test]
    fn test_unterminated_title_on_next_line_is_incomplete() {
        assert_eq!(
            scan_link_reference_definition(&["[foo]: /url", "'the", "title"]),
            DefinitionScan::Incomplete
        );
    }

    #[test]
    fn test_trailing_text_after_next_line_title_drops_title() {
        assert_eq!(
            scan_link_reference_definition(&["[foo]: /url", "\"title\" ok"]),
            complete(1, "foo", "/url", None)
        );
    }

    #[test]
    fn test_non_title_next_line_ends_definition() {
        assert_eq!(
            scan_link_reference_definition(&["[foo]: /url", "bar"]),
            complete(1, "foo", "/url", None)
        );
    }

    #[test]
    fn test_trailing_text_on_same_line_is_invalid() {
        assert_eq!(
            scan_link_reference_definition(&["[foo]: /url \"title\" ok"]),
            DefinitionScan::Invalid
        );
        assert_eq!(
            scan_link_reference_definition(&["[foo]: <bar>(baz)"]),
            DefinitionScan::Invalid
        );
    }

    #[test]
    fn test_empty_label_is_invalid() {
        assert_eq!(
            scan_link_reference_definition(&["[  ]: /url"]),
            DefinitionScan::Invalid
        );
    }

    #[test]
    fn test_nested_bracket_is_invalid() {
        assert_eq!(
            scan_link_reference_definition(&["[a[b]]: /url"]),
            DefinitionScan::Invalid
        );
    }

    #[test]
    fn test_multiline_label() {
        assert_eq!(
            scan_link_reference_definition(&["[foo", "bar]: /url"]),
            complete(2, "foo\nbar", "/url", None)
        );
    }

    #[test]
    fn test_longest_prefix_peels_lines() {
        let lines = ["[foo]: /url", "'unclosed", "- a"];
        let (used, def) = longest_definition_prefix(&lines).unwrap();
        assert_eq!(used, 1);
        assert_eq!(def.destination, "/url");
        assert_eq!(longest_definition_prefix(&["[foo", "bar"]), None);
    }
}
