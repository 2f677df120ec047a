//! Fenced code block recognition.

/// An opening code fence, parsed from the text after its indentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FenceInfo<'a> {
    pub fence_char: char,
    pub fence_count: usize,
    pub whitespace_before_info: &'a str,
    /// Raw info string, trailing whitespace included.
    pub info_string: &'a str,
}

pub(crate) fn try_parse_fence_open(rest: &str) -> Option<FenceInfo<'_>> {
    let fence_char = match rest.as_bytes().first()? {
        b'`' => '`',
        b'~' => '~',
        _ => return None,
    };
    let fence_count = rest.bytes().take_while(|&b| b == fence_char as u8).count();
    if fence_count < 3 {
        return None;
    }

    let after_fence = &rest[fence_count..];
    let info_string = after_fence.trim_start_matches([' ', '\t']);
    if fence_char == '`' && info_string.contains('`') {
        return None;
    }

    Some(FenceInfo {
        fence_char,
        fence_count,
        whitespace_before_info: &after_fence[..after_fence.len() - info_string.len()],
        info_string,
    })
}

/// Whether the text after a line's indentation closes a fence opened with
/// `fence_count` repetitions of `fence_char`.
pub(crate) fn is_closing_fence(rest: &str, fence_char: u8, fence_count: usize) -> bool {
    let closing_count = rest.bytes().take_while(|&b| b == fence_char).count();
    if closing_count < fence_count {
        return false;
    }
    rest[closing_count..]
        .bytes()
        .all(|b| b == b' ' || b == b'\t')
}
