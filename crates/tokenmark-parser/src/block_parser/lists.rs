use super::horizontal_rules::try_parse_thematic_break;
use super::open_stack::ListKind;
use super::position::LineCursor;

/// A list marker found at the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ListMarker {
    pub kind: ListKind,
    /// Digits of an ordered marker.
    pub start_number: Option<String>,
    /// Columns of whitespace before the marker.
    pub marker_offset: usize,
    pub marker_width: usize,
    /// Columns from the start of the marker to the item's content.
    pub padding: usize,
    /// Nothing but whitespace follows the marker.
    pub blank_after: bool,
    spaces_after: usize,
}

impl ListMarker {
    /// Columns from the cursor to the item's content.
    pub fn content_offset(&self) -> usize {
        self.marker_offset + self.padding
    }
}

/// Try to parse a list marker at the cursor without consuming it.
///
/// `interrupts_paragraph` applies the stricter rules for a marker that would
/// end an open paragraph: the item must not be empty and an ordered list
/// must start at 1.
pub(crate) fn try_parse_list_marker(
    cursor: &LineCursor<'_>,
    interrupts_paragraph: bool,
) -> Option<ListMarker> {
    let marker_offset = cursor.indent();
    if marker_offset > 3 {
        return None;
    }
    let rest = cursor.rest_after_indent();
    let bytes = rest.as_bytes();
    let first = *bytes.first()?;

    let (kind, start_number, marker_width) = match first {
        b'-' | b'+' | b'*' => {
            if try_parse_thematic_break(rest).is_some() {
                return None;
            }
            (ListKind::Bullet(first), None, 1)
        }
        b'0'..=b'9' => {
            let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
            if digits > 9 {
                return None;
            }
            let delimiter = *bytes.get(digits)?;
            if !matches!(delimiter, b'.' | b')') {
                return None;
            }
            (
                ListKind::Ordered(delimiter),
                Some(rest[..digits].to_string()),
                digits + 1,
            )
        }
        _ => return None,
    };

    if !matches!(bytes.get(marker_width), None | Some(b' ' | b'\t')) {
        return None;
    }

    let mut after = cursor.clone();
    after.advance_to_nonspace();
    after.advance_bytes(marker_width);
    let blank_after = after.is_blank();
    let spaces_after = after.indent();

    if interrupts_paragraph {
        if blank_after {
            return None;
        }
        if let Some(number) = &start_number
            && number.parse::<u32>().ok() != Some(1)
        {
            return None;
        }
    }

    let padding = if blank_after || spaces_after >= 5 {
        marker_width + 1
    } else {
        marker_width + spaces_after
    };

    Some(ListMarker {
        kind,
        start_number,
        marker_offset,
        marker_width,
        padding,
        blank_after,
        spaces_after,
    })
}

/// Move the cursor past the marker and the whitespace that belongs to it.
pub(crate) fn consume_list_marker(cursor: &mut LineCursor<'_>, marker: &ListMarker) {
    cursor.advance_to_nonspace();
    cursor.advance_bytes(marker.marker_width);
    if marker.blank_after || marker.spaces_after >= 5 {
        cursor.advance_optional_space();
    } else {
        cursor.advance_columns(marker.spaces_after);
    }
}

/// Whether an item with `marker` continues a list of kind `kind`.
pub(crate) fn markers_match(kind: ListKind, marker: &ListMarker) -> bool {
    kind == marker.kind
}
