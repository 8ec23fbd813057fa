use crate::reader::is_blank;

/// Longest ordered-list number CommonMark accepts.
const MAX_ORDINAL_DIGITS: usize = 9;

/// Spaces after the marker beyond which the content is indented code and the
/// item's content starts one column after the marker.
const MAX_MARKER_GAP: usize = 4;

/// Measures a list item marker at the start of `line` (indentation already
/// removed).
///
/// Returns the offset of the item's content column from the marker: the marker
/// plus the spaces that follow it. `None` when the line does not start a list
/// item, including thematic breaks such as `- - -`.
#[must_use]
pub fn content_offset(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let marker = match bytes.first()? {
        b'-' | b'+' | b'*' if !is_thematic_break(line) => 1,
        b'0'..=b'9' => {
            let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
            if digits > MAX_ORDINAL_DIGITS || !matches!(bytes.get(digits), Some(b'.' | b')')) {
                return None;
            }
            digits + 1
        }
        _ => return None,
    };

    let rest = &line[marker..];
    if is_blank(rest) {
        return Some(marker + 1);
    }

    let spaces = rest.bytes().take_while(|&b| b == b' ').count();
    match spaces {
        0 if rest.starts_with('\t') => Some(marker + 1),
        0 => None,
        1..=MAX_MARKER_GAP => Some(marker + spaces),
        _ => Some(marker + 1),
    }
}

/// Three or more of the same `-`, `*`, or `_`, with only spaces and tabs in
/// between.
fn is_thematic_break(line: &str) -> bool {
    let Some(&(marker @ (b'-' | b'*' | b'_'))) = line.as_bytes().first() else {
        return false;
    };
    let mut count = 0;
    for b in line.bytes() {
        match b {
            _ if b == marker => count += 1,
            b' ' | b'\t' => {}
            _ => return false,
        }
    }
    count >= 3
}
