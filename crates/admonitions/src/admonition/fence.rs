use std::ops::Range;

use super::Admonition;
use crate::attributes::{Attributes, parse_attributes};
use crate::reader::{BLANK, trim_blank};

/// Minimum marker run length for both opening and closing fences.
pub const MIN_FENCE_LENGTH: usize = 3;

/// An opening fence recognized on a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpeningFence {
    pub marker: u8,
    /// Length of the marker run.
    pub length: usize,
    /// Byte range of the text after the run, trimmed of surrounding whitespace.
    pub remainder: Range<usize>,
}

/// Recognizes an opening fence at byte offset `pos` of `line`.
///
/// Rejects:
/// - a line whose character at `pos` is not `marker`
/// - a marker run shorter than [`MIN_FENCE_LENGTH`]
/// - a bare run with nothing but whitespace after it
///
/// A bare run is reserved for closing: `!!!` alone cannot be told apart from
/// "open an admonition without attributes".
#[must_use]
pub fn scan_opening_fence(line: &str, pos: usize, marker: u8) -> Option<OpeningFence> {
    let rest = line.as_bytes().get(pos..)?;
    if rest.first() != Some(&marker) {
        return None;
    }

    let length = rest.iter().take_while(|&&b| b == marker).count();
    if length < MIN_FENCE_LENGTH {
        return None;
    }

    let after = pos + length;
    let tail = &line[after..];
    let trimmed = trim_blank(tail);
    if trimmed.is_empty() {
        return None;
    }

    let start = after + (tail.len() - tail.trim_start_matches(BLANK).len());
    Some(OpeningFence {
        marker,
        length,
        remainder: start..start + trimmed.len(),
    })
}

/// The pieces of an opening line's remainder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpeningLine<'a> {
    pub class_token: &'a str,
    pub title: &'a str,
    /// `None` when there is no `{` or the attribute list does not parse.
    pub attributes: Option<Attributes>,
}

/// Splits the text after an opening fence into class token, title, and
/// attribute list.
///
/// The class token runs up to the first space or `{`. The title is whatever
/// follows, up to the first `{`, trimmed. An attribute list that fails to parse
/// is dropped without affecting class or title.
#[must_use]
pub fn split_opening_line(remainder: &str) -> OpeningLine<'_> {
    let class_end = remainder
        .find([' ', '{'])
        .unwrap_or(remainder.len());
    let class_token = &remainder[..class_end];

    let after_class = remainder[class_end..].trim_start_matches(BLANK);
    let (title, attributes) = match after_class.find('{') {
        Some(brace) => (
            after_class[..brace].trim_end_matches(BLANK),
            parse_attributes(&after_class[brace..]),
        ),
        None => (after_class.trim_end_matches(BLANK), None),
    };

    OpeningLine {
        class_token,
        title,
        attributes,
    }
}

/// Builds the container node for an opening line remainder.
#[must_use]
pub fn parse_opening_line(remainder: &str, depth: usize) -> Admonition {
    let OpeningLine {
        class_token,
        title,
        attributes,
    } = split_opening_line(remainder);

    Admonition::new(class_token, title, attributes.unwrap_or_default(), depth)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remainder<'a>(line: &'a str, fence: &OpeningFence) -> &'a str {
        &line[fence.remainder.clone()]
    }

    // -- scan_opening_fence --

    #[test]
    fn scan_fence_with_class() {
        let line = "!!!!note This is a note";
        let fence = scan_opening_fence(line, 0, b'!').unwrap();
        assert_eq!(fence.marker, b'!');
        assert_eq!(fence.length, 4);
        assert_eq!(remainder(line, &fence), "note This is a note");
    }

    #[test]
    fn scan_fence_trims_remainder() {
        let line = "!!!   note title   ";
        let fence = scan_opening_fence(line, 0, b'!').unwrap();
        assert_eq!(remainder(line, &fence), "note title");
    }

    #[test]
    fn scan_fence_at_indent_offset() {
        let line = "   !!!danger x";
        let fence = scan_opening_fence(line, 3, b'!').unwrap();
        assert_eq!(fence.length, 3);
        assert_eq!(remainder(line, &fence), "danger x");
    }

    #[test]
    fn scan_rejects_short_runs() {
        for suffix in ["note", "note Title", "note {.x}", "{#id}", ""] {
            for run in ["!", "!!"] {
                let line = format!("{run}{suffix}");
                assert!(
                    scan_opening_fence(&line, 0, b'!').is_none(),
                    "{line:?} must not open"
                );
            }
        }
    }

    #[test]
    fn scan_rejects_bare_run() {
        assert!(scan_opening_fence("!!!", 0, b'!').is_none());
        assert!(scan_opening_fence("!!!!!!", 0, b'!').is_none());
    }

    #[test]
    fn scan_rejects_whitespace_only_remainder() {
        assert!(scan_opening_fence("!!!   ", 0, b'!').is_none());
        assert!(scan_opening_fence("!!!\t", 0, b'!').is_none());
    }

    #[test]
    fn scan_unicode_whitespace_is_remainder_text() {
        let line = "!!!\u{3000}";
        let fence = scan_opening_fence(line, 0, b'!').unwrap();
        assert_eq!(remainder(line, &fence), "\u{3000}");
    }

    #[test]
    fn scan_rejects_other_marker() {
        assert!(scan_opening_fence("???note", 0, b'!').is_none());
        assert!(scan_opening_fence("note !!!", 0, b'!').is_none());
    }

    #[test]
    fn scan_custom_marker() {
        let line = "???tip";
        let fence = scan_opening_fence(line, 0, b'?').unwrap();
        assert_eq!(remainder(line, &fence), "tip");
    }

    #[test]
    fn scan_offset_out_of_range() {
        assert!(scan_opening_fence("!!!", 10, b'!').is_none());
    }

    // -- split_opening_line --

    #[test]
    fn split_class_only() {
        let parts = split_opening_line("note");
        assert_eq!(parts.class_token, "note");
        assert_eq!(parts.title, "");
        assert!(parts.attributes.is_none());
    }

    #[test]
    fn split_class_and_title() {
        let parts = split_opening_line("note With title!");
        assert_eq!(parts.class_token, "note");
        assert_eq!(parts.title, "With title!");
    }

    #[test]
    fn split_title_stops_at_brace() {
        let parts = split_opening_line("danger With Attributes!{.otherclass}");
        assert_eq!(parts.class_token, "danger");
        assert_eq!(parts.title, "With Attributes!");
        assert_eq!(
            parts.attributes.unwrap().get("class"),
            Some("otherclass")
        );
    }

    #[test]
    fn split_title_trailing_spaces_trimmed() {
        let parts = split_opening_line("note This is a note {#big-div .add-border}");
        assert_eq!(parts.title, "This is a note");
        let attrs = parts.attributes.unwrap();
        assert_eq!(attrs.get("id"), Some("big-div"));
        assert_eq!(attrs.get("class"), Some("add-border"));
    }

    #[test]
    fn split_class_token_stops_at_brace() {
        let parts = split_opening_line("note{#x}");
        assert_eq!(parts.class_token, "note");
        assert_eq!(parts.title, "");
        assert_eq!(parts.attributes.unwrap().get("id"), Some("x"));
    }

    #[test]
    fn split_empty_class_token() {
        let parts = split_opening_line("{.x}");
        assert_eq!(parts.class_token, "");
        assert_eq!(parts.title, "");
        assert!(parts.attributes.is_some());
    }

    #[test]
    fn split_malformed_attributes_keep_title() {
        let parts = split_opening_line("note Use {braces");
        assert_eq!(parts.class_token, "note");
        assert_eq!(parts.title, "Use");
        assert!(parts.attributes.is_none());
    }

    // -- parse_opening_line --

    #[test]
    fn parse_merges_shorthand_class() {
        let node = parse_opening_line("danger Title {.extra}", 0);
        assert_eq!(node.class_token, "danger");
        assert_eq!(node.title, "Title");
        assert_eq!(node.class(), "admonition adm-danger extra");
    }

    #[test]
    fn parse_merges_explicit_class() {
        let node = parse_opening_line("danger Title {class=extra}", 0);
        assert_eq!(node.class(), "admonition adm-danger extra");
    }

    #[test]
    fn parse_id_only() {
        let node = parse_opening_line("danger Title {#id}", 0);
        assert_eq!(node.id(), Some("id"));
        assert_eq!(node.class(), "admonition adm-danger");
    }

    #[test]
    fn parse_malformed_attributes_fall_back_to_default_class() {
        let node = parse_opening_line("danger Title {#}", 2);
        assert_eq!(node.title, "Title");
        assert_eq!(node.depth, 2);
        assert_eq!(node.attributes.len(), 1);
        assert_eq!(node.class(), "admonition adm-danger");
    }

    #[test]
    fn parse_multiple_classes() {
        let node = parse_opening_line("danger And this is danger {.background-green .font-big}", 1);
        assert_eq!(
            node.class(),
            "admonition adm-danger background-green font-big"
        );
    }
}
