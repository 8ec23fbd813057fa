use crate::reader::is_blank;

/// An open fenced code block (three or more `` ` `` or `~` characters).
///
/// Marker lines inside a code block are literal text, so the scheduler tracks
/// these to avoid opening admonitions inside code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeFence {
    pub marker: u8,
    pub length: usize,
}

impl CodeFence {
    /// Detects an opening code fence. Handles up to 3 spaces of leading
    /// indentation.
    #[must_use]
    pub fn detect(line: &str) -> Option<Self> {
        let rest = strip_fence_indent(line)?;
        let &marker = rest.as_bytes().first()?;
        if marker != b'`' && marker != b'~' {
            return None;
        }

        let length = rest.bytes().take_while(|&b| b == marker).count();
        if length < 3 {
            return None;
        }

        // CommonMark: backtick fence info strings must not contain backticks.
        if marker == b'`' && rest[length..].contains('`') {
            return None;
        }

        Some(Self { marker, length })
    }

    /// Checks whether `line` closes this fence: the same marker at least as
    /// many times, followed only by whitespace.
    #[must_use]
    pub fn is_closed_by(&self, line: &str) -> bool {
        let Some(rest) = strip_fence_indent(line) else {
            return false;
        };
        let count = rest.bytes().take_while(|&b| b == self.marker).count();
        count >= self.length && is_blank(&rest[count..])
    }
}

/// Strips up to 3 spaces of leading indentation; `None` for deeper lines.
fn strip_fence_indent(line: &str) -> Option<&str> {
    let indent = line.bytes().take_while(|&b| b == b' ').count();
    (indent <= 3).then_some(&line[indent..])
}
