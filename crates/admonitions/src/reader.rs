use std::borrow::Cow;

/// Columns a tab advances to (the next multiple of this width).
const TAB_WIDTH: usize = 4;

/// Characters that count as indentation and as blank. Other Unicode
/// whitespace is content.
pub const BLANK: [char; 2] = [' ', '\t'];

/// Trims spaces and tabs from both ends.
#[must_use]
pub fn trim_blank(s: &str) -> &str {
    s.trim_matches(BLANK)
}

/// Whether `s` holds nothing but spaces and tabs.
#[must_use]
pub fn is_blank(s: &str) -> bool {
    trim_blank(s).is_empty()
}

/// Byte span of one source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Offset of the first byte of the line (or of the unconsumed remainder).
    pub start: usize,
    /// Offset one past the last content byte, excluding the line terminator.
    pub stop: usize,
    /// Width of the line terminator: 0 at end of input, 1 for `\n`, 2 for `\r\n`.
    pub newline: usize,
}

impl Segment {
    /// Bytes needed to consume the line including its terminator.
    #[must_use]
    pub fn consumed_len(&self) -> usize {
        self.stop - self.start + self.newline
    }
}

/// Forward-only line reader over a single document.
///
/// The reader never backtracks: once a line is advanced past, it is committed.
#[derive(Debug, Clone)]
pub struct LineReader<'a> {
    source: &'a str,
    offset: usize,
    line_number: usize,
}

impl<'a> LineReader<'a> {
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            offset: 0,
            line_number: 1,
        }
    }

    /// Returns the rest of the current line (terminator stripped) and its span,
    /// or `None` at end of input.
    #[must_use]
    pub fn peek_line(&self) -> Option<(&'a str, Segment)> {
        if self.is_eof() {
            return None;
        }

        let rest = &self.source[self.offset..];
        let (content_len, newline) = match rest.find('\n') {
            Some(pos) if pos > 0 && rest.as_bytes()[pos - 1] == b'\r' => (pos - 1, 2),
            Some(pos) => (pos, 1),
            None => (rest.len(), 0),
        };

        let segment = Segment {
            start: self.offset,
            stop: self.offset + content_len,
            newline,
        };
        Some((&rest[..content_len], segment))
    }

    /// Moves forward by `n` bytes, clamped to the end of input and to the
    /// nearest character boundary at or after the target.
    pub fn advance(&mut self, n: usize) {
        let mut target = (self.offset + n).min(self.source.len());
        while !self.source.is_char_boundary(target) {
            target += 1;
        }

        self.line_number += self.source[self.offset..target].matches('\n').count();
        self.offset = target;
    }

    /// Consumes the remainder of the current line, terminator included.
    pub fn advance_line(&mut self) {
        if let Some((_, segment)) = self.peek_line() {
            self.advance(segment.consumed_len());
        }
    }

    /// 1-based number of the line the reader is positioned on.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.offset >= self.source.len()
    }
}

/// Measures leading indentation.
///
/// Returns `(columns, byte_offset)`: the visual width of the leading spaces and
/// tabs, and the byte offset of the first non-indentation character (the line
/// length for whitespace-only lines).
#[must_use]
pub fn indent_width(line: &str) -> (usize, usize) {
    let mut width = 0;
    for (i, b) in line.bytes().enumerate() {
        match b {
            b' ' => width += 1,
            b'\t' => width += TAB_WIDTH - width % TAB_WIDTH,
            _ => return (width, i),
        }
    }
    (width, line.len())
}

/// Strips up to `columns` columns of leading indentation.
///
/// A tab that straddles the boundary is replaced by the spaces left over after
/// the cut, so relative indentation is preserved.
#[must_use]
pub fn strip_indent(line: &str, columns: usize) -> Cow<'_, str> {
    let mut width = 0;
    for (i, b) in line.bytes().enumerate() {
        if width >= columns {
            return Cow::Borrowed(&line[i..]);
        }
        match b {
            b' ' => width += 1,
            b'\t' => {
                let next = width + TAB_WIDTH - width % TAB_WIDTH;
                if next > columns {
                    let mut owned = " ".repeat(next - columns);
                    owned.push_str(&line[i + 1..]);
                    return Cow::Owned(owned);
                }
                width = next;
            }
            _ => return Cow::Borrowed(&line[i..]),
        }
    }
    Cow::Borrowed("")
}
