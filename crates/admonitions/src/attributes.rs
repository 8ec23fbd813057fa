use std::borrow::Cow;

/// Ordered attribute map with unique names.
///
/// Insertion order is rendering order. Re-inserting an existing name keeps its
/// original position and replaces the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Sets `name` to `value`, keeping the position of an existing entry.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => *v = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Appends a class name to the space-separated `class` entry.
    pub fn push_class(&mut self, class: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == "class") {
            Some((_, v)) if !v.is_empty() => {
                v.push(' ');
                v.push_str(class);
            }
            Some((_, v)) => class.clone_into(v),
            None => self.entries.push(("class".to_owned(), class.to_owned())),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Self::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}

/// Parses a curly-brace attribute list such as `{#id .class key="value"}`.
///
/// - `#name` sets `id`; the last one wins.
/// - `.name` and `class=...` accumulate into a single space-separated `class`.
/// - `key=value` accepts bare values or double-quoted values with `\"` and `\\`
///   escapes.
///
/// Text after the closing `}` is ignored. Returns `None` when `input` does not
/// start with `{` (after leading whitespace), when the list is not closed, or
/// when a token is malformed.
#[must_use]
pub fn parse_attributes(input: &str) -> Option<Attributes> {
    let mut rest = input.trim_start().strip_prefix('{')?;
    let mut attrs = Attributes::new();

    loop {
        rest = rest.trim_start();
        let first = rest.chars().next()?;

        match first {
            '}' => return Some(attrs),
            '#' | '.' => {
                let (name, tail) = split_shorthand(&rest[1..]);
                if name.is_empty() {
                    return None;
                }
                if first == '#' {
                    attrs.insert("id", name);
                } else {
                    attrs.push_class(name);
                }
                rest = tail;
            }
            _ => {
                let (key, tail) = split_key(rest);
                if key.is_empty() {
                    return None;
                }
                let (value, tail) = parse_value(tail.strip_prefix('=')?)?;
                if key == "class" {
                    for class in value.split_whitespace() {
                        attrs.push_class(class);
                    }
                } else {
                    attrs.insert(key, value);
                }
                rest = tail;
            }
        }
    }
}

/// Splits off an `#id` / `.class` name, which runs up to whitespace or a
/// structural character.
fn split_shorthand(s: &str) -> (&str, &str) {
    let end = s
        .find(|c: char| c.is_whitespace() || matches!(c, '}' | '{' | '#' | '.' | '"' | '='))
        .unwrap_or(s.len());
    s.split_at(end)
}

/// Splits off an attribute key: alphanumerics plus `-`, `_`, `:` and `.`.
fn split_key(s: &str) -> (&str, &str) {
    let end = s
        .find(|c: char| !(c.is_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')))
        .unwrap_or(s.len());
    s.split_at(end)
}

/// Parses a bare or quoted value, returning it with the unparsed tail.
fn parse_value(s: &str) -> Option<(Cow<'_, str>, &str)> {
    if let Some(after_quote) = s.strip_prefix('"') {
        let (end, has_escapes) = scan_quoted_value(after_quote);
        // Unclosed quote: the list can never be terminated.
        let tail = after_quote.get(end..)?.strip_prefix('"')?;
        let raw = &after_quote[..end];
        let value = if has_escapes {
            Cow::Owned(unescape_quoted(raw))
        } else {
            Cow::Borrowed(raw)
        };
        return Some((value, tail));
    }

    let end = s
        .find(|c: char| c.is_whitespace() || c == '}')
        .unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    Some((Cow::Borrowed(&s[..end]), &s[end..]))
}

/// Scans a quoted value for the closing `"`, respecting `\"` and `\\` escapes.
/// Returns `(end_offset, has_escapes)` where `end_offset` is the byte position
/// of the closing quote (or end of string if unclosed).
fn scan_quoted_value(s: &str) -> (usize, bool) {
    let bytes = s.as_bytes();
    let mut i = 0;
    let mut has_escapes = false;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' if i + 1 < bytes.len() && matches!(bytes[i + 1], b'"' | b'\\') => {
                has_escapes = true;
                i += 2;
            }
            b'"' => return (i, has_escapes),
            _ => i += 1,
        }
    }

    (s.len(), has_escapes)
}

/// Unescapes `\"` → `"` and `\\` → `\` in a quoted attribute value.
fn unescape_quoted(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(c @ ('"' | '\\')) => result.push(c),
                Some(other) => {
                    result.push('\\');
                    result.push(other);
                }
                None => result.push('\\'),
            }
        } else {
            result.push(c);
        }
    }
    result
}
