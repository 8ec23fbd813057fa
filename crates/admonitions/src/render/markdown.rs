use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

use crate::admonition::placeholder_index;

/// Renders a run of Markdown lines to HTML.
///
/// Each run is an isolated document: reference definitions and footnotes do
/// not resolve across admonition boundaries.
#[must_use]
pub fn render_markdown(content: &str, options: Options) -> String {
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, Parser::new_ext(content, options));
    html
}

/// Renders a run of Markdown whose list items hold admonitions.
///
/// Each placeholder comment in `content` is replaced by the matching entry of
/// `nested`, already rendered. Unknown placeholders pass through unchanged.
#[must_use]
pub fn render_markdown_with(content: &str, options: Options, nested: &[String]) -> String {
    let events = Parser::new_ext(content, options).map(|event| {
        if let Event::Html(html) = &event
            && let Some(rendered) = placeholder_index(html).and_then(|i| nested.get(i))
        {
            return Event::Html(rendered.clone().into());
        }
        event
    });

    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, events);
    html
}

/// Renders a single line of inline Markdown without a wrapping block element.
///
/// Used for admonition titles: `Use **bold**` becomes `Use <strong>bold</strong>`
/// rather than a paragraph.
#[must_use]
pub fn render_inline(content: &str, options: Options) -> String {
    let events = Parser::new_ext(content, options).filter(|event| !is_block_boundary(event));

    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, events);
    html.truncate(html.trim_end().len());
    html
}

/// Start and end events of the block elements a one-line title can produce.
fn is_block_boundary(event: &Event<'_>) -> bool {
    matches!(
        event,
        Event::Start(Tag::Paragraph | Tag::Heading { .. } | Tag::List(_) | Tag::Item | Tag::BlockQuote(_))
            | Event::End(
                TagEnd::Paragraph
                    | TagEnd::Heading(_)
                    | TagEnd::List(_)
                    | TagEnd::Item
                    | TagEnd::BlockQuote(_)
            )
    )
}
