use pulldown_cmark::Options;

use crate::admonition::parser::parse_document;
use crate::admonition::recognizer::AdmonitionRecognizer;
use crate::admonition::{Block, Document, NodeId};
use crate::config::Config;
use crate::render::admonition::render_admonition;
use crate::render::markdown::{render_inline, render_markdown, render_markdown_with};

/// Parses `source` and renders it to HTML.
///
/// Markdown runs between admonitions are rendered in place, and every
/// admonition body is rendered recursively the same way.
#[must_use]
pub fn render_document(source: &str, config: &Config) -> String {
    let recognizer = AdmonitionRecognizer::new(config.admonition.marker_byte());
    let document = parse_document(source, &recognizer);

    HtmlRenderer {
        document: &document,
        options: config.markdown.options(),
        depth_attribute: config.admonition.depth_attribute,
    }
    .render_blocks(&document.blocks)
}

/// Shared state for rendering one parsed document.
struct HtmlRenderer<'a> {
    document: &'a Document,
    options: Options,
    depth_attribute: bool,
}

impl HtmlRenderer<'_> {
    fn render_blocks(&self, blocks: &[Block]) -> String {
        let mut html = String::new();
        for block in blocks {
            match block {
                Block::Markdown(text) => html.push_str(&render_markdown(text, self.options)),
                Block::Admonition(id) => html.push_str(&self.render_node(*id)),
                Block::Embedded { text, admonitions } => {
                    let nested: Vec<String> =
                        admonitions.iter().map(|id| self.render_node(*id)).collect();
                    html.push_str(&render_markdown_with(text, self.options, &nested));
                }
            }
        }
        html
    }

    fn render_node(&self, id: NodeId) -> String {
        let node = &self.document[id];
        let title = render_inline(&node.title, self.options);
        let body = self.render_blocks(&node.body);
        render_admonition(node, &title, &body, self.depth_attribute)
    }
}
