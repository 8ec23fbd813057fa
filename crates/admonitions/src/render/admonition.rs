use super::escape_html;
use crate::admonition::Admonition;

/// Renders an admonition container around pre-rendered title and body HTML.
///
/// Attributes are emitted in the node's order with escaped values, followed
/// by `data-admonition` holding the nesting depth when `depth_attribute` is
/// set. `body_html` must be pre-rendered; the caller handles recursion.
#[must_use]
pub fn render_admonition(
    node: &Admonition,
    title_html: &str,
    body_html: &str,
    depth_attribute: bool,
) -> String {
    let mut html = String::from("<div");
    for (key, value) in node.attributes.iter() {
        html.push_str(&format!(" {}=\"{}\"", escape_html(key), escape_html(value)));
    }
    if depth_attribute {
        html.push_str(&format!(" data-admonition=\"{}\"", node.depth));
    }

    format!(
        "{html}>\n  \
         <div class=\"adm-title\">{title_html}</div>\n  \
         <div class=\"adm-body\">\n\
         {body_html}  \
         </div>\n\
         </div>\n"
    )
}
