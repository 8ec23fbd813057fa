pub mod fence;
pub mod parser;
pub mod recognizer;
pub mod stack;

use std::ops::Index;
use std::slice;

use strum::{AsRefStr, Display, EnumIter};

use crate::attributes::Attributes;

/// Literal prefix of every admonition's `class` attribute, followed by the
/// class token from the opening line.
pub const CLASS_PREFIX: &str = "admonition adm-";

/// Handle to an [`Admonition`] in a [`Document`]'s node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// How an admonition was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Closing {
    /// A closing fence with a long enough marker run at the opening column.
    Fence,
    /// A line indented less than the opening fence.
    Dedent,
    /// The document ended while the block was still open.
    EndOfInput,
}

/// A block in a document or admonition body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// A contiguous run of ordinary Markdown lines, indentation normalized.
    Markdown(String),
    Admonition(NodeId),
    /// A Markdown run with admonitions opened inside its list items. Each one
    /// is marked in `text` by its [`placeholder`], numbered by position in
    /// `admonitions`.
    Embedded {
        text: String,
        admonitions: Vec<NodeId>,
    },
}

/// Marker line standing in for the `index`-th admonition of a
/// [`Block::Embedded`] run. An HTML comment, so it can interrupt a list item's
/// paragraph.
#[must_use]
pub fn placeholder(index: usize) -> String {
    format!("<!-- admonition:{index} -->")
}

/// Reads back the index from a [`placeholder`], ignoring surrounding
/// whitespace.
#[must_use]
pub fn placeholder_index(html: &str) -> Option<usize> {
    html.trim()
        .strip_prefix("<!-- admonition:")?
        .strip_suffix(" -->")?
        .parse()
        .ok()
}

/// A fenced admonition container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admonition {
    /// First word after the fence; may be empty.
    pub class_token: String,
    /// Raw inline Markdown of the title; may be empty.
    pub title: String,
    /// Attributes in rendering order. `class` always starts with
    /// [`CLASS_PREFIX`] followed by `class_token`.
    pub attributes: Attributes,
    /// Number of admonitions that were open when this one opened.
    pub depth: usize,
    pub body: Vec<Block>,
    /// `None` while the block is still open.
    pub closing: Option<Closing>,
}

impl Admonition {
    /// Creates an open admonition, merging the synthesized class into
    /// `attributes`.
    ///
    /// An explicit class from the attribute list is kept after the prefix:
    /// `{.extra}` on a `danger` block yields `admonition adm-danger extra`.
    #[must_use]
    pub fn new(
        class_token: impl Into<String>,
        title: impl Into<String>,
        mut attributes: Attributes,
        depth: usize,
    ) -> Self {
        let class_token = class_token.into();
        let prefix = format!("{CLASS_PREFIX}{class_token}");
        let class = match attributes.get("class") {
            Some(explicit) => format!("{prefix} {explicit}"),
            None => prefix,
        };
        attributes.insert("class", class);

        Self {
            class_token,
            title: title.into(),
            attributes,
            depth,
            body: Vec::new(),
            closing: None,
        }
    }

    /// The merged `class` attribute.
    #[must_use]
    pub fn class(&self) -> &str {
        self.attributes.get("class").unwrap_or_default()
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attributes.get("id")
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.closing.is_none()
    }
}

/// A parsed document: an arena of admonitions plus the top-level block list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<Admonition>,
    pub blocks: Vec<Block>,
}

impl Document {
    pub(crate) fn new(nodes: Vec<Admonition>, blocks: Vec<Block>) -> Self {
        Self { nodes, blocks }
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Admonition> {
        self.nodes.get(id.0)
    }

    /// All admonitions in opening order.
    pub fn admonitions(&self) -> impl Iterator<Item = &Admonition> {
        self.nodes.iter()
    }

    /// Top-level admonitions in document order, including those inside
    /// top-level list items.
    pub fn top_level(&self) -> impl Iterator<Item = &Admonition> {
        self.blocks
            .iter()
            .flat_map(|block| match block {
                Block::Admonition(id) => slice::from_ref(id),
                Block::Embedded { admonitions, .. } => admonitions.as_slice(),
                Block::Markdown(_) => <&[NodeId]>::default(),
            })
            .map(|id| &self[*id])
    }
}

impl Index<NodeId> for Document {
    type Output = Admonition;

    fn index(&self, id: NodeId) -> &Admonition {
        &self.nodes[id.0]
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs.iter().copied().collect()
    }

    // -- Admonition::new class merge --

    #[test]
    fn class_without_explicit_class() {
        let node = Admonition::new("danger", "Title", Attributes::new(), 0);
        assert_eq!(node.class(), "admonition adm-danger");
    }

    #[test]
    fn class_with_explicit_class_appended() {
        let node = Admonition::new("danger", "Title", attrs(&[("class", "extra")]), 0);
        assert_eq!(node.class(), "admonition adm-danger extra");
    }

    #[test]
    fn id_kept_and_class_added_last() {
        let node = Admonition::new("danger", "Title", attrs(&[("id", "id")]), 0);
        assert_eq!(node.id(), Some("id"));
        let order: Vec<_> = node.attributes.iter().map(|(k, _)| k).collect();
        assert_eq!(order, vec!["id", "class"]);
    }

    #[test]
    fn explicit_class_keeps_its_position() {
        let node = Admonition::new(
            "note",
            "",
            attrs(&[("class", "a b"), ("data-x", "1")]),
            0,
        );
        let collected: Vec<_> = node.attributes.iter().collect();
        assert_eq!(
            collected,
            vec![("class", "admonition adm-note a b"), ("data-x", "1")]
        );
    }

    #[test]
    fn empty_class_token() {
        let node = Admonition::new("", "", Attributes::new(), 0);
        assert_eq!(node.class(), "admonition adm-");
        assert!(node.is_open());
    }

    // -- placeholders --

    #[test]
    fn placeholder_index_reads_back() {
        assert_eq!(placeholder(0), "<!-- admonition:0 -->");
        assert_eq!(placeholder_index(&placeholder(12)), Some(12));
        assert_eq!(placeholder_index("  <!-- admonition:3 -->\n"), Some(3));
    }

    #[test]
    fn placeholder_index_rejects_other_html() {
        assert_eq!(placeholder_index("<!-- note -->"), None);
        assert_eq!(placeholder_index("<!-- admonition:x -->"), None);
        assert_eq!(placeholder_index("<div>"), None);
    }

    // -- Closing --

    #[test]
    fn closing_names_are_kebab_case() {
        let names: Vec<String> = Closing::iter().map(|c| c.to_string()).collect();
        assert_eq!(names, vec!["fence", "dedent", "end-of-input"]);
    }
}
