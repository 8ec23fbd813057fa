use tracing::debug;

use super::fence::{parse_opening_line, scan_opening_fence};
use super::stack::{BlockStack, Decision, OpenBlock};
use super::{Admonition, Closing, NodeId};
use crate::reader::{LineReader, indent_width};

/// Default trigger marker.
pub const DEFAULT_MARKER: u8 = b'!';

/// Result of asking an open block about the current line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockState {
    /// The block stays open; the line is handed to its body.
    Continue,
    /// The block is done. If the recognizer advanced the reader past the line,
    /// the line was consumed; otherwise the enclosing context must reprocess it.
    Close(Closing),
}

/// State owned by a single parse invocation.
///
/// Nothing here is shared between documents, so independent parses never
/// interfere.
#[derive(Debug, Default)]
pub struct ParseContext {
    stack: BlockStack,
    nodes: Vec<Admonition>,
    /// 1-based line the scheduler is working on.
    line: usize,
}

impl ParseContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn stack(&self) -> &BlockStack {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut BlockStack {
        &mut self.stack
    }

    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn set_line(&mut self, line: usize) {
        self.line = line;
    }

    /// Stores a node and returns its handle.
    pub fn insert_node(&mut self, node: Admonition) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &Admonition {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Admonition {
        &mut self.nodes[id.0]
    }

    pub(crate) fn into_nodes(self) -> Vec<Admonition> {
        self.nodes
    }
}

/// A block-level construct the host scheduler can drive line by line.
pub trait BlockRecognizer {
    /// First non-indentation bytes that may start this block.
    fn trigger(&self) -> &[u8];

    /// Whether an opening line may interrupt a paragraph without a blank line.
    fn can_interrupt_paragraph(&self) -> bool;

    /// Whether an opening line may be indented four or more columns past the
    /// surrounding content.
    fn can_accept_indented_line(&self) -> bool;

    /// Tries to open a block on the current line. On success the opening line
    /// is consumed; on failure the reader is untouched.
    fn open(&self, reader: &mut LineReader<'_>, ctx: &mut ParseContext) -> Option<NodeId>;

    /// Decides whether the current line continues or closes `node`.
    fn continue_block(
        &self,
        node: NodeId,
        reader: &mut LineReader<'_>,
        ctx: &mut ParseContext,
    ) -> BlockState;

    /// Finalizes `node` once the host has stopped feeding it lines.
    fn close(&self, node: NodeId, closing: Closing, ctx: &mut ParseContext);
}

/// Recognizer for `!!!`-fenced admonitions.
#[derive(Debug, Clone)]
pub struct AdmonitionRecognizer {
    trigger: [u8; 1],
}

impl AdmonitionRecognizer {
    /// Creates a recognizer for fences made of `marker`.
    #[must_use]
    pub fn new(marker: u8) -> Self {
        Self { trigger: [marker] }
    }

    #[must_use]
    pub fn marker(&self) -> u8 {
        self.trigger[0]
    }
}

impl Default for AdmonitionRecognizer {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER)
    }
}

impl BlockRecognizer for AdmonitionRecognizer {
    fn trigger(&self) -> &[u8] {
        &self.trigger
    }

    fn can_interrupt_paragraph(&self) -> bool {
        true
    }

    fn can_accept_indented_line(&self) -> bool {
        false
    }

    fn open(&self, reader: &mut LineReader<'_>, ctx: &mut ParseContext) -> Option<NodeId> {
        let (line, _) = reader.peek_line()?;
        let (indent, pos) = indent_width(line);
        let fence = scan_opening_fence(line, pos, self.marker())?;

        let depth = ctx.stack().depth();
        let node = parse_opening_line(&line[fence.remainder.clone()], depth);
        debug!(
            class = %node.class_token,
            depth,
            line = reader.line_number(),
            "opened admonition"
        );

        let id = ctx.insert_node(node);
        ctx.stack_mut().push(OpenBlock {
            marker: fence.marker,
            indent,
            fence_length: fence.length,
            node: id,
        });

        reader.advance_line();
        Some(id)
    }

    fn continue_block(
        &self,
        node: NodeId,
        reader: &mut LineReader<'_>,
        ctx: &mut ParseContext,
    ) -> BlockState {
        let Some((line, _)) = reader.peek_line() else {
            return BlockState::Continue;
        };

        match ctx.stack().decide(node, line) {
            Decision::Continue => BlockState::Continue,
            Decision::Dedent => BlockState::Close(Closing::Dedent),
            Decision::Fence => {
                reader.advance_line();
                BlockState::Close(Closing::Fence)
            }
        }
    }

    fn close(&self, node: NodeId, closing: Closing, ctx: &mut ParseContext) {
        if ctx.stack().top().is_some_and(|top| top.node == node) {
            ctx.stack_mut().pop();
        }

        let line = ctx.line();
        let admonition = ctx.node_mut(node);
        admonition.closing = Some(closing);
        debug!(
            class = %admonition.class_token,
            depth = admonition.depth,
            line,
            %closing,
            "closed admonition"
        );
    }
}
