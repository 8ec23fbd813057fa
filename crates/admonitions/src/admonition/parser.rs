use std::mem;

use super::recognizer::{AdmonitionRecognizer, BlockRecognizer, BlockState, ParseContext};
use super::{Block, Closing, Document, NodeId, placeholder};
use crate::code_fence::CodeFence;
use crate::list_item;
use crate::reader::{LineReader, indent_width, is_blank, strip_indent};

/// Relative indentation at which a line counts as indented code.
const CODE_INDENT: usize = 4;

/// Body under construction for the document root or one open admonition.
#[derive(Debug, Default)]
struct Frame {
    /// `None` for the document root.
    node: Option<NodeId>,
    /// Content column, fixed by the first non-blank line. Body lines are
    /// stripped of up to this many columns.
    column: Option<usize>,
    code_fence: Option<CodeFence>,
    in_paragraph: bool,
    /// Content columns of the open list items, outermost first, relative to
    /// `column`.
    list_items: Vec<usize>,
    /// Pending Markdown lines not yet flushed into `blocks`.
    text: String,
    /// Admonitions opened inside list items of `text`.
    embedded: Vec<NodeId>,
    blocks: Vec<Block>,
}

impl Frame {
    fn root() -> Self {
        Self {
            column: Some(0),
            ..Self::default()
        }
    }

    fn for_node(node: NodeId) -> Self {
        Self {
            node: Some(node),
            ..Self::default()
        }
    }

    fn relative_indent(&self, indent: usize) -> usize {
        indent.saturating_sub(self.column.unwrap_or(indent))
    }

    /// Content column of the innermost open list item that a line at relative
    /// `indent` belongs to.
    fn enclosing_list_item(&self, indent: usize) -> Option<usize> {
        self.list_items.iter().rev().copied().find(|&column| column <= indent)
    }

    /// Updates the open list items for a non-blank line outside code.
    ///
    /// A line without a marker continuing a paragraph is a lazy continuation
    /// and leaves the items alone. Otherwise items deeper than the line end,
    /// and a marker opens a new item.
    fn track_list_items(&mut self, line: &str) {
        let (indent, pos) = indent_width(line);
        let offset = list_item::content_offset(&line[pos..]);
        if offset.is_none() && self.in_paragraph {
            return;
        }

        self.list_items.retain(|&column| column <= indent);
        if let Some(offset) = offset {
            self.list_items.push(indent + offset);
        }
    }

    /// Records an admonition opened at relative `indent` inside the list item
    /// at `item`, leaving a placeholder line in the item's text.
    fn embed(&mut self, node: NodeId, indent: usize, item: usize) {
        self.list_items.retain(|&column| column <= item);
        self.text.push_str(&" ".repeat(indent));
        self.text.push_str(&placeholder(self.embedded.len()));
        self.text.push('\n');
        self.embedded.push(node);
        self.in_paragraph = false;
    }

    /// Appends an ordinary body line, tracking code fences and paragraphs.
    fn push_line(&mut self, line: &str) {
        let (indent, pos) = indent_width(line);
        let blank = pos == line.len();
        let column = if blank {
            usize::MAX
        } else {
            self.column.unwrap_or(indent)
        };
        let stripped = strip_indent(line, column);

        if self.code_fence.is_none() && !blank {
            self.track_list_items(&stripped);
        }
        // Code fences are measured from the content column of their list item.
        let item = self
            .enclosing_list_item(indent_width(&stripped).0)
            .unwrap_or(0);
        let code = strip_indent(&stripped, item);

        match self.code_fence {
            Some(fence) => {
                if fence.is_closed_by(&code) {
                    self.code_fence = None;
                }
                self.in_paragraph = false;
            }
            None => {
                self.code_fence = CodeFence::detect(&code);
                self.in_paragraph = !blank && self.code_fence.is_none();
            }
        }

        self.text.push_str(&stripped);
        self.text.push('\n');
    }

    /// Moves pending text into `blocks`, dropping runs that are only blank lines.
    fn flush_text(&mut self) {
        let text = mem::take(&mut self.text);
        if !self.embedded.is_empty() {
            self.blocks.push(Block::Embedded {
                text,
                admonitions: mem::take(&mut self.embedded),
            });
        } else if !text.lines().all(is_blank) {
            self.blocks.push(Block::Markdown(text));
        }
    }
}

/// Drives a [`BlockRecognizer`] over a document.
struct BlockParser<'r, R> {
    recognizer: &'r R,
    ctx: ParseContext,
    root: Frame,
    /// Frames of open blocks, innermost last.
    open: Vec<Frame>,
}

impl<'r, R: BlockRecognizer> BlockParser<'r, R> {
    fn new(recognizer: &'r R) -> Self {
        Self {
            recognizer,
            ctx: ParseContext::new(),
            root: Frame::root(),
            open: Vec::new(),
        }
    }

    /// Runs the continuation pass for the current line.
    ///
    /// Returns `true` when a closing fence consumed the line. A block closed by
    /// dedent leaves the line in place and the pass is repeated, so the parent
    /// sees the same line next.
    fn continue_open_blocks(&mut self, reader: &mut LineReader<'_>) -> bool {
        loop {
            let start = reader.offset();
            let Some((index, closing)) = self.find_closing(reader) else {
                return false;
            };

            while self.open.len() > index {
                self.close_innermost(closing);
            }

            if reader.offset() != start {
                return true;
            }
        }
    }

    /// Asks every open block, outermost first, about the current line.
    fn find_closing(&mut self, reader: &mut LineReader<'_>) -> Option<(usize, Closing)> {
        for (index, frame) in self.open.iter().enumerate() {
            let Some(node) = frame.node else { continue };
            if let BlockState::Close(closing) =
                self.recognizer
                    .continue_block(node, reader, &mut self.ctx)
            {
                return Some((index, closing));
            }
        }
        None
    }

    /// Hands the current line to the innermost open block: either it opens a
    /// nested block or it becomes body text.
    fn process_line(&mut self, reader: &mut LineReader<'_>) {
        let Some((line, _)) = reader.peek_line() else {
            return;
        };
        let (indent, pos) = indent_width(line);
        let frame = self.open.last_mut().unwrap_or(&mut self.root);

        if pos < line.len() {
            frame.column.get_or_insert(indent);
        }
        let local = frame.relative_indent(indent);
        let item = frame.enclosing_list_item(local);

        if may_open(self.recognizer, frame, line, local - item.unwrap_or(0), pos)
            && let Some(node) = self.recognizer.open(reader, &mut self.ctx)
        {
            match item {
                Some(item) => frame.embed(node, local, item),
                None => {
                    frame.list_items.clear();
                    frame.flush_text();
                    frame.in_paragraph = false;
                    frame.blocks.push(Block::Admonition(node));
                }
            }
            self.open.push(Frame::for_node(node));
            return;
        }

        frame.push_line(line);
        reader.advance_line();
    }

    fn close_innermost(&mut self, closing: Closing) {
        let Some(mut frame) = self.open.pop() else {
            return;
        };
        frame.flush_text();

        if let Some(node) = frame.node {
            self.recognizer.close(node, closing, &mut self.ctx);
            self.ctx.node_mut(node).body = frame.blocks;
        }
    }

    fn finish(mut self) -> Document {
        while !self.open.is_empty() {
            self.close_innermost(Closing::EndOfInput);
        }
        self.root.flush_text();
        Document::new(self.ctx.into_nodes(), self.root.blocks)
    }
}

/// Whether the line may start a block at this level. `indent` is measured
/// from the content column of the enclosing container or list item.
fn may_open<R: BlockRecognizer>(
    recognizer: &R,
    frame: &Frame,
    line: &str,
    indent: usize,
    pos: usize,
) -> bool {
    let Some(first) = line.as_bytes().get(pos) else {
        return false;
    };
    if frame.code_fence.is_some() || !recognizer.trigger().contains(first) {
        return false;
    }
    if !recognizer.can_accept_indented_line() && indent >= CODE_INDENT {
        return false;
    }
    !frame.in_paragraph || recognizer.can_interrupt_paragraph()
}

/// Parses `source` into a document tree using `recognizer`.
///
/// Single pass, forward only. Every piece of parse state lives in this call,
/// so concurrent parses of different documents are independent.
#[must_use]
pub fn parse_document<R: BlockRecognizer>(source: &str, recognizer: &R) -> Document {
    let mut parser = BlockParser::new(recognizer);
    let mut reader = LineReader::new(source);

    while !reader.is_eof() {
        parser.ctx.set_line(reader.line_number());
        if !parser.continue_open_blocks(&mut reader) {
            parser.process_line(&mut reader);
        }
    }

    parser.finish()
}

/// Parses `source` with the default `!` marker.
#[must_use]
pub fn parse(source: &str) -> Document {
    parse_document(source, &AdmonitionRecognizer::default())
}
