use super::NodeId;
use crate::reader::{indent_width, is_blank};

/// Bookkeeping for one open admonition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenBlock {
    pub marker: u8,
    /// Column of the opening fence.
    pub indent: usize,
    /// Marker run length of the opening fence.
    pub fence_length: usize,
    pub node: NodeId,
}

/// What an incoming line means for the stack-top block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The line belongs to the block body (or the block is not the stack-top).
    Continue,
    /// The line is indented less than the opening fence. The block closes and
    /// the line is left for the enclosing context.
    Dedent,
    /// The line is a matching closing fence and is consumed.
    Fence,
}

/// Open admonitions of one parse, innermost last.
///
/// Only the top record can ever be closed by a line; records below it stay
/// open until everything above them has been popped.
#[derive(Debug, Clone, Default)]
pub struct BlockStack {
    records: Vec<OpenBlock>,
}

impl BlockStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: OpenBlock) {
        debug_assert!(
            !self.records.iter().any(|r| r.node == record.node),
            "node {:?} is already on the stack",
            record.node
        );
        self.records.push(record);
    }

    pub fn pop(&mut self) -> Option<OpenBlock> {
        self.records.pop()
    }

    #[must_use]
    pub fn top(&self) -> Option<&OpenBlock> {
        self.records.last()
    }

    /// Number of open records.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Decides what `line` means for the block owning `node`.
    ///
    /// Any block other than the stack-top always continues.
    #[must_use]
    pub fn decide(&self, node: NodeId, line: &str) -> Decision {
        match self.top() {
            Some(top) if top.node == node => top.decide(line),
            _ => Decision::Continue,
        }
    }
}

impl OpenBlock {
    /// Applies the closing rules to `line`, in order:
    ///
    /// 1. indentation below the opening column closes without consuming;
    /// 2. at exactly the opening column, a run of at least `fence_length`
    ///    markers followed only by whitespace closes and consumes;
    /// 3. anything else continues.
    #[must_use]
    pub fn decide(&self, line: &str) -> Decision {
        let (width, pos) = indent_width(line);

        if width < self.indent {
            return Decision::Dedent;
        }

        if width == self.indent {
            let rest = &line[pos..];
            let run = rest.bytes().take_while(|&b| b == self.marker).count();
            if run >= self.fence_length && is_blank(&rest[run..]) {
                return Decision::Fence;
            }
        }

        Decision::Continue
    }
}
