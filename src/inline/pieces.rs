//! Doubly linked list of inline nodes under construction.
//!
//! Emphasis and links wrap runs of already-built siblings, so nodes have to
//! be unlinked from the middle of the sequence cheaply. Slots are never
//! reused within one parse; indices stay valid for delimiters and brackets.
//! Each slot also records how deeply its node nests, so wrapping can stop
//! at [`MAX_INLINE_NESTING`](crate::limits::MAX_INLINE_NESTING).

use crate::ast::{Inline, InlineKind};

const NIL: usize = usize::MAX;

#[derive(Debug)]
struct Slot {
    node: Option<Inline>,
    /// Wrapper levels in the node: 0 for leaves.
    depth: usize,
    prev: usize,
    next: usize,
}

#[derive(Debug)]
pub struct Pieces {
    slots: Vec<Slot>,
    head: usize,
    tail: usize,
}

impl Pieces {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            head: NIL,
            tail: NIL,
        }
    }

    /// Append a leaf node; returns its index.
    pub fn push(&mut self, node: Inline) -> usize {
        self.push_nested(node, 0)
    }

    /// Append a node that wraps `depth` levels.
    pub fn push_nested(&mut self, node: Inline, depth: usize) -> usize {
        let idx = self.slots.len();
        self.slots.push(Slot {
            node: Some(node),
            depth,
            prev: self.tail,
            next: NIL,
        });
        if self.tail == NIL {
            self.head = idx;
        } else {
            self.slots[self.tail].next = idx;
        }
        self.tail = idx;
        idx
    }

    /// Insert a node wrapping `depth` levels right after `after`; returns
    /// its index.
    pub fn insert_after(&mut self, after: usize, node: Inline, depth: usize) -> usize {
        let idx = self.slots.len();
        let next = self.slots[after].next;
        self.slots.push(Slot {
            node: Some(node),
            depth,
            prev: after,
            next,
        });
        self.slots[after].next = idx;
        if next == NIL {
            self.tail = idx;
        } else {
            self.slots[next].prev = idx;
        }
        idx
    }

    /// Unlink a node and return it.
    pub fn remove(&mut self, idx: usize) -> Option<Inline> {
        let node = self.slots[idx].node.take()?;
        let (prev, next) = (self.slots[idx].prev, self.slots[idx].next);
        if prev == NIL {
            self.head = next;
        } else {
            self.slots[prev].next = next;
        }
        if next == NIL {
            self.tail = prev;
        } else {
            self.slots[next].prev = prev;
        }
        Some(node)
    }

    /// Unlink every node strictly after `start` and before `end` (or to the
    /// tail when `end` is `None`), in order and with text merged.
    pub fn take_between(&mut self, start: usize, end: Option<usize>) -> Vec<Inline> {
        let stop = end.unwrap_or(NIL);
        let mut nodes = Vec::new();
        let mut cur = self.slots[start].next;
        while cur != stop && cur != NIL {
            let next = self.slots[cur].next;
            if let Some(node) = self.remove(cur) {
                push_merged(&mut nodes, node);
            }
            cur = next;
        }
        nodes
    }

    /// Deepest node strictly after `start` and before `end` (or to the
    /// tail).
    pub fn depth_between(&self, start: usize, end: Option<usize>) -> usize {
        let stop = end.unwrap_or(NIL);
        let mut depth = 0;
        let mut cur = self.slots[start].next;
        while cur != stop && cur != NIL {
            depth = depth.max(self.slots[cur].depth);
            cur = self.slots[cur].next;
        }
        depth
    }

    pub fn get(&self, idx: usize) -> Option<&Inline> {
        self.slots.get(idx)?.node.as_ref()
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut Inline> {
        self.slots.get_mut(idx)?.node.as_mut()
    }

    /// Drop `count` bytes from the end of a delimiter text piece.
    pub fn shrink_end(&mut self, idx: usize, count: usize) {
        if let Some(node) = self.get_mut(idx) {
            if let InlineKind::Text(text) = &mut node.kind {
                text.truncate(text.len().saturating_sub(count));
            }
            node.span.end -= count as u32;
        }
    }

    /// Drop `count` bytes from the start of a delimiter text piece.
    pub fn shrink_start(&mut self, idx: usize, count: usize) {
        if let Some(node) = self.get_mut(idx) {
            if let InlineKind::Text(text) = &mut node.kind {
                text.drain(..count.min(text.len()));
            }
            node.span.start += count as u32;
        }
    }

    /// The nodes in order, with adjacent text merged.
    pub fn into_vec(mut self) -> Vec<Inline> {
        let mut out: Vec<Inline> = Vec::new();
        let mut cur = self.head;
        while cur != NIL {
            let next = self.slots[cur].next;
            if let Some(node) = self.slots[cur].node.take() {
                push_merged(&mut out, node);
            }
            cur = next;
        }
        out
    }
}

/// Push a node, merging it into a preceding text node. Empty text is
/// dropped.
pub fn push_merged(out: &mut Vec<Inline>, node: Inline) {
    if let InlineKind::Text(text) = &node.kind {
        if text.is_empty() {
            return;
        }
        if let Some(Inline {
            kind: InlineKind::Text(prev),
            span,
            ..
        }) = out.last_mut()
        {
            prev.push_str(text);
            *span = span.cover(node.span);
            return;
        }
    }
    out.push(node);
}
