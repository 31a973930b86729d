//! Open block builders and the protocol the driver speaks with them.

use smallvec::SmallVec;

use crate::ast::Block;
use crate::resolve::{DeferredMaps, PendingInline};
use crate::scratch::Scratch;
use crate::{Options, Span};

use super::code::{FencedCodeBuilder, IndentedCodeBuilder};
use super::container::CustomContainerBuilder;
use super::footnote::FootnoteBuilder;
use super::heading::{AtxHeadingBuilder, SetextHeadingBuilder};
use super::html::HtmlBlockBuilder;
use super::line::BlockLine;
use super::list::{ListBuilder, ListItemBuilder};
use super::math::MathBlockBuilder;
use super::paragraph::ParagraphBuilder;
use super::quote::BlockQuoteBuilder;
use super::table::TableBuilder;
use super::thematic_break::ThematicBreakBuilder;

/// Answer of an open block to a new line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// The line continues this block; its markers were consumed.
    Continue,
    /// The line terminates this block and belongs to it.
    Closed,
    /// The line does not continue this block.
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorKind {
    Document,
    Paragraph,
    BlockQuote,
    List,
    ListItem,
    AtxHeading,
    SetextHeading,
    ThematicBreak,
    IndentedCode,
    FencedCode,
    HtmlBlock,
    Table,
    Footnote,
    CustomContainer,
    MathBlock,
}

/// What the driver needs while closing a block.
pub struct CloseContext<'a, 'p> {
    pub input: &'a str,
    pub options: &'p Options,
    /// Offsets of blank lines seen so far, ascending.
    pub blank_lines: &'p [u32],
    pub maps: &'p mut DeferredMaps,
    /// Inline batch; only handed to blocks that
    /// [need inline parsing](BlockBuilder::need_parse_inlines).
    pub pending: Option<&'p mut Vec<PendingInline>>,
    pub scratch: &'p Scratch,
}

impl CloseContext<'_, '_> {
    /// Queue inline content for the resolve pass; returns its slot, or
    /// `None` when the closing block has no inline content.
    pub fn defer(&mut self, lines: SmallVec<[Span; 2]>, is_heading: bool) -> Option<u32> {
        let pending = self.pending.as_mut()?;
        let slot = pending.len() as u32;
        pending.push(PendingInline { lines, is_heading });
        Some(slot)
    }

    /// Whether a blank line starts inside `[start, end)`.
    pub fn has_blank_between(&self, start: u32, end: u32) -> bool {
        let first = self.blank_lines.partition_point(|&offset| offset < start);
        self.blank_lines.get(first).is_some_and(|&offset| offset < end)
    }
}

/// Capabilities of one open block.
pub trait BlockBuilder {
    fn kind(&self) -> ProcessorKind;

    /// Match the start of a line against this block.
    fn try_continue(&mut self, line: &mut BlockLine<'_>) -> Continuation;

    /// Whether new blocks may start inside this one.
    fn try_block_starts(&self) -> bool {
        false
    }

    /// Whether an unmatched line may still be appended as lazy text.
    fn can_lazy_continuation(&self) -> bool {
        false
    }

    fn is_container(&self) -> bool {
        false
    }

    fn can_contain(&self, _child: ProcessorKind) -> bool {
        false
    }

    /// Absorb the rest of a line into a leaf.
    fn add_line(&mut self, _line: &mut BlockLine<'_>) {}

    /// A child block was pushed on top of this one.
    fn child_opened(&mut self) {}

    /// Adopt a closed child.
    fn add_node(&mut self, _node: Block) {}

    /// Close with `end` as the first offset not owned by the block.
    fn close(self, end: u32, ctx: &mut CloseContext<'_, '_>) -> Option<Block>;

    /// Whether closing produces text for the inline pass.
    fn need_parse_inlines(&self) -> bool {
        false
    }

    /// Single-line blocks are complete as soon as they open.
    fn is_complete(&self) -> bool {
        false
    }
}

/// Root of the stack. Never closes through the protocol.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    pub children: Vec<Block>,
}

impl BlockBuilder for DocumentBuilder {
    fn kind(&self) -> ProcessorKind {
        ProcessorKind::Document
    }

    fn try_continue(&mut self, _line: &mut BlockLine<'_>) -> Continuation {
        Continuation::Continue
    }

    fn try_block_starts(&self) -> bool {
        true
    }

    fn is_container(&self) -> bool {
        true
    }

    fn can_contain(&self, child: ProcessorKind) -> bool {
        accepts_flow_child(child)
    }

    fn add_node(&mut self, node: Block) {
        self.children.push(node);
    }

    fn close(self, _end: u32, _ctx: &mut CloseContext<'_, '_>) -> Option<Block> {
        None
    }
}

/// Every open block kind.
#[derive(Debug)]
pub enum Processor {
    Document(DocumentBuilder),
    Paragraph(ParagraphBuilder),
    BlockQuote(BlockQuoteBuilder),
    List(ListBuilder),
    ListItem(ListItemBuilder),
    AtxHeading(AtxHeadingBuilder),
    SetextHeading(SetextHeadingBuilder),
    ThematicBreak(ThematicBreakBuilder),
    IndentedCode(IndentedCodeBuilder),
    FencedCode(FencedCodeBuilder),
    HtmlBlock(HtmlBlockBuilder),
    Table(TableBuilder),
    Footnote(FootnoteBuilder),
    CustomContainer(CustomContainerBuilder),
    MathBlock(MathBlockBuilder),
}

macro_rules! dispatch {
    ($self:expr, $builder:ident => $body:expr) => {
        match $self {
            Processor::Document($builder) => $body,
            Processor::Paragraph($builder) => $body,
            Processor::BlockQuote($builder) => $body,
            Processor::List($builder) => $body,
            Processor::ListItem($builder) => $body,
            Processor::AtxHeading($builder) => $body,
            Processor::SetextHeading($builder) => $body,
            Processor::ThematicBreak($builder) => $body,
            Processor::IndentedCode($builder) => $body,
            Processor::FencedCode($builder) => $body,
            Processor::HtmlBlock($builder) => $body,
            Processor::Table($builder) => $body,
            Processor::Footnote($builder) => $body,
            Processor::CustomContainer($builder) => $body,
            Processor::MathBlock($builder) => $body,
        }
    };
}

impl BlockBuilder for Processor {
    fn kind(&self) -> ProcessorKind {
        dispatch!(self, b => b.kind())
    }

    fn try_continue(&mut self, line: &mut BlockLine<'_>) -> Continuation {
        dispatch!(self, b => b.try_continue(line))
    }

    fn try_block_starts(&self) -> bool {
        dispatch!(self, b => b.try_block_starts())
    }

    fn can_lazy_continuation(&self) -> bool {
        dispatch!(self, b => b.can_lazy_continuation())
    }

    fn is_container(&self) -> bool {
        dispatch!(self, b => b.is_container())
    }

    fn can_contain(&self, child: ProcessorKind) -> bool {
        dispatch!(self, b => b.can_contain(child))
    }

    fn add_line(&mut self, line: &mut BlockLine<'_>) {
        dispatch!(self, b => b.add_line(line))
    }

    fn child_opened(&mut self) {
        dispatch!(self, b => b.child_opened())
    }

    fn add_node(&mut self, node: Block) {
        dispatch!(self, b => b.add_node(node))
    }

    fn close(self, end: u32, ctx: &mut CloseContext<'_, '_>) -> Option<Block> {
        dispatch!(self, b => b.close(end, ctx))
    }

    fn need_parse_inlines(&self) -> bool {
        dispatch!(self, b => b.need_parse_inlines())
    }

    fn is_complete(&self) -> bool {
        dispatch!(self, b => b.is_complete())
    }
}

/// Containers that hold arbitrary blocks accept everything but list items,
/// which only live in lists.
#[inline]
pub(crate) fn accepts_flow_child(child: ProcessorKind) -> bool {
    child != ProcessorKind::ListItem
}

/// Span end of a container: the later of its own lines and its last child.
#[inline]
pub(crate) fn container_end(own_end: u32, children: &[Block]) -> u32 {
    children.last().map_or(own_end, |child| own_end.max(child.span.end))
}
