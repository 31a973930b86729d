//! Block quotes.

use crate::ast::{Block, BlockKind};
use crate::Span;

use super::line::BlockLine;
use super::parser::BlockParser;
use super::processor::{accepts_flow_child, container_end, BlockBuilder, CloseContext, Continuation, Processor, ProcessorKind};
use super::token::TokenKind;

#[derive(Debug)]
pub struct BlockQuoteBuilder {
    start: u32,
    end: u32,
    children: Vec<Block>,
}

/// Consume `>` and the one optional column of whitespace after it.
fn consume_marker(line: &mut BlockLine<'_>) -> Option<u32> {
    if line.indent_width() >= 4 || line.peek_kind() != Some(TokenKind::QuoteStart) {
        return None;
    }
    let marker = line.advance_past_indent()?;
    line.skip_indent(1);
    Some(marker.span.start)
}

pub(crate) fn start(parser: &mut BlockParser<'_>, line: &mut BlockLine<'_>) -> bool {
    let Some(start) = consume_marker(line) else {
        return false;
    };
    parser.open(Processor::BlockQuote(BlockQuoteBuilder {
        start,
        end: line.next,
        children: Vec::new(),
    }));
    true
}

impl BlockBuilder for BlockQuoteBuilder {
    fn kind(&self) -> ProcessorKind {
        ProcessorKind::BlockQuote
    }

    fn try_continue(&mut self, line: &mut BlockLine<'_>) -> Continuation {
        match consume_marker(line) {
            Some(_) => {
                self.end = line.next;
                Continuation::Continue
            }
            None => Continuation::None,
        }
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
        let end = container_end(self.end, &self.children);
        Some(Block::new(BlockKind::BlockQuote, Span::new(self.start, end)).with_children(self.children))
    }
}
