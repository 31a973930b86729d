//! Custom containers: `:::name` ... `:::`.
//!
//! The closing fence must be at least as long as the opening one, so a
//! container nests shorter fences when its own fence is longer.

use crate::ast::{Block, BlockKind};
use crate::text::trim_spaces;
use crate::Span;

use super::line::BlockLine;
use super::parser::BlockParser;
use super::processor::{accepts_flow_child, container_end, BlockBuilder, CloseContext, Continuation, Processor, ProcessorKind};
use super::token::TokenKind;

#[derive(Debug)]
pub struct CustomContainerBuilder {
    length: u32,
    info: Option<String>,
    start: u32,
    end: u32,
    children: Vec<Block>,
}

pub(crate) fn start(parser: &mut BlockParser<'_>, line: &mut BlockLine<'_>) -> bool {
    let Some(token) = line.peek() else {
        return false;
    };
    if !matches!(
        token.kind,
        TokenKind::CustomContainerFenceStart | TokenKind::CustomContainerFence
    ) {
        return false;
    }
    let text = token.text(line.input());
    let info = trim_spaces(&text[token.count as usize..]);
    let container = CustomContainerBuilder {
        length: token.count,
        info: (!info.is_empty()).then(|| info.to_owned()),
        start: token.span.start,
        end: line.next,
        children: Vec::new(),
    };
    line.consume_all();
    parser.open(Processor::CustomContainer(container));
    true
}

impl BlockBuilder for CustomContainerBuilder {
    fn kind(&self) -> ProcessorKind {
        ProcessorKind::CustomContainer
    }

    fn try_continue(&mut self, line: &mut BlockLine<'_>) -> Continuation {
        let closes = line.indent_width() < 4
            && line
                .peek()
                .is_some_and(|t| t.kind == TokenKind::CustomContainerFence && t.count >= self.length);
        if closes {
            line.consume_all();
            self.end = line.next;
            return Continuation::Closed;
        }
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
        let end = container_end(self.end, &self.children);
        let kind = BlockKind::CustomContainer { info: self.info };
        Some(Block::new(kind, Span::new(self.start, end)).with_children(self.children))
    }
}
