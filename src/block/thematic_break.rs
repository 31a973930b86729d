//! Thematic breaks (`***`, `---`, `___`).

use crate::ast::{Block, BlockKind};
use crate::Span;

use super::line::BlockLine;
use super::parser::BlockParser;
use super::processor::{BlockBuilder, CloseContext, Continuation, Processor, ProcessorKind};
use super::token::TokenKind;

#[derive(Debug)]
pub struct ThematicBreakBuilder {
    span: Span,
}

pub(crate) fn start(parser: &mut BlockParser<'_>, line: &mut BlockLine<'_>) -> bool {
    let Some(token) = line.peek() else {
        return false;
    };
    let is_break = match token.kind {
        TokenKind::ThematicBreak => true,
        TokenKind::DashLine => token.count >= 3,
        _ => false,
    };
    if !is_break {
        return false;
    }
    let span = Span::new(token.span.start, line.next);
    line.consume_all();
    parser.open(Processor::ThematicBreak(ThematicBreakBuilder { span }));
    true
}

impl BlockBuilder for ThematicBreakBuilder {
    fn kind(&self) -> ProcessorKind {
        ProcessorKind::ThematicBreak
    }

    fn try_continue(&mut self, _line: &mut BlockLine<'_>) -> Continuation {
        Continuation::None
    }

    fn close(self, _end: u32, _ctx: &mut CloseContext<'_, '_>) -> Option<Block> {
        Some(Block::new(BlockKind::ThematicBreak, self.span))
    }

    fn is_complete(&self) -> bool {
        true
    }
}
