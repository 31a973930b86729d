//! `$$` display math blocks.

use crate::ast::{Block, BlockKind};
use crate::Span;

use super::line::BlockLine;
use super::parser::BlockParser;
use super::processor::{BlockBuilder, CloseContext, Continuation, Processor, ProcessorKind};
use super::token::TokenKind;

#[derive(Debug)]
pub struct MathBlockBuilder {
    length: u32,
    indent: u32,
    literal: String,
    start: u32,
    end: u32,
}

pub(crate) fn start(parser: &mut BlockParser<'_>, line: &mut BlockLine<'_>) -> bool {
    let Some(token) = line.peek() else {
        return false;
    };
    if !matches!(token.kind, TokenKind::MathFenceStart | TokenKind::MathFence) {
        return false;
    }
    let indent = line.skip_all_indent();
    let math = MathBlockBuilder {
        length: token.count,
        indent,
        literal: String::new(),
        start: token.span.start,
        end: line.next,
    };
    line.consume_all();
    parser.open(Processor::MathBlock(math));
    true
}

impl BlockBuilder for MathBlockBuilder {
    fn kind(&self) -> ProcessorKind {
        ProcessorKind::MathBlock
    }

    fn try_continue(&mut self, line: &mut BlockLine<'_>) -> Continuation {
        let closes = line.indent_width() < 4
            && line
                .peek()
                .is_some_and(|t| t.kind == TokenKind::MathFence && t.count >= self.length);
        if closes {
            line.consume_all();
            self.end = line.next;
            return Continuation::Closed;
        }
        line.skip_indent(self.indent);
        Continuation::Continue
    }

    fn add_line(&mut self, line: &mut BlockLine<'_>) {
        self.literal.push_str(&line.remainder());
        self.literal.push('\n');
        self.end = line.next;
        line.consume_all();
    }

    fn close(self, _end: u32, _ctx: &mut CloseContext<'_, '_>) -> Option<Block> {
        let kind = BlockKind::MathBlock { literal: self.literal };
        Some(Block::new(kind, Span::new(self.start, self.end)))
    }
}
