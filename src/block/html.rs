//! Raw HTML blocks, kinds 1 to 7.

use crate::ast::{Block, BlockKind};
use crate::inline::html::block_end_condition;
use crate::Span;

use super::line::BlockLine;
use super::parser::BlockParser;
use super::processor::{BlockBuilder, CloseContext, Continuation, Processor, ProcessorKind};
use super::token::TokenKind;

#[derive(Debug)]
pub struct HtmlBlockBuilder {
    condition: u8,
    literal: String,
    start: u32,
    end: u32,
    /// The end condition was met on the opening line.
    complete: bool,
}

impl HtmlBlockBuilder {
    fn push_line(&mut self, line: &mut BlockLine<'_>) {
        self.literal.push_str(&line.remainder());
        self.literal.push('\n');
        self.end = line.next;
        line.consume_all();
    }
}

pub(crate) fn start(parser: &mut BlockParser<'_>, line: &mut BlockLine<'_>) -> bool {
    let Some(token) = line.peek() else {
        return false;
    };
    if token.kind != TokenKind::HtmlStart {
        return false;
    }
    let condition = token.count as u8;
    // kind 7 cannot interrupt a paragraph
    if condition == 7 && !line.paragraph_skippable {
        return false;
    }
    let complete = block_end_condition(condition, token.text(line.input()).as_bytes());
    let mut html = HtmlBlockBuilder {
        condition,
        literal: String::new(),
        start: line.offset(),
        end: line.next,
        complete,
    };
    // leading indentation is part of the literal
    html.push_line(line);
    parser.open(Processor::HtmlBlock(html));
    true
}

impl BlockBuilder for HtmlBlockBuilder {
    fn kind(&self) -> ProcessorKind {
        ProcessorKind::HtmlBlock
    }

    fn try_continue(&mut self, line: &mut BlockLine<'_>) -> Continuation {
        if self.condition >= 6 {
            return if line.is_blank() {
                Continuation::None
            } else {
                Continuation::Continue
            };
        }
        if block_end_condition(self.condition, line.remainder().as_bytes()) {
            self.push_line(line);
            return Continuation::Closed;
        }
        Continuation::Continue
    }

    fn add_line(&mut self, line: &mut BlockLine<'_>) {
        self.push_line(line);
    }

    fn close(self, _end: u32, _ctx: &mut CloseContext<'_, '_>) -> Option<Block> {
        let kind = BlockKind::HtmlBlock {
            condition: self.condition,
            literal: self.literal,
        };
        Some(Block::new(kind, Span::new(self.start, self.end)))
    }

    fn is_complete(&self) -> bool {
        self.complete
    }
}
