//! Footnote definitions: `[^label]: text`, continued by indented lines.

use crate::ast::{Block, BlockKind};
use crate::footnote::normalize_footnote_label;
use crate::Span;

use super::line::BlockLine;
use super::parser::BlockParser;
use super::processor::{accepts_flow_child, container_end, BlockBuilder, CloseContext, Continuation, Processor, ProcessorKind};
use super::token::TokenKind;

/// Indentation that continues a footnote definition.
const CONTINUATION_INDENT: u32 = 4;

#[derive(Debug)]
pub struct FootnoteBuilder {
    label: String,
    start: u32,
    end: u32,
    children: Vec<Block>,
}

pub(crate) fn start(parser: &mut BlockParser<'_>, line: &mut BlockLine<'_>) -> bool {
    let Some(token) = line.peek() else {
        return false;
    };
    if token.kind != TokenKind::FootnoteStart {
        return false;
    }
    // `[^` label `]:`
    let text = token.text(line.input());
    let label = &text[2..text.len() - 2];
    let Some(key) = normalize_footnote_label(label) else {
        return false;
    };
    if !parser.maps_mut().footnotes.insert(key, label.to_owned()) {
        log::trace!("duplicate footnote [^{label}] kept unreferenced");
    }

    line.advance_past_indent();
    line.skip_all_indent();
    parser.open(Processor::Footnote(FootnoteBuilder {
        label: label.to_owned(),
        start: token.span.start,
        end: line.next,
        children: Vec::new(),
    }));
    true
}

impl BlockBuilder for FootnoteBuilder {
    fn kind(&self) -> ProcessorKind {
        ProcessorKind::Footnote
    }

    fn try_continue(&mut self, line: &mut BlockLine<'_>) -> Continuation {
        if line.is_blank() {
            line.skip_all_indent();
            Continuation::Continue
        } else if line.indent_width() >= CONTINUATION_INDENT {
            line.skip_indent(CONTINUATION_INDENT);
            self.end = line.next;
            Continuation::Continue
        } else {
            Continuation::None
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
        let kind = BlockKind::FootnoteDefinition {
            label: self.label,
            order: None,
        };
        Some(Block::new(kind, Span::new(self.start, end)).with_children(self.children))
    }
}
