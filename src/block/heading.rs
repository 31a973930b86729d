//! ATX and setext headings.

use smallvec::SmallVec;

use crate::ast::{Block, BlockKind};
use crate::attributes::{split_trailing, Attributes};
use crate::link_ref::normalize_label;
use crate::resolve::HeadingReference;
use crate::text::trim_end_spaces;
use crate::Span;

use super::line::BlockLine;
use super::paragraph::{content_spans, ParagraphLine};
use super::parser::BlockParser;
use super::processor::{BlockBuilder, CloseContext, Continuation, Processor, ProcessorKind};
use super::token::TokenKind;

#[derive(Debug)]
pub struct AtxHeadingBuilder {
    level: u8,
    content: Span,
    attributes: Option<Attributes>,
    start: u32,
    end: u32,
}

/// `# Heading` on one line.
pub(crate) fn start_atx(parser: &mut BlockParser<'_>, line: &mut BlockLine<'_>) -> bool {
    let Some(token) = line.peek() else {
        return false;
    };
    if token.kind != TokenKind::AtxHeading {
        return false;
    }
    let input = line.input();
    let start = token.span.start;
    let marker_end = token.span.start as usize + token.count as usize;
    let raw = &input[marker_end..token.span.end_usize()];
    let leading = raw.len() - raw.trim_start_matches([' ', '\t']).len();
    let content_start = marker_end + leading;
    let mut content = &raw[leading..];

    let mut attributes = None;
    if parser.options().use_header_attributes {
        if let Some((before, attrs)) = split_trailing(content, &parser.options().attributes_prefix) {
            content = before;
            attributes = Some(attrs).filter(|a| !a.is_empty());
        }
    }
    content = strip_closing_sequence(content);

    let heading = AtxHeadingBuilder {
        level: token.count as u8,
        content: Span::from_usize(content_start, content_start + content.len()),
        attributes,
        start,
        end: line.next,
    };
    line.consume_all();
    parser.open(Processor::AtxHeading(heading));
    true
}

/// Remove an optional closing `#` run (and the whitespace before it).
fn strip_closing_sequence(content: &str) -> &str {
    let trimmed = trim_end_spaces(content);
    let without = trimmed.trim_end_matches('#');
    if without.is_empty() {
        ""
    } else if without.ends_with([' ', '\t']) {
        trim_end_spaces(without)
    } else {
        trimmed
    }
}

/// Record a heading under its raw text so `[Heading text]` can link to it.
fn register_reference(ctx: &mut CloseContext<'_, '_>, lines: &[Span], slot: u32) {
    if !ctx.options.use_auto_identifier {
        return;
    }
    let scratch = ctx.scratch;
    let mut raw = scratch.string();
    for (i, span) in lines.iter().enumerate() {
        if i > 0 {
            raw.push('\n');
        }
        raw.push_str(span.slice(ctx.input));
    }
    let label = normalize_label(&raw);
    if !label.is_empty() {
        ctx.maps.heading_references.push(HeadingReference { label, slot });
    }
}

fn heading_block(
    level: u8,
    setext: bool,
    span: Span,
    lines: SmallVec<[Span; 2]>,
    attributes: Option<Attributes>,
    ctx: &mut CloseContext<'_, '_>,
) -> Block {
    let id = attributes.as_ref().and_then(|a| a.id.clone());
    let mut block = Block::new(BlockKind::Heading { level, setext, id }, span);
    block.attributes = attributes;
    block.pending = ctx.defer(lines.clone(), true);
    if let Some(slot) = block.pending {
        register_reference(ctx, &lines, slot);
    }
    block
}

impl BlockBuilder for AtxHeadingBuilder {
    fn kind(&self) -> ProcessorKind {
        ProcessorKind::AtxHeading
    }

    fn try_continue(&mut self, _line: &mut BlockLine<'_>) -> Continuation {
        Continuation::None
    }

    fn close(self, _end: u32, ctx: &mut CloseContext<'_, '_>) -> Option<Block> {
        let mut lines = SmallVec::new();
        if !self.content.is_empty() {
            lines.push(self.content);
        }
        Some(heading_block(
            self.level,
            false,
            Span::new(self.start, self.end),
            lines,
            self.attributes,
            ctx,
        ))
    }

    fn need_parse_inlines(&self) -> bool {
        true
    }

    fn is_complete(&self) -> bool {
        true
    }
}

#[derive(Debug)]
pub struct SetextHeadingBuilder {
    level: u8,
    lines: Vec<ParagraphLine>,
    end: u32,
}

/// Underline (`===` or `---`) below a paragraph that is the matched tip.
pub(crate) fn start_setext(parser: &mut BlockParser<'_>, line: &mut BlockLine<'_>) -> bool {
    if line.paragraph_skippable {
        return false;
    }
    let Some(token) = line.peek() else {
        return false;
    };
    let level = match token.kind {
        TokenKind::SetextUnderline => 1,
        TokenKind::DashLine => 2,
        _ => return false,
    };
    let Some(paragraph) = parser.take_matched_paragraph(line) else {
        return false;
    };
    let lines = paragraph.into_lines();
    let heading = SetextHeadingBuilder {
        level,
        lines,
        end: line.next,
    };
    line.consume_all();
    parser.open(Processor::SetextHeading(heading));
    true
}

impl BlockBuilder for SetextHeadingBuilder {
    fn kind(&self) -> ProcessorKind {
        ProcessorKind::SetextHeading
    }

    fn try_continue(&mut self, _line: &mut BlockLine<'_>) -> Continuation {
        Continuation::None
    }

    fn close(self, _end: u32, ctx: &mut CloseContext<'_, '_>) -> Option<Block> {
        let start = self.lines.first()?.content.start;
        let lines = content_spans(ctx.input, &self.lines);
        Some(heading_block(self.level, true, Span::new(start, self.end), lines, None, ctx))
    }

    fn need_parse_inlines(&self) -> bool {
        true
    }

    fn is_complete(&self) -> bool {
        true
    }
}
