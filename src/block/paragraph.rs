//! Paragraphs, and the link reference definitions hidden at their start.

use smallvec::SmallVec;

use crate::ast::{Block, BlockKind};
use crate::link_ref::{normalize_label, parse_definition, DefinitionSource};
use crate::text::trim_end_spaces;
use crate::Span;

use super::line::BlockLine;
use super::processor::{BlockBuilder, CloseContext, Continuation, ProcessorKind};

/// One buffered line: its content (leading whitespace removed) and the
/// offset of the following line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParagraphLine {
    pub content: Span,
    pub next: u32,
}

#[derive(Debug, Default)]
pub struct ParagraphBuilder {
    lines: Vec<ParagraphLine>,
}

impl ParagraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[ParagraphLine] {
        &self.lines
    }

    pub fn pop_line(&mut self) -> Option<ParagraphLine> {
        self.lines.pop()
    }

    pub fn into_lines(self) -> Vec<ParagraphLine> {
        self.lines
    }

    /// Turn leading lines that form link reference definitions into
    /// definition nodes, registering each with the deferred maps.
    ///
    /// The consumed lines are removed from the paragraph.
    pub fn extract_definitions(&mut self, ctx: &mut CloseContext<'_, '_>) -> Vec<Block> {
        let input = ctx.input;
        let starts_with_bracket = self
            .lines
            .first()
            .is_some_and(|line| line.content.slice(input).starts_with('['));
        if !starts_with_bracket {
            return Vec::new();
        }

        let scratch = ctx.scratch;
        let mut text = scratch.string();
        let mut line_starts: SmallVec<[usize; 8]> = SmallVec::new();
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                text.push('\n');
            }
            line_starts.push(text.len());
            text.push_str(line.content.slice(input));
        }

        let mut definitions = Vec::new();
        let mut consumed_lines = 0;
        let mut pos = 0;
        while pos < text.len() {
            let Some(parsed) = parse_definition(&text[pos..]) else {
                break;
            };
            let key = normalize_label(&parsed.definition.label);
            if key.is_empty() {
                break;
            }
            let end = pos + parsed.consumed;
            let first = consumed_lines;
            while consumed_lines < self.lines.len() && line_starts[consumed_lines] < end {
                consumed_lines += 1;
            }
            let span = Span::new(self.lines[first].content.start, self.lines[consumed_lines - 1].next);

            if !ctx
                .maps
                .link_definitions
                .insert(key, parsed.definition.clone(), DefinitionSource::Explicit)
            {
                log::trace!("duplicate link definition [{}] ignored", parsed.definition.label);
            }
            definitions.push(Block::new(BlockKind::LinkReferenceDefinition(parsed.definition), span));
            pos = end;
        }

        self.lines.drain(..consumed_lines);
        definitions
    }
}

/// Content spans of `lines`, with trailing whitespace cut from the last one.
pub(crate) fn content_spans(input: &str, lines: &[ParagraphLine]) -> SmallVec<[Span; 2]> {
    let mut spans: SmallVec<[Span; 2]> = lines.iter().map(|line| line.content).collect();
    if let Some(last) = spans.last_mut() {
        let trimmed = trim_end_spaces(last.slice(input));
        last.end = last.start + trimmed.len() as u32;
    }
    spans
}

impl BlockBuilder for ParagraphBuilder {
    fn kind(&self) -> ProcessorKind {
        ProcessorKind::Paragraph
    }

    fn try_continue(&mut self, line: &mut BlockLine<'_>) -> Continuation {
        if line.is_blank() {
            Continuation::None
        } else {
            Continuation::Continue
        }
    }

    fn try_block_starts(&self) -> bool {
        true
    }

    fn can_lazy_continuation(&self) -> bool {
        true
    }

    fn add_line(&mut self, line: &mut BlockLine<'_>) {
        line.skip_all_indent();
        self.lines.push(ParagraphLine {
            content: line.rest_span(),
            next: line.next,
        });
        line.consume_all();
    }

    fn close(self, _end: u32, ctx: &mut CloseContext<'_, '_>) -> Option<Block> {
        let first = self.lines.first()?;
        let last = self.lines.last()?;
        let mut block = Block::new(BlockKind::Paragraph, Span::new(first.content.start, last.next));
        block.pending = ctx.defer(content_spans(ctx.input, &self.lines), false);
        Some(block)
    }

    fn need_parse_inlines(&self) -> bool {
        true
    }
}
