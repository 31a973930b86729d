//! Block parser driver.
//!
//! Lines are tokenized one at a time and matched against the stack of open
//! blocks, outermost first. The deepest matched container may then open new
//! blocks; whatever text is left continues the tip, lazily continues an
//! unmatched paragraph, or starts a new paragraph.

use smallvec::SmallVec;

use crate::ast::Block;
use crate::cursor::line_bounds;
use crate::limits::MAX_BLOCK_NESTING;
use crate::resolve::{BlockTree, DeferredMaps, PendingInline};
use crate::scratch::Scratch;
use crate::{Options, Span};

use super::code;
use super::factory;
use super::line::BlockLine;
use super::paragraph::ParagraphBuilder;
use super::processor::{BlockBuilder, CloseContext, Continuation, DocumentBuilder, Processor};
use super::token::tokenize_line;

/// Block parser state.
pub struct BlockParser<'a> {
    /// Input text.
    input: &'a str,
    options: &'a Options,
    /// Open blocks, root first. `stack[0]` is the document.
    stack: Vec<Processor>,
    /// Index of the deepest block that accepted the current line.
    container: usize,
    /// Start offset of the current line.
    line_start: u32,
    maps: DeferredMaps,
    /// Inline content waiting for the resolve pass.
    pending: Vec<PendingInline>,
    /// Offsets of blank lines, ascending.
    blank_lines: Vec<u32>,
    scratch: Scratch,
}

impl<'a> BlockParser<'a> {
    /// Create a new block parser.
    pub fn new(input: &'a str, options: &'a Options) -> Self {
        Self {
            input,
            options,
            stack: vec![Processor::Document(DocumentBuilder::default())],
            container: 0,
            line_start: 0,
            maps: DeferredMaps::default(),
            pending: Vec::new(),
            blank_lines: Vec::new(),
            scratch: Scratch::new(),
        }
    }

    /// Parse every line and close all open blocks.
    pub fn parse(mut self) -> (BlockTree<'a>, DeferredMaps) {
        let input = self.input;
        let bytes = input.as_bytes();
        let mut tokens = Vec::new();
        let mut start = 0;
        while start < bytes.len() {
            let (end, next) = line_bounds(bytes, start);
            tokenize_line(input, start, end, next, self.options, &mut tokens);
            log::trace!("line {start}..{end}: {:?}", tokens.iter().map(|t| t.kind).collect::<SmallVec<[_; 8]>>());
            let mut line = BlockLine::new(input, &tokens, start, end, next);
            self.process_line(&mut line);
            start = next;
        }

        let end = input.len() as u32;
        self.line_start = end;
        self.close_to(1, end);
        let children = match self.stack.pop() {
            Some(Processor::Document(document)) => document.children,
            _ => Vec::new(),
        };
        let tree = BlockTree {
            input,
            children,
            span: Span::new(0, end),
            pending: self.pending,
        };
        (tree, self.maps)
    }

    fn process_line(&mut self, line: &mut BlockLine<'_>) {
        self.line_start = line.start;

        // 1. which open blocks does the line continue?
        let mut matched = 0;
        for i in 1..self.stack.len() {
            match self.stack[i].try_continue(line) {
                Continuation::Continue => matched = i,
                Continuation::Closed => {
                    self.close_to(i, line.next);
                    self.container = self.stack.len() - 1;
                    return;
                }
                Continuation::None => break,
            }
        }
        self.container = matched;
        let last_matched = matched;

        // 2. open new blocks inside the deepest match
        let mut opened = false;
        while self.stack[self.container].try_block_starts() && self.stack.len() < MAX_BLOCK_NESTING {
            line.paragraph_skippable = !matches!(self.stack[self.container], Processor::Paragraph(_));
            let Some(kind) = line.peek_kind() else {
                break;
            };
            if line.indent_width() >= 4 {
                // indented code cannot interrupt a paragraph
                if matches!(self.stack.last(), Some(Processor::Paragraph(_))) {
                    break;
                }
                code::start_indented(self, line);
                opened = true;
                break;
            }
            if !factory::try_start(self, line, kind) {
                break;
            }
            opened = true;
            if line.is_consumed() || !self.stack[self.container].is_container() {
                break;
            }
        }

        // 3. lazy paragraph continuation
        let top = self.stack.len() - 1;
        if !opened && !line.is_blank() && top > last_matched && self.stack[top].can_lazy_continuation() {
            self.stack[top].add_line(line);
            return;
        }

        // 4. everything unmatched closes
        self.close_to(self.container + 1, line.start);

        if opened && line.is_consumed() {
            return;
        }
        if !opened && line.is_blank() {
            self.blank_lines.push(line.offset());
        }

        // 5. the rest of the line goes to the tip
        let tip = self.stack.len() - 1;
        if !self.stack[tip].is_container() {
            self.stack[tip].add_line(line);
        } else if !line.is_blank() {
            let mut paragraph = ParagraphBuilder::new();
            paragraph.add_line(line);
            self.open(Processor::Paragraph(paragraph));
        }
    }

    /// Push a new block at the insertion point.
    ///
    /// Unmatched blocks above the insertion point close first, then any
    /// ancestor that cannot hold the new block. Blocks that are complete on
    /// their first line close immediately.
    pub(crate) fn open(&mut self, processor: Processor) {
        let kind = processor.kind();
        self.close_to(self.container + 1, self.line_start);
        while self.stack.len() > 1 && !self.stack[self.stack.len() - 1].can_contain(kind) {
            self.close_top(self.line_start);
        }
        let parent = self.stack.len() - 1;
        self.stack[parent].child_opened();
        log::debug!("open {kind:?} at {} (depth {})", self.line_start, parent + 1);

        let complete = processor.is_complete();
        self.stack.push(processor);
        if complete {
            self.close_top(self.line_start);
            self.container = parent;
        } else {
            self.container = parent + 1;
        }
    }

    #[inline]
    pub(crate) fn options(&self) -> &'a Options {
        self.options
    }

    /// The deepest block that accepted the current line.
    #[inline]
    pub(crate) fn container(&self) -> &Processor {
        &self.stack[self.container]
    }

    #[inline]
    pub(crate) fn maps_mut(&mut self) -> &mut DeferredMaps {
        &mut self.maps
    }

    /// Remove the paragraph that is the matched tip so a block can replace
    /// it (setext underline, table header).
    ///
    /// Leading link reference definitions are split off into the parent
    /// first; `None` if nothing else was left.
    pub(crate) fn take_matched_paragraph(&mut self, line: &mut BlockLine<'_>) -> Option<ParagraphBuilder> {
        if self.container + 1 != self.stack.len() || !matches!(self.stack.last(), Some(Processor::Paragraph(_))) {
            return None;
        }
        let Some(Processor::Paragraph(mut paragraph)) = self.stack.pop() else {
            return None;
        };
        self.container -= 1;
        line.paragraph_skippable = true;

        let definitions = paragraph.extract_definitions(&mut self.close_context(false));
        for definition in definitions {
            self.stack[self.container].add_node(definition);
        }
        (!paragraph.lines().is_empty()).then_some(paragraph)
    }

    fn close_context(&mut self, inlines: bool) -> CloseContext<'a, '_> {
        CloseContext {
            input: self.input,
            options: self.options,
            blank_lines: &self.blank_lines,
            maps: &mut self.maps,
            pending: inlines.then_some(&mut self.pending),
            scratch: &self.scratch,
        }
    }

    /// Close open blocks until `depth` remain.
    fn close_to(&mut self, depth: usize, end: u32) {
        while self.stack.len() > depth.max(1) {
            self.close_top(end);
        }
        self.container = self.container.min(self.stack.len() - 1);
    }

    /// Close the innermost block and hand its node to the parent.
    fn close_top(&mut self, end: u32) {
        if self.stack.len() <= 1 {
            return;
        }
        let Some(processor) = self.stack.pop() else {
            return;
        };
        let kind = processor.kind();
        let inlines = processor.need_parse_inlines();
        let mut nodes: SmallVec<[Block; 2]> = SmallVec::new();
        {
            let mut ctx = self.close_context(inlines);
            let node = match processor {
                Processor::Paragraph(mut paragraph) => {
                    nodes.extend(paragraph.extract_definitions(&mut ctx));
                    Processor::Paragraph(paragraph).close(end, &mut ctx)
                }
                other => other.close(end, &mut ctx),
            };
            nodes.extend(node);
        }
        log::debug!("close {kind:?} at {end}: {} node(s)", nodes.len());

        let parent = self.stack.len() - 1;
        for node in nodes {
            self.stack[parent].add_node(node);
        }
        self.container = self.container.min(parent);
    }
}
