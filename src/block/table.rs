//! Pipe tables.
//!
//! A table starts when the last line of a paragraph is followed by a
//! delimiter row with the same number of cells. Later lines are body rows
//! until a blank line or another block start.

use smallvec::SmallVec;

use crate::ast::{Alignment, Block, BlockKind};
use crate::limits::MAX_TABLE_COLUMNS;
use crate::Span;

use super::line::BlockLine;
use super::paragraph::ParagraphLine;
use super::parser::BlockParser;
use super::processor::{BlockBuilder, CloseContext, Continuation, Processor, ProcessorKind};
use super::token::TokenKind;

/// Parse a delimiter row such as `| :--- | ---: |`.
pub(crate) fn parse_delimiter_row(rest: &[u8]) -> Option<SmallVec<[Alignment; 8]>> {
    let mut alignments = SmallVec::new();
    for cell in cell_ranges(rest) {
        let cell = &rest[cell];
        let left = cell.first() == Some(&b':');
        let right = cell.len() > 1 && cell.last() == Some(&b':');
        let dashes = &cell[usize::from(left)..cell.len() - usize::from(right)];
        if dashes.is_empty() || dashes.iter().any(|&b| b != b'-') {
            return None;
        }
        if alignments.len() == MAX_TABLE_COLUMNS {
            return None;
        }
        alignments.push(match (left, right) {
            (true, true) => Alignment::Center,
            (true, false) => Alignment::Left,
            (false, true) => Alignment::Right,
            (false, false) => Alignment::None,
        });
    }
    (!alignments.is_empty()).then_some(alignments)
}

/// Byte ranges of the trimmed cells of a row, split on unescaped pipes.
///
/// One leading and one trailing pipe are optional and do not open cells.
fn cell_ranges(row: &[u8]) -> SmallVec<[std::ops::Range<usize>; 8]> {
    let trim = |mut start: usize, mut end: usize| {
        while start < end && matches!(row[start], b' ' | b'\t') {
            start += 1;
        }
        while end > start && matches!(row[end - 1], b' ' | b'\t') {
            end -= 1;
        }
        start..end
    };

    let whole = trim(0, row.len());
    let mut start = whole.start;
    let mut end = whole.end;
    if row.get(start) == Some(&b'|') {
        start += 1;
    }
    if end > start && row[end - 1] == b'|' && !is_escaped(row, end - 1) {
        end -= 1;
    }

    let mut cells = SmallVec::new();
    let mut cell_start = start;
    let mut pos = start;
    while pos < end {
        match row[pos] {
            b'\\' => pos += 2,
            b'|' => {
                cells.push(trim(cell_start, pos));
                pos += 1;
                cell_start = pos;
            }
            _ => pos += 1,
        }
    }
    if cell_start < end || cells.is_empty() || cell_start == end && row[end - 1] == b'|' {
        cells.push(trim(cell_start, end.max(cell_start)));
    }
    cells
}

fn is_escaped(row: &[u8], pos: usize) -> bool {
    row[..pos].iter().rev().take_while(|&&b| b == b'\\').count() % 2 == 1
}

/// Cell spans of the row at `content`.
pub(crate) fn split_cells(input: &str, content: Span) -> SmallVec<[Span; 8]> {
    let base = content.start_usize();
    cell_ranges(content.slice(input).as_bytes())
        .into_iter()
        .map(|range| Span::from_usize(base + range.start, base + range.end))
        .collect()
}

#[derive(Debug)]
pub struct TableBuilder {
    alignments: SmallVec<[Alignment; 8]>,
    header: ParagraphLine,
    rows: Vec<ParagraphLine>,
    start: u32,
    end: u32,
}

pub(crate) fn start(parser: &mut BlockParser<'_>, line: &mut BlockLine<'_>) -> bool {
    if line.paragraph_skippable || line.indent_width() >= 4 {
        return false;
    }
    let Some(token) = line.peek() else {
        return false;
    };
    if token.kind != TokenKind::TableDelimiterRow {
        return false;
    }
    let input = line.input();
    let header_matches = match parser.container() {
        Processor::Paragraph(paragraph) => paragraph
            .lines()
            .last()
            .is_some_and(|last| split_cells(input, last.content).len() == token.count as usize),
        _ => false,
    };
    if !header_matches {
        return false;
    }
    let Some(alignments) = parse_delimiter_row(token.text(input).as_bytes()) else {
        return false;
    };

    let Some(mut paragraph) = parser.take_matched_paragraph(line) else {
        return false;
    };
    let Some(header) = paragraph.pop_line() else {
        return false;
    };
    // lines above the header stay a paragraph of their own
    if !paragraph.lines().is_empty() {
        parser.open(Processor::Paragraph(paragraph));
    }

    let table = TableBuilder {
        alignments,
        header,
        rows: Vec::new(),
        start: header.content.start,
        end: line.next,
    };
    line.consume_all();
    parser.open(Processor::Table(table));
    true
}

impl TableBuilder {
    fn row(&self, line: ParagraphLine, header: bool, ctx: &mut CloseContext<'_, '_>) -> Block {
        let spans = split_cells(ctx.input, line.content);
        let mut cells = Vec::with_capacity(self.alignments.len());
        for (column, &alignment) in self.alignments.iter().enumerate() {
            // missing cells are empty, extra cells are dropped
            let span = spans
                .get(column)
                .copied()
                .unwrap_or_else(|| Span::empty_at(line.content.end));
            let mut cell = Block::new(BlockKind::TableCell { alignment }, span);
            let mut lines = SmallVec::new();
            if !span.is_empty() {
                lines.push(span);
            }
            cell.pending = ctx.defer(lines, false);
            cells.push(cell);
        }
        Block::new(BlockKind::TableRow { header }, Span::new(line.content.start, line.next)).with_children(cells)
    }
}

impl BlockBuilder for TableBuilder {
    fn kind(&self) -> ProcessorKind {
        ProcessorKind::Table
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

    fn add_line(&mut self, line: &mut BlockLine<'_>) {
        line.skip_all_indent();
        let content = line.rest_span();
        let trimmed = crate::text::trim_end_spaces(content.slice(line.input()));
        self.rows.push(ParagraphLine {
            content: Span::new(content.start, content.start + trimmed.len() as u32),
            next: line.next,
        });
        self.end = line.next;
        line.consume_all();
    }

    fn close(self, _end: u32, ctx: &mut CloseContext<'_, '_>) -> Option<Block> {
        let mut rows = Vec::with_capacity(self.rows.len() + 1);
        rows.push(self.row(self.header, true, ctx));
        for &line in &self.rows {
            rows.push(self.row(line, false, ctx));
        }
        let kind = BlockKind::Table {
            alignments: self.alignments.to_vec(),
        };
        Some(Block::new(kind, Span::new(self.start, self.end)).with_children(rows))
    }

    fn need_parse_inlines(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(row: &str) -> Vec<&str> {
        cell_ranges(row.as_bytes()).into_iter().map(|r| &row[r]).collect()
    }

    #[test]
    fn test_delimiter_row() {
        let row = parse_delimiter_row(b"| :-- | --: | :-: | --- |").unwrap();
        assert_eq!(
            row.as_slice(),
            &[Alignment::Left, Alignment::Right, Alignment::Center, Alignment::None]
        );
        assert_eq!(parse_delimiter_row(b"--|--").map(|r| r.len()), Some(2));
        assert!(parse_delimiter_row(b"| -- | x |").is_none());
        assert!(parse_delimiter_row(b"| : |").is_none());
        assert!(parse_delimiter_row(b"||").is_none());
    }

    #[test]
    fn test_cells() {
        assert_eq!(cells("| a | b |"), vec!["a", "b"]);
        assert_eq!(cells("a|b"), vec!["a", "b"]);
        assert_eq!(cells("| a |"), vec!["a"]);
        assert_eq!(cells(r"| a \| b | c |"), vec![r"a \| b", "c"]);
        assert_eq!(cells("| a | |"), vec!["a", ""]);
        assert_eq!(cells(r"a \|"), vec![r"a \|"]);
    }

    #[test]
    fn test_split_cells_spans() {
        let input = "x\n| ab | c |";
        let spans = split_cells(input, Span::new(2, input.len() as u32));
        assert_eq!(spans.as_slice(), &[Span::new(4, 6), Span::new(9, 10)]);
    }
}
