//! Offset to line/column mapping.

use std::cell::Cell;

/// Tabs advance to the next multiple of this column.
pub const TAB_STOP: u32 = 4;

/// Zero-based line and tab-expanded column of a source offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// Precomputed line starts for one input.
///
/// `\n`, `\r\n` and a lone `\r` all terminate a line. The last answer is
/// remembered, so queries in ascending offset order only scan the bytes
/// between two consecutive offsets.
///
/// # Example
/// ```
/// use mdtree::locator::{LineLocator, Position};
///
/// let locator = LineLocator::new("a\n\tb");
/// assert_eq!(locator.position(3), Position { line: 1, column: 4 });
/// ```
#[derive(Debug, Clone)]
pub struct LineLocator<'a> {
    input: &'a str,
    line_starts: Vec<u32>,
    cursor: Cell<Cursor>,
}

/// The most recent query and its position.
#[derive(Debug, Clone, Copy, Default)]
struct Cursor {
    offset: u32,
    line: u32,
    column: u32,
}

impl<'a> LineLocator<'a> {
    pub fn new(input: &'a str) -> Self {
        let bytes = input.as_bytes();
        let mut line_starts = vec![0u32];
        let mut i = 0;
        while let Some(found) = memchr::memchr2(b'\n', b'\r', &bytes[i..]) {
            let pos = i + found;
            let next = if bytes[pos] == b'\r' && bytes.get(pos + 1) == Some(&b'\n') {
                pos + 2
            } else {
                pos + 1
            };
            line_starts.push(next as u32);
            i = next;
        }
        Self {
            input,
            line_starts,
            cursor: Cell::default(),
        }
    }

    /// Number of lines (an input ending in a terminator has a final empty line).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte offset where a zero-based line starts.
    pub fn line_start(&self, line: usize) -> Option<u32> {
        self.line_starts.get(line).copied()
    }

    /// Map a byte offset to its position. Offsets past the end clamp to it.
    pub fn position(&self, offset: u32) -> Position {
        let offset = offset.min(self.input.len() as u32);
        let cursor = self.cursor.get();
        let position = if cursor.offset <= offset {
            let line = cursor.line as usize;
            let skipped = self.line_starts[line + 1..].partition_point(|&start| start <= offset);
            if skipped == 0 {
                let between = &self.input.as_bytes()[cursor.offset as usize..offset as usize];
                Position {
                    line: cursor.line,
                    column: expand_columns(between, cursor.column),
                }
            } else {
                self.position_on_line(line + skipped, offset)
            }
        } else {
            // line_starts[0] is 0, so some line always matches
            let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
            self.position_on_line(line, offset)
        };
        self.cursor.set(Cursor {
            offset,
            line: position.line,
            column: position.column,
        });
        position
    }

    fn position_on_line(&self, line: usize, offset: u32) -> Position {
        let start = self.line_starts[line] as usize;
        Position {
            line: line as u32,
            column: expand_columns(&self.input.as_bytes()[start..offset as usize], 0),
        }
    }
}

/// Column reached after `text`, starting at `column`. Tabs advance to the
/// next tab stop; a UTF-8 sequence counts as one column.
#[inline]
pub fn expand_columns(text: &[u8], column: u32) -> u32 {
    text.iter().fold(column, |col, &b| match b {
        b'\t' => next_tab_stop(col),
        // continuation bytes do not start a new char
        0x80..=0xBF => col,
        _ => col + 1,
    })
}

/// The column a tab at `column` advances to.
#[inline]
pub const fn next_tab_stop(column: u32) -> u32 {
    column + (TAB_STOP - column % TAB_STOP)
}
