//! Column-aware byte cursor over a single line.
//!
//! The block tokenizer walks each line with a [`Cursor`]: it never crosses
//! the line end and keeps the tab-expanded column of its position, so
//! tokens can record both byte offsets and columns without rescanning.

use crate::locator::next_tab_stop;
use crate::Span;

/// A cursor for byte-by-byte scanning of one line.
///
/// # Example
/// ```
/// use mdtree::cursor::Cursor;
///
/// let input = b"\tHello";
/// let mut cursor = Cursor::new(input, 0, input.len());
///
/// cursor.skip_whitespace();
/// assert_eq!(cursor.peek(), Some(b'H'));
/// assert_eq!(cursor.column(), 4);
/// ```
#[derive(Clone, Copy)]
pub struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
    end: usize,
    column: u32,
}

impl<'a> Cursor<'a> {
    /// Create a cursor over `bytes[start..end]`, at column 0.
    #[inline]
    pub fn new(bytes: &'a [u8], start: usize, end: usize) -> Self {
        debug_assert!(start <= end && end <= bytes.len());
        Self {
            bytes,
            pos: start,
            end,
            column: 0,
        }
    }

    /// Current offset from the start of input.
    #[inline]
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Tab-expanded column of the current position.
    #[inline]
    pub fn column(&self) -> u32 {
        self.column
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.end - self.pos
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.end
    }

    /// Peek the current byte without advancing.
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        if self.pos < self.end { Some(self.bytes[self.pos]) } else { None }
    }

    /// Advance by one byte, updating the column.
    #[inline]
    pub fn bump(&mut self) {
        debug_assert!(!self.is_eof());
        self.column = match self.bytes[self.pos] {
            b'\t' => next_tab_stop(self.column),
            // continuation bytes do not start a new char
            0x80..=0xBF => self.column,
            _ => self.column + 1,
        };
        self.pos += 1;
    }

    /// Advance by n bytes.
    #[inline]
    pub fn advance(&mut self, n: usize) {
        for _ in 0..n.min(self.remaining()) {
            self.bump();
        }
    }

    /// Skip while predicate is true. Returns the number of bytes skipped.
    #[inline]
    pub fn skip_while<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(u8) -> bool,
    {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if !predicate(b) {
                break;
            }
            self.bump();
        }
        self.pos - start
    }

    /// Skip spaces and tabs.
    #[inline]
    pub fn skip_whitespace(&mut self) -> usize {
        self.skip_while(|b| b == b' ' || b == b'\t')
    }

    /// Span from a start offset to the current position.
    #[inline]
    pub fn span_from(&self, start: usize) -> Span {
        Span::from_usize(start, self.pos)
    }

    /// Unconsumed bytes of the line.
    #[inline]
    pub fn remaining_slice(&self) -> &'a [u8] {
        &self.bytes[self.pos..self.end]
    }
}

impl std::fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("offset", &self.pos)
            .field("column", &self.column)
            .field("remaining", &self.remaining())
            .finish()
    }
}

/// Split the line starting at `start`.
///
/// Returns the content end and the offset of the next line. `\n`, `\r\n`
/// and a lone `\r` all end a line.
pub fn line_bounds(bytes: &[u8], start: usize) -> (usize, usize) {
    match memchr::memchr2(b'\n', b'\r', &bytes[start..]) {
        Some(idx) => {
            let end = start + idx;
            if bytes[end] == b'\r' && bytes.get(end + 1) == Some(&b'\n') {
                (end, end + 2)
            } else {
                (end, end + 1)
            }
        }
        None => (bytes.len(), bytes.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_stays_in_line() {
        let input = b"ab\ncd";
        let mut cursor = Cursor::new(input, 0, 2);
        assert_eq!(cursor.remaining(), 2);
        cursor.advance(5);
        assert!(cursor.is_eof());
        assert_eq!(cursor.peek(), None);
        assert_eq!(cursor.offset(), 2);
    }

    #[test]
    fn test_cursor_columns() {
        let input = b" \t x";
        let mut cursor = Cursor::new(input, 0, input.len());
        assert_eq!(cursor.skip_whitespace(), 3);
        assert_eq!(cursor.column(), 5);
        assert_eq!(cursor.peek(), Some(b'x'));
        cursor.bump();
        assert_eq!(cursor.column(), 6);
    }

    #[test]
    fn test_cursor_peek() {
        let cursor = Cursor::new(b"abc", 1, 3);
        assert_eq!(cursor.peek(), Some(b'b'));
        assert_eq!(cursor.remaining_slice(), b"bc");
        assert_eq!(cursor.span_from(0), Span::new(0, 1));
    }

    #[test]
    fn test_line_bounds() {
        let input = b"a\nb\r\nc\rd";
        assert_eq!(line_bounds(input, 0), (1, 2));
        assert_eq!(line_bounds(input, 2), (3, 5));
        assert_eq!(line_bounds(input, 5), (6, 7));
        assert_eq!(line_bounds(input, 7), (8, 8));
    }
}
