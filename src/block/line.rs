//! Cursor view over one tokenized line.

use std::borrow::Cow;

use crate::locator::next_tab_stop;
use crate::Span;

use super::token::{Token, TokenKind};

/// Leading whitespace at the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indentation {
    pub start: u32,
    pub end: u32,
    pub start_column: u32,
    pub end_column: u32,
}

impl Indentation {
    #[inline]
    pub fn width(&self) -> u32 {
        self.end_column - self.start_column
    }
}

/// The current line as processors see it.
///
/// Processors consume container markers and indentation from the front;
/// whatever is left is the line's content. A tab can be consumed partly:
/// the columns it still covers are kept as `partial_spaces` and come back
/// as spaces in [`remainder`](Self::remainder).
#[derive(Debug)]
pub struct BlockLine<'a> {
    input: &'a str,
    tokens: &'a [Token],
    index: usize,
    offset: usize,
    column: u32,
    partial_spaces: u32,
    indentation: Option<Indentation>,
    /// Offset where the line starts.
    pub start: u32,
    /// Offset of the line terminator (or end of input).
    pub end: u32,
    /// Offset where the next line starts.
    pub next: u32,
    /// No matched paragraph is open at the insertion point, so block starts
    /// need not respect the paragraph interruption rules.
    pub paragraph_skippable: bool,
}

impl<'a> BlockLine<'a> {
    pub fn new(input: &'a str, tokens: &'a [Token], start: usize, end: usize, next: usize) -> Self {
        Self {
            input,
            tokens,
            index: 0,
            offset: start,
            column: 0,
            partial_spaces: 0,
            indentation: None,
            start: start as u32,
            end: end as u32,
            next: next as u32,
            paragraph_skippable: true,
        }
    }

    #[inline]
    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Byte offset of the cursor.
    #[inline]
    pub fn offset(&self) -> u32 {
        self.offset as u32
    }

    /// Column of the cursor, counting consumed parts of a split tab.
    #[inline]
    pub fn column(&self) -> u32 {
        self.column
    }

    /// The token under the cursor, indentation included.
    #[inline]
    pub fn current(&self) -> Option<&'a Token> {
        self.tokens.get(self.index).filter(|t| t.kind != TokenKind::NewLine)
    }

    /// The first token after any indentation.
    pub fn peek(&self) -> Option<&'a Token> {
        self.tokens[self.index.min(self.tokens.len())..]
            .iter()
            .find(|t| t.kind != TokenKind::Indent)
            .filter(|t| t.kind != TokenKind::NewLine)
    }

    #[inline]
    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    /// Whether only whitespace follows the first real token.
    pub fn blank_after_peek(&self) -> bool {
        let rest = &self.tokens[self.index.min(self.tokens.len())..];
        match rest.iter().position(|t| t.kind != TokenKind::Indent) {
            Some(first) => rest[first + 1..]
                .iter()
                .all(|t| matches!(t.kind, TokenKind::Indent | TokenKind::NewLine)),
            None => true,
        }
    }

    /// Only whitespace is left.
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.peek().is_none()
    }

    /// Nothing at all is left, not even indentation.
    #[inline]
    pub fn is_consumed(&self) -> bool {
        self.partial_spaces == 0 && self.current().is_none()
    }

    /// Whitespace at the cursor, computed on first use after each move.
    pub fn indentation(&mut self) -> Indentation {
        if let Some(indentation) = self.indentation {
            return indentation;
        }
        let physical = self.column + self.partial_spaces;
        let indentation = match self.current() {
            Some(token) if token.kind == TokenKind::Indent => {
                Indentation {
                    start: self.offset as u32,
                    end: token.span.end,
                    start_column: self.column,
                    end_column: token.end_column.max(physical),
                }
            }
            _ => Indentation {
                start: self.offset as u32,
                end: self.offset as u32,
                start_column: self.column,
                end_column: physical,
            },
        };
        self.indentation = Some(indentation);
        indentation
    }

    #[inline]
    pub fn indent_width(&mut self) -> u32 {
        self.indentation().width()
    }

    /// Consume up to `n` columns of whitespace; returns the columns consumed.
    pub fn skip_indent(&mut self, n: u32) -> u32 {
        let start_column = self.column;
        let target = self.column.saturating_add(n);

        let take = self.partial_spaces.min(n);
        self.partial_spaces -= take;
        self.column += take;

        let bytes = self.input.as_bytes();
        while self.column < target {
            let Some(token) = self.current().filter(|t| t.kind == TokenKind::Indent) else {
                break;
            };
            let width = if bytes[self.offset] == b'\t' {
                next_tab_stop(self.column) - self.column
            } else {
                1
            };
            if self.column + width <= target {
                self.column += width;
            } else {
                self.partial_spaces = width - (target - self.column);
                self.column = target;
            }
            self.offset += 1;
            if self.offset >= token.span.end_usize() {
                self.index += 1;
            }
        }

        self.indentation = None;
        self.column - start_column
    }

    /// Consume all whitespace at the cursor.
    #[inline]
    pub fn skip_all_indent(&mut self) -> u32 {
        self.skip_indent(u32::MAX)
    }

    /// Consume the token under the cursor, dropping any split-tab spaces.
    pub fn advance(&mut self) -> Option<&'a Token> {
        let token = self.current()?;
        self.offset = token.span.end_usize();
        self.column = token.end_column;
        self.partial_spaces = 0;
        self.index += 1;
        self.indentation = None;
        Some(token)
    }

    /// Consume whitespace, then the first real token.
    pub fn advance_past_indent(&mut self) -> Option<&'a Token> {
        self.skip_all_indent();
        self.advance()
    }

    /// Mark the whole line as consumed.
    pub fn consume_all(&mut self) {
        self.index = self.tokens.len();
        self.offset = self.end as usize;
        self.partial_spaces = 0;
        self.indentation = None;
    }

    /// Unconsumed source after the cursor, excluding split-tab spaces.
    #[inline]
    pub fn rest_span(&self) -> Span {
        Span::from_usize(self.offset, self.end as usize)
    }

    /// Unconsumed content, with split-tab spaces restored.
    pub fn remainder(&self) -> Cow<'a, str> {
        let rest = &self.input[self.offset..self.end as usize];
        if self.partial_spaces == 0 {
            Cow::Borrowed(rest)
        } else {
            let mut owned = " ".repeat(self.partial_spaces as usize);
            owned.push_str(rest);
            Cow::Owned(owned)
        }
    }
}
