//! Block lexer: classifies one physical line into typed tokens.
//!
//! A line is read left to right. Container prefixes (indentation, `>`,
//! list markers, footnote labels) each become a token and classification
//! continues after them; the first leaf class ends the line. Feature-gated
//! classes fall through to [`TokenKind::TextLine`] when disabled.

use crate::ast::ListStyle;
use crate::cursor::Cursor;
use crate::inline::html::block_start_condition;
use crate::limits::{MAX_LINK_LABEL_LEN, MAX_LIST_MARKER_DIGITS};
use crate::{Options, Span};

use super::table::parse_delimiter_row;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Line terminator.
    NewLine,
    /// Run of spaces and tabs.
    Indent,
    /// `>`
    QuoteStart,
    /// `-`, `+` or `*` followed by whitespace or the line end.
    UnorderedListMarker,
    /// `1.`, `2)` and, with extended styles, `a.`, `iv)`, `α.`
    OrderedListMarker,
    /// `[ ]`, `[x]` or `[X]` right after a list marker.
    TaskListItemMarker,
    /// Backtick or tilde fence with an info string.
    CodeFenceStart,
    /// Bare fence: may open or close a code block.
    CodeFence,
    MathFenceStart,
    MathFence,
    /// `<` that opens an HTML block; `count` holds the condition.
    HtmlStart,
    ThematicBreak,
    /// `#` run; `count` holds the level.
    AtxHeading,
    /// Line of `=` only.
    SetextUnderline,
    /// Line of `-` only: setext underline, thematic break or empty list item.
    DashLine,
    /// Table delimiter row; `count` holds the column count.
    TableDelimiterRow,
    /// `[^label]:`
    FootnoteStart,
    CustomContainerFenceStart,
    CustomContainerFence,
    TextLine,
}

/// One classified piece of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// Column of `span.start`, tabs expanded.
    pub start_column: u32,
    /// Column of `span.end`.
    pub end_column: u32,
    /// Marker byte: `>`, bullet char, ordered delimiter, fence char,
    /// `#`, or the task state (` `, `x`, `X`).
    pub marker: u8,
    /// Run length, heading level, list number, HTML condition or column
    /// count, depending on the kind.
    pub count: u32,
    /// Numbering style of an ordered list marker.
    pub style: ListStyle,
}

impl Token {
    /// Source text of the token.
    #[inline]
    pub fn text<'a>(&self, input: &'a str) -> &'a str {
        self.span.slice(input)
    }

    /// Width in columns.
    #[inline]
    pub fn width(&self) -> u32 {
        self.end_column - self.start_column
    }
}

/// Tokenize the line `input[start..end]`, whose terminator ends at `next`.
///
/// `out` is cleared first, so one buffer serves the whole document.
pub fn tokenize_line(input: &str, start: usize, end: usize, next: usize, options: &Options, out: &mut Vec<Token>) {
    out.clear();
    let mut lexer = Lexer {
        cur: Cursor::new(input.as_bytes(), start, end),
        options,
        out,
    };
    lexer.run();
    if next > end {
        let column = lexer.cur.column();
        lexer.out.push(Token {
            kind: TokenKind::NewLine,
            span: Span::from_usize(end, next),
            start_column: column,
            end_column: column,
            marker: b'\n',
            count: 0,
            style: ListStyle::Decimal,
        });
    }
}

struct Lexer<'a, 'o> {
    cur: Cursor<'a>,
    options: &'o Options,
    out: &'o mut Vec<Token>,
}

/// Outcome of trying the container classes at one position.
enum Prefix {
    /// A container marker was emitted; keep classifying.
    Container,
    /// A whole-line token was emitted.
    Done,
    None,
}

impl Lexer<'_, '_> {
    fn run(&mut self) {
        let mut after_list_marker = false;
        loop {
            self.lex_indent();
            if self.cur.is_eof() {
                return;
            }
            if after_list_marker && self.lex_task_marker() {
                after_list_marker = false;
                continue;
            }
            match self.lex_prefix() {
                Prefix::Container => {
                    after_list_marker = matches!(
                        self.out.last().map(|t| t.kind),
                        Some(TokenKind::UnorderedListMarker | TokenKind::OrderedListMarker)
                    );
                }
                Prefix::Done => return,
                Prefix::None => {
                    self.lex_leaf();
                    return;
                }
            }
        }
    }

    fn push(&mut self, kind: TokenKind, start: usize, start_column: u32, marker: u8, count: u32) {
        self.out.push(Token {
            kind,
            span: self.cur.span_from(start),
            start_column,
            end_column: self.cur.column(),
            marker,
            count,
            style: ListStyle::Decimal,
        });
    }

    /// Emit the rest of the line as one token.
    fn push_rest(&mut self, kind: TokenKind, marker: u8, count: u32) {
        let start = self.cur.offset();
        let column = self.cur.column();
        self.cur.advance(self.cur.remaining());
        self.push(kind, start, column, marker, count);
    }

    fn lex_indent(&mut self) {
        let start = self.cur.offset();
        let column = self.cur.column();
        if self.cur.skip_whitespace() > 0 {
            self.push(TokenKind::Indent, start, column, b' ', 0);
        }
    }

    fn lex_prefix(&mut self) -> Prefix {
        let rest = self.cur.remaining_slice();
        let Some(&first) = rest.first() else {
            return Prefix::None;
        };
        let start = self.cur.offset();
        let column = self.cur.column();

        match first {
            b'>' => {
                self.cur.bump();
                self.push(TokenKind::QuoteStart, start, column, b'>', 1);
                return Prefix::Container;
            }
            b'-' | b'=' => {
                let run = rest.iter().take_while(|&&b| b == first).count();
                if rest[run..].iter().all(|&b| b == b' ' || b == b'\t') {
                    let kind = if first == b'-' { TokenKind::DashLine } else { TokenKind::SetextUnderline };
                    self.push_rest(kind, first, run as u32);
                    return Prefix::Done;
                }
            }
            _ => {}
        }

        if let Some(count) = thematic_break_count(rest) {
            self.push_rest(TokenKind::ThematicBreak, first, count);
            return Prefix::Done;
        }

        if matches!(first, b'-' | b'+' | b'*') && rest.get(1).is_none_or(|&b| b == b' ' || b == b'\t') {
            self.cur.bump();
            self.push(TokenKind::UnorderedListMarker, start, column, first, 0);
            return Prefix::Container;
        }

        if let Some(marker) = scan_ordered_marker(rest, self.options.use_extra_list_style_type) {
            self.cur.advance(marker.len);
            self.push(TokenKind::OrderedListMarker, start, column, marker.delimiter, marker.number);
            if let Some(token) = self.out.last_mut() {
                token.style = marker.style;
            }
            return Prefix::Container;
        }

        if let Some(len) = scan_footnote_start(rest) {
            self.cur.advance(len);
            self.push(TokenKind::FootnoteStart, start, column, b'[', 0);
            return Prefix::Container;
        }

        Prefix::None
    }

    fn lex_task_marker(&mut self) -> bool {
        let rest = self.cur.remaining_slice();
        let [b'[', state @ (b' ' | b'x' | b'X'), b']', after, ..] = *rest else {
            return false;
        };
        if after != b' ' && after != b'\t' {
            return false;
        }
        let start = self.cur.offset();
        let column = self.cur.column();
        self.cur.advance(3);
        self.push(TokenKind::TaskListItemMarker, start, column, state, 0);
        true
    }

    fn lex_leaf(&mut self) {
        let rest = self.cur.remaining_slice();
        let first = rest[0];
        let run = rest.iter().take_while(|&&b| b == first).count();
        let info_blank = || rest[run..].iter().all(|&b| b == b' ' || b == b'\t');

        match first {
            b'`' | b'~' if run >= 3 => {
                // a backtick fence's info string cannot contain backticks
                if first == b'`' && rest[run..].contains(&b'`') {
                    self.push_rest(TokenKind::TextLine, 0, 0);
                    return;
                }
                let kind = if info_blank() { TokenKind::CodeFence } else { TokenKind::CodeFenceStart };
                self.push_rest(kind, first, run as u32);
            }
            b'$' if run >= 2 && self.options.use_math && !rest[run..].contains(&b'$') => {
                let kind = if info_blank() { TokenKind::MathFence } else { TokenKind::MathFenceStart };
                self.push_rest(kind, first, run as u32);
            }
            b':' if run >= 3 => {
                let kind = if info_blank() {
                    TokenKind::CustomContainerFence
                } else {
                    TokenKind::CustomContainerFenceStart
                };
                self.push_rest(kind, first, run as u32);
            }
            b'<' => match block_start_condition(rest) {
                Some(condition) => self.push_rest(TokenKind::HtmlStart, first, u32::from(condition)),
                None => self.push_rest(TokenKind::TextLine, 0, 0),
            },
            b'#' if run <= 6 && rest.get(run).is_none_or(|&b| b == b' ' || b == b'\t') => {
                self.push_rest(TokenKind::AtxHeading, first, run as u32);
            }
            _ => {
                if self.options.use_table && memchr::memchr(b'|', rest).is_some() {
                    if let Some(alignments) = parse_delimiter_row(rest) {
                        self.push_rest(TokenKind::TableDelimiterRow, b'|', alignments.len() as u32);
                        return;
                    }
                }
                self.push_rest(TokenKind::TextLine, 0, 0);
            }
        }
    }
}

/// Three or more `*`, `-` or `_`, optionally separated by spaces or tabs.
fn thematic_break_count(rest: &[u8]) -> Option<u32> {
    let marker = *rest.first()?;
    if !matches!(marker, b'*' | b'-' | b'_') {
        return None;
    }
    let mut count = 0;
    for &b in rest {
        if b == marker {
            count += 1;
        } else if b != b' ' && b != b'\t' {
            return None;
        }
    }
    (count >= 3).then_some(count)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OrderedMarker {
    pub len: usize,
    pub number: u32,
    pub delimiter: u8,
    pub style: ListStyle,
}

/// Scan an ordered list marker, including its delimiter.
pub(crate) fn scan_ordered_marker(rest: &[u8], extended: bool) -> Option<OrderedMarker> {
    let (body_len, number, style) = if rest.first()?.is_ascii_digit() {
        let digits = rest.iter().take_while(|b| b.is_ascii_digit()).count();
        if digits > MAX_LIST_MARKER_DIGITS {
            return None;
        }
        let number = rest[..digits]
            .iter()
            .fold(0u32, |n, &b| n * 10 + u32::from(b - b'0'));
        (digits, number, ListStyle::Decimal)
    } else if extended {
        scan_extended_marker(rest)?
    } else {
        return None;
    };

    let delimiter = *rest.get(body_len)?;
    if delimiter != b'.' && delimiter != b')' {
        return None;
    }
    if rest.get(body_len + 1).is_some_and(|&b| b != b' ' && b != b'\t') {
        return None;
    }
    Some(OrderedMarker {
        len: body_len + 1,
        number,
        delimiter,
        style,
    })
}

/// Alphabetic, roman or greek list numbering.
fn scan_extended_marker(rest: &[u8]) -> Option<(usize, u32, ListStyle)> {
    // lowercase greek letters are two bytes: U+03B1 to U+03C9
    if let [0xCE | 0xCF, _, ..] = rest {
        let ch = std::str::from_utf8(&rest[..2]).ok()?.chars().next()?;
        if ('α'..='ω').contains(&ch) {
            return Some((2, ch as u32 - 'α' as u32 + 1, ListStyle::LowerGreek));
        }
        return None;
    }

    let letters = rest.iter().take_while(|b| b.is_ascii_alphabetic()).count();
    if letters == 0 {
        return None;
    }
    let word = &rest[..letters];
    let upper = word[0].is_ascii_uppercase();
    if word.iter().any(|b| b.is_ascii_uppercase() != upper) {
        return None;
    }

    let roman_style = if upper { ListStyle::UpperRoman } else { ListStyle::LowerRoman };
    if letters == 1 {
        let letter = word[0].to_ascii_lowercase();
        if matches!(letter, b'i' | b'v' | b'x') {
            return Some((1, roman_value(word)?, roman_style));
        }
        let style = if upper { ListStyle::UpperAlpha } else { ListStyle::LowerAlpha };
        return Some((1, u32::from(letter - b'a') + 1, style));
    }
    Some((letters, roman_value(word)?, roman_style))
}

/// Value of a roman numeral, or `None` if `word` is not one.
pub(crate) fn roman_value(word: &[u8]) -> Option<u32> {
    fn digit(b: u8) -> Option<u32> {
        Some(match b.to_ascii_lowercase() {
            b'i' => 1,
            b'v' => 5,
            b'x' => 10,
            b'l' => 50,
            b'c' => 100,
            b'd' => 500,
            b'm' => 1000,
            _ => return None,
        })
    }

    // add every digit; a digit smaller than its successor was added once
    // but counts negative, so take it back twice
    let mut total = 0u32;
    let mut prev = 0u32;
    for &b in word {
        let value = digit(b)?;
        total = total.checked_add(value)?;
        if prev < value {
            total = total.checked_sub(2 * prev)?;
        }
        prev = value;
    }
    Some(total).filter(|&n| n > 0)
}

/// `[^label]:` at the start of `rest`; returns its length.
fn scan_footnote_start(rest: &[u8]) -> Option<usize> {
    if !rest.starts_with(b"[^") {
        return None;
    }
    let close = memchr::memchr(b']', &rest[2..])? + 2;
    let label = &rest[2..close];
    if label.is_empty()
        || label.len() > MAX_LINK_LABEL_LEN
        || label.iter().any(|&b| b.is_ascii_whitespace() || b == b'[')
    {
        return None;
    }
    (rest.get(close + 1) == Some(&b':')).then_some(close + 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn kinds(line: &str, options: &Options) -> Vec<TokenKind> {
        let mut out = Vec::new();
        tokenize_line(line, 0, line.len(), line.len(), options, &mut out);
        out.iter().map(|t| t.kind).collect()
    }

    fn tokens(line: &str) -> Vec<Token> {
        let mut out = Vec::new();
        tokenize_line(line, 0, line.len(), line.len(), &Options::default(), &mut out);
        out
    }

    use TokenKind::*;

    #[rstest]
    #[case("foo", vec![TextLine])]
    #[case("> > foo", vec![QuoteStart, Indent, QuoteStart, Indent, TextLine])]
    #[case("- foo", vec![UnorderedListMarker, Indent, TextLine])]
    #[case("* * *", vec![ThematicBreak])]
    #[case("---", vec![DashLine])]
    #[case("- ", vec![DashLine])]
    #[case("-- foo", vec![TextLine])]
    #[case("===", vec![SetextUnderline])]
    #[case("1. foo", vec![OrderedListMarker, Indent, TextLine])]
    #[case("1.foo", vec![TextLine])]
    #[case("- [x] done", vec![UnorderedListMarker, Indent, TaskListItemMarker, Indent, TextLine])]
    #[case("[ ] not a task", vec![TextLine])]
    #[case("```rust", vec![CodeFenceStart])]
    #[case("~~~", vec![CodeFence])]
    #[case("``` a`b", vec![TextLine])]
    #[case("## Title", vec![AtxHeading])]
    #[case("#hashtag", vec![TextLine])]
    #[case("####### seven", vec![TextLine])]
    #[case("<div>", vec![HtmlStart])]
    #[case("| --- | :-: |", vec![TableDelimiterRow])]
    #[case("--- | ---", vec![TableDelimiterRow])]
    #[case("[^note]: text", vec![FootnoteStart, Indent, TextLine])]
    #[case(":::warning", vec![CustomContainerFenceStart])]
    #[case("    code", vec![Indent, TextLine])]
    #[case("$$", vec![TextLine])]
    fn test_classification(#[case] line: &str, #[case] expected: Vec<TokenKind>) {
        assert_eq!(kinds(line, &Options::default()), expected);
    }

    #[test]
    fn test_feature_gates() {
        let math = Options::default().with_math(true);
        assert_eq!(kinds("$$", &math), vec![MathFence]);
        assert_eq!(kinds("$$ tex", &math), vec![MathFenceStart]);

        let no_tables = Options::default().with_table(false);
        assert_eq!(kinds("| --- |", &no_tables), vec![TextLine]);

        let extended = Options::default().with_extra_list_style_type(true);
        assert_eq!(kinds("a. item", &Options::default()), vec![TextLine]);
        assert_eq!(kinds("a. item", &extended), vec![OrderedListMarker, Indent, TextLine]);
    }

    #[test]
    fn test_newline_token() {
        let input = "foo\r\nbar";
        let mut out = Vec::new();
        tokenize_line(input, 0, 3, 5, &Options::default(), &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].kind, NewLine);
        assert_eq!(out[1].span, Span::new(3, 5));
    }

    #[test]
    fn test_columns_and_markers() {
        let toks = tokens(" \t12) x");
        assert_eq!(toks[0].kind, Indent);
        assert_eq!((toks[0].start_column, toks[0].end_column), (0, 4));
        assert_eq!(toks[1].kind, OrderedListMarker);
        assert_eq!((toks[1].count, toks[1].marker), (12, b')'));
        assert_eq!(toks[1].span, Span::new(2, 5));

        let toks = tokens("#### Title");
        assert_eq!(toks[0].count, 4);

        let toks = tokens("````` js");
        assert_eq!((toks[0].marker, toks[0].count), (b'`', 5));
    }

    #[rstest]
    #[case("i.", 1, ListStyle::LowerRoman)]
    #[case("IV)", 4, ListStyle::UpperRoman)]
    #[case("xii.", 12, ListStyle::LowerRoman)]
    #[case("ix.", 9, ListStyle::LowerRoman)]
    #[case("XL)", 40, ListStyle::UpperRoman)]
    #[case("xiv.", 14, ListStyle::LowerRoman)]
    #[case("c.", 3, ListStyle::LowerAlpha)]
    #[case("B)", 2, ListStyle::UpperAlpha)]
    #[case("γ.", 3, ListStyle::LowerGreek)]
    fn test_extended_markers(#[case] marker: &str, #[case] number: u32, #[case] style: ListStyle) {
        let parsed = scan_ordered_marker(marker.as_bytes(), true).unwrap();
        assert_eq!(parsed.number, number);
        assert_eq!(parsed.style, style);
        assert_eq!(parsed.len, marker.len());
    }

    #[test]
    fn test_roman_values() {
        assert_eq!(roman_value(b"iv"), Some(4));
        assert_eq!(roman_value(b"IX"), Some(9));
        assert_eq!(roman_value(b"xc"), Some(90));
        assert_eq!(roman_value(b"mcmxcix"), Some(1999));
        assert_eq!(roman_value(b"ix2"), None);
    }

    #[test]
    fn test_rejected_markers() {
        assert_eq!(scan_ordered_marker(b"ab.", true), None);
        assert_eq!(scan_ordered_marker(b"Ab.", true), None);
        assert_eq!(scan_ordered_marker(b"1234567890.", false), None);
        assert_eq!(scan_ordered_marker(b"a.", false), None);
    }
}
