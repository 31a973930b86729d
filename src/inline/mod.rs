//! Inline parser for Markdown.
//!
//! The inline content of a block is the text of its lines joined by `\n`.
//! One left-to-right scan builds most nodes on the spot (code spans, math,
//! autolinks, raw HTML, entities, escapes, line breaks). Delimiter runs and
//! brackets are kept on stacks: a `]` resolves the bracket below it, and the
//! emphasis pass runs inside each link and once more at the end.

mod code_span;
mod emphasis;
pub mod html;
pub mod links;
mod marks;
mod math;
mod pieces;

use smallvec::SmallVec;

use crate::ast::{Inline, InlineKind, LinkReference, LinkTarget};
use crate::escape::{is_escapable, match_entity, unescape};
use crate::footnote::{normalize_footnote_label, FootnoteStore};
use crate::limits::{MAX_DELIMITER_STACK, MAX_INLINE_NESTING, MAX_LINK_LABEL_LEN};
use crate::link_ref::{normalize_label_into, DefinitionSource, LinkRefStore};
use crate::scratch::Scratch;
use crate::{Options, Span};

use code_span::scan_code_span;
use emphasis::process_emphasis;
use links::{scan_autolink, scan_extended_autolink, scan_inline_link_tail, scan_link_label};
use marks::{flanking, next_special, Delimiter};
use math::scan_math_span;
use pieces::Pieces;

/// What inline parsing resolves against.
#[derive(Clone, Copy)]
pub struct InlineContext<'r> {
    pub link_definitions: &'r LinkRefStore,
    pub footnotes: &'r FootnoteStore,
    pub options: &'r Options,
    pub scratch: &'r Scratch,
}

/// Text of a block's lines joined by `\n`, with a map back to the source.
#[derive(Debug)]
struct SourceText {
    text: String,
    /// `(text offset, source offset)` where each line starts.
    segments: SmallVec<[(usize, u32); 4]>,
}

impl SourceText {
    fn new(input: &str, lines: &[Span]) -> Self {
        let mut text = String::new();
        let mut segments = SmallVec::new();
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                text.push('\n');
            }
            segments.push((text.len(), line.start));
            text.push_str(line.slice(input));
        }
        Self { text, segments }
    }

    /// Source offset of a text offset. A joining `\n` maps to the end of
    /// the line before it.
    fn source(&self, pos: usize) -> u32 {
        let idx = self.segments.partition_point(|&(start, _)| start <= pos).saturating_sub(1);
        let (start, source) = self.segments[idx];
        source + (pos - start) as u32
    }

    fn span(&self, start: usize, end: usize) -> Span {
        Span::new(self.source(start), self.source(end))
    }
}

/// An open `[` or `![`.
#[derive(Debug, Clone, Copy)]
struct Bracket {
    piece: usize,
    /// Delimiters above this index belong to the bracket's content.
    delim_bottom: usize,
    image: bool,
    /// Cleared inside a link, where links cannot nest.
    active: bool,
    /// Text offset of `[` (or `!`).
    start: usize,
    /// Text offset after `[`.
    content_start: usize,
    /// Another `[` followed, so the content cannot be a label.
    bracket_after: bool,
}

/// Inline parser state.
///
/// The stacks are reused across blocks.
pub struct InlineParser<'r> {
    ctx: InlineContext<'r>,
    delims: Vec<Delimiter>,
    brackets: Vec<Bracket>,
}

impl<'r> InlineParser<'r> {
    /// Create a new inline parser.
    pub fn new(ctx: InlineContext<'r>) -> Self {
        Self {
            ctx,
            delims: Vec::new(),
            brackets: Vec::new(),
        }
    }

    /// Parse the inline content made of `lines` (spans into `input`).
    pub fn parse(&mut self, input: &str, lines: &[Span]) -> Vec<Inline> {
        if lines.is_empty() {
            return Vec::new();
        }
        self.delims.clear();
        self.brackets.clear();
        let source = SourceText::new(input, lines);
        let mut scan = Scan {
            ctx: self.ctx,
            source: &source,
            text: &source.text,
            pieces: Pieces::new(),
            delims: &mut self.delims,
            brackets: &mut self.brackets,
            pos: 0,
            text_start: 0,
        };
        scan.run();
        scan.finish()
    }
}

/// One pass over one block's text.
struct Scan<'s, 'r> {
    ctx: InlineContext<'r>,
    source: &'s SourceText,
    text: &'s str,
    pieces: Pieces,
    delims: &'s mut Vec<Delimiter>,
    brackets: &'s mut Vec<Bracket>,
    pos: usize,
    /// Start of plain text not yet turned into a node.
    text_start: usize,
}

impl Scan<'_, '_> {
    fn run(&mut self) {
        let bytes = self.text.as_bytes();
        let autolinks = self.ctx.options.use_autolinks;
        while self.pos < bytes.len() {
            self.pos = next_special(bytes, self.pos, autolinks);
            let Some(&b) = bytes.get(self.pos) else {
                break;
            };
            let advanced = match b {
                b'\n' => self.line_break(),
                b'\\' => self.escape(),
                b'`' => self.code_span(),
                b'$' => self.ctx.options.use_math && self.math(),
                b'*' | b'_' | b'~' => self.delimiter_run(b),
                b'[' => self.footnote_reference() || self.open_bracket(false),
                b'!' => bytes.get(self.pos + 1) == Some(&b'[') && self.open_bracket(true),
                b']' => self.close_bracket(),
                b'<' => self.autolink_or_html(),
                b'&' => self.entity(),
                _ => autolinks && self.extended_autolink(),
            };
            if !advanced {
                self.pos += 1;
            }
        }
    }

    fn finish(mut self) -> Vec<Inline> {
        self.flush_text(self.text.len());
        process_emphasis(&mut self.pieces, self.delims, 0);
        self.pieces.into_vec()
    }

    /// Turn pending plain text up to `end` into a text node.
    fn flush_text(&mut self, end: usize) {
        if self.text_start < end {
            let text = self.text[self.text_start..end].to_owned();
            let span = self.source.span(self.text_start, end);
            self.pieces.push(Inline::new(InlineKind::Text(text), span));
        }
        self.text_start = self.text_start.max(end);
    }

    /// Push a node covering `start..end` and continue after it.
    fn emit(&mut self, kind: InlineKind, start: usize, end: usize) -> usize {
        self.flush_text(start);
        let piece = self.pieces.push(Inline::new(kind, self.source.span(start, end)));
        self.pos = end;
        self.text_start = end;
        piece
    }

    fn line_break(&mut self) -> bool {
        let bytes = self.text.as_bytes();
        let mut spaces = self.pos;
        while spaces > self.text_start && bytes[spaces - 1] == b' ' {
            spaces -= 1;
        }
        let mut blank = self.pos;
        while blank > self.text_start && matches!(bytes[blank - 1], b' ' | b'\t') {
            blank -= 1;
        }
        if self.pos - spaces >= 2 {
            self.flush_text(spaces);
            self.emit(InlineKind::HardBreak, spaces, self.pos + 1);
        } else {
            self.flush_text(blank);
            self.emit(InlineKind::SoftBreak, blank, self.pos + 1);
        }
        true
    }

    fn escape(&mut self) -> bool {
        let start = self.pos;
        match self.text.as_bytes().get(start + 1) {
            Some(b'\n') => {
                self.emit(InlineKind::HardBreak, start, start + 2);
                true
            }
            Some(&next) if is_escapable(next) => {
                self.emit(InlineKind::Text((next as char).to_string()), start, start + 2);
                true
            }
            _ => false,
        }
    }

    fn code_span(&mut self) -> bool {
        let start = self.pos;
        match scan_code_span(self.text, start) {
            Some(code) => {
                self.emit(InlineKind::Code(code.content), start, code.end);
            }
            None => {
                // the whole run is literal
                self.pos += crate::text::run_length(&self.text.as_bytes()[start..], b'`');
            }
        }
        true
    }

    fn math(&mut self) -> bool {
        let start = self.pos;
        match scan_math_span(self.text.as_bytes(), start) {
            Some(math) => {
                let literal = self.text[math.content_start..math.content_end].to_owned();
                self.emit(
                    InlineKind::Math {
                        literal,
                        display: math.display,
                    },
                    start,
                    math.end,
                );
            }
            None => self.pos += crate::text::run_length(&self.text.as_bytes()[start..], b'$'),
        }
        true
    }

    fn delimiter_run(&mut self, ch: u8) -> bool {
        let start = self.pos;
        let len = crate::text::run_length(&self.text.as_bytes()[start..], ch);
        let end = start + len;
        if ch == b'~' && len > 2 {
            self.pos = end;
            return true;
        }
        let (can_open, can_close) = flanking(self.text, start, end, ch);
        let piece = self.emit(InlineKind::Text(self.text[start..end].to_owned()), start, end);
        if (can_open || can_close) && self.delims.len() < MAX_DELIMITER_STACK {
            self.delims.push(Delimiter {
                ch,
                piece,
                len,
                orig_len: len,
                can_open,
                can_close,
                removed: false,
            });
        }
        true
    }

    /// `[^label]` naming a defined footnote.
    fn footnote_reference(&mut self) -> bool {
        let bytes = self.text.as_bytes();
        if bytes.get(self.pos + 1) != Some(&b'^') {
            return false;
        }
        let Some((inner, end)) = scan_link_label(bytes, self.pos) else {
            return false;
        };
        let label = &self.text[inner.start + 1..inner.end];
        let known = normalize_footnote_label(label).is_some_and(|key| self.ctx.footnotes.contains(&key));
        if !known {
            return false;
        }
        let kind = InlineKind::FootnoteReference {
            label: label.to_owned(),
            order: 0,
        };
        self.emit(kind, self.pos, end);
        true
    }

    fn open_bracket(&mut self, image: bool) -> bool {
        if self.brackets.len() >= MAX_INLINE_NESTING {
            return false;
        }
        let start = self.pos;
        let content_start = start + if image { 2 } else { 1 };
        let piece = self.emit(
            InlineKind::Text(self.text[start..content_start].to_owned()),
            start,
            content_start,
        );
        if let Some(last) = self.brackets.last_mut() {
            last.bracket_after = true;
        }
        self.brackets.push(Bracket {
            piece,
            delim_bottom: self.delims.len(),
            image,
            active: true,
            start,
            content_start,
            bracket_after: false,
        });
        true
    }

    fn close_bracket(&mut self) -> bool {
        let Some(&bracket) = self.brackets.last() else {
            return false;
        };
        if !bracket.active {
            self.brackets.pop();
            return false;
        }
        let Some((target, end)) = self.link_target(&bracket) else {
            self.brackets.pop();
            return false;
        };

        self.flush_text(self.pos);
        process_emphasis(&mut self.pieces, self.delims, bracket.delim_bottom);
        let mut node = Inline::new(
            if bracket.image {
                InlineKind::Image(target)
            } else {
                InlineKind::Link(target)
            },
            self.source.span(bracket.start, end),
        );
        let depth = self.pieces.depth_between(bracket.piece, None) + 1;
        node.children = self.pieces.take_between(bracket.piece, None);
        self.pieces.remove(bracket.piece);
        self.pieces.push_nested(node, depth);
        self.pos = end;
        self.text_start = end;

        self.brackets.pop();
        if !bracket.image {
            // no links inside links
            for earlier in self.brackets.iter_mut().filter(|b| !b.image) {
                earlier.active = false;
            }
        }
        true
    }

    /// Destination for the bracket closed at `self.pos`, and the end of the
    /// whole construct.
    fn link_target(&self, bracket: &Bracket) -> Option<(LinkTarget, usize)> {
        let text = self.text;
        let bytes = text.as_bytes();
        let after = self.pos + 1;

        if bytes.get(after) == Some(&b'(') {
            if let Some(tail) = scan_inline_link_tail(bytes, after) {
                let target = LinkTarget {
                    url: unescape(&text[tail.dest]).into_owned(),
                    title: tail.title.map(|range| unescape(&text[range]).into_owned()),
                    reference: LinkReference::Inline,
                };
                return Some((target, tail.end));
            }
        }

        let content = &text[bracket.content_start..self.pos];
        let (label, end, reference) = if bytes[after..].starts_with(b"[]") {
            (content, after + 2, LinkReference::Collapsed)
        } else if let Some((range, label_end)) =
            (bytes.get(after) == Some(&b'[')).then(|| scan_link_label(bytes, after)).flatten()
        {
            let label = &text[range];
            (label, label_end, LinkReference::Full(label.to_owned()))
        } else {
            (content, after, LinkReference::Shortcut)
        };
        let uses_content = !matches!(reference, LinkReference::Full(_));
        if uses_content && (bracket.bracket_after || content.len() > MAX_LINK_LABEL_LEN) {
            return None;
        }

        let mut key = self.ctx.scratch.string();
        normalize_label_into(&mut key, label);
        let definition = self.ctx.link_definitions.get(&key)?;
        let from_heading = self.ctx.link_definitions.source(&key) == Some(DefinitionSource::HeadingReference);
        let reference = if uses_content && from_heading {
            LinkReference::Heading
        } else {
            reference
        };
        let target = LinkTarget {
            url: definition.url.clone(),
            title: definition.title.clone(),
            reference,
        };
        Some((target, end))
    }

    fn autolink_or_html(&mut self) -> bool {
        let start = self.pos;
        let bytes = self.text.as_bytes();
        if let Some(link) = scan_autolink(bytes, start) {
            let kind = InlineKind::Autolink {
                url: self.text[link.content_start..link.content_end].to_owned(),
                is_email: link.is_email,
            };
            self.emit(kind, link.start, link.end);
            return true;
        }
        if let Some(end) = html::scan_html(bytes, start) {
            self.emit(InlineKind::Html(self.text[start..end].to_owned()), start, end);
            return true;
        }
        false
    }

    fn entity(&mut self) -> bool {
        let start = self.pos;
        let Some((len, decoded)) = match_entity(self.text, start) else {
            return false;
        };
        self.emit(InlineKind::Text(decoded.into_owned()), start, start + len);
        true
    }

    /// Bare `www.`, `http://` and similar links at a word boundary.
    fn extended_autolink(&mut self) -> bool {
        let start = self.pos;
        let bytes = self.text.as_bytes();
        let boundary = start == 0 || matches!(bytes[start - 1], b' ' | b'\t' | b'\n' | b'*' | b'_' | b'~' | b'(');
        if !boundary {
            return false;
        }
        let Some(link) = scan_extended_autolink(bytes, start) else {
            return false;
        };
        let written = &self.text[link.content_start..link.content_end];
        let url = if written.get(..4).is_some_and(|p| p.eq_ignore_ascii_case("www.")) {
            format!("http://{written}")
        } else {
            written.to_owned()
        };
        self.emit(
            InlineKind::Autolink {
                url,
                is_email: link.is_email,
            },
            link.start,
            link.end,
        );
        true
    }
}

/// Parse `lines` of `input` in one call.
pub fn parse_inlines(input: &str, lines: &[Span], ctx: InlineContext<'_>) -> Vec<Inline> {
    InlineParser::new(ctx).parse(input, lines)
}
