//! Fenced and indented code blocks.

use crate::ast::{Block, BlockKind, CodeBlock, Fence};
use crate::attributes::{split_trailing, Attributes};
use crate::escape::unescape;
use crate::text::{is_blank, trim_spaces};
use crate::Span;

use super::line::BlockLine;
use super::parser::BlockParser;
use super::processor::{BlockBuilder, CloseContext, Continuation, Processor, ProcessorKind};
use super::token::TokenKind;

#[derive(Debug)]
pub struct FencedCodeBuilder {
    marker: u8,
    length: usize,
    /// Columns of indentation before the opening fence, removed from
    /// every content line.
    indent: u32,
    info: Option<String>,
    attributes: Option<Attributes>,
    literal: String,
    start: u32,
    end: u32,
}

/// Info string after a fence: unescaped, with an optional trailing
/// attribute block split off.
pub(crate) fn fence_info(
    raw: &str,
    use_attributes: bool,
    prefix: &str,
) -> (Option<String>, Option<Attributes>) {
    let mut info = trim_spaces(raw);
    let mut attributes = None;
    if use_attributes {
        if let Some((before, attrs)) = split_trailing(info, prefix) {
            info = before;
            attributes = Some(attrs).filter(|a| !a.is_empty());
        }
    }
    let info = (!info.is_empty()).then(|| unescape(info).into_owned());
    (info, attributes)
}

pub(crate) fn start_fenced(parser: &mut BlockParser<'_>, line: &mut BlockLine<'_>) -> bool {
    let Some(token) = line.peek() else {
        return false;
    };
    if !matches!(token.kind, TokenKind::CodeFenceStart | TokenKind::CodeFence) {
        return false;
    }
    let indent = line.skip_all_indent();
    let input = line.input();
    let run_end = token.span.start_usize() + token.count as usize;
    let options = parser.options();
    let (info, attributes) = fence_info(
        &input[run_end..token.span.end_usize()],
        options.use_code_attributes,
        &options.attributes_prefix,
    );
    let code = FencedCodeBuilder {
        marker: token.marker,
        length: token.count as usize,
        indent,
        info,
        attributes,
        literal: String::new(),
        start: token.span.start,
        end: line.next,
    };
    line.consume_all();
    parser.open(Processor::FencedCode(code));
    true
}

impl BlockBuilder for FencedCodeBuilder {
    fn kind(&self) -> ProcessorKind {
        ProcessorKind::FencedCode
    }

    fn try_continue(&mut self, line: &mut BlockLine<'_>) -> Continuation {
        let closes = line.indent_width() < 4
            && line.peek().is_some_and(|t| {
                t.kind == TokenKind::CodeFence && t.marker == self.marker && t.count as usize >= self.length
            });
        if closes {
            line.consume_all();
            self.end = line.next;
            return Continuation::Closed;
        }
        line.skip_indent(self.indent);
        Continuation::Continue
    }

    fn add_line(&mut self, line: &mut BlockLine<'_>) {
        self.literal.push_str(&line.remainder());
        self.literal.push('\n');
        self.end = line.next;
        line.consume_all();
    }

    fn close(self, _end: u32, _ctx: &mut CloseContext<'_, '_>) -> Option<Block> {
        let code = CodeBlock {
            fence: Some(Fence {
                marker: self.marker,
                length: self.length,
                info: self.info,
            }),
            literal: self.literal,
        };
        let mut block = Block::new(BlockKind::CodeBlock(code), Span::new(self.start, self.end));
        block.attributes = self.attributes;
        Some(block)
    }
}

#[derive(Debug)]
pub struct IndentedCodeBuilder {
    literal: String,
    /// Blank lines not yet known to be inside the block.
    trailing_blanks: String,
    start: u32,
    end: u32,
}

/// Indented code, opened by the driver for a line indented four or more
/// columns that cannot continue a paragraph.
pub(crate) fn start_indented(parser: &mut BlockParser<'_>, line: &mut BlockLine<'_>) {
    let start = line.offset();
    line.skip_indent(4);
    let mut code = IndentedCodeBuilder {
        literal: String::new(),
        trailing_blanks: String::new(),
        start,
        end: line.next,
    };
    code.add_line(line);
    parser.open(Processor::IndentedCode(code));
}

impl BlockBuilder for IndentedCodeBuilder {
    fn kind(&self) -> ProcessorKind {
        ProcessorKind::IndentedCode
    }

    fn try_continue(&mut self, line: &mut BlockLine<'_>) -> Continuation {
        if line.indent_width() >= 4 {
            line.skip_indent(4);
            Continuation::Continue
        } else if line.is_blank() {
            line.skip_indent(4);
            Continuation::Continue
        } else {
            Continuation::None
        }
    }

    fn add_line(&mut self, line: &mut BlockLine<'_>) {
        let text = line.remainder();
        if is_blank(&text) {
            self.trailing_blanks.push_str(&text);
            self.trailing_blanks.push('\n');
        } else {
            self.literal.push_str(&self.trailing_blanks);
            self.trailing_blanks.clear();
            self.literal.push_str(&text);
            self.literal.push('\n');
            self.end = line.next;
        }
        line.consume_all();
    }

    fn close(self, _end: u32, _ctx: &mut CloseContext<'_, '_>) -> Option<Block> {
        let code = CodeBlock {
            fence: None,
            literal: self.literal,
        };
        Some(Block::new(BlockKind::CodeBlock(code), Span::new(self.start, self.end)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fence_info() {
        assert_eq!(fence_info("  rust  ", false, ""), (Some("rust".into()), None));
        assert_eq!(fence_info("", false, ""), (None, None));
        assert_eq!(fence_info(r"a\*b", false, ""), (Some("a*b".into()), None));
    }

    #[test]
    fn test_fence_attributes() {
        let (info, attrs) = fence_info("rust {.numbered start=3}", true, "data-");
        assert_eq!(info.as_deref(), Some("rust"));
        let attrs = attrs.unwrap();
        assert_eq!(attrs.classes, vec!["numbered"]);
        assert_eq!(attrs.get("data-start"), Some("3"));

        // disabled: the block stays in the info string
        let (info, attrs) = fence_info("rust {.numbered}", false, "");
        assert_eq!(info.as_deref(), Some("rust {.numbered}"));
        assert!(attrs.is_none());
    }
}
