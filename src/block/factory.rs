//! Block-start registry.
//!
//! Each token kind that can begin a block maps to the builders to try, in
//! priority order. A builder returns `true` after opening its block.

use super::line::BlockLine;
use super::parser::BlockParser;
use super::token::TokenKind;
use super::{code, container, footnote, heading, html, list, math, quote, table, thematic_break};

/// Tries to open a block at the line cursor.
pub(crate) type BlockStart = fn(&mut BlockParser<'_>, &mut BlockLine<'_>) -> bool;

static QUOTE: &[BlockStart] = &[quote::start];
static LIST: &[BlockStart] = &[list::start];
// `---` under a paragraph is an underline, otherwise a break; `-` alone is
// an empty item
static DASH_LINE: &[BlockStart] = &[heading::start_setext, thematic_break::start, list::start];
static SETEXT: &[BlockStart] = &[heading::start_setext];
static THEMATIC_BREAK: &[BlockStart] = &[thematic_break::start];
static CODE_FENCE: &[BlockStart] = &[code::start_fenced];
static MATH_FENCE: &[BlockStart] = &[math::start];
static HTML: &[BlockStart] = &[html::start];
static ATX_HEADING: &[BlockStart] = &[heading::start_atx];
static TABLE: &[BlockStart] = &[table::start];
static FOOTNOTE: &[BlockStart] = &[footnote::start];
static CUSTOM_CONTAINER: &[BlockStart] = &[container::start];

/// Builders registered for `kind`.
pub(crate) fn starts_for(kind: TokenKind) -> &'static [BlockStart] {
    match kind {
        TokenKind::QuoteStart => QUOTE,
        TokenKind::UnorderedListMarker | TokenKind::OrderedListMarker => LIST,
        TokenKind::DashLine => DASH_LINE,
        TokenKind::SetextUnderline => SETEXT,
        TokenKind::ThematicBreak => THEMATIC_BREAK,
        TokenKind::CodeFence | TokenKind::CodeFenceStart => CODE_FENCE,
        TokenKind::MathFence | TokenKind::MathFenceStart => MATH_FENCE,
        TokenKind::HtmlStart => HTML,
        TokenKind::AtxHeading => ATX_HEADING,
        TokenKind::TableDelimiterRow => TABLE,
        TokenKind::FootnoteStart => FOOTNOTE,
        TokenKind::CustomContainerFence | TokenKind::CustomContainerFenceStart => CUSTOM_CONTAINER,
        _ => &[],
    }
}

/// Try every builder registered for `kind` until one opens a block.
pub(crate) fn try_start(parser: &mut BlockParser<'_>, line: &mut BlockLine<'_>, kind: TokenKind) -> bool {
    starts_for(kind).iter().any(|start| start(parser, line))
}
