//! Math spans: `$...$` inline and `$$...$$` display.
//!
//! Inline math may not start or end with whitespace, and a closing `$`
//! followed by a digit does not count, so prices like `$5 and $6` stay text.

use memchr::memchr;

/// A matched math span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MathSpan {
    /// Position after the closing delimiter.
    pub end: usize,
    pub content_start: usize,
    pub content_end: usize,
    /// `$$` rather than `$`.
    pub display: bool,
}

/// Match a math span whose opening `$` is at `start`.
pub fn scan_math_span(text: &[u8], start: usize) -> Option<MathSpan> {
    let run = text[start..].iter().take_while(|&&b| b == b'$').count();
    match run {
        1 => scan_inline(text, start),
        2 => scan_display(text, start),
        _ => None,
    }
}

fn scan_inline(text: &[u8], start: usize) -> Option<MathSpan> {
    let content_start = start + 1;
    if text.get(content_start).is_none_or(|b| b.is_ascii_whitespace()) {
        return None;
    }
    let mut pos = content_start;
    while let Some(offset) = memchr(b'$', &text[pos..]) {
        let closer = pos + offset;
        if text[closer - 1] == b'\\' {
            pos = closer + 1;
            continue;
        }
        let valid = closer > content_start
            && !text[closer - 1].is_ascii_whitespace()
            && text.get(closer + 1).is_none_or(|b| !b.is_ascii_digit() && *b != b'$');
        if valid {
            return Some(MathSpan {
                end: closer + 1,
                content_start,
                content_end: closer,
                display: false,
            });
        }
        pos = closer + text[closer..].iter().take_while(|&&b| b == b'$').count();
    }
    None
}

fn scan_display(text: &[u8], start: usize) -> Option<MathSpan> {
    let content_start = start + 2;
    let closer = memchr::memmem::find(&text[content_start..], b"$$")? + content_start;
    if closer == content_start {
        return None;
    }
    Some(MathSpan {
        end: closer + 2,
        content_start,
        content_end: closer,
        display: true,
    })
}
