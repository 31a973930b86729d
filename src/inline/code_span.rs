//! Code spans.
//!
//! A backtick run opens a code span that the next run of exactly the same
//! length closes. Content is not parsed for inline markup.

use memchr::memchr;

use crate::limits::MAX_CODE_SPAN_BACKTICKS;
use crate::text::run_length;

/// A matched code span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSpan {
    /// Position after the closing run.
    pub end: usize,
    /// Content with line endings turned into spaces and one surrounding
    /// space stripped.
    pub content: String,
}

/// Match a code span whose opening run starts at `start`.
pub fn scan_code_span(text: &str, start: usize) -> Option<CodeSpan> {
    let bytes = text.as_bytes();
    let run = run_length(&bytes[start..], b'`');
    if run > MAX_CODE_SPAN_BACKTICKS {
        return None;
    }
    let content_start = start + run;
    let mut pos = content_start;
    while let Some(offset) = memchr(b'`', &bytes[pos..]) {
        let closer = pos + offset;
        let closer_len = run_length(&bytes[closer..], b'`');
        if closer_len == run {
            return Some(CodeSpan {
                end: closer + run,
                content: normalize(&text[content_start..closer]),
            });
        }
        pos = closer + closer_len;
    }
    None
}

fn normalize(raw: &str) -> String {
    let mut content = raw.replace('\n', " ");
    let bytes = content.as_bytes();
    if bytes.len() >= 2 && bytes[0] == b' ' && bytes[bytes.len() - 1] == b' ' && bytes.iter().any(|&b| b != b' ') {
        content.pop();
        content.remove(0);
    }
    content
}
