//! Link syntax scanners.
//!
//! Shared by the inline parser (inline links, reference links, autolinks)
//! and by link reference definitions, which reuse the destination, title and
//! label grammar.

use std::ops::Range;

use crate::limits;

/// Destination and optional title of an inline link `(...)` tail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTail {
    /// Raw destination (inside `<...>` if bracketed).
    pub dest: Range<usize>,
    /// Raw title without its delimiters.
    pub title: Option<Range<usize>>,
    /// Position after the closing `)`.
    pub end: usize,
}

/// An autolink found in text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Autolink {
    /// Start of the whole construct (the `<` for bracketed autolinks).
    pub start: usize,
    /// End of the whole construct.
    pub end: usize,
    /// Start of the URL or address.
    pub content_start: usize,
    /// End of the URL or address.
    pub content_end: usize,
    pub is_email: bool,
}

#[inline]
fn skip_spaces(text: &[u8], mut pos: usize) -> usize {
    while pos < text.len() && matches!(text[pos], b' ' | b'\t') {
        pos += 1;
    }
    pos
}

/// Skip spaces, tabs and at most one line ending.
#[inline]
pub(crate) fn skip_spaces_and_newline(text: &[u8], pos: usize) -> usize {
    let pos = skip_spaces(text, pos);
    if text.get(pos) == Some(&b'\n') {
        skip_spaces(text, pos + 1)
    } else {
        pos
    }
}

/// Scan a link label starting at `[`. Returns the inner range and the
/// position after `]`.
pub fn scan_link_label(text: &[u8], start: usize) -> Option<(Range<usize>, usize)> {
    debug_assert_eq!(text.get(start), Some(&b'['));
    let mut pos = start + 1;
    let mut non_blank = false;
    while pos < text.len() {
        match text[pos] {
            b'[' => return None,
            b']' => {
                if !non_blank || pos - start - 1 > limits::MAX_LINK_LABEL_LEN {
                    return None;
                }
                return Some((start + 1..pos, pos + 1));
            }
            b'\\' if pos + 1 < text.len() => {
                non_blank = true;
                pos += 2;
                continue;
            }
            b' ' | b'\t' | b'\n' => {}
            _ => non_blank = true,
        }
        pos += 1;
    }
    None
}

/// Scan a link destination. Returns its raw range (inside angle brackets if
/// present) and the position after it.
pub fn scan_link_destination(text: &[u8], start: usize) -> Option<(Range<usize>, usize)> {
    let mut pos = start;
    if text.get(pos) == Some(&b'<') {
        pos += 1;
        let inner_start = pos;
        while pos < text.len() {
            match text[pos] {
                b'>' => return Some((inner_start..pos, pos + 1)),
                b'<' | b'\n' => return None,
                b'\\' if pos + 1 < text.len() => pos += 2,
                _ => pos += 1,
            }
        }
        return None;
    }

    let mut depth = 0usize;
    while pos < text.len() {
        match text[pos] {
            b'(' => {
                depth += 1;
                if depth > limits::MAX_LINK_PAREN_DEPTH {
                    return None;
                }
            }
            b')' => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            b'\\' if pos + 1 < text.len() && text[pos + 1].is_ascii_punctuation() => {
                pos += 2;
                continue;
            }
            b if b <= b' ' || b == 0x7f => break,
            _ => {}
        }
        pos += 1;
    }
    if pos == start || depth != 0 {
        return None;
    }
    Some((start..pos, pos))
}

/// Scan a link title in `"..."`, `'...'` or `(...)`. Returns the inner range
/// and the position after the closing delimiter.
pub fn scan_link_title(text: &[u8], start: usize) -> Option<(Range<usize>, usize)> {
    let close = match text.get(start)? {
        b'"' => b'"',
        b'\'' => b'\'',
        b'(' => b')',
        _ => return None,
    };
    let mut pos = start + 1;
    let mut line_blank = false;
    while pos < text.len() {
        match text[pos] {
            b if b == close => return Some((start + 1..pos, pos + 1)),
            b'(' if close == b')' => return None,
            b'\\' if pos + 1 < text.len() => {
                line_blank = false;
                pos += 2;
                continue;
            }
            b'\n' => {
                // titles may not contain a blank line
                if line_blank {
                    return None;
                }
                line_blank = true;
            }
            b' ' | b'\t' => {}
            _ => line_blank = false,
        }
        pos += 1;
    }
    None
}

/// Scan the `(...)` tail of an inline link; `start` points at `(`.
pub fn scan_inline_link_tail(text: &[u8], start: usize) -> Option<LinkTail> {
    debug_assert_eq!(text.get(start), Some(&b'('));
    let mut pos = skip_spaces_and_newline(text, start + 1);

    if text.get(pos) == Some(&b')') {
        return Some(LinkTail {
            dest: pos..pos,
            title: None,
            end: pos + 1,
        });
    }

    let (dest, after_dest) = scan_link_destination(text, pos)?;
    pos = skip_spaces_and_newline(text, after_dest);

    let mut title = None;
    if pos > after_dest {
        if let Some((range, after_title)) = scan_link_title(text, pos) {
            title = Some(range);
            pos = skip_spaces_and_newline(text, after_title);
        }
    }

    (text.get(pos) == Some(&b')')).then(|| LinkTail {
        dest,
        title,
        end: pos + 1,
    })
}

/// Scan a `<...>` autolink at `start`.
pub fn scan_autolink(text: &[u8], start: usize) -> Option<Autolink> {
    debug_assert_eq!(text.get(start), Some(&b'<'));
    let content_start = start + 1;
    let mut pos = content_start;
    while pos < text.len() && !matches!(text[pos], b'>' | b'<' | b' ' | b'\t' | b'\n') && text[pos] >= b' ' {
        pos += 1;
    }
    if text.get(pos) != Some(&b'>') {
        return None;
    }
    let content = &text[content_start..pos];
    let is_email = if is_uri(content) {
        false
    } else if is_email(content) {
        true
    } else {
        return None;
    };
    Some(Autolink {
        start,
        end: pos + 1,
        content_start,
        content_end: pos,
        is_email,
    })
}

/// Scheme `[A-Za-z][A-Za-z0-9+.-]{1,31}` followed by `:`.
fn is_uri(content: &[u8]) -> bool {
    let Some(colon) = content.iter().position(|&b| b == b':') else {
        return false;
    };
    let scheme = &content[..colon];
    (2..=32).contains(&scheme.len())
        && scheme[0].is_ascii_alphabetic()
        && scheme
            .iter()
            .all(|&b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'.' | b'-'))
}

fn is_email(content: &[u8]) -> bool {
    let Some(at) = content.iter().position(|&b| b == b'@') else {
        return false;
    };
    let local = &content[..at];
    let domain = &content[at + 1..];
    let local_ok = !local.is_empty()
        && local
            .iter()
            .all(|&b| b.is_ascii_alphanumeric() || b".!#$%&'*+/=?^_`{|}~-".contains(&b));
    let labels_ok = !domain.is_empty()
        && domain.split(|&b| b == b'.').all(|label| {
            (1..=63).contains(&label.len())
                && label[0].is_ascii_alphanumeric()
                && label[label.len() - 1].is_ascii_alphanumeric()
                && label.iter().all(|&b| b.is_ascii_alphanumeric() || b == b'-')
        });
    local_ok && labels_ok
}

/// Scan a bare `http://`, `https://`, `ftp://`, `mailto:` or `www.` link at
/// `start`. The caller checks that `start` is at a word boundary.
pub fn scan_extended_autolink(text: &[u8], start: usize) -> Option<Autolink> {
    let rest = &text[start..];
    let prefix_len = ["https://", "http://", "ftp://", "mailto:", "www."]
        .iter()
        .find(|p| rest.len() > p.len() && rest[..p.len()].eq_ignore_ascii_case(p.as_bytes()))?
        .len();

    let mut end = start + prefix_len;
    while end < text.len() && !text[end].is_ascii_whitespace() && text[end] != b'<' {
        end += 1;
    }
    end = trim_autolink_end(text, start + prefix_len, end);

    // the domain needs at least one character after the prefix
    let domain_end = text[start + prefix_len..end]
        .iter()
        .position(|&b| matches!(b, b'/' | b'?' | b'#'))
        .map_or(end, |p| start + prefix_len + p);
    let domain = &text[start + prefix_len..domain_end];
    if domain.is_empty() || domain.ends_with(b"_") {
        return None;
    }
    if !domain.iter().any(|b| b.is_ascii_alphanumeric()) {
        return None;
    }

    Some(Autolink {
        start,
        end,
        content_start: start,
        content_end: end,
        is_email: rest[..prefix_len].eq_ignore_ascii_case(b"mailto:"),
    })
}

/// Drop trailing punctuation and unbalanced closing parentheses.
fn trim_autolink_end(text: &[u8], min: usize, mut end: usize) -> usize {
    loop {
        if end <= min {
            return end;
        }
        match text[end - 1] {
            b'?' | b'!' | b'.' | b',' | b':' | b'*' | b'_' | b'~' | b'\'' | b'"' => end -= 1,
            b')' => {
                let slice = &text[min..end];
                let opens = slice.iter().filter(|&&b| b == b'(').count();
                let closes = slice.iter().filter(|&&b| b == b')').count();
                if closes > opens {
                    end -= 1;
                } else {
                    return end;
                }
            }
            b';' => {
                // a trailing entity-like `&name;` is excluded
                let amp = text[min..end - 1].iter().rposition(|&b| b == b'&');
                match amp {
                    Some(a) if text[min + a + 1..end - 1].iter().all(u8::is_ascii_alphanumeric) => end = min + a,
                    _ => return end,
                }
            }
            _ => return end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_tail_simple() {
        let text = b"(https://example.com) rest";
        let tail = scan_inline_link_tail(text, 0).unwrap();
        assert_eq!(&text[tail.dest.clone()], b"https://example.com");
        assert_eq!(tail.title, None);
        assert_eq!(tail.end, 21);
    }

    #[test]
    fn test_inline_tail_with_title() {
        let text = b"(/url \"the title\")";
        let tail = scan_inline_link_tail(text, 0).unwrap();
        assert_eq!(&text[tail.dest.clone()], b"/url");
        assert_eq!(&text[tail.title.unwrap()], b"the title");
    }

    #[test]
    fn test_inline_tail_title_needs_whitespace() {
        let text = b"(/url\"title\")";
        let tail = scan_inline_link_tail(text, 0).unwrap();
        assert_eq!(&text[tail.dest], b"/url\"title\"");
        assert_eq!(tail.title, None);
    }

    #[test]
    fn test_inline_tail_empty_and_angle() {
        assert_eq!(scan_inline_link_tail(b"()", 0).unwrap().dest, 1..1);
        let text = b"(<my url>)";
        let tail = scan_inline_link_tail(text, 0).unwrap();
        assert_eq!(&text[tail.dest], b"my url");
    }

    #[test]
    fn test_destination_parens() {
        let text = b"foo(and(bar))";
        assert_eq!(scan_link_destination(text, 0), Some((0..13, 13)));
        assert_eq!(scan_link_destination(b"foo(bar", 0), None);
    }

    #[test]
    fn test_label() {
        assert_eq!(scan_link_label(b"[foo] x", 0), Some((1..4, 5)));
        assert_eq!(scan_link_label(b"[ ]", 0), None);
        assert_eq!(scan_link_label(b"[a[b]", 0), None);
        assert_eq!(scan_link_label(br"[a\]b]", 0), Some((1..5, 6)));
    }

    #[test]
    fn test_title_rejects_blank_line() {
        assert!(scan_link_title(b"\"a\n\nb\"", 0).is_none());
        assert!(scan_link_title(b"\"a\nb\"", 0).is_some());
    }

    #[test]
    fn test_autolinks() {
        let uri = scan_autolink(b"<https://example.com>", 0).unwrap();
        assert!(!uri.is_email);
        assert_eq!(uri.end, 21);

        let email = scan_autolink(b"<test@example.com>", 0).unwrap();
        assert!(email.is_email);

        assert!(scan_autolink(b"<not valid>", 0).is_none());
        assert!(scan_autolink(b"<m:abc>", 0).is_none());
    }

    #[test]
    fn test_extended_autolink() {
        let text = b"www.commonmark.org/help.";
        let link = scan_extended_autolink(text, 0).unwrap();
        assert_eq!(&text[link.start..link.end], b"www.commonmark.org/help");

        let text = b"https://en.wikipedia.org/wiki/Rust_(language))";
        let link = scan_extended_autolink(text, 0).unwrap();
        assert_eq!(&text[link.start..link.end], b"https://en.wikipedia.org/wiki/Rust_(language)");

        assert!(scan_extended_autolink(b"www.", 0).is_none());
    }
}
