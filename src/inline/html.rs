//! Raw HTML recognition, shared by inline HTML spans and HTML blocks.

use memchr::memmem;

/// Tag names that start an HTML block of kind 6.
static BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "base", "basefont", "blockquote", "body", "caption", "center",
    "col", "colgroup", "dd", "details", "dialog", "dir", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "frame", "frameset", "h1", "h2", "h3", "h4", "h5",
    "h6", "head", "header", "hr", "html", "iframe", "legend", "li", "link", "main", "menu",
    "menuitem", "nav", "noframes", "ol", "optgroup", "option", "p", "param", "search", "section",
    "summary", "table", "tbody", "td", "tfoot", "th", "thead", "title", "tr", "track", "ul",
];

/// Tag names whose content is raw text (kind 1).
static RAW_TAGS: &[&str] = &["pre", "script", "style", "textarea"];

/// Scan one inline HTML construct at `start` (which must be `<`).
///
/// Returns the offset just past it.
pub fn scan_html(text: &[u8], start: usize) -> Option<usize> {
    if text.get(start) != Some(&b'<') {
        return None;
    }
    match text.get(start + 1)? {
        b'!' => {
            if text[start..].starts_with(b"<!--") {
                scan_comment(text, start)
            } else if text[start..].starts_with(b"<![CDATA[") {
                find(text, start + 9, b"]]>").map(|end| end + 3)
            } else {
                scan_declaration(text, start)
            }
        }
        b'?' => find(text, start + 2, b"?>").map(|end| end + 2),
        b'/' => scan_closing_tag(text, start),
        _ => scan_open_tag(text, start),
    }
}

fn scan_comment(text: &[u8], start: usize) -> Option<usize> {
    let i = start + 4;
    // `<!-->` and `<!--->` are complete comments
    match text.get(i..) {
        Some([b'>', ..]) => return Some(i + 1),
        Some([b'-', b'>', ..]) => return Some(i + 2),
        _ => {}
    }
    find(text, i, b"-->").map(|end| end + 3)
}

fn scan_declaration(text: &[u8], start: usize) -> Option<usize> {
    if !text.get(start + 2)?.is_ascii_alphabetic() {
        return None;
    }
    memchr::memchr(b'>', &text[start + 2..]).map(|end| start + 2 + end + 1)
}

/// Scan a tag name at `i`, returning the offset past it.
fn scan_tag_name(text: &[u8], mut i: usize) -> Option<usize> {
    if !text.get(i)?.is_ascii_alphabetic() {
        return None;
    }
    i += 1;
    while i < text.len() && (text[i].is_ascii_alphanumeric() || text[i] == b'-') {
        i += 1;
    }
    Some(i)
}

/// `</name ws* >`
pub(crate) fn scan_closing_tag(text: &[u8], start: usize) -> Option<usize> {
    if text.get(start..start + 2)? != b"</" {
        return None;
    }
    let mut i = scan_tag_name(text, start + 2)?;
    i = skip_whitespace(text, i);
    (text.get(i) == Some(&b'>')).then_some(i + 1)
}

/// `<name attr* ws* /?>`
pub(crate) fn scan_open_tag(text: &[u8], start: usize) -> Option<usize> {
    if text.get(start) != Some(&b'<') {
        return None;
    }
    let len = text.len();
    let mut i = scan_tag_name(text, start + 1)?;

    loop {
        let ws_start = i;
        i = skip_whitespace(text, i);
        match text.get(i)? {
            b'>' => return Some(i + 1),
            b'/' => return (text.get(i + 1) == Some(&b'>')).then_some(i + 2),
            _ => {}
        }
        // attributes must be separated by whitespace
        if i == ws_start || !is_attr_name_start(text[i]) {
            return None;
        }
        i += 1;
        while i < len && is_attr_name_char(text[i]) {
            i += 1;
        }

        let before_value = i;
        i = skip_whitespace(text, i);
        if text.get(i) != Some(&b'=') {
            i = before_value;
            continue;
        }
        i = skip_whitespace(text, i + 1);
        match *text.get(i)? {
            quote @ (b'"' | b'\'') => {
                let close = memchr::memchr(quote, &text[i + 1..])?;
                i += close + 2;
            }
            _ => {
                let value_start = i;
                while i < len
                    && !is_html_whitespace(text[i])
                    && !matches!(text[i], b'"' | b'\'' | b'=' | b'<' | b'>' | b'`')
                {
                    i += 1;
                }
                if i == value_start {
                    return None;
                }
            }
        }
    }
}

/// Which HTML block kind (1 to 7) a line starting at `<` opens.
pub(crate) fn block_start_condition(line: &[u8]) -> Option<u8> {
    if line.first() != Some(&b'<') {
        return None;
    }
    if line.starts_with(b"<!--") {
        return Some(2);
    }
    if line.starts_with(b"<?") {
        return Some(3);
    }
    if line.starts_with(b"<![CDATA[") {
        return Some(5);
    }
    if line.starts_with(b"<!") && line.get(2).is_some_and(u8::is_ascii_alphabetic) {
        return Some(4);
    }

    let closing = line.get(1) == Some(&b'/');
    let name_start = if closing { 2 } else { 1 };
    let name_end = scan_tag_name(line, name_start)?;
    let name = &line[name_start..name_end];
    let after = line.get(name_end).copied();

    if !closing && RAW_TAGS.iter().any(|tag| name.eq_ignore_ascii_case(tag.as_bytes())) {
        if after.is_none_or(|b| is_html_whitespace(b) || b == b'>') {
            return Some(1);
        }
    }
    if BLOCK_TAGS.iter().any(|tag| name.eq_ignore_ascii_case(tag.as_bytes())) {
        let ends_tag = match after {
            None => true,
            Some(b'>') => true,
            Some(b'/') => line.get(name_end + 1) == Some(&b'>'),
            Some(b) => is_html_whitespace(b),
        };
        if ends_tag {
            return Some(6);
        }
    }

    // kind 7: one complete tag followed only by whitespace
    let end = if closing { scan_closing_tag(line, 0)? } else { scan_open_tag(line, 0)? };
    line[end..].iter().all(|&b| is_html_whitespace(b)).then_some(7)
}

/// Whether `line` contains the end marker for a block of kinds 1 to 5.
pub(crate) fn block_end_condition(condition: u8, line: &[u8]) -> bool {
    match condition {
        1 => RAW_TAGS.iter().any(|tag| contains_closing_tag(line, tag)),
        2 => memmem::find(line, b"-->").is_some(),
        3 => memmem::find(line, b"?>").is_some(),
        4 => memchr::memchr(b'>', line).is_some(),
        5 => memmem::find(line, b"]]>").is_some(),
        _ => false,
    }
}

fn contains_closing_tag(line: &[u8], tag: &str) -> bool {
    let needle_len = tag.len() + 3;
    line.windows(needle_len).any(|w| {
        w.starts_with(b"</") && w[needle_len - 1] == b'>' && w[2..needle_len - 1].eq_ignore_ascii_case(tag.as_bytes())
    })
}

#[inline]
fn skip_whitespace(text: &[u8], mut i: usize) -> usize {
    while i < text.len() && is_html_whitespace(text[i]) {
        i += 1;
    }
    i
}

#[inline]
fn is_html_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0c')
}

#[inline]
fn is_attr_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b':'
}

#[inline]
fn is_attr_name_char(b: u8) -> bool {
    is_attr_name_start(b) || b.is_ascii_digit() || b == b'.' || b == b'-'
}

fn find(text: &[u8], start: usize, needle: &[u8]) -> Option<usize> {
    memmem::find(text.get(start..)?, needle).map(|idx| start + idx)
}
