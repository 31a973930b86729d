//! Backslash escapes and character references.
//!
//! The tree stores text with escapes and entities already resolved, so every
//! literal value (text, link URLs, titles, info strings) passes through here.

use std::borrow::Cow;

/// ASCII punctuation that may be backslash-escaped.
#[inline]
pub fn is_escapable(b: u8) -> bool {
    b.is_ascii_punctuation()
}

/// Length of a character reference starting at `pos` (which must be `&`),
/// together with its decoded text.
///
/// Handles `&name;`, `&#123;` and `&#x1F;`. Invalid or zero code points
/// decode to U+FFFD.
pub fn match_entity(text: &str, pos: usize) -> Option<(usize, Cow<'static, str>)> {
    let bytes = text.as_bytes();
    debug_assert_eq!(bytes.get(pos), Some(&b'&'));
    let mut i = pos + 1;

    if bytes.get(i) == Some(&b'#') {
        i += 1;
        let hex = matches!(bytes.get(i), Some(b'x' | b'X'));
        if hex {
            i += 1;
        }
        let digits_start = i;
        let max = if hex { 6 } else { 7 };
        while i < bytes.len() && i - digits_start < max {
            let ok = if hex {
                bytes[i].is_ascii_hexdigit()
            } else {
                bytes[i].is_ascii_digit()
            };
            if !ok {
                break;
            }
            i += 1;
        }
        if i == digits_start || bytes.get(i) != Some(&b';') {
            return None;
        }
        let digits = &text[digits_start..i];
        let radix = if hex { 16 } else { 10 };
        let value = u32::from_str_radix(digits, radix).ok()?;
        let ch = match char::from_u32(value) {
            Some(c) if value != 0 => c,
            _ => '\u{FFFD}',
        };
        return Some((i + 1 - pos, Cow::Owned(ch.to_string())));
    }

    let name_start = i;
    while i < bytes.len() && bytes[i].is_ascii_alphanumeric() && i - name_start < 32 {
        i += 1;
    }
    if i == name_start || !bytes[name_start].is_ascii_alphabetic() || bytes.get(i) != Some(&b';') {
        return None;
    }
    let candidate = &text[pos..=i];
    match html_escape::decode_html_entities(candidate) {
        Cow::Owned(decoded) if decoded != candidate => Some((i + 1 - pos, Cow::Owned(decoded))),
        _ => None,
    }
}

/// Resolve backslash escapes and character references.
pub fn unescape(text: &str) -> Cow<'_, str> {
    if !text.bytes().any(|b| b == b'\\' || b == b'&') {
        return Cow::Borrowed(text);
    }

    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if i + 1 < bytes.len() && is_escapable(bytes[i + 1]) => {
                out.push_str(&text[last..i]);
                out.push(bytes[i + 1] as char);
                i += 2;
                last = i;
            }
            b'&' => {
                if let Some((len, decoded)) = match_entity(text, i) {
                    out.push_str(&text[last..i]);
                    out.push_str(&decoded);
                    i += len;
                    last = i;
                } else {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
    out.push_str(&text[last..]);
    Cow::Owned(out)
}
