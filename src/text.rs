//! Character classification and checked slicing.

use crate::error::{Error, Result};
use unicode_categories::UnicodeCategories;

/// Slice `text` with explicit bounds checking.
///
/// Unlike indexing, out-of-range or non-boundary bounds produce
/// [`Error::SliceOutOfRange`] instead of a panic.
pub fn slice(text: &str, start: usize, end: usize) -> Result<&str> {
    if start > end || end > text.len() || !text.is_char_boundary(start) || !text.is_char_boundary(end) {
        return Err(Error::SliceOutOfRange {
            start,
            end,
            len: text.len(),
        });
    }
    Ok(&text[start..end])
}

/// Unicode punctuation as CommonMark defines it: general categories P and S.
#[inline]
pub fn is_punctuation(c: char) -> bool {
    if c.is_ascii() {
        c.is_ascii_punctuation()
    } else {
        c.is_punctuation() || c.is_symbol()
    }
}

/// Unicode whitespace (category Zs, plus tab, newlines and form feed).
#[inline]
pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{c}') || c.is_separator_space()
}

#[inline]
pub fn is_space_or_tab(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// True when the line contains only spaces and tabs.
#[inline]
pub fn is_blank(line: &str) -> bool {
    line.bytes().all(is_space_or_tab)
}

/// The char ending at byte `pos`, if any.
#[inline]
pub fn char_before(text: &str, pos: usize) -> Option<char> {
    text.get(..pos).and_then(|s| s.chars().next_back())
}

/// The char starting at byte `pos`, if any.
#[inline]
pub fn char_at(text: &str, pos: usize) -> Option<char> {
    text.get(pos..).and_then(|s| s.chars().next())
}

/// Trim spaces and tabs (not other whitespace) from both ends.
#[inline]
pub fn trim_spaces(s: &str) -> &str {
    s.trim_matches(|c| c == ' ' || c == '\t')
}

/// Trim trailing spaces and tabs.
#[inline]
pub fn trim_end_spaces(s: &str) -> &str {
    s.trim_end_matches(|c| c == ' ' || c == '\t')
}

/// Byte length of the leading run of `b` in `s`.
#[inline]
pub fn run_length(s: &[u8], b: u8) -> usize {
    s.iter().take_while(|&&c| c == b).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_checks_bounds() {
        assert_eq!(slice("hello", 1, 3), Ok("el"));
        assert_eq!(
            slice("hello", 3, 9),
            Err(Error::SliceOutOfRange { start: 3, end: 9, len: 5 })
        );
        assert!(slice("hello", 4, 2).is_err());
    }

    #[test]
    fn test_slice_rejects_split_char() {
        assert!(slice("für", 0, 2).is_err());
        assert_eq!(slice("für", 0, 3), Ok("fü"));
    }

    #[test]
    fn test_unicode_punctuation() {
        assert!(is_punctuation('!'));
        assert!(is_punctuation('$'));
        assert!(is_punctuation('«'));
        assert!(is_punctuation('€'));
        assert!(!is_punctuation('a'));
        assert!(!is_punctuation('ä'));
    }

    #[test]
    fn test_unicode_whitespace() {
        assert!(is_whitespace(' '));
        assert!(is_whitespace('\u{a0}'));
        assert!(is_whitespace('\u{3000}'));
        assert!(!is_whitespace('x'));
    }

    #[test]
    fn test_char_neighbours() {
        let s = "añb";
        assert_eq!(char_before(s, 3), Some('ñ'));
        assert_eq!(char_at(s, 1), Some('ñ'));
        assert_eq!(char_before(s, 0), None);
        assert_eq!(char_at(s, 4), None);
    }
}
