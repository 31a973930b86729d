//! Special bytes and delimiter runs.
//!
//! The scanner only stops at bytes in [`SPECIAL_CHARS`]; everything between
//! two stops is plain text. Runs of `*`, `_` and `~` become delimiter
//! records that the emphasis pass pairs up later.

use crate::text::{char_at, char_before, is_punctuation, is_whitespace};

/// Lookup table for bytes that may start inline syntax.
pub static SPECIAL_CHARS: [bool; 256] = {
    let mut table = [false; 256];
    table[b'`' as usize] = true; // Code span
    table[b'*' as usize] = true; // Emphasis
    table[b'_' as usize] = true; // Emphasis
    table[b'~' as usize] = true; // Strikethrough
    table[b'$' as usize] = true; // Math
    table[b'\\' as usize] = true; // Escape, hard break
    table[b'\n' as usize] = true; // Line break
    table[b'[' as usize] = true; // Link, footnote reference
    table[b']' as usize] = true; // Link
    table[b'!' as usize] = true; // Image
    table[b'<' as usize] = true; // Autolink, HTML
    table[b'&' as usize] = true; // Entity
    table
};

/// First bytes of bare autolinks (`http://`, `ftp://`, `mailto:`, `www.`).
pub static AUTOLINK_STARTS: [bool; 256] = {
    let mut table = [false; 256];
    table[b'h' as usize] = true;
    table[b'H' as usize] = true;
    table[b'f' as usize] = true;
    table[b'F' as usize] = true;
    table[b'm' as usize] = true;
    table[b'M' as usize] = true;
    table[b'w' as usize] = true;
    table[b'W' as usize] = true;
    table
};

/// Position of the next byte the scanner must look at.
#[inline]
pub fn next_special(text: &[u8], from: usize, autolinks: bool) -> usize {
    text[from..]
        .iter()
        .position(|&b| SPECIAL_CHARS[b as usize] || (autolinks && AUTOLINK_STARTS[b as usize]))
        .map_or(text.len(), |p| from + p)
}

/// An emphasis or strikethrough delimiter run on the stack.
#[derive(Debug, Clone, Copy)]
pub struct Delimiter {
    /// `*`, `_` or `~`.
    pub ch: u8,
    /// Piece holding the run's text.
    pub piece: usize,
    /// Characters not yet used by a match.
    pub len: usize,
    /// Length of the run as written; the rule of three uses this.
    pub orig_len: usize,
    pub can_open: bool,
    pub can_close: bool,
    /// Set once the run is used up or can no longer match.
    pub removed: bool,
}

/// Whether the run `text[start..end]` of `ch` can open and close emphasis.
pub fn flanking(text: &str, start: usize, end: usize, ch: u8) -> (bool, bool) {
    // line boundaries count as whitespace
    let before = char_before(text, start).unwrap_or('\n');
    let after = char_at(text, end).unwrap_or('\n');

    let left = !is_whitespace(after) && (!is_punctuation(after) || is_whitespace(before) || is_punctuation(before));
    let right = !is_whitespace(before) && (!is_punctuation(before) || is_whitespace(after) || is_punctuation(after));

    if ch == b'_' {
        (
            left && (!right || is_punctuation(before)),
            right && (!left || is_punctuation(after)),
        )
    } else {
        (left, right)
    }
}
