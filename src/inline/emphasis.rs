//! Emphasis, strong emphasis and strikethrough resolution.
//!
//! Closers are taken from the bottom of the delimiter stack upward; for each
//! one the nearest usable opener below it is searched. The `openers_bottom`
//! table remembers, per delimiter class, where a search already failed so
//! that pathological input stays linear.

use crate::ast::{Inline, InlineKind};
use crate::limits::MAX_INLINE_NESTING;
use crate::Span;

use super::marks::Delimiter;
use super::pieces::Pieces;

/// `~`, then `*` and `_` split by whether the closer can also open and by
/// run length mod 3.
const BOTTOM_SLOTS: usize = 13;

fn bottom_slot(closer: &Delimiter) -> usize {
    match closer.ch {
        b'~' => 0,
        ch => {
            1 + if ch == b'_' { 6 } else { 0 } + if closer.can_open { 3 } else { 0 } + closer.orig_len % 3
        }
    }
}

/// Rule of three: a run that can both open and close only pairs with one
/// whose combined length is not a multiple of 3, unless both are.
#[inline]
fn odd_match(opener: &Delimiter, closer: &Delimiter) -> bool {
    (closer.can_open || opener.can_close)
        && (opener.orig_len + closer.orig_len) % 3 == 0
        && !(opener.orig_len % 3 == 0 && closer.orig_len % 3 == 0)
}

/// Pair every delimiter at or above `stack_bottom`, then drop those
/// records from the stack.
pub fn process_emphasis(pieces: &mut Pieces, delims: &mut Vec<Delimiter>, stack_bottom: usize) {
    let mut openers_bottom = [stack_bottom; BOTTOM_SLOTS];
    let mut closer = stack_bottom;

    while closer < delims.len() {
        let c = delims[closer];
        if c.removed || !c.can_close {
            closer += 1;
            continue;
        }

        let slot = bottom_slot(&c);
        let mut opener = None;
        let mut rule_of_three = false;
        let mut i = closer;
        while i > openers_bottom[slot] {
            i -= 1;
            let o = &delims[i];
            if o.removed || !o.can_open || o.ch != c.ch {
                continue;
            }
            if c.ch == b'~' {
                // strikethrough pairs runs of equal length only
                if o.len == c.len {
                    opener = Some(i);
                    break;
                }
                continue;
            }
            if odd_match(o, &c) {
                rule_of_three = true;
                continue;
            }
            opener = Some(i);
            break;
        }

        match opener {
            Some(opener) => {
                if !insert_emphasis(pieces, delims, opener, closer) {
                    // too deep: both runs stay literal
                    delims[opener].removed = true;
                    delims[closer].removed = true;
                }
                // a closer with characters left is tried again
                if delims[closer].removed {
                    closer += 1;
                }
            }
            None => {
                if !rule_of_three {
                    openers_bottom[slot] = closer;
                }
                if !c.can_open {
                    delims[closer].removed = true;
                }
                closer += 1;
            }
        }
    }

    delims.truncate(stack_bottom);
}

/// Wrap the pieces between `opener` and `closer` in a new node, using up to
/// two characters from each side. Returns `false`, changing nothing, when
/// the node would nest deeper than [`MAX_INLINE_NESTING`].
fn insert_emphasis(pieces: &mut Pieces, delims: &mut [Delimiter], opener: usize, closer: usize) -> bool {
    let o = delims[opener];
    let c = delims[closer];
    let depth = pieces.depth_between(o.piece, Some(c.piece)) + 1;
    if depth > MAX_INLINE_NESTING {
        log::trace!("emphasis deeper than {MAX_INLINE_NESTING} left literal");
        return false;
    }
    let (count, kind) = match c.ch {
        b'~' => (c.len, InlineKind::Strikethrough),
        _ if o.len >= 2 && c.len >= 2 => (2, InlineKind::Strong),
        _ => (1, InlineKind::Emphasis),
    };
    log::trace!("delimiter match {:?} x{count}", c.ch as char);

    let start = pieces.get(o.piece).map_or(0, |node| node.span.end - count as u32);
    let end = pieces.get(c.piece).map_or(start, |node| node.span.start + count as u32);
    let mut node = Inline::new(kind, Span::new(start, end));
    node.children = pieces.take_between(o.piece, Some(c.piece));
    pieces.shrink_end(o.piece, count);
    pieces.shrink_start(c.piece, count);
    pieces.insert_after(o.piece, node, depth);

    // delimiters inside the new node can no longer match
    for inner in &mut delims[opener + 1..closer] {
        inner.removed = true;
    }

    delims[opener].len -= count;
    delims[closer].len -= count;
    if delims[opener].len == 0 {
        pieces.remove(o.piece);
        delims[opener].removed = true;
    }
    if delims[closer].len == 0 {
        pieces.remove(c.piece);
        delims[closer].removed = true;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delim(ch: u8, piece: usize, len: usize, can_open: bool, can_close: bool) -> Delimiter {
        Delimiter {
            ch,
            piece,
            len,
            orig_len: len,
            can_open,
            can_close,
            removed: false,
        }
    }

    fn text(s: &str, start: u32) -> Inline {
        Inline::new(InlineKind::Text(s.into()), Span::new(start, start + s.len() as u32))
    }

    #[test]
    fn test_simple_emphasis() {
        // *a*
        let mut pieces = Pieces::new();
        let o = pieces.push(text("*", 0));
        pieces.push(text("a", 1));
        let c = pieces.push(text("*", 2));
        let mut delims = vec![delim(b'*', o, 1, true, false), delim(b'*', c, 1, false, true)];
        process_emphasis(&mut pieces, &mut delims, 0);

        assert!(delims.is_empty());
        let nodes = pieces.into_vec();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].kind, InlineKind::Emphasis);
        assert_eq!(nodes[0].span, Span::new(0, 3));
    }

    #[test]
    fn test_rule_of_three_blocks_match() {
        // *a**b  : the `**` can open and close, 1 + 2 is a multiple of 3
        let mut pieces = Pieces::new();
        let o = pieces.push(text("*", 0));
        pieces.push(text("a", 1));
        let c = pieces.push(text("**", 2));
        pieces.push(text("b", 4));
        let mut delims = vec![delim(b'*', o, 1, true, false), delim(b'*', c, 2, true, true)];
        process_emphasis(&mut pieces, &mut delims, 0);

        let nodes = pieces.into_vec();
        assert_eq!(nodes, vec![text("*a**b", 0)]);
    }

    #[test]
    fn test_nesting_stops_at_limit() {
        // one long run on each side of `a`
        let n = 200;
        let stars = "*".repeat(n);
        let mut pieces = Pieces::new();
        let o = pieces.push(text(&stars, 0));
        pieces.push(text("a", n as u32));
        let c = pieces.push(text(&stars, n as u32 + 1));
        let mut delims = vec![delim(b'*', o, n, true, false), delim(b'*', c, n, false, true)];
        process_emphasis(&mut pieces, &mut delims, 0);

        let nodes = pieces.into_vec();
        let left = n - 2 * MAX_INLINE_NESTING;
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0], text(&"*".repeat(left), 0));
        let mut depth = 0;
        let mut node = &nodes[1];
        while let Some(child) = node.children.first().filter(|_| node.kind == InlineKind::Strong) {
            depth += 1;
            node = child;
        }
        assert_eq!(depth, MAX_INLINE_NESTING);
        assert_eq!(nodes[2].kind, InlineKind::Text("*".repeat(left)));
    }

    #[test]
    fn test_strikethrough_needs_equal_runs() {
        let mut pieces = Pieces::new();
        let o = pieces.push(text("~~", 0));
        pieces.push(text("a", 2));
        let c = pieces.push(text("~", 3));
        let mut delims = vec![delim(b'~', o, 2, true, false), delim(b'~', c, 1, false, true)];
        process_emphasis(&mut pieces, &mut delims, 0);
        assert_eq!(pieces.into_vec(), vec![text("~~a~", 0)]);
    }
}
