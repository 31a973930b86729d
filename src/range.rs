//! Compact source spans.
//!
//! Uses `u32` offsets (8 bytes per span instead of 16 for a `usize` pair).
//! Inputs larger than 4GB are rejected up front by [`crate::parse`].

/// Half-open byte range `[start, end)` into the original input.
///
/// # Example
/// ```
/// use mdtree::Span;
///
/// let input = "Hello, World!";
/// let span = Span::new(0, 5);
/// assert_eq!(span.slice(input), "Hello");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[repr(C)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

const _: () = assert!(std::mem::size_of::<Span>() == 8);

impl Span {
    /// Create a new span.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Create a span from usize values.
    ///
    /// Offsets are checked against `u32::MAX` once per document, so the
    /// casts here are lossless.
    #[inline]
    pub fn from_usize(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        debug_assert!(end <= u32::MAX as usize);
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    /// Create an empty span at a position.
    #[inline]
    pub const fn empty_at(pos: u32) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// The text this span covers.
    ///
    /// Spans produced by the parser always fall on char boundaries.
    #[inline]
    pub fn slice<'a>(&self, input: &'a str) -> &'a str {
        &input[self.start as usize..self.end as usize]
    }

    /// Checked [`slice`](Self::slice) for spans that may not belong to
    /// `input`.
    #[inline]
    pub fn get<'a>(&self, input: &'a str) -> crate::Result<&'a str> {
        crate::text::slice(input, self.start_usize(), self.end_usize())
    }

    /// Length in bytes.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub const fn start_usize(&self) -> usize {
        self.start as usize
    }

    #[inline]
    pub const fn end_usize(&self) -> usize {
        self.end as usize
    }

    /// Check if this span contains a position.
    #[inline]
    pub const fn contains(&self, pos: u32) -> bool {
        pos >= self.start && pos < self.end
    }

    /// Check if `other` lies entirely inside this span.
    #[inline]
    pub const fn encloses(&self, other: Span) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    /// Smallest span covering both.
    #[inline]
    pub fn cover(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl From<std::ops::Range<usize>> for Span {
    #[inline]
    fn from(r: std::ops::Range<usize>) -> Self {
        Self::from_usize(r.start, r.end)
    }
}

impl From<Span> for std::ops::Range<usize> {
    #[inline]
    fn from(r: Span) -> Self {
        r.start_usize()..r.end_usize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_size() {
        assert_eq!(std::mem::size_of::<Span>(), 8);
    }

    #[test]
    fn test_span_empty() {
        let s = Span::empty_at(5);
        assert_eq!(s.len(), 0);
        assert!(s.is_empty());
        assert!(!s.contains(5));
    }

    #[test]
    fn test_span_slice_utf8() {
        let input = "für alle";
        let s = Span::new(0, 4);
        assert_eq!(s.slice(input), "für");
    }

    #[test]
    fn test_span_encloses() {
        let outer = Span::new(10, 20);
        assert!(outer.encloses(Span::new(10, 20)));
        assert!(outer.encloses(Span::new(12, 15)));
        assert!(!outer.encloses(Span::new(9, 15)));
        assert!(!outer.encloses(Span::new(15, 21)));
    }

    #[test]
    fn test_span_cover() {
        let a = Span::new(4, 8);
        let b = Span::new(2, 6);
        assert_eq!(a.cover(b), Span::new(2, 8));
    }

    #[test]
    fn test_span_from_std_range() {
        let s: Span = (10usize..20usize).into();
        assert_eq!(s, Span::new(10, 20));
        let r: std::ops::Range<usize> = s.into();
        assert_eq!(r, 10..20);
    }
}
