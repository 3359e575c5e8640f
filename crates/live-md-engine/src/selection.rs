use crate::text::Span;

/// The primary selection range, always `from <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Selection {
    from: usize,
    to: usize,
}

impl Selection {
    /// Selection between `anchor` and `head`, in either order.
    pub fn new(anchor: usize, head: usize) -> Self {
        Self {
            from: anchor.min(head),
            to: anchor.max(head),
        }
    }

    /// A collapsed cursor at `at`.
    pub fn cursor(at: usize) -> Self {
        Self { from: at, to: at }
    }

    /// Selection covering `span`.
    pub fn spanning(span: Span) -> Self {
        Self::new(span.start, span.end)
    }

    pub fn from(&self) -> usize {
        self.from
    }

    pub fn to(&self) -> usize {
        self.to
    }

    pub fn is_collapsed(&self) -> bool {
        self.from == self.to
    }

    pub fn span(&self) -> Span {
        Span::new(self.from, self.to)
    }

    /// Fully contained in `span`, both boundaries inclusive.
    ///
    /// A cursor right after the closing `*` of `*a*` is still inside.
    pub fn is_within(&self, span: Span) -> bool {
        span.start <= self.from && self.to <= span.end
    }

    /// Shares at least one byte with `span`. A collapsed cursor sitting on
    /// either boundary does not overlap.
    pub fn overlaps(&self, span: Span) -> bool {
        self.from < span.end && self.to > span.start
    }

    /// Clamp both ends to a document of `len` bytes.
    pub fn clamp(self, len: usize) -> Self {
        Self {
            from: self.from.min(len),
            to: self.to.min(len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn new_normalizes_order() {
        let sel = Selection::new(9, 3);
        assert_eq!((sel.from(), sel.to()), (3, 9));
        assert!(!sel.is_collapsed());
    }

    #[rstest]
    #[case::before(Selection::cursor(0), false, false)]
    #[case::at_start(Selection::cursor(2), true, false)]
    #[case::inside(Selection::cursor(4), true, true)]
    #[case::at_end(Selection::cursor(6), true, false)]
    #[case::after(Selection::cursor(7), false, false)]
    #[case::straddling(Selection::new(1, 3), false, true)]
    #[case::covering(Selection::new(2, 6), true, true)]
    fn within_and_overlap(#[case] sel: Selection, #[case] within: bool, #[case] overlaps: bool) {
        let span = Span::new(2, 6);
        assert_eq!(sel.is_within(span), within);
        assert_eq!(sel.overlaps(span), overlaps);
    }
}
