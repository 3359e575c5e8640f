use serde::Serialize;

/// A byte range `[start, end)` into the document.
///
/// Nodes, decorations and payloads all carry spans rather than copied text;
/// slicing the document with a span reproduces the exact source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A zero-width span at `at`.
    pub fn point(at: usize) -> Self {
        Self { start: at, end: at }
    }

    /// Returns the length in bytes. Uses saturating subtraction for safety.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty (start >= end).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// True if `other` lies inside this span, boundaries included.
    pub fn contains_span(self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// True if the spans share a position, touching counts.
    pub fn touches(self, other: Span) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// The part of this span inside `bounds`.
    ///
    /// `None` when nothing is left, except that an already empty span inside
    /// the bounds survives (line decorations are zero-width).
    pub fn clamp_to(self, bounds: Span) -> Option<Span> {
        let start = self.start.max(bounds.start);
        let end = self.end.min(bounds.end);
        if start > end || (start == end && !self.is_empty()) {
            return None;
        }
        Some(Span { start, end })
    }

    /// Grow the end by `n`, never past `limit`.
    pub fn extend_end(self, n: usize, limit: usize) -> Span {
        Span {
            start: self.start,
            end: (self.end + n).min(limit.max(self.end)),
        }
    }

    pub fn as_range(self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Span {
            start: range.start,
            end: range.end,
        }
    }
}

impl From<rowan::TextRange> for Span {
    fn from(range: rowan::TextRange) -> Self {
        Span {
            start: usize::from(range.start()),
            end: usize::from(range.end()),
        }
    }
}

/// Sort spans and merge the ones that overlap or touch.
pub fn merge_spans(spans: &[Span]) -> Vec<Span> {
    let mut sorted: Vec<Span> = spans.iter().copied().filter(|s| s.start <= s.end).collect();
    sorted.sort();

    let mut merged: Vec<Span> = Vec::with_capacity(sorted.len());
    for span in sorted {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case::inside(Span::new(2, 4), Some(Span::new(2, 4)))]
    #[case::straddles_start(Span::new(0, 4), Some(Span::new(1, 4)))]
    #[case::straddles_end(Span::new(4, 9), Some(Span::new(4, 6)))]
    #[case::outside(Span::new(7, 9), None)]
    #[case::touching_end(Span::new(6, 9), None)]
    #[case::point_inside(Span::point(6), Some(Span::point(6)))]
    #[case::point_outside(Span::point(7), None)]
    fn clamp_to_bounds(#[case] span: Span, #[case] expected: Option<Span>) {
        assert_eq!(span.clamp_to(Span::new(1, 6)), expected);
    }

    #[test]
    fn extend_end_stops_at_limit() {
        assert_eq!(Span::new(0, 1).extend_end(1, 8), Span::new(0, 2));
        assert_eq!(Span::new(0, 8).extend_end(1, 8), Span::new(0, 8));
    }

    #[test]
    fn merge_spans_joins_overlapping_and_touching() {
        let merged = merge_spans(&[Span::new(10, 12), Span::new(0, 3), Span::new(3, 5), Span::new(4, 7)]);
        assert_eq!(merged, vec![Span::new(0, 7), Span::new(10, 12)]);
    }

    #[test]
    fn containment_is_inclusive() {
        let outer = Span::new(0, 7);
        assert!(outer.contains_span(Span::point(0)));
        assert!(outer.contains_span(Span::point(7)));
        assert!(!outer.contains_span(Span::point(8)));
    }
}
