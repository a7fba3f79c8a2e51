use std::ops::Range;

/// A string literal found in a snapshot, with its interpolation holes.
///
/// `range` covers the literal content (delimiters excluded). Every range in
/// `interpolations` lies inside `range`, and they are sorted and disjoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralTag {
    pub range: Range<usize>,
    pub interpolated: bool,
    pub interpolations: Vec<Range<usize>>,
}

impl LiteralTag {
    pub fn len(&self) -> usize {
        self.range.end - self.range.start
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Interpolation holes relative to the start of the literal.
    pub fn relative_interpolations(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        let base = self.range.start;
        self.interpolations
            .iter()
            .map(move |hole| hole.start - base..hole.end - base)
    }

    /// Extends this tag with the fragment that follows it on a later line.
    pub(crate) fn absorb(&mut self, next: LiteralTag) {
        debug_assert!(next.range.start >= self.range.end);
        self.range.end = next.range.end;
        self.interpolations.extend(next.interpolations);
    }

    /// Overlap test against a query range. An empty query matches tags that
    /// contain its position.
    pub fn intersects(&self, query: &Range<usize>) -> bool {
        if query.is_empty() {
            self.range.start <= query.start && query.start <= self.range.end
        } else {
            self.range.start < query.end && query.start < self.range.end
        }
    }
}
