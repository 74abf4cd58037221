//! Measurement chains: ordered anchors and the segments between them.

use serde::{Deserialize, Serialize};

use crate::point::Point3;

/// Session-unique chain identifier. Never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub u32);

/// A line between two consecutive anchors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Earlier anchor.
    pub start: Point3,
    /// Later anchor.
    pub end: Point3,
}

impl Segment {
    /// Length in metres.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }
}

/// An ordered sequence of committed anchors.
///
/// Anchors are only ever appended at the end or removed from the end, so
/// segment `i` always joins `anchors[i - 1]` and `anchors[i]`. Lengths are
/// derived on demand and never cached, which keeps
/// `total_length == Σ segment_length` exact after any mix of commits and undos.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementChain {
    id: ChainId,
    anchors: Vec<Point3>,
}

impl MeasurementChain {
    pub(crate) fn new(id: ChainId) -> Self {
        Self {
            id,
            anchors: Vec::new(),
        }
    }

    /// Identifier assigned by the owning session.
    #[must_use]
    pub fn id(&self) -> ChainId {
        self.id
    }

    /// Anchors in measurement order.
    #[must_use]
    pub fn anchors(&self) -> &[Point3] {
        &self.anchors
    }

    /// Number of anchors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// True when the chain has no anchors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Most recently committed anchor.
    #[must_use]
    pub fn last(&self) -> Option<Point3> {
        self.anchors.last().copied()
    }

    /// Number of segments; zero below two anchors.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.anchors.len().saturating_sub(1)
    }

    /// Segments in order.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.anchors.windows(2).map(|pair| Segment {
            start: pair[0],
            end: pair[1],
        })
    }

    /// Length of the segment ending at anchor `index`.
    ///
    /// Valid for `1..len()`; anything else returns `None`.
    #[must_use]
    pub fn segment_length(&self, index: usize) -> Option<f64> {
        if index == 0 {
            return None;
        }
        let start = self.anchors.get(index - 1)?;
        let end = self.anchors.get(index)?;
        Some(start.distance(end))
    }

    /// All segment lengths in order.
    #[must_use]
    pub fn segment_lengths(&self) -> Vec<f64> {
        self.segments().map(|s| s.length()).collect()
    }

    /// Sum of segment lengths, accumulated left to right.
    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.segments().map(|s| s.length()).sum()
    }

    pub(crate) fn push(&mut self, point: Point3) {
        self.anchors.push(point);
    }

    pub(crate) fn pop(&mut self) -> Option<Point3> {
        self.anchors.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn chain_of(points: &[[f64; 3]]) -> MeasurementChain {
        let mut chain = MeasurementChain::new(ChainId(0));
        for p in points {
            chain.push(Point3::from(*p));
        }
        chain
    }

    #[test]
    fn test_empty_chain() {
        let chain = chain_of(&[]);
        assert!(chain.is_empty());
        assert_eq!(chain.segment_count(), 0);
        assert_eq!(chain.total_length(), 0.0);
        assert_eq!(chain.last(), None);
    }

    #[test]
    fn test_single_anchor_has_no_segments() {
        let chain = chain_of(&[[1.0, 2.0, 3.0]]);
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.segments().count(), 0);
        assert_eq!(chain.total_length(), 0.0);
    }

    #[test]
    fn test_segment_length_indexing() {
        let chain = chain_of(&[[0.0, 0.0, 0.0], [3.0, 0.0, 0.0], [3.0, 4.0, 0.0]]);
        assert_eq!(chain.segment_length(0), None);
        assert_relative_eq!(chain.segment_length(1).unwrap(), 3.0);
        assert_relative_eq!(chain.segment_length(2).unwrap(), 4.0);
        assert_eq!(chain.segment_length(3), None);
    }

    #[test]
    fn test_total_is_sum_of_segments() {
        let chain = chain_of(&[[0.0, 0.0, 0.0], [3.0, 0.0, 0.0], [3.0, 4.0, 0.0]]);
        assert_eq!(chain.segment_lengths(), vec![3.0, 4.0]);
        assert_relative_eq!(chain.total_length(), 7.0);
    }

    #[test]
    fn test_pop_removes_last() {
        let mut chain = chain_of(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        assert_eq!(chain.pop(), Some(Point3::new(1.0, 0.0, 0.0)));
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.total_length(), 0.0);
    }

    #[test]
    fn test_repeated_point_gives_zero_segment() {
        let chain = chain_of(&[[1.0, 1.0, 1.0], [1.0, 1.0, 1.0]]);
        assert_eq!(chain.segment_count(), 1);
        assert_eq!(chain.segment_length(1), Some(0.0));
    }
}
