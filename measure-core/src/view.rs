//! Read-only projections handed to presenters.
//!
//! Every view owns its data; nothing here borrows from the session, so a
//! presenter can keep a snapshot across frames or serialise it to a frontend.

use serde::{Deserialize, Serialize};

use crate::chain::{ChainId, MeasurementChain, Segment};
use crate::point::Point3;
use crate::units::Unit;

/// One segment with its length in metres and as a display label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentView {
    /// Earlier anchor.
    pub start: Point3,
    /// Later anchor.
    pub end: Point3,
    /// Length in metres.
    pub meters: f64,
    /// Length formatted in the session unit.
    pub label: String,
}

impl SegmentView {
    pub(crate) fn new(start: Point3, end: Point3, unit: Unit) -> Self {
        let meters = start.distance(&end);
        Self {
            start,
            end,
            meters,
            label: unit.format(meters),
        }
    }

    fn from_segment(segment: Segment, unit: Unit) -> Self {
        Self::new(segment.start, segment.end, unit)
    }

    /// Halfway point, where a label is usually drawn.
    #[must_use]
    pub fn midpoint(&self) -> Point3 {
        Point3::new(
            (self.start.x + self.end.x) * 0.5,
            (self.start.y + self.end.y) * 0.5,
            (self.start.z + self.end.z) * 0.5,
        )
    }
}

/// One chain with its segments and total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainView {
    /// Chain identifier.
    pub id: ChainId,
    /// Anchors in measurement order.
    pub anchors: Vec<Point3>,
    /// Segments in order.
    pub segments: Vec<SegmentView>,
    /// Total length in metres.
    pub total_meters: f64,
    /// Total length formatted in the session unit.
    pub total_label: String,
}

impl ChainView {
    pub(crate) fn from_chain(chain: &MeasurementChain, unit: Unit) -> Self {
        let total_meters = chain.total_length();
        Self {
            id: chain.id(),
            anchors: chain.anchors().to_vec(),
            segments: chain
                .segments()
                .map(|segment| SegmentView::from_segment(segment, unit))
                .collect(),
            total_meters,
            total_label: unit.format(total_meters),
        }
    }
}

/// Snapshot of a whole session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    /// Unit the labels are formatted in.
    pub unit: Unit,
    /// Archived chains in completion order.
    pub archived: Vec<ChainView>,
    /// The active chain.
    pub current: ChainView,
    /// Candidate point for the reticle, if a surface is resolved.
    pub candidate: Option<Point3>,
    /// Preview segment from the last anchor to the candidate.
    pub live_segment: Option<SegmentView>,
    /// Whether undo is currently possible.
    pub can_undo: bool,
}

impl SessionView {
    /// Archived chains followed by the current one.
    pub fn all_chains(&self) -> impl Iterator<Item = &ChainView> {
        self.archived.iter().chain(std::iter::once(&self.current))
    }

    /// Sum of every chain total, in metres.
    #[must_use]
    pub fn grand_total_meters(&self) -> f64 {
        self.all_chains().map(|chain| chain.total_meters).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MeasurementSession;
    use approx::assert_relative_eq;

    fn measured_session() -> MeasurementSession {
        let mut session = MeasurementSession::new();
        for p in [[0.0, 0.0, 0.0], [3.0, 0.0, 0.0]] {
            session.update_candidate_pose(Some(Point3::from(p)));
            session.commit_point().unwrap();
        }
        session.start_new_chain();
        session.update_candidate_pose(Some(Point3::new(5.0, 5.0, 5.0)));
        session.commit_point().unwrap();
        session
    }

    #[test]
    fn test_snapshot_structure() {
        let view = measured_session().snapshot();
        assert_eq!(view.archived.len(), 1);
        assert_eq!(view.archived[0].segments.len(), 1);
        assert_eq!(view.archived[0].total_label, "3.00 m");
        assert_eq!(view.current.anchors.len(), 1);
        assert!(view.current.segments.is_empty());
        assert_eq!(view.current.total_label, "0.00 m");
        assert!(view.can_undo);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut session = measured_session();
        let view = session.snapshot();
        session.reset_all();
        assert_eq!(view.archived.len(), 1);
        assert_eq!(view.current.anchors.len(), 1);
    }

    #[test]
    fn test_labels_follow_unit() {
        let mut session = measured_session();
        session.set_unit(Unit::Feet);
        let view = session.snapshot();
        assert_eq!(view.unit, Unit::Feet);
        assert_eq!(view.archived[0].segments[0].label, "9.84 ft");
        assert_relative_eq!(view.archived[0].segments[0].meters, 3.0);
    }

    #[test]
    fn test_live_segment() {
        let mut session = measured_session();
        session.update_candidate_pose(Some(Point3::new(5.0, 7.0, 5.0)));
        let live = session.snapshot().live_segment.unwrap();
        assert_relative_eq!(live.meters, 2.0);
        assert_eq!(live.label, "2.00 m");
        assert_eq!(live.midpoint(), Point3::new(5.0, 6.0, 5.0));

        session.update_candidate_pose(None);
        assert!(session.snapshot().live_segment.is_none());
    }

    #[test]
    fn test_grand_total() {
        let mut session = measured_session();
        session.update_candidate_pose(Some(Point3::new(5.0, 6.0, 5.0)));
        session.commit_point().unwrap();
        assert_relative_eq!(session.snapshot().grand_total_meters(), 4.0);
    }

    #[test]
    fn test_serialises_to_json() {
        let json = serde_json::to_value(measured_session().snapshot()).unwrap();
        assert_eq!(json["unit"], "meters");
        assert_eq!(json["archived"][0]["id"], 0);
        assert_eq!(json["current"]["anchors"][0]["x"], 5.0);
        assert!(json["live_segment"].is_object());
    }
}
