//! The measurement session aggregate.

use tracing::{debug, info};

use crate::chain::{ChainId, MeasurementChain};
use crate::error::{CommitError, UndoError};
use crate::point::Point3;
use crate::units::Unit;
use crate::view::{ChainView, SegmentView, SessionView};

/// Owns every chain of a measuring session.
///
/// Exactly one chain is active at a time. Archived chains are kept in
/// completion order and are never mutated again. The candidate pose is the
/// point the next commit would use; it is overwritten every frame and never
/// becomes part of a chain except through [`commit_point`](Self::commit_point).
#[derive(Debug, Clone)]
pub struct MeasurementSession {
    chains: Vec<MeasurementChain>,
    current: MeasurementChain,
    unit: Unit,
    candidate_pose: Option<Point3>,
    next_chain_id: u32,
}

impl Default for MeasurementSession {
    fn default() -> Self {
        Self::new()
    }
}

impl MeasurementSession {
    /// Empty session displaying metres.
    #[must_use]
    pub fn new() -> Self {
        Self::with_unit(Unit::default())
    }

    /// Empty session displaying `unit`.
    #[must_use]
    pub fn with_unit(unit: Unit) -> Self {
        Self {
            chains: Vec::new(),
            current: MeasurementChain::new(ChainId(0)),
            unit,
            candidate_pose: None,
            next_chain_id: 1,
        }
    }

    fn fresh_chain(&mut self) -> MeasurementChain {
        let id = ChainId(self.next_chain_id);
        self.next_chain_id = self.next_chain_id.wrapping_add(1);
        MeasurementChain::new(id)
    }

    /// Offer this frame's candidate, or `None` when no surface resolves.
    ///
    /// Points with a non-finite coordinate are stored as `None`.
    pub fn update_candidate_pose(&mut self, pose: Option<Point3>) {
        self.candidate_pose = pose.filter(Point3::is_finite);
    }

    /// Current candidate, if any.
    #[must_use]
    pub fn candidate_pose(&self) -> Option<Point3> {
        self.candidate_pose
    }

    /// Append the candidate to the current chain.
    ///
    /// Committing the same point twice in a row is allowed and produces a
    /// zero-length segment.
    ///
    /// # Errors
    ///
    /// [`CommitError::NoAnchorAvailable`] when there is no candidate; the
    /// session is left unchanged.
    pub fn commit_point(&mut self) -> Result<Point3, CommitError> {
        let point = self.candidate_pose.ok_or(CommitError::NoAnchorAvailable)?;
        self.current.push(point);
        debug!(
            chain = self.current.id().0,
            anchors = self.current.len(),
            total = self.current.total_length(),
            "anchor committed"
        );
        Ok(point)
    }

    /// Remove and return the last anchor of the current chain.
    ///
    /// # Errors
    ///
    /// [`UndoError::EmptyChain`] when the current chain has no anchors.
    pub fn undo_last(&mut self) -> Result<Point3, UndoError> {
        let point = self.current.pop().ok_or(UndoError::EmptyChain)?;
        debug!(
            chain = self.current.id().0,
            anchors = self.current.len(),
            "anchor removed"
        );
        Ok(point)
    }

    /// Close the current chain and begin an empty one.
    ///
    /// A chain with at least two anchors is archived and its id returned.
    /// Shorter chains are not measurements and are dropped without record.
    pub fn start_new_chain(&mut self) -> Option<ChainId> {
        let fresh = self.fresh_chain();
        let finished = std::mem::replace(&mut self.current, fresh);

        if finished.len() >= 2 {
            let id = finished.id();
            info!(
                chain = id.0,
                anchors = finished.len(),
                total = finished.total_length(),
                "chain archived"
            );
            self.chains.push(finished);
            Some(id)
        } else {
            debug!(
                chain = finished.id().0,
                anchors = finished.len(),
                "unfinished chain discarded"
            );
            None
        }
    }

    /// Drop every archived chain and empty the current one.
    ///
    /// The candidate pose is untouched; it belongs to the current frame.
    pub fn reset_all(&mut self) {
        info!(archived = self.chains.len(), "session reset");
        self.chains.clear();
        self.current = self.fresh_chain();
    }

    /// Change the display unit. Stored geometry stays in metres.
    pub fn set_unit(&mut self, unit: Unit) {
        self.unit = unit;
    }

    /// Active display unit.
    #[must_use]
    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Format a length in metres using the active unit.
    #[must_use]
    pub fn format_length(&self, meters: f64) -> String {
        self.unit.format(meters)
    }

    /// Archived chains in completion order.
    #[must_use]
    pub fn chains(&self) -> &[MeasurementChain] {
        &self.chains
    }

    /// The active chain.
    #[must_use]
    pub fn current(&self) -> &MeasurementChain {
        &self.current
    }

    /// True when [`undo_last`](Self::undo_last) would succeed.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.current.is_empty()
    }

    /// Distance from the last anchor to the candidate, for a preview line.
    #[must_use]
    pub fn live_length(&self) -> Option<f64> {
        let last = self.current.last()?;
        let candidate = self.candidate_pose?;
        Some(last.distance(&candidate))
    }

    /// Owned projection of the whole session for presenters.
    #[must_use]
    pub fn snapshot(&self) -> SessionView {
        let live_segment = self
            .current
            .last()
            .zip(self.candidate_pose)
            .map(|(start, end)| SegmentView::new(start, end, self.unit));

        SessionView {
            unit: self.unit,
            archived: self
                .chains
                .iter()
                .map(|chain| ChainView::from_chain(chain, self.unit))
                .collect(),
            current: ChainView::from_chain(&self.current, self.unit),
            candidate: self.candidate_pose,
            live_segment,
            can_undo: self.can_undo(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn commit(session: &mut MeasurementSession, x: f64, y: f64, z: f64) -> Point3 {
        session.update_candidate_pose(Some(Point3::new(x, y, z)));
        session.commit_point().unwrap()
    }

    #[test]
    fn test_new_session_has_one_empty_chain() {
        let session = MeasurementSession::new();
        assert!(session.chains().is_empty());
        assert!(session.current().is_empty());
        assert_eq!(session.unit(), Unit::Meters);
        assert_eq!(session.candidate_pose(), None);
        assert!(!session.can_undo());
    }

    #[test]
    fn test_candidate_is_overwritten() {
        let mut session = MeasurementSession::new();
        session.update_candidate_pose(Some(Point3::new(1.0, 0.0, 0.0)));
        session.update_candidate_pose(Some(Point3::new(2.0, 0.0, 0.0)));
        assert_eq!(session.candidate_pose(), Some(Point3::new(2.0, 0.0, 0.0)));
        session.update_candidate_pose(None);
        assert_eq!(session.candidate_pose(), None);
    }

    #[test]
    fn test_non_finite_candidate_is_absent() {
        let mut session = MeasurementSession::new();
        session.update_candidate_pose(Some(Point3::new(f64::NAN, 0.0, 0.0)));
        assert_eq!(session.candidate_pose(), None);
        assert_eq!(
            session.commit_point(),
            Err(CommitError::NoAnchorAvailable)
        );
    }

    #[test]
    fn test_commit_returns_point_and_keeps_candidate() {
        let mut session = MeasurementSession::new();
        let p = commit(&mut session, 1.0, 2.0, 3.0);
        assert_eq!(p, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(session.current().anchors(), &[p]);
        assert_eq!(session.candidate_pose(), Some(p));
    }

    #[test]
    fn test_commit_without_candidate_fails() {
        let mut session = MeasurementSession::new();
        commit(&mut session, 0.0, 0.0, 0.0);
        session.update_candidate_pose(None);
        let before = session.current().clone();
        assert_eq!(
            session.commit_point(),
            Err(CommitError::NoAnchorAvailable)
        );
        assert_eq!(session.current(), &before);
    }

    #[test]
    fn test_undo_empty_chain_fails() {
        let mut session = MeasurementSession::new();
        assert_eq!(session.undo_last(), Err(UndoError::EmptyChain));
    }

    #[test]
    fn test_undo_never_touches_archive() {
        let mut session = MeasurementSession::new();
        commit(&mut session, 0.0, 0.0, 0.0);
        commit(&mut session, 1.0, 0.0, 0.0);
        session.start_new_chain();

        assert_eq!(session.undo_last(), Err(UndoError::EmptyChain));
        assert_eq!(session.chains().len(), 1);
        assert_eq!(session.chains()[0].len(), 2);
    }

    #[test]
    fn test_start_new_chain_returns_archived_id() {
        let mut session = MeasurementSession::new();
        let first_id = session.current().id();
        commit(&mut session, 0.0, 0.0, 0.0);
        commit(&mut session, 1.0, 0.0, 0.0);

        assert_eq!(session.start_new_chain(), Some(first_id));
        assert_ne!(session.current().id(), first_id);
        assert_eq!(session.start_new_chain(), None);
    }

    #[test]
    fn test_chain_ids_never_reused() {
        let mut session = MeasurementSession::new();
        let mut seen = vec![session.current().id()];
        for _ in 0..3 {
            session.start_new_chain();
            seen.push(session.current().id());
        }
        session.reset_all();
        seen.push(session.current().id());

        assert!(seen.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_reset_all_clears_everything_but_candidate() {
        let mut session = MeasurementSession::new();
        commit(&mut session, 0.0, 0.0, 0.0);
        commit(&mut session, 1.0, 0.0, 0.0);
        session.start_new_chain();
        commit(&mut session, 2.0, 0.0, 0.0);

        session.reset_all();
        assert!(session.chains().is_empty());
        assert!(session.current().is_empty());
        assert_eq!(session.candidate_pose(), Some(Point3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_set_unit_changes_format_only() {
        let mut session = MeasurementSession::new();
        commit(&mut session, 0.0, 0.0, 0.0);
        commit(&mut session, 1.0, 0.0, 0.0);
        let anchors = session.current().anchors().to_vec();

        session.set_unit(Unit::Inches);
        assert_eq!(session.current().anchors(), anchors.as_slice());
        assert_eq!(session.format_length(1.0), "39.4 in");
    }

    #[test]
    fn test_live_length() {
        let mut session = MeasurementSession::new();
        session.update_candidate_pose(Some(Point3::new(0.0, 0.0, 0.0)));
        assert_eq!(session.live_length(), None);

        commit(&mut session, 0.0, 0.0, 0.0);
        session.update_candidate_pose(Some(Point3::new(0.0, 2.0, 0.0)));
        assert_relative_eq!(session.live_length().unwrap(), 2.0);

        session.update_candidate_pose(None);
        assert_eq!(session.live_length(), None);
    }

    #[test]
    fn test_with_unit() {
        let session = MeasurementSession::with_unit(Unit::Feet);
        assert_eq!(session.unit(), Unit::Feet);
        assert_eq!(session.format_length(3.0), "9.84 ft");
    }
}
