//! Error types for measurement operations.

use thiserror::Error;

/// Failure to commit the candidate pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CommitError {
    /// No candidate pose is available this frame.
    #[error("no anchor available: no surface detected")]
    NoAnchorAvailable,
}

/// Failure to undo the last anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UndoError {
    /// The current chain has no anchors.
    #[error("nothing to undo: current chain is empty")]
    EmptyChain,
}

/// Unrecognised unit name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown unit: {0}")]
pub struct UnitParseError(pub String);
