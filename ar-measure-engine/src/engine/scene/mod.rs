//! Scene visualisation for the measuring viewport.
//!
//! Provides the flat reference grid and the reticle that marks the
//! candidate point under the cursor.

/// Flat reference grid on the ground plane.
pub mod grid;

/// Reticle ring at the candidate pose, tinted by how the pose was resolved.
pub mod reticle;
