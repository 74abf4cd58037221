//! Measurement-chain core for tap-to-measure tools.
//!
//! A [`MeasurementSession`] turns a per-frame stream of candidate surface
//! points and discrete commit events into ordered chains of anchors, the
//! segments between them, and running totals.
//!
//! # Features
//!
//! - **Chains**: append-only anchor sequences with derived segment lengths
//! - **Sessions**: one active chain plus archived chains, undo, reset
//! - **Units**: metres, feet and inches with deterministic formatting
//! - **Snapshots**: owned [`SessionView`] projections for presenters
//!
//! # Layer 0 Crate
//!
//! This crate has **zero Bevy dependencies**. Pose acquisition and rendering
//! belong to the host; the core only consumes points and hands out views.
//!
//! # Example
//!
//! ```
//! use measure_core::{MeasurementSession, Point3, Unit};
//!
//! let mut session = MeasurementSession::new();
//!
//! session.update_candidate_pose(Some(Point3::new(0.0, 0.0, 0.0)));
//! session.commit_point().unwrap();
//! session.update_candidate_pose(Some(Point3::new(3.0, 0.0, 0.0)));
//! session.commit_point().unwrap();
//!
//! assert!((session.current().total_length() - 3.0).abs() < 1e-12);
//!
//! session.set_unit(Unit::Feet);
//! assert_eq!(session.format_length(3.0), "9.84 ft");
//! ```
//!
//! # Coordinate System
//!
//! Points are metres in whatever single reference frame the pose source uses.
//! The core never transforms them.

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod chain;
mod error;
mod point;
mod session;
mod units;
mod view;

pub use chain::{ChainId, MeasurementChain, Segment};
pub use error::{CommitError, UndoError, UnitParseError};
pub use point::Point3;
pub use session::MeasurementSession;
pub use units::Unit;
pub use view::{ChainView, SegmentView, SessionView};
