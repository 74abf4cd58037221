//! Viewport camera for navigating the measuring scene.
//!
//! Provides fly-camera controls, cursor rays and temporal smoothing of
//! surface hits.

/// Viewport camera resource and controller system for scene navigation.
pub mod viewport_camera;
