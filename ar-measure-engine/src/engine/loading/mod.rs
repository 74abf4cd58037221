//! Loading systems that gate the transition into the running state.

/// Measuring config loading with a default fallback when the asset is missing.
///
/// Applies the config to the session and camera before measuring starts.
pub mod config_loader;
