//! Interactive measuring tools.
//!
//! ## Controls
//!
//! ### Native Builds
//! - Left click: commit the candidate point
//! - `Z` / `Backspace`: undo the last point of the current chain
//! - `N` / `Enter`: finish the chain and start a new one
//! - `R`: clear every chain
//! - `U`: cycle metres, feet, inches
//! - `1` / `2` / `3`: floor, wall, height capture
//!
//! ### WASM Builds
//! - Left click still commits; everything else arrives over JSON-RPC
//!   (see [`crate::rpc`]).

/// Capture surfaces (floor, wall, height) and mode switching.
pub mod capture_mode;

/// Measuring session, candidate resolution, commands and presentation.
pub mod measure;
