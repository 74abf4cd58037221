//! Runtime configuration assets.
//!
//! The measuring config is a JSON asset so it can be swapped without a
//! rebuild, in native builds and when served next to the WASM bundle.

/// Measuring configuration: default unit, ground plane, smoothing and fallback placement.
pub mod measure_config;
