//! Shared constants for the measuring engine.

/// Marker sizes, line widths and colours for measurement visuals.
pub mod render_settings;

/// Fallback values used when the runtime config omits a field.
pub mod measure_defaults;
