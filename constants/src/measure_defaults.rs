/// Height of the floor plane in world metres.
pub const GROUND_HEIGHT: f32 = 0.0;

/// Lerp factor toward each new surface hit; 1.0 disables smoothing.
pub const INTERSECTION_SMOOTHING: f32 = 0.35;

/// Distance ahead of the viewer for fallback placement when no surface is hit.
pub const FALLBACK_DISTANCE: f32 = 1.0;

/// Distance ahead of the viewer for the wall plane when the chain is empty.
pub const WALL_DISTANCE: f32 = 2.0;

/// Rays closer than this to parallel with a plane are treated as misses.
pub const PARALLEL_EPSILON: f32 = 1e-3;

/// Asset path of the runtime measuring config.
pub const MEASURE_CONFIG_PATH: &str = "default.measure.json";

/// Interval between session notifications driven purely by cursor movement.
pub const LIVE_UPDATE_INTERVAL_SECS: f32 = 0.1;
