use bevy::color::{Color, LinearRgba};

pub const DRAW_LINE_WIDTH: f32 = 0.012;
pub const ANCHOR_SPHERE_SIZE: f32 = 0.02;
pub const RETICLE_INNER_RADIUS: f32 = 0.04;
pub const RETICLE_OUTER_RADIUS: f32 = 0.06;

/// Segments shorter than this are not drawn (their cuboid would be degenerate).
pub const MIN_RENDER_SEGMENT_LENGTH: f32 = 0.002;

/// Lift applied to the reticle so it does not z-fight with the ground grid.
pub const RETICLE_LIFT: f32 = 0.002;

pub const GRID_HALF_EXTENT: f32 = 10.0;
pub const GRID_CELL_SIZE: f32 = 0.5;

pub const CURRENT_CHAIN_COLOUR: Color = Color::srgb(1.0, 0.27, 0.0);
pub const CURRENT_CHAIN_EMISSIVE: LinearRgba = LinearRgba::new(1.0, 0.5, 0.0, 1.0);
pub const ARCHIVED_CHAIN_COLOUR: Color = Color::srgb(0.2, 0.6, 1.0);
pub const ARCHIVED_CHAIN_EMISSIVE: LinearRgba = LinearRgba::new(0.2, 0.6, 1.0, 1.0);
pub const PREVIEW_COLOUR: Color = Color::srgb(1.0, 1.0, 0.2);
pub const PREVIEW_EMISSIVE: LinearRgba = LinearRgba::new(1.0, 1.0, 0.2, 1.0);
pub const RETICLE_SURFACE_COLOUR: Color = Color::srgb(0.0, 1.0, 0.67);
pub const RETICLE_FALLBACK_COLOUR: Color = Color::srgb(1.0, 0.6, 0.0);
pub const GRID_COLOUR: Color = Color::srgba(1.0, 1.0, 1.0, 0.25);
