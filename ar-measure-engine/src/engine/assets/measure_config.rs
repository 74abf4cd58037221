use bevy::prelude::*;
use constants::measure_defaults::{
    FALLBACK_DISTANCE, GROUND_HEIGHT, INTERSECTION_SMOOTHING, WALL_DISTANCE,
};
use measure_core::Unit;
use serde::{Deserialize, Serialize};

/// Measuring configuration as a Bevy asset. Mirrors the JSON file exactly;
/// omitted fields take their defaults.
#[derive(Asset, TypePath, Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureConfig {
    /// Unit the session starts in.
    pub default_unit: Unit,
    /// Height of the floor plane in world metres.
    pub ground_height: f32,
    /// Lerp factor toward each new surface hit, in `(0, 1]`.
    pub intersection_smoothing: f32,
    /// Place points this far ahead of the viewer when nothing is hit.
    /// `None` disables fallback placement.
    pub fallback_distance: Option<f32>,
    /// Distance of the wall plane when the current chain is empty.
    pub wall_distance: f32,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            default_unit: Unit::Meters,
            ground_height: GROUND_HEIGHT,
            intersection_smoothing: INTERSECTION_SMOOTHING,
            fallback_distance: Some(FALLBACK_DISTANCE),
            wall_distance: WALL_DISTANCE,
        }
    }
}

impl MeasureConfig {
    /// Replace out-of-range values with defaults.
    pub fn sanitised(mut self) -> Self {
        let defaults = Self::default();

        if !self.ground_height.is_finite() {
            warn!("Config ground_height is not finite, using {}", defaults.ground_height);
            self.ground_height = defaults.ground_height;
        }
        if !(self.intersection_smoothing > 0.0 && self.intersection_smoothing <= 1.0) {
            warn!(
                "Config intersection_smoothing {} outside (0, 1], using {}",
                self.intersection_smoothing, defaults.intersection_smoothing
            );
            self.intersection_smoothing = defaults.intersection_smoothing;
        }
        if !(self.wall_distance.is_finite() && self.wall_distance > 0.0) {
            warn!("Config wall_distance must be positive, using {}", defaults.wall_distance);
            self.wall_distance = defaults.wall_distance;
        }
        if let Some(distance) = self.fallback_distance {
            if !(distance.is_finite() && distance > 0.0) {
                warn!("Config fallback_distance {} disables fallback placement", distance);
                self.fallback_distance = None;
            }
        }

        self
    }
}
