//! Ray/surface resolution for each capture mode. Pure math, no ECS access.

use bevy::prelude::*;
use constants::measure_defaults::PARALLEL_EPSILON;

use crate::tools::capture_mode::CaptureMode;

/// Surfaces the cursor ray can land on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceParams {
    pub ground_height: f32,
    pub wall_distance: f32,
}

/// Ray/plane intersection in front of the origin.
pub fn intersect_plane(
    origin: Vec3,
    direction: Vec3,
    plane_point: Vec3,
    plane_normal: Vec3,
) -> Option<Vec3> {
    let denom = plane_normal.dot(direction);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }

    let t = (plane_point - origin).dot(plane_normal) / denom;
    (t > 0.0).then(|| origin + direction * t)
}

pub fn intersect_horizontal_plane(origin: Vec3, direction: Vec3, height: f32) -> Option<Vec3> {
    intersect_plane(origin, direction, Vec3::new(0.0, height, 0.0), Vec3::Y)
}

/// Camera forward projected onto the ground, or `None` when looking straight
/// up or down.
pub fn horizontal_forward(forward: Vec3) -> Option<Vec3> {
    let flat = Vec3::new(forward.x, 0.0, forward.z);
    if flat.length_squared() < PARALLEL_EPSILON * PARALLEL_EPSILON {
        return None;
    }
    flat.try_normalize()
}

/// Point `distance` metres along the ray.
pub fn fallback_point(origin: Vec3, direction: Vec3, distance: f32) -> Option<Vec3> {
    let direction = direction.try_normalize()?;
    Some(origin + direction * distance)
}

/// Point on the vertical line through `anchor` closest to the ray.
pub fn closest_on_vertical_line(origin: Vec3, direction: Vec3, anchor: Vec3) -> Option<Vec3> {
    let w0 = anchor - origin;
    let b = direction.y;
    let c = direction.dot(direction);
    let d = w0.y;
    let e = direction.dot(w0);

    let denom = c - b * b;
    if denom < PARALLEL_EPSILON * PARALLEL_EPSILON {
        return None;
    }

    let s = (b * e - c * d) / denom;
    let t = (e - b * d) / denom;
    if t < 0.0 {
        return None;
    }

    Some(anchor + Vec3::Y * s)
}

/// Resolve the cursor ray against the surface of `mode`.
pub fn resolve_candidate(
    mode: CaptureMode,
    origin: Vec3,
    direction: Vec3,
    camera_forward: Vec3,
    last_anchor: Option<Vec3>,
    params: SurfaceParams,
) -> Option<Vec3> {
    match mode {
        CaptureMode::Floor => intersect_horizontal_plane(origin, direction, params.ground_height),
        CaptureMode::Wall => {
            let forward = horizontal_forward(camera_forward)?;
            let plane_point =
                last_anchor.unwrap_or_else(|| origin + forward * params.wall_distance);
            intersect_plane(origin, direction, plane_point, -forward)
        }
        CaptureMode::Height => match last_anchor {
            Some(anchor) => closest_on_vertical_line(origin, direction, anchor),
            None => intersect_horizontal_plane(origin, direction, params.ground_height),
        },
    }
}
