use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::session::{MeasureSession, to_point3, to_vec3};
use super::surface::{SurfaceParams, fallback_point, resolve_candidate};
use crate::engine::assets::measure_config::MeasureConfig;
use crate::engine::camera::viewport_camera::ViewportCamera;
use crate::tools::capture_mode::CaptureModeState;

/// How the candidate pose was obtained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PoseSource {
    /// The ray hit the active capture surface.
    #[default]
    Surface,
    /// Nothing was hit; the point sits a fixed distance along the ray.
    Fallback,
}

impl PoseSource {
    pub fn is_approximate(&self) -> bool {
        matches!(self, Self::Fallback)
    }
}

/// This frame's candidate in world space, for the reticle and preview.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct CandidatePose {
    pub position: Option<Vec3>,
    pub source: PoseSource,
}

/// Resolve the cursor into a candidate and offer it to the session.
pub fn update_candidate_pose_system(
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    capture_mode: Res<CaptureModeState>,
    config: Option<Res<MeasureConfig>>,
    mut viewport_camera: ResMut<ViewportCamera>,
    mut candidate: ResMut<CandidatePose>,
    mut session: ResMut<MeasureSession>,
) {
    let ray = match (windows.single(), camera_query.single()) {
        (Ok(window), Ok((camera, camera_transform))) => window
            .cursor_position()
            .and_then(|cursor| ViewportCamera::cursor_ray(cursor, camera, camera_transform))
            .map(|ray| (ray, camera_transform.forward().as_vec3())),
        _ => None,
    };

    let config = config.map(|c| c.clone()).unwrap_or_default();
    let params = SurfaceParams {
        ground_height: config.ground_height,
        wall_distance: config.wall_distance,
    };
    let last_anchor = session.current().last().map(to_vec3);
    viewport_camera.track_anchor(last_anchor);

    let next = match ray {
        Some((ray, camera_forward)) => {
            let origin = ray.origin;
            let direction = ray.direction.as_vec3();
            let hit = resolve_candidate(
                capture_mode.active_mode(),
                origin,
                direction,
                camera_forward,
                last_anchor,
                params,
            );

            match viewport_camera.smooth_intersection(hit) {
                Some(position) => CandidatePose {
                    position: Some(position),
                    source: PoseSource::Surface,
                },
                None => CandidatePose {
                    position: config
                        .fallback_distance
                        .and_then(|distance| fallback_point(origin, direction, distance)),
                    source: PoseSource::Fallback,
                },
            }
        }
        None => {
            viewport_camera.reset_smoothing();
            CandidatePose::default()
        }
    };

    candidate.set_if_neq(next);

    // Bypassed so `is_changed` on the session only reflects committed state.
    let pose = next.position.map(to_point3);
    if session.candidate_pose() != pose {
        session.bypass_change_detection().update_candidate_pose(pose);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_fallback_is_approximate() {
        assert!(PoseSource::Fallback.is_approximate());
        assert!(!PoseSource::Surface.is_approximate());
    }

    #[test]
    fn missing_camera_clears_candidate() {
        let mut app = App::new();
        app.init_resource::<CaptureModeState>()
            .init_resource::<ViewportCamera>()
            .init_resource::<CandidatePose>()
            .init_resource::<MeasureSession>()
            .add_systems(Update, update_candidate_pose_system);

        // No window or camera: the candidate is cleared.
        app.world_mut()
            .resource_mut::<MeasureSession>()
            .update_candidate_pose(Some(measure_core::Point3::new(1.0, 0.0, 0.0)));
        app.update();

        let session = app.world().resource::<MeasureSession>();
        assert_eq!(session.candidate_pose(), None);
        assert_eq!(app.world().resource::<CandidatePose>().position, None);
    }
}
