use bevy::input::mouse::MouseScrollUnit;
use bevy::math::EulerRot;
use bevy::{
    input::mouse::{MouseMotion, MouseWheel},
    prelude::*,
};
use constants::measure_defaults::{GROUND_HEIGHT, INTERSECTION_SMOOTHING};

/// Eye height the viewer starts at, roughly a handheld phone.
const START_EYE_HEIGHT: f32 = 1.6;

#[derive(Resource)]
pub struct ViewportCamera {
    pub focus_point: Vec3,
    pub pitch: f32,
    pub yaw: f32,
    // Smoothing for surface hits
    pub last_intersection: Option<Vec3>,
    pub intersection_smooth_factor: f32,
    // Anchor the smoothed hits were resolved against
    smoothing_anchor: Option<Vec3>,
}

impl ViewportCamera {
    pub fn new(ground_height: f32, intersection_smooth_factor: f32) -> Self {
        Self {
            focus_point: Vec3::new(0.0, ground_height + START_EYE_HEIGHT, 3.0),
            pitch: -0.5,
            yaw: 0.0,
            last_intersection: None,
            intersection_smooth_factor: intersection_smooth_factor.clamp(0.01, 1.0),
            smoothing_anchor: None,
        }
    }

    /// Cursor ray through the 3D camera.
    pub fn cursor_ray(
        cursor_pos: Vec2,
        camera: &Camera,
        camera_transform: &GlobalTransform,
    ) -> Option<Ray3d> {
        camera.viewport_to_world(camera_transform, cursor_pos).ok()
    }

    /// Temporal smoothing to reduce jitter. Losing the hit resets the filter
    /// so the next hit snaps instead of sliding in from a stale position.
    pub fn smooth_intersection(&mut self, intersection: Option<Vec3>) -> Option<Vec3> {
        match (intersection, self.last_intersection) {
            (Some(new_pos), Some(last_pos)) => {
                let smoothed = last_pos.lerp(new_pos, self.intersection_smooth_factor);
                self.last_intersection = Some(smoothed);
                Some(smoothed)
            }
            (Some(new_pos), None) => {
                self.last_intersection = Some(new_pos);
                Some(new_pos)
            }
            (None, _) => {
                self.last_intersection = None;
                None
            }
        }
    }

    pub fn reset_smoothing(&mut self) {
        self.last_intersection = None;
    }

    /// Wall and height surfaces hang off the chain's last anchor, so a new
    /// anchor moves the surface and the next hit must snap to it.
    pub fn track_anchor(&mut self, anchor: Option<Vec3>) {
        if self.smoothing_anchor != anchor {
            self.smoothing_anchor = anchor;
            self.reset_smoothing();
        }
    }

    pub fn view_rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }
}

impl Default for ViewportCamera {
    fn default() -> Self {
        Self::new(GROUND_HEIGHT, INTERSECTION_SMOOTHING)
    }
}

pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    mut viewport_camera: ResMut<ViewportCamera>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();

    // Right drag looks around
    if mouse_button.pressed(MouseButton::Right) && mouse_delta != Vec2::ZERO {
        let yaw_sens = 0.0035;
        let pitch_sens = 0.0030;
        viewport_camera.yaw += -mouse_delta.x * yaw_sens;
        viewport_camera.pitch += -mouse_delta.y * pitch_sens;
        viewport_camera.pitch = viewport_camera.pitch.clamp(-1.55, 1.55);
    }

    let mut scroll_accum = 0.0;
    for ev in scroll_events.read() {
        scroll_accum += match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        };
    }

    let view_rot = viewport_camera.view_rotation();
    let forward = view_rot * Vec3::NEG_Z;
    let right = view_rot * Vec3::X;

    // Scroll dollies along the view direction
    if scroll_accum.abs() > f32::EPSILON {
        let dolly_speed = 0.25;
        viewport_camera.focus_point += forward * (scroll_accum * dolly_speed);
    }

    let mut move_input = Vec3::ZERO;
    if keyboard.pressed(KeyCode::KeyW) { move_input.z += 1.0; }
    if keyboard.pressed(KeyCode::KeyS) { move_input.z -= 1.0; }
    if keyboard.pressed(KeyCode::KeyD) { move_input.x += 1.0; }
    if keyboard.pressed(KeyCode::KeyA) { move_input.x -= 1.0; }
    if keyboard.pressed(KeyCode::KeyE) { move_input.y += 1.0; } // Up
    if keyboard.pressed(KeyCode::KeyQ) { move_input.y -= 1.0; } // Down

    if move_input != Vec3::ZERO {
        // Shift = faster, ctrl = slower
        let mut speed = 1.5;
        if keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]) { speed *= 3.5; }
        if keyboard.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]) { speed *= 0.25; }

        let world_delta = right * move_input.x + Vec3::Y * move_input.y + forward * move_input.z;
        viewport_camera.focus_point += world_delta.normalize() * speed * time.delta_secs();
    }

    let lerp_speed = (12.0 * time.delta_secs()).min(1.0);
    camera_transform.translation = camera_transform
        .translation
        .lerp(viewport_camera.focus_point, lerp_speed);
    camera_transform.rotation = camera_transform.rotation.slerp(view_rot, lerp_speed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothing_snaps_on_first_hit() {
        let mut camera = ViewportCamera::new(0.0, 0.5);
        let hit = Vec3::new(1.0, 0.0, 2.0);
        assert_eq!(camera.smooth_intersection(Some(hit)), Some(hit));
    }

    #[test]
    fn smoothing_lerps_toward_new_hit() {
        let mut camera = ViewportCamera::new(0.0, 0.5);
        camera.smooth_intersection(Some(Vec3::ZERO));
        let smoothed = camera.smooth_intersection(Some(Vec3::new(2.0, 0.0, 0.0)));
        assert_eq!(smoothed, Some(Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn losing_the_hit_resets_smoothing() {
        let mut camera = ViewportCamera::new(0.0, 0.5);
        camera.smooth_intersection(Some(Vec3::ZERO));
        assert_eq!(camera.smooth_intersection(None), None);

        let hit = Vec3::new(4.0, 0.0, 0.0);
        assert_eq!(camera.smooth_intersection(Some(hit)), Some(hit));
    }

    #[test]
    fn anchor_change_snaps_to_new_surface() {
        let mut camera = ViewportCamera::new(0.0, 0.35);
        let top = Vec3::new(0.0, 2.0, -2.0);
        let floor = Vec3::new(0.0, 0.0, -2.0);

        // Height mode tracking the top of a chain.
        camera.track_anchor(Some(Vec3::new(0.0, 0.0, -2.0)));
        camera.smooth_intersection(Some(top));

        // New chain: no anchor, the ray falls back to the floor.
        camera.track_anchor(None);
        assert_eq!(camera.smooth_intersection(Some(floor)), Some(floor));
    }

    #[test]
    fn same_anchor_keeps_smoothing() {
        let mut camera = ViewportCamera::new(0.0, 0.5);
        let anchor = Some(Vec3::ZERO);

        camera.track_anchor(anchor);
        camera.smooth_intersection(Some(Vec3::ZERO));
        camera.track_anchor(anchor);
        let smoothed = camera.smooth_intersection(Some(Vec3::new(0.0, 2.0, 0.0)));
        assert_eq!(smoothed, Some(Vec3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn smoothing_factor_is_clamped() {
        assert_eq!(ViewportCamera::new(0.0, 5.0).intersection_smooth_factor, 1.0);
        assert!(ViewportCamera::new(0.0, 0.0).intersection_smooth_factor > 0.0);
    }
}
