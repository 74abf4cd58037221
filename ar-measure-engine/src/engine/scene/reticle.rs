use bevy::prelude::*;
use constants::render_settings::{
    RETICLE_FALLBACK_COLOUR, RETICLE_INNER_RADIUS, RETICLE_LIFT, RETICLE_OUTER_RADIUS,
    RETICLE_SURFACE_COLOUR,
};

use crate::tools::capture_mode::{CaptureMode, CaptureModeState};
use crate::tools::measure::pose_provider::{CandidatePose, PoseSource};
use crate::tools::measure::surface::horizontal_forward;

#[derive(Component)]
pub struct Reticle;

/// Materials the reticle swaps between depending on the pose source.
#[derive(Resource)]
pub struct ReticleMaterials {
    surface: Handle<StandardMaterial>,
    fallback: Handle<StandardMaterial>,
}

impl ReticleMaterials {
    fn for_source(&self, source: PoseSource) -> Handle<StandardMaterial> {
        match source {
            PoseSource::Surface => self.surface.clone(),
            PoseSource::Fallback => self.fallback.clone(),
        }
    }
}

fn reticle_material(colour: Color) -> StandardMaterial {
    StandardMaterial {
        base_color: colour,
        unlit: true,
        double_sided: true,
        cull_mode: None,
        ..default()
    }
}

pub fn spawn_reticle(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let reticle_materials = ReticleMaterials {
        surface: materials.add(reticle_material(RETICLE_SURFACE_COLOUR)),
        fallback: materials.add(reticle_material(RETICLE_FALLBACK_COLOUR)),
    };

    commands.spawn((
        Mesh3d(meshes.add(Annulus::new(RETICLE_INNER_RADIUS, RETICLE_OUTER_RADIUS))),
        MeshMaterial3d(reticle_materials.surface.clone()),
        Transform::IDENTITY,
        Visibility::Hidden,
        Reticle,
    ));
    commands.insert_resource(reticle_materials);
}

/// Orientation of the ring for a capture mode. The annulus mesh faces +Z.
pub fn reticle_rotation(mode: CaptureMode, camera_forward: Vec3) -> Quat {
    match mode {
        CaptureMode::Floor | CaptureMode::Height => Quat::from_rotation_arc(Vec3::Z, Vec3::Y),
        CaptureMode::Wall => match horizontal_forward(camera_forward) {
            Some(forward) => Quat::from_rotation_arc(Vec3::Z, -forward),
            None => Quat::from_rotation_arc(Vec3::Z, Vec3::Y),
        },
    }
}

/// Move the reticle to the candidate, hiding it when there is none.
pub fn update_reticle(
    mut reticle_query: Query<
        (
            &mut Transform,
            &mut Visibility,
            &mut MeshMaterial3d<StandardMaterial>,
        ),
        With<Reticle>,
    >,
    camera_query: Query<&GlobalTransform, With<Camera3d>>,
    candidate: Res<CandidatePose>,
    capture_mode: Res<CaptureModeState>,
    reticle_materials: Option<Res<ReticleMaterials>>,
) {
    let Ok((mut transform, mut visibility, mut material)) = reticle_query.single_mut() else {
        return;
    };

    let Some(position) = candidate.position else {
        *visibility = Visibility::Hidden;
        return;
    };

    let camera_forward = camera_query
        .single()
        .map(|camera| camera.forward().as_vec3())
        .unwrap_or(Vec3::NEG_Z);

    let rotation = reticle_rotation(capture_mode.active_mode(), camera_forward);
    transform.translation = position + rotation * Vec3::Z * RETICLE_LIFT;
    transform.rotation = rotation;
    *visibility = Visibility::Visible;

    if let Some(reticle_materials) = reticle_materials {
        let wanted = reticle_materials.for_source(candidate.source);
        if material.0 != wanted {
            material.0 = wanted;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn floor_reticle_lies_flat() {
        let rotation = reticle_rotation(CaptureMode::Floor, Vec3::NEG_Z);
        let normal = rotation * Vec3::Z;
        assert_relative_eq!(normal.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn wall_reticle_faces_the_viewer() {
        let forward = Vec3::new(0.0, -0.5, -1.0).normalize();
        let normal = reticle_rotation(CaptureMode::Wall, forward) * Vec3::Z;
        assert_relative_eq!(normal.z, 1.0, epsilon = 1e-6);
        assert_relative_eq!(normal.y, 0.0, epsilon = 1e-6);
    }
}
