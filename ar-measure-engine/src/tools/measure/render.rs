use bevy::prelude::*;
use constants::render_settings::{
    ANCHOR_SPHERE_SIZE, ARCHIVED_CHAIN_COLOUR, ARCHIVED_CHAIN_EMISSIVE, CURRENT_CHAIN_COLOUR,
    CURRENT_CHAIN_EMISSIVE, DRAW_LINE_WIDTH, MIN_RENDER_SEGMENT_LENGTH, PREVIEW_COLOUR,
    PREVIEW_EMISSIVE,
};
use measure_core::MeasurementChain;

use super::pose_provider::CandidatePose;
use super::session::{MeasureSession, to_vec3};

/// Committed anchors and segments, rebuilt whenever the session changes.
#[derive(Component)]
pub struct MeasureVisual;

/// Preview segment from the last anchor to the candidate.
#[derive(Component)]
pub struct MeasurePreview;

/// Mesh and material handles shared by every measuring visual.
#[derive(Resource)]
pub struct MeasureRenderAssets {
    anchor_mesh: Handle<Mesh>,
    segment_mesh: Handle<Mesh>,
    current_material: Handle<StandardMaterial>,
    archived_material: Handle<StandardMaterial>,
    preview_material: Handle<StandardMaterial>,
}

fn line_material(base_color: Color, emissive: LinearRgba) -> StandardMaterial {
    StandardMaterial {
        base_color,
        emissive,
        unlit: true,
        ..default()
    }
}

impl FromWorld for MeasureRenderAssets {
    fn from_world(world: &mut World) -> Self {
        let mut meshes = world.resource_mut::<Assets<Mesh>>();
        let anchor_mesh = meshes.add(Sphere::new(ANCHOR_SPHERE_SIZE));
        // Unit length along X; scaled per segment.
        let segment_mesh = meshes.add(Cuboid::new(1.0, DRAW_LINE_WIDTH, DRAW_LINE_WIDTH));

        let mut materials = world.resource_mut::<Assets<StandardMaterial>>();
        Self {
            anchor_mesh,
            segment_mesh,
            current_material: materials
                .add(line_material(CURRENT_CHAIN_COLOUR, CURRENT_CHAIN_EMISSIVE)),
            archived_material: materials
                .add(line_material(ARCHIVED_CHAIN_COLOUR, ARCHIVED_CHAIN_EMISSIVE)),
            preview_material: materials.add(line_material(PREVIEW_COLOUR, PREVIEW_EMISSIVE)),
        }
    }
}

/// Transform placing the unit segment cuboid between two points, or `None`
/// when the segment is too short to draw.
pub fn segment_transform(start: Vec3, end: Vec3) -> Option<Transform> {
    let dir = end - start;
    let length = dir.length();
    if length < MIN_RENDER_SEGMENT_LENGTH {
        return None;
    }

    let midpoint = (start + end) * 0.5;
    let rotation = Quat::from_rotation_arc(Vec3::X, dir / length);
    Some(
        Transform::from_translation(midpoint)
            .with_rotation(rotation)
            .with_scale(Vec3::new(length, 1.0, 1.0)),
    )
}

fn spawn_chain(
    commands: &mut Commands,
    assets: &MeasureRenderAssets,
    chain: &MeasurementChain,
    material: &Handle<StandardMaterial>,
) {
    for anchor in chain.anchors() {
        commands.spawn((
            Mesh3d(assets.anchor_mesh.clone()),
            MeshMaterial3d(material.clone()),
            Transform::from_translation(to_vec3(*anchor)),
            MeasureVisual,
        ));
    }

    for segment in chain.segments() {
        if let Some(transform) = segment_transform(to_vec3(segment.start), to_vec3(segment.end)) {
            commands.spawn((
                Mesh3d(assets.segment_mesh.clone()),
                MeshMaterial3d(material.clone()),
                transform,
                MeasureVisual,
            ));
        }
    }
}

pub fn update_measure_render(
    mut commands: Commands,
    session: Res<MeasureSession>,
    assets: Res<MeasureRenderAssets>,
    existing: Query<Entity, With<MeasureVisual>>,
) {
    if !session.is_changed() {
        return;
    }

    // Clear committed visuals, rebuild from state
    for e in &existing {
        commands.entity(e).despawn();
    }

    for chain in session.chains() {
        spawn_chain(&mut commands, &assets, chain, &assets.archived_material);
    }
    spawn_chain(&mut commands, &assets, session.current(), &assets.current_material);
}

pub fn update_measure_preview(
    mut commands: Commands,
    session: Res<MeasureSession>,
    candidate: Res<CandidatePose>,
    assets: Res<MeasureRenderAssets>,
    mut existing: Query<(Entity, &mut Transform), With<MeasurePreview>>,
) {
    if !session.is_changed() && !candidate.is_changed() {
        return;
    }

    let wanted = session
        .current()
        .last()
        .map(to_vec3)
        .zip(candidate.position)
        .and_then(|(start, end)| segment_transform(start, end));

    let Some(transform) = wanted else {
        for (e, _) in &existing {
            commands.entity(e).despawn();
        }
        return;
    };

    if let Ok((_, mut current)) = existing.single_mut() {
        *current = transform;
    } else {
        commands.spawn((
            Mesh3d(assets.segment_mesh.clone()),
            MeshMaterial3d(assets.preview_material.clone()),
            transform,
            MeasurePreview,
        ));
    }
}
