//! Flat reference grid on the configured ground plane.
use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::view::NoFrustumCulling;
use constants::render_settings::{GRID_CELL_SIZE, GRID_COLOUR, GRID_HALF_EXTENT};

use crate::engine::assets::measure_config::MeasureConfig;

#[derive(Component)]
pub struct GroundGrid;

/// Spawn the grid once the config (and so the ground height) is known.
pub fn spawn_ground_grid(
    mut commands: Commands,
    config: Option<Res<MeasureConfig>>,
    existing: Query<Entity, With<GroundGrid>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for entity in &existing {
        commands.entity(entity).despawn();
    }

    let ground_height = config.map(|c| c.ground_height).unwrap_or_default();

    let grid_material = materials.add(StandardMaterial {
        base_color: GRID_COLOUR,
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });

    commands.spawn((
        Mesh3d(meshes.add(create_grid_mesh(GRID_HALF_EXTENT, GRID_CELL_SIZE))),
        MeshMaterial3d(grid_material),
        Visibility::Visible,
        NoFrustumCulling,
        Transform::from_xyz(0.0, ground_height, 0.0),
        GroundGrid,
    ));
}

/// Line list covering `[-half_extent, half_extent]` on both X and Z at y = 0.
fn create_grid_mesh(half_extent: f32, cell_size: f32) -> Mesh {
    let positions = grid_line_positions(half_extent, cell_size);
    let indices: Vec<u32> = (0..positions.len() as u32).collect();

    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::RENDER_WORLD);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_indices(Indices::U32(indices));

    mesh
}

fn grid_line_positions(half_extent: f32, cell_size: f32) -> Vec<[f32; 3]> {
    let line_count = ((2.0 * half_extent) / cell_size).round().max(1.0) as u32;
    let spacing = (2.0 * half_extent) / line_count as f32;

    let mut positions = Vec::with_capacity(((line_count + 1) * 4) as usize);
    for i in 0..=line_count {
        let offset = -half_extent + i as f32 * spacing;
        // Line along Z at fixed X
        positions.push([offset, 0.0, -half_extent]);
        positions.push([offset, 0.0, half_extent]);
        // Line along X at fixed Z
        positions.push([-half_extent, 0.0, offset]);
        positions.push([half_extent, 0.0, offset]);
    }

    positions
}
