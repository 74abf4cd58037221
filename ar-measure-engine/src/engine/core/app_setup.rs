use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;
// Crate engine modules
use crate::engine::assets::measure_config::MeasureConfig;
use crate::engine::camera::viewport_camera::{ViewportCamera, camera_controller};
use crate::engine::core::app_state::{AppState, notify_engine_ready};
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::config_loader::{ConfigLoader, load_config_system, start_loading};
use crate::engine::scene::grid::spawn_ground_grid;
use crate::engine::scene::reticle::spawn_reticle;
// Crate tools modules
use crate::tools::measure::MeasureToolPlugin;
#[cfg(not(target_arch = "wasm32"))]
use crate::tools::measure::hud::spawn_measure_hud;
// Web RPC
use crate::rpc::web_rpc::WebRpcPlugin;

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        // Registers MeasureConfig as a loadable asset type from *.measure.json files.
        .add_plugins(JsonAssetPlugin::<MeasureConfig>::new(&["measure.json"]))
        .add_plugins(WebRpcPlugin)
        .add_plugins(MeasureToolPlugin);

    // Initialise resources early
    app.init_resource::<ConfigLoader>()
        .init_resource::<ViewportCamera>();

    // State-based system scheduling
    app.add_systems(Startup, (setup, spawn_reticle, start_loading).chain())
        .add_systems(
            Update,
            load_config_system.run_if(in_state(AppState::Loading)),
        )
        .add_systems(
            OnEnter(AppState::Running),
            (spawn_ground_grid, notify_engine_ready),
        )
        .add_systems(
            Update,
            camera_controller.run_if(in_state(AppState::Running)),
        );

    app
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));
}

fn spawn_viewport_camera(commands: &mut Commands, viewport_camera: &ViewportCamera) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(viewport_camera.focus_point)
            .with_rotation(viewport_camera.view_rotation()),
    ));
}

// Startup system that only handles basic initialisation
fn setup(mut commands: Commands, viewport_camera: Res<ViewportCamera>) {
    spawn_lighting(&mut commands);
    spawn_viewport_camera(&mut commands, &viewport_camera);

    #[cfg(not(target_arch = "wasm32"))]
    {
        spawn_measure_hud(&mut commands);
    }
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
