use bevy::asset::LoadState;
use bevy::prelude::*;
use constants::measure_defaults::MEASURE_CONFIG_PATH;

use crate::engine::assets::measure_config::MeasureConfig;
use crate::engine::camera::viewport_camera::ViewportCamera;
use crate::engine::core::app_state::AppState;
use crate::tools::measure::session::MeasureSession;

#[derive(Resource, Default)]
pub struct ConfigLoader {
    handle: Option<Handle<MeasureConfig>>,
}

// Start the loading process
pub fn start_loading(mut config_loader: ResMut<ConfigLoader>, asset_server: Res<AssetServer>) {
    info!("Loading measuring config from: {}", MEASURE_CONFIG_PATH);
    config_loader.handle = Some(asset_server.load(MEASURE_CONFIG_PATH));
}

/// Apply the config once it resolves, or defaults if it failed to load.
pub fn load_config_system(
    config_loader: Res<ConfigLoader>,
    configs: Res<Assets<MeasureConfig>>,
    asset_server: Res<AssetServer>,
    mut commands: Commands,
    mut session: ResMut<MeasureSession>,
    mut viewport_camera: ResMut<ViewportCamera>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let Some(handle) = config_loader.handle.as_ref() else {
        return;
    };

    let config = if let Some(config) = configs.get(handle) {
        info!("Measuring config loaded");
        config.clone().sanitised()
    } else if let LoadState::Failed(err) = asset_server.load_state(handle.id()) {
        warn!("Measuring config failed to load ({}), using defaults", err);
        MeasureConfig::default()
    } else {
        return;
    };

    apply_config(&config, &mut session, &mut viewport_camera);
    commands.insert_resource(config);
    next_state.set(AppState::Running);
}

fn apply_config(
    config: &MeasureConfig,
    session: &mut MeasureSession,
    viewport_camera: &mut ViewportCamera,
) {
    session.set_unit(config.default_unit);
    *viewport_camera = ViewportCamera::new(config.ground_height, config.intersection_smoothing);
}
