use bevy::prelude::*;

use crate::rpc::web_rpc::WebRpcInterface;

/// Config loads first; measuring input is only handled once running.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    Running,
}

/// Tell the frontend the engine accepts measuring commands.
pub fn notify_engine_ready(mut rpc_interface: ResMut<WebRpcInterface>) {
    info!("→ Config applied, transitioning to Running state");
    rpc_interface.send_notification(
        "engine_ready",
        serde_json::json!({
            "state": "running"
        }),
    );
}
