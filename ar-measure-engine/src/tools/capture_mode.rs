use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::camera::viewport_camera::ViewportCamera;
use crate::rpc::web_rpc::WebRpcInterface;

/// Which surface the cursor ray is resolved against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureMode {
    #[default]
    Floor,
    Wall,
    Height,
}

impl CaptureMode {
    /// Convert string identifier to capture mode for RPC compatibility.
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "floor" => Some(Self::Floor),
            "wall" => Some(Self::Wall),
            "height" => Some(Self::Height),
            _ => None,
        }
    }

    /// Identifier used in frontend communication.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Floor => "floor",
            Self::Wall => "wall",
            Self::Height => "height",
        }
    }
}

/// Resource holding the active capture mode.
#[derive(Resource, Default)]
pub struct CaptureModeState {
    active_mode: CaptureMode,
}

impl CaptureModeState {
    /// Switch mode. Returns false when the mode was already active.
    pub fn activate(&mut self, mode: CaptureMode) -> bool {
        if self.active_mode == mode {
            return false;
        }

        self.active_mode = mode;
        info!("Capture mode activated: {}", mode.as_str());
        true
    }

    pub fn active_mode(&self) -> CaptureMode {
        self.active_mode
    }
}

/// Source of an input event for debugging and conditional logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Rpc,
    Keyboard,
    Mouse,
}

/// Event fired when the capture mode is switched via RPC or keyboard shortcuts.
#[derive(Event, Debug, Clone, Copy)]
pub struct CaptureModeEvent {
    pub mode: CaptureMode,
    pub source: InputSource,
}

pub fn handle_capture_mode_events(
    mut events: EventReader<CaptureModeEvent>,
    mut capture_mode: ResMut<CaptureModeState>,
    mut viewport_camera: ResMut<ViewportCamera>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for event in events.read() {
        if !capture_mode.activate(event.mode) {
            continue;
        }

        // A hit on the old surface must not bleed into the new one.
        viewport_camera.reset_smoothing();

        info!("Capture mode changed via {:?}", event.source);
        rpc_interface.send_notification(
            "capture_mode_changed",
            serde_json::json!({
                "mode": event.mode.as_str()
            }),
        );
    }
}

/// Native number-key shortcuts; letters are taken by camera movement.
#[cfg(not(target_arch = "wasm32"))]
pub fn handle_capture_mode_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut events: EventWriter<CaptureModeEvent>,
) {
    let mode = if keyboard.just_pressed(KeyCode::Digit1) {
        CaptureMode::Floor
    } else if keyboard.just_pressed(KeyCode::Digit2) {
        CaptureMode::Wall
    } else if keyboard.just_pressed(KeyCode::Digit3) {
        CaptureMode::Height
    } else {
        return;
    };

    events.write(CaptureModeEvent {
        mode,
        source: InputSource::Keyboard,
    });
}

#[cfg(target_arch = "wasm32")]
pub fn handle_capture_mode_shortcuts() {
    // Capture mode is driven by the frontend via RPC.
}
