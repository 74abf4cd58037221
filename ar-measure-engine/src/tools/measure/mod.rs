//! Point-to-point measuring tool.
//!
//! The cursor ray is resolved into a candidate pose every frame; commands
//! from the mouse, keyboard or RPC are applied to the shared
//! [`MeasureSession`](session::MeasureSession) in one place, which then
//! notifies the frontend and lets the render and HUD systems catch up.
//!
//! ```text
//! cursor ──> update_candidate_pose_system ──> CandidatePose + session candidate
//! click/keys/RPC ──> MeasureCommandEvent ──> apply_measure_commands
//!                                              ├─> session mutation
//!                                              └─> RPC notifications
//! session changes ──> update_measure_render / update_measure_hud
//! ```

use bevy::prelude::*;

use crate::engine::core::app_state::AppState;
use crate::engine::scene::reticle::update_reticle;
use crate::tools::capture_mode::{
    CaptureModeEvent, CaptureModeState, handle_capture_mode_events, handle_capture_mode_shortcuts,
};

pub mod commands;
pub mod hud;
pub mod input;
pub mod live;
pub mod pose_provider;
pub mod render;
pub mod session;
pub mod surface;

use commands::{MeasureCommandEvent, apply_measure_commands};
use hud::update_measure_hud;
use input::{handle_measure_keyboard_shortcuts, handle_measure_mouse_input};
use live::live_length_notification_system;
use pose_provider::{CandidatePose, update_candidate_pose_system};
use render::{MeasureRenderAssets, update_measure_preview, update_measure_render};
use session::MeasureSession;

pub struct MeasureToolPlugin;

impl Plugin for MeasureToolPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MeasureSession>()
            .init_resource::<CandidatePose>()
            .init_resource::<CaptureModeState>()
            .init_resource::<MeasureRenderAssets>()
            .add_event::<MeasureCommandEvent>()
            .add_event::<CaptureModeEvent>()
            .add_systems(
                Update,
                (
                    // Input, native shortcuts or no-op for WASM
                    handle_capture_mode_shortcuts,
                    handle_measure_keyboard_shortcuts,
                    handle_measure_mouse_input,
                    handle_capture_mode_events,
                    // Candidate before commands so a click commits this frame's pose
                    update_candidate_pose_system,
                    apply_measure_commands,
                    live_length_notification_system,
                    // Presentation
                    update_measure_render,
                    update_measure_preview,
                    update_reticle,
                    update_measure_hud,
                )
                    .chain()
                    .run_if(in_state(AppState::Running)),
            );
    }
}
