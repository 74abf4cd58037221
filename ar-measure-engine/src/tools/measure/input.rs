use bevy::prelude::*;

use super::commands::{MeasureCommand, MeasureCommandEvent};
use crate::tools::capture_mode::InputSource;

/// Left click commits the candidate on every platform.
pub fn handle_measure_mouse_input(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut commands: EventWriter<MeasureCommandEvent>,
) {
    if mouse_button.just_pressed(MouseButton::Left) {
        commands.write(MeasureCommandEvent {
            command: MeasureCommand::Commit,
            source: InputSource::Mouse,
        });
    }
}

/// Map a key press to a measuring command.
#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
pub fn command_for_key(key: KeyCode) -> Option<MeasureCommand> {
    match key {
        KeyCode::KeyZ | KeyCode::Backspace => Some(MeasureCommand::Undo),
        KeyCode::KeyN | KeyCode::Enter => Some(MeasureCommand::NewChain),
        KeyCode::KeyR => Some(MeasureCommand::Reset),
        KeyCode::KeyU => Some(MeasureCommand::CycleUnit),
        _ => None,
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn handle_measure_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut commands: EventWriter<MeasureCommandEvent>,
) {
    for key in keyboard.get_just_pressed() {
        if let Some(command) = command_for_key(*key) {
            commands.write(MeasureCommandEvent {
                command,
                source: InputSource::Keyboard,
            });
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub fn handle_measure_keyboard_shortcuts() {
    // Measuring commands arrive from the frontend via RPC.
}
