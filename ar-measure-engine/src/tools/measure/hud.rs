use std::fmt::Write as _;

use bevy::prelude::*;
use measure_core::MeasurementSession;

use super::pose_provider::CandidatePose;
use super::session::MeasureSession;
use crate::tools::capture_mode::{CaptureMode, CaptureModeState};

#[derive(Component)]
pub struct MeasureHudText;

const KEY_HELP: &str =
    "Click: place point | Z: undo | N: new chain | R: reset | U: unit | 1/2/3: floor/wall/height";

#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
pub fn spawn_measure_hud(commands: &mut Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(12.0),
                    left: Val::Px(12.0),
                    ..default()
                },
                MeasureHudText,
            ));
        });
}

/// One-line guidance for the next user action.
pub fn status_prompt(anchor_count: usize, candidate: &CandidatePose) -> String {
    if candidate.position.is_none() {
        return "No surface detected. Point at the floor to measure.".to_string();
    }

    let prompt = match anchor_count {
        0 => "Click to place the first point.",
        1 => "Click to place the second point.",
        _ => "Click to place the next point, or N to finish the chain.",
    };

    if candidate.source.is_approximate() {
        format!("{prompt} (approximate placement)")
    } else {
        prompt.to_string()
    }
}

pub fn hud_text(session: &MeasurementSession, candidate: &CandidatePose, mode: CaptureMode) -> String {
    let view = session.snapshot();
    let mut text = String::new();

    let _ = writeln!(text, "{}", status_prompt(view.current.anchors.len(), candidate));
    let _ = writeln!(text, "Mode: {} | Unit: {}", mode.as_str(), view.unit.name());

    let _ = writeln!(
        text,
        "Current chain: {} segments, total {}",
        view.current.segments.len(),
        view.current.total_label
    );
    for (i, segment) in view.current.segments.iter().enumerate() {
        let _ = writeln!(text, "  {}: {}", i + 1, segment.label);
    }
    if let Some(live) = &view.live_segment {
        let _ = writeln!(text, "  live: {}", live.label);
    }

    if !view.archived.is_empty() {
        let _ = writeln!(text, "Archived:");
        for chain in &view.archived {
            let _ = writeln!(text, "  #{}: {}", chain.id.0, chain.total_label);
        }
    }

    text.push_str(KEY_HELP);
    text
}

pub fn update_measure_hud(
    session: Res<MeasureSession>,
    candidate: Res<CandidatePose>,
    capture_mode: Res<CaptureModeState>,
    mut query: Query<&mut Text, With<MeasureHudText>>,
) {
    if !(session.is_changed() || candidate.is_changed() || capture_mode.is_changed()) {
        return;
    }

    for mut text in &mut query {
        text.0 = hud_text(&session, &candidate, capture_mode.active_mode());
    }
}
