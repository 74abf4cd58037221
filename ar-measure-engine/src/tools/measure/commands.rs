use bevy::prelude::*;
use measure_core::{MeasurementSession, Unit};
use serde_json::{Value, json};

use super::pose_provider::{CandidatePose, PoseSource};
use super::session::MeasureSession;
use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::capture_mode::InputSource;

/// User intents the session understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureCommand {
    Commit,
    Undo,
    NewChain,
    Reset,
    SetUnit(Unit),
    CycleUnit,
}

/// Event carrying a command from keyboard, mouse or RPC.
#[derive(Event, Debug, Clone, Copy)]
pub struct MeasureCommandEvent {
    pub command: MeasureCommand,
    pub source: InputSource,
}

/// Result of one command: the notification to send and whether the session
/// state changed.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutcome {
    pub method: &'static str,
    pub params: Value,
    pub changed: bool,
}

impl CommandOutcome {
    fn changed(method: &'static str, params: Value) -> Self {
        Self {
            method,
            params,
            changed: true,
        }
    }

    fn unchanged(method: &'static str, params: Value) -> Self {
        Self {
            method,
            params,
            changed: false,
        }
    }
}

/// Apply a command to the session and describe what happened.
pub fn apply_command(
    session: &mut MeasurementSession,
    command: MeasureCommand,
    pose_source: PoseSource,
) -> CommandOutcome {
    match command {
        MeasureCommand::Commit => match session.commit_point() {
            Ok(point) => {
                let chain = session.current();
                let segment_meters = chain.segment_length(chain.len().saturating_sub(1));
                let total = chain.total_length();
                CommandOutcome::changed(
                    "measure_point_committed",
                    json!({
                        "point": point,
                        "chain": chain.id(),
                        "anchor_count": chain.len(),
                        "segment_meters": segment_meters,
                        "segment_label": segment_meters.map(|m| session.format_length(m)),
                        "total_meters": total,
                        "total_label": session.format_length(total),
                        "approximate": pose_source.is_approximate(),
                    }),
                )
            }
            Err(err) => {
                warn!("Commit rejected: {}", err);
                CommandOutcome::unchanged("measure_commit_failed", json!({ "reason": err.to_string() }))
            }
        },
        MeasureCommand::Undo => match session.undo_last() {
            Ok(point) => {
                let chain = session.current();
                let total = chain.total_length();
                CommandOutcome::changed(
                    "measure_point_removed",
                    json!({
                        "point": point,
                        "chain": chain.id(),
                        "anchor_count": chain.len(),
                        "total_meters": total,
                        "total_label": session.format_length(total),
                    }),
                )
            }
            Err(err) => {
                warn!("Undo rejected: {}", err);
                CommandOutcome::unchanged("measure_undo_failed", json!({ "reason": err.to_string() }))
            }
        },
        MeasureCommand::NewChain => {
            let archived = session.start_new_chain();
            CommandOutcome::changed(
                "measure_chain_started",
                json!({
                    "archived": archived,
                    "chain": session.current().id(),
                }),
            )
        }
        MeasureCommand::Reset => {
            session.reset_all();
            CommandOutcome::changed("measure_reset", json!({ "chain": session.current().id() }))
        }
        MeasureCommand::SetUnit(unit) => set_unit(session, unit),
        MeasureCommand::CycleUnit => {
            let unit = session.unit().next();
            set_unit(session, unit)
        }
    }
}

fn set_unit(session: &mut MeasurementSession, unit: Unit) -> CommandOutcome {
    let changed = session.unit() != unit;
    session.set_unit(unit);
    CommandOutcome {
        method: "measure_unit_changed",
        params: json!({
            "unit": unit,
            "symbol": unit.symbol(),
        }),
        changed,
    }
}

/// Apply queued commands in order and notify the frontend.
pub fn apply_measure_commands(
    mut events: EventReader<MeasureCommandEvent>,
    mut session: ResMut<MeasureSession>,
    candidate: Res<CandidatePose>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    let mut any_changed = false;

    for event in events.read() {
        debug!("Measure command {:?} via {:?}", event.command, event.source);

        // Failed commands leave the session untouched, so only flag real changes.
        let outcome = apply_command(
            session.bypass_change_detection(),
            event.command,
            candidate.source,
        );
        any_changed |= outcome.changed;
        rpc_interface.send_notification(outcome.method, outcome.params);
    }

    if any_changed {
        session.set_changed();
        send_session_update(&session, &mut rpc_interface);
    }
}

/// Push the full snapshot to the frontend.
pub fn send_session_update(session: &MeasurementSession, rpc_interface: &mut WebRpcInterface) {
    match serde_json::to_value(session.snapshot()) {
        Ok(snapshot) => rpc_interface.send_notification("measure_session_updated", snapshot),
        Err(e) => error!("Failed to serialise session snapshot: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use measure_core::Point3;

    fn session_at(point: Point3) -> MeasurementSession {
        let mut session = MeasurementSession::new();
        session.update_candidate_pose(Some(point));
        session
    }

    #[test]
    fn commit_without_candidate_is_reported_and_unchanged() {
        let mut session = MeasurementSession::new();
        let outcome = apply_command(&mut session, MeasureCommand::Commit, PoseSource::Surface);
        assert_eq!(outcome.method, "measure_commit_failed");
        assert!(!outcome.changed);
        assert!(session.current().is_empty());
    }

    #[test]
    fn second_commit_reports_segment() {
        let mut session = session_at(Point3::new(0.0, 0.0, 0.0));
        apply_command(&mut session, MeasureCommand::Commit, PoseSource::Surface);
        session.update_candidate_pose(Some(Point3::new(3.0, 0.0, 0.0)));
        let outcome = apply_command(&mut session, MeasureCommand::Commit, PoseSource::Surface);

        assert_eq!(outcome.method, "measure_point_committed");
        assert_eq!(outcome.params["anchor_count"], 2);
        assert_eq!(outcome.params["segment_label"], "3.00 m");
        assert_eq!(outcome.params["approximate"], false);
    }

    #[test]
    fn fallback_commit_is_flagged_approximate() {
        let mut session = session_at(Point3::new(0.0, 0.0, -1.0));
        let outcome = apply_command(&mut session, MeasureCommand::Commit, PoseSource::Fallback);
        assert_eq!(outcome.params["approximate"], true);
        assert_eq!(outcome.params["segment_meters"], Value::Null);
    }

    #[test]
    fn undo_on_empty_chain_is_reported() {
        let mut session = MeasurementSession::new();
        let outcome = apply_command(&mut session, MeasureCommand::Undo, PoseSource::Surface);
        assert_eq!(outcome.method, "measure_undo_failed");
        assert!(!outcome.changed);
    }

    #[test]
    fn new_chain_reports_archived_id() {
        let mut session = session_at(Point3::new(0.0, 0.0, 0.0));
        apply_command(&mut session, MeasureCommand::Commit, PoseSource::Surface);
        apply_command(&mut session, MeasureCommand::Commit, PoseSource::Surface);
        let outcome = apply_command(&mut session, MeasureCommand::NewChain, PoseSource::Surface);

        assert_eq!(outcome.params["archived"], 0);
        assert_eq!(outcome.params["chain"], 1);
        assert_eq!(session.chains().len(), 1);
    }

    #[test]
    fn cycle_unit_walks_all_units() {
        let mut session = MeasurementSession::new();
        let outcome = apply_command(&mut session, MeasureCommand::CycleUnit, PoseSource::Surface);
        assert_eq!(outcome.params["unit"], "feet");
        assert_eq!(session.unit(), Unit::Feet);

        let same = apply_command(
            &mut session,
            MeasureCommand::SetUnit(Unit::Feet),
            PoseSource::Surface,
        );
        assert!(!same.changed);
    }

    fn command_app() -> App {
        let mut app = App::new();
        app.add_event::<MeasureCommandEvent>()
            .init_resource::<MeasureSession>()
            .init_resource::<CandidatePose>()
            .init_resource::<WebRpcInterface>()
            .add_systems(Update, apply_measure_commands);
        app
    }

    fn send(app: &mut App, command: MeasureCommand) {
        app.world_mut().send_event(MeasureCommandEvent {
            command,
            source: InputSource::Rpc,
        });
    }

    #[test]
    fn commands_apply_in_order_and_publish_snapshot() {
        let mut app = command_app();
        app.world_mut()
            .resource_mut::<MeasureSession>()
            .update_candidate_pose(Some(Point3::new(1.0, 0.0, 0.0)));

        send(&mut app, MeasureCommand::Commit);
        send(&mut app, MeasureCommand::Undo);
        send(&mut app, MeasureCommand::Commit);
        app.update();

        let session = app.world().resource::<MeasureSession>();
        assert_eq!(session.current().len(), 1);

        let methods = app.world().resource::<WebRpcInterface>().notification_methods();
        assert_eq!(
            methods,
            vec![
                "measure_point_committed",
                "measure_point_removed",
                "measure_point_committed",
                "measure_session_updated",
            ]
        );
    }

    #[test]
    fn failed_command_publishes_no_snapshot() {
        let mut app = command_app();
        send(&mut app, MeasureCommand::Undo);
        app.update();

        let methods = app.world().resource::<WebRpcInterface>().notification_methods();
        assert_eq!(methods, vec!["measure_undo_failed"]);
    }
}
