use std::str::FromStr;

use bevy::prelude::*;
use measure_core::{MeasurementSession, Unit};
use serde::{Deserialize, Serialize};

use crate::engine::core::app_state::AppState;
use crate::tools::capture_mode::{CaptureMode, CaptureModeEvent, InputSource};
use crate::tools::measure::commands::{MeasureCommand, MeasureCommandEvent};
use crate::tools::measure::session::MeasureSession;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC error structure following specification.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Resource managing bidirectional RPC communication between the frontend and Bevy.
/// Handles both request-response patterns and notification broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the frontend without expecting response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Queue response for transmission to the frontend.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }

    /// Methods of queued notifications, oldest first.
    #[cfg(test)]
    pub(crate) fn notification_methods(&self) -> Vec<&str> {
        self.outgoing_notifications
            .iter()
            .map(|n| n.method.as_str())
            .collect()
    }
}

/// Plugin establishing WebRPC communication layer for iframe-based deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    // Thread-safe message queue for cross-thread communication.
    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        // Filter messages to ensure they contain string data.
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Some(window) = window() {
        if let Err(e) =
            window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
        {
            error!("Failed to register message listener: {:?}", e);
        }
    }

    // Prevent closure from being dropped by transferring ownership to JS.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Resource wrapping thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Event representing incoming RPC message from the frontend.
#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

/// Work a request hands to the rest of the app.
#[derive(Debug, Clone, Copy, PartialEq)]
enum RpcDispatch {
    Measure(MeasureCommand),
    CaptureMode(CaptureMode),
}

/// Result of one request, before it is turned into a response.
#[derive(Debug, Clone, PartialEq)]
struct RpcOutcome {
    result: Result<serde_json::Value, RpcError>,
    dispatch: Option<RpcDispatch>,
}

impl RpcOutcome {
    fn reply(result: Result<serde_json::Value, RpcError>) -> Self {
        Self {
            result,
            dispatch: None,
        }
    }
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    session: Res<MeasureSession>,
    state: Res<State<AppState>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut measure_events: EventWriter<MeasureCommandEvent>,
    mut capture_events: EventWriter<CaptureModeEvent>,
) {
    for event in events.read() {
        let request = match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => request,
            Err(parse_error) => {
                warn!("Unparseable RPC message: {}", parse_error);
                rpc_interface.send_notification(
                    "debug_message",
                    serde_json::json!({
                        "message": format!("Parse error: {}", parse_error)
                    }),
                );
                continue;
            }
        };

        debug!("Processing RPC method: {}", request.method);
        let running = *state.get() == AppState::Running;
        let outcome = handle_rpc_request(&request, &session, running);

        match outcome.dispatch {
            Some(RpcDispatch::Measure(command)) => {
                measure_events.write(MeasureCommandEvent {
                    command,
                    source: InputSource::Rpc,
                });
            }
            Some(RpcDispatch::CaptureMode(mode)) => {
                capture_events.write(CaptureModeEvent {
                    mode,
                    source: InputSource::Rpc,
                });
            }
            None => {}
        }

        // Requests without an id are notifications and get no response.
        if let Some(id) = request.id {
            rpc_interface.queue_response(create_response(id, outcome.result));
        }
    }
}

/// Handle one request. Commands are only dispatched once the engine is
/// running; before that they are rejected so the frontend can retry.
fn handle_rpc_request(
    request: &RpcRequest,
    session: &MeasurementSession,
    running: bool,
) -> RpcOutcome {
    let outcome = route_rpc_request(request, session);
    if outcome.dispatch.is_some() && !running {
        warn!("RPC {} rejected: engine still loading", request.method);
        return RpcOutcome::reply(Err(RpcError::not_ready(&request.method)));
    }
    outcome
}

fn route_rpc_request(request: &RpcRequest, session: &MeasurementSession) -> RpcOutcome {
    if let Some(parsed) = parse_measure_command(&request.method, &request.params) {
        return match parsed {
            Ok(command) => {
                info!("Measure command dispatched: {:?}", command);
                RpcOutcome {
                    result: Ok(serde_json::json!({
                        "accepted": true,
                        "method": request.method
                    })),
                    dispatch: Some(RpcDispatch::Measure(command)),
                }
            }
            Err(error) => RpcOutcome::reply(Err(error)),
        };
    }

    match request.method.as_str() {
        "measure_get_session" => RpcOutcome::reply(handle_get_session(session)),
        "capture_mode_selection" => match parse_capture_mode(&request.params) {
            Ok(mode) => RpcOutcome {
                result: Ok(serde_json::json!({
                    "success": true,
                    "mode": mode.as_str()
                })),
                dispatch: Some(RpcDispatch::CaptureMode(mode)),
            },
            Err(error) => RpcOutcome::reply(Err(error)),
        },
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            RpcOutcome::reply(Err(RpcError::method_not_found(&request.method)))
        }
    }
}

/// Map a measuring method to its command. `None` for any other method.
fn parse_measure_command(
    method: &str,
    params: &serde_json::Value,
) -> Option<Result<MeasureCommand, RpcError>> {
    let command = match method {
        "measure_commit" => MeasureCommand::Commit,
        "measure_undo" => MeasureCommand::Undo,
        "measure_new_chain" => MeasureCommand::NewChain,
        "measure_reset" => MeasureCommand::Reset,
        "measure_cycle_unit" => MeasureCommand::CycleUnit,
        "measure_set_unit" => return Some(parse_unit(params).map(MeasureCommand::SetUnit)),
        _ => return None,
    };
    Some(Ok(command))
}

fn parse_unit(params: &serde_json::Value) -> Result<Unit, RpcError> {
    #[derive(serde::Deserialize)]
    struct SetUnitParams {
        unit: String,
    }

    let unit_params = serde_json::from_value::<SetUnitParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'unit' parameter"))?;

    Unit::from_str(&unit_params.unit).map_err(|e| RpcError::invalid_params(&e.to_string()))
}

fn parse_capture_mode(params: &serde_json::Value) -> Result<CaptureMode, RpcError> {
    #[derive(serde::Deserialize)]
    struct CaptureModeParams {
        mode: String,
    }

    let mode_params = serde_json::from_value::<CaptureModeParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'mode' parameter"))?;

    CaptureMode::from_string(&mode_params.mode).ok_or_else(|| {
        RpcError::invalid_params(&format!("Unknown capture mode: {}", mode_params.mode))
    })
}

/// Snapshot of the whole session.
fn handle_get_session(session: &MeasurementSession) -> Result<serde_json::Value, RpcError> {
    serde_json::to_value(session.snapshot())
        .map_err(|e| RpcError::internal_error(&format!("Failed to serialise session: {e}")))
}

fn create_response(
    id: serde_json::Value,
    result: Result<serde_json::Value, RpcError>,
) -> RpcResponse {
    match result {
        Ok(result_value) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        },
        Err(error) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        },
    }
}

/// Send queued notifications and responses to the frontend.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    // Send notifications first.
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    // Send responses second to maintain order.
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send serialized message to parent window.
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        // No-op for non-WASM targets.
        let _ = message;
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: "Method not found".to_string(),
            data: Some(serde_json::json!({ "method": method })),
        }
    }

    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }

    /// Server-defined error for commands sent before `engine_ready`.
    pub fn not_ready(method: &str) -> Self {
        Self {
            code: -32000,
            message: "Engine is still loading".to_string(),
            data: Some(serde_json::json!({ "method": method })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use measure_core::Point3;

    fn request(method: &str, params: serde_json::Value) -> RpcRequest {
        RpcRequest {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id: Some(serde_json::json!(1)),
        }
    }

    #[test]
    fn missing_params_default_to_null() {
        let parsed: RpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"measure_commit","id":3}"#).unwrap();
        assert_eq!(parsed.params, serde_json::Value::Null);
    }

    #[test]
    fn plain_methods_map_to_commands() {
        let params = serde_json::Value::Null;
        assert_eq!(
            parse_measure_command("measure_undo", &params),
            Some(Ok(MeasureCommand::Undo))
        );
        assert_eq!(
            parse_measure_command("measure_new_chain", &params),
            Some(Ok(MeasureCommand::NewChain))
        );
        assert_eq!(parse_measure_command("get_fps", &params), None);
    }

    #[test]
    fn set_unit_accepts_symbols_and_rejects_garbage() {
        assert_eq!(
            parse_measure_command("measure_set_unit", &serde_json::json!({ "unit": "ft" })),
            Some(Ok(MeasureCommand::SetUnit(Unit::Feet)))
        );

        let Some(Err(error)) =
            parse_measure_command("measure_set_unit", &serde_json::json!({ "unit": "yards" }))
        else {
            panic!("expected invalid params");
        };
        assert_eq!(error.code, -32602);

        let Some(Err(missing)) = parse_measure_command("measure_set_unit", &serde_json::Value::Null)
        else {
            panic!("expected invalid params");
        };
        assert_eq!(missing.code, -32602);
    }

    #[test]
    fn unknown_method_is_not_found() {
        let outcome = handle_rpc_request(
            &request("measure_teleport", serde_json::Value::Null),
            &MeasurementSession::new(),
            true,
        );
        assert_eq!(outcome.dispatch, None);
        assert_eq!(outcome.result.unwrap_err().code, -32601);
    }

    #[test]
    fn commit_request_is_dispatched() {
        let outcome = handle_rpc_request(
            &request("measure_commit", serde_json::Value::Null),
            &MeasurementSession::new(),
            true,
        );
        assert_eq!(outcome.dispatch, Some(RpcDispatch::Measure(MeasureCommand::Commit)));
        assert!(outcome.result.is_ok());
    }

    #[test]
    fn capture_mode_selection_validates_mode() {
        let session = MeasurementSession::new();
        let ok = handle_rpc_request(
            &request("capture_mode_selection", serde_json::json!({ "mode": "wall" })),
            &session,
            true,
        );
        assert_eq!(ok.dispatch, Some(RpcDispatch::CaptureMode(CaptureMode::Wall)));

        let bad = handle_rpc_request(
            &request("capture_mode_selection", serde_json::json!({ "mode": "roof" })),
            &session,
            true,
        );
        assert_eq!(bad.dispatch, None);
        assert_eq!(bad.result.unwrap_err().code, -32602);
    }

    #[test]
    fn get_session_returns_snapshot() {
        let mut session = MeasurementSession::new();
        session.update_candidate_pose(Some(Point3::new(0.0, 0.0, 0.0)));
        session.commit_point().unwrap();

        let outcome = handle_rpc_request(
            &request("measure_get_session", serde_json::Value::Null),
            &session,
            true,
        );
        let value = outcome.result.unwrap();
        assert_eq!(value["unit"], "meters");
        assert_eq!(value["current"]["anchors"].as_array().map(Vec::len), Some(1));
        assert_eq!(value["can_undo"], true);
    }

    #[test]
    fn commands_are_rejected_while_loading() {
        let session = MeasurementSession::new();
        for req in [
            request("measure_commit", serde_json::Value::Null),
            request("capture_mode_selection", serde_json::json!({ "mode": "floor" })),
        ] {
            let outcome = handle_rpc_request(&req, &session, false);
            assert_eq!(outcome.dispatch, None);
            assert_eq!(outcome.result, Err(RpcError::not_ready(&req.method)));
        }

        // Reads are served regardless.
        let read = handle_rpc_request(
            &request("measure_get_session", serde_json::Value::Null),
            &session,
            false,
        );
        assert!(read.result.is_ok());
    }

    fn rpc_app(state: AppState) -> App {
        let mut app = App::new();
        app.add_plugins((bevy::state::app::StatesPlugin, WebRpcPlugin))
            .insert_state(state)
            .init_resource::<MeasureSession>()
            .add_event::<MeasureCommandEvent>()
            .add_event::<CaptureModeEvent>();
        app
    }

    fn queued_commands(app: &App) -> Vec<MeasureCommand> {
        let events = app.world().resource::<Events<MeasureCommandEvent>>();
        let mut cursor = events.get_cursor();
        cursor.read(events).map(|e| e.command).collect()
    }

    #[test]
    fn rpc_message_reaches_command_queue() {
        let mut app = rpc_app(AppState::Running);
        app.world_mut().send_event(IncomingRpcMessage {
            content: r#"{"jsonrpc":"2.0","method":"measure_reset"}"#.to_string(),
        });
        app.update();

        assert_eq!(queued_commands(&app), vec![MeasureCommand::Reset]);
    }

    #[test]
    fn rpc_message_during_loading_is_not_queued() {
        let mut app = rpc_app(AppState::Loading);
        app.world_mut().send_event(IncomingRpcMessage {
            content: r#"{"jsonrpc":"2.0","method":"measure_commit","id":7}"#.to_string(),
        });
        app.update();

        assert!(queued_commands(&app).is_empty());
    }
}
