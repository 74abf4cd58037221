//! JSON-RPC 2.0 bridge between the engine and a hosting web page.
//!
//! In WASM builds the engine runs inside an iframe and exchanges JSON strings
//! with the parent window through `postMessage`. Native builds keep the same
//! request handling but drop outgoing messages.
//!
//! ```text
//! Parent page  <──postMessage──>  Bevy (iframe)
//!     ├─ request {id} ───────────────> handle_rpc_messages
//!     │                                  ├─ MeasureCommandEvent / CaptureModeEvent
//!     │ <──────────── response {id} ─────┤
//!     │ <───── notification (no id) ─── apply_measure_commands, ...
//! ```
//!
//! Requests without an `id` are still executed but get no response.
//!
//! ## Error Codes
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error
//!
//! ## Methods
//!
//! ### Measuring
//! - `measure_commit`: Commit the current candidate point
//! - `measure_undo`: Remove the last point of the current chain
//! - `measure_new_chain`: Finish the current chain and start another
//! - `measure_reset`: Clear every chain
//! - `measure_set_unit`: Switch display unit (`{"unit": "ft"}`)
//! - `measure_cycle_unit`: Step to the next display unit
//! - `measure_get_session`: Retrieve the full session snapshot
//!
//! Measuring commands are applied later in the frame; their outcome arrives
//! as a notification (`measure_point_committed`, `measure_commit_failed`,
//! `measure_session_updated`, ...).
//!
//! ### Capture
//! - `capture_mode_selection`: Switch between floor/wall/height capture (`{"mode": "wall"}`)
//!
//! ## Sending Notifications
//!
//! ```rust,ignore
//! fn your_system(mut rpc: ResMut<WebRpcInterface>) {
//!     rpc.send_notification("event_name", json!({ "data": "value" }));
//! }
//! ```

/// JSON-RPC 2.0 request handling, notifications and the WASM message listener.
pub mod web_rpc;
