use bevy::prelude::*;
use constants::measure_defaults::LIVE_UPDATE_INTERVAL_SECS;

use super::session::MeasureSession;
use crate::rpc::web_rpc::WebRpcInterface;

/// Report the preview length while the cursor moves, throttled.
pub fn live_length_notification_system(
    session: Res<MeasureSession>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut last_sent: Local<Option<(f32, String)>>,
    time: Res<Time>,
) {
    let current_time = time.elapsed_secs();
    let Some(meters) = session.live_length() else {
        return;
    };

    let label = session.format_length(meters);
    if let Some((sent_at, sent_label)) = last_sent.as_ref() {
        if current_time - sent_at < LIVE_UPDATE_INTERVAL_SECS || *sent_label == label {
            return;
        }
    }

    rpc_interface.send_notification(
        "measure_live_updated",
        serde_json::json!({
            "meters": meters,
            "label": label,
        }),
    );
    *last_sent = Some((current_time, label));
}
