//! Per-connection handling of viewer events.

use tracing::{debug, warn};

use super::hub::{ConnectionId, Hub};
use super::protocol::{ClientEvent, ServerEvent};
use crate::analytics::AnalyticsService;

/// Handle one raw text frame from a viewer.
///
/// Malformed frames are answered with an `error` event to that viewer only.
pub fn handle_frame(hub: &Hub, analytics: &AnalyticsService, conn: ConnectionId, frame: &str) {
    match ClientEvent::parse(frame) {
        Ok(event) => handle_event(hub, analytics, conn, event),
        Err(err) => {
            debug!(connection = conn, error = %err, "rejected realtime frame");
            hub.send_to(conn, ServerEvent::Error(err.to_string()));
        }
    }
}

/// Handle one decoded viewer event.
pub fn handle_event(hub: &Hub, analytics: &AnalyticsService, conn: ConnectionId, event: ClientEvent) {
    match event {
        ClientEvent::SubscribeDataset(dataset_id) => {
            hub.subscribe(conn, &dataset_id);
            debug!(connection = conn, dataset_id = %dataset_id, "joined dataset channel");
        }
        ClientEvent::DataStream(dataset_id) => {
            let reply = match analytics.recent_for_dataset(&dataset_id) {
                Ok(points) => ServerEvent::StreamResponse(points),
                Err(err) => {
                    warn!(connection = conn, dataset_id = %dataset_id, error = %err, "data:stream failed");
                    ServerEvent::Error(err.to_string())
                }
            };
            hub.send_to(conn, reply);
        }
    }
}
