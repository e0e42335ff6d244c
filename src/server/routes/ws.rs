//! WebSocket transport for the realtime channel.
//!
//! # Endpoints
//!
//! - `GET /ws` - upgrade to the realtime channel
//!
//! # Protocol
//!
//! Text frames of `{"event": "<name>", "data": <payload>}`. The connection
//! receives `data:new` for every ingest, plus replies to its own
//! `data:stream` requests.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use crate::realtime::{handle_frame, ServerEvent};
use crate::server::state::AppState;

/// WebSocket upgrade handler: `GET /ws`
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (conn, mut outbound) = state.hub.connect();
    info!(connection = conn, "user connected");

    let (mut sender, mut receiver) = socket.split();

    // Forward hub events to the socket until the hub drops us or the peer goes away
    let mut send_task = tokio::spawn(async move {
        while let Some(event) = outbound.recv().await {
            match event.to_frame() {
                Ok(frame) => {
                    if sender.send(Message::Text(frame)).await.is_err() {
                        break;
                    }
                }
                Err(e) => warn!(connection = conn, event = event.name(), error = %e, "failed to encode event"),
            }
        }
        let _ = sender.close().await;
    });

    let hub = state.hub.clone();
    let analytics = state.analytics.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    // One frame at a time; a slow store read only holds up this viewer
                    let (hub, analytics) = (hub.clone(), analytics.clone());
                    let handled =
                        tokio::task::spawn_blocking(move || handle_frame(&hub, &analytics, conn, &text))
                            .await;
                    if let Err(e) = handled {
                        warn!(connection = conn, error = %e, "frame handler failed");
                    }
                }
                Ok(Message::Binary(_)) => {
                    hub.send_to(conn, ServerEvent::Error("binary frames are not supported".into()));
                }
                Ok(Message::Close(_)) => break,
                Err(e) => {
                    debug!(connection = conn, error = %e, "websocket error");
                    break;
                }
                _ => {} // ping/pong handled by axum
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.hub.disconnect(conn);
    info!(connection = conn, "user disconnected");
}
