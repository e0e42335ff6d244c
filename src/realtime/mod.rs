//! Realtime channel - connected viewers, dataset channels, and fan-out.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  ingest   ┌──────────────────┐  data:new (all)   ┌──────────┐
//! │   Producer   │ ────────> │ AnalyticsService │ ────────────────> │   Hub    │
//! └──────────────┘           └──────────────────┘                   └────┬─────┘
//!                                     ▲                                  │ per-connection
//!                                     │ recent 50                        ▼ mpsc
//! ┌──────────────┐ data:stream ┌──────┴──────┐ data:stream:response ┌──────────┐
//! │    Viewer    │ ──────────> │  session    │ ───────────────────> │  Viewer  │
//! └──────────────┘             └─────────────┘   (requester only)   └──────────┘
//! ```
//!
//! The [`Hub`] owns the connected-clients registry. Only the connection
//! lifecycle (`connect` / `disconnect`) mutates it. Frames are JSON text of
//! the form `{"event": "<name>", "data": <payload>}`.

mod hub;
mod protocol;
mod session;

pub use hub::{channel_name, Broadcaster, ConnectionId, Hub};
pub use protocol::{ClientEvent, ProtocolError, ServerEvent};
pub use session::{handle_event, handle_frame};
