//! Dashboard client - view model, text rendering, and the live connection.
//!
//! One long-lived realtime connection feeds a [`DashboardView`]. Picking a
//! report changes the view's current selection and sends a stream request
//! over the same connection; it never reconnects.

mod api;
mod live;
mod render;
mod view;

pub use api::{ApiClient, ClientError};
pub use live::{Command, DashboardClient};
pub use render::{render, sparkline};
pub use view::{DashboardView, Fetch, LIVE_BUFFER};
