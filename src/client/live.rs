use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use super::api::{ApiClient, ClientError};
use super::view::{DashboardView, Fetch};
use crate::config::DashboardConfig;
use crate::realtime::ServerEvent;

/// User input for a running dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// "View data" on the report at this position in the list (zero based).
    SelectReport(usize),
    /// Select a dataset directly.
    SelectDataset(String),
    /// Re-read the summary and report list.
    Refresh,
    Quit,
}

/// Drives a [`DashboardView`] from one realtime connection plus HTTP reads.
pub struct DashboardClient {
    api: ApiClient,
    ws_url: String,
}

impl DashboardClient {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            api: ApiClient::new(format!("{}/api", config.api_base())),
            ws_url: config.ws_url(),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Connect and run until [`Command::Quit`], the command channel closes,
    /// or the server goes away. `on_change` sees the view after every update.
    ///
    /// Returns the final view.
    pub async fn run<F>(
        &self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut on_change: F,
    ) -> Result<DashboardView, ClientError>
    where
        F: FnMut(&DashboardView),
    {
        let (socket, _) = connect_async(self.ws_url.as_str()).await?;
        info!(url = %self.ws_url, "connected to analytics server");
        let (mut write, mut read) = socket.split();

        let mut view = DashboardView::new();
        for fetch in view.on_connected() {
            self.fetch(fetch, &mut view).await;
        }
        on_change(&view);

        loop {
            tokio::select! {
                frame = read.next() => match frame {
                    Some(Ok(Message::Text(text))) => match ServerEvent::parse(&text) {
                        Ok(event) => {
                            debug!(event = event.name(), "received");
                            view.apply_event(event);
                            on_change(&view);
                        }
                        Err(e) => warn!(error = %e, "ignoring frame"),
                    },
                    Some(Ok(Message::Close(_))) | None => {
                        info!("server closed the connection");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                },
                command = commands.recv() => {
                    let events = match command {
                        Some(Command::SelectReport(index)) => match view.reports().get(index).cloned() {
                            Some(report) => view.select_report(&report),
                            None => {
                                warn!(index, "no such report");
                                continue;
                            }
                        },
                        Some(Command::SelectDataset(dataset_id)) => view.select_dataset(&dataset_id),
                        Some(Command::Refresh) => {
                            for fetch in view.on_connected() {
                                self.fetch(fetch, &mut view).await;
                            }
                            Vec::new()
                        }
                        Some(Command::Quit) | None => {
                            let _ = write.close().await;
                            break;
                        }
                    };
                    for event in events {
                        write.send(Message::Text(event.to_frame()?)).await?;
                    }
                    on_change(&view);
                }
            }
        }

        Ok(view)
    }

    async fn fetch(&self, fetch: Fetch, view: &mut DashboardView) {
        match fetch {
            Fetch::DashboardSummary => match self.api.dashboard().await {
                Ok(summary) => view.apply_summary(summary),
                Err(e) => {
                    warn!(error = %e, "error fetching dashboard data");
                    view.summary_failed();
                }
            },
            Fetch::Reports => match self.api.reports().await {
                Ok(reports) => view.apply_reports(reports),
                Err(e) => warn!(error = %e, "error fetching reports"),
            },
        }
    }
}
