use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::analytics::DashboardSummary;
use crate::model::{DataPoint, Report};
use crate::realtime::ProtocolError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid server url: {0}")]
    InvalidUrl(String),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Api { status: StatusCode, message: String },
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Thin typed wrapper over the HTTP API.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
}

impl ApiClient {
    /// `base` is the API root, e.g. `http://localhost:5000/api`.
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: base.into(),
        }
    }

    pub async fn dashboard(&self) -> Result<DashboardSummary, ClientError> {
        self.get(&["analytics", "dashboard"]).await
    }

    pub async fn history(&self, dataset_id: &str) -> Result<Vec<DataPoint>, ClientError> {
        self.get(&["analytics", "data", dataset_id]).await
    }

    pub async fn ingest(&self, body: &Value) -> Result<DataPoint, ClientError> {
        self.post(&["analytics", "data"], body).await
    }

    pub async fn reports(&self) -> Result<Vec<Report>, ClientError> {
        self.get(&["reports"]).await
    }

    pub async fn report(&self, id: &str) -> Result<Option<Report>, ClientError> {
        self.get(&["reports", id]).await
    }

    pub async fn create_report(&self, body: &Value) -> Result<Report, ClientError> {
        self.post(&["reports"], body).await
    }

    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url =
            Url::parse(&self.base).map_err(|e| ClientError::InvalidUrl(format!("{}: {e}", self.base)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ClientError> {
        let response = self.http.get(self.endpoint(segments)?).send().await?;
        decode(response).await
    }

    async fn post<T: DeserializeOwned>(&self, segments: &[&str], body: &Value) -> Result<T, ClientError> {
        let response = self.http.post(self.endpoint(segments)?).json(body).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }
    let text = response.text().await?;
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);
    Err(ClientError::Api { status, message })
}
