//! Wire events exchanged over the realtime channel.

use serde::{Deserialize, Serialize};

use crate::model::DataPoint;

/// Events sent by viewers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    /// Join the channel for a dataset.
    #[serde(rename = "subscribe:dataset")]
    SubscribeDataset(String),
    /// Ask for the most recent points of a dataset.
    #[serde(rename = "data:stream")]
    DataStream(String),
}

/// Events sent by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// A freshly ingested point, sent to every viewer.
    #[serde(rename = "data:new")]
    DataNew(DataPoint),
    /// Reply to `data:stream`, newest first.
    #[serde(rename = "data:stream:response")]
    StreamResponse(Vec<DataPoint>),
    /// A request from this viewer failed.
    #[serde(rename = "error")]
    Error(String),
}

/// A frame could not be understood.
#[derive(Debug, thiserror::Error)]
#[error("invalid realtime frame: {0}")]
pub struct ProtocolError(#[from] serde_json::Error);

impl ClientEvent {
    pub fn parse(frame: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(frame)?)
    }

    pub fn to_frame(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl ServerEvent {
    pub fn parse(frame: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(frame)?)
    }

    pub fn to_frame(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    /// The event name as it appears on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::DataNew(_) => "data:new",
            ServerEvent::StreamResponse(_) => "data:stream:response",
            ServerEvent::Error(_) => "error",
        }
    }
}
