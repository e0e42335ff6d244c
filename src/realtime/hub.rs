//! Hub - the connected-clients registry.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::mpsc;
use tracing::debug;

use super::protocol::ServerEvent;
use crate::model::DataPoint;

/// Identifies one live connection for its lifetime.
pub type ConnectionId = u64;

/// Fan-out of newly ingested points.
pub trait Broadcaster: Send + Sync {
    /// Send the point to every connected viewer. Returns how many were reached.
    fn broadcast_new_point(&self, point: &DataPoint) -> usize;
}

/// Name of the channel a `subscribe:dataset` joins.
pub fn channel_name(dataset_id: &str) -> String {
    format!("dataset:{dataset_id}")
}

struct Connection {
    outbound: mpsc::UnboundedSender<ServerEvent>,
    channels: HashSet<String>,
}

#[derive(Default)]
struct HubInner {
    next_id: AtomicU64,
    connections: RwLock<HashMap<ConnectionId, Connection>>,
}

/// Registry of connected viewers and their channel memberships.
///
/// Clone-friendly via Arc; clones share the registry. Sends never block:
/// each connection has an unbounded outbound queue drained by its socket
/// task. Delivery is fire-and-forget.
#[derive(Clone, Default)]
pub struct Hub {
    inner: Arc<HubInner>,
}

impl Hub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection. Events for it arrive on the receiver.
    pub fn connect(&self) -> (ConnectionId, mpsc::UnboundedReceiver<ServerEvent>) {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let (outbound, rx) = mpsc::unbounded_channel();

        self.inner
            .connections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                id,
                Connection {
                    outbound,
                    channels: HashSet::new(),
                },
            );

        debug!(connection = id, "viewer connected");
        (id, rx)
    }

    /// Remove a connection and release its channel memberships.
    /// Returns false if it was already gone.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        let removed = self
            .inner
            .connections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);

        if let Some(conn) = &removed {
            debug!(connection = id, channels = conn.channels.len(), "viewer disconnected");
        }
        removed.is_some()
    }

    /// Join the connection to a dataset channel. Joining is additive and
    /// idempotent. Returns false for an unknown connection.
    pub fn subscribe(&self, id: ConnectionId, dataset_id: &str) -> bool {
        let mut connections = self
            .inner
            .connections
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        match connections.get_mut(&id) {
            Some(conn) => {
                conn.channels.insert(channel_name(dataset_id));
                true
            }
            None => false,
        }
    }

    /// Connections that joined the dataset's channel, in ascending id order.
    pub fn channel_members(&self, dataset_id: &str) -> Vec<ConnectionId> {
        let channel = channel_name(dataset_id);
        let connections = self
            .inner
            .connections
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let mut members: Vec<ConnectionId> = connections
            .iter()
            .filter(|(_, conn)| conn.channels.contains(&channel))
            .map(|(&id, _)| id)
            .collect();
        members.sort_unstable();
        members
    }

    /// Send an event to one connection. Returns false if it is gone.
    pub fn send_to(&self, id: ConnectionId, event: ServerEvent) -> bool {
        let connections = self
            .inner
            .connections
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        connections
            .get(&id)
            .is_some_and(|conn| conn.outbound.send(event).is_ok())
    }

    pub fn connection_count(&self) -> usize {
        self.inner
            .connections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Drop every connection. Socket tasks see their queue close and hang up.
    pub fn close_all(&self) {
        let mut connections = self
            .inner
            .connections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        debug!(connections = connections.len(), "closing all viewers");
        connections.clear();
    }
}

impl Broadcaster for Hub {
    fn broadcast_new_point(&self, point: &DataPoint) -> usize {
        let connections = self
            .inner
            .connections
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let delivered = connections
            .values()
            .filter(|conn| {
                conn.outbound
                    .send(ServerEvent::DataNew(point.clone()))
                    .is_ok()
            })
            .count();

        debug!(
            dataset_id = %point.dataset_id,
            delivered,
            connected = connections.len(),
            "broadcast data:new"
        );
        delivered
    }
}
