use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use insighthub::realtime::{ClientEvent, ServerEvent};
use insighthub::server::{create_app, AppState};
use insighthub::store::{DocumentStore, InMemoryStore, SharedStore, StoreError};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

pub type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct TestServer {
    pub base: String,
    pub state: AppState,
    pub http: reqwest::Client,
}

/// Store whose every call fails.
pub struct BrokenStore;

impl DocumentStore for BrokenStore {
    fn insert(&self, _: &str, _: &str, _: Vec<u8>) -> Result<(), StoreError> {
        Err(StoreError::Backend("database offline".into()))
    }
    fn get(&self, _: &str, _: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Err(StoreError::Backend("database offline".into()))
    }
    fn visit(
        &self,
        _: &str,
        _: &mut dyn FnMut(&[u8]) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        Err(StoreError::Backend("database offline".into()))
    }
    fn count(&self, _: &str) -> Result<usize, StoreError> {
        Err(StoreError::Backend("database offline".into()))
    }
}

/// In-memory store whose collection reads take `delay`.
pub struct SlowStore {
    pub inner: InMemoryStore,
    pub delay: Duration,
}

impl DocumentStore for SlowStore {
    fn insert(&self, collection: &str, id: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        self.inner.insert(collection, id, bytes)
    }
    fn get(&self, collection: &str, id: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.inner.get(collection, id)
    }
    fn visit(
        &self,
        collection: &str,
        visit: &mut dyn FnMut(&[u8]) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        std::thread::sleep(self.delay);
        self.inner.visit(collection, visit)
    }
    fn count(&self, collection: &str) -> Result<usize, StoreError> {
        self.inner.count(collection)
    }
}

pub async fn start_server() -> TestServer {
    start_server_with(Arc::new(InMemoryStore::new())).await
}

/// Bind to port 0 and serve the app over `store`.
pub async fn start_server_with(store: SharedStore) -> TestServer {
    let state = AppState::new(store);
    let app = create_app(state.clone(), "*").unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    TestServer {
        base: format!("http://{addr}"),
        state,
        http: reqwest::Client::new(),
    }
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub async fn post(&self, path: &str, body: &Value) -> reqwest::Response {
        self.http.post(self.url(path)).json(body).send().await.unwrap()
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.http.get(self.url(path)).send().await.unwrap()
    }

    /// Ingest a point and return the stored record.
    pub async fn ingest(&self, dataset_id: &str, value: f64, timestamp: &str) -> Value {
        let resp = self
            .post(
                "/api/analytics/data",
                &json!({
                    "datasetId": dataset_id,
                    "value": value,
                    "category": "test",
                    "timestamp": timestamp,
                }),
            )
            .await;
        assert_eq!(resp.status(), 201);
        resp.json().await.unwrap()
    }

    /// Open a realtime connection and wait until the hub has registered it.
    pub async fn connect(&self) -> Socket {
        let before = self.state.hub.connection_count();
        let url = format!("{}/ws", self.base.replacen("http://", "ws://", 1));
        let (socket, _) = connect_async(url.as_str()).await.unwrap();
        self.wait_for_connections(before + 1).await;
        socket
    }

    pub async fn wait_for_connections(&self, expected: usize) {
        for _ in 0..200 {
            if self.state.hub.connection_count() == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!(
            "expected {expected} connections, have {}",
            self.state.hub.connection_count()
        );
    }
}

pub async fn send(socket: &mut Socket, event: ClientEvent) {
    socket
        .send(Message::Text(event.to_frame().unwrap()))
        .await
        .unwrap();
}

pub async fn send_raw(socket: &mut Socket, frame: &str) {
    socket.send(Message::Text(frame.to_string())).await.unwrap();
}

/// Next server event, failing the test after two seconds.
pub async fn recv(socket: &mut Socket) -> ServerEvent {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(2), socket.next())
            .await
            .expect("timed out waiting for event")
            .expect("socket closed")
            .unwrap();
        if let Message::Text(text) = msg {
            return ServerEvent::parse(&text).unwrap();
        }
    }
}

/// Assert nothing arrives within a short window.
pub async fn assert_silent(socket: &mut Socket) {
    let next = tokio::time::timeout(Duration::from_millis(200), socket.next()).await;
    assert!(next.is_err(), "unexpected frame: {next:?}");
}
