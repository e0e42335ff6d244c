use std::sync::Arc;
use std::time::{Duration, Instant};

use insighthub::store::InMemoryStore;
use serde_json::{json, Value};

use crate::support::{start_server, start_server_with, BrokenStore, SlowStore};

#[tokio::test]
async fn ingest_returns_stored_point() {
    let server = start_server().await;

    let resp = server
        .post(
            "/api/analytics/data",
            &json!({ "datasetId": "cpu", "value": 42.5, "category": "load" }),
        )
        .await;
    assert_eq!(resp.status(), 201);

    let body: Value = resp.json().await.unwrap();
    assert!(!body["_id"].as_str().unwrap().is_empty());
    assert_eq!(body["datasetId"], "cpu");
    assert_eq!(body["value"], 42.5);
    assert_eq!(body["category"], "load");
    assert!(body["timestamp"].is_string());
    assert_eq!(body["metadata"], json!({}));
}

#[tokio::test]
async fn ingest_keeps_metadata_and_timestamp() {
    let server = start_server().await;

    let resp = server
        .post(
            "/api/analytics/data",
            &json!({
                "datasetId": "cpu",
                "value": 1,
                "category": "load",
                "timestamp": "2024-05-01T12:00:00Z",
                "metadata": { "host": "web-1" },
            }),
        )
        .await;
    assert_eq!(resp.status(), 201);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["metadata"]["host"], "web-1");
    assert!(body["timestamp"].as_str().unwrap().starts_with("2024-05-01T12:00:00"));
}

#[tokio::test]
async fn invalid_point_is_rejected() {
    let server = start_server().await;

    let resp = server
        .post("/api/analytics/data", &json!({ "value": 1, "category": "load" }))
        .await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("datasetId"));

    let resp = server
        .post(
            "/api/analytics/data",
            &json!({ "datasetId": "cpu", "value": "high", "category": "load" }),
        )
        .await;
    assert_eq!(resp.status(), 400);

    let resp = server
        .http
        .post(server.url("/api/analytics/data"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());

    // Nothing was stored.
    let summary: Value = server.get("/api/analytics/dashboard").await.json().await.unwrap();
    assert_eq!(summary["totalDataPoints"], 0);
}

#[tokio::test]
async fn dashboard_summarizes_store() {
    let server = start_server().await;
    server.ingest("cpu", 1.0, "2024-01-01T00:00:00Z").await;
    server.ingest("mem", 2.0, "2024-01-01T00:00:02Z").await;
    server.ingest("cpu", 3.0, "2024-01-01T00:00:01Z").await;
    let resp = server
        .post("/api/reports", &json!({ "title": "CPU", "chartType": "line", "datasetIds": ["cpu"] }))
        .await;
    assert_eq!(resp.status(), 201);

    let resp = server.get("/api/analytics/dashboard").await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();

    assert_eq!(body["totalDataPoints"], 3);
    assert_eq!(body["reportCount"], 1);
    assert!(body["timestamp"].is_string());
    let values: Vec<f64> = body["latestData"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["value"].as_f64().unwrap())
        .collect();
    assert_eq!(values, vec![2.0, 3.0, 1.0]);
}

#[tokio::test]
async fn empty_dashboard() {
    let server = start_server().await;
    let body: Value = server.get("/api/analytics/dashboard").await.json().await.unwrap();
    assert_eq!(body["totalDataPoints"], 0);
    assert_eq!(body["reportCount"], 0);
    assert_eq!(body["latestData"], json!([]));
}

#[tokio::test]
async fn dataset_history_is_filtered_and_newest_first() {
    let server = start_server().await;
    server.ingest("A", 1.0, "2024-01-01T00:00:00Z").await;
    server.ingest("B", 9.0, "2024-01-01T00:00:05Z").await;
    server.ingest("A", 2.0, "2024-01-01T00:00:10Z").await;

    let body: Value = server.get("/api/analytics/data/A").await.json().await.unwrap();
    let points = body.as_array().unwrap();
    assert_eq!(points.len(), 2);
    assert_eq!(points[0]["value"], 2.0);
    assert_eq!(points[1]["value"], 1.0);
    assert!(points.iter().all(|p| p["datasetId"] == "A"));

    let body: Value = server.get("/api/analytics/data/A?limit=1").await.json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 1);

    let body: Value = server.get("/api/analytics/data/unknown").await.json().await.unwrap();
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn store_failures_are_500() {
    let server = start_server_with(Arc::new(BrokenStore)).await;

    let resp = server.get("/api/analytics/dashboard").await;
    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("database offline"));

    let resp = server.get("/api/analytics/data/cpu").await;
    assert_eq!(resp.status(), 500);

    let resp = server
        .post(
            "/api/analytics/data",
            &json!({ "datasetId": "cpu", "value": 1, "category": "load" }),
        )
        .await;
    assert_eq!(resp.status(), 500);
}

#[tokio::test]
async fn health_and_unknown_routes() {
    let server = start_server().await;

    let body: Value = server.get("/health").await.json().await.unwrap();
    assert_eq!(body["ok"], true);
    assert_eq!(body["connections"], 0);

    let resp = server.get("/api/nope").await;
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("/api/nope"));
}

#[tokio::test]
async fn bad_query_string_is_json_400() {
    let server = start_server().await;

    let resp = server.get("/api/analytics/data/A?limit=abc").await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn slow_store_read_does_not_stall_other_requests() {
    let server = start_server_with(Arc::new(SlowStore {
        inner: InMemoryStore::new(),
        delay: Duration::from_millis(800),
    }))
    .await;

    let http = server.http.clone();
    let dashboard_url = server.url("/api/analytics/dashboard");
    let slow = tokio::spawn(async move { http.get(dashboard_url).send().await.unwrap().status() });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let started = Instant::now();
    let resp = server.get("/health").await;
    assert_eq!(resp.status(), 200);
    assert!(started.elapsed() < Duration::from_millis(500));

    assert_eq!(slow.await.unwrap(), 200);
}
