use std::sync::Arc;

use serde_json::{json, Value};

use crate::support::{start_server, start_server_with, BrokenStore};

#[tokio::test]
async fn create_report() {
    let server = start_server().await;

    let resp = server
        .post(
            "/api/reports",
            &json!({
                "title": "CPU Usage",
                "description": "Per host",
                "datasetIds": ["cpu", "mem"],
                "chartType": "area",
            }),
        )
        .await;
    assert_eq!(resp.status(), 201);

    let body: Value = resp.json().await.unwrap();
    assert!(!body["_id"].as_str().unwrap().is_empty());
    assert_eq!(body["title"], "CPU Usage");
    assert_eq!(body["chartType"], "area");
    assert_eq!(body["datasetIds"], json!(["cpu", "mem"]));
    assert_eq!(body["createdAt"], body["updatedAt"]);
}

#[tokio::test]
async fn untitled_report_is_stored() {
    let server = start_server().await;

    let resp = server
        .post("/api/reports", &json!({ "chartType": "line", "datasetIds": ["A"] }))
        .await;
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["title"], "");
    assert_eq!(body["datasetIds"], json!(["A"]));

    let body: Value = server.get("/api/reports").await.json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_report_is_rejected() {
    let server = start_server().await;

    let resp = server
        .post("/api/reports", &json!({ "title": "X", "chartType": "scatter" }))
        .await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("chartType"));

    let resp = server.post("/api/reports", &json!({ "title": "X" })).await;
    assert_eq!(resp.status(), 400);

    let body: Value = server.get("/api/reports").await.json().await.unwrap();
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn list_in_creation_order_and_get_by_id() {
    let server = start_server().await;
    let mut ids = Vec::new();
    for (title, chart) in [("First", "line"), ("Second", "bar"), ("Third", "pie")] {
        let body: Value = server
            .post("/api/reports", &json!({ "title": title, "chartType": chart }))
            .await
            .json()
            .await
            .unwrap();
        ids.push(body["_id"].as_str().unwrap().to_string());
    }

    let body: Value = server.get("/api/reports").await.json().await.unwrap();
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["First", "Second", "Third"]);

    let resp = server.get(&format!("/api/reports/{}", ids[1])).await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["title"], "Second");
    assert_eq!(body["_id"], ids[1].as_str());
}

#[tokio::test]
async fn missing_report_is_null() {
    let server = start_server().await;
    let resp = server.get("/api/reports/does-not-exist").await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body.is_null());
}

#[tokio::test]
async fn store_failures_are_500() {
    let server = start_server_with(Arc::new(BrokenStore)).await;

    assert_eq!(server.get("/api/reports").await.status(), 500);
    assert_eq!(server.get("/api/reports/abc").await.status(), 500);
    let resp = server
        .post("/api/reports", &json!({ "title": "X", "chartType": "line" }))
        .await;
    assert_eq!(resp.status(), 500);
}

#[tokio::test]
async fn unsupported_method_is_json_405() {
    let server = start_server().await;

    let resp = server.http.delete(server.url("/api/reports")).send().await.unwrap();
    assert_eq!(resp.status(), 405);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("DELETE"));

    let resp = server
        .http
        .put(server.url("/api/analytics/dashboard"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 405);
}
