use std::time::Duration;

use insighthub::client::{ApiClient, ClientError, Command, DashboardClient, DashboardView};
use insighthub::DashboardConfig;
use serde_json::json;
use tokio::sync::mpsc;

use crate::support::start_server;

async fn wait_for<F>(views: &mut mpsc::UnboundedReceiver<DashboardView>, mut done: F) -> DashboardView
where
    F: FnMut(&DashboardView) -> bool,
{
    loop {
        let view = tokio::time::timeout(Duration::from_secs(2), views.recv())
            .await
            .expect("timed out waiting for dashboard update")
            .expect("dashboard stopped");
        if done(&view) {
            return view;
        }
    }
}

#[tokio::test]
async fn dashboard_follows_server() {
    let server = start_server().await;
    server.ingest("cpu", 1.0, "2024-01-01T00:00:00Z").await;
    let resp = server
        .post(
            "/api/reports",
            &json!({ "title": "CPU", "chartType": "line", "datasetIds": ["cpu"] }),
        )
        .await;
    assert_eq!(resp.status(), 201);

    let client = DashboardClient::new(&DashboardConfig {
        server: server.base.clone(),
    });
    let (commands, rx) = mpsc::unbounded_channel();
    let (views_tx, mut views) = mpsc::unbounded_channel();
    let running = tokio::spawn(async move {
        client
            .run(rx, move |view| {
                let _ = views_tx.send(view.clone());
            })
            .await
    });

    let view = wait_for(&mut views, |v| !v.is_loading()).await;
    assert_eq!(view.total_data_points(), 1);
    assert_eq!(view.reports().len(), 1);
    assert_eq!(view.live().len(), 1);
    server.wait_for_connections(1).await;

    server.ingest("mem", 5.0, "2024-01-01T00:00:01Z").await;
    let view = wait_for(&mut views, |v| v.live().len() == 2).await;
    assert_eq!(view.live().next().unwrap().dataset_id, "mem");

    commands.send(Command::SelectReport(0)).unwrap();
    let view = wait_for(&mut views, |v| v.selected_rows().is_some()).await;
    assert_eq!(view.selected(), Some("cpu"));
    assert_eq!(view.selected_rows().unwrap().len(), 1);
    // Same connection throughout.
    assert_eq!(server.state.hub.connection_count(), 1);

    commands.send(Command::Quit).unwrap();
    let final_view = tokio::time::timeout(Duration::from_secs(2), running)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(final_view.selected(), Some("cpu"));
}

#[tokio::test]
async fn api_client_round_trip() {
    let server = start_server().await;
    let api = ApiClient::new(format!("{}/api", server.base));

    let stored = api
        .ingest(&json!({ "datasetId": "disk io", "value": 3.5, "category": "io" }))
        .await
        .unwrap();
    assert_eq!(stored.dataset_id, "disk io");

    let history = api.history("disk io").await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, stored.id);

    let report = api
        .create_report(&json!({ "title": "Disk", "chartType": "bar", "datasetIds": ["disk io"] }))
        .await
        .unwrap();
    let fetched = api.report(&report.id).await.unwrap();
    assert_eq!(fetched, Some(report));
    assert_eq!(api.report("missing").await.unwrap(), None);

    let summary = api.dashboard().await.unwrap();
    assert_eq!(summary.total_data_points, 1);
    assert_eq!(summary.report_count, 1);
}

#[tokio::test]
async fn api_client_surfaces_server_errors() {
    let server = start_server().await;
    let api = ApiClient::new(format!("{}/api", server.base));

    match api.ingest(&json!({ "value": 1 })).await {
        Err(ClientError::Api { status, message }) => {
            assert_eq!(status.as_u16(), 400);
            assert!(message.contains("datasetId"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}
