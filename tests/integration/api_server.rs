//! Integration tests for the API Server
//!
//! Tests HTTP endpoints, health checks, metrics, and report behavior.

#[path = "api_server/test_utils.rs"]
mod test_utils;

use serde_json::Value;

use test_utils::TestApiServer;

#[tokio::test]
async fn health_endpoint_reports_healthy_status() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime_seconds"].as_u64().is_some());
    assert_eq!(body["dataset_loaded"], true);
    assert_eq!(body["service"], "outletiq-report-api");
}

#[tokio::test]
async fn metrics_endpoint_exposes_prometheus_metrics() {
    let app = TestApiServer::new().await;
    let _ = app.server.get("/health").await;

    let response = app.server.get("/metrics").await;
    assert_eq!(response.status_code(), 200);

    let body = response.text();
    assert!(
        body.contains("http_requests_total"),
        "Expected http_requests_total metric"
    );
    assert!(
        body.contains("http_request_duration_seconds"),
        "Expected http_request_duration_seconds metric"
    );
}

#[tokio::test]
async fn seasons_endpoint_lists_labels_chronologically() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/seasons").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(
        body,
        serde_json::json!(["23SS", "23FW", "24SS", "24FW", "25SS"])
    );
}

#[tokio::test]
async fn report_endpoint_returns_ranked_summaries() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .get("/api/report")
        .add_query_param("group", "brand")
        .add_query_param("current", "25SS")
        .add_query_param("prior", "24SS")
        .add_query_param("metric", "total")
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["group_field"], "brand");
    assert_eq!(body["metric"], "total");
    assert_eq!(body["group_count"], 2);

    let summaries = body["summaries"].as_array().unwrap();
    assert_eq!(summaries[0]["key"], "Discovery");
    assert_eq!(summaries[0]["rank"], 1);
    assert_eq!(summaries[0]["current_total"], 2300.0);
    assert_eq!(summaries[0]["prior_total"], 1400.0);
    assert_eq!(summaries[1]["key"], "NorthPeak");
    assert_eq!(summaries[1]["rank"], 2);
}

#[tokio::test]
async fn report_endpoint_applies_filters() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .get("/api/report")
        .add_query_param("group", "brand")
        .add_query_param("current", "25SS")
        .add_query_param("prior", "24SS")
        .add_query_param("distributor", "Hyundai")
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["group_count"], 1);
    assert_eq!(body["summaries"][0]["key"], "Discovery");
    assert_eq!(body["summaries"][0]["current_total"], 800.0);
}

#[tokio::test]
async fn report_endpoint_rejects_unknown_arguments() {
    let app = TestApiServer::new().await;

    let response = app
        .server
        .get("/api/report")
        .add_query_param("current", "26SS")
        .add_query_param("prior", "24SS")
        .await;
    assert_eq!(response.status_code(), 400);
    assert!(response.text().contains("unknown season label"));

    let response = app
        .server
        .get("/api/report")
        .add_query_param("group", "store")
        .add_query_param("current", "25SS")
        .add_query_param("prior", "24SS")
        .await;
    assert_eq!(response.status_code(), 400);

    let response = app
        .server
        .get("/api/report")
        .add_query_param("current", "25SS")
        .add_query_param("prior", "24SS")
        .add_query_param("metric", "median")
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn report_endpoint_degrades_without_data() {
    let app = TestApiServer::without_data().await;
    let response = app
        .server
        .get("/api/report")
        .add_query_param("current", "25SS")
        .add_query_param("prior", "24SS")
        .await;
    assert_eq!(response.status_code(), 503);
    assert!(response.text().contains("no sales data"));

    // Health still answers, marking the missing dataset.
    let health = app.server.get("/health").await;
    assert_eq!(health.status_code(), 200);
    let body: Value = health.json();
    assert_eq!(body["dataset_loaded"], false);
}

#[tokio::test]
async fn efficiency_endpoint_excludes_area_less_stores() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/efficiency").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    // Gimpo has no recorded area and must not appear.
    assert_eq!(body["store_count"], 2);
    let stores = body["stores"].as_array().unwrap();
    assert!(stores.iter().all(|s| s["store"] != "Gimpo"));
}

#[tokio::test]
async fn insights_endpoint_runs_report_then_provider() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .post("/api/insights")
        .json(&serde_json::json!({
            "group": "brand",
            "current": "25SS",
            "prior": "24SS"
        }))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert!(body["commentary"].as_str().is_some());
}

#[tokio::test]
async fn insights_endpoint_validates_arguments() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .post("/api/insights")
        .json(&serde_json::json!({
            "current": "bogus",
            "prior": "24SS"
        }))
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn repeated_report_requests_are_identical() {
    let app = TestApiServer::new().await;
    let request = || {
        app.server
            .get("/api/report")
            .add_query_param("group", "distributor")
            .add_query_param("current", "25SS")
            .add_query_param("prior", "24SS")
            .add_query_param("metric", "average")
    };

    let first: Value = request().await.json();
    let second: Value = request().await.json();
    assert_eq!(first["summaries"], second["summaries"]);
}
