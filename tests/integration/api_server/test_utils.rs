//! Test utilities for API server integration tests

use axum_test::TestServer;
use outletiq::core::http::{create_router, AppState, HealthStatus};
use outletiq::metrics::Metrics;
use outletiq::models::{SalesRecord, Season};
use outletiq::services::insights::{InsightProvider, PlaceholderInsightProvider};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// Test helper for API server integration tests
#[allow(dead_code)]
pub struct TestApiServer {
    pub server: TestServer,
    pub metrics: Arc<Metrics>,
}

impl TestApiServer {
    /// Server over an in-memory snapshot with the placeholder insight
    /// provider wired in.
    pub async fn new() -> Self {
        Self::with_dataset(Some(sample_records())).await
    }

    /// Server in the degraded "no data" state.
    pub async fn without_data() -> Self {
        Self::with_dataset(None).await
    }

    async fn with_dataset(dataset: Option<Vec<SalesRecord>>) -> Self {
        let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
        let state = AppState {
            health: Arc::new(RwLock::new(HealthStatus::default())),
            metrics: metrics.clone(),
            start_time: Arc::new(Instant::now()),
            dataset: dataset.map(Arc::new),
            insights: Some(
                Arc::new(PlaceholderInsightProvider) as Arc<dyn InsightProvider + Send + Sync>
            ),
        };

        let app = create_router(state);
        let server = TestServer::new(app).expect("start test server");

        Self { server, metrics }
    }
}

pub fn sample_records() -> Vec<SalesRecord> {
    vec![
        SalesRecord::new("Lotte", "Paju", "Discovery")
            .with_area(150.0)
            .with_amount(Season::Ss24, 1000.0)
            .with_amount(Season::Ss25, 1500.0),
        SalesRecord::new("Lotte", "Giheung", "NorthPeak")
            .with_area(90.0)
            .with_amount(Season::Ss24, 900.0)
            .with_amount(Season::Ss25, 700.0),
        SalesRecord::new("Hyundai", "Gimpo", "Discovery")
            .with_amount(Season::Ss24, 400.0)
            .with_amount(Season::Ss25, 800.0),
    ]
}
