//! HTTP endpoint server using Axum

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, Level};

use crate::config::Config;
use crate::metrics::Metrics;
use crate::models::{GroupField, GroupSummary, Metric, RecordFilter, SalesRecord, Season};
use crate::report::{aggregate, store_efficiency, StoreEfficiency};
use crate::services::insights::{summary_prompt, GeminiInsightProvider, InsightProvider};

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    /// The immutable sales snapshot; absent when the CSV failed to load,
    /// in which case report endpoints degrade to 503 instead of crashing.
    pub dataset: Option<Arc<Vec<SalesRecord>>>,
    pub insights: Option<Arc<dyn InsightProvider + Send + Sync>>,
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "dataset_loaded": state.dataset.is_some(),
        "service": "outletiq-report-api"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

#[derive(Debug, Deserialize)]
struct ReportQuery {
    group: Option<String>,
    current: String,
    prior: String,
    metric: Option<String>,
    distributor: Option<String>,
    store: Option<String>,
    brand: Option<String>,
}

/// Typed report parameters parsed out of a query or request body.
struct ReportParams {
    group_field: GroupField,
    current: Season,
    prior: Season,
    metric: Metric,
    filter: RecordFilter,
}

impl ReportParams {
    fn parse(
        group: Option<&str>,
        current: &str,
        prior: &str,
        metric: Option<&str>,
        filter: RecordFilter,
    ) -> Result<Self, (StatusCode, String)> {
        let bad_request = |e: crate::error::ReportError| (StatusCode::BAD_REQUEST, e.to_string());
        Ok(Self {
            group_field: GroupField::from_str(group.unwrap_or("distributor"))
                .map_err(bad_request)?,
            current: Season::from_str(current).map_err(bad_request)?,
            prior: Season::from_str(prior).map_err(bad_request)?,
            metric: Metric::from_str(metric.unwrap_or("total")).map_err(bad_request)?,
            filter,
        })
    }
}

#[derive(Debug, Serialize)]
struct ReportResponse {
    group_field: GroupField,
    metric: Metric,
    current: Season,
    prior: Season,
    generated_at: DateTime<Utc>,
    group_count: usize,
    summaries: Vec<GroupSummary>,
}

fn require_dataset(
    state: &AppState,
) -> Result<Arc<Vec<SalesRecord>>, (StatusCode, String)> {
    state.dataset.clone().ok_or((
        StatusCode::SERVICE_UNAVAILABLE,
        "no sales data loaded".to_string(),
    ))
}

fn run_report(
    state: &AppState,
    params: &ReportParams,
) -> Result<Vec<GroupSummary>, (StatusCode, String)> {
    let dataset = require_dataset(state)?;
    let summaries = aggregate(
        &dataset,
        params.group_field,
        params.current,
        params.prior,
        params.metric,
        &params.filter,
    );
    state.metrics.reports_computed_total.inc();
    Ok(summaries)
}

/// Season comparison report for a grouping field and season pair.
async fn get_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportResponse>, (StatusCode, String)> {
    let filter = RecordFilter {
        distributor: query.distributor,
        store: query.store,
        brand: query.brand,
    };
    let params = ReportParams::parse(
        query.group.as_deref(),
        &query.current,
        &query.prior,
        query.metric.as_deref(),
        filter,
    )?;
    let summaries = run_report(&state, &params)?;

    Ok(Json(ReportResponse {
        group_field: params.group_field,
        metric: params.metric,
        current: params.current,
        prior: params.prior,
        generated_at: Utc::now(),
        group_count: summaries.len(),
        summaries,
    }))
}

/// The known season labels, chronologically.
async fn list_seasons() -> Json<Value> {
    let labels: Vec<&str> = Season::ALL.iter().map(|s| s.label()).collect();
    Json(json!(labels))
}

#[derive(Debug, Deserialize)]
struct EfficiencyQuery {
    brand: Option<String>,
}

#[derive(Debug, Serialize)]
struct EfficiencyResponse {
    generated_at: DateTime<Utc>,
    store_count: usize,
    stores: Vec<StoreEfficiency>,
}

/// Per-area efficiency report, optionally scoped to one brand.
async fn get_efficiency(
    State(state): State<AppState>,
    Query(query): Query<EfficiencyQuery>,
) -> Result<Json<EfficiencyResponse>, (StatusCode, String)> {
    let dataset = require_dataset(&state)?;
    let stores = store_efficiency(&dataset, query.brand.as_deref());

    Ok(Json(EfficiencyResponse {
        generated_at: Utc::now(),
        store_count: stores.len(),
        stores,
    }))
}

#[derive(Debug, Deserialize)]
struct InsightRequest {
    group: Option<String>,
    current: String,
    prior: String,
    metric: Option<String>,
    #[serde(default)]
    filter: RecordFilter,
}

#[derive(Debug, Serialize)]
struct InsightResponse {
    generated_at: DateTime<Utc>,
    commentary: String,
}

/// Generate narrative commentary for a report. The aggregation runs first;
/// only its finished output is handed to the provider.
async fn post_insights(
    State(state): State<AppState>,
    Json(request): Json<InsightRequest>,
) -> Result<Json<InsightResponse>, (StatusCode, String)> {
    let provider = state.insights.clone().ok_or((
        StatusCode::SERVICE_UNAVAILABLE,
        "insight generation is not configured".to_string(),
    ))?;

    let params = ReportParams::parse(
        request.group.as_deref(),
        &request.current,
        &request.prior,
        request.metric.as_deref(),
        request.filter,
    )?;
    let summaries = run_report(&state, &params)?;

    let prompt = summary_prompt(&summaries, params.current, params.prior);
    let commentary = provider.generate(&prompt).await.map_err(|e| {
        error!(error = %e, "Insight generation failed");
        (StatusCode::BAD_GATEWAY, e.to_string())
    })?;

    Ok(Json(InsightResponse {
        generated_at: Utc::now(),
        commentary,
    }))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/seasons", get(list_seasons))
        .route("/api/report", get(get_report))
        .route("/api/efficiency", get(get_efficiency))
        .route("/api/insights", post(post_insights))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(port: u16, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = Arc::new(Metrics::new()?);
    let start_time = Arc::new(Instant::now());

    // Load the snapshot once; the API works without it but report
    // endpoints answer 503 until a valid CSV is in place.
    let dataset = match crate::data::load_records(&config.data_path) {
        Ok(records) => {
            info!(path = %config.data_path, rows = records.len(), "Sales snapshot loaded");
            Some(Arc::new(records))
        }
        Err(e) => {
            tracing::warn!(error = %e, path = %config.data_path, "Failed to load sales snapshot - report endpoints will be unavailable");
            None
        }
    };

    let insights: Option<Arc<dyn InsightProvider + Send + Sync>> =
        config.insight_api_key.as_deref().map(|key| {
            Arc::new(GeminiInsightProvider::new(config.insight_endpoint.as_str(), key))
                as Arc<dyn InsightProvider + Send + Sync>
        });
    if insights.is_none() {
        info!("No insight API key configured - /api/insights will answer 503");
    }

    let state = AppState {
        health: Arc::new(RwLock::new(HealthStatus::default())),
        metrics: metrics.clone(),
        start_time: start_time.clone(),
        dataset,
        insights,
    };
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    axum::serve(listener, app).await?;

    Ok(())
}
