//! HTTP service shell: routing, CORS, request logging, error mapping.
//!
//! The shell sequences Capturer -> Extractor -> Comparison Engine and
//! serializes the verdict. Collaborator failures (page load, design API)
//! degrade to empty sequences; the comparison still runs and "nothing to
//! compare" is a legitimate outcome for the caller to judge.

use std::time::Instant;

use axum::extract::{Query, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::capture::PageCapturer;
use crate::compare::compare_elements;
use crate::config::Config;
use crate::figma::{extract_design_records, map_figma_error, parse_figma_url, FigmaClient};
use crate::report::{render_pdf, ReportStore};
use crate::types::{DesignRecord, Difference, MatchedElement, PageRecord, Verdict};
use crate::{Result, SpcError};

#[derive(Clone)]
pub struct AppState {
    pub capturer: PageCapturer,
    pub reports: ReportStore,
    pub figma_token: Option<String>,
    pub figma_api_base: String,
}

impl AppState {
    pub fn new(config: &Config, figma_token: Option<String>) -> Self {
        Self {
            capturer: PageCapturer::new(config.capture_options()),
            reports: ReportStore::new(),
            figma_token,
            figma_api_base: config.figma.api_base_url.clone(),
        }
    }
}

/// Build the API router with CORS restricted to the configured origins.
pub fn build_router(state: AppState, allowed_origins: &[String]) -> Result<Router> {
    let origins = allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|_| SpcError::Config(format!("Invalid CORS origin: {origin}")))
        })
        .collect::<Result<Vec<_>>>()?;

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    Ok(Router::new()
        .route("/api/ping", get(ping))
        .route("/api/run-test", post(run_test))
        .route("/api/store-differences", post(store_differences))
        .route("/api/generate-pdf", get(generate_pdf))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: Config, figma_token: Option<String>) -> Result<()> {
    let addr = config.bind_addr();
    let state = AppState::new(&config, figma_token);
    let router = build_router(state, &config.server.allowed_origins)?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, router).await?;
    Ok(())
}

async fn ping() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
pub struct RunTestRequest {
    pub website_url: String,
    #[serde(default)]
    pub figma_url: Option<String>,
    #[serde(default)]
    pub selectors: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RunTestResponse {
    pub status: String,
    pub differences: Vec<Difference>,
    pub matched: Vec<MatchedElement>,
    pub elements: Vec<PageRecord>,
    pub execution_time: f64,
}

async fn run_test(
    State(state): State<AppState>,
    Json(request): Json<RunTestRequest>,
) -> Json<RunTestResponse> {
    info!(
        url = %request.website_url,
        selectors = request.selectors.as_deref().unwrap_or("all"),
        "run test"
    );
    let start = Instant::now();

    let elements = capture_page(&state, &request).await;
    let design = fetch_design(&state, request.figma_url.as_deref()).await;
    if design.is_empty() {
        warn!("design data is empty or was not received");
    }

    let verdict = compare_elements(&design, &elements);
    let execution_time = (start.elapsed().as_secs_f64() * 100.0).round() / 100.0;
    info!(execution_time, "test completed");

    Json(RunTestResponse {
        status: "success".to_string(),
        differences: verdict.differences,
        matched: verdict.matched,
        elements,
        execution_time,
    })
}

async fn capture_page(state: &AppState, request: &RunTestRequest) -> Vec<PageRecord> {
    if let Err(e) = url::Url::parse(&request.website_url) {
        error!(url = %request.website_url, error = %e, "invalid website URL");
        return Vec::new();
    }
    match state
        .capturer
        .capture(&request.website_url, request.selectors.as_deref())
        .await
    {
        Ok(elements) => elements,
        Err(e) => {
            error!(error = %e, "failed to capture the website");
            Vec::new()
        }
    }
}

async fn fetch_design(state: &AppState, figma_url: Option<&str>) -> Vec<DesignRecord> {
    let Some(figma_url) = figma_url else {
        return Vec::new();
    };
    match design_records(state, figma_url).await {
        Ok(records) => records,
        Err(e) => {
            error!(error = %e, "failed to fetch design data");
            Vec::new()
        }
    }
}

async fn design_records(state: &AppState, figma_url: &str) -> Result<Vec<DesignRecord>> {
    let info = parse_figma_url(figma_url)?;
    let token = state
        .figma_token
        .clone()
        .ok_or_else(|| SpcError::Config("FIGMA_ACCESS_TOKEN is not set".to_string()))?;
    let client =
        FigmaClient::with_base_url(token, state.figma_api_base.clone()).map_err(map_figma_error)?;
    let file = client
        .get_file(&info.file_key)
        .await
        .map_err(map_figma_error)?;
    let records = extract_design_records(&file.document);
    info!(count = records.len(), "design elements extracted");
    Ok(records)
}

#[derive(Debug, Serialize)]
struct StoreResponse {
    message: String,
    report_id: Uuid,
}

async fn store_differences(
    State(state): State<AppState>,
    Json(verdict): Json<Verdict>,
) -> Json<StoreResponse> {
    info!(
        differences = verdict.differences.len(),
        matched = verdict.matched.len(),
        "comparison results stored"
    );
    let report_id = state.reports.store(verdict);
    Json(StoreResponse {
        message: "Comparison results stored".to_string(),
        report_id,
    })
}

#[derive(Debug, Deserialize)]
struct PdfQuery {
    report_id: Uuid,
}

async fn generate_pdf(State(state): State<AppState>, Query(query): Query<PdfQuery>) -> Response {
    let Some(verdict) = state.reports.get(&query.report_id) else {
        let err = SpcError::Report(format!("No stored results for report {}", query.report_id));
        return error_response(StatusCode::NOT_FOUND, &err);
    };

    match render_pdf(&verdict) {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "application/pdf"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"report.pdf\"",
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => error_response(StatusCode::BAD_REQUEST, &e),
    }
}

fn error_response(status: StatusCode, err: &SpcError) -> Response {
    (status, Json(err.to_payload())).into_response()
}
