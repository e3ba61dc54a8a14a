//! HTTP API for umlgen: one request in, one outline out.
//!
//! Every request renders into its own `StyledDocument`, so handlers share
//! nothing but the immutable generator.

use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

use umlgen_core::present::{to_html, to_plain};
use umlgen_core::types::{LineKind, StyledRun, UmlConfig};
use umlgen_core::UmlGenerator;

/// Largest accepted `code` payload, in bytes.
pub const MAX_CODE_BYTES: usize = 512 * 1024;

pub struct AppState {
    pub generator: UmlGenerator,
}

impl AppState {
    pub fn new(config: UmlConfig) -> Self {
        Self {
            generator: UmlGenerator::new(config),
        }
    }
}

type ApiError = (StatusCode, Json<serde_json::Value>);

fn check_size(code: &str) -> Result<(), ApiError> {
    if code.len() > MAX_CODE_BYTES {
        return Err((
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(serde_json::json!({
                "error": format!("code exceeds {MAX_CODE_BYTES} bytes")
            })),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

pub async fn api_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// Outline
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct UmlRequest {
    pub code: String,
    #[serde(default)]
    pub show_parameters: Option<bool>,
}

#[derive(Serialize)]
pub struct UmlResponse {
    pub runs: Vec<StyledRun>,
    pub text: String,
    pub html: String,
}

pub async fn api_uml(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UmlRequest>,
) -> Result<Json<UmlResponse>, ApiError> {
    check_size(&req.code)?;
    let start = Instant::now();

    let doc = match req.show_parameters {
        Some(show) if show != state.generator.config().show_parameters => {
            let config = UmlConfig {
                show_parameters: show,
                ..state.generator.config().clone()
            };
            UmlGenerator::new(config).outline(&req.code)
        }
        _ => state.generator.outline(&req.code),
    };
    let runs = doc.into_runs();

    debug!(
        runs = runs.len(),
        time_us = start.elapsed().as_micros() as u64,
        "Outline served"
    );

    Ok(Json(UmlResponse {
        text: to_plain(&runs),
        html: to_html(&runs),
        runs,
    }))
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct ClassifyRequest {
    pub code: String,
}

#[derive(Serialize)]
pub struct ClassifiedLine {
    pub text: String,
    pub kind: LineKind,
}

#[derive(Serialize)]
pub struct ClassifyResponse {
    pub lines: Vec<ClassifiedLine>,
}

pub async fn api_classify(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ClassifyRequest>,
) -> Result<Json<ClassifyResponse>, ApiError> {
    check_size(&req.code)?;
    let classification = state.generator.classify(&req.code);
    let lines = classification
        .lines
        .into_iter()
        .map(|l| ClassifiedLine {
            text: l.text,
            kind: l.kind,
        })
        .collect();
    Ok(Json(ClassifyResponse { lines }))
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(api_health))
        .route("/api/uml", post(api_uml))
        .route("/api/classify", post(api_classify))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
