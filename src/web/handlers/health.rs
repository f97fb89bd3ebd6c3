//! Health check HTTP handlers

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::{Value, json};

use crate::web::{
    AppState,
    responses::{HealthResponse, ok},
};

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let uptime = chrono::Utc::now() - state.start_time;

    ok(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        provider: state.cover_cache.provider_name().to_string(),
        cached_covers: state.cover_cache.len().await,
        uptime_seconds: uptime.num_seconds(),
    })
}

/// Liveness probe; answers as long as the process is serving
pub async fn liveness_check() -> Json<Value> {
    Json(json!({
        "status": "alive",
        "timestamp": chrono::Utc::now(),
    }))
}
