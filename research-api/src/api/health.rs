//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Health check response
///
/// The process is "ok" whenever it answers; the two flags report whether
/// the externally populated resources are currently present.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    pub database_present: bool,
    pub exports_present: bool,
}

/// GET /health
///
/// Checks only for the existence of the database file and export directory;
/// no connection is opened.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database_present = tokio::fs::metadata(&state.database_path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false);
    let exports_present = tokio::fs::metadata(&state.exports_path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);

    Json(HealthResponse {
        status: "ok".to_string(),
        module: "research-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database_present,
        exports_present,
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
