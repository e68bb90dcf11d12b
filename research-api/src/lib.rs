//! research-api library - read-only results service
//!
//! Serves the `runs` and `papers` tables of the research database and the
//! files of the export directory over HTTP.

use axum::Router;
use research_common::config::ServiceConfig;
use std::path::PathBuf;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

pub mod api;
pub mod db;
pub mod exports;

/// Application state shared across HTTP handlers
///
/// Holds configuration only. Database connections are opened per request.
#[derive(Debug, Clone)]
pub struct AppState {
    /// SQLite database file (opened read-only)
    pub database_path: PathBuf,
    /// Directory served by the export endpoints
    pub exports_path: PathBuf,
}

impl AppState {
    /// Create new application state
    pub fn new(database_path: impl Into<PathBuf>, exports_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            exports_path: exports_path.into(),
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(&config.database_path, &config.exports_path)
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let api = Router::new()
        .route("/api/runs", get(api::list_runs))
        .route("/api/latest", get(api::get_latest))
        .route("/api/run/:run_id", get(api::get_run))
        .route("/api/exports", get(api::list_exports))
        .route("/api/export/*filename", get(api::download_export));

    let public = Router::new()
        .route("/", get(api::serve_index))
        .merge(api::health_routes());

    Router::new()
        .merge(api)
        .merge(public)
        .fallback(api::not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(api::panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
