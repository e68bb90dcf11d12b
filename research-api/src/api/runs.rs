//! Run and paper endpoints

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use research_common::db::{CellValue, Record};
use serde::Serialize;
use tracing::debug;

use super::{ApiError, STATUS_SUCCESS};
use crate::{db, AppState};

/// Response for GET /api/runs
#[derive(Debug, Serialize)]
pub struct RunsResponse {
    pub status: &'static str,
    pub runs: Vec<Record>,
}

/// Response for GET /api/latest and GET /api/run/:run_id
#[derive(Debug, Serialize)]
pub struct PapersResponse {
    pub status: &'static str,
    pub run_id: CellValue,
    pub papers: Vec<Record>,
}

/// GET /api/runs
///
/// All runs, newest first.
pub async fn list_runs(State(state): State<AppState>) -> Result<Json<RunsResponse>, ApiError> {
    let runs = db::list_runs(&state.database_path).await?;
    debug!("Listed {} runs", runs.len());

    Ok(Json(RunsResponse {
        status: STATUS_SUCCESS,
        runs,
    }))
}

/// GET /api/latest
///
/// Papers of the run with the greatest timestamp.
pub async fn get_latest(State(state): State<AppState>) -> Result<Json<PapersResponse>, ApiError> {
    let run_id = db::latest_run_id(&state.database_path)
        .await?
        .ok_or_else(|| ApiError::NotFound("No runs found".to_string()))?;

    let papers = db::papers_for_run(&state.database_path, &run_id).await?;
    debug!("Latest run {} has {} papers", run_id, papers.len());

    Ok(Json(PapersResponse {
        status: STATUS_SUCCESS,
        run_id,
        papers,
    }))
}

/// GET /api/run/:run_id
///
/// Papers of one run. An empty result is reported as 404 whether or not
/// the run itself exists.
pub async fn get_run(
    State(state): State<AppState>,
    run_id: Result<Path<String>, PathRejection>,
) -> Result<Json<PapersResponse>, ApiError> {
    let Path(run_id) = run_id?;
    let run_id = CellValue::Text(run_id);
    let papers = db::papers_for_run(&state.database_path, &run_id).await?;

    if papers.is_empty() {
        return Err(ApiError::NotFound(format!("No results found for run {}", run_id)));
    }

    Ok(Json(PapersResponse {
        status: STATUS_SUCCESS,
        run_id,
        papers,
    }))
}
