//! Export file endpoints

use axum::{
    body::Body,
    extract::{rejection::PathRejection, Path, Request, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::info;

use super::{ApiError, STATUS_SUCCESS};
use crate::exports::{self, ExportFile};
use crate::AppState;

/// Response for GET /api/exports
#[derive(Debug, Serialize)]
pub struct ExportsResponse {
    pub status: &'static str,
    pub files: Vec<ExportFile>,
}

/// GET /api/exports
pub async fn list_exports(
    State(state): State<AppState>,
) -> Result<Json<ExportsResponse>, ApiError> {
    let files = exports::list_exports(&state.exports_path).await?;

    Ok(Json(ExportsResponse {
        status: STATUS_SUCCESS,
        files,
    }))
}

/// GET /api/export/*filename
///
/// Streams the file as an attachment. Content type is guessed from the
/// extension; range requests are honoured.
pub async fn download_export(
    State(state): State<AppState>,
    filename: Result<Path<String>, PathRejection>,
    request: Request,
) -> Result<Response, ApiError> {
    let Path(filename) = filename?;
    let path = exports::resolve_export(&state.exports_path, &filename).await?;
    info!("Serving export {}", path.display());

    let response = match ServeFile::new(&path).oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };

    let mut response = response.map(Body::new).into_response();
    let download_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or(filename);
    response
        .headers_mut()
        .insert(header::CONTENT_DISPOSITION, attachment_header(&download_name));

    Ok(response)
}

/// `Content-Disposition: attachment` for `name`
///
/// Non-ASCII names get an ASCII fallback plus an RFC 5987 `filename*`.
fn attachment_header(name: &str) -> HeaderValue {
    let fallback: String = name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();

    let value = if name.is_ascii() && !name.contains(['"', '\\']) {
        format!("attachment; filename=\"{}\"", fallback)
    } else {
        format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            fallback,
            urlencoding::encode(name)
        )
    };

    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}
