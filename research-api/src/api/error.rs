//! Error responses
//!
//! Every failure leaves the service as `{"status": "error", "message": ...}`
//! with 404 for absent resources, 400 for rejected input and 500 otherwise.

use axum::{
    extract::rejection::PathRejection,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::any::Any;
use tracing::{debug, error};

/// API errors
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<research_common::Error> for ApiError {
    fn from(err: research_common::Error) -> Self {
        use research_common::Error;

        match err {
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => {
                error!("Request failed: {}", other);
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        debug!("Rejected path parameter: {}", rejection.body_text());
        ApiError::BadRequest("Invalid path parameter".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            ApiError::NotFound(msg) | ApiError::BadRequest(msg) | ApiError::Internal(msg) => msg,
        };

        let body = Json(json!({
            "status": "error",
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Fallback for unknown routes
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}

/// Generic 500 for a panicking handler; details go to the log only
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    error!("Handler panicked: {}", detail);

    ApiError::Internal("Internal server error".to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use research_common::Error;

    #[test]
    fn test_common_errors_map_to_status() {
        let not_found: ApiError = Error::NotFound("x".into()).into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let bad: ApiError = Error::InvalidInput("x".into()).into();
        assert_eq!(bad.status_code(), StatusCode::BAD_REQUEST);

        let io: ApiError = Error::Io(std::io::Error::other("disk")).into();
        assert_eq!(io.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_panic_response_hides_details() {
        let response = panic_response(Box::new("secret detail".to_string()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Internal server error");
    }
}
