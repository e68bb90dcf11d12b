//! HTTP API handlers for research-api

pub mod error;
pub mod exports;
pub mod health;
pub mod runs;
pub mod ui;

pub use error::{not_found, panic_response, ApiError};
pub use exports::{download_export, list_exports};
pub use health::health_routes;
pub use runs::{get_latest, get_run, list_runs};
pub use ui::serve_index;

/// Value of the `status` field in successful responses
pub const STATUS_SUCCESS: &str = "success";
