//! Shared fixtures for research-api integration tests

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, Response},
};
use research_api::{build_router, AppState};
use serde_json::Value;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Connection, SqliteConnection};
use std::path::PathBuf;
use tempfile::TempDir;
use tower::util::ServiceExt;

/// A temporary data root with `database/` and `exports/` paths
pub struct TestEnv {
    pub dir: TempDir,
    pub database_path: PathBuf,
    pub exports_path: PathBuf,
}

impl TestEnv {
    /// Empty root: no database file, no export directory
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let database_path = dir.path().join("database").join("research_data.db");
        let exports_path = dir.path().join("exports");
        Self {
            dir,
            database_path,
            exports_path,
        }
    }

    /// Root with the `runs` and `papers` tables created but no rows
    pub async fn with_schema() -> Self {
        let env = Self::empty();
        env.execute(&[
            "CREATE TABLE runs (run_id TEXT PRIMARY KEY, timestamp INTEGER NOT NULL, query TEXT)",
            "CREATE TABLE papers (id INTEGER PRIMARY KEY, run_id TEXT NOT NULL, title TEXT, score REAL)",
        ])
        .await;
        env
    }

    /// The two-run scenario: r1 at 100 with paper "A", r2 at 200 with paper "B"
    pub async fn seeded() -> Self {
        let env = Self::empty();
        env.execute(&[
            "CREATE TABLE runs (run_id TEXT PRIMARY KEY, timestamp INTEGER NOT NULL)",
            "CREATE TABLE papers (run_id TEXT NOT NULL, title TEXT)",
            "INSERT INTO runs (run_id, timestamp) VALUES ('r1', 100), ('r2', 200)",
            "INSERT INTO papers (run_id, title) VALUES ('r1', 'A'), ('r2', 'B')",
        ])
        .await;
        env
    }

    /// Run statements against the database, creating it if needed
    pub async fn execute(&self, statements: &[&str]) {
        std::fs::create_dir_all(self.database_path.parent().unwrap()).unwrap();
        let options = SqliteConnectOptions::new()
            .filename(&self.database_path)
            .create_if_missing(true);
        let mut conn = SqliteConnection::connect_with(&options)
            .await
            .expect("Should open test database");

        for statement in statements {
            sqlx::query(statement)
                .execute(&mut conn)
                .await
                .unwrap_or_else(|e| panic!("Statement failed: {}: {}", statement, e));
        }

        conn.close().await.expect("Should close test database");
    }

    /// Create the export directory with the given files
    pub fn write_exports(&self, files: &[(&str, &[u8])]) {
        std::fs::create_dir_all(&self.exports_path).unwrap();
        for (name, contents) in files {
            let path = self.exports_path.join(name);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(path, contents).unwrap();
        }
    }

    pub fn app(&self) -> axum::Router {
        build_router(AppState::new(&self.database_path, &self.exports_path))
    }

    /// Send a GET request through a fresh router
    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.app()
            .oneshot(test_request("GET", uri))
            .await
            .unwrap()
    }
}

/// Test helper: Create request
pub fn test_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test helper: Extract JSON body from response
pub async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

/// Test helper: Extract raw body bytes
pub async fn extract_bytes(body: Body) -> Vec<u8> {
    axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body")
        .to_vec()
}
