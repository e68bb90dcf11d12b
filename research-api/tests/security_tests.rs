//! Security tests for research-api
//!
//! Export downloads must never resolve outside the export directory,
//! whether the escape is spelled literally, percent-encoded, or hidden
//! behind a symlink.

mod common;

use axum::http::StatusCode;
use common::{extract_bytes, extract_json, TestEnv};

/// Export root plus a sibling secret file one level above it
fn env_with_secret() -> TestEnv {
    let env = TestEnv::empty();
    env.write_exports(&[("public.csv", b"public")]);
    std::fs::write(env.dir.path().join("secret.txt"), b"top secret").unwrap();
    env
}

async fn assert_rejected(env: &TestEnv, uri: &str) {
    let response = env.get(uri).await;
    let status = response.status();

    assert!(
        status == StatusCode::BAD_REQUEST || status == StatusCode::NOT_FOUND,
        "Expected 400/404 for {}, got {}",
        uri,
        status
    );

    let bytes = extract_bytes(response.into_body()).await;
    assert!(
        !String::from_utf8_lossy(&bytes).contains("top secret"),
        "Leaked file contents for {}",
        uri
    );
}

#[tokio::test]
async fn test_literal_parent_traversal_rejected() {
    let env = env_with_secret();
    assert_rejected(&env, "/api/export/../secret.txt").await;
    assert_rejected(&env, "/api/export/../../etc/passwd").await;
}

#[tokio::test]
async fn test_literal_traversal_is_bad_request() {
    let env = env_with_secret();
    let response = env.get("/api/export/../secret.txt").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("Invalid export filename"));
}

#[tokio::test]
async fn test_encoded_traversal_rejected() {
    let env = env_with_secret();
    assert_rejected(&env, "/api/export/%2e%2e/secret.txt").await;
    assert_rejected(&env, "/api/export/..%2fsecret.txt").await;
    assert_rejected(&env, "/api/export/%2e%2e%2f%2e%2e%2fetc%2fpasswd").await;
}

#[tokio::test]
async fn test_absolute_path_rejected() {
    let env = env_with_secret();
    assert_rejected(&env, "/api/export//etc/passwd").await;
    assert_rejected(&env, "/api/export/%2fetc%2fpasswd").await;
}

#[tokio::test]
async fn test_interior_traversal_rejected() {
    let env = env_with_secret();
    assert_rejected(&env, "/api/export/sub/../../secret.txt").await;
    assert_rejected(&env, "/api/export/public.csv/../../secret.txt").await;
}

#[tokio::test]
async fn test_backslash_traversal_rejected() {
    let env = env_with_secret();
    assert_rejected(&env, "/api/export/..%5csecret.txt").await;
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlink_escape_rejected() {
    let env = env_with_secret();
    std::os::unix::fs::symlink(
        env.dir.path().join("secret.txt"),
        env.exports_path.join("innocent.csv"),
    )
    .unwrap();

    assert_rejected(&env, "/api/export/innocent.csv").await;
}

#[tokio::test]
async fn test_legitimate_file_still_served() {
    let env = env_with_secret();
    let response = env.get("/api/export/public.csv").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(extract_bytes(response.into_body()).await, b"public");
}
