//! Test utilities for integration tests
use std::fs;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use axum::{Router, body::Body};

use contribgrid::api::AppState;
use contribgrid::api::app;
use contribgrid::core::AppConfig;

/// Canned GraphQL response with ten days across two weeks
pub fn github_response() -> String {
    fs::read_to_string(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/data/github_contributions_response.json"
    ))
    .expect("Failed to read GitHub response fixture")
}

/// Creates a test application router talking to a fake GitHub at
/// `github_api_url`.
///
/// The static directory is a fresh temp dir holding a single
/// `index.html` so the fallback route has something to serve.
pub fn test_app(github_api_url: &str) -> Router {
    let static_dir = tempfile::tempdir()
        .expect("Failed to create static directory")
        .keep();
    fs::write(static_dir.join("index.html"), "<html>contribgrid</html>")
        .expect("Failed to write index.html");

    let app_config = AppConfig {
        github_token: String::from("test-token"),
        github_api_url: github_api_url.to_string(),
        cache_ttl: Duration::from_secs(60),
        static_dir: static_dir.display().to_string(),
        allowed_origins: Vec::new(),
    };
    let app_state = AppState::new(app_config.clone());
    app(&app_config, Arc::new(RwLock::new(app_state)))
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}
