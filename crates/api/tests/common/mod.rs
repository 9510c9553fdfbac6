#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use hotelhub_api::config::ServerConfig;
use hotelhub_api::router::build_app_router;
use hotelhub_api::state::AppState;
use hotelhub_core::vault::Vault;
use hotelhub_db::store::IntegrationStore;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and fixed vault secrets so encrypted fixtures are reproducible.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        vault_secret_key: "test-secret-key".to_string(),
        vault_secret_salt: "test-secret-salt".to_string(),
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This goes through [`build_app_router`] so integration tests exercise the
/// same middleware stack (CORS, request ID, timeout, tracing, panic
/// recovery) that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let vault = Vault::from_secrets(&config.vault_secret_key, &config.vault_secret_salt)
        .expect("test vault secrets are non-empty");
    let store = IntegrationStore::new(pool.clone(), Arc::new(vault));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        store,
    };

    build_app_router(state, &config)
}

/// The store wired the same way as the test app, for seeding and asserting.
pub fn test_store(pool: PgPool) -> IntegrationStore {
    let config = test_config();
    let vault = Vault::from_secrets(&config.vault_secret_key, &config.vault_secret_salt)
        .expect("test vault secrets are non-empty");
    IntegrationStore::new(pool, Arc::new(vault))
}

/// Send a GET request to the app.
pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    json_request(app, Method::POST, uri, body).await
}

/// Send a PUT request with a JSON body.
pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    json_request(app, Method::PUT, uri, body).await
}

/// Send a DELETE request.
pub async fn delete_req(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

async fn json_request(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
