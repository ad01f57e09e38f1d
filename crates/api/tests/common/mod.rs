#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use promotrack_api::config::{ServerConfig, StoreBackend};
use promotrack_api::router::build_app_router;
use promotrack_api::state::AppState;
use promotrack_core::promotion::IdentityMode;
use promotrack_core::service::PromotionService;
use promotrack_core::store::InMemoryPromotionStore;

/// Build a test `ServerConfig` with safe defaults over the in-memory store.
pub fn test_config(identity_mode: IdentityMode) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        identity_mode,
        store_backend: StoreBackend::Memory,
        database_url: None,
    }
}

/// Build the full application router (same middleware stack as `main.rs`)
/// over a fresh in-memory store.
///
/// The returned router is cheap to clone; clones share the same store.
pub fn build_test_app(identity_mode: IdentityMode) -> Router {
    let store = Arc::new(InMemoryPromotionStore::new());
    let state = AppState {
        promotions: Arc::new(PromotionService::new(store, identity_mode)),
        config: Arc::new(test_config(identity_mode)),
    };
    build_app_router(state)
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, Method::POST, uri, body.to_string()).await
}

pub async fn put_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, Method::PUT, uri, body.to_string()).await
}

pub async fn send_json(app: &Router, method: Method, uri: &str, body: String) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// A promotion payload with the given code and RFC 3339 window.
pub fn promotion_json(code: Option<&str>, start: &str, end: &str) -> serde_json::Value {
    let mut body = serde_json::json!({
        "name": "Ramadhan Sale",
        "discount_type": "percentage",
        "discount_value": 10.5,
        "start_date": start,
        "end_date": end,
    });
    if let Some(code) = code {
        body["promotion_code"] = serde_json::Value::from(code);
    }
    body
}
