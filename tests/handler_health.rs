mod common;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use url_registry::application::services::RegistrySettings;
use url_registry::domain::entities::{NewUrlRecord, UrlRecord};
use url_registry::domain::errors::StoreError;
use url_registry::domain::repositories::UrlStore;
use std::time::Duration;
use url_registry::routes::{HttpTimeouts, app_router};
use url_registry::state::AppState;

struct UnreachableStore;

#[async_trait]
impl UrlStore for UnreachableStore {
    async fn find_by_original_url(&self, _: &str) -> Result<Option<UrlRecord>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn find_by_code(&self, _: &str) -> Result<Option<UrlRecord>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn insert(&self, _: NewUrlRecord) -> Result<UrlRecord, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn increment_clicks(
        &self,
        _: &str,
        _: DateTime<Utc>,
    ) -> Result<Option<UrlRecord>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }
}

/// Store whose calls never complete.
struct StalledStore;

#[async_trait]
impl UrlStore for StalledStore {
    async fn find_by_original_url(&self, _: &str) -> Result<Option<UrlRecord>, StoreError> {
        std::future::pending().await
    }

    async fn find_by_code(&self, _: &str) -> Result<Option<UrlRecord>, StoreError> {
        std::future::pending().await
    }

    async fn insert(&self, _: NewUrlRecord) -> Result<UrlRecord, StoreError> {
        std::future::pending().await
    }

    async fn increment_clicks(
        &self,
        _: &str,
        _: DateTime<Utc>,
    ) -> Result<Option<UrlRecord>, StoreError> {
        std::future::pending().await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        std::future::pending().await
    }
}

fn unreachable_state() -> AppState {
    AppState::new(Arc::new(UnreachableStore), RegistrySettings::default(), None)
}

#[tokio::test]
async fn test_health_ok() {
    let (state, _store) = common::create_test_state();
    let server = common::create_test_server(state);

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["store"]["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_degraded_when_store_unreachable() {
    let server = common::create_test_server(unreachable_state());

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 503);
    let body: Value = response.json();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["store"]["status"], "error");
}

#[tokio::test]
async fn test_store_failures_are_internal_errors() {
    let server = common::create_test_server(unreachable_state());

    let shorten = server
        .post("/shorten")
        .json(&serde_json::json!({ "url": "https://example.com" }))
        .await;
    let redirect = server.get("/abc123").await;

    for response in [shorten, redirect] {
        assert_eq!(response.status_code(), 500);
        let body: Value = response.json();
        assert_eq!(body["error"]["code"], "internal_error");
        assert_eq!(body["error"]["message"], "Internal server error");
    }
}

#[tokio::test]
async fn test_home_lists_endpoints() {
    let (state, _store) = common::create_test_state();
    let server = common::create_test_server(state);

    let response = server.get("/").await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["message"], "URL Registry API");
    let endpoints = body["endpoints"].as_array().unwrap();
    assert!(endpoints.iter().any(|e| e == "POST /shorten"));
    assert!(endpoints.iter().any(|e| e == "GET /{code}"));
}

#[tokio::test]
async fn test_trailing_slash_is_trimmed() {
    let (state, _store) = common::create_test_state();
    let app = app_router(state, HttpTimeouts::default());

    let response = app
        .oneshot(Request::get("/health/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_request_outliving_write_timeout_gets_408() {
    let state = AppState::new(Arc::new(StalledStore), RegistrySettings::default(), None);
    let timeouts = HttpTimeouts {
        read: Duration::from_secs(5),
        write: Duration::from_millis(50),
    };
    let app = app_router(state, timeouts);

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
}
