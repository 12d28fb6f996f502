//! Top-level router configuration.
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Timeouts** - Request body read deadline and whole-request deadline
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::http::StatusCode;
use std::time::Duration;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::timeout::{RequestBodyTimeoutLayer, TimeoutLayer};

/// Per-request HTTP deadlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    /// Longest wait between request body frames.
    pub read: Duration,
    /// Longest time from receiving a request to producing its response.
    pub write: Duration,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            read: Duration::from_secs(5),
            write: Duration::from_secs(10),
        }
    }
}

/// Constructs the application router with all routes and middleware.
///
/// Requests that outlive `timeouts.write` get `408 Request Timeout`.
pub fn app_router(state: AppState, timeouts: HttpTimeouts) -> NormalizePath<Router> {
    let router = api::routes::public_routes()
        .with_state(state)
        .layer(RequestBodyTimeoutLayer::new(timeouts.read))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeouts.write,
        ))
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
