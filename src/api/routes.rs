//! API route configuration.

use crate::api::handlers::{health_handler, home_handler, redirect_handler, shorten_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All public routes.
///
/// # Endpoints
///
/// - `GET  /`         - Service index
/// - `POST /shorten`  - Create or fetch the short link for a URL
/// - `GET  /health`   - Store connectivity check
/// - `GET  /{code}`   - Redirect to the original URL, counting a click
///
/// Static segments take precedence over `/{code}`, which is why `health`
/// and `shorten` are rejected as custom codes.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home_handler))
        .route("/shorten", post(shorten_handler))
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
}
