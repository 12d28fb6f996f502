//! Handler for the service index.

use axum::Json;

use crate::api::dto::home::HomeResponse;

/// Describes the service and its public endpoints.
///
/// # Endpoint
///
/// `GET /`
pub async fn home_handler() -> Json<HomeResponse> {
    Json(HomeResponse {
        message: "URL Registry API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: ["POST /shorten", "GET /{code}", "GET /health"]
            .into_iter()
            .map(String::from)
            .collect(),
    })
}
