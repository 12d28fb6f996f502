//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, header},
};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::code_generator::validate_custom_code;
use crate::utils::url_normalizer::normalize_url;

/// Creates (or returns the existing) short link for a URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "Example.com/Path",
///   "custom_code": "promo"   // optional
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "original_url": "https://example.com/path",
///   "short_code": "promo",
///   "short_url": "http://localhost:8080/promo",
///   "clicks": 0,
///   "expires_at": "2026-01-01T00:00:00Z",
///   "created_at": "2025-01-01T00:00:00Z"
/// }
/// ```
///
/// The URL is normalized first, so differently spelled inputs with the same
/// canonical form share one record.
///
/// # Errors
///
/// Returns 400 Bad Request for malformed bodies, invalid URLs, invalid custom
/// codes and custom codes already in use.
pub async fn shorten_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let normalized = normalize_url(&payload.url)?;

    let custom_code = payload.custom_code.as_deref().filter(|c| !c.is_empty());
    if let Some(code) = custom_code {
        validate_custom_code(code)?;
    }

    let record = state
        .registry
        .shorten(&normalized.canonical, custom_code)
        .await?;

    let short_url = short_url_for(state.base_url.as_deref(), &headers, &record.short_code);

    Ok(Json(ShortenResponse::from_record(record, short_url)))
}

/// Builds the public short URL from `BASE_URL`, falling back to the Host header.
fn short_url_for(base_url: Option<&str>, headers: &HeaderMap, code: &str) -> String {
    if let Some(base) = base_url {
        return format!("{}/{}", base.trim_end_matches('/'), code);
    }

    match headers.get(header::HOST).and_then(|v| v.to_str().ok()) {
        Some(host) => format!("http://{}/{}", host, code),
        None => format!("/{}", code),
    }
}
