//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// Every successful redirect counts one click. The response is a
/// 307 Temporary Redirect so clients re-request the short URL each time.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist or has expired.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let record = state.registry.resolve(&code).await?;

    debug!(code = %record.short_code, clicks = record.clicks, "Redirecting");

    Ok(Redirect::temporary(&record.original_url))
}
