//! DTO for the service index endpoint.

use serde::Serialize;

/// Service name, version and the list of public endpoints.
#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub message: String,
    pub version: String,
    pub endpoints: Vec<String>,
}
