//! Short code generation and custom code validation utilities.
//!
//! Generated codes are derived from the URL and the issuing instant, so
//! repeated attempts for the same URL only differ through the timestamp or
//! an explicit entropy suffix.

use crate::error::AppError;
use base64::Engine as _;
use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;
use serde_json::json;
use sha2::{Digest, Sha256};

/// Length of a generated code unless configured otherwise.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Unpadded base64url length of a SHA-256 digest.
pub const MAX_CODE_LENGTH: usize = 43;

/// Upper bound (exclusive) of the entropy suffix appended on collision.
const ENTROPY_SUFFIX_BOUND: u32 = 1000;

/// Maximum length of a caller-chosen code.
const MAX_CUSTOM_CODE_LENGTH: usize = 64;

/// Codes that would be shadowed by fixed routes.
const RESERVED_CODES: &[&str] = &["health", "shorten"];

/// Derives a short code from `seed` and the instant it is issued at.
///
/// The seed and an RFC 3339 timestamp with nanosecond precision are hashed
/// with SHA-256, the digest is base64url encoded without padding, and the
/// first `length` characters are kept (capped at [`MAX_CODE_LENGTH`]).
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use url_registry::utils::code_generator::generate_code;
///
/// let code = generate_code("https://example.com", Utc::now(), 6);
/// assert_eq!(code.len(), 6);
/// ```
pub fn generate_code(seed: &str, issued_at: DateTime<Utc>, length: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(seed.as_bytes());
    hasher.update(
        issued_at
            .to_rfc3339_opts(SecondsFormat::Nanos, true)
            .as_bytes(),
    );
    let digest = hasher.finalize();

    let mut encoded = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(digest);
    encoded.truncate(length.min(MAX_CODE_LENGTH));
    encoded
}

/// Builds the seed for a regeneration attempt: the URL followed by a
/// pseudo-random integer in `0..1000`.
pub fn seed_with_entropy(original_url: &str) -> String {
    let suffix = rand::rng().random_range(0..ENTROPY_SUFFIX_BOUND);
    format!("{original_url}{suffix}")
}

/// Validates a caller-chosen code before it reaches the registry.
///
/// # Rules
///
/// - Length: 1-64 characters
/// - Allowed characters: ASCII letters, digits, `-` and `_`
/// - Cannot be a reserved route name
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if code.is_empty() || code.len() > MAX_CUSTOM_CODE_LENGTH {
        return Err(AppError::bad_request(
            "Custom code must be 1-64 characters",
            json!({ "provided_length": code.len() }),
        ));
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::bad_request(
            "Custom code can only contain letters, digits, hyphens and underscores",
            json!({ "code": code }),
        ));
    }

    if RESERVED_CODES.contains(&code) {
        return Err(AppError::bad_request(
            "This code is reserved",
            json!({ "code": code }),
        ));
    }

    Ok(())
}
