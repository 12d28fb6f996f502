//! URL validation and canonicalization.
//!
//! Produces the canonical form used as the deduplication key, together with
//! the parsed host, path and query components.

use percent_encoding::percent_decode_str;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use url::form_urlencoded;

/// Scheme prepended to input that carries no lower-case `http://`/`https://` prefix.
const DEFAULT_SCHEME_PREFIX: &str = "https://";

/// Accepted host grammar: scheme, dot-separated alphanumeric labels (internal
/// hyphens allowed), a top-level label of 2+ letters, optional port, optional
/// path/query suffix.
static HOST_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^https?://[a-zA-Z0-9]+([\-\.][a-zA-Z0-9]+)*\.[a-zA-Z]{2,}(:[0-9]{1,5})?(/.*)?$",
    )
    .unwrap()
});

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlNormalizationError {
    #[error("Empty URL provided")]
    EmptyInput,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),
}

/// A validated URL in canonical form plus its parsed components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUrl {
    /// Scheme-qualified input before canonicalization.
    pub original: String,
    /// Lower-cased form with one trailing `/` stripped.
    pub canonical: String,
    /// Host, including the port when one is given.
    pub domain: String,
    /// Path component; empty for the root path.
    pub path: String,
    /// First value of every query parameter key.
    pub query_params: BTreeMap<String, String>,
}

/// Validates a user-supplied URL and produces its canonical form.
///
/// # Normalization Rules
///
/// 1. **Whitespace**: Surrounding whitespace is trimmed
/// 2. **Scheme**: Input without `http://` or `https://` gets `https://` prepended
/// 3. **Host**: Must match the accepted host grammar (single-label hosts are rejected)
/// 4. **Case**: The whole string is lower-cased
/// 5. **Trailing slash**: Exactly one trailing `/` is removed
/// 6. **Query parameters**: Only the first value per key is kept
///
/// Components (`domain`, `path`, `query_params`) are taken from the
/// scheme-qualified input before lower-casing. `domain` is the authority text
/// as written, `path` is percent-decoded and the port is not range-checked.
/// The scheme prefix is case-sensitive, so `HTTPS://...` gets `https://`
/// prepended and then fails the grammar.
///
/// # Errors
///
/// Returns [`UrlNormalizationError::EmptyInput`] for blank input.
/// Returns [`UrlNormalizationError::InvalidFormat`] if the grammar does not match.
///
/// # Examples
///
/// ```
/// use url_registry::utils::url_normalizer::normalize_url;
///
/// assert_eq!(normalize_url("example.com").unwrap().canonical, "https://example.com");
/// assert_eq!(normalize_url("https://Example.com/").unwrap().canonical, "https://example.com");
/// assert!(normalize_url("https://invalid").is_err());
/// ```
pub fn normalize_url(raw: &str) -> Result<NormalizedUrl, UrlNormalizationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlNormalizationError::EmptyInput);
    }

    let qualified = if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("{DEFAULT_SCHEME_PREFIX}{trimmed}")
    };

    if !HOST_GRAMMAR.is_match(&qualified) {
        return Err(UrlNormalizationError::InvalidFormat(qualified));
    }

    let (authority, target) = split_authority(&qualified);
    let domain = authority.to_string();

    let without_fragment = target.split_once('#').map_or(target, |(head, _)| head);
    let (raw_path, raw_query) = without_fragment
        .split_once('?')
        .map_or((without_fragment, ""), |(path, query)| (path, query));

    let path = match decode_path(raw_path) {
        Some(decoded) if decoded == "/" => String::new(),
        Some(decoded) => decoded,
        None => {
            return Err(UrlNormalizationError::InvalidFormat(format!(
                "{qualified}: invalid percent-encoding in path"
            )));
        }
    };

    let mut query_params = BTreeMap::new();
    for (key, value) in form_urlencoded::parse(raw_query.as_bytes()) {
        query_params
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }

    let lowered = qualified.to_lowercase();
    let canonical = lowered.strip_suffix('/').unwrap_or(&lowered).to_string();

    Ok(NormalizedUrl {
        original: qualified,
        canonical,
        domain,
        path,
        query_params,
    })
}

fn has_http_scheme(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Splits a grammar-checked URL into its `host[:port]` text and the rest.
fn split_authority(qualified: &str) -> (&str, &str) {
    let after_scheme = qualified
        .split_once("://")
        .map_or(qualified, |(_, rest)| rest);
    match after_scheme.find('/') {
        Some(idx) => after_scheme.split_at(idx),
        None => (after_scheme, ""),
    }
}

/// Percent-decodes a raw path; `None` when an escape is malformed.
fn decode_path(raw: &str) -> Option<String> {
    let bytes = raw.as_bytes();
    let well_formed = bytes.iter().enumerate().all(|(i, &b)| {
        b != b'%'
            || (bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit))
    });
    well_formed.then(|| percent_decode_str(raw).decode_utf8_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_bare_domain_defaults_to_https() {
        let result = normalize_url("example.com").unwrap();
        assert_eq!(result.canonical, "https://example.com");
        assert_eq!(result.original, "https://example.com");
    }

    #[test]
    fn test_normalize_strips_root_slash() {
        let result = normalize_url("https://example.com/").unwrap();
        assert_eq!(result.canonical, "https://example.com");
        assert_eq!(result.path, "");
    }

    #[test]
    fn test_normalize_strips_only_one_trailing_slash() {
        let result = normalize_url("https://example.com/docs//").unwrap();
        assert_eq!(result.canonical, "https://example.com/docs/");
    }

    #[test]
    fn test_normalize_deep_path_trailing_slash() {
        let result = normalize_url("https://example.com/a/b/").unwrap();
        assert_eq!(result.canonical, "https://example.com/a/b");
        assert_eq!(result.path, "/a/b/");
    }

    #[test]
    fn test_normalize_keeps_http_scheme() {
        let result = normalize_url("http://example.com/page").unwrap();
        assert_eq!(result.canonical, "http://example.com/page");
    }

    #[test]
    fn test_normalize_lowercases_everything() {
        let result = normalize_url("https://EXAMPLE.COM/Path?Key=VALUE").unwrap();
        assert_eq!(result.canonical, "https://example.com/path?key=value");
    }

    #[test]
    fn test_normalize_components_keep_case() {
        let result = normalize_url("https://Example.com/Path?Key=VALUE").unwrap();
        assert_eq!(result.domain, "Example.com");
        assert_eq!(result.path, "/Path");
        assert_eq!(result.query_params.get("Key").map(String::as_str), Some("VALUE"));
    }

    #[test]
    fn test_normalize_trims_whitespace() {
        let result = normalize_url("   example.com/page  \n").unwrap();
        assert_eq!(result.canonical, "https://example.com/page");
    }

    #[test]
    fn test_normalize_empty_string() {
        assert_eq!(normalize_url(""), Err(UrlNormalizationError::EmptyInput));
    }

    #[test]
    fn test_normalize_whitespace_only() {
        assert_eq!(normalize_url("  \t "), Err(UrlNormalizationError::EmptyInput));
    }

    #[test]
    fn test_normalize_single_label_host_rejected() {
        let result = normalize_url("https://invalid");
        assert!(matches!(
            result.unwrap_err(),
            UrlNormalizationError::InvalidFormat(_)
        ));
    }

    #[test]
    fn test_normalize_localhost_rejected() {
        assert!(normalize_url("http://localhost:3000/test").is_err());
    }

    #[test]
    fn test_normalize_numeric_tld_rejected() {
        assert!(normalize_url("http://192.168.1.1/api").is_err());
    }

    #[test]
    fn test_normalize_spaces_in_host_rejected() {
        assert!(normalize_url("not a valid url").is_err());
    }

    #[test]
    fn test_normalize_ftp_scheme_rejected() {
        assert!(normalize_url("ftp://example.com/file.txt").is_err());
    }

    #[test]
    fn test_normalize_upper_case_scheme_rejected() {
        let result = normalize_url("HTTPS://EXAMPLE.COM");
        assert_eq!(
            result.unwrap_err(),
            UrlNormalizationError::InvalidFormat("https://HTTPS://EXAMPLE.COM".to_string())
        );
    }

    #[test]
    fn test_normalize_mixed_case_scheme_rejected() {
        assert!(normalize_url("Http://Example.com/").is_err());
    }

    #[test]
    fn test_normalize_five_digit_port_not_range_checked() {
        let result = normalize_url("https://example.com:99999/").unwrap();
        assert_eq!(result.domain, "example.com:99999");
        assert_eq!(result.canonical, "https://example.com:99999");
    }

    #[test]
    fn test_normalize_default_port_kept_in_domain() {
        let result = normalize_url("https://example.com:443/x").unwrap();
        assert_eq!(result.domain, "example.com:443");
        assert_eq!(result.canonical, "https://example.com:443/x");
    }

    #[test]
    fn test_normalize_path_is_percent_decoded() {
        let result = normalize_url("https://example.com/a%20b").unwrap();
        assert_eq!(result.path, "/a b");
        assert_eq!(result.canonical, "https://example.com/a%20b");
    }

    #[test]
    fn test_normalize_path_with_raw_space() {
        let result = normalize_url("https://example.com/a b").unwrap();
        assert_eq!(result.path, "/a b");
    }

    #[test]
    fn test_normalize_path_keeps_backslash() {
        let result = normalize_url("https://example.com/a\\b").unwrap();
        assert_eq!(result.path, "/a\\b");
    }

    #[test]
    fn test_normalize_malformed_escape_rejected() {
        assert!(matches!(
            normalize_url("https://example.com/%zz").unwrap_err(),
            UrlNormalizationError::InvalidFormat(_)
        ));
    }

    #[test]
    fn test_normalize_fragment_not_in_path_or_query() {
        let result = normalize_url("https://example.com/docs?page=2#intro").unwrap();
        assert_eq!(result.path, "/docs");
        assert_eq!(result.query_params["page"], "2");
    }

    #[test]
    fn test_normalize_with_port() {
        let result = normalize_url("https://api.example.com:8443/v1").unwrap();
        assert_eq!(result.domain, "api.example.com:8443");
        assert_eq!(result.path, "/v1");
        assert_eq!(result.canonical, "https://api.example.com:8443/v1");
    }

    #[test]
    fn test_normalize_hyphenated_labels() {
        let result = normalize_url("https://my-site.example-domain.org").unwrap();
        assert_eq!(result.domain, "my-site.example-domain.org");
    }

    #[test]
    fn test_normalize_query_keeps_first_value() {
        let result = normalize_url("https://example.com/search?q=rust&q=go&lang=en").unwrap();
        assert_eq!(result.query_params.len(), 2);
        assert_eq!(result.query_params["q"], "rust");
        assert_eq!(result.query_params["lang"], "en");
    }

    #[test]
    fn test_normalize_no_query() {
        let result = normalize_url("https://example.com/page").unwrap();
        assert!(result.query_params.is_empty());
    }
}
