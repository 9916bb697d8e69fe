//! Query validation and sanitization for proxied lookups.
//!
//! # Responsibilities
//! - Allowlist the browsable resources and their query parameters
//! - Reject malformed identifiers, seasons, and search terms before they
//!   reach the provider
//! - Normalize the query (trimmed values, sorted keys) so equivalent
//!   requests share one cache key

use thiserror::Error;
use url::form_urlencoded;

/// Resources the dashboard may browse through the gateway.
pub const RESOURCES: &[&str] = &["fixtures", "teams", "players", "transfers"];

const ID_PARAMS: &[&str] = &["id", "team", "player", "league", "page"];

const MAX_VALUE_LEN: usize = 128;
const MAX_ID_LEN: usize = 10;
const MAX_SEGMENT_LEN: usize = 32;
const MIN_SEARCH_LEN: usize = 2;
const MAX_SEARCH_LEN: usize = 64;

/// A rejected piece of request input.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("unknown resource '{0}'")]
    UnknownResource(String),

    #[error("invalid path segment '{0}'")]
    InvalidPathSegment(String),

    #[error("unknown query parameter '{0}'")]
    UnknownParam(String),

    #[error("invalid value for '{name}': {reason}")]
    InvalidValue { name: String, reason: &'static str },
}

fn invalid(name: &str, reason: &'static str) -> ValidationError {
    ValidationError::InvalidValue {
        name: name.to_string(),
        reason,
    }
}

/// Check the leading path segment against the resource allowlist.
pub fn validate_resource(segment: &str) -> Result<(), ValidationError> {
    if RESOURCES.contains(&segment) {
        Ok(())
    } else {
        Err(ValidationError::UnknownResource(segment.to_string()))
    }
}

/// Check a trailing path segment: a numeric identifier or a short
/// lowercase sub-resource name.
pub fn validate_path_segment(segment: &str) -> Result<(), ValidationError> {
    let well_formed = !segment.is_empty()
        && segment.len() <= MAX_SEGMENT_LEN
        && (segment.bytes().all(|b| b.is_ascii_digit())
            || segment.bytes().all(|b| b.is_ascii_lowercase()));

    if well_formed {
        Ok(())
    } else {
        Err(ValidationError::InvalidPathSegment(segment.to_string()))
    }
}

/// Validate a raw query string and return its normalized form.
///
/// Values are trimmed, every pair is checked against the parameter
/// allowlist, and pairs are re-serialized in sorted order.
pub fn validate_query(raw: &str) -> Result<String, ValidationError> {
    if raw.is_empty() {
        return Ok(String::new());
    }

    let mut pairs: Vec<(String, String)> = Vec::new();
    for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
        let value = value.trim();
        validate_param(&key, value)?;
        pairs.push((key.into_owned(), value.to_string()));
    }
    pairs.sort();

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in &pairs {
        serializer.append_pair(key, value);
    }
    Ok(serializer.finish())
}

fn validate_param(key: &str, value: &str) -> Result<(), ValidationError> {
    if value.len() > MAX_VALUE_LEN {
        return Err(invalid(key, "value too long"));
    }

    match key {
        k if ID_PARAMS.contains(&k) => validate_identifier(key, value),
        "season" => validate_season(value),
        "search" => validate_search(value),
        other => Err(ValidationError::UnknownParam(other.to_string())),
    }
}

fn validate_identifier(name: &str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.len() > MAX_ID_LEN || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(name, "expected a numeric identifier"));
    }
    Ok(())
}

fn validate_season(value: &str) -> Result<(), ValidationError> {
    let year: u16 = value
        .parse()
        .map_err(|_| invalid("season", "expected a 4-digit year"))?;
    if value.len() != 4 || !(1900..=2100).contains(&year) {
        return Err(invalid("season", "expected a 4-digit year"));
    }
    Ok(())
}

fn validate_search(value: &str) -> Result<(), ValidationError> {
    if value.len() < MIN_SEARCH_LEN || value.len() > MAX_SEARCH_LEN {
        return Err(invalid("search", "expected 2 to 64 characters"));
    }
    let allowed = value
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '\'' | '.'));
    if !allowed {
        return Err(invalid("search", "unsupported characters"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_allowlist() {
        assert!(validate_resource("teams").is_ok());
        assert!(validate_resource("fixtures").is_ok());
        assert_eq!(
            validate_resource("managers"),
            Err(ValidationError::UnknownResource("managers".into()))
        );
    }

    #[test]
    fn test_path_segments() {
        assert!(validate_path_segment("42").is_ok());
        assert!(validate_path_segment("squad").is_ok());
        assert!(validate_path_segment("42abc").is_err());
        assert!(validate_path_segment("").is_err());
        assert!(validate_path_segment(&"x".repeat(33)).is_err());
    }

    #[test]
    fn test_query_normalization_sorts_and_trims() {
        let normalized = validate_query("season=2025&search=%20kane%20").unwrap();
        assert_eq!(normalized, "search=kane&season=2025");
    }

    #[test]
    fn test_identifier_params() {
        assert!(validate_query("team=42&page=3").is_ok());
        assert!(validate_query("team=42or1").is_err());
        assert!(validate_query("id=12345678901").is_err());
    }

    #[test]
    fn test_season_bounds() {
        assert!(validate_query("season=2025").is_ok());
        assert!(validate_query("season=25").is_err());
        assert!(validate_query("season=2500").is_err());
        assert!(validate_query("season=abcd").is_err());
    }

    #[test]
    fn test_search_terms() {
        assert!(validate_query("search=kane").is_ok());
        assert!(validate_query("search=O'Neil").is_ok());
        assert!(validate_query("search=saint-maximin").is_ok());
        assert!(validate_query("search=k").is_err());
        assert!(validate_query("search=a%3Bdrop%20table").is_err());
    }

    #[test]
    fn test_unknown_param_rejected() {
        assert_eq!(
            validate_query("bogus=1"),
            Err(ValidationError::UnknownParam("bogus".into()))
        );
    }
}
