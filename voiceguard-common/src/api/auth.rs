//! API key validation
//!
//! Every request carries the static token in the `x-api-key` header. The
//! expected token is resolved once at startup (see [`crate::config`]).
//!
//! # Pure Functions
//!
//! No HTTP framework dependencies here; the axum middleware lives in the
//! service crate.

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// API key validation failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKeyError {
    /// Header absent or empty
    Missing,

    /// Header present but does not match the configured token
    Invalid,
}

impl std::fmt::Display for ApiKeyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiKeyError::Missing => write!(f, "{} header missing", API_KEY_HEADER),
            ApiKeyError::Invalid => write!(f, "Invalid API key"),
        }
    }
}

impl std::error::Error for ApiKeyError {}

/// Validate a provided API key against the expected token
///
/// # Examples
///
/// ```
/// use voiceguard_common::api::auth::{validate_api_key, ApiKeyError};
///
/// assert!(validate_api_key(Some("secret"), "secret").is_ok());
/// assert_eq!(validate_api_key(None, "secret"), Err(ApiKeyError::Missing));
/// assert_eq!(validate_api_key(Some("nope"), "secret"), Err(ApiKeyError::Invalid));
/// ```
pub fn validate_api_key(provided: Option<&str>, expected: &str) -> Result<(), ApiKeyError> {
    let provided = match provided {
        Some(key) if !key.is_empty() => key,
        _ => return Err(ApiKeyError::Missing),
    };

    if constant_time_eq(provided.as_bytes(), expected.as_bytes()) {
        Ok(())
    } else {
        Err(ApiKeyError::Invalid)
    }
}

/// Byte comparison whose running time does not depend on where inputs differ
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_key() {
        assert!(validate_api_key(Some("test123"), "test123").is_ok());
    }

    #[test]
    fn test_missing_key() {
        assert_eq!(validate_api_key(None, "test123"), Err(ApiKeyError::Missing));
    }

    #[test]
    fn test_empty_key_treated_as_missing() {
        assert_eq!(validate_api_key(Some(""), "test123"), Err(ApiKeyError::Missing));
    }

    #[test]
    fn test_wrong_key() {
        assert_eq!(
            validate_api_key(Some("test124"), "test123"),
            Err(ApiKeyError::Invalid)
        );
    }

    #[test]
    fn test_prefix_of_key_is_invalid() {
        assert_eq!(
            validate_api_key(Some("test"), "test123"),
            Err(ApiKeyError::Invalid)
        );
    }

    #[test]
    fn test_key_is_case_sensitive() {
        assert_eq!(
            validate_api_key(Some("TEST123"), "test123"),
            Err(ApiKeyError::Invalid)
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(ApiKeyError::Missing.to_string(), "x-api-key header missing");
        assert_eq!(ApiKeyError::Invalid.to_string(), "Invalid API key");
    }
}
