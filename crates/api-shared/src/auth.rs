/// Errors from API key validation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ApiKeyError {
    #[error("missing API key")]
    Missing,
    #[error("invalid API key")]
    Invalid,
}

/// Validates a caller-supplied API key against the configured one.
///
/// When no key is configured every request is accepted.
pub fn validate_api_key(expected: Option<&str>, provided: Option<&str>) -> Result<(), ApiKeyError> {
    let Some(expected) = expected else {
        return Ok(());
    };
    match provided {
        None => Err(ApiKeyError::Missing),
        Some(key) if key == expected => Ok(()),
        Some(_) => Err(ApiKeyError::Invalid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_configured_key_accepts_everything() {
        assert_eq!(validate_api_key(None, None), Ok(()));
        assert_eq!(validate_api_key(None, Some("anything")), Ok(()));
    }

    #[test]
    fn test_configured_key() {
        assert_eq!(validate_api_key(Some("k1"), Some("k1")), Ok(()));
        assert_eq!(validate_api_key(Some("k1"), Some("k2")), Err(ApiKeyError::Invalid));
        assert_eq!(validate_api_key(Some("k1"), None), Err(ApiKeyError::Missing));
    }
}
