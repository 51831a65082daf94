//! Data source endpoint configuration.
//!
//! [`EndpointConfig`] pairs the spreadsheet API URL with its bearer token.
//! The URL must match the provider's fixed path shape before the poller
//! accepts it; the token is masked in all display output.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Accepted endpoint shape: `https://sheetdb.io/api/v1/<identifier>`,
/// optionally with a trailing slash.
const ENDPOINT_PATTERN: &str = r"^https://sheetdb\.io/api/v1/[\w-]+/?$";

/// Number of trailing token characters left visible when masking.
const MASK_VISIBLE_CHARS: usize = 4;

fn endpoint_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(ENDPOINT_PATTERN).expect("endpoint pattern is valid"))
}

/// Rejected endpoint configuration. Surfaced synchronously, before any
/// network activity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The URL does not match the accepted endpoint shape.
    #[error("Endpoint URL must match https://sheetdb.io/api/v1/<id>, got '{0}'")]
    InvalidUrl(String),

    /// The bearer token is empty or whitespace.
    #[error("Bearer token must not be empty")]
    EmptyToken,
}

/// Validate a candidate endpoint URL against the accepted shape.
pub fn validate_endpoint_url(url: &str) -> Result<(), ConfigError> {
    if endpoint_pattern().is_match(url) {
        Ok(())
    } else {
        Err(ConfigError::InvalidUrl(url.to_string()))
    }
}

/// Mask a bearer token for display: a fixed run of asterisks followed by
/// the last four characters. Short tokens mask to the asterisk run alone.
pub fn mask_token(token: &str) -> String {
    const MASK: &str = "********";
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 10 {
        return MASK.to_string();
    }
    let tail: String = chars[chars.len() - MASK_VISIBLE_CHARS..].iter().collect();
    format!("{MASK}{tail}")
}

/// Connection settings for the spreadsheet-backed data source.
///
/// Owned by the poller once accepted; the presentation layer changes it
/// only through the poller's `reconfigure`.
#[derive(Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    /// Full endpoint URL, e.g. `https://sheetdb.io/api/v1/abc123`.
    pub url: String,
    /// Bearer token sent as the `Authorization` credential.
    pub bearer_token: String,
}

impl EndpointConfig {
    pub fn new(url: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            bearer_token: bearer_token.into(),
        }
    }

    /// Check this configuration against the acceptance rules.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_endpoint_url(&self.url)?;
        if self.bearer_token.trim().is_empty() {
            return Err(ConfigError::EmptyToken);
        }
        Ok(())
    }

    /// The bearer token with all but the last characters hidden.
    pub fn masked_token(&self) -> String {
        mask_token(&self.bearer_token)
    }
}

// The token must never reach logs, so Debug and Display both mask it.
impl fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("url", &self.url)
            .field("bearer_token", &self.masked_token())
            .finish()
    }
}

impl fmt::Display for EndpointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (token {})", self.url, self.masked_token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_endpoint() {
        assert!(validate_endpoint_url("https://sheetdb.io/api/v1/abc123").is_ok());
        assert!(validate_endpoint_url("https://sheetdb.io/api/v1/a_b-C9/").is_ok());
    }

    #[test]
    fn rejects_wrong_scheme_or_path() {
        assert!(validate_endpoint_url("http://example.com/x").is_err());
        assert!(validate_endpoint_url("http://sheetdb.io/api/v1/abc123").is_err());
        assert!(validate_endpoint_url("https://sheetdb.io/api/v2/abc123").is_err());
        assert!(validate_endpoint_url("https://sheetdb.io/api/v1/").is_err());
        assert!(validate_endpoint_url("https://sheetdb.io/api/v1/abc/extra").is_err());
    }

    #[test]
    fn validate_requires_non_empty_token() {
        let config = EndpointConfig::new("https://sheetdb.io/api/v1/abc123", "   ");
        assert_eq!(config.validate(), Err(ConfigError::EmptyToken));
    }

    #[test]
    fn valid_config_passes() {
        let config = EndpointConfig::new("https://sheetdb.io/api/v1/abc123", "secret-token-xyz");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn masking_keeps_only_the_tail() {
        assert_eq!(mask_token("secret-token-xyz9"), "********xyz9");
        // Short tokens reveal nothing.
        assert_eq!(mask_token("short"), "********");
        assert_eq!(mask_token(""), "********");
    }

    #[test]
    fn debug_and_display_never_contain_the_raw_token() {
        let config = EndpointConfig::new("https://sheetdb.io/api/v1/abc123", "super-secret-token");
        let debug = format!("{config:?}");
        let display = format!("{config}");
        assert!(!debug.contains("super-secret-token"));
        assert!(!display.contains("super-secret-token"));
        assert!(display.contains("https://sheetdb.io/api/v1/abc123"));
    }
}
