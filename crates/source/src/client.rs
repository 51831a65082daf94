//! Authenticated batch fetch from the spreadsheet API.
//!
//! [`SheetSourceClient`] performs exactly one `GET` per invocation and
//! reports transport, status, and parse failures separately. It never
//! retries -- whether a failed cycle is repeated is the poller's decision.

use std::time::Duration;

use vigil_core::{EndpointConfig, VitalRecord};

/// HTTP request timeout for a single fetch.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from the data source layer.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The data source returned a non-2xx status code.
    #[error("Data source returned HTTP {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response body was not a JSON array of records.
    #[error("Malformed data source response: {0}")]
    Parse(String),
}

/// HTTP client for the spreadsheet endpoint.
pub struct SheetSourceClient {
    client: reqwest::Client,
}

impl SheetSourceClient {
    /// Create a client with a pre-configured connection pool and timeout.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client }
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Fetch the current record batch from the configured endpoint.
    ///
    /// Sends the bearer token as the `Authorization` credential. One
    /// network call, no retries.
    pub async fn fetch_batch(
        &self,
        config: &EndpointConfig,
    ) -> Result<Vec<VitalRecord>, SourceError> {
        tracing::debug!(endpoint = %config.url, "Fetching record batch");

        let response = self
            .client
            .get(&config.url)
            .bearer_auth(&config.bearer_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        parse_batch(&body)
    }
}

impl Default for SheetSourceClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a response body into a batch of raw records.
///
/// The body must be a JSON array of objects; anything else is a parse
/// failure. Field-level checks happen later, in validation.
pub fn parse_batch(body: &str) -> Result<Vec<VitalRecord>, SourceError> {
    serde_json::from_str::<Vec<VitalRecord>>(body).map_err(|e| SourceError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_an_array_of_records() {
        let body = r#"[
            {"HR": "72", "BP": "120", "SpO2": "98", "RESP": "16", "TEMP": "36.5", "Patient_ID": "101"},
            {"HR": "75", "BP": "118", "SpO2": "97", "RESP": "18", "TEMP": "36.7", "Patient_ID": "102"}
        ]"#;

        let batch = parse_batch(body).expect("well-formed array should parse");
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0]["Patient_ID"], "101");
    }

    #[test]
    fn parses_an_empty_array() {
        // An empty sheet is well-formed; rejecting it is validation's job.
        let batch = parse_batch("[]").expect("empty array should parse");
        assert!(batch.is_empty());
    }

    #[test]
    fn rejects_a_top_level_object() {
        let err = parse_batch(r#"{"error": "quota exceeded"}"#).unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }

    #[test]
    fn rejects_non_json_bodies() {
        let err = parse_batch("<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }

    #[test]
    fn rejects_arrays_of_non_objects() {
        let err = parse_batch(r#"["just", "strings"]"#).unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }
}
