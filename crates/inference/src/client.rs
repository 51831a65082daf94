//! HTTP RPC wrapper for the prediction service.
//!
//! The service takes the newline/comma-delimited batch string and answers
//! with a result envelope: a comma-delimited numeric string under the
//! `Success` key, or a `Failure` record with a message.

use std::time::Duration;

use serde::Deserialize;
use vigil_core::types::VitalRecord;

use crate::wire;

/// HTTP request timeout for a single prediction call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from the prediction layer.
///
/// Every variant is terminal for the current cycle; none are retried.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The prediction service returned a non-2xx status code.
    #[error("Prediction service returned HTTP {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The service answered with its failure envelope.
    #[error("Prediction rejected: {0}")]
    Rejected(String),

    /// The response carried neither a success payload nor a failure.
    #[error("Prediction response lacks a success payload")]
    MissingPayload,

    /// A token in the score payload did not parse as a number.
    #[error("Prediction payload is not numeric at '{0}'")]
    MalformedScores(String),

    /// The returned score count does not match the submitted record count.
    #[error("Expected {expected} scores, got {actual}")]
    ScoreCountMismatch { expected: usize, actual: usize },

    /// Refused to submit an empty batch.
    #[error("Refusing to submit an empty batch for prediction")]
    EmptyBatch,
}

/// Result envelope returned by the prediction RPC.
#[derive(Debug, Deserialize)]
pub(crate) struct PredictionEnvelope {
    #[serde(rename = "Success")]
    success: Option<String>,
    #[serde(rename = "Failure")]
    failure: Option<PredictionFailure>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PredictionFailure {
    message: String,
}

impl PredictionEnvelope {
    /// Extract the score payload, surfacing the service's own failure
    /// message when present.
    pub(crate) fn into_payload(self) -> Result<String, InferenceError> {
        if let Some(failure) = self.failure {
            return Err(InferenceError::Rejected(failure.message));
        }
        self.success.ok_or(InferenceError::MissingPayload)
    }
}

/// HTTP client for the prediction service.
pub struct PredictionClient {
    client: reqwest::Client,
    url: String,
}

impl PredictionClient {
    /// Create a client targeting the prediction endpoint.
    pub fn new(url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            url: url.into(),
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Prediction endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Score a validated batch.
    ///
    /// Returns one score per submitted record, index-aligned with the
    /// input -- the length check runs before the scores are handed back,
    /// so a miscounted response can never reach aggregation.
    pub async fn predict(&self, batch: &[VitalRecord]) -> Result<Vec<f64>, InferenceError> {
        let csv_content = wire::encode_batch(batch)?;

        tracing::debug!(records = batch.len(), "Submitting batch for prediction");

        let response = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "csv_content": csv_content }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: PredictionEnvelope = response.json().await?;
        let payload = envelope.into_payload()?;
        wire::decode_scores(&payload, batch.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: serde_json::Value) -> PredictionEnvelope {
        serde_json::from_value(value).expect("envelope should deserialize")
    }

    #[test]
    fn success_envelope_yields_the_payload() {
        let payload = envelope(json!({"Success": "0.42,0.9"}))
            .into_payload()
            .expect("success envelope carries a payload");
        assert_eq!(payload, "0.42,0.9");
    }

    #[test]
    fn failure_envelope_surfaces_the_service_message() {
        let err = envelope(json!({"Failure": {"message": "model not loaded"}}))
            .into_payload()
            .unwrap_err();
        match err {
            InferenceError::Rejected(message) => assert_eq!(message, "model not loaded"),
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn empty_envelope_is_missing_payload() {
        let err = envelope(json!({})).into_payload().unwrap_err();
        assert!(matches!(err, InferenceError::MissingPayload));
    }

    #[test]
    fn failure_wins_when_both_keys_are_present() {
        let err = envelope(json!({"Success": "0.1", "Failure": {"message": "stale"}}))
            .into_payload()
            .unwrap_err();
        assert!(matches!(err, InferenceError::Rejected(_)));
    }
}
