//! Batch wire format for the prediction RPC.
//!
//! One line per record, vitals in fixed column order, newline-joined.
//! `Patient_ID` never crosses the wire -- identity is restored after
//! scoring by index alignment, which [`decode_scores`] enforces with an
//! explicit length check.

use vigil_core::types::{field_text, VitalRecord};

use crate::client::InferenceError;

/// Column order of the wire format. The model was trained on exactly
/// these five columns.
pub const WIRE_FIELDS: [&str; 5] = ["HR", "BP", "SpO2", "RESP", "TEMP"];

/// Serialize a validated batch into the wire format.
///
/// An empty batch is rejected before the RPC -- the service refuses empty
/// payloads, so there is no point submitting one.
pub fn encode_batch(batch: &[VitalRecord]) -> Result<String, InferenceError> {
    if batch.is_empty() {
        return Err(InferenceError::EmptyBatch);
    }

    let lines: Vec<String> = batch
        .iter()
        .map(|record| {
            WIRE_FIELDS
                .iter()
                .map(|field| field_text(record, field).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect();

    Ok(lines.join("\n"))
}

/// Parse the comma-delimited score payload returned by the service.
///
/// `expected` is the submitted record count; a score count that differs
/// is an error, never a truncated result -- silent misalignment would
/// attach scores to the wrong patients.
pub fn decode_scores(payload: &str, expected: usize) -> Result<Vec<f64>, InferenceError> {
    let scores = payload
        .split(',')
        .map(|token| {
            token
                .trim()
                .parse::<f64>()
                .map_err(|_| InferenceError::MalformedScores(token.trim().to_string()))
        })
        .collect::<Result<Vec<f64>, _>>()?;

    if scores.len() != expected {
        return Err(InferenceError::ScoreCountMismatch {
            expected,
            actual: scores.len(),
        });
    }

    Ok(scores)
}
