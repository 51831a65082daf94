//! Batch shape validation for fetched vital-sign records.
//!
//! A batch is accepted or rejected atomically: every record must carry all
//! six required fields with usable, non-empty values, or the whole batch
//! is invalid.

use crate::types::VitalRecord;

/// The fields every record must carry.
pub const REQUIRED_FIELDS: [&str; 6] = ["HR", "BP", "SpO2", "RESP", "TEMP", "Patient_ID"];

/// A batch that failed the required-field contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The fetched batch contained no records.
    #[error("Fetched batch contains no records")]
    EmptyBatch,

    /// A record lacks one of the required fields entirely.
    #[error("Record {index}: missing required field '{field}'")]
    MissingField { index: usize, field: &'static str },

    /// A required field is present but empty or not a usable scalar.
    #[error("Record {index}: field '{field}' has no usable value")]
    EmptyField { index: usize, field: &'static str },
}

/// Check a batch against the required-field contract.
///
/// Returns the first violation found; record order is preserved so the
/// reported index matches the fetched batch.
pub fn check_batch(batch: &[VitalRecord]) -> Result<(), ValidationError> {
    if batch.is_empty() {
        return Err(ValidationError::EmptyBatch);
    }

    for (index, record) in batch.iter().enumerate() {
        for field in REQUIRED_FIELDS {
            match record.get(field) {
                None => return Err(ValidationError::MissingField { index, field }),
                Some(serde_json::Value::String(s)) if s.is_empty() => {
                    return Err(ValidationError::EmptyField { index, field })
                }
                Some(serde_json::Value::String(_)) | Some(serde_json::Value::Number(_)) => {}
                Some(_) => return Err(ValidationError::EmptyField { index, field }),
            }
        }
    }

    Ok(())
}

/// Boolean form of [`check_batch`].
pub fn validate_batch(batch: &[VitalRecord]) -> bool {
    check_batch(batch).is_ok()
}
