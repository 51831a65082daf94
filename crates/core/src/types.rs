//! Shared domain types for the monitoring pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::risk::RiskBand;

/// All timestamps are UTC.
pub type Timestamp = DateTime<Utc>;

/// One fetched spreadsheet row, kept in wire form until validated.
///
/// Spreadsheet exports are loosely typed -- numeric cells may arrive as
/// JSON strings or numbers -- so rows stay as JSON maps through validation
/// and only become [`PatientRecord`]s after scoring.
pub type VitalRecord = serde_json::Map<String, serde_json::Value>;

/// Render a record field as text, if it holds a usable scalar.
///
/// Strings are returned as-is (including the empty string), numbers are
/// formatted. `None` for absent fields and non-scalar values.
pub fn field_text(record: &VitalRecord, field: &str) -> Option<String> {
    match record.get(field) {
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// A fully processed patient row for the latest cycle.
///
/// Built fresh by [`aggregate`](crate::aggregate::aggregate) each cycle;
/// the previous cycle's rows are replaced wholesale, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Spreadsheet `Patient_ID` of the row this record was built from.
    pub id: String,
    /// Heart rate, as it appeared in the source row.
    pub hr: String,
    /// Systolic blood pressure.
    pub bp: String,
    /// Oxygen saturation.
    pub spo2: String,
    /// Respiration rate.
    pub resp: String,
    /// Body temperature.
    pub temp: String,
    /// Band classified from `score`.
    pub risk_band: RiskBand,
    /// Raw model output in `[0, 1]`.
    pub score: f64,
    /// When this cycle's aggregation ran (UTC).
    pub observed_at: Timestamp,
}

/// Per-band patient counts for the latest cycle.
///
/// All three bands are always present, even when zero. Replaces the
/// previous cycle's summary wholesale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskSummary {
    pub low: u32,
    pub medium: u32,
    pub high: u32,
}

impl RiskSummary {
    /// Tally one classified record into the summary.
    pub fn record(&mut self, band: RiskBand) {
        match band {
            RiskBand::Low => self.low += 1,
            RiskBand::Medium => self.medium += 1,
            RiskBand::High => self.high += 1,
        }
    }

    /// Count for a single band.
    pub fn count(&self, band: RiskBand) -> u32 {
        match band {
            RiskBand::Low => self.low,
            RiskBand::Medium => self.medium,
            RiskBand::High => self.high,
        }
    }

    /// Total records across all bands.
    pub fn total(&self) -> u32 {
        self.low + self.medium + self.high
    }
}
