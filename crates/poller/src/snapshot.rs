//! The read-only view broadcast to subscribers.

use serde::Serialize;
use vigil_core::{PatientRecord, RiskSummary};

use crate::state::PollerState;

/// One emitted view of the pipeline: lifecycle state plus the latest
/// fully-processed cycle outputs.
///
/// Snapshots are value objects -- subscribers must treat them as read-only
/// and never see a partially-processed cycle. On failure the patient rows
/// and summary keep the last successful cycle's values; only `state`
/// carries the error.
#[derive(Debug, Clone, Serialize)]
pub struct MonitorSnapshot {
    pub state: PollerState,
    pub patients: Vec<PatientRecord>,
    pub summary: RiskSummary,
}
