//! Poller lifecycle state as seen by subscribers.

use serde::Serialize;
use vigil_core::Timestamp;

use crate::error::{PipelineError, Stage};

/// Error details surfaced to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorInfo {
    /// The stage the failure originated from.
    pub stage: Stage,
    /// Human-readable description.
    pub message: String,
}

impl From<&PipelineError> for ErrorInfo {
    fn from(error: &PipelineError) -> Self {
        Self {
            stage: error.stage(),
            message: error.to_string(),
        }
    }
}

/// Lifecycle snapshot of the poller.
///
/// Created idle; `running` flips on a start command, back off on stop or
/// on the first cycle failure, which also sets `last_error`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PollerState {
    /// Whether a poll schedule is currently active.
    pub running: bool,
    /// Completion time of the most recent successful cycle.
    pub last_success_at: Option<Timestamp>,
    /// Terminal error of the most recent failed cycle, if any.
    pub last_error: Option<ErrorInfo>,
}
