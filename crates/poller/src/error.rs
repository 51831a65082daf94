//! Pipeline error taxonomy with originating-stage tagging.

use serde::Serialize;
use vigil_core::config::ConfigError;
use vigil_core::validate::ValidationError;
use vigil_inference::InferenceError;
use vigil_source::SourceError;

/// The pipeline stage an error originated from.
///
/// Surfaced alongside the message so a user can tell a bad endpoint from
/// a bad sheet from a misbehaving model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Config,
    Fetch,
    Validate,
    Predict,
}

/// Terminal error for one pipeline cycle.
///
/// Every variant halts polling; nothing is retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] SourceError),

    #[error(transparent)]
    Validate(#[from] ValidationError),

    #[error(transparent)]
    Predict(#[from] InferenceError),
}

impl PipelineError {
    /// The stage this error originated from.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Config(_) => Stage::Config,
            PipelineError::Fetch(_) => Stage::Fetch,
            PipelineError::Validate(_) => Stage::Validate,
            PipelineError::Predict(_) => Stage::Predict,
        }
    }
}

/// Synchronous rejection of a `start` or `reconfigure` command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The supplied endpoint configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The command requires the poller to be stopped first.
    #[error("Poller is already running")]
    AlreadyRunning,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_follows_the_originating_layer() {
        let config = PipelineError::from(ConfigError::EmptyToken);
        assert_eq!(config.stage(), Stage::Config);

        let validate = PipelineError::from(ValidationError::EmptyBatch);
        assert_eq!(validate.stage(), Stage::Validate);

        let predict = PipelineError::from(InferenceError::ScoreCountMismatch {
            expected: 2,
            actual: 1,
        });
        assert_eq!(predict.stage(), Stage::Predict);
    }

    #[test]
    fn messages_pass_through_transparently() {
        let err = PipelineError::from(ValidationError::MissingField {
            index: 3,
            field: "SpO2",
        });
        assert_eq!(err.to_string(), "Record 3: missing required field 'SpO2'");
    }
}
