//! Seams over the remote collaborators.
//!
//! The poller drives its clients through these traits so tests can swap
//! in-memory fakes for the HTTP implementations.

use async_trait::async_trait;
use vigil_core::{EndpointConfig, VitalRecord};
use vigil_inference::{InferenceError, PredictionClient};
use vigil_source::{SheetSourceClient, SourceError};

/// A source of vital-sign record batches.
#[async_trait]
pub trait VitalsSource: Send + Sync {
    /// Fetch the current record batch from the configured endpoint.
    /// One call, no retries.
    async fn fetch_batch(&self, config: &EndpointConfig)
        -> Result<Vec<VitalRecord>, SourceError>;
}

#[async_trait]
impl VitalsSource for SheetSourceClient {
    async fn fetch_batch(
        &self,
        config: &EndpointConfig,
    ) -> Result<Vec<VitalRecord>, SourceError> {
        SheetSourceClient::fetch_batch(self, config).await
    }
}

/// A scoring model for validated batches.
#[async_trait]
pub trait RiskModel: Send + Sync {
    /// Score a batch; the result is index-aligned with the input and its
    /// length has been checked against the submitted record count.
    async fn predict(&self, batch: &[VitalRecord]) -> Result<Vec<f64>, InferenceError>;
}

#[async_trait]
impl RiskModel for PredictionClient {
    async fn predict(&self, batch: &[VitalRecord]) -> Result<Vec<f64>, InferenceError> {
        PredictionClient::predict(self, batch).await
    }
}
