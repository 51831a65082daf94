//! Vigil domain core: shared types, endpoint configuration, batch
//! validation, risk classification, and aggregation.
//!
//! Pure logic only -- no I/O. This crate has zero internal dependencies so
//! the client crates, the poller, and any future CLI tooling can all build
//! on it.

pub mod aggregate;
pub mod config;
pub mod risk;
pub mod types;
pub mod validate;

pub use aggregate::aggregate;
pub use config::{ConfigError, EndpointConfig};
pub use risk::RiskBand;
pub use types::{PatientRecord, RiskSummary, Timestamp, VitalRecord};
pub use validate::{check_batch, validate_batch, ValidationError, REQUIRED_FIELDS};
