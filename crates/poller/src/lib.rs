//! The Vigil poll engine.
//!
//! This crate provides the monitoring pipeline's state machine:
//!
//! - [`Poller`] -- owns the endpoint configuration and the remote clients,
//!   runs fetch → validate → predict → classify → aggregate cycles on a
//!   non-overlapping schedule, and halts on the first failure.
//! - [`MonitorSnapshot`] -- the read-only view broadcast to subscribers on
//!   every state change.
//! - [`VitalsSource`] / [`RiskModel`] -- seams over the two remote
//!   collaborators, implemented by the HTTP clients and by in-memory
//!   fakes in tests.

pub mod error;
pub mod poller;
pub mod snapshot;
pub mod state;
pub mod traits;

pub use error::{CommandError, PipelineError, Stage};
pub use poller::{Poller, DEFAULT_POLL_INTERVAL};
pub use snapshot::MonitorSnapshot;
pub use state::{ErrorInfo, PollerState};
pub use traits::{RiskModel, VitalsSource};
