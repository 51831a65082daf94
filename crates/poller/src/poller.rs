//! The poll-loop state machine.
//!
//! [`Poller`] owns the endpoint configuration, the two remote clients,
//! and the lifecycle state. One spawned task per run executes cycles
//! strictly in sequence: the delay before cycle N+1 is armed only after
//! cycle N's terminal outcome is known, so cycles never overlap even
//! against a slow network. `stop` cancels the run token, which both
//! prevents the armed delay from firing and discards any in-flight cycle
//! without emission.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{broadcast, RwLock};
use tokio_util::sync::CancellationToken;
use vigil_core::{aggregate, check_batch, EndpointConfig, PatientRecord, RiskSummary};

use crate::error::{CommandError, PipelineError};
use crate::snapshot::MonitorSnapshot;
use crate::state::{ErrorInfo, PollerState};
use crate::traits::{RiskModel, VitalsSource};

/// Delay between the completion of one cycle and the start of the next.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Snapshot channel capacity; slow subscribers observe `RecvError::Lagged`.
const SNAPSHOT_CHANNEL_CAPACITY: usize = 64;

/// The core polling state machine.
///
/// A cheap handle over shared state; clone it freely. All mutation goes
/// through `start` / `stop` / `reconfigure`, and subscribers receive a
/// [`MonitorSnapshot`] on every state change.
#[derive(Clone)]
pub struct Poller {
    shared: Arc<Shared>,
}

struct Shared {
    inner: RwLock<PollerInner>,
    source: Arc<dyn VitalsSource>,
    model: Arc<dyn RiskModel>,
    snapshot_tx: broadcast::Sender<MonitorSnapshot>,
    interval: Duration,
}

/// State owned exclusively by the poller, behind its lock.
#[derive(Default)]
struct PollerInner {
    config: Option<EndpointConfig>,
    state: PollerState,
    patients: Vec<PatientRecord>,
    summary: RiskSummary,
    /// Present exactly while a run is scheduled.
    run: Option<RunHandle>,
}

/// Bookkeeping for one active run.
struct RunHandle {
    cancel: CancellationToken,
    task: tokio::task::JoinHandle<()>,
}

impl Poller {
    /// Create a poller with the default 10-second cycle interval.
    pub fn new(source: Arc<dyn VitalsSource>, model: Arc<dyn RiskModel>) -> Self {
        Self::with_interval(source, model, DEFAULT_POLL_INTERVAL)
    }

    /// Create a poller with a custom cycle interval.
    pub fn with_interval(
        source: Arc<dyn VitalsSource>,
        model: Arc<dyn RiskModel>,
        interval: Duration,
    ) -> Self {
        let (snapshot_tx, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                inner: RwLock::new(PollerInner::default()),
                source,
                model,
                snapshot_tx,
                interval,
            }),
        }
    }

    /// Subscribe to emitted snapshots.
    pub fn subscribe(&self) -> broadcast::Receiver<MonitorSnapshot> {
        self.shared.snapshot_tx.subscribe()
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> PollerState {
        self.shared.inner.read().await.state.clone()
    }

    /// The latest full snapshot, for an initial render before any
    /// emission arrives.
    pub async fn latest(&self) -> MonitorSnapshot {
        let inner = self.shared.inner.read().await;
        MonitorSnapshot {
            state: inner.state.clone(),
            patients: inner.patients.clone(),
            summary: inner.summary,
        }
    }

    /// Display form of the accepted endpoint (token masked), if any.
    pub async fn current_endpoint(&self) -> Option<String> {
        let inner = self.shared.inner.read().await;
        inner.config.as_ref().map(|c| c.to_string())
    }

    /// Probe an endpoint once without starting the schedule: one fetch
    /// plus a shape check. Lets callers confirm user-entered
    /// configuration before streaming begins.
    pub async fn verify_endpoint(&self, config: &EndpointConfig) -> Result<usize, PipelineError> {
        config.validate()?;
        let batch = self.shared.source.fetch_batch(config).await?;
        check_batch(&batch)?;
        Ok(batch.len())
    }

    /// Accept a configuration and begin polling.
    ///
    /// The URL pattern is checked synchronously before any state change;
    /// the first cycle is attempted immediately on the spawned run task.
    /// Asynchronous failures arrive through the snapshot channel.
    pub async fn start(&self, config: EndpointConfig) -> Result<(), CommandError> {
        config.validate()?;

        let mut inner = self.shared.inner.write().await;
        if inner.run.is_some() {
            return Err(CommandError::AlreadyRunning);
        }

        let cancel = CancellationToken::new();
        let task = tokio::spawn(
            Arc::clone(&self.shared).run_loop(config.clone(), cancel.clone()),
        );

        tracing::info!(endpoint = %config.url, "Polling started");

        inner.config = Some(config);
        inner.run = Some(RunHandle { cancel, task });
        inner.state.running = true;
        inner.state.last_error = None;
        self.shared.emit(&inner);

        Ok(())
    }

    /// Stop polling.
    ///
    /// Cancels the pending schedule and discards any in-flight cycle; no
    /// snapshot is emitted after this returns. A no-op when idle.
    pub async fn stop(&self) {
        let mut inner = self.shared.inner.write().await;
        let Some(run) = inner.run.take() else {
            return;
        };

        run.cancel.cancel();
        run.task.abort();

        tracing::info!("Polling stopped");

        inner.state.running = false;
        self.shared.emit(&inner);
    }

    /// Replace the accepted configuration. Only allowed while idle; a
    /// failed pattern check leaves the prior configuration intact.
    pub async fn reconfigure(&self, config: EndpointConfig) -> Result<(), CommandError> {
        config.validate()?;

        let mut inner = self.shared.inner.write().await;
        if inner.run.is_some() {
            return Err(CommandError::AlreadyRunning);
        }

        tracing::info!(endpoint = %config.url, "Endpoint reconfigured");
        inner.config = Some(config);
        Ok(())
    }
}

impl Shared {
    /// Drive cycles until cancellation or the first failure.
    async fn run_loop(self: Arc<Self>, config: EndpointConfig, cancel: CancellationToken) {
        loop {
            let outcome = tokio::select! {
                _ = cancel.cancelled() => return,
                outcome = self.run_cycle(&config) => outcome,
            };

            if let Err(error) = outcome {
                self.fail(error, &cancel).await;
                return;
            }

            // Arm the next cycle only now that this one has completed.
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }

    /// One pipeline cycle: exactly one fetch, one validate, one predict,
    /// one aggregate. Emits the updated snapshot on success.
    async fn run_cycle(&self, config: &EndpointConfig) -> Result<(), PipelineError> {
        let batch = self.source.fetch_batch(config).await?;
        check_batch(&batch)?;
        let scores = self.model.predict(&batch).await?;
        let (patients, summary) = aggregate(&batch, &scores);

        tracing::info!(
            patients = patients.len(),
            low = summary.low,
            medium = summary.medium,
            high = summary.high,
            "Cycle complete"
        );

        let mut inner = self.inner.write().await;
        inner.patients = patients;
        inner.summary = summary;
        inner.state.last_success_at = Some(Utc::now());
        inner.state.last_error = None;
        self.emit(&inner);

        Ok(())
    }

    /// The single terminal transition point for cycle failures: halt the
    /// schedule, take the credentials out of active use, emit the error.
    async fn fail(&self, error: PipelineError, cancel: &CancellationToken) {
        let mut inner = self.inner.write().await;

        // stop() may have won the race while this cycle was finishing;
        // its guarantee is that nothing is emitted afterwards.
        if cancel.is_cancelled() {
            return;
        }

        tracing::error!(
            stage = ?error.stage(),
            error = %error,
            "Cycle failed; polling halted"
        );

        inner.run = None;
        inner.config = None;
        inner.state.running = false;
        inner.state.last_error = Some(ErrorInfo::from(&error));
        self.emit(&inner);
    }

    /// Publish the current snapshot. Zero subscribers is fine -- the send
    /// result only signals that nobody is listening.
    fn emit(&self, inner: &PollerInner) {
        let _ = self.snapshot_tx.send(MonitorSnapshot {
            state: inner.state.clone(),
            patients: inner.patients.clone(),
            summary: inner.summary,
        });
    }
}
