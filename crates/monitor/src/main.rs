//! `vigil-monitor` -- headless vitals risk-monitoring daemon.
//!
//! Polls a spreadsheet-backed vitals endpoint, scores each batch against
//! the remote prediction service, and logs per-cycle risk summaries.
//! Exits non-zero when the pipeline halts on an error, so a supervisor
//! can decide whether to restart it.
//!
//! # Environment variables
//!
//! | Variable                   | Required | Default | Description                                  |
//! |----------------------------|----------|---------|----------------------------------------------|
//! | `VIGIL_SHEET_URL`          | yes      | --      | Data source endpoint, e.g. `https://sheetdb.io/api/v1/abc123` |
//! | `VIGIL_SHEET_TOKEN`        | yes      | --      | Bearer token for the data source             |
//! | `VIGIL_PREDICT_URL`        | yes      | --      | Prediction RPC endpoint                      |
//! | `VIGIL_POLL_INTERVAL_SECS` | no       | `10`    | Seconds between cycle completions            |

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vigil_core::EndpointConfig;
use vigil_inference::PredictionClient;
use vigil_poller::{MonitorSnapshot, Poller};
use vigil_source::SheetSourceClient;

/// Default delay between cycle completions, in seconds.
const DEFAULT_INTERVAL_SECS: u64 = 10;

fn require_env(name: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| {
        tracing::error!("{name} environment variable is required");
        std::process::exit(1);
    })
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vigil_monitor=info,vigil_poller=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let sheet_url = require_env("VIGIL_SHEET_URL");
    let sheet_token = require_env("VIGIL_SHEET_TOKEN");
    let predict_url = require_env("VIGIL_PREDICT_URL");

    let interval_secs: u64 = std::env::var("VIGIL_POLL_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_INTERVAL_SECS);

    let config = EndpointConfig::new(sheet_url, sheet_token);

    tracing::info!(
        endpoint = %config,
        predict_url = %predict_url,
        interval_secs,
        "Starting vigil-monitor",
    );

    let source = Arc::new(SheetSourceClient::new());
    let model = Arc::new(PredictionClient::new(predict_url));
    let poller = Poller::with_interval(source, model, Duration::from_secs(interval_secs));

    // Probe once before streaming so a bad link or token fails fast with
    // a synchronous error instead of a halted poll loop.
    match poller.verify_endpoint(&config).await {
        Ok(records) => tracing::info!(records, "Endpoint verified"),
        Err(e) => {
            tracing::error!(stage = ?e.stage(), error = %e, "Endpoint verification failed");
            std::process::exit(1);
        }
    }

    let mut snapshots = poller.subscribe();

    if let Err(e) = poller.start(config).await {
        tracing::error!(error = %e, "Failed to start polling");
        std::process::exit(1);
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown requested");
                poller.stop().await;
                break;
            }
            snapshot = snapshots.recv() => {
                match snapshot {
                    Ok(snapshot) => {
                        if !log_snapshot(&snapshot) {
                            std::process::exit(1);
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(missed)) => {
                        tracing::warn!(missed, "Snapshot subscriber lagging");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }
}

/// Log one emitted snapshot. Returns `false` when the pipeline has
/// halted on an error and the daemon should exit.
fn log_snapshot(snapshot: &MonitorSnapshot) -> bool {
    if let Some(error) = &snapshot.state.last_error {
        tracing::error!(
            stage = ?error.stage,
            error = %error.message,
            "Pipeline halted; fix the configuration and restart",
        );
        return false;
    }

    tracing::info!(
        running = snapshot.state.running,
        patients = snapshot.patients.len(),
        low = snapshot.summary.low,
        medium = snapshot.summary.medium,
        high = snapshot.summary.high,
        "Snapshot",
    );

    for patient in &snapshot.patients {
        tracing::debug!(
            id = %patient.id,
            band = patient.risk_band.label(),
            score = patient.score,
            hr = %patient.hr,
            bp = %patient.bp,
            spo2 = %patient.spo2,
            "Patient scored",
        );
    }

    true
}
