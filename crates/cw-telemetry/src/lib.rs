//! # Telemetry
//!
//! Structured logging setup, initialized once at node startup.

pub mod config;

pub use config::{LogFormat, TelemetryConfig};

use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to install global tracing subscriber: {0}")]
    SubscriberInit(String),
}

/// Guard returned by [`init_telemetry`]; dropping it logs a shutdown line.
/// Kept as a distinct type (rather than returning `()`) so callers hold it
/// for the lifetime of `main` the same way a real exporter handle would
/// need to be held.
pub struct TelemetryGuard;

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("telemetry shutting down");
    }
}

/// Install the global `tracing` subscriber from `config`.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| TelemetryError::SubscriberInit(e.to_string()))?;

    let result = match config.log_format {
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
        LogFormat::Pretty => fmt().with_env_filter(filter).with_target(true).try_init(),
    };
    result.map_err(|e| TelemetryError::SubscriberInit(e.to_string()))?;

    tracing::info!(service = %config.service_name, format = ?config.log_format, "telemetry initialized");
    Ok(TelemetryGuard)
}
