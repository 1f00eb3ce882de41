//! Telemetry configuration from environment variables.

use std::env;

/// Logging configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to every log line.
    pub service_name: String,
    /// `tracing_subscriber::EnvFilter` directive (e.g. "info", "cw_consensus=debug").
    pub log_level: String,
    /// `pretty` for a human console, `json` for log aggregation.
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "cw-node".to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl TelemetryConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    ///
    /// Recognized variables: `LOG_LEVEL` (default `info`), `LOG_FORMAT`
    /// (`pretty` default, or `json`).
    pub fn from_env() -> Self {
        let log_format = env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Self {
            service_name: env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| "cw-node".to_string()),
            log_level: env::var("LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),
            log_format: if log_format {
                LogFormat::Json
            } else {
                LogFormat::Pretty
            },
        }
    }
}
