//! Subscriber installation and the journal field vocabulary.
//!
//! One `tracing-subscriber` registry carries both ordinary diagnostics and
//! the journal records emitted by [`TracingJournal`](crate::journal::TracingJournal),
//! so an operator reads a single stream.
//!
//! ```rust,ignore
//! use edge_telemetry::logging::{init_logging, LogConfig, LogFormat};
//!
//! init_logging(&LogConfig::for_format(LogFormat::Json))?;
//! tracing::info!(request_id = %id, "document resolved");
//! ```

use crate::error::TelemetryError;
use crate::TelemetryResult;
use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Output encoding of log lines.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line; journal fields become top-level keys.
    #[default]
    Json,
    /// Multi-line human-readable output.
    Pretty,
}

impl LogFormat {
    /// Parses a format name, ignoring case.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "pretty" => Some(Self::Pretty),
            _ => None,
        }
    }
}

/// Subscriber settings.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// When `false`, no subscriber is installed.
    pub enabled: bool,

    /// `EnvFilter` directive, e.g. `info` or `edge_middleware=debug,warn`.
    pub level: String,

    /// Line encoding.
    pub format: LogFormat,

    /// ANSI colors. Ignored for JSON.
    pub ansi: bool,

    /// Emit source file and line.
    pub include_location: bool,

    /// Recorded once when the subscriber comes up.
    pub service_name: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::for_format(LogFormat::Json)
    }
}

impl LogConfig {
    /// Settings suited to the given format: JSON at `info` for deployments,
    /// pretty at `debug` with colors and locations for local work.
    #[must_use]
    pub fn for_format(format: LogFormat) -> Self {
        let pretty = format == LogFormat::Pretty;
        Self {
            enabled: true,
            level: if pretty { "debug" } else { "info" }.to_string(),
            format,
            ansi: pretty,
            include_location: pretty,
            service_name: "edge".to_string(),
        }
    }

    fn layer(&self) -> TelemetryResult<Box<dyn Layer<Registry> + Send + Sync>> {
        let filter = create_env_filter(&self.level)?;
        let base = tracing_subscriber::fmt::layer()
            .with_file(self.include_location)
            .with_line_number(self.include_location)
            .with_span_events(FmtSpan::NONE);

        Ok(match self.format {
            LogFormat::Json => base
                .json()
                .flatten_event(true)
                .with_filter(filter)
                .boxed(),
            LogFormat::Pretty => base
                .pretty()
                .with_ansi(self.ansi)
                .with_filter(filter)
                .boxed(),
        })
    }
}

/// Installs the global subscriber described by `config`.
///
/// # Errors
///
/// Returns `TelemetryError::LoggingInit` if the filter is invalid or a global
/// subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    tracing_subscriber::registry()
        .with(config.layer()?)
        .try_init()
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;

    tracing::debug!(service = %config.service_name, format = ?config.format, "logging initialized");
    Ok(())
}

/// Parses a filter directive.
///
/// # Errors
///
/// Returns `TelemetryError::LoggingInit` naming the bad directive.
pub fn create_env_filter(filter: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(filter)
        .map_err(|e| TelemetryError::LoggingInit(format!("invalid filter {filter:?}: {e}")))
}

/// Field names used on journal events.
pub mod fields {
    /// Journal message id (e.g. `error_handler`).
    pub const MESSAGE_ID: &str = "MESSAGE_ID";

    /// Server-generated request id.
    pub const REQUEST_ID: &str = "REQUEST_ID";

    /// Client-supplied request id.
    pub const CLIENT_REQUEST_ID: &str = "CLIENT_REQUEST_ID";

    /// Status reported with an error record.
    pub const ERROR_STATUS: &str = "ERROR_STATUS";

    /// Dict-style rendering of the query parameters.
    pub const PARAMS: &str = "PARAMS";
}
