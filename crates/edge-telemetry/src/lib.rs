//! Observability for the edge API.
//!
//! - **Logging**: structured JSON (or pretty) output via `tracing-subscriber`
//! - **Journal**: per-request structured records through an injected
//!   [`JournalSink`]
//! - **Metrics**: Prometheus-format counters via the `metrics` crate
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `edge_documents_resolved_total` | Counter | `kind`, `outcome` | Document lookups by result |
//! | `edge_errors_reported_total` | Counter | `status` | Error bodies returned to clients |
//!
//! # Example
//!
//! ```rust,ignore
//! use edge_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::builder()
//!     .service_name("edge-api")
//!     .environment("production")
//!     .build();
//!
//! init_telemetry(config)?;
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod journal;
pub mod logging;
pub mod metrics;

pub use config::{TelemetryConfig, TelemetryConfigBuilder};
pub use error::TelemetryError;
pub use journal::{JournalEntry, JournalFields, JournalLevel, JournalSink, MemoryJournal, TracingJournal};
pub use logging::{init_logging, LogConfig, LogFormat};
pub use self::metrics::{init_metrics, render_metrics, MetricsConfig, ResolveOutcome};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Initializes logging, then metrics.
///
/// # Errors
///
/// Returns `TelemetryError` if either subsystem fails to initialize.
pub fn init_telemetry(config: TelemetryConfig) -> TelemetryResult<()> {
    init_logging(&config.logging)?;
    init_metrics(&config.metrics)?;

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = %config.environment,
        "telemetry initialized"
    );
    Ok(())
}
