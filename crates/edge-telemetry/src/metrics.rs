//! Prometheus metrics for the edge API.
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `edge_documents_resolved_total` | Counter | `kind`, `outcome` | Document lookups by result |
//! | `edge_errors_reported_total` | Counter | `status` | Error bodies returned to clients |

use crate::error::TelemetryError;
use crate::TelemetryResult;
use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

/// Counter of document resolutions.
pub const DOCUMENTS_RESOLVED_TOTAL: &str = "edge_documents_resolved_total";

/// Counter of reported client errors.
pub const ERRORS_REPORTED_TOTAL: &str = "edge_errors_reported_total";

/// Global metrics handle for rendering.
static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metrics configuration.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Whether metrics are enabled.
    pub enabled: bool,

    /// Service name for metric labels.
    pub service_name: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            service_name: "edge".to_string(),
        }
    }
}

/// Outcome label of a document resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// The document exists and has the requested kind.
    Found,
    /// Absent, or present with another kind.
    NotFound,
    /// The store failed.
    StoreError,
}

impl ResolveOutcome {
    /// Returns the label value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Found => "found",
            Self::NotFound => "not_found",
            Self::StoreError => "store_error",
        }
    }
}

/// Installs the Prometheus recorder and registers metric descriptions.
///
/// # Errors
///
/// Returns `TelemetryError::MetricsInit` if a recorder is already installed.
pub fn init_metrics(config: &MetricsConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let handle = PrometheusBuilder::new()
        .add_global_label("service", config.service_name.clone())
        .install_recorder()
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;

    let _ = METRICS_HANDLE.set(handle);
    register_metric_descriptions();
    Ok(())
}

/// Renders metrics in Prometheus format.
///
/// Returns `None` if metrics are not initialized.
#[must_use]
pub fn render_metrics() -> Option<String> {
    METRICS_HANDLE.get().map(PrometheusHandle::render)
}

/// Registers descriptions for all standard metrics.
pub fn register_metric_descriptions() {
    describe_counter!(
        DOCUMENTS_RESOLVED_TOTAL,
        "Total document lookups by kind and outcome"
    );
    describe_counter!(
        ERRORS_REPORTED_TOTAL,
        "Total error bodies returned to clients by status"
    );
}

/// Records one document resolution.
pub fn record_document_resolved(kind: &str, outcome: ResolveOutcome) {
    counter!(
        DOCUMENTS_RESOLVED_TOTAL,
        "kind" => kind.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

/// Records one reported client error.
pub fn record_error_reported(status_code: u16) {
    counter!(ERRORS_REPORTED_TOTAL, "status" => status_code.to_string()).increment(1);
}
