//! Combined telemetry settings.

use crate::logging::{LogConfig, LogFormat};
use crate::metrics::MetricsConfig;

/// Settings for logging and metrics, plus the identity they report under.
///
/// The service name is shared: [`TelemetryConfigBuilder::build`] copies it
/// into both sub-configs so log lines and metric labels always agree.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name stamped on logs and metrics.
    pub service_name: String,

    /// Build version; defaults to this crate's version.
    pub service_version: String,

    /// Deployment environment label.
    pub environment: String,

    /// Prometheus recorder settings.
    pub metrics: MetricsConfig,

    /// Subscriber settings.
    pub logging: LogConfig,
}

impl TelemetryConfig {
    /// Starts a builder.
    #[must_use]
    pub fn builder() -> TelemetryConfigBuilder {
        TelemetryConfigBuilder::default()
    }

    /// Settings for local work: pretty logs, metrics off.
    #[must_use]
    pub fn local() -> Self {
        Self::builder()
            .logging(LogConfig::for_format(LogFormat::Pretty))
            .metrics(MetricsConfig {
                enabled: false,
                ..MetricsConfig::default()
            })
            .build()
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`TelemetryConfig`]. Unset values fall back to defaults.
#[derive(Debug, Default)]
pub struct TelemetryConfigBuilder {
    service_name: Option<String>,
    service_version: Option<String>,
    environment: Option<String>,
    metrics: Option<MetricsConfig>,
    logging: Option<LogConfig>,
}

impl TelemetryConfigBuilder {
    /// Sets the service name.
    #[must_use]
    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    /// Sets the service version.
    #[must_use]
    pub fn service_version(mut self, version: impl Into<String>) -> Self {
        self.service_version = Some(version.into());
        self
    }

    /// Sets the environment label.
    #[must_use]
    pub fn environment(mut self, env: impl Into<String>) -> Self {
        self.environment = Some(env.into());
        self
    }

    /// Replaces the metrics settings.
    #[must_use]
    pub fn metrics(mut self, config: MetricsConfig) -> Self {
        self.metrics = Some(config);
        self
    }

    /// Replaces the logging settings.
    #[must_use]
    pub fn logging(mut self, config: LogConfig) -> Self {
        self.logging = Some(config);
        self
    }

    /// Resolves defaults and propagates the service name.
    #[must_use]
    pub fn build(self) -> TelemetryConfig {
        let service_name = self.service_name.unwrap_or_else(|| "edge".to_string());

        let mut metrics = self.metrics.unwrap_or_default();
        metrics.service_name.clone_from(&service_name);

        let mut logging = self.logging.unwrap_or_default();
        logging.service_name.clone_from(&service_name);

        TelemetryConfig {
            service_name,
            service_version: self
                .service_version
                .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
            environment: self.environment.unwrap_or_else(|| "development".to_string()),
            metrics,
            logging,
        }
    }
}
