//! Configuration section types.

use edge_core::{DocumentKind, SERVICE_FIELDS};
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

fn default_api_version() -> String {
    "2.5".to_string()
}

fn default_tags() -> String {
    "edge,api".to_string()
}

fn default_timezone() -> String {
    edge_core::time::DEFAULT_TIMEZONE.to_string()
}

fn default_client_request_id_header() -> String {
    "X-Client-Request-ID".to_string()
}

/// Request-facing service settings.
///
/// # Example
///
/// ```
/// use edge_config::ServiceConfig;
///
/// let service = ServiceConfig::default();
/// assert_eq!(service.api_version, "2.5");
/// assert_eq!(service.timezone, "Europe/Kiev");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// API version logged as `API_VERSION`.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Service tags logged as `TAGS`.
    #[serde(default = "default_tags")]
    pub tags: String,

    /// IANA time zone for logged timestamps.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Header carrying the client's correlation id.
    #[serde(default = "default_client_request_id_header")]
    pub client_request_id_header: String,

    /// Whether query parameters are echoed into error journal entries.
    #[serde(default = "default_true")]
    pub echo_request_params: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            tags: default_tags(),
            timezone: default_timezone(),
            client_request_id_header: default_client_request_id_header(),
            echo_request_params: true,
        }
    }
}

fn default_kinds() -> Vec<DocumentKind> {
    DocumentKind::ALL.to_vec()
}

fn default_service_fields() -> Vec<String> {
    SERVICE_FIELDS.iter().map(ToString::to_string).collect()
}

/// Document resolution settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DocumentsConfig {
    /// Kinds probed by document resolution, in order.
    #[serde(default = "default_kinds")]
    pub kinds: Vec<DocumentKind>,

    /// Fields removed from documents before they are returned.
    #[serde(default = "default_service_fields")]
    pub service_fields: Vec<String>,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            kinds: default_kinds(),
            service_fields: default_service_fields(),
        }
    }
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MetricsConfig {
    /// Enable the Prometheus recorder.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

pub use edge_telemetry::LogFormat;

fn default_log_level() -> String {
    "info".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Level or filter directive.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// ANSI colors (pretty format only).
    #[serde(default)]
    pub ansi_enabled: bool,

    /// Include file and line in log lines.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::Json,
            ansi_enabled: false,
            include_location: false,
        }
    }
}

fn default_service_name() -> String {
    "edge".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

/// Telemetry configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfigSection {
    /// Service name for logs and metric labels.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Service version; the crate version when unset.
    #[serde(default)]
    pub service_version: Option<String>,

    /// Deployment environment.
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Metrics.
    #[serde(default)]
    pub metrics: MetricsConfig,

    /// Logging.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TelemetryConfigSection {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            service_version: None,
            environment: default_environment(),
            metrics: MetricsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TelemetryConfigSection {
    /// Converts this section into the telemetry crate's configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use edge_config::{LogFormat, TelemetryConfigSection};
    ///
    /// let mut section = TelemetryConfigSection::default();
    /// section.logging.format = LogFormat::Pretty;
    ///
    /// let config = section.to_telemetry_config();
    /// assert_eq!(config.logging.format, LogFormat::Pretty);
    /// assert_eq!(config.metrics.service_name, "edge");
    /// ```
    #[must_use]
    pub fn to_telemetry_config(&self) -> edge_telemetry::TelemetryConfig {
        let logging = edge_telemetry::LogConfig {
            enabled: self.logging.enabled,
            level: self.logging.level.clone(),
            format: self.logging.format,
            ansi: self.logging.ansi_enabled,
            include_location: self.logging.include_location,
            service_name: self.service_name.clone(),
        };
        let metrics = edge_telemetry::MetricsConfig {
            enabled: self.metrics.enabled,
            service_name: self.service_name.clone(),
        };

        let mut builder = edge_telemetry::TelemetryConfig::builder()
            .service_name(&self.service_name)
            .environment(&self.environment)
            .logging(logging)
            .metrics(metrics);
        if let Some(version) = &self.service_version {
            builder = builder.service_version(version);
        }
        builder.build()
    }
}
