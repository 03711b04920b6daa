//! Main configuration types.
//!
//! This module provides the top-level [`EdgeConfig`] struct and its builder.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::{ConfigError, DocumentsConfig, LogFormat, ServiceConfig, TelemetryConfigSection};

/// Complete edge service configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load configuration from files
/// and environment variables.
///
/// # Example
///
/// ```
/// use edge_config::EdgeConfig;
///
/// let config = EdgeConfig::default();
/// assert_eq!(config.service.api_version, "2.5");
/// assert_eq!(config.documents.kinds.len(), 4);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct EdgeConfig {
    /// Request-facing service settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Document resolution settings.
    #[serde(default)]
    pub documents: DocumentsConfig,

    /// Telemetry configuration (metrics, logging).
    #[serde(default)]
    pub telemetry: TelemetryConfigSection,
}

impl EdgeConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> EdgeConfigBuilder {
        EdgeConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - The time zone is not a known IANA name
    /// - The API version or log level is empty
    /// - The client request id header is not a valid header name
    /// - No document kinds are configured
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.timezone()?;

        if self.service.api_version.trim().is_empty() {
            return Err(ConfigError::invalid_value("service.api_version", "must not be empty"));
        }

        if !is_header_name(&self.service.client_request_id_header) {
            return Err(ConfigError::invalid_value(
                "service.client_request_id_header",
                format!("invalid header name: {:?}", self.service.client_request_id_header),
            ));
        }

        if self.documents.kinds.is_empty() {
            return Err(ConfigError::invalid_value("documents.kinds", "at least one kind is required"));
        }

        if self.telemetry.logging.level.trim().is_empty() {
            return Err(ConfigError::invalid_value("telemetry.logging.level", "must not be empty"));
        }

        Ok(())
    }

    /// Parses the configured time zone.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for unknown zone names.
    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        edge_core::time::parse_timezone(&self.service.timezone)
            .map_err(|reason| ConfigError::invalid_value("service.timezone", reason))
    }

    /// Create a development configuration preset: pretty, colored debug logs.
    ///
    /// # Example
    ///
    /// ```
    /// use edge_config::EdgeConfig;
    ///
    /// let config = EdgeConfig::development();
    /// assert_eq!(config.telemetry.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.telemetry.logging.level = "debug".to_string();
        config.telemetry.logging.format = LogFormat::Pretty;
        config.telemetry.logging.ansi_enabled = true;
        config.telemetry.logging.include_location = true;
        config.telemetry.environment = "development".to_string();

        config
    }

    /// Create a production configuration preset: JSON logs at info level.
    ///
    /// # Example
    ///
    /// ```
    /// use edge_config::EdgeConfig;
    ///
    /// let config = EdgeConfig::production();
    /// assert_eq!(config.telemetry.logging.format, edge_config::LogFormat::Json);
    /// ```
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();

        config.telemetry.logging.level = "info".to_string();
        config.telemetry.logging.format = LogFormat::Json;
        config.telemetry.logging.ansi_enabled = false;
        config.telemetry.environment = "production".to_string();

        config
    }
}

/// RFC 9110 token characters.
fn is_header_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}

/// Builder for [`EdgeConfig`].
#[derive(Debug, Default)]
pub struct EdgeConfigBuilder {
    service: Option<ServiceConfig>,
    documents: Option<DocumentsConfig>,
    telemetry: Option<TelemetryConfigSection>,
}

impl EdgeConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the service section.
    #[must_use]
    pub fn service(mut self, service: ServiceConfig) -> Self {
        self.service = Some(service);
        self
    }

    /// Set the documents section.
    #[must_use]
    pub fn documents(mut self, documents: DocumentsConfig) -> Self {
        self.documents = Some(documents);
        self
    }

    /// Set the telemetry section.
    #[must_use]
    pub fn telemetry(mut self, telemetry: TelemetryConfigSection) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Build the configuration without validation.
    #[must_use]
    pub fn build(self) -> EdgeConfig {
        EdgeConfig {
            service: self.service.unwrap_or_default(),
            documents: self.documents.unwrap_or_default(),
            telemetry: self.telemetry.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<EdgeConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
