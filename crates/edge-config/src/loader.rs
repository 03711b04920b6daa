//! Configuration loader with layered approach.
//!
//! This module provides the [`ConfigLoader`] for loading configuration from
//! multiple sources: defaults, files, and environment variables.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

use edge_core::DocumentKind;

use crate::{ConfigError, EdgeConfig, LogFormat};

/// Configuration loader with layered approach.
///
/// The loader applies configuration in layers, with later layers overriding
/// earlier ones:
/// 1. Default values (built into the code)
/// 2. Configuration file or string (TOML or JSON)
/// 3. Environment variables (`PREFIX__SECTION__KEY`)
/// 4. The process `TZ` variable, if enabled
///
/// # Example
///
/// ```no_run
/// use edge_config::ConfigLoader;
///
/// # fn main() -> Result<(), edge_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_dotenv()?
///     .with_optional_file("edge.toml")?
///     .with_env_prefix("EDGE")
///     .with_process_timezone()
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: EdgeConfig,
    env_prefix: Option<String>,
    process_timezone: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader starting from defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: EdgeConfig::default(),
            env_prefix: None,
            process_timezone: false,
        }
    }

    /// Start with development preset configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use edge_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_development()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.telemetry.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = EdgeConfig::development();
        self
    }

    /// Start with production preset configuration.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = EdgeConfig::production();
        self
    }

    /// Load configuration from a file.
    ///
    /// The format (TOML or JSON) is chosen by the file extension. Sections
    /// absent from the file take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing, unreadable, malformed,
    /// or contains unknown fields.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;
        self.config = Self::parse(&content, &format)?;

        Ok(self)
    }

    /// Load configuration from a file if it exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be loaded.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from a string in the given format (`toml` or `json`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if parsing fails.
    ///
    /// # Example
    ///
    /// ```
    /// use edge_config::ConfigLoader;
    ///
    /// let toml = r#"
    ///     [service]
    ///     tags = "edge,plans"
    /// "#;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string(toml, "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.service.tags, "edge,plans");
    /// assert_eq!(config.service.api_version, "2.5");
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = Self::parse(content, &format.to_lowercase())?;
        Ok(self)
    }

    /// Set environment variable prefix for overrides.
    ///
    /// Variables use the format `PREFIX__SECTION__KEY`, for example
    /// `EDGE__SERVICE__TIMEZONE=UTC` or `EDGE__TELEMETRY__LOGGING__LEVEL=debug`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Let the process `TZ` variable override `service.timezone`.
    ///
    /// Applied after every other layer.
    #[must_use]
    pub fn with_process_timezone(mut self) -> Self {
        self.process_timezone = true;
        self
    }

    /// Load a `.env` file into the process environment, if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a `.env` file exists but cannot be parsed.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(e.into()),
        }
    }

    /// Finalize and return the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an override cannot be parsed or validation
    /// fails.
    pub fn load(mut self) -> Result<EdgeConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_overrides(&prefix)?;
        }

        if self.process_timezone {
            self.apply_timezone_override(env::var("TZ").ok().as_deref());
        }

        self.config.validate()?;

        Ok(self.config)
    }

    /// Finalize without validation.
    #[must_use]
    pub fn load_unvalidated(self) -> EdgeConfig {
        self.config
    }

    fn parse(content: &str, format: &str) -> Result<EdgeConfig, ConfigError> {
        match format {
            "toml" => Ok(toml::from_str(content)?),
            "json" => Ok(serde_json::from_str(content)?),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }

    fn apply_timezone_override(&mut self, tz: Option<&str>) {
        // glibc allows a leading ':' in TZ
        if let Some(name) = tz.map(|tz| tz.trim_start_matches(':')).filter(|name| !name.is_empty()) {
            self.config.service.timezone = name.to_string();
        }
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        let env_vars: HashMap<String, String> = env::vars()
            .filter(|(k, _)| k.starts_with(prefix))
            .collect();

        for (key, value) in env_vars {
            self.apply_env_var(&key, &value, prefix)?;
        }

        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let key_without_prefix = key
            .strip_prefix(prefix)
            .and_then(|k| k.strip_prefix("__"))
            .ok_or_else(|| ConfigError::env_parse_error(key, "invalid key format"))?;

        let parts: Vec<&str> = key_without_prefix.split("__").collect();
        let boolean = || parse_bool(value).ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"));

        match parts.as_slice() {
            // Service section
            ["SERVICE", "API_VERSION"] => self.config.service.api_version = value.to_string(),
            ["SERVICE", "TAGS"] => self.config.service.tags = value.to_string(),
            ["SERVICE", "TIMEZONE"] => self.config.service.timezone = value.to_string(),
            ["SERVICE", "CLIENT_REQUEST_ID_HEADER"] => {
                self.config.service.client_request_id_header = value.to_string();
            }
            ["SERVICE", "ECHO_REQUEST_PARAMS"] => self.config.service.echo_request_params = boolean()?,

            // Documents section
            ["DOCUMENTS", "KINDS"] => {
                self.config.documents.kinds = split_list(value)
                    .map(str::parse::<DocumentKind>)
                    .collect::<Result<_, _>>()
                    .map_err(|e| ConfigError::env_parse_error(key, e.to_string()))?;
            }
            ["DOCUMENTS", "SERVICE_FIELDS"] => {
                self.config.documents.service_fields = split_list(value).map(str::to_string).collect();
            }

            // Telemetry section
            ["TELEMETRY", "SERVICE_NAME"] => self.config.telemetry.service_name = value.to_string(),
            ["TELEMETRY", "SERVICE_VERSION"] => {
                self.config.telemetry.service_version = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            ["TELEMETRY", "ENVIRONMENT"] => self.config.telemetry.environment = value.to_string(),
            ["TELEMETRY", "METRICS", "ENABLED"] => self.config.telemetry.metrics.enabled = boolean()?,
            ["TELEMETRY", "LOGGING", "ENABLED"] => self.config.telemetry.logging.enabled = boolean()?,
            ["TELEMETRY", "LOGGING", "LEVEL"] => self.config.telemetry.logging.level = value.to_string(),
            ["TELEMETRY", "LOGGING", "FORMAT"] => {
                self.config.telemetry.logging.format = LogFormat::parse(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected 'json' or 'pretty'"))?;
            }
            ["TELEMETRY", "LOGGING", "ANSI_ENABLED"] => {
                self.config.telemetry.logging.ansi_enabled = boolean()?;
            }
            ["TELEMETRY", "LOGGING", "INCLUDE_LOCATION"] => {
                self.config.telemetry.logging.include_location = boolean()?;
            }

            // Unknown key - ignore
            _ => {}
        }

        Ok(())
    }
}

/// Parse a boolean from a string.
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|item| !item.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_loader_defaults() {
        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(config, EdgeConfig::default());
    }

    #[test]
    fn test_loader_with_development() {
        let config = ConfigLoader::new().with_development().load().unwrap();
        assert_eq!(config.telemetry.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_loader_with_production() {
        let config = ConfigLoader::new().with_production().load().unwrap();
        assert_eq!(config.telemetry.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_loader_with_string_json() {
        let json = r#"{"service": {"timezone": "UTC"}, "documents": {"kinds": ["Plan"]}}"#;

        let config = ConfigLoader::new()
            .with_string(json, "json")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.service.timezone, "UTC");
        assert_eq!(config.documents.kinds, vec![DocumentKind::Plan]);
    }

    #[test]
    fn test_loader_with_string_unknown_format() {
        let result = ConfigLoader::new().with_string("", "yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_loader_rejects_unknown_fields() {
        let toml = r#"
            [service]
            api_verison = "2.4"
        "#;
        assert!(ConfigLoader::new().with_string(toml, "toml").is_err());
    }

    #[test]
    fn test_loader_rejects_invalid_timezone() {
        let toml = r#"
            [service]
            timezone = "Europe/Atlantis"
        "#;
        let result = ConfigLoader::new().with_string(toml, "toml").unwrap().load();
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_loader_with_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
            [service]
            api_version = "2.4"
            echo_request_params = false

            [telemetry.logging]
            level = "warn"
            format = "pretty"
            "#
        )
        .unwrap();

        let config = ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap();

        assert_eq!(config.service.api_version, "2.4");
        assert!(!config.service.echo_request_params);
        assert_eq!(config.telemetry.logging.level, "warn");
        assert_eq!(config.telemetry.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_loader_with_file_not_found() {
        let result = ConfigLoader::new().with_file("/nonexistent/edge.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_loader_with_optional_file_not_found() {
        let config = ConfigLoader::new()
            .with_optional_file("/nonexistent/edge.toml")
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(config, EdgeConfig::default());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("on"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_apply_env_var_service() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__SERVICE__TIMEZONE", "UTC", "TEST").unwrap();
        loader.apply_env_var("TEST__SERVICE__ECHO_REQUEST_PARAMS", "no", "TEST").unwrap();
        assert_eq!(loader.config.service.timezone, "UTC");
        assert!(!loader.config.service.echo_request_params);
    }

    #[test]
    fn test_apply_env_var_kinds() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__DOCUMENTS__KINDS", "Plan, Contract", "TEST").unwrap();
        assert_eq!(loader.config.documents.kinds, vec![DocumentKind::Plan, DocumentKind::Contract]);

        let result = loader.apply_env_var("TEST__DOCUMENTS__KINDS", "Lot", "TEST");
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_env_var_logging() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__TELEMETRY__LOGGING__FORMAT", "pretty", "TEST").unwrap();
        loader.apply_env_var("TEST__TELEMETRY__LOGGING__LEVEL", "debug", "TEST").unwrap();
        assert_eq!(loader.config.telemetry.logging.format, LogFormat::Pretty);
        assert_eq!(loader.config.telemetry.logging.level, "debug");

        let result = loader.apply_env_var("TEST__TELEMETRY__METRICS__ENABLED", "sometimes", "TEST");
        assert!(result.is_err());
    }

    #[test]
    fn test_timezone_override() {
        let mut loader = ConfigLoader::new();
        loader.apply_timezone_override(Some(":America/New_York"));
        assert_eq!(loader.config.service.timezone, "America/New_York");

        loader.apply_timezone_override(None);
        loader.apply_timezone_override(Some(""));
        assert_eq!(loader.config.service.timezone, "America/New_York");
    }
}
