//! Typed configuration for the edge API service.
//!
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env → `TZ`)
//!
//! # Sections
//!
//! - [`ServiceConfig`] - API version, tags, time zone, client id header
//! - [`DocumentsConfig`] - Kinds resolved from the path, fields stripped from responses
//! - [`TelemetryConfigSection`] - Logging and metrics
//!
//! # Configuration File Format
//!
//! ```toml
//! [service]
//! api_version = "2.5"
//! tags = "edge,api"
//! timezone = "Europe/Kiev"
//! client_request_id_header = "X-Client-Request-ID"
//! echo_request_params = true
//!
//! [documents]
//! kinds = ["Tender", "Auction", "Contract", "Plan"]
//! service_fields = ["__parent__", "_rev", "_id", "doc_type"]
//!
//! [telemetry]
//! service_name = "edge"
//! environment = "production"
//!
//! [telemetry.metrics]
//! enabled = true
//!
//! [telemetry.logging]
//! level = "info"
//! format = "json"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden with `PREFIX__SECTION__KEY` variables:
//!
//! - `EDGE__SERVICE__TIMEZONE=UTC`
//! - `EDGE__DOCUMENTS__KINDS=Tender,Plan`
//! - `EDGE__TELEMETRY__LOGGING__LEVEL=debug`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::*;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_file_parses() {
        let toml = r#"
            [service]
            api_version = "2.5"
            tags = "edge,api"
            timezone = "Europe/Kiev"
            client_request_id_header = "X-Client-Request-ID"
            echo_request_params = true

            [documents]
            kinds = ["Tender", "Auction", "Contract", "Plan"]
            service_fields = ["__parent__", "_rev", "_id", "doc_type"]

            [telemetry]
            service_name = "edge"
            environment = "production"

            [telemetry.metrics]
            enabled = true

            [telemetry.logging]
            level = "info"
            format = "json"
        "#;

        let config = ConfigLoader::new().with_string(toml, "toml").unwrap().load().unwrap();
        assert_eq!(config.service, ServiceConfig::default());
        assert_eq!(config.documents, DocumentsConfig::default());
        assert_eq!(config.telemetry.environment, "production");
    }
}
