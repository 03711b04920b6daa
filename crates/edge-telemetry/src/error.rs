//! Telemetry error types.

use thiserror::Error;

/// Failures while bringing up logging or metrics.
///
/// Both are startup-time errors; nothing on the request path returns them.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The Prometheus recorder could not be installed.
    #[error("metrics recorder: {0}")]
    MetricsInit(String),

    /// The filter was invalid or a global subscriber already exists.
    #[error("log subscriber: {0}")]
    LoggingInit(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TelemetryError::MetricsInit("already installed".to_string());
        assert_eq!(err.to_string(), "metrics recorder: already installed");

        let err = TelemetryError::LoggingInit("bad filter".to_string());
        assert_eq!(err.to_string(), "log subscriber: bad filter");
    }
}
