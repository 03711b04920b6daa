//! Extraction error types.

use edge_core::{EdgeError, Errors};
use http::StatusCode;
use std::fmt;

/// Location reported for query string failures.
pub const QUERY_LOCATION: &str = "querystring";

/// The query string could not be decoded.
///
/// Reported to the client as a `querystring` entry with status 400.
///
/// # Example
///
/// ```rust
/// use edge_extract::ExtractionError;
/// use http::StatusCode;
///
/// let err = ExtractionError::query("expected a pair");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert_eq!(err.to_errors().entries()[0].location, "querystring");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionError {
    message: String,
}

impl ExtractionError {
    /// Creates an error for a query string that failed to decode.
    #[must_use]
    pub fn query(error: impl fmt::Display) -> Self {
        Self {
            message: format!("failed to deserialize query: {error}"),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    /// Converts this error into the client-facing error sink shape.
    #[must_use]
    pub fn to_errors(&self) -> Errors {
        Errors::with_status(self.status_code()).add(QUERY_LOCATION, "query", self.message.clone())
    }
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ExtractionError {}

impl From<ExtractionError> for EdgeError {
    fn from(err: ExtractionError) -> Self {
        EdgeError::Validation(err.to_errors())
    }
}
