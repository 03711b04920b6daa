//! Error types for the edge core.
//!
//! [`EdgeError`] is the tagged failure type returned by path resolution and
//! document lookup. Client-facing failures are collected into an [`Errors`]
//! sink, whose [`ErrorBody`] is what the client finally receives:
//!
//! ```json
//! {
//!   "status": 404,
//!   "errors": [
//!     {"location": "url", "name": "tender_id", "description": "Not Found"}
//!   ]
//! }
//! ```

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias using [`EdgeError`].
pub type EdgeResult<T> = Result<T, EdgeError>;

/// Location reported for failures derived from the request URL.
pub const URL_LOCATION: &str = "url";

/// Description reported for documents that cannot be resolved.
pub const NOT_FOUND_DESCRIPTION: &str = "Not Found";

/// Categories of errors for classification and handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// The request itself is malformed (e.g. undecodable path).
    BadRequest,
    /// Request validation errors.
    Validation,
    /// Resource not found.
    NotFound,
    /// Backend failures.
    Internal,
}

impl ErrorCategory {
    /// Returns the default HTTP status code for this error category.
    #[must_use]
    pub const fn default_status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest | Self::Validation => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// The request path contained bytes that do not decode to UTF-8.
///
/// Distinct from "no match": a malformed path means the request is broken,
/// not that it addresses a different route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to decode request path at byte {offset}: {reason}")]
pub struct PathDecodeError {
    /// Byte offset of the first invalid byte in the percent-decoded path.
    pub offset: usize,
    /// The percent-decoded bytes that failed to decode.
    pub raw: Vec<u8>,
    /// Human-readable decode failure.
    pub reason: String,
}

/// Tagged failure type for the edge core.
///
/// Callers match on the variant instead of catching a broad hierarchy.
///
/// # Example
///
/// ```
/// use edge_core::{EdgeError, ErrorCategory};
///
/// let err = EdgeError::not_found("Tender");
/// assert_eq!(err.category(), ErrorCategory::NotFound);
/// assert_eq!(err.to_errors().entries()[0].name, "tender_id");
/// ```
#[derive(Debug, Error)]
pub enum EdgeError {
    /// The request path could not be decoded.
    #[error(transparent)]
    PathDecode(#[from] PathDecodeError),

    /// The addressed document is absent or has a different kind.
    #[error("{kind} not found ({field})")]
    NotFound {
        /// The requested kind name (e.g. `Tender`).
        kind: String,
        /// The field reported to the client (e.g. `tender_id`).
        field: String,
    },

    /// Validation failures collected by request validators.
    #[error("validation failed with {} error(s)", .0.len())]
    Validation(Errors),

    /// The document store failed. Never retried here.
    #[error("document store error: {message}")]
    Store {
        /// Human-readable error message.
        message: String,
        /// The underlying error (not exposed to clients).
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl EdgeError {
    /// Creates a not-found error for a document kind.
    #[must_use]
    pub fn not_found(kind: impl Into<String>) -> Self {
        let kind = kind.into();
        Self::NotFound {
            field: format!("{}_id", kind.to_lowercase()),
            kind,
        }
    }

    /// Creates a store error.
    #[must_use]
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a store error with a source error.
    pub fn store_with_source(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::Store {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::PathDecode(_) => ErrorCategory::BadRequest,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Validation(_) => ErrorCategory::Validation,
            Self::Store { .. } => ErrorCategory::Internal,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(errors) => errors.status(),
            _ => self.category().default_status_code(),
        }
    }

    /// Converts this error into the client-facing error sink shape.
    #[must_use]
    pub fn to_errors(&self) -> Errors {
        match self {
            Self::Validation(errors) => errors.clone(),
            Self::PathDecode(e) => {
                Errors::with_status(self.status_code()).add(URL_LOCATION, "path", e.reason.clone())
            }
            Self::NotFound { field, .. } => Errors::with_status(self.status_code()).add(
                URL_LOCATION,
                field.clone(),
                NOT_FOUND_DESCRIPTION,
            ),
            Self::Store { .. } => Errors::with_status(self.status_code()).add(
                "body",
                "data",
                "Internal Server Error",
            ),
        }
    }
}

/// A single client-facing failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// Where the failure was found (`url`, `body`, `querystring`, `header`).
    pub location: String,
    /// The offending field.
    pub name: String,
    /// Human-readable description.
    pub description: String,
}

impl ErrorEntry {
    /// Creates an error entry.
    #[must_use]
    pub fn new(
        location: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            location: location.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}

impl fmt::Display for ErrorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}: {}", self.location, self.name, self.description)
    }
}

/// Per-request error sink.
///
/// Validators push entries here; a non-empty sink is reported once and
/// becomes the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Errors {
    status: StatusCode,
    entries: Vec<ErrorEntry>,
}

impl Default for Errors {
    fn default() -> Self {
        Self::new()
    }
}

impl Errors {
    /// Creates an empty sink with status 400.
    #[must_use]
    pub fn new() -> Self {
        Self::with_status(StatusCode::BAD_REQUEST)
    }

    /// Creates an empty sink with the given status.
    #[must_use]
    pub fn with_status(status: StatusCode) -> Self {
        Self {
            status,
            entries: Vec::new(),
        }
    }

    /// Builder-style [`push`](Self::push).
    #[must_use]
    pub fn add(
        mut self,
        location: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.push(location, name, description);
        self
    }

    /// Appends an entry.
    pub fn push(
        &mut self,
        location: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) {
        self.entries
            .push(ErrorEntry::new(location, name, description));
    }

    /// Appends every entry of `other` and adopts its status.
    pub fn extend(&mut self, other: Errors) {
        self.status = other.status;
        self.entries.extend(other.entries);
    }

    /// Returns the response status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Sets the response status.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Returns the collected entries.
    #[must_use]
    pub fn entries(&self) -> &[ErrorEntry] {
        &self.entries
    }

    /// Returns `true` if nothing has been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of collected entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Converts the sink to the client-facing body.
    #[must_use]
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            status: self.status.as_u16(),
            errors: self.entries.clone(),
        }
    }
}

/// Serializable error body returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// HTTP status code.
    pub status: u16,
    /// The failures, in the order they were collected.
    pub errors: Vec<ErrorEntry>,
}
