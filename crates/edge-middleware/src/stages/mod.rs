//! The pipeline stages, in execution order.
//!
//! 1. [`request_id`] - request id generation and client id capture
//! 2. [`logging_context`] - logging context seeding and enrichment
//! 3. [`error_report`] - error reporting on the way out
//! 4. [`document`] - document resolution and kind checks

pub mod document;
pub mod error_report;
pub mod logging_context;
pub mod request_id;

pub use document::DocumentResolutionMiddleware;
pub use error_report::{ErrorRecord, ErrorReporter, ErrorReportingMiddleware, ERROR_HANDLER_MESSAGE_ID};
pub use logging_context::{ContextAggregator, ContextSettings, LoggingContextMiddleware};
pub use request_id::{RequestIdMiddleware, CLIENT_REQUEST_ID_HEADER, REQUEST_ID_HEADER};
