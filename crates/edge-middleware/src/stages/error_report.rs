//! Error reporting.
//!
//! Turns the request's collected errors into one journal entry and the
//! client-visible [`ErrorBody`]. Each non-empty error sink is reported
//! exactly once, by the [`ErrorReportingMiddleware`] on the way out.
//!
//! # Pipeline Position
//!
//! ```text
//! RequestId → LoggingContext → [ErrorReporting] → DocumentResolution → Handler
//! ```
//!
//! The journal entry has `MESSAGE_ID = error_handler` and carries the
//! request's whole logging context as `JOURNAL_*` fields, plus:
//!
//! | Field | Value |
//! |-------|-------|
//! | `JOURNAL_ERROR_STATUS` | HTTP status of the error body |
//! | `JOURNAL_PARAMS` | Query parameters, unless suppressed |
//! | `JOURNAL_<ROUTE_PARAM>` | Each route parameter |
//! | `JOURNAL_<KIND>_REV`, `JOURNAL_<KIND>ID`, `JOURNAL_<KIND>_STATUS` | From the resolved document |

use super::logging_context::ContextAggregator;
use crate::context::MiddlewareContext;
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, Response, ResponseExt};
use edge_core::{ErrorBody, ErrorEntry, Errors, LoggingContext};
use edge_extract::params_repr;
use edge_telemetry::logging::fields;
use edge_telemetry::metrics::record_error_reported;
use edge_telemetry::{JournalEntry, JournalFields, JournalLevel, JournalSink};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// `MESSAGE_ID` of error journal entries.
pub const ERROR_HANDLER_MESSAGE_ID: &str = "error_handler";

/// What was reported for a request, stored as a context extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    /// Reported HTTP status.
    pub status: u16,
    /// The reported errors, unchanged.
    pub errors: Vec<ErrorEntry>,
    /// Fields the reporter merged into the logging context.
    pub params: IndexMap<String, String>,
}

/// Logs collected errors and builds the client error body.
#[derive(Debug, Clone)]
pub struct ErrorReporter {
    journal: Arc<dyn JournalSink>,
}

impl ErrorReporter {
    /// Creates a reporter writing to `journal`.
    #[must_use]
    pub fn new(journal: Arc<dyn JournalSink>) -> Self {
        Self { journal }
    }

    /// Reports `errors` for the request described by `ctx`.
    ///
    /// Merges the error fields into the logging context, records one INFO
    /// journal entry and an [`ErrorRecord`] extension, and returns a body
    /// mirroring `errors`. With `include_params` unset, query parameters
    /// are kept out of the journal entry.
    pub fn report(&self, ctx: &mut MiddlewareContext, errors: &Errors, include_params: bool) -> ErrorBody {
        let status = errors.status().as_u16();

        let mut params = IndexMap::new();
        params.insert(fields::ERROR_STATUS.to_string(), status.to_string());
        if include_params && !ctx.query_params().is_empty() {
            params.insert(fields::PARAMS.to_string(), params_repr(ctx.query_params()));
        }
        for (name, value) in ctx.path_params() {
            params.insert(name.to_uppercase(), value.to_string());
        }
        if let Some(view) = ctx.document() {
            params.extend(view.logging_fields());
        }

        let mut message = JournalFields::new();
        message.insert(fields::MESSAGE_ID.to_string(), Value::from(ERROR_HANDLER_MESSAGE_ID));
        let mut record = ContextAggregator::to_journal_record(ctx.logging_mut(), &message, params.clone());
        if !include_params {
            record.shift_remove(&LoggingContext::journal_key(fields::PARAMS));
        }

        let text = format!(
            "Error on processing request \"{}\"",
            pretty_errors(errors.entries())
        );
        self.journal
            .record(JournalEntry::with_fields(JournalLevel::Info, text, record));
        record_error_reported(status);

        ctx.set_extension(ErrorRecord {
            status,
            errors: errors.entries().to_vec(),
            params,
        });
        errors.to_body()
    }
}

/// Renders the error list as JSON indented by four spaces.
fn pretty_errors(entries: &[ErrorEntry]) -> String {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    if entries.serialize(&mut serializer).is_err() {
        return String::new();
    }
    String::from_utf8(buf).unwrap_or_default()
}

/// Pipeline stage that reports a non-empty error sink.
///
/// After the inner stages and the handler return, any collected errors
/// replace the response with a JSON [`ErrorBody`] carrying the sink's
/// status.
#[derive(Debug, Clone)]
pub struct ErrorReportingMiddleware {
    reporter: ErrorReporter,
    include_params: bool,
}

impl ErrorReportingMiddleware {
    /// Creates the stage. Query parameters are echoed by default.
    #[must_use]
    pub fn new(journal: Arc<dyn JournalSink>) -> Self {
        Self {
            reporter: ErrorReporter::new(journal),
            include_params: true,
        }
    }

    /// Sets whether query parameters are echoed into the error journal.
    #[must_use]
    pub fn include_params(mut self, include: bool) -> Self {
        self.include_params = include;
        self
    }
}

impl Middleware for ErrorReportingMiddleware {
    fn name(&self) -> &'static str {
        "error_reporting"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let response = next.run(ctx, request).await;
            if ctx.errors().is_empty() {
                return response;
            }

            let errors = ctx.take_errors();
            let body = self.reporter.report(ctx, &errors, self.include_params);
            Response::json(errors.status(), &body)
        })
    }
}
