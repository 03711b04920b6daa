//! Per-request logging context.
//!
//! The [`ContextAggregator`] seeds a request's [`LoggingContext`] with the
//! facts known at arrival, enriches it once route and query parameters (and
//! later the resolved document) are known, and projects it onto journal
//! records. The context only reaches the log sink through
//! [`ContextAggregator::to_journal_record`].

use crate::context::MiddlewareContext;
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, Response};
use chrono_tz::Tz;
use edge_core::{time, EdgeError, LoggingContext};
use edge_extract::{params_repr, parse_query, ExtractionContext, ExtractionError};
use edge_telemetry::logging::fields;
use edge_telemetry::JournalFields;
use serde_json::Value;

/// Default API version logged as `API_VERSION`.
pub const DEFAULT_API_VERSION: &str = "2.5";

/// Default service tags logged as `TAGS`.
pub const DEFAULT_TAGS: &str = "edge,api";

/// Service-wide values every context is seeded with.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextSettings {
    /// API version string.
    pub api_version: String,
    /// Comma-separated service tags.
    pub tags: String,
    /// Time zone for `TIMESTAMP`.
    pub timezone: Tz,
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            api_version: DEFAULT_API_VERSION.to_string(),
            tags: DEFAULT_TAGS.to_string(),
            timezone: time::parse_timezone(time::DEFAULT_TIMEZONE).unwrap_or(Tz::UTC),
        }
    }
}

/// Builds and enriches the logging context of one request.
///
/// # Example
///
/// ```
/// use edge_extract::ExtractionContextBuilder;
/// use edge_middleware::stages::logging_context::{ContextAggregator, ContextSettings};
/// use edge_middleware::MiddlewareContext;
///
/// let aggregator = ContextAggregator::new(ContextSettings::default());
/// let request = ExtractionContextBuilder::new()
///     .uri("/api/2.5/tenders?offset=10".parse().unwrap())
///     .build();
///
/// let mut ctx = MiddlewareContext::new();
/// aggregator.seed(&mut ctx, &request);
/// aggregator.enrich(&mut ctx, &request).unwrap();
///
/// assert_eq!(ctx.logging().get("API_VERSION"), Some("2.5"));
/// assert_eq!(ctx.logging().get("PARAMS"), Some("{'offset': '10'}"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ContextAggregator {
    settings: ContextSettings,
}

impl ContextAggregator {
    /// Creates an aggregator with the given settings.
    #[must_use]
    pub fn new(settings: ContextSettings) -> Self {
        Self { settings }
    }

    /// Returns the settings.
    #[must_use]
    pub fn settings(&self) -> &ContextSettings {
        &self.settings
    }

    /// Populates the context with what is known when the request arrives.
    pub fn seed(&self, ctx: &mut MiddlewareContext, request: &ExtractionContext) {
        let user = ctx.identity().log_id();
        let remote_addr = ctx
            .remote_addr()
            .map(|addr| addr.ip().to_string())
            .unwrap_or_default();
        let request_id = ctx.request_id().to_string();
        let client_request_id = ctx.client_request_id().unwrap_or_default().to_string();

        ctx.logging_mut().merge([
            ("API_VERSION", self.settings.api_version.clone()),
            ("TAGS", self.settings.tags.clone()),
            ("USER", user),
            ("CURRENT_URL", request.current_url()),
            ("CURRENT_PATH", request.decoded_path()),
            ("REMOTE_ADDR", remote_addr),
            ("USER_AGENT", request.user_agent().unwrap_or_default().to_string()),
            ("REQUEST_METHOD", request.method().to_string()),
            ("TIMESTAMP", time::timestamp(self.settings.timezone)),
            (fields::REQUEST_ID, request_id),
            (fields::CLIENT_REQUEST_ID, client_request_id),
        ]);
    }

    /// Merges `extra` into the context. Keys are upper-cased, last write wins.
    pub fn merge<I, K, V>(ctx: &mut MiddlewareContext, extra: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        ctx.logging_mut().merge(extra);
    }

    /// Adds request parameters and document fields to the context.
    ///
    /// Query parameters are parsed, stored on the context and, when there
    /// are any, merged as one `PARAMS` entry. Route parameters are merged
    /// individually.
    ///
    /// # Errors
    ///
    /// Returns an error if the query string cannot be decoded. Nothing is
    /// merged in that case.
    pub fn enrich(&self, ctx: &mut MiddlewareContext, request: &ExtractionContext) -> Result<(), ExtractionError> {
        let query = parse_query(request.query_string())?;
        let params = (!query.is_empty()).then(|| params_repr(&query));
        ctx.set_query_params(query);

        let route: Vec<(String, String)> = ctx
            .path_params()
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        let logging = ctx.logging_mut();
        if let Some(params) = params {
            logging.insert(fields::PARAMS, params);
        }
        logging.merge(route);
        Self::enrich_document(ctx);
        Ok(())
    }

    /// Merges `<KIND>_REV`, `<KIND>ID` and `<KIND>_STATUS` from the resolved
    /// document, if one is attached.
    pub fn enrich_document(ctx: &mut MiddlewareContext) {
        if let Some(fields) = ctx.document().map(edge_core::DocumentView::logging_fields) {
            ctx.logging_mut().merge(fields);
        }
    }

    /// Projects the context onto a journal record.
    ///
    /// `extra` is merged into the context first. The returned record is a
    /// copy of `message` with every context key added as `JOURNAL_<KEY>`;
    /// `message` itself is left untouched.
    ///
    /// # Example
    ///
    /// ```
    /// use edge_core::LoggingContext;
    /// use edge_middleware::stages::logging_context::ContextAggregator;
    /// use edge_telemetry::JournalFields;
    ///
    /// let mut logging = LoggingContext::from_entries([("user", "alice")]);
    /// let mut message = JournalFields::new();
    /// message.insert("MESSAGE_ID".into(), "tender_view".into());
    ///
    /// let record = ContextAggregator::to_journal_record(&mut logging, &message, [("tender_id", "t1")]);
    ///
    /// assert_eq!(record["MESSAGE_ID"], "tender_view");
    /// assert_eq!(record["JOURNAL_USER"], "alice");
    /// assert_eq!(record["JOURNAL_TENDER_ID"], "t1");
    /// assert_eq!(message.len(), 1);
    /// ```
    pub fn to_journal_record<I, K, V>(logging: &mut LoggingContext, message: &JournalFields, extra: I) -> JournalFields
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        logging.merge(extra);

        let mut record = message.clone();
        for (key, value) in logging.iter() {
            record.insert(LoggingContext::journal_key(key), Value::String(value.to_string()));
        }
        record
    }
}

/// Pipeline stage that seeds and enriches the logging context.
///
/// An undecodable query string is recorded in the error sink as a
/// `querystring` failure.
#[derive(Debug, Clone, Default)]
pub struct LoggingContextMiddleware {
    aggregator: ContextAggregator,
}

impl LoggingContextMiddleware {
    /// Creates the stage.
    #[must_use]
    pub fn new(settings: ContextSettings) -> Self {
        Self {
            aggregator: ContextAggregator::new(settings),
        }
    }
}

impl Middleware for LoggingContextMiddleware {
    fn name(&self) -> &'static str {
        "logging_context"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let extraction = ctx.extraction_context(&request);
            self.aggregator.seed(ctx, &extraction);

            if let Err(err) = self.aggregator.enrich(ctx, &extraction) {
                tracing::debug!(error = %err, "query string rejected");
                ctx.fail(&EdgeError::from(err));
            }

            next.run(ctx, request).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResponseExt;
    use bytes::Bytes;
    use edge_core::{fixtures, CallerIdentity, DocumentView};
    use edge_extract::ExtractionContextBuilder;
    use http::{Method, StatusCode};
    use http_body_util::Full;

    fn settings() -> ContextSettings {
        ContextSettings {
            api_version: "2.5".to_string(),
            tags: "edge,api".to_string(),
            timezone: "Europe/Kiev".parse().unwrap(),
        }
    }

    #[test]
    fn test_seed_populates_request_facts() {
        let aggregator = ContextAggregator::new(settings());
        let request = ExtractionContextBuilder::new()
            .method(Method::POST)
            .uri("/api/2.5/tenders/abc123?mode=test".parse().unwrap())
            .header("host", "edge.example.org")
            .header("user-agent", "curl/8.0")
            .build();

        let mut ctx = MiddlewareContext::new()
            .identity_from(CallerIdentity::user("broker"))
            .remote_addr_from("192.168.1.5:40000".parse().unwrap());
        ctx.set_client_request_id("c-42");
        aggregator.seed(&mut ctx, &request);

        let logging = ctx.logging();
        assert_eq!(logging.get("TAGS"), Some("edge,api"));
        assert_eq!(logging.get("USER"), Some("broker"));
        assert_eq!(
            logging.get("CURRENT_URL"),
            Some("http://edge.example.org/api/2.5/tenders/abc123?mode=test")
        );
        assert_eq!(logging.get("CURRENT_PATH"), Some("/api/2.5/tenders/abc123"));
        assert_eq!(logging.get("REMOTE_ADDR"), Some("192.168.1.5"));
        assert_eq!(logging.get("USER_AGENT"), Some("curl/8.0"));
        assert_eq!(logging.get("REQUEST_METHOD"), Some("POST"));
        assert_eq!(logging.get("CLIENT_REQUEST_ID"), Some("c-42"));
        assert_eq!(logging.get("REQUEST_ID"), Some(ctx.request_id().to_string().as_str()));
        assert!(logging.get("TIMESTAMP").is_some_and(|ts| ts.contains('T')));
    }

    #[test]
    fn test_seed_defaults_to_empty_strings() {
        let aggregator = ContextAggregator::new(settings());
        let request = ExtractionContextBuilder::new().build();

        let mut ctx = MiddlewareContext::new();
        aggregator.seed(&mut ctx, &request);

        assert_eq!(ctx.logging().get("USER"), Some(""));
        assert_eq!(ctx.logging().get("REMOTE_ADDR"), Some(""));
        assert_eq!(ctx.logging().get("USER_AGENT"), Some(""));
        assert_eq!(ctx.logging().get("CLIENT_REQUEST_ID"), Some(""));
    }

    #[test]
    fn test_enrich_params_and_route() {
        let aggregator = ContextAggregator::new(settings());
        let request = ExtractionContextBuilder::new()
            .uri("/api/2.5/tenders/abc123?a=1&b=2&a=3".parse().unwrap())
            .build();

        let mut ctx = MiddlewareContext::new()
            .path_params_from([("tender_id", "abc123")].into_iter().collect());
        aggregator.enrich(&mut ctx, &request).unwrap();

        assert_eq!(ctx.logging().get("PARAMS"), Some("{'a': '3', 'b': '2'}"));
        assert_eq!(ctx.logging().get("TENDER_ID"), Some("abc123"));
        assert_eq!(ctx.query_params().len(), 3);
    }

    #[test]
    fn test_enrich_without_query_leaves_params_unset() {
        let aggregator = ContextAggregator::new(settings());
        let request = ExtractionContextBuilder::new()
            .uri("/api/2.5/plans/nope".parse().unwrap())
            .build();

        let mut ctx = MiddlewareContext::new();
        aggregator.enrich(&mut ctx, &request).unwrap();

        assert_eq!(ctx.logging().get("PARAMS"), None);
        assert!(ctx.query_params().is_empty());
    }

    #[test]
    fn test_enrich_document_fields() {
        let mut ctx = MiddlewareContext::new();
        ctx.set_document(DocumentView::new("XYZ", fixtures::plan()));
        ContextAggregator::enrich_document(&mut ctx);

        assert_eq!(ctx.logging().get("PLANID"), Some("UA-P-2024-01-01-000001"));
        assert_eq!(ctx.logging().get("PLAN_STATUS"), Some("scheduled"));
        assert!(ctx.logging().get("PLAN_REV").is_some());
    }

    #[test]
    fn test_merge_collapses_case() {
        let mut ctx = MiddlewareContext::new();
        ContextAggregator::merge(&mut ctx, [("foo", "1")]);
        ContextAggregator::merge(&mut ctx, [("FOO", "2")]);

        assert_eq!(ctx.logging().len(), 1);
        assert_eq!(ctx.logging().get("FOO"), Some("2"));
    }

    #[test]
    fn test_journal_record_prefixes_every_key() {
        let mut logging = LoggingContext::from_entries([("user", "alice"), ("tags", "edge")]);
        let mut message = JournalFields::new();
        message.insert("MESSAGE_ID".to_string(), Value::from("x"));

        let record =
            ContextAggregator::to_journal_record(&mut logging, &message, std::iter::empty::<(&str, &str)>());

        assert_eq!(record.len(), 3);
        assert_eq!(record["JOURNAL_USER"], "alice");
        assert_eq!(record["JOURNAL_TAGS"], "edge");
        assert!(!message.contains_key("JOURNAL_USER"));
    }

    #[tokio::test]
    async fn test_stage_seeds_and_enriches() {
        let middleware = LoggingContextMiddleware::new(settings());
        let mut ctx = MiddlewareContext::new();
        let request = http::Request::builder()
            .uri("/api/2.5/plans/XYZ?opt_pretty=1")
            .body(Full::new(Bytes::new()))
            .unwrap();

        let next = Next::handler(|ctx, _req| {
            let params = ctx.logging().get("PARAMS").map(str::to_string);
            Box::pin(async move {
                assert_eq!(params.as_deref(), Some("{'opt_pretty': '1'}"));
                Response::empty(StatusCode::OK)
            })
        });

        let response = middleware.process(&mut ctx, request, next).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(ctx.logging().get("API_VERSION"), Some("2.5"));
        assert!(ctx.errors().is_empty());
    }
}
