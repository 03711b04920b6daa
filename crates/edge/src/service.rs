//! The assembled edge service.

use edge_config::{ConfigError, EdgeConfig};
use edge_core::{DocumentStore, DocumentView, Errors, NOT_FOUND_DESCRIPTION, URL_LOCATION};
use edge_middleware::{
    BoxFuture, ContextSettings, DocumentResolutionMiddleware, ErrorReportingMiddleware,
    LoggingContextMiddleware, MiddlewareContext, Pipeline, Request, RequestIdMiddleware, Response,
    ResponseExt,
};
use edge_telemetry::{JournalSink, TelemetryError};
use http::StatusCode;
use std::sync::Arc;

/// The fixed request pipeline plus response rendering, built from
/// configuration.
///
/// # Example
///
/// ```rust,ignore
/// let service = EdgeService::from_config(&config, store, Arc::new(TracingJournal::new()))?;
///
/// let mut ctx = MiddlewareContext::new().identity_from(identity);
/// let response = service.handle(&mut ctx, request, service.document_handler()).await;
/// ```
#[derive(Debug)]
pub struct EdgeService {
    pipeline: Pipeline,
    service_fields: Arc<[String]>,
}

impl EdgeService {
    /// Builds the pipeline described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configured time zone is unknown.
    pub fn from_config(
        config: &EdgeConfig,
        store: Arc<dyn DocumentStore>,
        journal: Arc<dyn JournalSink>,
    ) -> Result<Self, ConfigError> {
        let settings = ContextSettings {
            api_version: config.service.api_version.clone(),
            tags: config.service.tags.clone(),
            timezone: config.timezone()?,
        };

        let pipeline = Pipeline::builder()
            .stage(RequestIdMiddleware::new().client_header(&config.service.client_request_id_header))
            .stage(LoggingContextMiddleware::new(settings))
            .stage(
                ErrorReportingMiddleware::new(journal)
                    .include_params(config.service.echo_request_params),
            )
            .stage(DocumentResolutionMiddleware::new(store).kinds(config.documents.kinds.clone()))
            .build();

        tracing::debug!(stages = ?pipeline.stage_names(), "edge pipeline built");

        Ok(Self {
            pipeline,
            service_fields: config.documents.service_fields.clone().into(),
        })
    }

    /// Returns the pipeline.
    #[must_use]
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Runs `request` through the pipeline and then `handler`.
    pub async fn handle<H>(&self, ctx: &mut MiddlewareContext, request: Request, handler: H) -> Response
    where
        H: FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, Response> + Send + 'static,
    {
        self.pipeline.process(ctx, request, handler).await
    }

    /// Renders `document` as `{"data": ...}` with service fields removed.
    #[must_use]
    pub fn document_response(&self, document: &DocumentView) -> Response {
        render_document(document, &self.service_fields)
    }

    /// Returns a handler that renders the resolved document.
    ///
    /// When the request addressed no document, the handler records a `url`
    /// not-found entry in the error sink so it is reported and rendered like
    /// any other client error.
    #[must_use]
    pub fn document_handler(
        &self,
    ) -> impl FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, Response> + Send + 'static {
        let fields = Arc::clone(&self.service_fields);
        move |ctx: &mut MiddlewareContext, _request: Request| {
            let response = match ctx.document() {
                Some(document) => render_document(document, &fields),
                None => {
                    ctx.errors_mut().extend(unresolved_path());
                    Response::empty(StatusCode::NOT_FOUND)
                }
            };
            Box::pin(async move { response }) as BoxFuture<'static, Response>
        }
    }
}

fn unresolved_path() -> Errors {
    Errors::with_status(StatusCode::NOT_FOUND).add(URL_LOCATION, "path", NOT_FOUND_DESCRIPTION)
}

fn render_document(document: &DocumentView, fields: &[String]) -> Response {
    Response::json(
        StatusCode::OK,
        &serde_json::json!({ "data": document.clean_up(fields) }),
    )
}

/// Initializes logging and metrics from the telemetry section of `config`.
///
/// # Errors
///
/// Returns `TelemetryError` if either subsystem fails to initialize.
pub fn init_telemetry(config: &EdgeConfig) -> Result<(), TelemetryError> {
    edge_telemetry::init_telemetry(config.telemetry.to_telemetry_config())
}

#[cfg(test)]
mod tests {
    use super::*;
    use edge_core::fixtures;
    use edge_telemetry::MemoryJournal;

    fn service(config: &EdgeConfig) -> EdgeService {
        EdgeService::from_config(
            config,
            Arc::new(fixtures::sample_store()),
            Arc::new(MemoryJournal::new()),
        )
        .unwrap()
    }

    #[test]
    fn test_pipeline_has_fixed_stages() {
        let service = service(&EdgeConfig::default());
        assert_eq!(
            service.pipeline().stage_names(),
            vec!["request_id", "logging_context", "error_reporting", "document_resolution"]
        );
    }

    #[test]
    fn test_invalid_timezone_rejected() {
        let mut config = EdgeConfig::default();
        config.service.timezone = "Nowhere/Land".to_string();

        let result = EdgeService::from_config(
            &config,
            Arc::new(fixtures::sample_store()),
            Arc::new(MemoryJournal::new()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_document_response_strips_service_fields() {
        let service = service(&EdgeConfig::default());
        let response = service.document_response(&DocumentView::new("abc123", fixtures::tender()));

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(http::header::CONTENT_TYPE).unwrap(),
            "application/json; charset=utf-8"
        );
    }
}
