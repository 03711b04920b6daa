//! End-to-end pipeline integration tests.
//!
//! These tests run all four stages together in their fixed order:
//!
//! 1. Request ID
//! 2. Logging Context
//! 3. Error Reporting
//! 4. Document Resolution

use bytes::Bytes;
use edge_core::{fixtures, CallerIdentity, ErrorBody};
use edge_middleware::{
    context::MiddlewareContext,
    pipeline::{Pipeline, Stage},
    stages::{
        document::DocumentResolutionMiddleware,
        error_report::{ErrorRecord, ErrorReportingMiddleware, ERROR_HANDLER_MESSAGE_ID},
        logging_context::{ContextSettings, LoggingContextMiddleware},
        request_id::{RequestIdMiddleware, REQUEST_ID_HEADER},
    },
    types::{Request, Response, ResponseExt},
};
use edge_telemetry::MemoryJournal;
use http::{Request as HttpRequest, StatusCode};
use http_body_util::{BodyExt, Full};
use std::sync::Arc;

fn make_request(path: &str) -> Request {
    HttpRequest::builder()
        .uri(path)
        .header("host", "edge.test")
        .header("x-client-request-id", "client-1")
        .body(Full::new(Bytes::new()))
        .unwrap()
}

fn full_pipeline(journal: Arc<MemoryJournal>) -> Pipeline {
    Pipeline::builder()
        .stage(RequestIdMiddleware::new())
        .stage(LoggingContextMiddleware::new(ContextSettings::default()))
        .stage(ErrorReportingMiddleware::new(journal))
        .stage(DocumentResolutionMiddleware::new(Arc::new(fixtures::sample_store())))
        .build()
}

/// Renders the resolved document, cleaned of service fields.
fn document_handler(ctx: &mut MiddlewareContext, _request: Request) -> edge_middleware::BoxFuture<'static, Response> {
    let cleaned = ctx.document().map(|doc| doc.cleaned());
    Box::pin(async move {
        match cleaned {
            Some(doc) => Response::json(StatusCode::OK, &serde_json::json!({ "data": doc })),
            None => Response::empty(StatusCode::NO_CONTENT),
        }
    })
}

async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[test]
fn test_stage_names_match_fixed_order() {
    let pipeline = full_pipeline(Arc::new(MemoryJournal::new()));
    let expected: Vec<_> = Stage::all().iter().map(|s| s.name()).collect();
    assert_eq!(pipeline.stage_names(), expected);
}

#[tokio::test]
async fn test_document_request_succeeds() {
    let journal = Arc::new(MemoryJournal::new());
    let pipeline = full_pipeline(journal.clone());
    let mut ctx = MiddlewareContext::new().identity_from(CallerIdentity::user("broker"));

    let response = pipeline
        .process(&mut ctx, make_request("/api/2.5/plans/XYZ"), document_handler)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(REQUEST_ID_HEADER).unwrap().to_str().unwrap(),
        ctx.request_id().to_string()
    );

    let body = body_json(response).await;
    assert_eq!(body["data"]["planID"], "UA-P-2024-01-01-000001");
    assert!(body["data"].get("_id").is_none());
    assert!(body["data"].get("doc_type").is_none());

    let logging = ctx.logging();
    assert_eq!(logging.get("USER"), Some("broker"));
    assert_eq!(logging.get("CLIENT_REQUEST_ID"), Some("client-1"));
    assert_eq!(logging.get("CURRENT_URL"), Some("http://edge.test/api/2.5/plans/XYZ"));
    assert_eq!(logging.get("PLANID"), Some("UA-P-2024-01-01-000001"));
    assert!(journal.is_empty());
}

#[tokio::test]
async fn test_kind_mismatch_reports_not_found() {
    let journal = Arc::new(MemoryJournal::new());
    let pipeline = full_pipeline(journal.clone());
    let mut ctx = MiddlewareContext::new();

    let response = pipeline
        .process(&mut ctx, make_request("/api/2.5/plans/abc123?mode=test"), document_handler)
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));

    let body: ErrorBody = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(body.status, 404);
    assert_eq!(body.errors.len(), 1);
    assert_eq!(body.errors[0].location, "url");
    assert_eq!(body.errors[0].name, "plan_id");
    assert_eq!(body.errors[0].description, "Not Found");

    let entries = journal.by_message_id(ERROR_HANDLER_MESSAGE_ID);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].field_str("JOURNAL_ERROR_STATUS"), Some("404"));
    assert_eq!(entries[0].field_str("JOURNAL_PARAMS"), Some("{'mode': 'test'}"));
    assert_eq!(entries[0].field_str("JOURNAL_CLIENT_REQUEST_ID"), Some("client-1"));

    assert_eq!(ctx.get_extension::<ErrorRecord>().map(|r| r.status), Some(404));
}

#[tokio::test]
async fn test_handler_validation_errors_are_reported() {
    let journal = Arc::new(MemoryJournal::new());
    let pipeline = full_pipeline(journal.clone());
    let mut ctx = MiddlewareContext::new();

    let response = pipeline
        .process(&mut ctx, make_request("/api/2.5/tenders/abc123"), |ctx, _req| {
            ctx.errors_mut().set_status(StatusCode::UNPROCESSABLE_ENTITY);
            ctx.errors_mut().push("body", "title", "This field is required.");
            Box::pin(async { Response::empty(StatusCode::OK) })
        })
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let entries = journal.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].field_str("JOURNAL_TENDER_STATUS"), Some("active.tendering"));
}

#[tokio::test]
async fn test_suppressed_params_stay_out_of_journal() {
    let journal = Arc::new(MemoryJournal::new());
    let pipeline = Pipeline::builder()
        .stage(RequestIdMiddleware::new())
        .stage(LoggingContextMiddleware::new(ContextSettings::default()))
        .stage(ErrorReportingMiddleware::new(journal.clone()).include_params(false))
        .stage(DocumentResolutionMiddleware::new(Arc::new(fixtures::sample_store())))
        .build();
    let mut ctx = MiddlewareContext::new();

    let response = pipeline
        .process(&mut ctx, make_request("/api/2.5/tenders/missing?acc_token=secret"), document_handler)
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let entries = journal.entries();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].field_str("JOURNAL_PARAMS").is_none());
}

#[tokio::test]
async fn test_collection_path_reaches_handler() {
    let journal = Arc::new(MemoryJournal::new());
    let pipeline = full_pipeline(journal.clone());
    let mut ctx = MiddlewareContext::new();

    let response = pipeline
        .process(&mut ctx, make_request("/api/2.5/tenders"), document_handler)
        .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(journal.is_empty());
}
