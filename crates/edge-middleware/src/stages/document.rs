//! Document resolution middleware.
//!
//! Resolves the document the request path addresses, checks its kind and
//! attaches it to the context for the handler. Failures go to the error
//! sink and stop the request before the handler runs; the error reporting
//! stage turns them into the response.

use super::logging_context::ContextAggregator;
use crate::context::MiddlewareContext;
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, Response, ResponseExt};
use edge_core::{DocumentKind, DocumentStore, EdgeError};
use edge_extract::extract_first;
use std::fmt;
use std::sync::Arc;

/// Pipeline stage that resolves the addressed document.
///
/// Kinds are probed in order; the first kind the path addresses is the one
/// resolved. Paths that address none of them pass through untouched.
#[derive(Clone)]
pub struct DocumentResolutionMiddleware {
    store: Arc<dyn DocumentStore>,
    kinds: Vec<DocumentKind>,
}

impl DocumentResolutionMiddleware {
    /// Creates a stage probing every document kind.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            kinds: DocumentKind::ALL.to_vec(),
        }
    }

    /// Restricts the kinds probed.
    #[must_use]
    pub fn kinds(mut self, kinds: impl Into<Vec<DocumentKind>>) -> Self {
        self.kinds = kinds.into();
        self
    }
}

impl fmt::Debug for DocumentResolutionMiddleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentResolutionMiddleware")
            .field("kinds", &self.kinds)
            .finish_non_exhaustive()
    }
}

impl Middleware for DocumentResolutionMiddleware {
    fn name(&self) -> &'static str {
        "document_resolution"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            // Earlier stages already rejected the request.
            if !ctx.errors().is_empty() {
                return Response::empty(ctx.errors().status());
            }

            let extraction = ctx.extraction_context(&request);
            match extract_first(&extraction, self.store.as_ref(), &self.kinds) {
                Ok(Some(view)) => {
                    tracing::debug!(id = %view.id(), doc_type = %view.doc_type(), "document resolved");
                    ctx.set_document(view);
                    ContextAggregator::enrich_document(ctx);
                    next.run(ctx, request).await
                }
                Ok(None) => next.run(ctx, request).await,
                Err(err) => {
                    if matches!(err, EdgeError::Store { .. }) {
                        tracing::error!(error = %err, "document store failure");
                    }
                    ctx.fail(&err);
                    Response::empty(err.status_code())
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use edge_core::{fixtures, Document, EdgeResult};
    use http::StatusCode;
    use http_body_util::Full;

    struct BrokenStore;

    impl DocumentStore for BrokenStore {
        fn get(&self, _id: &str) -> EdgeResult<Option<Document>> {
            Err(EdgeError::store("connection refused"))
        }
    }

    fn request(path: &str) -> Request {
        http::Request::builder()
            .uri(path)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    fn ok_handler() -> Next<'static> {
        Next::handler(|_ctx, _req| Box::pin(async { Response::empty(StatusCode::OK) }))
    }

    fn middleware() -> DocumentResolutionMiddleware {
        DocumentResolutionMiddleware::new(Arc::new(fixtures::sample_store()))
    }

    #[tokio::test]
    async fn test_resolves_plan() {
        let mut ctx = MiddlewareContext::new();
        let response = middleware()
            .process(&mut ctx, request("/api/2.5/plans/XYZ"), ok_handler())
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(ctx.document().map(|doc| doc.id()), Some("XYZ"));
        assert_eq!(ctx.logging().get("PLAN_STATUS"), Some("scheduled"));
    }

    #[tokio::test]
    async fn test_kind_mismatch_is_not_found() {
        let mut ctx = MiddlewareContext::new();
        let response = middleware()
            .process(&mut ctx, request("/api/2.5/plans/abc123"), ok_handler())
            .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(ctx.document().is_none());
        assert_eq!(ctx.errors().entries()[0].name, "plan_id");
    }

    #[tokio::test]
    async fn test_unaddressed_path_passes_through() {
        let mut ctx = MiddlewareContext::new();
        let response = middleware()
            .process(&mut ctx, request("/api/2.5/tenders"), ok_handler())
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(ctx.errors().is_empty());
    }

    #[tokio::test]
    async fn test_restricted_kinds() {
        let mut ctx = MiddlewareContext::new();
        let response = middleware()
            .kinds([DocumentKind::Tender])
            .process(&mut ctx, request("/api/2.5/plans/XYZ"), ok_handler())
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(ctx.document().is_none());
    }

    #[tokio::test]
    async fn test_store_failure() {
        let stage = DocumentResolutionMiddleware::new(Arc::new(BrokenStore));
        let mut ctx = MiddlewareContext::new();
        let response = stage
            .process(&mut ctx, request("/api/2.5/tenders/abc123"), ok_handler())
            .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ctx.errors().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_skips_when_errors_pending() {
        let mut ctx = MiddlewareContext::new();
        ctx.errors_mut().push("querystring", "q", "Invalid");

        let response = middleware()
            .process(&mut ctx, request("/api/2.5/plans/XYZ"), ok_handler())
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(ctx.document().is_none());
    }
}
