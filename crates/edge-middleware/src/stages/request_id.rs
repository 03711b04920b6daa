//! Request ID middleware.
//!
//! Assigns every request a server-generated UUID v7 and captures the
//! client's own correlation id from a configurable header. The server id is
//! always echoed back in the `X-Request-ID` response header.

use crate::context::MiddlewareContext;
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, Response};
use edge_core::RequestId;
use http::HeaderValue;

/// The header name for request ID propagation.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Default header carrying the client's correlation id.
pub const CLIENT_REQUEST_ID_HEADER: &str = "x-client-request-id";

/// Middleware that generates request IDs and captures client ids.
///
/// # Example
///
/// ```
/// use edge_middleware::stages::request_id::RequestIdMiddleware;
///
/// let middleware = RequestIdMiddleware::new().client_header("X-Correlation-ID");
/// assert_eq!(middleware.client_header_name(), "x-correlation-id");
/// ```
#[derive(Debug, Clone)]
pub struct RequestIdMiddleware {
    client_header: String,
}

impl Default for RequestIdMiddleware {
    fn default() -> Self {
        Self {
            client_header: CLIENT_REQUEST_ID_HEADER.to_string(),
        }
    }
}

impl RequestIdMiddleware {
    /// Creates a middleware reading the client id from `X-Client-Request-ID`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the header the client correlation id is read from.
    #[must_use]
    pub fn client_header(mut self, name: &str) -> Self {
        self.client_header = name.to_ascii_lowercase();
        self
    }

    /// Returns the (lower-cased) client id header name.
    #[must_use]
    pub fn client_header_name(&self) -> &str {
        &self.client_header
    }
}

impl Middleware for RequestIdMiddleware {
    fn name(&self) -> &'static str {
        "request_id"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            // Always server-generated; an incoming X-Request-ID is ignored.
            let request_id = RequestId::new();
            ctx.set_request_id(request_id);

            if let Some(client_id) = request
                .headers()
                .get(self.client_header.as_str())
                .and_then(|value| value.to_str().ok())
            {
                ctx.set_client_request_id(client_id);
            }

            let mut response = next.run(ctx, request).await;

            if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
                response.headers_mut().insert(REQUEST_ID_HEADER, value);
            }
            response
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResponseExt;
    use bytes::Bytes;
    use http::{Request as HttpRequest, StatusCode};
    use http_body_util::Full;

    fn request_with(headers: &[(&str, &str)]) -> Request {
        let mut builder = HttpRequest::builder().uri("/api/2.5/tenders/abc123");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Full::new(Bytes::new())).unwrap()
    }

    fn ok_handler() -> Next<'static> {
        Next::handler(|_ctx, _req| Box::pin(async { Response::empty(StatusCode::OK) }))
    }

    #[tokio::test]
    async fn test_generates_request_id() {
        let middleware = RequestIdMiddleware::new();
        let mut ctx = MiddlewareContext::new();
        let original = ctx.request_id();

        let response = middleware
            .process(&mut ctx, request_with(&[]), ok_handler())
            .await;

        assert_ne!(ctx.request_id(), original);
        let header = response.headers().get(REQUEST_ID_HEADER).unwrap();
        assert_eq!(header.to_str().unwrap(), ctx.request_id().to_string());
    }

    #[tokio::test]
    async fn test_ignores_incoming_id() {
        let incoming = uuid::Uuid::now_v7().to_string();
        let middleware = RequestIdMiddleware::new();
        let mut ctx = MiddlewareContext::new();

        middleware
            .process(&mut ctx, request_with(&[(REQUEST_ID_HEADER, incoming.as_str())]), ok_handler())
            .await;

        assert_ne!(ctx.request_id().to_string(), incoming);
    }

    #[tokio::test]
    async fn test_captures_client_request_id() {
        let middleware = RequestIdMiddleware::new();
        let mut ctx = MiddlewareContext::new();

        middleware
            .process(&mut ctx, request_with(&[("X-Client-Request-ID", "client-7")]), ok_handler())
            .await;

        assert_eq!(ctx.client_request_id(), Some("client-7"));
    }

    #[tokio::test]
    async fn test_custom_client_header() {
        let middleware = RequestIdMiddleware::new().client_header("X-Correlation-ID");
        let mut ctx = MiddlewareContext::new();

        middleware
            .process(
                &mut ctx,
                request_with(&[("X-Client-Request-ID", "ignored"), ("x-correlation-id", "c-1")]),
                ok_handler(),
            )
            .await;

        assert_eq!(ctx.client_request_id(), Some("c-1"));
    }
}
