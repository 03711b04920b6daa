//! Middleware context types.
//!
//! The [`MiddlewareContext`] is the per-request state every stage reads and
//! enriches: request ids, caller identity, route and query parameters, the
//! structured [`LoggingContext`], the resolved document and the error sink.
//! It is created by the caller, threaded through the pipeline by mutable
//! reference and dropped when the request completes.

use crate::types::Request;
use edge_core::{CallerIdentity, DocumentView, EdgeError, Errors, LoggingContext, RequestId};
use edge_extract::{ExtractionContext, Params};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::net::SocketAddr;

/// Context that flows through the middleware pipeline.
///
/// # Example
///
/// ```
/// use edge_middleware::MiddlewareContext;
/// use edge_core::CallerIdentity;
///
/// let mut ctx = MiddlewareContext::new();
/// ctx.set_identity(CallerIdentity::user("broker-1"));
/// ctx.logging_mut().insert("tags", "edge,api");
///
/// assert_eq!(ctx.identity().user_id(), Some("broker-1"));
/// assert_eq!(ctx.logging().get("TAGS"), Some("edge,api"));
/// ```
#[derive(Debug)]
pub struct MiddlewareContext {
    request_id: RequestId,

    /// Correlation id supplied by the client, if any.
    client_request_id: Option<String>,

    identity: CallerIdentity,

    remote_addr: Option<SocketAddr>,

    /// Route parameters captured by the router before the pipeline runs.
    path_params: Params,

    /// Query parameters, filled in by the logging context stage.
    query_params: Params,

    logging: LoggingContext,

    /// The document addressed by the request, once resolved.
    document: Option<DocumentView>,

    errors: Errors,

    /// Type-erased extension data.
    extensions: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl MiddlewareContext {
    /// Creates a new middleware context with a fresh request ID.
    #[must_use]
    pub fn new() -> Self {
        Self::with_request_id(RequestId::new())
    }

    /// Creates a context with a specific request ID.
    #[must_use]
    pub fn with_request_id(request_id: RequestId) -> Self {
        Self {
            request_id,
            client_request_id: None,
            identity: CallerIdentity::Anonymous,
            remote_addr: None,
            path_params: Params::new(),
            query_params: Params::new(),
            logging: LoggingContext::new(),
            document: None,
            errors: Errors::new(),
            extensions: HashMap::new(),
        }
    }

    /// Builder-style identity setter.
    #[must_use]
    pub fn identity_from(mut self, identity: CallerIdentity) -> Self {
        self.identity = identity;
        self
    }

    /// Builder-style peer address setter.
    #[must_use]
    pub fn remote_addr_from(mut self, addr: SocketAddr) -> Self {
        self.remote_addr = Some(addr);
        self
    }

    /// Builder-style route parameter setter.
    #[must_use]
    pub fn path_params_from(mut self, params: Params) -> Self {
        self.path_params = params;
        self
    }

    /// Returns the request ID.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Sets the request ID.
    ///
    /// This should only be called by the request id stage.
    pub fn set_request_id(&mut self, request_id: RequestId) {
        self.request_id = request_id;
    }

    /// Returns the client-supplied correlation id.
    #[must_use]
    pub fn client_request_id(&self) -> Option<&str> {
        self.client_request_id.as_deref()
    }

    /// Sets the client-supplied correlation id.
    pub fn set_client_request_id(&mut self, id: impl Into<String>) {
        self.client_request_id = Some(id.into());
    }

    /// Returns the caller identity.
    #[must_use]
    pub fn identity(&self) -> &CallerIdentity {
        &self.identity
    }

    /// Sets the caller identity.
    pub fn set_identity(&mut self, identity: CallerIdentity) {
        self.identity = identity;
    }

    /// Returns the peer address, if known.
    #[must_use]
    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }

    /// Returns the route parameters.
    #[must_use]
    pub fn path_params(&self) -> &Params {
        &self.path_params
    }

    /// Returns the parsed query parameters.
    #[must_use]
    pub fn query_params(&self) -> &Params {
        &self.query_params
    }

    /// Replaces the parsed query parameters.
    pub fn set_query_params(&mut self, params: Params) {
        self.query_params = params;
    }

    /// Returns the logging context.
    #[must_use]
    pub fn logging(&self) -> &LoggingContext {
        &self.logging
    }

    /// Returns mutable access to the logging context.
    pub fn logging_mut(&mut self) -> &mut LoggingContext {
        &mut self.logging
    }

    /// Returns the resolved document, if any.
    #[must_use]
    pub fn document(&self) -> Option<&DocumentView> {
        self.document.as_ref()
    }

    /// Stores the resolved document.
    pub fn set_document(&mut self, document: DocumentView) {
        self.document = Some(document);
    }

    /// Returns the error sink.
    #[must_use]
    pub fn errors(&self) -> &Errors {
        &self.errors
    }

    /// Returns mutable access to the error sink.
    pub fn errors_mut(&mut self) -> &mut Errors {
        &mut self.errors
    }

    /// Records a failure in the error sink, adopting its status.
    pub fn fail(&mut self, error: &EdgeError) {
        self.errors.extend(error.to_errors());
    }

    /// Takes the collected errors, leaving an empty sink behind.
    pub fn take_errors(&mut self) -> Errors {
        std::mem::take(&mut self.errors)
    }

    /// Builds an [`ExtractionContext`] for `request` with this context's
    /// route parameters and peer address.
    #[must_use]
    pub fn extraction_context(&self, request: &Request) -> ExtractionContext {
        let ctx = ExtractionContext::new(
            request.method().clone(),
            request.uri().clone(),
            request.headers().clone(),
            self.path_params.clone(),
        );
        match self.remote_addr {
            Some(addr) => ctx.with_remote_addr(addr),
            None => ctx,
        }
    }

    /// Stores a typed extension value.
    ///
    /// # Example
    ///
    /// ```
    /// use edge_middleware::MiddlewareContext;
    ///
    /// struct Attempt(u32);
    ///
    /// let mut ctx = MiddlewareContext::new();
    /// ctx.set_extension(Attempt(2));
    ///
    /// assert_eq!(ctx.get_extension::<Attempt>().map(|a| a.0), Some(2));
    /// ```
    pub fn set_extension<T: Send + Sync + 'static>(&mut self, value: T) {
        self.extensions.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Retrieves a typed extension value.
    #[must_use]
    pub fn get_extension<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Removes and returns a typed extension value.
    pub fn remove_extension<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.extensions
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|b| *b)
    }

    /// Checks if an extension of the given type exists.
    #[must_use]
    pub fn has_extension<T: Send + Sync + 'static>(&self) -> bool {
        self.extensions.contains_key(&TypeId::of::<T>())
    }
}

impl Default for MiddlewareContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MiddlewareContext {
    fn clone(&self) -> Self {
        // Extensions are not cloned
        Self {
            request_id: self.request_id,
            client_request_id: self.client_request_id.clone(),
            identity: self.identity.clone(),
            remote_addr: self.remote_addr,
            path_params: self.path_params.clone(),
            query_params: self.query_params.clone(),
            logging: self.logging.clone(),
            document: self.document.clone(),
            errors: self.errors.clone(),
            extensions: HashMap::new(),
        }
    }
}
