//! Fixed-order middleware pipeline.
//!
//! Every request passes the same four stages before reaching its handler:
//!
//! 1. **Request ID** - generate a UUID v7 id, capture the client's id
//! 2. **Logging Context** - seed and enrich the structured logging context
//! 3. **Error Reporting** - turn a non-empty error sink into the response
//! 4. **Document Resolution** - resolve and kind-check the addressed document
//!
//! Error reporting wraps document resolution and the handler, so failures
//! raised by either are reported exactly once on the way back out.

use crate::context::MiddlewareContext;
use crate::middleware::{BoxFuture, BoxedMiddleware, Middleware, Next};
use crate::types::{Request, Response};
use std::sync::Arc;

/// The fixed-order middleware pipeline.
///
/// The pipeline cannot be modified after construction.
///
/// # Example
///
/// ```ignore
/// use edge_middleware::Pipeline;
///
/// let pipeline = Pipeline::builder()
///     .stage(RequestIdMiddleware::new())
///     .stage(LoggingContextMiddleware::new(ContextSettings::default()))
///     .build();
///
/// let response = pipeline.process(ctx, request, handler).await;
/// ```
pub struct Pipeline {
    stages: Vec<BoxedMiddleware>,
}

impl Pipeline {
    /// Creates a new pipeline builder.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Processes a request through every stage and then the handler.
    ///
    /// The context is borrowed so callers can inspect what the stages
    /// recorded once the response is produced.
    pub async fn process<H>(&self, ctx: &mut MiddlewareContext, request: Request, handler: H) -> Response
    where
        H: FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, Response> + Send + 'static,
    {
        Next::new(&self.stages, handler).run(ctx, request).await
    }

    /// Returns the names of all middleware stages in order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|mw| mw.name()).collect()
    }

    /// Returns the number of middleware stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}

/// Builder for constructing a [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    stages: Vec<BoxedMiddleware>,
}

impl PipelineBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stage. Stages run in the order they are added.
    #[must_use]
    pub fn stage<M: Middleware>(mut self, middleware: M) -> Self {
        self.stages.push(Arc::new(middleware));
        self
    }

    /// Builds the pipeline.
    #[must_use]
    pub fn build(self) -> Pipeline {
        Pipeline { stages: self.stages }
    }
}

/// Middleware stage marker for the fixed ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Stage {
    /// Stage 1: request id generation and client id capture
    RequestId = 1,
    /// Stage 2: logging context seeding and enrichment
    LoggingContext = 2,
    /// Stage 3: error reporting
    ErrorReporting = 3,
    /// Stage 4: document resolution
    DocumentResolution = 4,
}

impl Stage {
    /// Returns the stage name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::RequestId => "request_id",
            Self::LoggingContext => "logging_context",
            Self::ErrorReporting => "error_reporting",
            Self::DocumentResolution => "document_resolution",
        }
    }

    /// Returns all stages in order.
    #[must_use]
    pub const fn all() -> [Stage; 4] {
        [
            Self::RequestId,
            Self::LoggingContext,
            Self::ErrorReporting,
            Self::DocumentResolution,
        ]
    }
}
