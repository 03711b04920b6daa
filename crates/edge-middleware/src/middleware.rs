//! Core middleware trait and types.
//!
//! This module defines the [`Middleware`] trait that every pipeline stage
//! implements. A stage receives the request context, the request, and a
//! [`Next`] callback for the rest of the chain.
//!
//! # Example
//!
//! ```ignore
//! use edge_middleware::{BoxFuture, Middleware, MiddlewareContext, Next, Request, Response};
//!
//! struct ErrorCount;
//!
//! impl Middleware for ErrorCount {
//!     fn name(&self) -> &'static str {
//!         "error_count"
//!     }
//!
//!     fn process<'a>(
//!         &'a self,
//!         ctx: &'a mut MiddlewareContext,
//!         request: Request,
//!         next: Next<'a>,
//!     ) -> BoxFuture<'a, Response> {
//!         Box::pin(async move {
//!             let response = next.run(ctx, request).await;
//!             tracing::debug!(errors = ctx.errors().len(), "request finished");
//!             response
//!         })
//!     }
//! }
//! ```

use crate::context::MiddlewareContext;
use crate::types::{Request, Response};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A boxed future that returns a response.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A pipeline stage.
///
/// A stage either calls `next.run()` exactly once or short-circuits with
/// its own response. Stages must not swallow errors collected in the
/// context by later stages.
pub trait Middleware: Send + Sync + 'static {
    /// Returns the unique name of this stage, used in logs.
    fn name(&self) -> &'static str;

    /// Processes the request through this stage.
    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response>;
}

/// A shared, type-erased stage.
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// Terminal request handler.
///
/// Runs synchronously against the context and returns an owned future, so
/// anything it needs from the context must be read before boxing.
pub type Handler<'a> =
    Box<dyn FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, Response> + Send + 'a>;

/// The remainder of the pipeline as seen from one stage.
///
/// Consumed on use, so the rest of the chain runs at most once.
pub struct Next<'a> {
    remaining: &'a [BoxedMiddleware],
    handler: Handler<'a>,
}

impl<'a> Next<'a> {
    /// Positions a cursor before `stages`, ending in `handler`.
    pub fn new<F>(stages: &'a [BoxedMiddleware], handler: F) -> Self
    where
        F: FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, Response> + Send + 'a,
    {
        Self {
            remaining: stages,
            handler: Box::new(handler),
        }
    }

    /// A cursor with no stages left.
    pub fn handler<F>(handler: F) -> Self
    where
        F: FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, Response> + Send + 'a,
    {
        Self::new(&[], handler)
    }

    /// Number of stages still ahead of the handler.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    /// Runs the next stage, or the handler once the stages are exhausted.
    pub async fn run(self, ctx: &mut MiddlewareContext, request: Request) -> Response {
        match self.remaining.split_first() {
            Some((stage, rest)) => {
                let next = Next {
                    remaining: rest,
                    handler: self.handler,
                };
                stage.process(ctx, request, next).await
            }
            None => (self.handler)(ctx, request).await,
        }
    }
}
