//! # Edge Middleware
//!
//! The fixed-order request pipeline of the edge API.
//!
//! ## Pipeline Stages
//!
//! ```text
//! Request → RequestId → LoggingContext → ErrorReporting → DocumentResolution → Handler
//! ```
//!
//! | Stage | Middleware          | Purpose                                        |
//! |-------|---------------------|------------------------------------------------|
//! | 1     | Request ID          | UUID v7 request id, client correlation id      |
//! | 2     | Logging Context     | Seed and enrich the per-request logging context |
//! | 3     | Error Reporting     | Journal and render collected errors            |
//! | 4     | Document Resolution | Resolve and kind-check the addressed document  |
//!
//! Every stage reads and writes one [`MiddlewareContext`], owned by the
//! request and passed by mutable reference.
//!
//! ## Example
//!
//! ```
//! use edge_middleware::Stage;
//!
//! let stages = Stage::all();
//! assert_eq!(stages.len(), 4);
//! assert_eq!(stages[0].name(), "request_id");
//! assert_eq!(stages[3].name(), "document_resolution");
//! ```

#![doc(html_root_url = "https://docs.rs/edge-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod context;
pub mod middleware;
pub mod pipeline;
pub mod stages;
pub mod types;

pub use context::MiddlewareContext;
pub use middleware::{BoxFuture, BoxedMiddleware, Handler, Middleware, Next};
pub use pipeline::{Pipeline, PipelineBuilder, Stage};
pub use stages::{
    ContextAggregator, ContextSettings, DocumentResolutionMiddleware, ErrorRecord, ErrorReporter,
    ErrorReportingMiddleware, LoggingContextMiddleware, RequestIdMiddleware,
};
pub use types::{Request, Response, ResponseExt};
