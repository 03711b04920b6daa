//! # Edge
//!
//! Document access for the procurement API's edge layer:
//!
//! - **Path resolution** – find the document a request path addresses
//! - **Document adaptation** – fetch, kind-check and clean stored documents
//! - **Logging context** – structured per-request facts on every journal record
//! - **Error reporting** – one journal entry and one JSON body per failed request
//! - **Tokens** – short opaque hex tokens for entity secrets
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use edge::prelude::*;
//! use std::sync::Arc;
//!
//! let config = ConfigLoader::new()
//!     .with_optional_file("edge.toml")?
//!     .with_env_prefix("EDGE")
//!     .with_process_timezone()
//!     .load()?;
//! edge::init_telemetry(&config)?;
//!
//! let service = EdgeService::from_config(&config, store, Arc::new(TracingJournal::new()))?;
//! let mut ctx = MiddlewareContext::new();
//! let response = service.handle(&mut ctx, request, service.document_handler()).await;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Request → RequestId → LoggingContext → ErrorReporting → DocumentResolution → Handler
//! ```

#![doc(html_root_url = "https://docs.rs/edge/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod service;

pub use service::{init_telemetry, EdgeService};

// Re-export core types
pub use edge_core as core;

// Re-export configuration
pub use edge_config as config;

// Re-export extraction helpers
pub use edge_extract as extract;

// Re-export middleware pipeline
pub use edge_middleware as middleware;

// Re-export telemetry
pub use edge_telemetry as telemetry;

// Re-export the token codec
pub use edge_token as token;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust,ignore
/// use edge::prelude::*;
/// ```
pub mod prelude {
    pub use crate::service::EdgeService;

    pub use edge_core::{
        CallerIdentity, Document, DocumentKind, DocumentStore, DocumentView, EdgeError,
        EdgeResult, ErrorBody, Errors, InMemoryStore, LoggingContext, RequestId,
    };

    pub use edge_config::{ConfigError, ConfigLoader, EdgeConfig};

    pub use edge_extract::{extract_doc, resolve_document_id, ExtractionContext, Params};

    pub use edge_middleware::{
        ContextAggregator, ErrorReporter, MiddlewareContext, Request, Response, ResponseExt,
    };

    pub use edge_telemetry::{JournalSink, MemoryJournal, TracingJournal};

    pub use edge_token::{TokenCodec, TokenError};
}
