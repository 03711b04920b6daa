//! # Edge Extract
//!
//! Reads what the edge layer needs from an already-dispatched request.
//!
//! | Item | Source | Description |
//! |------|--------|-------------|
//! | [`ExtractionContext`] | Request parts | Method, URI, headers, route params, peer address |
//! | [`parse_query`] | Query string | Ordered, decoded query parameters |
//! | [`resolve_document_id`] | URL path | Document id for a given kind, if addressed |
//! | [`extract_doc`] | Path + store | Resolved and kind-checked [`DocumentView`](edge_core::DocumentView) |
//!
//! ## Example
//!
//! ```rust
//! use edge_core::fixtures;
//! use edge_extract::{extract_plan, ExtractionContextBuilder};
//! use http::Uri;
//!
//! let store = fixtures::sample_store();
//! let ctx = ExtractionContextBuilder::new()
//!     .uri(Uri::from_static("/api/2.5/plans/XYZ"))
//!     .build();
//!
//! let plan = extract_plan(&ctx, &store).unwrap().unwrap();
//! assert_eq!(plan.id(), "XYZ");
//! ```

#![doc(html_root_url = "https://docs.rs/edge-extract/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod document;
mod error;
mod params;
mod path;
mod query;

pub use context::{ExtractionContext, ExtractionContextBuilder};
pub use document::{
    extract_auction, extract_contract, extract_doc, extract_first, extract_plan, extract_tender,
    resolve,
};
pub use error::{ExtractionError, QUERY_LOCATION};
pub use params::Params;
pub use path::{decode_path, resolve_document_id};
pub use query::{params_repr, parse_query};
