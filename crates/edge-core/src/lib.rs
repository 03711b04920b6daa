//! # Edge Core
//!
//! Core types for the edge API request layer.
//!
//! This crate provides the foundational types used throughout the workspace:
//!
//! - [`RequestId`] - UUID v7 request identifier
//! - [`LoggingContext`] - Per-request structured logging facts
//! - [`CallerIdentity`] - Authenticated caller identity
//! - [`Document`], [`DocumentView`], [`DocumentKind`] - Stored records and their read view
//! - [`DocumentStore`] - The document store seam
//! - [`EdgeError`], [`Errors`] - Tagged failures and the client-facing error sink

#![doc(html_root_url = "https://docs.rs/edge-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
pub mod document;
mod error;
pub mod fixtures;
mod identity;
pub mod store;
pub mod time;

pub use context::{LoggingContext, RequestId, JOURNAL_PREFIX};
pub use document::{clean_up, Document, DocumentKind, DocumentView, SERVICE_FIELDS};
pub use error::{
    EdgeError, EdgeResult, ErrorBody, ErrorCategory, ErrorEntry, Errors, PathDecodeError,
    NOT_FOUND_DESCRIPTION, URL_LOCATION,
};
pub use identity::CallerIdentity;
pub use store::{DocumentStore, InMemoryStore};
