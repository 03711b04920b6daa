//! Document resolution.
//!
//! Combines path resolution with a store lookup and a kind check. A document
//! that exists under the requested id but carries another `doc_type` is
//! reported exactly like a missing one.

use crate::context::ExtractionContext;
use crate::path::resolve_document_id;
use edge_core::{DocumentKind, DocumentStore, DocumentView, EdgeError, EdgeResult};
use edge_telemetry::metrics::{record_document_resolved, ResolveOutcome};

/// Fetches `id` from the store and checks that it is a `kind`.
///
/// # Errors
///
/// - [`EdgeError::NotFound`] if the id is absent or has another kind.
/// - [`EdgeError::Store`] if the store fails. Not retried.
///
/// # Example
///
/// ```
/// use edge_core::{fixtures, DocumentKind, EdgeError};
/// use edge_extract::resolve;
///
/// let store = fixtures::sample_store();
///
/// let plan = resolve(&store, "XYZ", DocumentKind::Plan).unwrap();
/// assert_eq!(plan.status().as_deref(), Some("scheduled"));
///
/// let err = resolve(&store, "XYZ", DocumentKind::Tender).unwrap_err();
/// assert!(matches!(err, EdgeError::NotFound { .. }));
/// ```
pub fn resolve(store: &dyn DocumentStore, id: &str, kind: DocumentKind) -> EdgeResult<DocumentView> {
    let fetched = match store.get(id) {
        Ok(doc) => doc,
        Err(err) => {
            record_document_resolved(kind.as_str(), ResolveOutcome::StoreError);
            tracing::warn!(kind = %kind, id, error = %err, "document store lookup failed");
            return Err(err);
        }
    };

    match fetched {
        Some(doc) if doc.doc_type() == Some(kind.as_str()) => {
            record_document_resolved(kind.as_str(), ResolveOutcome::Found);
            Ok(DocumentView::new(id, doc))
        }
        other => {
            record_document_resolved(kind.as_str(), ResolveOutcome::NotFound);
            tracing::debug!(
                kind = %kind,
                id,
                found_type = other.as_ref().and_then(|d| d.doc_type()).unwrap_or_default(),
                "document not found for kind"
            );
            Err(EdgeError::not_found(kind.as_str()))
        }
    }
}

/// Resolves the document of `kind` addressed by the request path.
///
/// Returns `Ok(None)` when the path does not address `kind`.
///
/// # Errors
///
/// Path decode failures, not-found, and store failures.
pub fn extract_doc(
    ctx: &ExtractionContext,
    store: &dyn DocumentStore,
    kind: DocumentKind,
) -> EdgeResult<Option<DocumentView>> {
    let Some(id) = resolve_document_id(Some(ctx.path()), kind.as_str())? else {
        return Ok(None);
    };
    resolve(store, &id, kind).map(Some)
}

/// Probes `kinds` in order and resolves the first one the path addresses.
///
/// # Errors
///
/// See [`extract_doc`]. Probing stops at the first error.
pub fn extract_first(
    ctx: &ExtractionContext,
    store: &dyn DocumentStore,
    kinds: &[DocumentKind],
) -> EdgeResult<Option<DocumentView>> {
    for &kind in kinds {
        if let Some(view) = extract_doc(ctx, store, kind)? {
            return Ok(Some(view));
        }
    }
    Ok(None)
}

/// Resolves the tender addressed by the request path.
///
/// # Errors
///
/// See [`extract_doc`].
pub fn extract_tender(ctx: &ExtractionContext, store: &dyn DocumentStore) -> EdgeResult<Option<DocumentView>> {
    extract_doc(ctx, store, DocumentKind::Tender)
}

/// Resolves the auction addressed by the request path.
///
/// # Errors
///
/// See [`extract_doc`].
pub fn extract_auction(ctx: &ExtractionContext, store: &dyn DocumentStore) -> EdgeResult<Option<DocumentView>> {
    extract_doc(ctx, store, DocumentKind::Auction)
}

/// Resolves the contract addressed by the request path.
///
/// # Errors
///
/// See [`extract_doc`].
pub fn extract_contract(ctx: &ExtractionContext, store: &dyn DocumentStore) -> EdgeResult<Option<DocumentView>> {
    extract_doc(ctx, store, DocumentKind::Contract)
}

/// Resolves the plan addressed by the request path.
///
/// # Errors
///
/// See [`extract_doc`].
pub fn extract_plan(ctx: &ExtractionContext, store: &dyn DocumentStore) -> EdgeResult<Option<DocumentView>> {
    extract_doc(ctx, store, DocumentKind::Plan)
}
