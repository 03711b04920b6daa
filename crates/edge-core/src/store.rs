//! The document store seam.
//!
//! The store is an external, synchronous key-value service. This crate only
//! needs `get(id)`; anything else about the backend is out of scope.

use crate::document::Document;
use crate::error::EdgeResult;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Read access to stored documents.
///
/// Implementations block the calling task for the duration of the fetch.
/// Backend failures are returned as [`EdgeError::Store`](crate::EdgeError::Store)
/// and are not retried by callers in this workspace.
pub trait DocumentStore: Send + Sync {
    /// Fetches a record by id. `Ok(None)` means the id is absent.
    fn get(&self, id: &str) -> EdgeResult<Option<Document>>;
}

/// Map-backed store for fixtures, tests and local development.
///
/// # Example
///
/// ```
/// use edge_core::{Document, DocumentStore, InMemoryStore};
///
/// let store = InMemoryStore::new();
/// store.insert("XYZ", Document::from_value(serde_json::json!({"doc_type": "Plan"})).unwrap());
///
/// assert!(store.get("XYZ").unwrap().is_some());
/// assert!(store.get("missing").unwrap().is_none());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    documents: RwLock<HashMap<String, Document>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a record.
    pub fn insert(&self, id: impl Into<String>, document: Document) {
        self.documents.write().insert(id.into(), document);
    }

    /// Removes a record, returning it if present.
    pub fn remove(&self, id: &str) -> Option<Document> {
        self.documents.write().remove(id)
    }

    /// Returns the number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    /// Returns `true` if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}

impl DocumentStore for InMemoryStore {
    fn get(&self, id: &str) -> EdgeResult<Option<Document>> {
        Ok(self.documents.read().get(id).cloned())
    }
}

impl<T: DocumentStore + ?Sized> DocumentStore for std::sync::Arc<T> {
    fn get(&self, id: &str) -> EdgeResult<Option<Document>> {
        (**self).get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EdgeError;
    use serde_json::json;
    use std::sync::Arc;

    struct FailingStore;

    impl DocumentStore for FailingStore {
        fn get(&self, _id: &str) -> EdgeResult<Option<Document>> {
            Err(EdgeError::store("backend unavailable"))
        }
    }

    #[test]
    fn test_insert_and_get() {
        let store = InMemoryStore::new();
        assert!(store.is_empty());

        let doc = Document::from_value(json!({"doc_type": "Tender"})).unwrap();
        store.insert("t1", doc.clone());

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("t1").unwrap(), Some(doc));
    }

    #[test]
    fn test_remove() {
        let store = InMemoryStore::new();
        store.insert("t1", Document::default());
        assert!(store.remove("t1").is_some());
        assert!(store.get("t1").unwrap().is_none());
    }

    #[test]
    fn test_arc_store_delegates() {
        let store: Arc<dyn DocumentStore> = Arc::new(FailingStore);
        assert!(matches!(store.get("x"), Err(EdgeError::Store { .. })));
    }
}
