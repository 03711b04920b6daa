//! Sample documents for tests and local development.
//!
//! # Example
//!
//! ```
//! use edge_core::{fixtures, DocumentStore};
//!
//! let store = fixtures::sample_store();
//! assert!(store.get("XYZ").unwrap().is_some());
//! ```

use crate::document::Document;
use crate::store::InMemoryStore;
use serde_json::json;

/// A tender in the tendering period, stored under `abc123`.
#[must_use]
pub fn tender() -> Document {
    doc(json!({
        "_id": "abc123",
        "_rev": "3-7d1c2f",
        "__parent__": "tenders",
        "doc_type": "Tender",
        "tenderID": "UA-2024-03-01-000001-a",
        "status": "active.tendering",
        "title": "Road maintenance",
        "value": {"amount": 150_000, "currency": "UAH"}
    }))
}

/// A finished auction, stored under `auc42`.
#[must_use]
pub fn auction() -> Document {
    doc(json!({
        "_id": "auc42",
        "_rev": "7-a1b2c3",
        "doc_type": "Auction",
        "auctionID": "UA-EA-2024-03-01-000042",
        "status": "complete"
    }))
}

/// An active contract, stored under `c-001`.
#[must_use]
pub fn contract() -> Document {
    doc(json!({
        "_id": "c-001",
        "_rev": "1-ffee00",
        "doc_type": "Contract",
        "contractID": "UA-2024-03-01-000001-a-c1",
        "status": "active"
    }))
}

/// A scheduled plan, stored under `XYZ`.
#[must_use]
pub fn plan() -> Document {
    doc(json!({
        "_id": "XYZ",
        "_rev": "1-a",
        "doc_type": "Plan",
        "planID": "UA-P-2024-01-01-000001",
        "status": "scheduled"
    }))
}

/// A store holding all four sample documents under their `_id`s.
#[must_use]
pub fn sample_store() -> InMemoryStore {
    let store = InMemoryStore::new();
    for document in [tender(), auction(), contract(), plan()] {
        if let Some(id) = document.get_string("_id") {
            store.insert(id, document);
        }
    }
    store
}

fn doc(value: serde_json::Value) -> Document {
    Document::from_value(value).unwrap_or_default()
}
