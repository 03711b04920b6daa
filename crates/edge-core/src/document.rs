//! Stored documents and their typed read view.
//!
//! A [`Document`] is the raw record held by the store. Resolution hands out a
//! [`DocumentView`], which exposes the fields callers need without giving
//! them a way to mutate the record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Field holding the document kind discriminator.
pub const DOC_TYPE_FIELD: &str = "doc_type";
/// Store-assigned document id.
pub const ID_FIELD: &str = "_id";
/// Store-assigned revision.
pub const REV_FIELD: &str = "_rev";
/// Back-reference to the owning container.
pub const PARENT_FIELD: &str = "__parent__";
/// Lifecycle status field.
pub const STATUS_FIELD: &str = "status";

/// Internal fields stripped by [`clean_up`] unless told otherwise.
pub const SERVICE_FIELDS: [&str; 4] = [PARENT_FIELD, REV_FIELD, ID_FIELD, DOC_TYPE_FIELD];

/// The kinds of document served by the edge API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    /// A tender.
    Tender,
    /// An auction.
    Auction,
    /// A contract.
    Contract,
    /// A procurement plan.
    Plan,
}

impl DocumentKind {
    /// Every kind, in probing order.
    pub const ALL: [DocumentKind; 4] = [Self::Tender, Self::Auction, Self::Contract, Self::Plan];

    /// Returns the kind name as stored in `doc_type`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Tender => "Tender",
            Self::Auction => "Auction",
            Self::Contract => "Contract",
            Self::Plan => "Plan",
        }
    }

    /// Returns the URL segment addressing this kind (e.g. `tenders`).
    #[must_use]
    pub fn path_segment(&self) -> String {
        format!("{}s", self.as_str().to_lowercase())
    }

    /// Returns the public identifier field (e.g. `tenderID`).
    #[must_use]
    pub fn public_id_field(&self) -> String {
        format!("{}ID", self.as_str().to_lowercase())
    }

    /// Returns the logging-context key prefix (e.g. `TENDER`).
    #[must_use]
    pub fn context_prefix(&self) -> String {
        self.as_str().to_uppercase()
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown kind name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown document kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for DocumentKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// A raw record as returned by the document store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    /// Wraps a JSON object.
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Builds a document from a JSON value. Returns `None` unless the value
    /// is an object.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    /// Returns the raw value of a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Returns a field rendered as a string: strings verbatim, `null` and
    /// absent fields as `None`, anything else as compact JSON.
    #[must_use]
    pub fn get_string(&self, field: &str) -> Option<String> {
        match self.0.get(field)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Returns the `doc_type` discriminator, if it is a string.
    #[must_use]
    pub fn doc_type(&self) -> Option<&str> {
        self.0.get(DOC_TYPE_FIELD).and_then(Value::as_str)
    }

    /// Returns `true` if the field is present.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Returns the underlying JSON object.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consumes the document and returns the JSON object.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Document {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Returns a copy of `document` without `fields`.
///
/// Fields that are already absent are skipped, so the operation is
/// idempotent.
///
/// # Example
///
/// ```
/// use edge_core::document::{clean_up, Document, SERVICE_FIELDS};
///
/// let doc = Document::from_value(serde_json::json!({
///     "_id": "XYZ", "doc_type": "Plan", "status": "active"
/// })).unwrap();
///
/// let cleaned = clean_up(&doc, &SERVICE_FIELDS);
/// assert_eq!(serde_json::to_value(&cleaned).unwrap(), serde_json::json!({"status": "active"}));
/// assert_eq!(clean_up(&cleaned, &SERVICE_FIELDS), cleaned);
/// ```
#[must_use]
pub fn clean_up<S: AsRef<str>>(document: &Document, fields: &[S]) -> Document {
    let mut map = document.0.clone();
    for field in fields {
        map.remove(field.as_ref());
    }
    Document(map)
}

/// Read-only view of a document resolved for a specific kind.
///
/// Built once per fetch. Lookups never touch the store again and never
/// modify the record.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentView {
    id: String,
    kind: Option<DocumentKind>,
    doc_type: String,
    document: Document,
}

impl DocumentView {
    /// Creates a view over a fetched record.
    ///
    /// `id` is the id the record was fetched by; `_id` wins when present.
    #[must_use]
    pub fn new(id: impl Into<String>, document: Document) -> Self {
        let id = document.get_string(ID_FIELD).unwrap_or_else(|| id.into());
        let doc_type = document.doc_type().unwrap_or_default().to_string();
        Self {
            id,
            kind: doc_type.parse().ok(),
            doc_type,
            document,
        }
    }

    /// Returns the document id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the `doc_type` discriminator.
    #[must_use]
    pub fn doc_type(&self) -> &str {
        &self.doc_type
    }

    /// Returns the kind, if `doc_type` names a recognized kind.
    #[must_use]
    pub fn kind(&self) -> Option<DocumentKind> {
        self.kind
    }

    /// Returns the store revision.
    #[must_use]
    pub fn rev(&self) -> Option<String> {
        self.document.get_string(REV_FIELD)
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub fn status(&self) -> Option<String> {
        self.document.get_string(STATUS_FIELD)
    }

    /// Returns the kind's public identifier (e.g. `tenderID`).
    #[must_use]
    pub fn public_id(&self) -> Option<String> {
        self.kind
            .and_then(|kind| self.document.get_string(&kind.public_id_field()))
    }

    /// Looks up any field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.document.get(field)
    }

    /// Returns the underlying record.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Returns a copy of the record without `fields`.
    #[must_use]
    pub fn clean_up<S: AsRef<str>>(&self, fields: &[S]) -> Document {
        clean_up(&self.document, fields)
    }

    /// Returns a copy of the record without the internal service fields.
    #[must_use]
    pub fn cleaned(&self) -> Document {
        self.clean_up(&SERVICE_FIELDS)
    }

    /// Returns the logging fields derived from this document:
    /// `<KIND>_REV`, `<KIND>ID` and `<KIND>_STATUS`.
    ///
    /// Empty for documents of an unrecognized kind. Missing values are
    /// logged as empty strings.
    #[must_use]
    pub fn logging_fields(&self) -> Vec<(String, String)> {
        let Some(kind) = self.kind else {
            return Vec::new();
        };
        let prefix = kind.context_prefix();
        vec![
            (format!("{prefix}_REV"), self.rev().unwrap_or_default()),
            (format!("{prefix}ID"), self.public_id().unwrap_or_default()),
            (format!("{prefix}_STATUS"), self.status().unwrap_or_default()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tender() -> Document {
        Document::from_value(json!({
            "_id": "abc123",
            "_rev": "3-deadbeef",
            "__parent__": "tenders",
            "doc_type": "Tender",
            "tenderID": "UA-2024-01-01-000001",
            "status": "active.tendering",
            "value": {"amount": 500}
        }))
        .unwrap()
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(DocumentKind::Tender.path_segment(), "tenders");
        assert_eq!(DocumentKind::Plan.public_id_field(), "planID");
        assert_eq!(DocumentKind::Contract.context_prefix(), "CONTRACT");
        assert_eq!("Auction".parse::<DocumentKind>(), Ok(DocumentKind::Auction));
        assert!("tender".parse::<DocumentKind>().is_err());
    }

    #[test]
    fn test_view_accessors() {
        let view = DocumentView::new("ignored", tender());
        assert_eq!(view.id(), "abc123");
        assert_eq!(view.kind(), Some(DocumentKind::Tender));
        assert_eq!(view.rev().as_deref(), Some("3-deadbeef"));
        assert_eq!(view.public_id().as_deref(), Some("UA-2024-01-01-000001"));
        assert_eq!(view.status().as_deref(), Some("active.tendering"));
        assert_eq!(view.get("value"), Some(&json!({"amount": 500})));
    }

    #[test]
    fn test_view_falls_back_to_fetch_id() {
        let doc = Document::from_value(json!({"doc_type": "Plan"})).unwrap();
        let view = DocumentView::new("XYZ", doc);
        assert_eq!(view.id(), "XYZ");
    }

    #[test]
    fn test_logging_fields() {
        let view = DocumentView::new("abc123", tender());
        assert_eq!(
            view.logging_fields(),
            vec![
                ("TENDER_REV".to_string(), "3-deadbeef".to_string()),
                ("TENDERID".to_string(), "UA-2024-01-01-000001".to_string()),
                ("TENDER_STATUS".to_string(), "active.tendering".to_string()),
            ]
        );
    }

    #[test]
    fn test_logging_fields_unknown_kind() {
        let doc = Document::from_value(json!({"doc_type": "Lot"})).unwrap();
        assert!(DocumentView::new("x", doc).logging_fields().is_empty());
    }

    #[test]
    fn test_clean_up_is_idempotent() {
        let once = clean_up(&tender(), &SERVICE_FIELDS);
        let twice = clean_up(&once, &SERVICE_FIELDS);
        assert_eq!(once, twice);
        assert!(!once.contains("_id"));
        assert!(!once.contains("__parent__"));
        assert!(once.contains("tenderID"));
    }

    #[test]
    fn test_clean_up_custom_fields_leaves_source_untouched() {
        let doc = tender();
        let cleaned = clean_up(&doc, &["value"]);
        assert!(!cleaned.contains("value"));
        assert!(doc.contains("value"));
    }

    #[test]
    fn test_get_string_renders_non_strings() {
        let doc = Document::from_value(json!({"n": 5, "z": null})).unwrap();
        assert_eq!(doc.get_string("n").as_deref(), Some("5"));
        assert_eq!(doc.get_string("z"), None);
        assert_eq!(doc.get_string("missing"), None);
    }
}
