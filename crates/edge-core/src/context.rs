//! Request-scoped context types.
//!
//! [`RequestId`] identifies a single request for correlation, and
//! [`LoggingContext`] accumulates the structured facts about that request
//! that every journal record carries.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix applied to every context key when it is copied into a journal record.
pub const JOURNAL_PREFIX: &str = "JOURNAL_";

/// A unique identifier for each request, using UUID v7.
///
/// UUID v7 is time-ordered, which makes it ideal for request tracking
/// and log correlation.
///
/// # Example
///
/// ```
/// use edge_core::RequestId;
///
/// let id = RequestId::new();
/// println!("Request ID: {}", id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID using UUID v7.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `RequestId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Structured facts about one in-flight request.
///
/// Keys are always stored upper-cased: every write goes through [`merge`] or
/// [`insert`], which upper-case the incoming key and overwrite any previous
/// value, so `foo` and `FOO` collapse to a single entry. Insertion order is
/// preserved so journal records read in the order facts were learned.
///
/// A context belongs to exactly one request and is dropped with it.
///
/// [`merge`]: LoggingContext::merge
/// [`insert`]: LoggingContext::insert
///
/// # Example
///
/// ```
/// use edge_core::LoggingContext;
///
/// let mut ctx = LoggingContext::new();
/// ctx.merge([("foo", "1")]);
/// ctx.merge([("FOO", "2")]);
///
/// assert_eq!(ctx.len(), 1);
/// assert_eq!(ctx.get("foo"), Some("2"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LoggingContext {
    entries: IndexMap<String, String>,
}

impl LoggingContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context seeded from the given entries.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut ctx = Self::new();
        ctx.merge(entries);
        ctx
    }

    /// Inserts one entry, upper-casing the key. Last write wins.
    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.entries
            .insert(key.as_ref().to_uppercase(), value.into());
    }

    /// Merges every entry of `extra`, upper-casing keys. Last write wins.
    pub fn merge<I, K, V>(&mut self, extra: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in extra {
            self.insert(key, value);
        }
    }

    /// Looks up a value; the key is matched case-insensitively.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key.to_uppercase().as_str())
            .map(String::as_str)
    }

    /// Returns `true` if the context holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over `(KEY, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the `JOURNAL_`-prefixed name for a context key.
    #[must_use]
    pub fn journal_key(key: &str) -> String {
        format!("{JOURNAL_PREFIX}{}", key.to_uppercase())
    }
}
