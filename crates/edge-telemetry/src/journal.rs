//! The request journal.
//!
//! A journal entry is a human-readable message plus a flat map of fields.
//! Request handling code never writes to a global logger; it is handed an
//! `Arc<dyn JournalSink>` and records entries through it.
//!
//! # Example
//!
//! ```
//! use edge_telemetry::journal::{JournalEntry, JournalLevel, JournalSink, MemoryJournal};
//!
//! let journal = MemoryJournal::new();
//! journal.record(
//!     JournalEntry::new(JournalLevel::Info, "Resolved tender")
//!         .with_field("MESSAGE_ID", "resolve")
//!         .with_field("JOURNAL_TENDERID", "UA-1"),
//! );
//!
//! assert_eq!(journal.by_message_id("resolve").len(), 1);
//! ```

use crate::logging::fields;
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Flat field map of a journal entry, in insertion order.
pub type JournalFields = IndexMap<String, Value>;

/// Severity of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalLevel {
    /// Diagnostic detail.
    Debug,
    /// Normal operation, including reported client errors.
    Info,
    /// Something unexpected that was handled.
    Warn,
    /// A failure that needs attention.
    Error,
}

impl fmt::Display for JournalLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// One structured journal record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Severity.
    pub level: JournalLevel,
    /// Human-readable message.
    pub message: String,
    /// Structured fields, including every `JOURNAL_*` context key.
    pub fields: JournalFields,
}

impl JournalEntry {
    /// Creates an entry with no fields.
    #[must_use]
    pub fn new(level: JournalLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            fields: JournalFields::new(),
        }
    }

    /// Creates an entry carrying an existing field map.
    #[must_use]
    pub fn with_fields(level: JournalLevel, message: impl Into<String>, fields: JournalFields) -> Self {
        Self {
            level,
            message: message.into(),
            fields,
        }
    }

    /// Adds one field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Returns the `MESSAGE_ID` field, if it is a string.
    #[must_use]
    pub fn message_id(&self) -> Option<&str> {
        self.field_str(fields::MESSAGE_ID)
    }

    /// Returns a string field.
    #[must_use]
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

/// Destination for journal entries.
pub trait JournalSink: Send + Sync + fmt::Debug {
    /// Records one entry. Sinks must not fail the request.
    fn record(&self, entry: JournalEntry);
}

/// Journal sink that emits `tracing` events.
///
/// The entry's fields are attached as one JSON-encoded `journal` field so
/// the JSON formatter keeps them together.
#[derive(Debug, Clone, Default)]
pub struct TracingJournal;

impl TracingJournal {
    /// Creates a tracing-backed journal.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl JournalSink for TracingJournal {
    fn record(&self, entry: JournalEntry) {
        let message_id = entry.message_id().unwrap_or_default().to_string();
        let journal = serde_json::to_string(&entry.fields).unwrap_or_default();
        let message = entry.message;

        match entry.level {
            JournalLevel::Debug => {
                tracing::debug!(target: "edge::journal", message_id = %message_id, journal = %journal, "{message}");
            }
            JournalLevel::Info => {
                tracing::info!(target: "edge::journal", message_id = %message_id, journal = %journal, "{message}");
            }
            JournalLevel::Warn => {
                tracing::warn!(target: "edge::journal", message_id = %message_id, journal = %journal, "{message}");
            }
            JournalLevel::Error => {
                tracing::error!(target: "edge::journal", message_id = %message_id, journal = %journal, "{message}");
            }
        }
    }
}

/// Journal sink that keeps entries in memory.
#[derive(Debug, Default)]
pub struct MemoryJournal {
    entries: Mutex<Vec<JournalEntry>>,
}

impl MemoryJournal {
    /// Creates an empty journal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every recorded entry.
    #[must_use]
    pub fn entries(&self) -> Vec<JournalEntry> {
        self.entries.lock().clone()
    }

    /// Returns the entries whose `MESSAGE_ID` equals `message_id`.
    #[must_use]
    pub fn by_message_id(&self, message_id: &str) -> Vec<JournalEntry> {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.message_id() == Some(message_id))
            .cloned()
            .collect()
    }

    /// Returns the number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Removes and returns every entry.
    pub fn take(&self) -> Vec<JournalEntry> {
        std::mem::take(&mut *self.entries.lock())
    }
}

impl JournalSink for MemoryJournal {
    fn record(&self, entry: JournalEntry) {
        self.entries.lock().push(entry);
    }
}
