//! Event record type.

use serde::{Deserialize, Serialize};

/// One audit-log entry extracted from an archive.
///
/// The content is opaque: it is only ever serialized back to text for
/// delivery. Key order is preserved from the source document.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct EventRecord(serde_json::Value);

impl EventRecord {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Borrow the underlying JSON value.
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }

    /// Serialize the record to its compact JSON text.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }

    /// The `eventName` field, when the record carries one. Used for logging only.
    pub fn event_name(&self) -> Option<&str> {
        self.0.get("eventName").and_then(|v| v.as_str())
    }
}

impl From<serde_json::Value> for EventRecord {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}
