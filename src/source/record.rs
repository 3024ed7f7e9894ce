//! Record type
//!
//! Records are immutable snapshots handed out by a record source. The
//! engine reads field values and never mutates them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single record: a primary id plus a JSON object body mapping field
/// names to scalar values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Primary key, immutable
    pub id: String,
    /// Field values as a JSON object
    pub body: Value,
}

impl Record {
    /// Creates a record from an id and a JSON object body
    pub fn new(id: impl Into<String>, body: Value) -> Self {
        Self {
            id: id.into(),
            body,
        }
    }

    /// Returns the record id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns a field value, or None if the field is absent
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.body.get(field)
    }
}
