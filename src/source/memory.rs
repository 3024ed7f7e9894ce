//! In-memory record source
//!
//! Insertion-ordered collections backing the engine in tests and embedded
//! use. Retrieval order is insertion order, which makes queries without an
//! explicit sort deterministic and reproducible.

use chrono::Utc;
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::query::{Filter, Include};
use crate::schema::RelationDef;

use super::errors::{SourceError, SourceResult};
use super::record::Record;
use super::RecordSource;

/// Insertion-ordered in-memory collections
#[derive(Debug, Default)]
pub struct MemorySource {
    collections: BTreeMap<String, Vec<Record>>,
}

impl MemorySource {
    /// Creates an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record body into a collection and returns the stored
    /// record.
    ///
    /// The body must be a JSON object. An `id` field is taken as the
    /// primary key when present, otherwise a UUID is assigned; a
    /// `created_at` field is stamped with the current RFC 3339 UTC instant
    /// when absent.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::InvalidRecord` if the body is not an object.
    pub fn insert(&mut self, collection: impl Into<String>, body: Value) -> SourceResult<Record> {
        let collection = collection.into();
        let mut body = body;
        let obj = body.as_object_mut().ok_or_else(|| SourceError::InvalidRecord {
            collection: collection.clone(),
            reason: "record body must be a JSON object".to_string(),
        })?;

        let id = match obj.get("id").and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => {
                let id = Uuid::new_v4().to_string();
                obj.insert("id".to_string(), Value::String(id.clone()));
                id
            }
        };
        if !obj.contains_key("created_at") {
            obj.insert(
                "created_at".to_string(),
                Value::String(Utc::now().to_rfc3339()),
            );
        }

        let record = Record::new(id, body);
        self.collections
            .entry(collection)
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    /// Returns the number of records in a collection
    pub fn len(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, Vec::len)
    }

    /// Returns true if the collection holds no records
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    /// Scans a target collection for records whose foreign key references
    /// the parent id, preserving insertion order
    fn related<'a>(
        &'a self,
        relation: &RelationDef,
        parent: &Record,
    ) -> impl Iterator<Item = &'a Record> {
        let parent_id = Value::String(parent.id.clone());
        let foreign_key = relation.foreign_key.clone();
        self.collections
            .get(&relation.target)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .filter(move |record| record.get(&foreign_key) == Some(&parent_id))
    }
}

impl RecordSource for MemorySource {
    // pushdown hints are ignored; candidates are always the full collection
    fn fetch_candidates(
        &self,
        collection: &str,
        _filter: &Filter,
        _includes: &[Include],
    ) -> SourceResult<Vec<Record>> {
        Ok(self
            .collections
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }

    fn fetch_related_one(
        &self,
        relation: &RelationDef,
        parent: &Record,
    ) -> SourceResult<Option<Record>> {
        Ok(self.related(relation, parent).next().cloned())
    }

    fn fetch_related_many(
        &self,
        relation: &RelationDef,
        parent: &Record,
    ) -> SourceResult<Vec<Record>> {
        Ok(self.related(relation, parent).cloned().collect())
    }
}
