//! Relation resolution
//!
//! Resolves relation-valued filter conditions by fetching related records
//! through the record source and evaluating the nested filter over them.
//! Read-only; fetches are cached per (record id, relation target, foreign
//! key) for the lifetime of one executor run, so evaluating many conditions
//! over the same relation hits the source once. The key carries the
//! relation's identity, not just its name: two collections may declare
//! same-named relations, and record ids are only unique per collection.

use std::collections::HashMap;

use crate::query::{Filter, QueryError, RelationOp};
use crate::schema::{RelationDef, Schema};
use crate::source::{Record, RecordSource};

use super::errors::ExecutorResult;
use super::filters::FilterEvaluator;

/// Cache key for one relation fetch: parent record id, relation target,
/// foreign key
type FetchKey = (String, String, String);

/// Resolves relation conditions for one executor run
pub struct RelationResolver<'a, S: RecordSource> {
    schema: &'a Schema,
    source: &'a S,
    one_cache: HashMap<FetchKey, Option<Record>>,
    many_cache: HashMap<FetchKey, Vec<Record>>,
}

fn fetch_key(relation: &RelationDef, parent: &Record) -> FetchKey {
    (
        parent.id.clone(),
        relation.target.clone(),
        relation.foreign_key.clone(),
    )
}

impl<'a, S: RecordSource> RelationResolver<'a, S> {
    /// Creates a resolver with an empty cache
    pub fn new(schema: &'a Schema, source: &'a S) -> Self {
        Self {
            schema,
            source,
            one_cache: HashMap::new(),
            many_cache: HashMap::new(),
        }
    }

    /// Evaluates a relation condition for one record.
    ///
    /// To-one semantics:
    /// - `Is`: related record exists and matches
    /// - `IsNot`: related record is absent, or present and non-matching
    ///
    /// To-many quantifiers:
    /// - `Every`: all related records match (vacuously true for zero)
    /// - `Some`: at least one related record matches
    /// - `None`: zero related records match (vacuously true for zero)
    pub fn matches_relation(
        &mut self,
        collection: &str,
        record: &Record,
        field: &str,
        op: RelationOp,
        nested: &Filter,
    ) -> ExecutorResult<bool> {
        let relation = self.relation_def(collection, field)?.clone();

        match op {
            RelationOp::Is => match self.fetch_one(&relation, record)? {
                Some(related) => {
                    FilterEvaluator::matches(&relation.target, &related, nested, self)
                }
                None => Ok(false),
            },
            RelationOp::IsNot => match self.fetch_one(&relation, record)? {
                Some(related) => Ok(!FilterEvaluator::matches(
                    &relation.target,
                    &related,
                    nested,
                    self,
                )?),
                None => Ok(true),
            },
            RelationOp::Every => {
                for related in self.fetch_many(&relation, record)? {
                    if !FilterEvaluator::matches(&relation.target, &related, nested, self)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            RelationOp::Some => {
                for related in self.fetch_many(&relation, record)? {
                    if FilterEvaluator::matches(&relation.target, &related, nested, self)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            RelationOp::None => {
                for related in self.fetch_many(&relation, record)? {
                    if FilterEvaluator::matches(&relation.target, &related, nested, self)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }

    /// Fetches the to-one related record, consulting the cache first
    pub fn fetch_one(
        &mut self,
        relation: &RelationDef,
        parent: &Record,
    ) -> ExecutorResult<Option<Record>> {
        let key = fetch_key(relation, parent);
        if let Some(hit) = self.one_cache.get(&key) {
            return Ok(hit.clone());
        }
        let fetched = self.source.fetch_related_one(relation, parent)?;
        self.one_cache.insert(key, fetched.clone());
        Ok(fetched)
    }

    /// Fetches the to-many related records, consulting the cache first
    pub fn fetch_many(
        &mut self,
        relation: &RelationDef,
        parent: &Record,
    ) -> ExecutorResult<Vec<Record>> {
        let key = fetch_key(relation, parent);
        if let Some(hit) = self.many_cache.get(&key) {
            return Ok(hit.clone());
        }
        let fetched = self.source.fetch_related_many(relation, parent)?;
        self.many_cache.insert(key, fetched.clone());
        Ok(fetched)
    }

    /// Looks up the relation definition; validation guarantees it exists,
    /// so a miss surfaces as an invalid-query error rather than a panic
    fn relation_def(&self, collection: &str, field: &str) -> ExecutorResult<&RelationDef> {
        let def = self
            .schema
            .collection(collection)
            .map_err(|_| QueryError::UnknownCollection(collection.to_string()))?;
        Ok(def
            .get_relation(field)
            .ok_or_else(|| QueryError::UnknownField {
                collection: collection.to_string(),
                field: field.to_string(),
            })?)
    }
}
