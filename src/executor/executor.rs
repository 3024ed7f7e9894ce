//! Query executor for siftdb
//!
//! Executes queries against a record source, producing deterministic
//! results.
//!
//! Execution flow (strict order):
//! 1. Validate the query against the schema (reject whole, before any fetch)
//! 2. Fetch candidate records from the source
//! 3. Filter candidates, re-validating every condition the source could not
//!    push down (relation quantifiers included)
//! 4. Apply sort (if specified; otherwise retrieval order stands)
//! 5. Apply distinct (if specified) over the sorted sequence
//! 6. Drop `skip` leading results and take the first remaining record
//! 7. Resolve includes for the selected record

use crate::observability::Logger;
use crate::query::{self, Query, QueryError};
use crate::schema::{RelationKind, Schema};
use crate::source::{Record, RecordSource};

use super::errors::{ExecutorError, ExecutorResult};
use super::filters::FilterEvaluator;
use super::relations::RelationResolver;
use super::result::{FoundRecord, Included};
use super::selector::RecordSelector;

/// Executes queries against a schema and a record source.
///
/// Each call runs an independent, stateless pipeline; executors hold no
/// mutable state and may be shared freely.
pub struct QueryExecutor<'a, S: RecordSource> {
    schema: &'a Schema,
    source: &'a S,
}

impl<'a, S: RecordSource> QueryExecutor<'a, S> {
    /// Creates a new executor
    pub fn new(schema: &'a Schema, source: &'a S) -> Self {
        Self { schema, source }
    }

    /// Returns the first record selected by the query pipeline, or None if
    /// the pipeline yields no record at the requested offset.
    ///
    /// # Errors
    ///
    /// Returns `ExecutorError::InvalidQuery` for malformed queries and
    /// `ExecutorError::Source` if any fetch fails; never raises for the
    /// not-found case.
    pub fn find_first(&self, query: &Query) -> ExecutorResult<Option<FoundRecord>> {
        // Step 1: reject malformed queries before touching the source
        query::validate(self.schema, query)?;

        let mut resolver = RelationResolver::new(self.schema, self.source);

        // Step 2: candidates arrive in the source's deterministic order;
        // the filter and includes are passed down as pushdown hints
        let candidates =
            self.source
                .fetch_candidates(&query.collection, &query.filter, &query.includes)?;
        let scanned = candidates.len();

        // Step 3: defensive re-evaluation of every condition
        let mut matched = Vec::new();
        for record in candidates {
            if FilterEvaluator::matches(&query.collection, &record, &query.filter, &mut resolver)?
            {
                matched.push(record);
            }
        }
        let matched_count = matched.len();

        // Steps 4-5: sort, then deduplicate in sorted order
        RecordSelector::sort(&mut matched, &query.order);
        let mut selected = match &query.distinct {
            Some(fields) => RecordSelector::distinct(matched, fields),
            None => matched,
        };

        // Step 6: skip, then first
        let found = if query.skip < selected.len() {
            Some(selected.remove(query.skip))
        } else {
            None
        };

        let scanned = scanned.to_string();
        let matched_count = matched_count.to_string();
        Logger::trace(
            "query.executed",
            &[
                ("collection", query.collection.as_str()),
                ("scanned", scanned.as_str()),
                ("matched", matched_count.as_str()),
                ("returned", if found.is_some() { "1" } else { "0" }),
            ],
        );

        // Step 7: includes only for the record actually returned
        match found {
            Some(record) => Ok(Some(self.resolve_includes(query, record, &mut resolver)?)),
            None => Ok(None),
        }
    }

    /// Returns the first record selected by the query pipeline.
    ///
    /// # Errors
    ///
    /// Returns `ExecutorError::RecordNotFound` when the pipeline yields no
    /// record at the requested offset; otherwise as [`Self::find_first`].
    pub fn find_first_or_raise(&self, query: &Query) -> ExecutorResult<FoundRecord> {
        match self.find_first(query)? {
            Some(found) => Ok(found),
            None => {
                Logger::warn(
                    "query.record_not_found",
                    &[("collection", query.collection.as_str())],
                );
                Err(ExecutorError::RecordNotFound {
                    collection: query.collection.clone(),
                })
            }
        }
    }

    /// Resolves the query's includes for the selected record, applying each
    /// include's own order and distinct specs to its sub-list
    fn resolve_includes(
        &self,
        query: &Query,
        record: Record,
        resolver: &mut RelationResolver<'a, S>,
    ) -> ExecutorResult<FoundRecord> {
        let mut found = FoundRecord::new(record);
        if query.includes.is_empty() {
            return Ok(found);
        }

        let def = self
            .schema
            .collection(&query.collection)
            .map_err(|_| QueryError::UnknownCollection(query.collection.clone()))?;

        for include in &query.includes {
            let relation = def.get_relation(&include.relation).ok_or_else(|| {
                QueryError::UnknownRelationInclude {
                    collection: query.collection.clone(),
                    field: include.relation.clone(),
                }
            })?;

            let included = match relation.kind {
                RelationKind::ToOne => {
                    Included::One(resolver.fetch_one(relation, &found.record)?)
                }
                RelationKind::ToMany => {
                    let mut related = resolver.fetch_many(relation, &found.record)?;
                    RecordSelector::sort(&mut related, &include.order);
                    let related = match &include.distinct {
                        Some(fields) => RecordSelector::distinct(related, fields),
                        None => related,
                    };
                    Included::Many(related)
                }
            };
            found.included.insert(include.relation.clone(), included);
        }

        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{FieldOp, Filter, Include, SortKey};
    use crate::schema::{CollectionDef, FieldDef, RelationDef};
    use crate::source::{MemorySource, SourceError, SourceResult};
    use serde_json::json;

    fn schema() -> Schema {
        let mut schema = Schema::new();
        schema
            .register(
                "post",
                CollectionDef::new()
                    .field("id", FieldDef::required_string())
                    .field("title", FieldDef::required_string())
                    .field("published", FieldDef::required_bool())
                    .field("views", FieldDef::optional_int())
                    .field("created_at", FieldDef::required_timestamp()),
            )
            .unwrap();
        schema
    }

    fn seeded_source() -> MemorySource {
        let mut source = MemorySource::new();
        for (title, published) in [
            ("Test post 1", false),
            ("Test post 2", false),
            ("Test post 3", true),
        ] {
            source
                .insert("post", json!({"title": title, "published": published}))
                .unwrap();
        }
        source
    }

    #[test]
    fn test_find_first_returns_none_when_nothing_matches() {
        let schema = schema();
        let source = seeded_source();
        let executor = QueryExecutor::new(&schema, &source);

        let query = Query::new("post").filter(Filter::contains("title", "not found"));
        assert_eq!(executor.find_first(&query).unwrap(), None);
    }

    #[test]
    fn test_find_first_or_raise_raises_when_skip_exhausts_results() {
        let schema = schema();
        let source = seeded_source();
        let executor = QueryExecutor::new(&schema, &source);

        let query = Query::new("post")
            .filter(Filter::eq("published", json!(true)))
            .order_by(SortKey::asc("title"))
            .skip(1);

        let err = executor.find_first_or_raise(&query).unwrap_err();
        assert!(matches!(
            err,
            ExecutorError::RecordNotFound { collection } if collection == "post"
        ));
    }

    #[test]
    fn test_invalid_query_rejected_before_fetching() {
        let schema = schema();
        let source = seeded_source();
        let executor = QueryExecutor::new(&schema, &source);

        let query = Query::new("post").filter(Filter::eq("missing", json!(1)));
        let err = executor.find_first(&query).unwrap_err();
        assert!(matches!(err, ExecutorError::InvalidQuery(_)));
    }

    /// Source whose fetches always fail
    struct FailingSource;

    impl RecordSource for FailingSource {
        fn fetch_candidates(
            &self,
            collection: &str,
            _filter: &Filter,
            _includes: &[Include],
        ) -> SourceResult<Vec<Record>> {
            Err(SourceError::fetch_failed(collection, "connection reset"))
        }

        fn fetch_related_one(
            &self,
            relation: &RelationDef,
            _parent: &Record,
        ) -> SourceResult<Option<Record>> {
            Err(SourceError::fetch_failed(&relation.target, "connection reset"))
        }

        fn fetch_related_many(
            &self,
            relation: &RelationDef,
            _parent: &Record,
        ) -> SourceResult<Vec<Record>> {
            Err(SourceError::fetch_failed(&relation.target, "connection reset"))
        }
    }

    /// Source that pushes down top-level equality conditions
    struct PrefilteringSource {
        inner: MemorySource,
    }

    impl RecordSource for PrefilteringSource {
        fn fetch_candidates(
            &self,
            collection: &str,
            filter: &Filter,
            includes: &[Include],
        ) -> SourceResult<Vec<Record>> {
            let mut candidates = self.inner.fetch_candidates(collection, filter, includes)?;
            if let Filter::And(members) = filter {
                for member in members {
                    if let Filter::Field {
                        field,
                        op: FieldOp::Equals(value),
                    } = member
                    {
                        candidates.retain(|record| record.get(field) == Some(value));
                    }
                }
            }
            Ok(candidates)
        }

        fn fetch_related_one(
            &self,
            relation: &RelationDef,
            parent: &Record,
        ) -> SourceResult<Option<Record>> {
            self.inner.fetch_related_one(relation, parent)
        }

        fn fetch_related_many(
            &self,
            relation: &RelationDef,
            parent: &Record,
        ) -> SourceResult<Vec<Record>> {
            self.inner.fetch_related_many(relation, parent)
        }
    }

    #[test]
    fn test_source_may_prefilter_using_the_pushed_down_filter() {
        let schema = schema();
        let source = PrefilteringSource {
            inner: seeded_source(),
        };
        let executor = QueryExecutor::new(&schema, &source);

        let query = Query::new("post")
            .filter(Filter::eq("published", json!(true)))
            .order_by(SortKey::asc("title"));
        let found = executor.find_first(&query).unwrap().unwrap();
        assert_eq!(found.get("title"), Some(&json!("Test post 3")));
    }

    #[test]
    fn test_fetch_failure_aborts_the_query() {
        let schema = schema();
        let source = FailingSource;
        let executor = QueryExecutor::new(&schema, &source);

        let err = executor.find_first(&Query::new("post")).unwrap_err();
        assert!(matches!(err, ExecutorError::Source(_)));
    }
}
