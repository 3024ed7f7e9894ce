//! Filter evaluation
//!
//! Evaluates a filter expression tree against a single candidate record by
//! structural recursion. Strict semantics throughout:
//! - Missing or null field values never match any operator except
//!   `IsNull(true)`
//! - Equality is exact, no type coercion
//! - String operators are case-sensitive
//! - Ordering operators compare only same-typed values
//!
//! Relation conditions delegate to the [`RelationResolver`]; resolver
//! errors propagate and abort the query.

use serde_json::Value;
use std::cmp::Ordering;

use crate::query::{FieldOp, Filter};
use crate::source::{Record, RecordSource};

use super::errors::ExecutorResult;
use super::relations::RelationResolver;

/// Evaluates filter trees against candidate records
pub struct FilterEvaluator;

impl FilterEvaluator {
    /// Returns true if the record matches the filter.
    ///
    /// `collection` names the collection the record belongs to; relation
    /// conditions are resolved against its schema entry.
    ///
    /// # Errors
    ///
    /// Propagates relation fetch failures from the resolver.
    pub fn matches<S: RecordSource>(
        collection: &str,
        record: &Record,
        filter: &Filter,
        resolver: &mut RelationResolver<'_, S>,
    ) -> ExecutorResult<bool> {
        match filter {
            Filter::Field { field, op } => Ok(Self::matches_field(record.get(field), op)),
            // Vacuously true for an empty member list
            Filter::And(members) => {
                for member in members {
                    if !Self::matches(collection, record, member, resolver)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            // Vacuously false for an empty member list
            Filter::Or(members) => {
                for member in members {
                    if Self::matches(collection, record, member, resolver)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            // True iff no member matches: Not[A, B] == !A && !B
            Filter::Not(members) => {
                for member in members {
                    if Self::matches(collection, record, member, resolver)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Filter::Relation { field, op, filter } => {
                resolver.matches_relation(collection, record, field, *op, filter)
            }
        }
    }

    /// Checks a scalar field value against a single operator
    fn matches_field(value: Option<&Value>, op: &FieldOp) -> bool {
        // Null and missing are indistinguishable to every operator
        let present = value.filter(|v| !v.is_null());

        match op {
            FieldOp::IsNull(expect_null) => present.is_none() == *expect_null,
            FieldOp::Equals(expected) => present.map_or(false, |v| v == expected),
            FieldOp::NotEquals(expected) => present.map_or(false, |v| v != expected),
            FieldOp::Contains(needle) => present
                .and_then(Value::as_str)
                .map_or(false, |s| s.contains(needle.as_str())),
            FieldOp::StartsWith(prefix) => present
                .and_then(Value::as_str)
                .map_or(false, |s| s.starts_with(prefix.as_str())),
            FieldOp::EndsWith(suffix) => present
                .and_then(Value::as_str)
                .map_or(false, |s| s.ends_with(suffix.as_str())),
            FieldOp::Gt(bound) => Self::ordering_match(present, bound, &[Ordering::Greater]),
            FieldOp::Gte(bound) => {
                Self::ordering_match(present, bound, &[Ordering::Greater, Ordering::Equal])
            }
            FieldOp::Lt(bound) => Self::ordering_match(present, bound, &[Ordering::Less]),
            FieldOp::Lte(bound) => {
                Self::ordering_match(present, bound, &[Ordering::Less, Ordering::Equal])
            }
            FieldOp::In(values) => present.map_or(false, |v| values.contains(v)),
        }
    }

    /// Applies an ordering operator; non-comparable pairs never match
    fn ordering_match(value: Option<&Value>, bound: &Value, accept: &[Ordering]) -> bool {
        value
            .and_then(|v| Self::partial_compare(v, bound))
            .map_or(false, |ordering| accept.contains(&ordering))
    }

    /// Same-type comparison; cross-type pairs are not comparable.
    ///
    /// Integer pairs compare exactly; mixed numeric pairs fall back to f64.
    fn partial_compare(value: &Value, bound: &Value) -> Option<Ordering> {
        match (value, bound) {
            (Value::Number(a), Value::Number(b)) => {
                if let (Some(a_i), Some(b_i)) = (a.as_i64(), b.as_i64()) {
                    return Some(a_i.cmp(&b_i));
                }
                let (a_f, b_f) = (a.as_f64()?, b.as_f64()?);
                a_f.partial_cmp(&b_f)
            }
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}
