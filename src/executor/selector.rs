//! Result ordering and distinct deduplication
//!
//! Sorting is stable and deterministic: keys apply lexicographically, and
//! records that compare equal on every key keep their retrieval order.
//! Distinct scans the sorted sequence and keeps the first record per
//! projection-key tuple, which makes it order-dependent by design.

use serde_json::Value;
use std::cmp::Ordering;

use crate::query::{SortDirection, SortKey};
use crate::source::Record;

/// Sorts and deduplicates result records
pub struct RecordSelector;

impl RecordSelector {
    /// Sorts records by the given keys.
    ///
    /// An empty key list leaves the retrieval order untouched. The sort is
    /// stable, so the retrieval order is the final tie-break.
    pub fn sort(records: &mut [Record], order: &[SortKey]) {
        if order.is_empty() {
            return;
        }
        records.sort_by(|a, b| {
            for key in order {
                let ordering = Self::compare_values(a.get(&key.field), b.get(&key.field));
                let ordering = match key.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
    }

    /// Keeps the first record seen for each distinct projection-key tuple,
    /// dropping later duplicates.
    ///
    /// Must run after `sort`: which member of a duplicate group survives is
    /// decided entirely by the incoming order.
    pub fn distinct(records: Vec<Record>, fields: &[String]) -> Vec<Record> {
        let mut seen: Vec<Vec<Value>> = Vec::new();
        records
            .into_iter()
            .filter(|record| {
                let key: Vec<Value> = fields
                    .iter()
                    .map(|field| record.get(field).cloned().unwrap_or(Value::Null))
                    .collect();
                if seen.contains(&key) {
                    false
                } else {
                    seen.push(key);
                    true
                }
            })
            .collect()
    }

    /// Compares two field values for sorting.
    ///
    /// Ordering rules:
    /// - missing < present
    /// - type rank: null < bool < number < string < array < object
    /// - natural ordering within a type
    pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a_val), Some(b_val)) => {
                let rank = |v: &Value| -> u8 {
                    match v {
                        Value::Null => 0,
                        Value::Bool(_) => 1,
                        Value::Number(_) => 2,
                        Value::String(_) => 3,
                        Value::Array(_) => 4,
                        Value::Object(_) => 5,
                    }
                };

                let (a_rank, b_rank) = (rank(a_val), rank(b_val));
                if a_rank != b_rank {
                    return a_rank.cmp(&b_rank);
                }

                match (a_val, b_val) {
                    (Value::Bool(a_b), Value::Bool(b_b)) => a_b.cmp(b_b),
                    (Value::Number(a_n), Value::Number(b_n)) => {
                        if let (Some(a_i), Some(b_i)) = (a_n.as_i64(), b_n.as_i64()) {
                            return a_i.cmp(&b_i);
                        }
                        let a_f = a_n.as_f64().unwrap_or(0.0);
                        let b_f = b_n.as_f64().unwrap_or(0.0);
                        a_f.partial_cmp(&b_f).unwrap_or(Ordering::Equal)
                    }
                    (Value::String(a_s), Value::String(b_s)) => a_s.cmp(b_s),
                    // Arrays and objects are not scalar sort keys
                    _ => Ordering::Equal,
                }
            }
        }
    }
}
