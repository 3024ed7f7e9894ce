//! Result types for query execution

use std::collections::BTreeMap;

use crate::source::Record;

/// Related records attached to a found record through an include
#[derive(Debug, Clone, PartialEq)]
pub enum Included {
    /// To-one relation: the related record, if any
    One(Option<Record>),
    /// To-many relation: the related records after the include's own
    /// order and distinct specs
    Many(Vec<Record>),
}

/// The selected record plus its resolved includes
#[derive(Debug, Clone, PartialEq)]
pub struct FoundRecord {
    /// The primary record
    pub record: Record,
    /// Resolved relation sub-queries, keyed by relation name
    pub included: BTreeMap<String, Included>,
}

impl FoundRecord {
    /// Creates a result with no includes resolved
    pub fn new(record: Record) -> Self {
        Self {
            record,
            included: BTreeMap::new(),
        }
    }

    /// Returns the primary record's id
    pub fn id(&self) -> &str {
        self.record.id()
    }

    /// Returns a field value of the primary record
    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.record.get(field)
    }

    /// Returns an included to-many sub-list, or None if the relation was
    /// not included or is to-one
    pub fn included_many(&self, relation: &str) -> Option<&[Record]> {
        match self.included.get(relation) {
            Some(Included::Many(records)) => Some(records),
            _ => None,
        }
    }

    /// Returns an included to-one record, or None if the relation was not
    /// included, is to-many, or holds no record
    pub fn included_one(&self, relation: &str) -> Option<&Record> {
        match self.included.get(relation) {
            Some(Included::One(record)) => record.as_ref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accessors() {
        let mut found = FoundRecord::new(Record::new("user_1", json!({"name": "Robert"})));
        found.included.insert(
            "posts".to_string(),
            Included::Many(vec![Record::new("post_1", json!({"title": "A"}))]),
        );
        found
            .included
            .insert("profile".to_string(), Included::One(None));

        assert_eq!(found.id(), "user_1");
        assert_eq!(found.get("name"), Some(&json!("Robert")));
        assert_eq!(found.included_many("posts").unwrap().len(), 1);
        assert!(found.included_one("profile").is_none());
        assert!(found.included_many("missing").is_none());
    }
}
