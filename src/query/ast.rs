//! Query AST structures
//!
//! Defines the filter expression tree, sort and distinct specifications,
//! and the `Query` value consumed by the executor. Filters are a recursive
//! tagged union evaluated by structural recursion; the implicit top-level
//! conjunction of a query is materialized as one `Filter::And` list at
//! build time, so the evaluator never special-cases it.

use serde_json::Value;

/// Scalar field operation types
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOp {
    /// Exact equality: field = value (no coercion)
    Equals(Value),
    /// Exact inequality: field != value
    NotEquals(Value),
    /// Case-sensitive substring match (textual fields only)
    Contains(String),
    /// Case-sensitive prefix match (textual fields only)
    StartsWith(String),
    /// Case-sensitive suffix match (textual fields only)
    EndsWith(String),
    /// Greater than: field > value
    Gt(Value),
    /// Greater than or equal: field >= value
    Gte(Value),
    /// Less than: field < value
    Lt(Value),
    /// Less than or equal: field <= value
    Lte(Value),
    /// Membership: field equals one of the listed values
    In(Vec<Value>),
    /// Null check: `IsNull(true)` matches missing-or-null,
    /// `IsNull(false)` matches present-and-non-null
    IsNull(bool),
}

impl FieldOp {
    /// Returns the operation name for error messages
    pub fn op_name(&self) -> &'static str {
        match self {
            FieldOp::Equals(_) => "equals",
            FieldOp::NotEquals(_) => "not_equals",
            FieldOp::Contains(_) => "contains",
            FieldOp::StartsWith(_) => "startswith",
            FieldOp::EndsWith(_) => "endswith",
            FieldOp::Gt(_) => "gt",
            FieldOp::Gte(_) => "gte",
            FieldOp::Lt(_) => "lt",
            FieldOp::Lte(_) => "lte",
            FieldOp::In(_) => "in",
            FieldOp::IsNull(_) => "is_null",
        }
    }

    /// Returns true if this operator requires a textual field
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            FieldOp::Contains(_) | FieldOp::StartsWith(_) | FieldOp::EndsWith(_)
        )
    }

    /// Returns true if this is an ordering comparison
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            FieldOp::Gt(_) | FieldOp::Gte(_) | FieldOp::Lt(_) | FieldOp::Lte(_)
        )
    }
}

/// Relation operation types
///
/// `Is`/`IsNot` apply to to-one relations, the quantifiers
/// `Every`/`Some`/`None` to to-many relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationOp {
    /// Related record exists and matches
    Is,
    /// Related record is absent, or present and non-matching
    IsNot,
    /// All related records match (vacuously true for zero records)
    Every,
    /// At least one related record matches
    Some,
    /// No related record matches (vacuously true for zero records)
    None,
}

impl RelationOp {
    /// Returns the operation name for error messages
    pub fn op_name(&self) -> &'static str {
        match self {
            RelationOp::Is => "is",
            RelationOp::IsNot => "is_not",
            RelationOp::Every => "every",
            RelationOp::Some => "some",
            RelationOp::None => "none",
        }
    }

    /// Returns true if this is a to-many quantifier
    pub fn is_quantifier(&self) -> bool {
        matches!(self, RelationOp::Every | RelationOp::Some | RelationOp::None)
    }
}

/// A filter expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Scalar condition on a single field
    Field {
        /// Field name
        field: String,
        /// Operation
        op: FieldOp,
    },
    /// Conjunction: true iff every member matches (vacuously true)
    And(Vec<Filter>),
    /// Disjunction: true iff at least one member matches (vacuously false)
    Or(Vec<Filter>),
    /// Negated list: true iff no member matches.
    /// `Not[A, B]` matches a record iff it matches neither A nor B.
    Not(Vec<Filter>),
    /// Condition over a related record or record set
    Relation {
        /// Relation field name
        field: String,
        /// Relation operation
        op: RelationOp,
        /// Filter applied to related records
        filter: Box<Filter>,
    },
}

impl Filter {
    /// Create an equality condition
    pub fn eq(field: impl Into<String>, value: Value) -> Self {
        Filter::Field {
            field: field.into(),
            op: FieldOp::Equals(value),
        }
    }

    /// Create an inequality condition
    pub fn ne(field: impl Into<String>, value: Value) -> Self {
        Filter::Field {
            field: field.into(),
            op: FieldOp::NotEquals(value),
        }
    }

    /// Create a substring condition
    pub fn contains(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Filter::Field {
            field: field.into(),
            op: FieldOp::Contains(needle.into()),
        }
    }

    /// Create a prefix condition
    pub fn starts_with(field: impl Into<String>, prefix: impl Into<String>) -> Self {
        Filter::Field {
            field: field.into(),
            op: FieldOp::StartsWith(prefix.into()),
        }
    }

    /// Create a suffix condition
    pub fn ends_with(field: impl Into<String>, suffix: impl Into<String>) -> Self {
        Filter::Field {
            field: field.into(),
            op: FieldOp::EndsWith(suffix.into()),
        }
    }

    /// Create a greater-than condition
    pub fn gt(field: impl Into<String>, value: Value) -> Self {
        Filter::Field {
            field: field.into(),
            op: FieldOp::Gt(value),
        }
    }

    /// Create a greater-than-or-equal condition
    pub fn gte(field: impl Into<String>, value: Value) -> Self {
        Filter::Field {
            field: field.into(),
            op: FieldOp::Gte(value),
        }
    }

    /// Create a less-than condition
    pub fn lt(field: impl Into<String>, value: Value) -> Self {
        Filter::Field {
            field: field.into(),
            op: FieldOp::Lt(value),
        }
    }

    /// Create a less-than-or-equal condition
    pub fn lte(field: impl Into<String>, value: Value) -> Self {
        Filter::Field {
            field: field.into(),
            op: FieldOp::Lte(value),
        }
    }

    /// Create a membership condition
    pub fn in_list(field: impl Into<String>, values: Vec<Value>) -> Self {
        Filter::Field {
            field: field.into(),
            op: FieldOp::In(values),
        }
    }

    /// Create a null-check condition
    pub fn is_null(field: impl Into<String>, expect_null: bool) -> Self {
        Filter::Field {
            field: field.into(),
            op: FieldOp::IsNull(expect_null),
        }
    }

    /// Create a conjunction
    pub fn and(members: Vec<Filter>) -> Self {
        Filter::And(members)
    }

    /// Create a disjunction
    pub fn or(members: Vec<Filter>) -> Self {
        Filter::Or(members)
    }

    /// Create a negated list
    pub fn not(members: Vec<Filter>) -> Self {
        Filter::Not(members)
    }

    /// Create a to-one `is` condition
    pub fn relation_is(field: impl Into<String>, filter: Filter) -> Self {
        Filter::Relation {
            field: field.into(),
            op: RelationOp::Is,
            filter: Box::new(filter),
        }
    }

    /// Create a to-one `is_not` condition
    pub fn relation_is_not(field: impl Into<String>, filter: Filter) -> Self {
        Filter::Relation {
            field: field.into(),
            op: RelationOp::IsNot,
            filter: Box::new(filter),
        }
    }

    /// Create a to-many `every` quantifier
    pub fn relation_every(field: impl Into<String>, filter: Filter) -> Self {
        Filter::Relation {
            field: field.into(),
            op: RelationOp::Every,
            filter: Box::new(filter),
        }
    }

    /// Create a to-many `some` quantifier
    pub fn relation_some(field: impl Into<String>, filter: Filter) -> Self {
        Filter::Relation {
            field: field.into(),
            op: RelationOp::Some,
            filter: Box::new(filter),
        }
    }

    /// Create a to-many `none` quantifier
    pub fn relation_none(field: impl Into<String>, filter: Filter) -> Self {
        Filter::Relation {
            field: field.into(),
            op: RelationOp::None,
            filter: Box::new(filter),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// A single sort key; queries order by a sequence of these,
/// lexicographically, first key deciding and ties broken by the next
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// Field to sort by
    pub field: String,
    /// Sort direction
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// A relation-scoped sub-query attached to the primary query.
///
/// Resolved after the primary record is selected; its order and distinct
/// specs apply independently to that record's related sub-list.
#[derive(Debug, Clone, PartialEq)]
pub struct Include {
    /// Relation field name
    pub relation: String,
    /// Sort keys for the related records
    pub order: Vec<SortKey>,
    /// Distinct projection fields for the related records
    pub distinct: Option<Vec<String>>,
}

impl Include {
    /// Include a relation with no ordering or distinct
    pub fn relation(name: impl Into<String>) -> Self {
        Self {
            relation: name.into(),
            order: Vec::new(),
            distinct: None,
        }
    }

    /// Append a sort key (builder style)
    #[must_use]
    pub fn order_by(mut self, key: SortKey) -> Self {
        self.order.push(key);
        self
    }

    /// Set the distinct projection fields (builder style)
    #[must_use]
    pub fn distinct<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.distinct = Some(fields.into_iter().map(Into::into).collect());
        self
    }
}

/// A complete query against one collection
///
/// Immutable once built; constructed per call and discarded after the
/// executor produces its result.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Target collection
    pub collection: String,
    /// Top-level filter; always a `Filter::And` list so that direct
    /// conditions and logical groups combine uniformly
    pub filter: Filter,
    /// Sort keys; empty means source retrieval order
    pub order: Vec<SortKey>,
    /// Distinct projection fields
    pub distinct: Option<Vec<String>>,
    /// Number of leading results to drop before selection
    pub skip: usize,
    /// Relation sub-queries resolved after primary selection
    pub includes: Vec<Include>,
}

impl Query {
    /// Creates a query matching every record of the collection
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            filter: Filter::And(Vec::new()),
            order: Vec::new(),
            distinct: None,
            skip: 0,
            includes: Vec::new(),
        }
    }

    /// Appends a condition to the top-level conjunction (builder style).
    ///
    /// Direct field conditions and logical groups (`And`/`Or`/`Not`) are
    /// merged into one `And` list, so
    /// `.filter(a).filter(Filter::and(vec![b]))` is equivalent to
    /// `.filter(Filter::and(vec![a, b]))`.
    #[must_use]
    pub fn filter(mut self, condition: Filter) -> Self {
        match &mut self.filter {
            Filter::And(members) => members.push(condition),
            other => {
                let prior = std::mem::replace(other, Filter::And(Vec::new()));
                *other = Filter::And(vec![prior, condition]);
            }
        }
        self
    }

    /// Appends a sort key (builder style)
    #[must_use]
    pub fn order_by(mut self, key: SortKey) -> Self {
        self.order.push(key);
        self
    }

    /// Sets the distinct projection fields (builder style)
    #[must_use]
    pub fn distinct<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.distinct = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the number of leading results to drop (builder style)
    #[must_use]
    pub fn skip(mut self, n: usize) -> Self {
        self.skip = n;
        self
    }

    /// Attaches a relation sub-query (builder style)
    #[must_use]
    pub fn include(mut self, include: Include) -> Self {
        self.includes.push(include);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_constructors() {
        let f = Filter::eq("published", json!(true));
        assert_eq!(
            f,
            Filter::Field {
                field: "published".to_string(),
                op: FieldOp::Equals(json!(true)),
            }
        );

        let f = Filter::contains("title", "Test");
        assert!(matches!(
            f,
            Filter::Field { op: FieldOp::Contains(ref s), .. } if s == "Test"
        ));
    }

    #[test]
    fn test_query_builder_merges_into_one_and() {
        // direct conditions mixed with logical groups land in one And list
        let q = Query::new("post")
            .filter(Filter::contains("title", "Test"))
            .filter(Filter::and(vec![Filter::eq("published", json!(true))]));

        match &q.filter {
            Filter::And(members) => assert_eq!(members.len(), 2),
            other => panic!("expected And, got {other:?}"),
        }
    }

    #[test]
    fn test_query_defaults() {
        let q = Query::new("post");
        assert_eq!(q.filter, Filter::And(Vec::new()));
        assert!(q.order.is_empty());
        assert!(q.distinct.is_none());
        assert_eq!(q.skip, 0);
        assert!(q.includes.is_empty());
    }

    #[test]
    fn test_op_names() {
        assert_eq!(FieldOp::Contains(String::new()).op_name(), "contains");
        assert_eq!(FieldOp::Gte(json!(1)).op_name(), "gte");
        assert_eq!(RelationOp::IsNot.op_name(), "is_not");
        assert!(RelationOp::Every.is_quantifier());
        assert!(!RelationOp::Is.is_quantifier());
    }
}
