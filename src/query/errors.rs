//! Query validation error types
//!
//! All of these are detected eagerly, before any record is fetched. A query
//! that passes validation cannot fail mid-scan for structural reasons.

use thiserror::Error;

/// Result type for query validation
pub type ValidationResult<T> = Result<T, QueryError>;

/// Malformed query errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Target collection not registered in the schema
    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    /// Field referenced by a condition, sort key, or distinct spec is not
    /// declared on the collection
    #[error("Unknown field `{field}` on collection `{collection}`")]
    UnknownField {
        collection: String,
        field: String,
    },

    /// Scalar operator applied to a relation field
    #[error("Field `{field}` on collection `{collection}` is a relation; scalar operator `{op}` does not apply")]
    ScalarOpOnRelation {
        collection: String,
        field: String,
        op: &'static str,
    },

    /// Relation operator applied to a scalar field
    #[error("Field `{field}` on collection `{collection}` is not a relation; relation operator `{op}` does not apply")]
    RelationOpOnScalar {
        collection: String,
        field: String,
        op: &'static str,
    },

    /// Quantifier on a to-one relation, or is/is_not on a to-many relation
    #[error("Relation operator `{op}` does not apply to {kind} relation `{field}` on collection `{collection}`")]
    RelationCardinalityMismatch {
        collection: String,
        field: String,
        op: &'static str,
        kind: &'static str,
    },

    /// Operator not valid for the field's declared type
    #[error("Operator `{op}` does not apply to field `{field}` of type {field_type} on collection `{collection}`")]
    OperatorTypeMismatch {
        collection: String,
        field: String,
        op: &'static str,
        field_type: &'static str,
    },

    /// Operand value's type does not match the field's declared type
    #[error("Value for operator `{op}` on field `{field}` does not match declared type {field_type}")]
    ValueTypeMismatch {
        field: String,
        op: &'static str,
        field_type: &'static str,
    },

    /// Sort key or distinct field names a relation instead of a scalar field
    #[error("Cannot {usage} by relation field `{field}` on collection `{collection}`")]
    NonScalarProjection {
        collection: String,
        field: String,
        usage: &'static str,
    },

    /// Include names something that is not a declared relation
    #[error("Cannot include `{field}` on collection `{collection}`: not a declared relation")]
    UnknownRelationInclude {
        collection: String,
        field: String,
    },
}
