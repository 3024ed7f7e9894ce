//! Eager query validation
//!
//! Validation semantics:
//! - Every referenced collection, field, and relation must be declared
//! - Scalar operators apply only to scalar fields, relation operators only
//!   to relations of the matching cardinality
//! - Operators and operand values must match the field's declared type
//! - Sort keys and distinct fields must be scalar fields
//!
//! Validation runs before any fetch and is deterministic; a query is either
//! rejected whole or executes without structural errors. No partial
//! validation.

use serde_json::Value;

use crate::schema::{CollectionDef, FieldDef, FieldType, RelationKind, Schema};

use super::ast::{FieldOp, Filter, Query};
use super::errors::{QueryError, ValidationResult};

/// Validates a query against the schema.
///
/// # Errors
///
/// Returns the first `QueryError` encountered in a deterministic
/// left-to-right walk of the filter tree, then order, distinct, and
/// includes.
pub fn validate(schema: &Schema, query: &Query) -> ValidationResult<()> {
    let def = schema
        .collection(&query.collection)
        .map_err(|_| QueryError::UnknownCollection(query.collection.clone()))?;

    validate_filter(schema, &query.collection, def, &query.filter)?;

    for key in &query.order {
        validate_projection(&query.collection, def, &key.field, "order")?;
    }
    if let Some(fields) = &query.distinct {
        for field in fields {
            validate_projection(&query.collection, def, field, "distinct")?;
        }
    }

    for include in &query.includes {
        let relation = def.get_relation(&include.relation).ok_or_else(|| {
            QueryError::UnknownRelationInclude {
                collection: query.collection.clone(),
                field: include.relation.clone(),
            }
        })?;
        let target = schema
            .collection(&relation.target)
            .map_err(|_| QueryError::UnknownCollection(relation.target.clone()))?;

        for key in &include.order {
            validate_projection(&relation.target, target, &key.field, "order")?;
        }
        if let Some(fields) = &include.distinct {
            for field in fields {
                validate_projection(&relation.target, target, field, "distinct")?;
            }
        }
    }

    Ok(())
}

/// Validates one filter subtree against the collection it applies to.
///
/// Relation conditions recurse into the target collection's definition, so
/// arbitrarily nested relation filters are checked end to end.
fn validate_filter(
    schema: &Schema,
    collection: &str,
    def: &CollectionDef,
    filter: &Filter,
) -> ValidationResult<()> {
    match filter {
        Filter::Field { field, op } => {
            if def.get_relation(field).is_some() {
                return Err(QueryError::ScalarOpOnRelation {
                    collection: collection.to_string(),
                    field: field.clone(),
                    op: op.op_name(),
                });
            }
            let field_def = def.get_field(field).ok_or_else(|| QueryError::UnknownField {
                collection: collection.to_string(),
                field: field.clone(),
            })?;
            validate_field_op(collection, field, field_def, op)
        }
        Filter::And(members) | Filter::Or(members) | Filter::Not(members) => {
            for member in members {
                validate_filter(schema, collection, def, member)?;
            }
            Ok(())
        }
        Filter::Relation { field, op, filter } => {
            if def.get_field(field).is_some() {
                return Err(QueryError::RelationOpOnScalar {
                    collection: collection.to_string(),
                    field: field.clone(),
                    op: op.op_name(),
                });
            }
            let relation = def.get_relation(field).ok_or_else(|| QueryError::UnknownField {
                collection: collection.to_string(),
                field: field.clone(),
            })?;

            let cardinality_ok = match relation.kind {
                RelationKind::ToOne => !op.is_quantifier(),
                RelationKind::ToMany => op.is_quantifier(),
            };
            if !cardinality_ok {
                return Err(QueryError::RelationCardinalityMismatch {
                    collection: collection.to_string(),
                    field: field.clone(),
                    op: op.op_name(),
                    kind: match relation.kind {
                        RelationKind::ToOne => "to-one",
                        RelationKind::ToMany => "to-many",
                    },
                });
            }

            let target = schema
                .collection(&relation.target)
                .map_err(|_| QueryError::UnknownCollection(relation.target.clone()))?;
            validate_filter(schema, &relation.target, target, filter)
        }
    }
}

/// Validates a scalar operator against the field's declared type
fn validate_field_op(
    collection: &str,
    field: &str,
    field_def: &FieldDef,
    op: &FieldOp,
) -> ValidationResult<()> {
    let field_type = field_def.field_type;

    if op.is_textual() && !field_type.is_textual() {
        return Err(QueryError::OperatorTypeMismatch {
            collection: collection.to_string(),
            field: field.to_string(),
            op: op.op_name(),
            field_type: field_type.type_name(),
        });
    }
    if op.is_ordering() && !field_type.is_ordered() {
        return Err(QueryError::OperatorTypeMismatch {
            collection: collection.to_string(),
            field: field.to_string(),
            op: op.op_name(),
            field_type: field_type.type_name(),
        });
    }

    match op {
        FieldOp::Equals(value)
        | FieldOp::NotEquals(value)
        | FieldOp::Gt(value)
        | FieldOp::Gte(value)
        | FieldOp::Lt(value)
        | FieldOp::Lte(value) => check_operand(field, op, field_type, value),
        FieldOp::In(values) => {
            for value in values {
                check_operand(field, op, field_type, value)?;
            }
            Ok(())
        }
        // String operands are enforced by construction; null checks take none
        FieldOp::Contains(_)
        | FieldOp::StartsWith(_)
        | FieldOp::EndsWith(_)
        | FieldOp::IsNull(_) => Ok(()),
    }
}

/// Checks that an operand value matches the declared field type.
///
/// A null operand is always accepted; the evaluator resolves it under the
/// missing/null rules rather than as a typed comparison.
fn check_operand(
    field: &str,
    op: &FieldOp,
    field_type: FieldType,
    value: &Value,
) -> ValidationResult<()> {
    let ok = match field_type {
        FieldType::String | FieldType::Timestamp => value.is_string(),
        FieldType::Int => value.as_i64().is_some(),
        FieldType::Float => value.is_number(),
        FieldType::Bool => value.is_boolean(),
    };
    if ok || value.is_null() {
        Ok(())
    } else {
        Err(QueryError::ValueTypeMismatch {
            field: field.to_string(),
            op: op.op_name(),
            field_type: field_type.type_name(),
        })
    }
}

/// Validates that a sort or distinct field is a declared scalar field
fn validate_projection(
    collection: &str,
    def: &CollectionDef,
    field: &str,
    usage: &'static str,
) -> ValidationResult<()> {
    if def.get_relation(field).is_some() {
        return Err(QueryError::NonScalarProjection {
            collection: collection.to_string(),
            field: field.to_string(),
            usage,
        });
    }
    if def.get_field(field).is_none() {
        return Err(QueryError::UnknownField {
            collection: collection.to_string(),
            field: field.to_string(),
        });
    }
    Ok(())
}
