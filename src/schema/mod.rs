//! Schema subsystem for siftdb
//!
//! Collections are declared in code: scalar fields with explicit types, and
//! relations whose foreign key lives on the target collection.
//!
//! # Design Principles
//!
//! - Schemas are mandatory: queries validate against them before execution
//! - No nulls-by-surprise: optional fields are declared optional
//! - No coercion: a field's declared type is the only type it matches
//! - Deterministic lookup (sorted registries)

mod errors;
mod types;

pub use errors::{SchemaError, SchemaResult};
pub use types::{CollectionDef, FieldDef, FieldType, RelationDef, RelationKind, Schema};
