//! Query subsystem for siftdb
//!
//! The query AST is a recursive tagged union (`Filter`) combined with sort,
//! distinct, skip, and include specifications into an immutable `Query`.
//!
//! # Design Principles
//!
//! - Explicit: the implicit top-level conjunction is materialized as one
//!   `And` list at build time, never special-cased during evaluation
//! - Eager: malformed queries are rejected whole before any fetch
//! - Deterministic: validation walks the tree left to right

mod ast;
mod errors;
mod validate;

pub use ast::{FieldOp, Filter, Include, Query, RelationOp, SortDirection, SortKey};
pub use errors::{QueryError, ValidationResult};
pub use validate::validate;
