//! Query Executor subsystem for siftdb
//!
//! Consumes queries and produces deterministic results from a record
//! source.
//!
//! # Execution Flow (strict order)
//!
//! 1. Validate the query against the schema
//! 2. Fetch candidate records from the source
//! 3. Filter candidates (relation conditions resolved through the source)
//! 4. Apply sort
//! 5. Apply distinct over the sorted sequence
//! 6. Drop `skip` leading results, take the first remaining record
//! 7. Resolve includes for the selected record
//!
//! # Invariants
//!
//! - Deterministic execution: same query + same data = same result
//! - Every condition is re-evaluated here, whatever the source pre-filtered
//! - Fetch failures abort the whole query; no partial results

mod errors;
mod executor;
mod filters;
mod relations;
mod result;
mod selector;

pub use errors::{ExecutorError, ExecutorResult};
pub use executor::QueryExecutor;
pub use filters::FilterEvaluator;
pub use relations::RelationResolver;
pub use result::{FoundRecord, Included};
pub use selector::RecordSelector;
