//! Executor error types
//!
//! The executor surfaces three failure classes:
//! - `RecordNotFound`: the filter/order/distinct/skip pipeline yielded no
//!   record at the requested offset (`find_first_or_raise` only)
//! - `InvalidQuery`: the query failed eager validation
//! - `Source`: a record fetch failed; the whole query aborts and partial
//!   results are never returned

use thiserror::Error;

use crate::query::QueryError;
use crate::source::SourceError;

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;

/// Query execution errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecutorError {
    /// No record at the requested offset after the full pipeline
    #[error("Query on collection `{collection}` depends on one or more records that were required but not found")]
    RecordNotFound {
        /// Collection the query targeted
        collection: String,
    },

    /// Query rejected before evaluation
    #[error("Invalid query: {0}")]
    InvalidQuery(#[from] QueryError),

    /// Record fetch failed mid-query
    #[error(transparent)]
    Source(#[from] SourceError),
}
