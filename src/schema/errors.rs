//! Schema error types

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Schema registration and lookup errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Collection name registered twice
    #[error("Duplicate collection: {0}")]
    DuplicateCollection(String),

    /// Collection not registered
    #[error("Unknown collection: {0}")]
    UnknownCollection(String),
}
