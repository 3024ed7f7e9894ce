//! Record source error types

use thiserror::Error;

/// Result type for record source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// Errors raised by a record source
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// A record body was not a JSON object
    #[error("Invalid record for collection `{collection}`: {reason}")]
    InvalidRecord {
        collection: String,
        reason: String,
    },

    /// A fetch could not be completed.
    ///
    /// The executor aborts the whole query on this; partial results are
    /// never returned.
    #[error("Fetch from collection `{collection}` failed: {reason}")]
    FetchFailed {
        collection: String,
        reason: String,
    },
}

impl SourceError {
    /// Create a fetch failure
    pub fn fetch_failed(collection: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FetchFailed {
            collection: collection.into(),
            reason: reason.into(),
        }
    }
}
