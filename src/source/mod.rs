//! Record source subsystem for siftdb
//!
//! The engine consumes records through the `RecordSource` trait and
//! performs no I/O of its own. Sources must return candidates in a
//! deterministic retrieval order; they may pre-filter, but the executor
//! always re-validates every condition itself.

mod errors;
mod memory;
mod record;

pub use errors::{SourceError, SourceResult};
pub use memory::MemorySource;
pub use record::Record;

use crate::query::{Filter, Include};
use crate::schema::RelationDef;

/// Abstract record source the executor fetches from.
///
/// All methods are read-only. Errors abort the query that triggered the
/// fetch; the executor never returns partial results.
pub trait RecordSource {
    /// Fetches candidate records for a collection in deterministic
    /// retrieval order.
    ///
    /// `filter` and `includes` are advisory: a source may use them to
    /// pre-filter candidates or prefetch related records, or ignore them
    /// entirely. The executor re-evaluates every condition itself, so
    /// correctness never depends on what the source does with them.
    fn fetch_candidates(
        &self,
        collection: &str,
        filter: &Filter,
        includes: &[Include],
    ) -> SourceResult<Vec<Record>>;

    /// Fetches the record related to `parent` through a to-one relation
    fn fetch_related_one(
        &self,
        relation: &RelationDef,
        parent: &Record,
    ) -> SourceResult<Option<Record>>;

    /// Fetches all records related to `parent` through a to-many relation,
    /// in deterministic retrieval order
    fn fetch_related_many(
        &self,
        relation: &RelationDef,
        parent: &Record,
    ) -> SourceResult<Vec<Record>>;
}
