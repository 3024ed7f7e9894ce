//! siftdb - A strict, deterministic record filtering and selection engine
//!
//! Evaluates composable boolean filter expressions (including relational
//! quantifiers) against collections of records, applies deterministic
//! multi-key ordering and order-dependent distinct deduplication, and
//! resolves first-match selection with `skip` and an explicit not-found
//! error path.
//!
//! The engine performs no I/O of its own: records come from a
//! [`source::RecordSource`] collaborator, and the pipeline is pure
//! computation over already-fetched data.

pub mod executor;
pub mod observability;
pub mod query;
pub mod schema;
pub mod source;
