//! SQLite-backed record store
//!
//! Keeps merged records in a private in-memory database for the lifetime of
//! the process.
//!
//! Key features:
//! - Duplicate detection on the full (timestamp, name, node, message) tuple
//! - Ingest transactions for batching a whole input file
//! - Ordered replay on a worker thread through a bounded queue

mod replay;
pub mod schema;
pub mod store;
pub mod txn;

pub use store::SqliteRecordStore;
pub use txn::SqliteIngestTxn;

pub(crate) fn store_err(e: rusqlite::Error) -> logmerge_core::MergeError {
    logmerge_core::MergeError::Store(e.to_string())
}
