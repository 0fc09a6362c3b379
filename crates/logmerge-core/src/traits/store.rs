use crate::config::StoreConfig;
use crate::error::Result;
use crate::stream::RecordStream;
use crate::types::{AddOutcome, Record};

/// Transaction grouping many adds
///
/// Nothing is visible outside the transaction until `commit`; dropping it
/// without committing discards every add. Duplicate detection inside the
/// transaction sees its own earlier adds.
pub trait IngestTxn {
    /// Add a record unless an identical one is already stored
    fn add(&mut self, record: &Record) -> Result<AddOutcome>;

    /// Add a batch of records, returning one outcome per record
    fn add_batch(&mut self, records: &[Record]) -> Result<Vec<AddOutcome>> {
        records.iter().map(|record| self.add(record)).collect()
    }

    /// Commit every add made through this transaction
    fn commit(self: Box<Self>) -> Result<()>;

    /// Discard every add made through this transaction
    fn rollback(self: Box<Self>);
}

/// Record store: a deduplicating table of records with ordered replay
///
/// Two records are duplicates iff timestamp key, name, node and message are
/// all equal. Records sharing the first three but differing in message are
/// stored separately.
///
/// A store has a single writer. Calls are serialized internally, but adds
/// issued from several threads at once land in no particular order, and an
/// add issued while a stream or transaction is open waits for it to finish.
pub trait RecordStore: Send + Sync {
    type Txn<'a>: IngestTxn
    where
        Self: 'a;

    /// Open a fresh, empty store
    fn open(cfg: StoreConfig) -> Result<Self>
    where
        Self: Sized;

    /// Add a record unless an identical one is already stored
    fn add(&self, record: &Record) -> Result<AddOutcome>;

    /// Begin an ingest transaction
    fn begin_txn(&self) -> Result<Self::Txn<'_>>;

    /// Number of stored records
    fn count(&self) -> Result<u64>;

    /// Replay every stored record in ascending timestamp order
    ///
    /// Records with equal timestamps come out in insertion order. Ingestion
    /// should be complete before the stream is opened.
    fn open_stream(&self) -> Result<RecordStream>;

    /// Release the store
    fn close(self) -> Result<()>
    where
        Self: Sized;
}
