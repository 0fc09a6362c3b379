use logmerge_core::{
    error::Result,
    traits::IngestTxn,
    types::{AddOutcome, Record},
};
use parking_lot::MutexGuard;
use rusqlite::Connection;

use crate::store::insert_unique;
use crate::store_err;

/// Ingest transaction holding the store's connection
///
/// The store is locked for as long as the transaction lives.
pub struct SqliteIngestTxn<'a> {
    conn: MutexGuard<'a, Connection>,
    in_txn: bool,
    added: u64,
}

impl<'a> SqliteIngestTxn<'a> {
    pub fn new(conn: MutexGuard<'a, Connection>) -> Result<Self> {
        conn.execute("BEGIN IMMEDIATE TRANSACTION", [])
            .map_err(store_err)?;

        Ok(Self {
            conn,
            in_txn: true,
            added: 0,
        })
    }

    /// Records inserted (not duplicates) through this transaction
    pub fn added(&self) -> u64 {
        self.added
    }
}

impl<'a> IngestTxn for SqliteIngestTxn<'a> {
    fn add(&mut self, record: &Record) -> Result<AddOutcome> {
        let outcome = insert_unique(&self.conn, record)?;
        if !outcome.duplicate {
            self.added += 1;
        }
        Ok(outcome)
    }

    fn commit(mut self: Box<Self>) -> Result<()> {
        if self.in_txn {
            self.conn.execute("COMMIT", []).map_err(store_err)?;
            self.in_txn = false;
            tracing::debug!("Committed {} records", self.added);
        }
        Ok(())
    }

    fn rollback(mut self: Box<Self>) {
        if self.in_txn {
            let _ = self.conn.execute("ROLLBACK", []);
            self.in_txn = false;
        }
    }
}

impl<'a> Drop for SqliteIngestTxn<'a> {
    fn drop(&mut self) {
        if self.in_txn {
            let _ = self.conn.execute("ROLLBACK", []);
        }
    }
}
