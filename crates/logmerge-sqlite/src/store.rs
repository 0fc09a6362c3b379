use logmerge_core::{
    error::Result,
    observe,
    stream::RecordStream,
    traits::RecordStore,
    types::{AddOutcome, Record},
    StoreConfig,
};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::Arc;

use crate::txn::SqliteIngestTxn;
use crate::{replay, schema, store_err};

const FIND_EXACT: &str = "SELECT id FROM messages
                          WHERE stamp = ?1 AND name = ?2 AND node = ?3 AND message = ?4
                          LIMIT 1";

const INSERT: &str = "INSERT INTO messages (stamp, epoch, utc_offset, zone, name, node, message)
                      VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

/// In-memory SQLite record store
///
/// Each store owns a private database; nothing outlives the process.
pub struct SqliteRecordStore {
    conn: Arc<Mutex<Connection>>,
    config: StoreConfig,
}

impl SqliteRecordStore {
    /// Get the underlying connection (for custom queries)
    pub fn conn(&self) -> &Arc<Mutex<Connection>> {
        &self.conn
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Configure SQLite connection
    fn configure_connection(conn: &Connection, cfg: &StoreConfig) -> Result<()> {
        conn.pragma_update(None, "cache_size", cfg.cache_size)
            .map_err(store_err)?;
        conn.pragma_update(None, "temp_store", "MEMORY")
            .map_err(store_err)?;
        Ok(())
    }
}

/// Insert `record` unless the exact tuple is already stored
pub(crate) fn insert_unique(conn: &Connection, record: &Record) -> Result<AddOutcome> {
    let stamp = record.timestamp.key();

    let existing: Option<i64> = conn
        .prepare_cached(FIND_EXACT)
        .map_err(store_err)?
        .query_row(
            params![stamp, record.name, record.node, record.message],
            |row| row.get(0),
        )
        .optional()
        .map_err(store_err)?;

    if let Some(id) = existing {
        observe::record_add(true);
        return Ok(AddOutcome::duplicate(id));
    }

    conn.prepare_cached(INSERT)
        .map_err(store_err)?
        .execute(params![
            stamp,
            record.timestamp.epoch_seconds(),
            record.timestamp.offset_seconds(),
            record.timestamp.zone(),
            record.name,
            record.node,
            record.message,
        ])
        .map_err(store_err)?;

    observe::record_add(false);
    Ok(AddOutcome::inserted(conn.last_insert_rowid()))
}

impl RecordStore for SqliteRecordStore {
    type Txn<'a> = SqliteIngestTxn<'a>;

    fn open(cfg: StoreConfig) -> Result<Self> {
        cfg.validate()?;

        let conn = Connection::open_in_memory().map_err(store_err)?;
        Self::configure_connection(&conn, &cfg)?;
        schema::init(&conn)?;

        tracing::debug!("Opened in-memory record store");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            config: cfg,
        })
    }

    fn add(&self, record: &Record) -> Result<AddOutcome> {
        let conn = self.conn.lock();
        insert_unique(&conn, record)
    }

    fn begin_txn(&self) -> Result<Self::Txn<'_>> {
        SqliteIngestTxn::new(self.conn.lock())
    }

    fn count(&self) -> Result<u64> {
        let conn = self.conn.lock();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))
            .map_err(store_err)?;
        Ok(count as u64)
    }

    fn open_stream(&self) -> Result<RecordStream> {
        let conn = Arc::clone(&self.conn);
        RecordStream::spawn(self.config.stream_capacity, move |sink| {
            let conn = conn.lock();
            replay::scan(&conn, sink).map(|_| ())
        })
    }

    fn close(self) -> Result<()> {
        match Arc::try_unwrap(self.conn) {
            Ok(conn) => conn
                .into_inner()
                .close()
                .map_err(|(_, e)| store_err(e)),
            Err(_) => {
                tracing::debug!("Replay stream still open, connection closes when it is dropped");
                Ok(())
            }
        }
    }
}
