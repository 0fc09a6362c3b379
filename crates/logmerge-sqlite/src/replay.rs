use logmerge_core::{
    error::Result,
    observe,
    stream::RecordSink,
    types::{Record, Timestamp},
};
use rusqlite::{Connection, Row};
use std::time::Instant;

use crate::store_err;

const SCAN: &str = "SELECT epoch, utc_offset, zone, name, node, message
                    FROM messages ORDER BY epoch ASC, id ASC";

/// Push every stored record into `sink` in replay order
///
/// Stops early if the consumer goes away. Returns the number of records sent.
pub(crate) fn scan(conn: &Connection, sink: &RecordSink) -> Result<u64> {
    let start = Instant::now();
    let mut stmt = conn.prepare(SCAN).map_err(store_err)?;
    let mut rows = stmt.query([]).map_err(store_err)?;

    let mut sent = 0u64;
    while let Some(row) = rows.next().map_err(store_err)? {
        if !sink.send(decode(row)?) {
            tracing::debug!("Replay consumer went away after {} records", sent);
            break;
        }
        sent += 1;
    }

    observe::record_replay(start.elapsed(), sent);
    tracing::debug!("Replayed {} records in {:?}", sent, start.elapsed());
    Ok(sent)
}

fn decode(row: &Row<'_>) -> Result<Record> {
    let epoch: i64 = row.get(0).map_err(store_err)?;
    let offset: i32 = row.get(1).map_err(store_err)?;
    let zone: String = row.get(2).map_err(store_err)?;

    Ok(Record {
        timestamp: Timestamp::from_parts(epoch, offset, zone)?,
        name: row.get(3).map_err(store_err)?,
        node: row.get(4).map_err(store_err)?,
        message: row.get(5).map_err(store_err)?,
    })
}
