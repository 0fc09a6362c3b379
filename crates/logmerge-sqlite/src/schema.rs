use logmerge_core::error::Result;
use rusqlite::Connection;

use crate::store_err;

/// Create the messages table and its indexes
///
/// `stamp` holds the normalized timestamp key used for duplicate lookup;
/// `epoch` orders the replay, with `id` breaking ties in insertion order.
pub fn init(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "BEGIN;
         CREATE TABLE IF NOT EXISTS messages (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             stamp TEXT NOT NULL,
             epoch INTEGER NOT NULL,
             utc_offset INTEGER NOT NULL,
             zone TEXT NOT NULL,
             name TEXT NOT NULL,
             node TEXT NOT NULL,
             message TEXT NOT NULL
         );
         CREATE INDEX IF NOT EXISTS combo ON messages (stamp, name, node);
         CREATE INDEX IF NOT EXISTS replay_order ON messages (epoch, id);
         COMMIT;",
    )
    .map_err(store_err)
}
