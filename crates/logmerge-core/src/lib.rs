//! logmerge core: types and traits for merging pubsub log files
//!
//! This crate defines the pieces every store backend and driver shares:
//! - Record parser: text line → record, or "not a record"
//! - Record store trait: deduplicating insert plus ordered replay
//! - Ordered record stream: bounded producer/consumer hand-off
//! - Zone normalization so every stored timestamp shares one zone

pub mod config;
pub mod error;
pub mod observe;
pub mod parser;
pub mod stream;
pub mod traits;
pub mod types;
pub mod zone;

pub use config::{StoreConfig, ZoneSetting};
pub use error::{MergeError, Result};
pub use parser::{parse_line, parse_stamp, ParsedLine};
pub use stream::{RecordSink, RecordStream};
pub use traits::{IngestTxn, RecordStore};
pub use types::{AddOutcome, Record, RecordId, Timestamp};
pub use zone::ZoneNormalizer;
