pub mod store;

pub use store::{IngestTxn, RecordStore};
