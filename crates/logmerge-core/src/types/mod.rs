pub mod record;
pub mod timestamp;

pub use record::{AddOutcome, Record, RecordId};
pub use timestamp::Timestamp;
