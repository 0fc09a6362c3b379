use crate::types::Timestamp;

/// Identity assigned by the store
pub type RecordId = i64;

/// One log entry shared on the pubsub channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub timestamp: Timestamp,

    /// Publisher name
    pub name: String,

    /// Node the publisher ran on
    pub node: String,

    /// Free-form text, may be empty
    pub message: String,
}

impl Record {
    pub fn new(
        timestamp: Timestamp,
        name: impl Into<String>,
        node: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            name: name.into(),
            node: node.into(),
            message: message.into(),
        }
    }

    /// `NAME_NODE` as it appears on the wire
    pub fn publisher(&self) -> String {
        format!("{}_{}", self.name, self.node)
    }

    /// Output line: `TIMESTAMP|NAME_NODE|MESSAGE`
    pub fn render(&self) -> String {
        format!(
            "{}|{}_{}|{}",
            self.timestamp.render(),
            self.name,
            self.node,
            self.message
        )
    }
}

/// Result of adding a record to a store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddOutcome {
    /// Identity of the stored row (existing on duplicates, new otherwise)
    pub id: RecordId,

    /// Whether an identical record was already stored
    pub duplicate: bool,
}

impl AddOutcome {
    pub fn inserted(id: RecordId) -> Self {
        Self {
            id,
            duplicate: false,
        }
    }

    pub fn duplicate(id: RecordId) -> Self {
        Self {
            id,
            duplicate: true,
        }
    }
}
