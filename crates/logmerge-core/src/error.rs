use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid timestamp '{token}': {reason}")]
    Timestamp { token: String, reason: String },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl MergeError {
    pub(crate) fn timestamp(token: &str, reason: impl Into<String>) -> Self {
        Self::Timestamp {
            token: token.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MergeError>;
