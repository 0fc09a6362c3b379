use serde::{Deserialize, Serialize};

use crate::error::{MergeError, Result};

/// Configuration for the record store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite cache size (in pages, negative = KB)
    /// Default: -16000 (16MB)
    #[serde(default = "default_cache_size")]
    pub cache_size: i32,

    /// Capacity of the queue between the replay worker and its consumer
    /// Default: 10
    #[serde(default = "default_stream_capacity")]
    pub stream_capacity: usize,
}

fn default_cache_size() -> i32 {
    -16000
}

fn default_stream_capacity() -> usize {
    10
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            cache_size: default_cache_size(),
            stream_capacity: default_stream_capacity(),
        }
    }
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache_size(mut self, cache_size: i32) -> Self {
        self.cache_size = cache_size;
        self
    }

    pub fn with_stream_capacity(mut self, capacity: usize) -> Self {
        self.stream_capacity = capacity;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.stream_capacity == 0 {
            return Err(MergeError::Config(
                "stream_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
