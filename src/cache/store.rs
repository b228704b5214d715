use std::collections::HashMap;

use crate::error::{Error, Result};

/// Minimal string key-value store the chunked cache writes through
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removing a missing key is not an error
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-process store with an optional per-value size limit
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    max_value_len: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject values longer than `max` bytes, like a browser storage quota
    pub fn with_max_value_len(mut self, max: usize) -> Self {
        self.max_value_len = Some(max);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if let Some(max) = self.max_value_len {
            if value.len() > max {
                return Err(Error::QuotaExceeded {
                    key: key.to_string(),
                    size: value.len(),
                    max,
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}
