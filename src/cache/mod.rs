mod key;
mod sqlite;
mod store;


pub use key::chunk_key;
pub use sqlite::SqliteStore;
pub use store::{KvStore, MemoryStore};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{Error, Result};

/// Records per chunk when the caller does not pick one
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Splits record sequences across numbered keys of a size-limited store.
///
/// Chunks for a logical key live at `key:0`, `key:1`, ... with no gaps.
/// Reads stop at the first missing index. Saves are not atomic: an
/// interrupted save can leave a partial chunk set behind, and concurrent
/// saves to the same key must be serialized by the caller.
pub struct ChunkedCache<S> {
    store: S,
    chunk_size: usize,
}

impl<S: KvStore> ChunkedCache<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Set the chunk size used by [`ChunkedCache::save_default`]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Result<Self> {
        check_chunk_size(chunk_size)?;
        self.chunk_size = chunk_size;
        Ok(self)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Write `records` in chunks of at most `chunk_size`, then drop any
    /// leftover chunks from an earlier, longer save. Returns the chunk count.
    ///
    /// Every payload is encoded and checked to decode back before the first
    /// write, so values JSON cannot carry (NaN and infinite floats become
    /// `null`) fail with `Encode` instead of corrupting a stored chunk.
    pub fn save<T>(&mut self, key: &str, records: &[T], chunk_size: usize) -> Result<usize>
    where
        T: Serialize + DeserializeOwned,
    {
        check_key(key)?;
        check_chunk_size(chunk_size)?;

        let payloads = records
            .chunks(chunk_size)
            .map(encode_chunk)
            .collect::<Result<Vec<_>>>()?;

        for (index, payload) in payloads.iter().enumerate() {
            self.store.set(&chunk_key(key, index), payload)?;
        }

        let written = payloads.len();
        let evicted = self.evict_from(key, written)?;
        tracing::debug!(key, records = records.len(), chunks = written, evicted, "saved chunks");

        Ok(written)
    }

    /// Save using the configured chunk size
    pub fn save_default<T: Serialize + DeserializeOwned>(&mut self, key: &str, records: &[T]) -> Result<usize> {
        let chunk_size = self.chunk_size;
        self.save(key, records, chunk_size)
    }

    /// Save as exactly-sized slices: `chunk_count` chunks of ceil(len / count)
    /// records (fewer if the division leaves the tail empty).
    pub fn save_in_chunks<T: Serialize + DeserializeOwned>(
        &mut self,
        key: &str,
        records: &[T],
        chunk_count: usize,
    ) -> Result<usize> {
        if chunk_count == 0 {
            return Err(Error::InvalidParameter(
                "number of chunks must be greater than 0".to_string(),
            ));
        }
        if chunk_count > records.len() && !records.is_empty() {
            return Err(Error::InvalidParameter(format!(
                "number of chunks ({}) cannot exceed record count ({})",
                chunk_count,
                records.len()
            )));
        }

        let chunk_size = records.len().div_ceil(chunk_count).max(1);
        self.save(key, records, chunk_size)
    }

    /// Concatenate chunks `0, 1, 2, ...` until the first missing index.
    ///
    /// A chunk that fails to parse is skipped with a warning and the read
    /// carries on, so corruption yields partial data rather than an error.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        check_key(key)?;

        let mut records = Vec::new();
        let mut index = 0;

        while let Some(payload) = self.store.get(&chunk_key(key, index))? {
            match serde_json::from_str::<Vec<T>>(&payload) {
                Ok(chunk) => records.extend(chunk),
                Err(e) => {
                    let corrupt = Error::CorruptChunk {
                        key: chunk_key(key, index),
                        reason: e.to_string(),
                    };
                    tracing::warn!("skipping chunk: {}", corrupt);
                }
            }
            index += 1;
        }

        Ok(records)
    }

    /// True iff chunk 0 is present
    pub fn exists(&self, key: &str) -> Result<bool> {
        check_key(key)?;
        Ok(self.store.get(&chunk_key(key, 0))?.is_some())
    }

    /// Number of contiguous chunks stored for `key`
    pub fn chunk_count(&self, key: &str) -> Result<usize> {
        check_key(key)?;
        let mut index = 0;
        while self.store.get(&chunk_key(key, index))?.is_some() {
            index += 1;
        }
        Ok(index)
    }

    /// Remove every chunk of `key`, returning how many were deleted
    pub fn clear(&mut self, key: &str) -> Result<usize> {
        check_key(key)?;
        self.evict_from(key, 0)
    }

    fn evict_from(&mut self, key: &str, start: usize) -> Result<usize> {
        let mut index = start;
        loop {
            let stale = chunk_key(key, index);
            if self.store.get(&stale)?.is_none() {
                break;
            }
            self.store.remove(&stale)?;
            index += 1;
        }
        Ok(index - start)
    }
}

fn encode_chunk<T: Serialize + DeserializeOwned>(chunk: &[T]) -> Result<String> {
    let payload = serde_json::to_string(chunk).map_err(Error::Encode)?;
    serde_json::from_str::<Vec<T>>(&payload).map_err(Error::Encode)?;
    Ok(payload)
}

fn check_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::InvalidParameter("cache key must not be empty".to_string()));
    }
    Ok(())
}

fn check_chunk_size(chunk_size: usize) -> Result<()> {
    if chunk_size == 0 {
        return Err(Error::InvalidParameter("chunk size must be greater than 0".to_string()));
    }
    Ok(())
}
