//! Key → volume index
//!
//! The coordinator only needs four operations on its index, so the backend
//! sits behind [`IndexStore`]. Each call is atomic on its own; nothing spans
//! two calls.

use crate::common::{Error, Result};
use rocksdb::{Options, DB};
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

/// Trait for key → volume index backends
pub trait IndexStore: Send + Sync {
    /// Volume holding `key`, or `None` when the key is not indexed.
    fn get(&self, key: &[u8]) -> Result<Option<String>>;
    fn has(&self, key: &[u8]) -> Result<bool>;
    fn put(&self, key: &[u8], volume: &str) -> Result<()>;
    fn delete(&self, key: &[u8]) -> Result<()>;
}

/// In-memory index, for tests and throwaway runs
#[derive(Default)]
pub struct MemoryIndex {
    map: RwLock<HashMap<Vec<u8>, String>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.map.read().map_err(poisoned)?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

fn poisoned<T>(_: T) -> Error {
    Error::Index("index lock poisoned".into())
}

impl IndexStore for MemoryIndex {
    fn get(&self, key: &[u8]) -> Result<Option<String>> {
        Ok(self.map.read().map_err(poisoned)?.get(key).cloned())
    }
    fn has(&self, key: &[u8]) -> Result<bool> {
        Ok(self.map.read().map_err(poisoned)?.contains_key(key))
    }
    fn put(&self, key: &[u8], volume: &str) -> Result<()> {
        self.map
            .write()
            .map_err(poisoned)?
            .insert(key.to_vec(), volume.to_string());
        Ok(())
    }
    fn delete(&self, key: &[u8]) -> Result<()> {
        self.map.write().map_err(poisoned)?.remove(key);
        Ok(())
    }
}

/// RocksDB index
pub struct RocksIndex {
    db: DB,
}

impl RocksIndex {
    /// Open or create the index at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path)?;
        Ok(Self { db })
    }

    /// Flush to disk
    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}

impl IndexStore for RocksIndex {
    fn get(&self, key: &[u8]) -> Result<Option<String>> {
        match self.db.get_pinned(key)? {
            Some(bytes) => {
                let volume = std::str::from_utf8(&bytes)
                    .map_err(|_| Error::Index("volume entry is not UTF-8".into()))?;
                Ok(Some(volume.to_string()))
            }
            None => Ok(None),
        }
    }
    fn has(&self, key: &[u8]) -> Result<bool> {
        if !self.db.key_may_exist(key) {
            return Ok(false);
        }
        Ok(self.db.get_pinned(key)?.is_some())
    }
    fn put(&self, key: &[u8], volume: &str) -> Result<()> {
        self.db.put(key, volume.as_bytes())?;
        Ok(())
    }
    fn delete(&self, key: &[u8]) -> Result<()> {
        self.db.delete(key)?;
        Ok(())
    }
}
