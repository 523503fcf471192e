use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use deltakv_types::Digest;
use tracing::debug;

use crate::batch::MemoryBatch;
use crate::error::{StoreError, StoreResult};
use crate::state::MemoryState;
use crate::traits::Store;

/// In-memory, HashMap-based key-value store.
///
/// Intended for tests and embedding, and as the reference backend under a
/// cache. All pairs are held in memory behind a `RwLock`. Values are copied
/// on write and on read.
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    state: MemoryState,
    closed: bool,
}

impl Inner {
    fn open(&self) -> StoreResult<&MemoryState> {
        if self.closed {
            return Err(StoreError::Closed);
        }
        Ok(&self.state)
    }

    fn open_mut(&mut self) -> StoreResult<&mut MemoryState> {
        if self.closed {
            return Err(StoreError::Closed);
        }
        Ok(&mut self.state)
    }
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Number of pairs currently stored.
    pub fn len(&self) -> usize {
        self.read().state.put_count()
    }

    /// Returns `true` if the store holds no pairs.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().expect("lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().expect("lock poisoned")
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &[u8]) -> StoreResult<Vec<u8>> {
        let inner = self.read();
        inner
            .open()?
            .get(key)
            .map(<[u8]>::to_vec)
            .ok_or(StoreError::NotFound)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        let (key, value) = (key.to_vec(), value.to_vec());
        let mut inner = self.write();
        inner.open_mut()?.insert(key, value);
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> StoreResult<()> {
        let mut inner = self.write();
        inner.open_mut()?.remove(key);
        Ok(())
    }

    fn seek(&self, prefix: &[u8], visit: &mut dyn FnMut(&[u8], &[u8])) -> StoreResult<()> {
        // Snapshot under the lock so that `visit` may call back into the store.
        let matches: Vec<(Vec<u8>, Vec<u8>)> = {
            let inner = self.read();
            inner
                .open()?
                .seek(prefix)
                .map(|(k, v)| (k.to_vec(), v.to_vec()))
                .collect()
        };
        for (k, v) in &matches {
            visit(k, v);
        }
        Ok(())
    }

    fn put_batch(&self, batch: &MemoryBatch) -> StoreResult<()> {
        let mut inner = self.write();
        let state = inner.open_mut()?;
        let mut deleted = 0usize;
        for key in batch.deletes() {
            state.remove(key);
            deleted += 1;
        }
        let mut written = 0usize;
        for (key, value) in batch.puts() {
            state.insert(key.to_vec(), value.to_vec());
            written += 1;
        }
        debug!(written, deleted, "memory store applied batch");
        Ok(())
    }

    fn checksum(&self) -> Digest {
        self.read().state.checksum()
    }

    fn close(&self) -> StoreResult<()> {
        let mut inner = self.write();
        inner.state = MemoryState::new();
        inner.closed = true;
        Ok(())
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.read();
        f.debug_struct("MemoryStore")
            .field("key_count", &inner.state.put_count())
            .field("closed", &inner.closed)
            .finish()
    }
}
