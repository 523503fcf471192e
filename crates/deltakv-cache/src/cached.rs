use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use deltakv_crypto::KvHasher;
use deltakv_store::{MemoryBatch, MemoryState, Store, StoreError, StoreResult};
use deltakv_types::Digest;
use tracing::{debug, warn};

use crate::config::CacheConfig;

/// Counts reported by a successful [`CachedStore::persist`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PersistStats {
    /// Pending writes handed to the backing store.
    pub written: usize,
    /// Pending deletes handed to the backing store, including deletes of
    /// keys the backing store never held.
    pub deleted: usize,
}

impl PersistStats {
    /// Total number of keys processed.
    pub fn keys(&self) -> usize {
        self.written + self.deleted
    }
}

/// Pending changes and the checksum they imply, guarded as one unit.
#[derive(Default)]
struct Overlay {
    pending: MemoryState,
    checksum: Digest,
    closed: bool,
}

impl Overlay {
    fn open(&self) -> StoreResult<&Self> {
        if self.closed {
            return Err(StoreError::Closed);
        }
        Ok(self)
    }

    fn open_mut(&mut self) -> StoreResult<&mut Self> {
        if self.closed {
            return Err(StoreError::Closed);
        }
        Ok(self)
    }
}

/// Write-buffering cache in front of a backing [`Store`].
///
/// Puts and deletes are absorbed into an in-memory overlay and never reach
/// the backing store until [`persist`](Self::persist) flushes them in one
/// batch. Reads consult the overlay first and fall back to the backing store
/// for keys the overlay does not mention.
///
/// The cache maintains a running [`checksum`](Store::checksum) of the whole
/// logical dataset (backing contents as overridden by the overlay). Each
/// mutation XORs the key's previous contribution out and its new one in, so
/// the checksum costs O(1) per operation regardless of dataset size.
///
/// The backing store is shared, not owned exclusively. Writing to it through
/// another handle while the cache wraps it desynchronises the running
/// checksum from the backing contents.
pub struct CachedStore<S: Store + ?Sized> {
    backing: Arc<S>,
    config: CacheConfig,
    overlay: RwLock<Overlay>,
}

impl<S: Store + ?Sized> CachedStore<S> {
    /// Wrap `backing` with an empty overlay and the default configuration.
    pub fn new(backing: Arc<S>) -> Self {
        Self::with_config(backing, CacheConfig::default())
    }

    /// Wrap `backing` with an empty overlay.
    ///
    /// The running checksum starts at the backing store's current checksum,
    /// so a cache over a pre-populated store describes its contents.
    pub fn with_config(backing: Arc<S>, config: CacheConfig) -> Self {
        let overlay = Overlay {
            checksum: backing.checksum(),
            ..Overlay::default()
        };
        Self {
            backing,
            config,
            overlay: RwLock::new(overlay),
        }
    }

    /// The wrapped backing store.
    pub fn backing(&self) -> &Arc<S> {
        &self.backing
    }

    /// The active configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Number of pending writes and pending deletes.
    pub fn pending(&self) -> (usize, usize) {
        let overlay = self.read();
        (
            overlay.pending.put_count(),
            overlay.pending.delete_count(),
        )
    }

    /// Returns `true` if there is anything to persist.
    pub fn is_dirty(&self) -> bool {
        !self.read().pending.is_empty()
    }

    /// Checksum of the changes a persist would apply to the backing store.
    ///
    /// XOR of `hash_kv` over pending writes, combined with the tombstone
    /// hash `hash_key` of each pending delete whose key currently exists in
    /// the backing store. Deleting a key the backing store does not hold has
    /// no effect on it and therefore contributes nothing.
    pub fn change_checksum(&self) -> Digest {
        let overlay = self.read();
        let mut sum = overlay.pending.checksum();
        for key in overlay.pending.deletes() {
            if self.backing.get(key).is_ok() {
                sum ^= KvHasher::hash_key(key);
            }
        }
        sum
    }

    /// Flush all pending changes into the backing store as one batch.
    ///
    /// Holds the exclusive lock for the whole flush, so no reader observes
    /// the moment between "pending in the cache" and "applied to the
    /// backing store". If the backing store rejects the batch, the overlay
    /// is left untouched and the call may be retried.
    pub fn persist(&self) -> StoreResult<PersistStats> {
        let mut guard = self.write();
        let overlay = guard.open_mut()?;
        if overlay.pending.is_empty() {
            return Ok(PersistStats::default());
        }

        let mut batch = self.backing.batch();
        let mut stats = PersistStats::default();
        for (key, value) in overlay.pending.puts() {
            batch.put(key, value);
            stats.written += 1;
        }
        for key in overlay.pending.deletes() {
            batch.delete(key);
            stats.deleted += 1;
        }

        if let Err(source) = self.backing.put_batch(&batch) {
            warn!(keys = stats.keys(), error = %source, "persist failed; pending changes kept");
            return Err(StoreError::Persist {
                keys: stats.keys(),
                source: Box::new(source),
            });
        }
        overlay.pending.clear();
        debug!(written = stats.written, deleted = stats.deleted, "persisted overlay");

        // Pending state is already gone, so a mismatch is only logged.
        if self.config.verify_after_persist {
            let actual = self.backing.checksum();
            if actual != overlay.checksum {
                warn!(
                    expected = %overlay.checksum,
                    actual = %actual,
                    "backing store checksum diverged from cache"
                );
            }
        }
        Ok(stats)
    }

    /// Compare the running checksum with the backing store's own checksum.
    ///
    /// Only meaningful on a clean cache: pending changes make the two differ
    /// by design. A mismatch after a persist means the backing store was
    /// written through another handle.
    pub fn verify(&self) -> StoreResult<()> {
        let guard = self.read();
        let overlay = guard.open()?;
        let actual = self.backing.checksum();
        if actual != overlay.checksum {
            return Err(StoreError::ChecksumMismatch {
                expected: overlay.checksum,
                actual,
            });
        }
        Ok(())
    }

    /// Hash contribution `key` currently makes to the logical dataset.
    fn contribution(&self, pending: &MemoryState, key: &[u8]) -> Option<Digest> {
        if let Some(value) = pending.get(key) {
            return Some(KvHasher::hash_kv(key, value));
        }
        if pending.is_deleted(key) {
            return None;
        }
        match self.backing.get(key) {
            Ok(value) => Some(KvHasher::hash_kv(key, &value)),
            Err(StoreError::NotFound) => None,
            Err(e) => {
                debug!(error = %e, "backing read failed; treating key as absent");
                None
            }
        }
    }

    fn put_locked(&self, overlay: &mut Overlay, key: &[u8], value: &[u8]) {
        if let Some(old) = self.contribution(&overlay.pending, key) {
            overlay.checksum ^= old;
        }
        overlay.checksum ^= KvHasher::hash_kv(key, value);
        overlay.pending.insert(key.to_vec(), value.to_vec());
    }

    fn delete_locked(&self, overlay: &mut Overlay, key: &[u8]) {
        if overlay.pending.is_deleted(key) {
            return;
        }
        if let Some(old) = self.contribution(&overlay.pending, key) {
            overlay.checksum ^= old;
        }
        overlay.pending.mark_deleted(key.to_vec());
    }

    fn read(&self) -> RwLockReadGuard<'_, Overlay> {
        self.overlay.read().expect("lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, Overlay> {
        self.overlay.write().expect("lock poisoned")
    }
}

impl<S: Store + ?Sized> Store for CachedStore<S> {
    fn get(&self, key: &[u8]) -> StoreResult<Vec<u8>> {
        let guard = self.read();
        let overlay = guard.open()?;
        if let Some(value) = overlay.pending.get(key) {
            return Ok(value.to_vec());
        }
        if overlay.pending.is_deleted(key) {
            return Err(StoreError::NotFound);
        }
        self.backing.get(key)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        let mut guard = self.write();
        let overlay = guard.open_mut()?;
        self.put_locked(overlay, key, value);
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> StoreResult<()> {
        let mut guard = self.write();
        let overlay = guard.open_mut()?;
        self.delete_locked(overlay, key);
        Ok(())
    }

    /// Pending writes are visited first, then backing pairs the overlay does
    /// not mention. Results are gathered under the shared lock and visited
    /// after it is released, so `visit` may call back into the cache.
    fn seek(&self, prefix: &[u8], visit: &mut dyn FnMut(&[u8], &[u8])) -> StoreResult<()> {
        let matches = {
            let guard = self.read();
            let overlay = guard.open()?;
            let pending = &overlay.pending;
            let mut matches: Vec<(Vec<u8>, Vec<u8>)> = pending
                .seek(prefix)
                .map(|(k, v)| (k.to_vec(), v.to_vec()))
                .collect();
            self.backing.seek(prefix, &mut |k, v| {
                if pending.get(k).is_none() && !pending.is_deleted(k) {
                    matches.push((k.to_vec(), v.to_vec()));
                }
            })?;
            matches
        };
        for (k, v) in &matches {
            visit(k, v);
        }
        Ok(())
    }

    /// Absorb `batch` into the overlay: deletes first, then puts, under one
    /// exclusive lock. Nothing reaches the backing store until `persist`.
    fn put_batch(&self, batch: &MemoryBatch) -> StoreResult<()> {
        let mut guard = self.write();
        let overlay = guard.open_mut()?;
        for key in batch.deletes() {
            self.delete_locked(overlay, key);
        }
        for (key, value) in batch.puts() {
            self.put_locked(overlay, key, value);
        }
        Ok(())
    }

    fn checksum(&self) -> Digest {
        self.read().checksum
    }

    /// Drop the overlay and close the backing store. Pending changes that
    /// were not persisted are lost.
    fn close(&self) -> StoreResult<()> {
        let mut guard = self.write();
        if guard.closed {
            return Ok(());
        }
        if !guard.pending.is_empty() {
            debug!(
                writes = guard.pending.put_count(),
                deletes = guard.pending.delete_count(),
                "closing cache with unpersisted changes"
            );
        }
        *guard = Overlay {
            closed: true,
            ..Overlay::default()
        };
        self.backing.close()
    }
}

impl<S: Store + ?Sized> std::fmt::Debug for CachedStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let overlay = self.read();
        f.debug_struct("CachedStore")
            .field("pending_writes", &overlay.pending.put_count())
            .field("pending_deletes", &overlay.pending.delete_count())
            .field("checksum", &overlay.checksum)
            .field("closed", &overlay.closed)
            .finish()
    }
}
