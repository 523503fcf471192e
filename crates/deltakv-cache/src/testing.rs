//! Test doubles for exercising the cache against misbehaving backends.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use deltakv_store::{MemoryBatch, MemoryStore, Store, StoreError, StoreResult};
use deltakv_types::Digest;

/// A [`MemoryStore`] whose batch application and point reads can be made to
/// fail on demand. Counts `put_batch` calls.
#[derive(Debug, Default)]
pub(crate) struct FlakyStore {
    pub(crate) inner: MemoryStore,
    fail_batches: AtomicBool,
    fail_gets: AtomicBool,
    batch_calls: AtomicUsize,
    close_calls: AtomicUsize,
}

impl FlakyStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_fail_batches(&self, fail: bool) {
        self.fail_batches.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn set_fail_gets(&self, fail: bool) {
        self.fail_gets.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }
}

impl Store for FlakyStore {
    fn get(&self, key: &[u8]) -> StoreResult<Vec<u8>> {
        if self.fail_gets.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected read failure".into()));
        }
        self.inner.get(key)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        self.inner.put(key, value)
    }

    fn delete(&self, key: &[u8]) -> StoreResult<()> {
        self.inner.delete(key)
    }

    fn seek(&self, prefix: &[u8], visit: &mut dyn FnMut(&[u8], &[u8])) -> StoreResult<()> {
        self.inner.seek(prefix, visit)
    }

    fn put_batch(&self, batch: &MemoryBatch) -> StoreResult<()> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_batches.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected batch failure".into()));
        }
        self.inner.put_batch(batch)
    }

    fn checksum(&self) -> Digest {
        self.inner.checksum()
    }

    fn close(&self) -> StoreResult<()> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.close()
    }
}
