use deltakv_types::Digest;

use crate::batch::MemoryBatch;
use crate::error::StoreResult;

/// Byte-oriented key-value store.
///
/// All implementations must satisfy these invariants:
/// - Keys are unique; the last write wins.
/// - A missing key is reported as [`StoreError::NotFound`], never as an
///   empty value.
/// - `put` and `delete` do not fail on an open store; `delete` of a missing
///   key is a no-op.
/// - `put_batch` applies every delete in the batch before every put, as one
///   atomic step from the caller's point of view.
/// - `checksum` is the XOR of `KvHasher::hash_kv` over all stored pairs.
///
/// [`StoreError::NotFound`]: crate::StoreError::NotFound
pub trait Store: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &[u8]) -> StoreResult<Vec<u8>>;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &[u8], value: &[u8]) -> StoreResult<()>;

    /// Remove `key`.
    fn delete(&self, key: &[u8]) -> StoreResult<()>;

    /// Call `visit` once for every stored pair whose key starts with
    /// `prefix`. Visiting order is unspecified.
    fn seek(&self, prefix: &[u8], visit: &mut dyn FnMut(&[u8], &[u8])) -> StoreResult<()>;

    /// Create an empty batch compatible with this store.
    fn batch(&self) -> MemoryBatch {
        MemoryBatch::new()
    }

    /// Apply all operations recorded in `batch`.
    fn put_batch(&self, batch: &MemoryBatch) -> StoreResult<()>;

    /// XOR of `hash_kv` over every stored pair.
    fn checksum(&self) -> Digest;

    /// Release resources. Calling `close` more than once is allowed.
    fn close(&self) -> StoreResult<()>;

    /// Collect every pair whose key starts with `prefix`.
    ///
    /// Default implementation gathers the output of `seek()`.
    fn scan_prefix(&self, prefix: &[u8]) -> StoreResult<Vec<(Vec<u8>, Vec<u8>)>> {
        let mut pairs = Vec::new();
        self.seek(prefix, &mut |k, v| pairs.push((k.to_vec(), v.to_vec())))?;
        Ok(pairs)
    }
}
