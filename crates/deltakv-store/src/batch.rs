use crate::state::MemoryState;

/// Accumulated puts and deletes, applied to a store in one call.
///
/// A batch behaves like a small store: the last operation on a key wins, so
/// putting a key clears an earlier delete of it and deleting a key drops an
/// earlier put. Keys and values are copied on insertion; callers may reuse
/// their buffers afterward.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryBatch {
    state: MemoryState,
}

impl MemoryBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a put of `value` under `key`.
    pub fn put(&mut self, key: &[u8], value: &[u8]) {
        self.state.insert(key.to_vec(), value.to_vec());
    }

    /// Record a delete of `key`.
    pub fn delete(&mut self, key: &[u8]) {
        self.state.mark_deleted(key.to_vec());
    }

    /// Pairs to write, in arbitrary order.
    pub fn puts(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.state.puts()
    }

    /// Keys to delete, in arbitrary order.
    pub fn deletes(&self) -> impl Iterator<Item = &[u8]> {
        self.state.deletes()
    }

    /// Number of recorded operations (puts plus deletes).
    pub fn len(&self) -> usize {
        self.state.put_count() + self.state.delete_count()
    }

    /// Returns `true` if no operations were recorded.
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }
}
