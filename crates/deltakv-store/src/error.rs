use deltakv_types::Digest;

/// Errors from key-value store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The key is absent from the store (distinct from an empty value).
    #[error("key not found")]
    NotFound,

    /// The store was used after `close()`.
    #[error("store is closed")]
    Closed,

    /// Failure reported by a storage backend.
    #[error("backend error: {0}")]
    Backend(String),

    /// Applying pending changes to the backing store failed. Nothing was
    /// discarded from the cache.
    #[error("persisting {keys} keys failed: {source}")]
    Persist {
        keys: usize,
        source: Box<StoreError>,
    },

    /// The backing store's checksum disagrees with the cache after a flush.
    #[error("checksum mismatch after persist: cache {expected}, backing store {actual}")]
    ChecksumMismatch { expected: Digest, actual: Digest },
}

impl StoreError {
    /// Returns `true` for [`StoreError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
