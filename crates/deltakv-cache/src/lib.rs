//! Write-buffering cache for deltakv stores.
//!
//! [`CachedStore`] wraps any [`Store`](deltakv_store::Store) and keeps all
//! puts and deletes in memory until [`CachedStore::persist`] flushes them to
//! the backing store as a single batch. Reads see the backing contents as
//! overridden by the pending changes.
//!
//! # Checksums
//!
//! - [`checksum`](deltakv_store::Store::checksum) -- the XOR-hash of the
//!   whole logical dataset, maintained incrementally in O(1) per mutation.
//! - [`CachedStore::change_checksum`] -- the net effect a persist would have
//!   on the backing store's own checksum. Pending deletes contribute a
//!   key-only tombstone hash, and only when the key exists in the backing
//!   store.
//!
//! After a successful persist, the cache's checksum equals the backing
//! store's and the change checksum is zero.
//!
//! # Concurrency
//!
//! One `RwLock` guards the pending writes, pending deletes and running
//! checksum together. Reads share it; mutations and persist take it
//! exclusively, persist for the full duration of the backing batch.

pub mod cached;
pub mod config;
pub mod error;

#[cfg(test)]
mod conformance;
#[cfg(test)]
mod testing;

pub use cached::{CachedStore, PersistStats};
pub use config::CacheConfig;
pub use error::ConfigError;
