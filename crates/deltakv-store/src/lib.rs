//! Key-value storage contract for deltakv.
//!
//! Any storage engine placed under a `deltakv-cache` `CachedStore` implements the
//! [`Store`] trait: point reads, upserts, deletes, prefix scans, atomic
//! batches and a content checksum. The checksum of a store is the XOR of
//! [`KvHasher::hash_kv`] over every stored pair, so two stores holding the
//! same mapping always report the same checksum.
//!
//! # Backends
//!
//! - [`MemoryStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Batches
//!
//! [`MemoryBatch`] accumulates puts and deletes without any locking and is
//! the batch type for every backend. Applying a batch drops all of its
//! deleted keys first and then writes all of its puts, so a key that was
//! deleted and re-added inside one batch ends up written.
//!
//! [`KvHasher::hash_kv`]: deltakv_crypto::KvHasher::hash_kv

pub mod batch;
pub mod error;
pub mod memory;
pub mod state;
pub mod traits;

pub use batch::MemoryBatch;
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use state::MemoryState;
pub use traits::Store;
