use std::collections::{HashMap, HashSet};

use deltakv_crypto::KvHasher;
use deltakv_types::Digest;

/// Map state shared by stores, batches and cache overlays.
///
/// Holds written pairs and, when the owner tracks them, tombstones for
/// deleted keys. A key is never both written and tombstoned: inserting a key
/// clears its tombstone and tombstoning a key drops its value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryState {
    mem: HashMap<Vec<u8>, Vec<u8>>,
    del: HashSet<Vec<u8>>,
}

impl MemoryState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The written value for `key`, if any.
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.mem.get(key).map(Vec::as_slice)
    }

    /// Returns `true` if `key` carries a tombstone.
    pub fn is_deleted(&self, key: &[u8]) -> bool {
        self.del.contains(key)
    }

    /// Write `value` under `key` and clear any tombstone for it.
    pub fn insert(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.del.remove(&key);
        self.mem.insert(key, value);
    }

    /// Drop `key` without leaving a tombstone. Returns the removed value.
    pub fn remove(&mut self, key: &[u8]) -> Option<Vec<u8>> {
        self.mem.remove(key)
    }

    /// Drop `key` and record a tombstone. Returns the removed value.
    pub fn mark_deleted(&mut self, key: Vec<u8>) -> Option<Vec<u8>> {
        let old = self.mem.remove(&key);
        self.del.insert(key);
        old
    }

    /// Written pairs, in arbitrary order.
    pub fn puts(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.mem.iter().map(|(k, v)| (k.as_slice(), v.as_slice()))
    }

    /// Tombstoned keys, in arbitrary order.
    pub fn deletes(&self) -> impl Iterator<Item = &[u8]> {
        self.del.iter().map(Vec::as_slice)
    }

    /// Written pairs whose key starts with `prefix`.
    pub fn seek<'a>(&'a self, prefix: &'a [u8]) -> impl Iterator<Item = (&'a [u8], &'a [u8])> {
        self.puts().filter(move |(k, _)| k.starts_with(prefix))
    }

    /// Number of written pairs.
    pub fn put_count(&self) -> usize {
        self.mem.len()
    }

    /// Number of tombstones.
    pub fn delete_count(&self) -> usize {
        self.del.len()
    }

    /// Returns `true` if there are neither written pairs nor tombstones.
    pub fn is_empty(&self) -> bool {
        self.mem.is_empty() && self.del.is_empty()
    }

    /// Drop all written pairs and tombstones.
    pub fn clear(&mut self) {
        self.mem.clear();
        self.del.clear();
    }

    /// XOR of `hash_kv` over written pairs. Tombstones do not contribute.
    pub fn checksum(&self) -> Digest {
        KvHasher::checksum_of(self.puts())
    }
}
