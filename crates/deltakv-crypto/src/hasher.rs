use deltakv_types::Digest;

/// BLAKE3 hasher for key-value pairs and tombstones.
///
/// Two conventions are used and must not be mixed up:
///
/// - [`hash_kv`](Self::hash_kv) hashes `key ‖ value` and is the contribution
///   of a live pair to every content checksum.
/// - [`hash_key`](Self::hash_key) hashes the key alone and is only used for
///   tombstones in a change checksum, where the deleted value is not known
///   to the caller.
///
/// Key bytes always come first. Swapping the order anywhere breaks checksum
/// agreement between stores.
pub struct KvHasher;

impl KvHasher {
    /// Hash of a live key-value pair.
    pub fn hash_kv(key: &[u8], value: &[u8]) -> Digest {
        let mut hasher = blake3::Hasher::new();
        hasher.update(key);
        hasher.update(value);
        Digest::from_hash(*hasher.finalize().as_bytes())
    }

    /// Tombstone hash of a deleted key.
    pub fn hash_key(key: &[u8]) -> Digest {
        Digest::from_hash(*blake3::hash(key).as_bytes())
    }

    /// Full rehash of a mapping: XOR of [`hash_kv`](Self::hash_kv) over
    /// every pair.
    pub fn checksum_of<'a, I>(pairs: I) -> Digest
    where
        I: IntoIterator<Item = (&'a [u8], &'a [u8])>,
    {
        pairs
            .into_iter()
            .map(|(k, v)| Self::hash_kv(k, v))
            .collect()
    }
}
