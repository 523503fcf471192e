//! Behaviour every [`Store`] must share, checked against the reference
//! store, a cache over it, and a cache stacked on another cache.

use std::collections::HashMap;
use std::sync::Arc;

use deltakv_crypto::KvHasher;
use deltakv_store::{MemoryStore, Store};
use deltakv_types::Digest;

use crate::cached::CachedStore;

type Factory = fn() -> Box<dyn Store>;

fn memory() -> Box<dyn Store> {
    Box::new(MemoryStore::new())
}

fn cached() -> Box<dyn Store> {
    Box::new(CachedStore::new(Arc::new(MemoryStore::new())))
}

fn stacked() -> Box<dyn Store> {
    let lower = Arc::new(CachedStore::new(Arc::new(MemoryStore::new())));
    Box::new(CachedStore::new(lower))
}

const STORES: [(&str, Factory); 3] = [("memory", memory), ("cached", cached), ("stacked", stacked)];

fn for_each_store(test: fn(&dyn Store)) {
    for (name, create) in STORES {
        let store = create();
        test(store.as_ref());
        assert!(store.close().is_ok(), "{name}: close failed");
    }
}

#[test]
fn put_and_get() {
    for_each_store(|s| {
        s.put(b"foo", b"bar").unwrap();
        assert_eq!(s.get(b"foo").unwrap(), b"bar");
    });
}

#[test]
fn get_non_existent() {
    for_each_store(|s| {
        assert!(s.get(b"sparse").unwrap_err().is_not_found());
    });
}

#[test]
fn put_batch_copies_buffers() {
    for_each_store(|s| {
        let mut key = b"foo".to_vec();
        let mut value = b"bar".to_vec();
        let mut batch = s.batch();
        batch.put(&key, &value);
        key.copy_from_slice(b"bar");
        value.copy_from_slice(b"foo");

        s.put_batch(&batch).unwrap();
        assert_eq!(s.get(b"foo").unwrap(), b"bar");
    });
}

#[test]
fn seek_by_prefix() {
    for_each_store(|s| {
        let good: [(&[u8], &[u8]); 3] = [(b"foo", b"bar"), (b"faa", b"bra"), (b"foox", b"barx")];
        let bad: [(&[u8], &[u8]); 2] = [(b"doo", b"pow"), (b"mew", b"qaz")];
        for (k, v) in good.iter().chain(bad.iter()) {
            s.put(k, v).unwrap();
        }

        let mut found = HashMap::new();
        s.seek(b"f", &mut |k, v| {
            found.insert(k.to_vec(), v.to_vec());
        })
        .unwrap();

        assert_eq!(found.len(), good.len());
        for (k, v) in good {
            assert_eq!(found[k], v);
        }
        for (k, _) in bad {
            assert!(!found.contains_key(k));
        }
    });
}

#[test]
fn delete_non_existent() {
    for_each_store(|s| {
        s.delete(b"sparse").unwrap();
        assert!(s.get(b"sparse").unwrap_err().is_not_found());
    });
}

#[test]
fn put_and_delete() {
    for_each_store(|s| {
        s.put(b"foo", b"bar").unwrap();
        s.delete(b"foo").unwrap();
        assert!(s.get(b"foo").unwrap_err().is_not_found());
    });
}

#[test]
fn put_batch_with_delete() {
    for_each_store(|s| {
        let to_be_stored: [(&[u8], &[u8]); 2] = [(b"foo", b"bar"), (b"bar", b"baz")];
        let deleted_in_batch: [(&[u8], &[u8]); 2] = [(b"edc", b"rfv"), (b"tgb", b"yhn")];
        let readded_to_batch: [(&[u8], &[u8]); 1] = [(b"yhn", b"ujm")];
        let to_be_deleted: [(&[u8], &[u8]); 2] = [(b"qaz", b"wsx"), (b"qwe", b"123")];
        let to_stay: [(&[u8], &[u8]); 2] = [(b"key", b"val"), (b"faa", b"bra")];

        for (k, v) in to_be_deleted.iter().chain(to_stay.iter()) {
            s.put(k, v).unwrap();
        }

        let mut batch = s.batch();
        for (k, v) in to_be_stored {
            batch.put(k, v);
        }
        for (k, _) in to_be_deleted {
            batch.delete(k);
        }
        for (k, v) in readded_to_batch {
            batch.put(k, v);
        }
        for (k, v) in deleted_in_batch {
            batch.put(k, v);
        }
        for (k, _) in deleted_in_batch {
            batch.delete(k);
        }
        for (k, _) in readded_to_batch {
            batch.delete(k);
        }
        for (k, v) in readded_to_batch {
            batch.put(k, v);
        }
        s.put_batch(&batch).unwrap();

        for (k, v) in to_stay.iter().chain(&to_be_stored).chain(&readded_to_batch) {
            assert_eq!(s.get(k).unwrap(), *v);
        }
        for (k, _) in deleted_in_batch.iter().chain(&to_be_deleted) {
            assert!(s.get(k).unwrap_err().is_not_found());
        }
    });
}

#[test]
fn checksum_follows_contents() {
    for_each_store(|s| {
        let hkv1 = KvHasher::hash_kv(b"key", b"value");
        let hkv2 = KvHasher::hash_kv(b"foo", b"bar");

        assert_eq!(s.checksum(), Digest::zero());
        s.put(b"key", b"value").unwrap();
        assert_eq!(s.checksum(), hkv1);
        s.put(b"foo", b"bar").unwrap();
        assert_eq!(s.checksum(), hkv1 ^ hkv2);
        s.delete(b"key").unwrap();
        assert_eq!(s.checksum(), hkv2);
        s.delete(b"foo").unwrap();
        assert_eq!(s.checksum(), Digest::zero());
    });
}

#[test]
fn scan_prefix_collects_matches() {
    for_each_store(|s| {
        s.put(b"a1", b"x").unwrap();
        s.put(b"a2", b"y").unwrap();
        s.put(b"b1", b"z").unwrap();

        let mut pairs = s.scan_prefix(b"a").unwrap();
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                (b"a1".to_vec(), b"x".to_vec()),
                (b"a2".to_vec(), b"y".to_vec())
            ]
        );
    });
}
