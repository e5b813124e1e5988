//! Item record and priority bucket.
//!
//! An [`Item`] is the per-key record owned by the key index: the cached
//! value, its byte weight, its hit count, and the priority key those produce.
//! A [`Bucket`] is one node of the ordered bucket chain and holds the set of
//! keys whose items currently share a priority key.
//!
//! The item's `node` pointer is a weak back-reference used only for O(1)
//! detachment; the bucket chain owns the bucket, the key index owns the item.
//! Keeping the item-to-bucket direction non-owning is what breaks the cycle
//! between the two structures.

extern crate alloc;

use crate::list;
use core::hash::{BuildHasher, Hash};
use core::ptr;

#[cfg(feature = "hashbrown")]
use hashbrown::HashSet;

#[cfg(not(feature = "hashbrown"))]
use std::collections::HashSet;

/// One cached entry, owned by the key index.
pub struct Item<K, V, S> {
    /// The cached value.
    pub value: V,
    /// Byte weight charged against the cache capacity. Fixed at admission.
    pub size: f64,
    /// Hit count. Zero only between insertion and the first increment.
    pub hits: u64,
    /// Priority key as of the last increment.
    pub priority_key: f64,
    /// Back-reference to the containing bucket. Null before first placement.
    pub node: *mut list::Entry<Bucket<K, S>>,
}

impl<K, V, S> Item<K, V, S> {
    /// Creates an unplaced item; `increment` gives it hits and a bucket.
    pub fn new(value: V, size: f64) -> Self {
        Item {
            value,
            size,
            hits: 0,
            priority_key: 0.0,
            node: ptr::null_mut(),
        }
    }
}

/// A set of keys sharing one priority key; a node in the bucket chain.
pub struct Bucket<K, S> {
    /// The priority key every member's item currently carries.
    pub priority_key: f64,
    /// Member keys. Unordered; iteration order decides eviction ties.
    pub members: HashSet<K, S>,
}

impl<K: Hash + Eq, S: BuildHasher> Bucket<K, S> {
    /// Creates an empty bucket for the given priority key.
    pub fn with_hasher(priority_key: f64, hash_builder: S) -> Self {
        Bucket {
            priority_key,
            members: HashSet::with_hasher(hash_builder),
        }
    }
}
