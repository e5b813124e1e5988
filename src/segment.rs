//! Shared aging cache engine.
//!
//! `AgingSegment` implements the byte-bounded LFUDA/GDSF engine behind both
//! public cache types. It combines three structures:
//!
//! - a key index (`HashMap`) owning one [`Item`](crate::entry::Item) per key,
//! - an ordered chain of priority [`Bucket`](crate::entry::Bucket)s, ascending
//!   by priority key, with the lowest-priority bucket at the front,
//! - a global `age` that advances to the victim's priority key on every
//!   eviction and a `curr_size` byte counter checked against `capacity`.
//!
//! Every hit moves the item's priority key up by exactly one policy step, and
//! because hits only grow and `age` never decreases, an item only ever moves
//! *forward* in the chain. The placement scan therefore starts at the item's
//! old bucket and walks toward the back, which keeps reordering amortized
//! O(1) for typical workloads.
//!
//! # Safety
//!
//! Items hold a raw back-pointer to their bucket node. These pointers are
//! valid as long as:
//! - the pointer was produced by a bucket-chain insertion,
//! - the bucket has not been removed from the chain,
//! - the segment has not been dropped.
//!
//! The segment upholds this by detaching a bucket the moment its last member
//! leaves and by never handing bucket pointers out.
//!
//! # Thread safety
//!
//! Not thread-safe on its own. The `concurrent` module wraps a segment in a
//! single `parking_lot::RwLock`; the lock must be singular because `age` and
//! `curr_size` are global to the engine.

extern crate alloc;

use crate::entry::{Bucket, Item};
use crate::list::{Entry, List};
use crate::metrics::AgingCacheMetrics;
use crate::policy::Policy;
use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};

#[cfg(feature = "hashbrown")]
use hashbrown::hash_map::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// Notifier invoked with key and value for every item that leaves the cache
/// through eviction, explicit removal, or purge. Runs after the item is
/// unlinked from the index, while the engine's invariants already hold.
pub type EvictCallback<K, V> = Box<dyn FnMut(&K, &V) + Send>;

/// Deterministic byte weight of a value. Must be stable across repeated
/// calls on the same value; admission decisions depend on it.
pub type Sizer<V> = fn(&V) -> f64;

/// Default sizer: the byte length of the value's `Display` rendering.
///
/// `"hello"` weighs 5, `1234` weighs 4. Deterministic, but surprising for
/// binary payloads; inject a custom [`Sizer`] through the `with_sizer`
/// constructors when the rendering does not reflect the real weight.
pub fn display_size<V: fmt::Display>(value: &V) -> f64 {
    value.to_string().len() as f64
}

/// The aging cache engine shared by `LfudaCache`, `GdsfCache`, and their
/// concurrent wrappers.
pub(crate) struct AgingSegment<K, V, S = DefaultHashBuilder> {
    /// Byte budget. Positive; asserted at construction.
    capacity: f64,

    /// Sum of the byte weights of all live items.
    curr_size: f64,

    /// Global age. Assigned the victim's priority key on eviction, reset to
    /// zero by purge, never decreased otherwise.
    age: f64,

    /// Priority-key formula in effect.
    policy: Policy,

    /// Key index: one owned item per live key.
    map: HashMap<K, Item<K, V, S>, S>,

    /// Bucket chain, strictly ascending by priority key.
    buckets: List<Bucket<K, S>>,

    /// Optional departure notifier.
    on_evict: Option<EvictCallback<K, V>>,

    /// Byte-weight function applied to values at admission.
    sizer: Sizer<V>,

    /// Builder for the member sets of new buckets.
    hash_builder: S,

    /// Counters for hits, evictions, aging events, rejections.
    metrics: AgingCacheMetrics,
}

// SAFETY: the segment owns all data its raw pointers lead to; the pointers
// only target bucket nodes owned by `buckets`. Sending the segment moves the
// whole structure.
unsafe impl<K: Send, V: Send, S: Send> Send for AgingSegment<K, V, S> {}

// SAFETY: every mutation requires `&mut self`; shared references only reach
// read-only paths, so data races cannot occur.
unsafe impl<K: Send, V: Send, S: Sync> Sync for AgingSegment<K, V, S> {}

impl<K: Hash + Eq, V, S: BuildHasher + Clone> AgingSegment<K, V, S> {
    /// Creates an engine with the given byte capacity, policy, sizer,
    /// optional eviction callback, and hash builder.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is not a positive number of bytes.
    pub(crate) fn with_hasher(
        capacity: f64,
        policy: Policy,
        sizer: Sizer<V>,
        on_evict: Option<EvictCallback<K, V>>,
        hash_builder: S,
    ) -> Self {
        assert!(
            capacity > 0.0,
            "capacity must be a positive number of bytes"
        );

        AgingSegment {
            capacity,
            curr_size: 0.0,
            age: 0.0,
            policy,
            map: HashMap::with_hasher(hash_builder.clone()),
            buckets: List::new(),
            on_evict,
            sizer,
            hash_builder,
            metrics: AgingCacheMetrics::default(),
        }
    }

    /// Returns the byte capacity.
    #[inline]
    pub(crate) fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Returns the number of live keys.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the cache holds no items.
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the current byte load.
    #[inline]
    pub(crate) fn size(&self) -> f64 {
        self.curr_size
    }

    /// Returns the current cache age.
    #[inline]
    pub(crate) fn age(&self) -> f64 {
        self.age
    }

    /// Returns the policy in effect.
    #[inline]
    pub(crate) fn policy(&self) -> Policy {
        self.policy
    }

    /// Overrides the starting age. Used by config-driven construction; the
    /// age stays monotone from here on.
    pub(crate) fn set_initial_age(&mut self, age: f64) {
        self.age = age;
    }

    /// Adds a value under `key`. Returns `true` iff admission evicted at
    /// least one other item.
    ///
    /// A present key has its value overwritten and its hit count raised; the
    /// byte weight stays as computed at admission. An absent value that does
    /// not fit the capacity at all is rejected silently and the cache is left
    /// untouched.
    pub(crate) fn set(&mut self, key: K, value: V) -> bool
    where
        K: Clone,
    {
        if self.map.contains_key(&key) {
            let item = self.map.get_mut(&key).unwrap();
            item.value = value;
            self.increment(&key);
            return false;
        }

        let size = (self.sizer)(&value);
        if size > self.capacity {
            self.metrics.record_size_rejection();
            return false;
        }

        let mut evicted = false;
        while self.curr_size + size > self.capacity {
            if !self.evict() {
                break;
            }
            evicted = true;
        }

        self.map.insert(key.clone(), Item::new(value, size));
        self.curr_size += size;
        self.metrics.core.record_insertion(size);
        self.increment(&key);

        evicted
    }

    /// Looks up `key`, counting a hit and raising the item's priority.
    /// Never evicts.
    pub(crate) fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q> + Clone,
        Q: ?Sized + Hash + Eq,
    {
        if let Some(size) = self.map.get(key).map(|item| item.size) {
            self.metrics.core.record_hit(size);
            self.increment(key);
            self.map.get(key).map(|item| &item.value)
        } else {
            self.metrics.core.record_miss();
            None
        }
    }

    /// Looks up `key` without touching hit count, priority, or age.
    pub(crate) fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.get(key).map(|item| &item.value)
    }

    /// Returns whether `key` is present. No mutation.
    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(key)
    }

    /// Removes `key`, returning whether it was present. Notifies `on_evict`
    /// but does not advance the age.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.map.remove_entry(key) {
            Some((key, item)) => {
                self.curr_size -= item.size;
                // SAFETY: the item was placed by increment, so its node is a
                // live bucket of the chain
                unsafe { self.detach_member::<K>(item.node, &key) };
                if let Some(on_evict) = self.on_evict.as_mut() {
                    on_evict(&key, &item.value);
                }
                true
            }
            None => false,
        }
    }

    /// Empties the cache, notifying `on_evict` for every live item, and
    /// resets byte load and age to zero.
    pub(crate) fn purge(&mut self) {
        for (key, item) in self.map.drain() {
            if let Some(on_evict) = self.on_evict.as_mut() {
                on_evict(&key, &item.value);
            }
        }
        self.buckets.clear();
        self.curr_size = 0.0;
        self.age = 0.0;
    }

    /// Returns the live keys ordered from highest to lowest priority.
    /// Order within one bucket is arbitrary.
    pub(crate) fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        let mut keys = Vec::with_capacity(self.map.len());
        let mut node = self.buckets.back();
        while let Some(n) = node {
            // SAFETY: n is a live node of the chain
            unsafe {
                for key in (*n).value().members.iter() {
                    keys.push(key.clone());
                }
                node = self.buckets.prev(n);
            }
        }
        keys
    }

    /// Counts a hit on `key` and moves its item to the bucket matching the
    /// new priority key.
    ///
    /// The scan starts at the item's old bucket (fresh items start before
    /// the front) and only walks forward: priority keys never decrease
    /// during an item's lifetime.
    fn increment<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q> + Clone,
        Q: ?Sized + Hash + Eq,
    {
        let member_key = match self.map.get_key_value(key) {
            Some((k, _)) => k.clone(),
            None => return,
        };

        let item = self.map.get_mut(key).unwrap();
        item.hits += 1;
        item.priority_key = self.policy.priority_key(item.hits, item.size, self.age);
        let priority_key = item.priority_key;
        let old_node = item.node;

        // SAFETY: old_node, when non-null, is the item's current bucket; all
        // nodes visited by the scan are live members of the chain
        unsafe {
            let mut cursor = old_node;
            let mut next = if cursor.is_null() {
                self.buckets.front()
            } else {
                self.buckets.next(cursor)
            };

            let chosen = loop {
                let Some(n) = next else {
                    // ran past the back: open a new bucket behind the cursor
                    break self.new_bucket_after(cursor, priority_key);
                };
                let bucket_key = (*n).value().priority_key;
                if bucket_key > priority_key {
                    break self.new_bucket_after(cursor, priority_key);
                }
                if bucket_key == priority_key {
                    break n;
                }
                cursor = n;
                next = self.buckets.next(cursor);
            };

            (*chosen).value_mut().members.insert(member_key);
            self.map.get_mut(key).unwrap().node = chosen;

            if !old_node.is_null() && old_node != chosen {
                self.detach_member(old_node, key);
            }
        }
    }

    /// Opens a new bucket for `priority_key` immediately after `cursor`, or
    /// at the front when the cursor is null ("before the front").
    ///
    /// # Safety
    ///
    /// `cursor` must be null or a live node of the bucket chain.
    unsafe fn new_bucket_after(
        &mut self,
        cursor: *mut Entry<Bucket<K, S>>,
        priority_key: f64,
    ) -> *mut Entry<Bucket<K, S>> {
        let bucket = Bucket::with_hasher(priority_key, self.hash_builder.clone());
        if cursor.is_null() {
            self.buckets.push_front(bucket)
        } else {
            self.buckets.insert_after(cursor, bucket)
        }
    }

    /// Removes `key` from the bucket at `node`, dropping the bucket if it
    /// becomes empty.
    ///
    /// # Safety
    ///
    /// `node` must be a live node of the bucket chain.
    unsafe fn detach_member<Q>(&mut self, node: *mut Entry<Bucket<K, S>>, key: &Q)
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let members = &mut (*node).value_mut().members;
        members.remove(key);
        if members.is_empty() {
            drop(self.buckets.remove(node));
        }
    }

    /// Evicts one item from the lowest-priority bucket, advancing the age to
    /// the victim's priority key. Returns `false` on an empty cache.
    ///
    /// Which member of the front bucket goes is decided by hash-set
    /// iteration order; all of them share the minimum priority, so the age
    /// stays at or below every priority key left in the cache.
    fn evict(&mut self) -> bool
    where
        K: Clone,
    {
        let Some(front) = self.buckets.front() else {
            return false;
        };

        // SAFETY: front is a live node of the chain
        let (victim, priority_key) = unsafe {
            let bucket = (*front).value();
            match bucket.members.iter().next() {
                Some(key) => (key.clone(), bucket.priority_key),
                None => return false,
            }
        };

        self.age = priority_key;
        self.metrics.core.record_eviction();
        self.metrics.record_aging_event(priority_key);
        self.remove(&victim);
        true
    }

    /// Counters plus the engine gauges, for `CacheMetrics` reporting.
    pub(crate) fn report(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.metrics.to_btreemap();
        metrics.insert("age".to_string(), self.age);
        metrics.insert("capacity_bytes".to_string(), self.capacity);
        metrics.insert("cache_size_bytes".to_string(), self.curr_size);
        metrics.insert("len".to_string(), self.map.len() as f64);
        metrics.insert(
            "cache_utilization".to_string(),
            self.curr_size / self.capacity,
        );
        metrics
    }

    /// Checks the structural invariants of the index. Test builds only.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let mut member_count = 0usize;
        let mut prev_priority: Option<f64> = None;
        let mut node = self.buckets.front();

        while let Some(n) = node {
            // SAFETY: n is a live node of the chain
            unsafe {
                let bucket = (*n).value();
                assert!(!bucket.members.is_empty(), "empty bucket left in chain");
                if let Some(prev) = prev_priority {
                    assert!(
                        bucket.priority_key > prev,
                        "bucket chain not strictly ascending"
                    );
                }
                prev_priority = Some(bucket.priority_key);
                member_count += bucket.members.len();

                for key in bucket.members.iter() {
                    let item = self
                        .map
                        .get(key)
                        .expect("bucket member missing from key index");
                    assert_eq!(
                        item.priority_key, bucket.priority_key,
                        "item and bucket disagree on priority"
                    );
                    assert!(
                        core::ptr::eq(item.node, n),
                        "item back-reference out of date"
                    );
                }

                node = self.buckets.next(n);
            }
        }

        assert_eq!(
            member_count,
            self.map.len(),
            "key index and bucket members diverge"
        );

        let total: f64 = self.map.values().map(|item| item.size).sum();
        assert!(
            (total - self.curr_size).abs() < 1e-9,
            "byte load out of sync with live items"
        );
        assert!(self.curr_size <= self.capacity, "byte load over capacity");

        if let Some(front) = self.buckets.front() {
            // SAFETY: front is a live node of the chain
            unsafe {
                assert!(
                    self.age <= (*front).value().priority_key,
                    "age above the minimum priority in cache"
                );
            }
        }
    }
}

impl<K, V, S> fmt::Debug for AgingSegment<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgingSegment")
            .field("policy", &self.policy)
            .field("capacity", &self.capacity)
            .field("size", &self.curr_size)
            .field("len", &self.map.len())
            .field("age", &self.age)
            .finish()
    }
}
