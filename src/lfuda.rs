//! Least Frequently Used with Dynamic Aging (LFUDA) cache implementation.
//!
//! LFUDA extends plain LFU with a global age that advances on every
//! eviction, which keeps historically popular items from pinning themselves
//! into a small cache after their popularity has passed.
//!
//! # Algorithm
//!
//! Each item carries a priority key:
//!
//! ```text
//! priority = hits + age
//! ```
//!
//! Hits grow on every `get` and on overwrite via `set`. When an item is
//! evicted, the global age is *assigned* the victim's priority key; the
//! victim always comes from the lowest-priority bucket, so the age never
//! exceeds any priority key still in the cache. A freshly inserted item
//! starts at `1 + age`, which puts it within one hit of the current floor
//! no matter how long the cache has been running.
//!
//! The cache is bounded by *bytes*, not entries: each value is weighed by a
//! deterministic sizer (by default the byte length of its `Display`
//! rendering) and admission evicts until the new value fits. A value larger
//! than the whole capacity is rejected silently.
//!
//! # Performance Characteristics
//!
//! - **Get / Set / Remove**: amortized O(1). A hit re-buckets the item by
//!   scanning forward from its old bucket, and since priorities only move
//!   up, the scan almost always stops at the immediate neighbor.
//! - **Keys**: O(n), walking the bucket chain from highest to lowest
//!   priority.
//!
//! # When to Use
//!
//! - Long-running caches where popularity shifts over time
//! - Workloads where access frequency matters more than recency
//! - Protecting against one-shot scans polluting the cache
//!
//! # Thread Safety
//!
//! `LfudaCache` is not thread-safe. Use
//! [`ConcurrentLfudaCache`](crate::concurrent::ConcurrentLfudaCache)
//! (requires the `concurrent` feature) or wrap it in a lock yourself.

extern crate alloc;

use crate::config::LfudaCacheConfig;
use crate::metrics::CacheMetrics;
use crate::policy::Policy;
use crate::segment::{display_size, AgingSegment, EvictCallback, Sizer};
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};

#[cfg(feature = "hashbrown")]
use hashbrown::hash_map::DefaultHashBuilder;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;

/// A byte-bounded LFUDA cache.
///
/// # Examples
///
/// ```
/// use lfuda::LfudaCache;
///
/// let mut cache = LfudaCache::new(3.0);
///
/// cache.set("a", "a");
/// cache.set("b", "b");
/// cache.get(&"a"); // "a" now outranks "b"
///
/// cache.set("c", "c");
/// cache.set("d", "d"); // evicts the lowest-priority item and ages the cache
///
/// assert!(cache.contains(&"a"));
/// assert!(cache.age() > 0.0);
/// ```
pub struct LfudaCache<K, V, S = DefaultHashBuilder> {
    segment: AgingSegment<K, V, S>,
}

impl<K: Hash + Eq, V: fmt::Display> LfudaCache<K, V> {
    /// Creates an LFUDA cache with the given byte capacity, weighing values
    /// by their `Display` rendering.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is not positive.
    ///
    /// # Examples
    ///
    /// ```
    /// use lfuda::LfudaCache;
    ///
    /// let cache: LfudaCache<String, String> = LfudaCache::new(1024.0);
    /// assert_eq!(cache.capacity(), 1024.0);
    /// ```
    pub fn new(capacity: f64) -> Self {
        Self::with_evict(capacity, None)
    }

    /// Creates an LFUDA cache with an eviction callback, invoked with key
    /// and value for every item that leaves through eviction, removal, or
    /// purge.
    pub fn with_evict(capacity: f64, on_evict: Option<EvictCallback<K, V>>) -> Self {
        Self::with_hasher(
            capacity,
            display_size,
            on_evict,
            DefaultHashBuilder::default(),
        )
    }

    /// Creates an LFUDA cache from a config, honoring its starting age.
    pub fn from_config(config: LfudaCacheConfig, on_evict: Option<EvictCallback<K, V>>) -> Self {
        let mut cache = Self::with_evict(config.capacity(), on_evict);
        cache.segment.set_initial_age(config.initial_age());
        cache
    }
}

impl<K: Hash + Eq, V> LfudaCache<K, V> {
    /// Creates an LFUDA cache with a custom byte-weight function, for value
    /// types without a meaningful `Display` rendering.
    ///
    /// The sizer must be deterministic: repeated calls on the same value
    /// must agree, since admission decisions depend on it.
    ///
    /// # Examples
    ///
    /// ```
    /// use lfuda::LfudaCache;
    ///
    /// let mut cache: LfudaCache<&str, Vec<u8>> =
    ///     LfudaCache::with_sizer(1024.0, |value| value.len() as f64);
    /// cache.set("blob", vec![0u8; 16]);
    /// assert_eq!(cache.size(), 16.0);
    /// ```
    pub fn with_sizer(capacity: f64, sizer: Sizer<V>) -> Self {
        Self::with_sizer_and_evict(capacity, sizer, None)
    }

    /// Creates an LFUDA cache with a custom sizer and an eviction callback.
    pub fn with_sizer_and_evict(
        capacity: f64,
        sizer: Sizer<V>,
        on_evict: Option<EvictCallback<K, V>>,
    ) -> Self {
        Self::with_hasher(capacity, sizer, on_evict, DefaultHashBuilder::default())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher + Clone> LfudaCache<K, V, S> {
    /// Creates an LFUDA cache with a custom hash builder.
    pub fn with_hasher(
        capacity: f64,
        sizer: Sizer<V>,
        on_evict: Option<EvictCallback<K, V>>,
        hash_builder: S,
    ) -> Self {
        Self {
            segment: AgingSegment::with_hasher(
                capacity,
                Policy::Lfuda,
                sizer,
                on_evict,
                hash_builder,
            ),
        }
    }

    /// Adds a value under `key`. Returns `true` iff admission evicted at
    /// least one other item.
    ///
    /// Overwriting a present key counts as a hit and never evicts. A value
    /// whose byte weight exceeds the whole capacity is rejected silently and
    /// the call returns `false`.
    #[inline]
    pub fn set(&mut self, key: K, value: V) -> bool
    where
        K: Clone,
    {
        self.segment.set(key, value)
    }

    /// Returns a reference to the value for `key`, counting a hit and
    /// raising the item's priority.
    ///
    /// The key may be any borrowed form of the cache's key type, but
    /// [`Hash`] and [`Eq`] on the borrowed form *must* match those for the
    /// key type.
    #[inline]
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q> + Clone,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.get(key)
    }

    /// Returns a reference to the value for `key` without counting a hit or
    /// touching priorities.
    #[inline]
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.peek(key)
    }

    /// Returns whether `key` is present, without any side effects.
    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.contains(key)
    }

    /// Removes `key`, returning whether it was present. Invokes the
    /// eviction callback but does not advance the age.
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.remove(key)
    }

    /// Empties the cache, invoking the eviction callback for every live
    /// item, and resets byte load and age to zero.
    #[inline]
    pub fn purge(&mut self) {
        self.segment.purge()
    }

    /// Returns the live keys ordered from highest to lowest priority. Ties
    /// within one bucket come out in arbitrary order.
    #[inline]
    pub fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.segment.keys()
    }

    /// Returns the number of items in the cache.
    #[inline]
    pub fn len(&self) -> usize {
        self.segment.len()
    }

    /// Returns `true` if the cache holds no items.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segment.is_empty()
    }

    /// Returns the current byte load.
    #[inline]
    pub fn size(&self) -> f64 {
        self.segment.size()
    }

    /// Returns the current cache age: the priority key of the most recently
    /// evicted item, or zero if nothing has been evicted since construction
    /// or the last purge.
    #[inline]
    pub fn age(&self) -> f64 {
        self.segment.age()
    }

    /// Returns the byte capacity.
    #[inline]
    pub fn capacity(&self) -> f64 {
        self.segment.capacity()
    }
}

impl<K: Hash + Eq, V, S: BuildHasher + Clone> CacheMetrics for LfudaCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.report()
    }

    fn algorithm_name(&self) -> &'static str {
        self.segment.policy().name()
    }
}

impl<K, V, S> fmt::Debug for LfudaCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfudaCache")
            .field("segment", &self.segment)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use alloc::boxed::Box;
    use alloc::string::{String, ToString};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_lfuda_basic() {
        let mut cache = LfudaCache::new(10.0);

        assert!(!cache.set("a", "a"));
        assert_eq!(cache.get(&"a"), Some(&"a"));
        assert_eq!(cache.len(), 1);

        assert!(!cache.set("b", "b"));
        assert_eq!(cache.get(&"b"), Some(&"b"));
        assert_eq!(cache.len(), 2);

        assert!(cache.remove(&"a"));
        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_lfuda_popular_item_survives_eviction() {
        let mut cache: LfudaCache<String, String> = LfudaCache::new(3.0);
        cache.set("a".to_string(), "a".to_string());
        cache.set("b".to_string(), "b".to_string());
        cache.set("c".to_string(), "c".to_string());

        for _ in 0..10 {
            cache.get("a");
        }

        // push twenty one-byte values through the cache; each insert evicts
        // one of the single-hit items while "a" holds its rank
        for round in 0..2 {
            for i in 0..10u32 {
                cache.set(std::format!("{round}-{i}"), i.to_string());
            }
        }

        assert_eq!(cache.age(), 10.0);
        assert!(cache.contains("a"));

        // three more inserts push the floor past "a"
        for i in 0..3u32 {
            cache.set(std::format!("z{i}"), i.to_string());
        }
        assert!(!cache.contains("a"));
    }

    #[test]
    fn test_lfuda_aging_on_eviction() {
        let mut cache = LfudaCache::new(1.0);
        cache.set("1", "1");
        cache.get(&"1"); // hits -> 2

        assert!(cache.set("2", "2"));
        // victim's priority was 2, so that is the new age
        assert_eq!(cache.age(), 2.0);
    }

    #[test]
    fn test_lfuda_overwrite() {
        let mut cache = LfudaCache::new(2.0);
        cache.set("a", "a");
        assert_eq!(cache.get(&"a"), Some(&"a"));

        cache.set("a", "b");
        assert_eq!(cache.get(&"a"), Some(&"b"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_lfuda_keys_by_priority() {
        let mut cache = LfudaCache::new(10.0);
        cache.set("a", "a");
        cache.set("b", "b");
        cache.set("c", "c");
        for _ in 0..3 {
            cache.get(&"c");
        }
        cache.get(&"b");

        let keys = cache.keys();
        assert_eq!(keys[0], "c");
        assert_eq!(keys[2], "a");
    }

    #[test]
    fn test_lfuda_evict_callback_counts() {
        let evictions = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&evictions);
        let on_evict: EvictCallback<String, String> = Box::new(move |_key, _value| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let mut cache = LfudaCache::with_evict(4.0, Some(on_evict));
        for i in 0..10 {
            cache.set(i.to_string(), i.to_string());
        }

        let kept = cache.len();
        assert_eq!(evictions.load(Ordering::SeqCst), 10 - kept);

        cache.purge();
        assert_eq!(evictions.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn test_lfuda_from_config_initial_age() {
        let config = LfudaCacheConfig::new(10.0).with_initial_age(4.0);
        let mut cache: LfudaCache<&str, &str> = LfudaCache::from_config(config, None);

        assert_eq!(cache.age(), 4.0);
        cache.set("a", "a");
        // first increment lands at 1 hit + age 4
        assert_eq!(cache.keys(), ["a"]);
    }

    #[test]
    fn test_lfuda_metrics_report() {
        let mut cache = LfudaCache::new(4.0);
        cache.set("a", "a");
        cache.get(&"a");
        cache.get(&"missing");

        let report = cache.metrics();
        assert_eq!(report["requests"], 2.0);
        assert_eq!(report["cache_hits"], 1.0);
        assert_eq!(report["cache_size_bytes"], 1.0);
        assert_eq!(cache.algorithm_name(), "LFUDA");
    }

    #[test]
    #[should_panic(expected = "capacity must be a positive number of bytes")]
    fn test_lfuda_negative_capacity_rejected() {
        let _: LfudaCache<&str, &str> = LfudaCache::new(-1.0);
    }
}
