//! Greedy Dual-Size with Frequency (GDSF) cache implementation.
//!
//! GDSF is the size-aware sibling of LFUDA: the priority key divides the hit
//! count by the item's byte weight before adding the global age,
//!
//! ```text
//! priority = hits / size + age
//! ```
//!
//! so a large item must earn proportionally more hits to keep its rank. An
//! eight-byte value needs roughly eight hits for every one hit a one-byte
//! value gets, or the advancing age will walk past it. This makes GDSF the
//! right choice for caching variable-sized objects (documents, images, API
//! responses) where byte budget, not entry count, is the scarce resource.
//!
//! Aging, admission, and the byte-bounded eviction loop are identical to
//! [`LfudaCache`](crate::LfudaCache); the two share one engine and differ
//! only in the priority formula.
//!
//! # Thread Safety
//!
//! `GdsfCache` is not thread-safe. Use
//! [`ConcurrentGdsfCache`](crate::concurrent::ConcurrentGdsfCache)
//! (requires the `concurrent` feature) or wrap it in a lock yourself.

extern crate alloc;

use crate::config::GdsfCacheConfig;
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

/// A byte-bounded GDSF cache.
///
/// # Examples
///
/// ```
/// use lfuda::GdsfCache;
///
/// let mut cache = GdsfCache::new(10.0);
///
/// cache.set("large", "aaaaaaaa"); // 8 bytes: priority 1/8
/// cache.set("b", "b");            // 1 byte:  priority 1
/// cache.set("c", "c");
///
/// cache.set("d", "d"); // needs room; the size-penalized item goes first
/// assert!(!cache.contains(&"large"));
/// ```
pub struct GdsfCache<K, V, S = DefaultHashBuilder> {
    segment: AgingSegment<K, V, S>,
}

impl<K: Hash + Eq, V: fmt::Display> GdsfCache<K, V> {
    /// Creates a GDSF cache with the given byte capacity, weighing values
    /// by their `Display` rendering.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is not positive.
    pub fn new(capacity: f64) -> Self {
        Self::with_evict(capacity, None)
    }

    /// Creates a GDSF cache with an eviction callback, invoked with key and
    /// value for every item that leaves through eviction, removal, or purge.
    pub fn with_evict(capacity: f64, on_evict: Option<EvictCallback<K, V>>) -> Self {
        Self::with_hasher(
            capacity,
            display_size,
            on_evict,
            DefaultHashBuilder::default(),
        )
    }

    /// Creates a GDSF cache from a config, honoring its starting age.
    pub fn from_config(config: GdsfCacheConfig, on_evict: Option<EvictCallback<K, V>>) -> Self {
        let mut cache = Self::with_evict(config.capacity(), on_evict);
        cache.segment.set_initial_age(config.initial_age());
        cache
    }
}

impl<K: Hash + Eq, V> GdsfCache<K, V> {
    /// Creates a GDSF cache with a custom byte-weight function.
    ///
    /// The weight both counts against the capacity and divides the hit count
    /// in the priority formula, so it must be deterministic. A sizer that
    /// reports zero makes the item's priority infinite; prefer weights of at
    /// least one byte.
    pub fn with_sizer(capacity: f64, sizer: Sizer<V>) -> Self {
        Self::with_sizer_and_evict(capacity, sizer, None)
    }

    /// Creates a GDSF cache with a custom sizer and an eviction callback.
    pub fn with_sizer_and_evict(
        capacity: f64,
        sizer: Sizer<V>,
        on_evict: Option<EvictCallback<K, V>>,
    ) -> Self {
        Self::with_hasher(capacity, sizer, on_evict, DefaultHashBuilder::default())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher + Clone> GdsfCache<K, V, S> {
    /// Creates a GDSF cache with a custom hash builder.
    pub fn with_hasher(
        capacity: f64,
        sizer: Sizer<V>,
        on_evict: Option<EvictCallback<K, V>>,
        hash_builder: S,
    ) -> Self {
        Self {
            segment: AgingSegment::with_hasher(
                capacity,
                Policy::Gdsf,
                sizer,
                on_evict,
                hash_builder,
            ),
        }
    }

    /// Adds a value under `key`. Returns `true` iff admission evicted at
    /// least one other item.
    ///
    /// Overwriting a present key counts as a hit, keeps the admission-time
    /// byte weight, and never evicts. A value whose byte weight exceeds the
    /// whole capacity is rejected silently and the call returns `false`.
    #[inline]
    pub fn set(&mut self, key: K, value: V) -> bool
    where
        K: Clone,
    {
        self.segment.set(key, value)
    }

    /// Returns a reference to the value for `key`, counting a hit and
    /// raising the item's priority.
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

    /// Returns the current cache age.
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

impl<K: Hash + Eq, V, S: BuildHasher + Clone> CacheMetrics for GdsfCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.report()
    }

    fn algorithm_name(&self) -> &'static str {
        self.segment.policy().name()
    }
}

impl<K, V, S> fmt::Debug for GdsfCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GdsfCache")
            .field("segment", &self.segment)
            .finish()
    }
}
