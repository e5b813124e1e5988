//! Concurrent GDSF cache.
//!
//! The thread-safe equivalent of [`GdsfCache`](crate::GdsfCache): one
//! engine behind one `parking_lot::RwLock`, with the same lock policy as
//! [`ConcurrentLfudaCache`](super::ConcurrentLfudaCache).

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
use parking_lot::RwLock;

#[cfg(feature = "hashbrown")]
use hashbrown::hash_map::DefaultHashBuilder;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;

/// A thread-safe byte-bounded GDSF cache.
///
/// All methods take `&self`; the cache can be shared across threads via
/// `Arc`.
///
/// # Examples
///
/// ```
/// use lfuda::concurrent::ConcurrentGdsfCache;
///
/// let cache: ConcurrentGdsfCache<&str, &str> = ConcurrentGdsfCache::new(10.0);
/// cache.set("a", "aaaa");
/// assert_eq!(cache.size(), 4.0);
/// ```
pub struct ConcurrentGdsfCache<K, V, S = DefaultHashBuilder> {
    segment: RwLock<AgingSegment<K, V, S>>,
}

impl<K: Hash + Eq, V: fmt::Display> ConcurrentGdsfCache<K, V> {
    /// Creates a concurrent GDSF cache with the given byte capacity,
    /// weighing values by their `Display` rendering.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is not positive.
    pub fn new(capacity: f64) -> Self {
        Self::with_evict(capacity, None)
    }

    /// Creates a concurrent GDSF cache with an eviction callback.
    ///
    /// The callback runs under the exclusive lock and must not call back
    /// into this cache.
    pub fn with_evict(capacity: f64, on_evict: Option<EvictCallback<K, V>>) -> Self {
        Self::with_hasher(
            capacity,
            display_size,
            on_evict,
            DefaultHashBuilder::default(),
        )
    }

    /// Creates a concurrent GDSF cache from a config, honoring its starting
    /// age.
    pub fn from_config(config: GdsfCacheConfig, on_evict: Option<EvictCallback<K, V>>) -> Self {
        let cache = Self::with_evict(config.capacity(), on_evict);
        cache.segment.write().set_initial_age(config.initial_age());
        cache
    }
}

impl<K: Hash + Eq, V> ConcurrentGdsfCache<K, V> {
    /// Creates a concurrent GDSF cache with a custom byte-weight function.
    pub fn with_sizer(capacity: f64, sizer: Sizer<V>) -> Self {
        Self::with_hasher(capacity, sizer, None, DefaultHashBuilder::default())
    }

    /// Creates a concurrent GDSF cache with a custom sizer and an eviction
    /// callback.
    pub fn with_sizer_and_evict(
        capacity: f64,
        sizer: Sizer<V>,
        on_evict: Option<EvictCallback<K, V>>,
    ) -> Self {
        Self::with_hasher(capacity, sizer, on_evict, DefaultHashBuilder::default())
    }
}

impl<K, V, S> ConcurrentGdsfCache<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Clone,
{
    /// Creates a concurrent GDSF cache with a custom hash builder.
    pub fn with_hasher(
        capacity: f64,
        sizer: Sizer<V>,
        on_evict: Option<EvictCallback<K, V>>,
        hash_builder: S,
    ) -> Self {
        Self {
            segment: RwLock::new(AgingSegment::with_hasher(
                capacity,
                Policy::Gdsf,
                sizer,
                on_evict,
                hash_builder,
            )),
        }
    }

    /// Adds a value under `key`. Returns `true` iff admission evicted at
    /// least one other item. Exclusive lock.
    pub fn set(&self, key: K, value: V) -> bool
    where
        K: Clone,
    {
        self.segment.write().set(key, value)
    }

    /// Returns a clone of the value for `key`, counting a hit. Exclusive
    /// lock, because a hit re-buckets the item.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q> + Clone,
        V: Clone,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.write().get(key).cloned()
    }

    /// Returns a clone of the value for `key` without counting a hit.
    /// Shared lock.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        V: Clone,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.read().peek(key).cloned()
    }

    /// Returns whether `key` is present. Shared lock, no side effects.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.read().contains(key)
    }

    /// Checks presence and, only if absent, inserts the value, atomically
    /// under one exclusive lock. Returns `(already_present, evicted)`.
    pub fn contains_or_set(&self, key: K, value: V) -> (bool, bool)
    where
        K: Clone,
    {
        let mut segment = self.segment.write();
        if segment.contains(&key) {
            (true, false)
        } else {
            let evicted = segment.set(key, value);
            (false, evicted)
        }
    }

    /// Peeks at `key` and, only if absent, inserts the value, atomically
    /// under one exclusive lock. Returns
    /// `(previous_value, already_present, evicted)`.
    pub fn peek_or_set(&self, key: K, value: V) -> (Option<V>, bool, bool)
    where
        K: Clone,
        V: Clone,
    {
        let mut segment = self.segment.write();
        if let Some(previous) = segment.peek(&key) {
            (Some(previous.clone()), true, false)
        } else {
            let evicted = segment.set(key, value);
            (None, false, evicted)
        }
    }

    /// Removes `key`, returning whether it was present. Exclusive lock.
    pub fn remove<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.write().remove(key)
    }

    /// Empties the cache and resets byte load and age. Exclusive lock.
    pub fn purge(&self) {
        self.segment.write().purge()
    }

    /// Returns the live keys ordered from highest to lowest priority.
    /// Shared lock.
    pub fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.segment.read().keys()
    }

    /// Returns the number of items in the cache. Shared lock.
    pub fn len(&self) -> usize {
        self.segment.read().len()
    }

    /// Returns `true` if the cache holds no items. Shared lock.
    pub fn is_empty(&self) -> bool {
        self.segment.read().is_empty()
    }

    /// Returns the current byte load. Shared lock.
    pub fn size(&self) -> f64 {
        self.segment.read().size()
    }

    /// Returns the current cache age. Shared lock.
    pub fn age(&self) -> f64 {
        self.segment.read().age()
    }

    /// Returns the byte capacity.
    pub fn capacity(&self) -> f64 {
        self.segment.read().capacity()
    }
}

impl<K, V, S> CacheMetrics for ConcurrentGdsfCache<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Clone,
{
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.read().report()
    }

    fn algorithm_name(&self) -> &'static str {
        "ConcurrentGDSF"
    }
}

impl<K, V, S> fmt::Debug for ConcurrentGdsfCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcurrentGdsfCache")
            .field("segment", &*self.segment.read())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use alloc::string::ToString;
    use std::sync::Arc;
    use std::thread;
    use std::vec::Vec;

    #[test]
    fn test_basic_operations() {
        let cache: ConcurrentGdsfCache<String, String> = ConcurrentGdsfCache::new(100.0);

        cache.set("a".to_string(), "aa".to_string());
        cache.set("b".to_string(), "b".to_string());

        assert_eq!(cache.get("a"), Some("aa".to_string()));
        assert_eq!(cache.size(), 3.0);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_size_penalty_under_lock() {
        let cache: ConcurrentGdsfCache<&str, &str> = ConcurrentGdsfCache::new(10.0);
        cache.set("large", "aaaaaaaa");
        cache.set("b", "b");
        cache.set("c", "c");

        cache.set("d", "d");
        assert!(!cache.contains(&"large"));
        assert!(cache.contains(&"d"));
    }

    #[test]
    fn test_compound_operations() {
        let cache: ConcurrentGdsfCache<i32, i32> = ConcurrentGdsfCache::new(2.0);
        cache.set(1, 1);
        cache.set(2, 2);

        let (present, evicted) = cache.contains_or_set(1, 1);
        assert!(present && !evicted);

        let (previous, present, evicted) = cache.peek_or_set(3, 3);
        assert_eq!(previous, None);
        assert!(!present);
        assert!(evicted);
    }

    #[test]
    fn test_concurrent_access() {
        let cache: Arc<ConcurrentGdsfCache<String, String>> =
            Arc::new(ConcurrentGdsfCache::new(5_000.0));
        let num_threads = 4;
        let ops_per_thread = 200usize;

        let mut handles: Vec<thread::JoinHandle<()>> = Vec::new();
        for t in 0..num_threads {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                for i in 0..ops_per_thread {
                    let key = std::format!("key_{t}_{i}");
                    // vary value sizes so the size penalty is exercised
                    let value = "x".repeat((i % 10) + 1);
                    cache.set(key.clone(), value);
                    let _ = cache.get(&key);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(!cache.is_empty());
        assert!(cache.size() <= cache.capacity());
    }

    #[test]
    fn test_algorithm_name() {
        let cache: ConcurrentGdsfCache<String, i32> = ConcurrentGdsfCache::new(10.0);
        assert_eq!(cache.algorithm_name(), "ConcurrentGDSF");
    }
}
