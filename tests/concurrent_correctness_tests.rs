//! Concurrent cache correctness tests.
//!
//! These tests exercise the single-lock wrappers: the atomic compound
//! operations, the lock policy's observable behavior (shared-lock reads are
//! side-effect free), and state consistency under multi-threaded access.

#![cfg(feature = "concurrent")]

use lfuda::metrics::CacheMetrics;
use lfuda::{ConcurrentGdsfCache, ConcurrentLfudaCache, EvictCallback};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

#[test]
fn test_steady_state_fill_with_evict_callback() {
    let evictions = Arc::new(AtomicUsize::new(0));
    let mismatches = Arc::new(AtomicUsize::new(0));
    let eviction_counter = Arc::clone(&evictions);
    let mismatch_counter = Arc::clone(&mismatches);
    let on_evict: EvictCallback<i32, i32> = Box::new(move |key, value| {
        if key != value {
            mismatch_counter.fetch_add(1, Ordering::SeqCst);
        }
        eviction_counter.fetch_add(1, Ordering::SeqCst);
    });

    let cache: ConcurrentLfudaCache<i32, i32> = ConcurrentLfudaCache::with_evict(666.0, Some(on_evict));

    for i in 100..1000 {
        cache.set(i, i);
    }

    // three-byte renderings into a 666-byte budget
    assert_eq!(cache.len(), 222);
    assert_eq!(cache.keys().len(), 222);
    assert_eq!(evictions.load(Ordering::SeqCst), 900 - 222);
    assert_eq!(mismatches.load(Ordering::SeqCst), 0);

    // every reported key is really there
    for key in cache.keys() {
        assert_eq!(cache.get(&key), Some(key));
    }

    // the early keys were inserted before the cache aged and are long gone
    for i in 100..765 {
        assert!(cache.get(&i).is_none());
    }

    cache.purge();
    assert_eq!(cache.len(), 0);
    assert!(cache.get(&900).is_none());
    assert_eq!(cache.age(), 0.0);
}

#[test]
fn test_set_reports_evictions() {
    let evictions = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&evictions);
    let on_evict: EvictCallback<i32, i32> = Box::new(move |_key, _value| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let cache: ConcurrentLfudaCache<i32, i32> = ConcurrentLfudaCache::with_evict(1.0, Some(on_evict));

    assert!(!cache.set(1, 1));
    assert_eq!(evictions.load(Ordering::SeqCst), 0);

    assert!(cache.set(2, 2));
    assert_eq!(evictions.load(Ordering::SeqCst), 1);
}

#[test]
fn test_contains_or_set_is_side_effect_free_when_present() {
    let cache: ConcurrentLfudaCache<i32, i32> = ConcurrentLfudaCache::new(2.0);
    cache.set(1, 1);
    cache.set(2, 2);

    let (present, evicted) = cache.contains_or_set(1, 1);
    assert!(present);
    assert!(!evicted);

    let (present, evicted) = cache.contains_or_set(3, 3);
    assert!(!present);
    assert!(evicted);
}

#[test]
fn test_peek_or_set_returns_previous_value() {
    let cache: ConcurrentLfudaCache<i32, i32> = ConcurrentLfudaCache::new(2.0);
    cache.set(1, 1);
    cache.set(2, 2);

    let (previous, present, evicted) = cache.peek_or_set(1, 1);
    assert_eq!(previous, Some(1));
    assert!(present);
    assert!(!evicted);

    let (previous, present, evicted) = cache.peek_or_set(3, 3);
    assert_eq!(previous, None);
    assert!(!present);
    assert!(evicted);

    cache.get(&3);
    let (previous, present, evicted) = cache.peek_or_set(3, 30);
    assert_eq!(previous, Some(3));
    assert!(present);
    assert!(!evicted);
}

#[test]
fn test_contains_does_not_update_priority() {
    let cache: ConcurrentLfudaCache<i32, i32> = ConcurrentLfudaCache::new(2.0);
    cache.set(1, 1);
    cache.set(2, 2);

    for _ in 0..10 {
        cache.get(&1);
    }
    assert_eq!(cache.keys()[0], 1);

    for _ in 0..20 {
        cache.contains(&2);
    }
    assert_eq!(cache.keys()[0], 1);
}

#[test]
fn test_peek_does_not_update_priority() {
    let cache: ConcurrentLfudaCache<i32, i32> = ConcurrentLfudaCache::new(2.0);
    cache.set(1, 1);
    cache.set(2, 2);
    assert_eq!(cache.peek(&1), Some(1));

    cache.get(&2);
    cache.set(3, 3); // evicts 1: its peeks earned it nothing
    assert!(!cache.contains(&1));
}

#[test]
fn test_remove_under_lock() {
    let cache: ConcurrentLfudaCache<i32, i32> = ConcurrentLfudaCache::new(2.0);
    cache.set(1, 1);
    cache.set(2, 2);
    assert_eq!(cache.get(&1), Some(1));

    assert!(cache.remove(&1));
    assert!(!cache.remove(&1));
    assert!(cache.get(&1).is_none());
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_multithreaded_writes_keep_invariants() {
    let cache: Arc<ConcurrentLfudaCache<String, i32>> =
        Arc::new(ConcurrentLfudaCache::new(256.0));
    let threads = 8;
    let ops = 500;

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..ops {
                    let key = format!("{t}:{i}");
                    cache.set(key.clone(), i);
                    let _ = cache.get(&key);
                    if i % 7 == 0 {
                        cache.remove(&key);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(cache.size() <= cache.capacity());
    assert_eq!(cache.keys().len(), cache.len());
}

#[test]
fn test_multithreaded_compound_operations() {
    let cache: Arc<ConcurrentLfudaCache<i32, i32>> = Arc::new(ConcurrentLfudaCache::new(64.0));
    let threads = 4;

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..100 {
                    let (_present, _evicted) = cache.contains_or_set(i % 16, i);
                    let (_prev, _present, _evicted) = cache.peek_or_set(i % 16, i);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(cache.len() <= 16);
    assert!(cache.size() <= cache.capacity());
}

#[test]
fn test_gdsf_wrapper_size_penalty() {
    let cache: ConcurrentGdsfCache<&str, &str> = ConcurrentGdsfCache::new(10.0);
    cache.set("large", "aaaaaaaa");
    cache.set("b", "b");
    cache.set("c", "c");

    assert!(cache.set("d", "d"));
    assert!(!cache.contains(&"large"));
}

#[test]
fn test_gdsf_wrapper_multithreaded() {
    let cache: Arc<ConcurrentGdsfCache<String, String>> =
        Arc::new(ConcurrentGdsfCache::new(2_000.0));
    let threads = 4;

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..200usize {
                    let key = format!("{t}:{i}");
                    cache.set(key.clone(), "x".repeat(i % 32 + 1));
                    let _ = cache.peek(&key);
                    let _ = cache.get(&key);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(cache.size() <= cache.capacity());
    assert_eq!(cache.keys().len(), cache.len());
}

#[test]
fn test_metrics_reporting_through_wrapper() {
    let cache: ConcurrentLfudaCache<&str, &str> = ConcurrentLfudaCache::new(8.0);
    cache.set("a", "a");
    cache.get(&"a");
    cache.get(&"missing");

    let report = cache.metrics();
    assert_eq!(report["requests"], 2.0);
    assert_eq!(report["cache_hits"], 1.0);
    assert_eq!(cache.algorithm_name(), "ConcurrentLFUDA");
}
