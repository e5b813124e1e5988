//! GDSF correctness tests.
//!
//! End-to-end behavior of the size-aware policy: the size penalty in the
//! priority key, hits buying rank back, and parity of the operation surface
//! with the LFUDA cache.

use lfuda::{EvictCallback, GdsfCache};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn test_size_penalized_item_ages_out() {
    let mut cache: GdsfCache<String, String> = GdsfCache::new(10.0);

    cache.set("a".into(), "aaaaaaaa".into()); // 8 bytes
    cache.set("b".into(), "b".into());
    cache.set("c".into(), "c".into());
    assert_eq!(cache.size(), 10.0);

    // ten hits only lift "a" to 10/8 + age; the floor catches up fast
    for _ in 0..10 {
        cache.get("a");
    }

    for i in 0..10u32 {
        cache.set(format!("k{i}"), "v".into());
    }
    assert!(!cache.contains("a"));
}

#[test]
fn test_enough_hits_retain_a_large_item() {
    let mut cache: GdsfCache<String, String> = GdsfCache::new(10.0);

    cache.set("a".into(), "aaaaaaaa".into());
    // fifty hits put "a" at 51/8 above the near-term floor
    for _ in 0..50 {
        cache.get("a");
    }

    for i in 0..10u32 {
        cache.set(format!("k{i}"), "v".into());
    }
    assert!(cache.contains("a"));

    // another ten one-byte admissions push the floor past hits/size
    for i in 10..20u32 {
        cache.set(format!("k{i}"), "v".into());
    }
    assert!(!cache.contains("a"));
}

#[test]
fn test_small_items_outrank_equal_hit_large_items() {
    let mut cache = GdsfCache::new(10.0);
    cache.set("large", "aaaaaaaa");
    cache.set("b", "b");
    cache.set("c", "c");

    let keys = cache.keys();
    // 1/1 beats 1/8: both small items come before the large one
    assert_eq!(keys[2], "large");
}

#[test]
fn test_admission_evicts_lowest_priority_first() {
    let mut cache = GdsfCache::new(10.0);
    cache.set("large", "aaaaaaaa");
    cache.set("b", "b");
    cache.set("c", "c");

    assert!(cache.set("d", "d"));
    assert!(!cache.contains(&"large"));
    assert!(cache.contains(&"b"));
    assert!(cache.contains(&"c"));
    assert!(cache.contains(&"d"));
}

#[test]
fn test_too_big_value_rejected_silently() {
    let mut cache = GdsfCache::new(4.0);
    cache.set("a", "a");

    assert!(!cache.set("big", "elephant"));
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.size(), 1.0);
    assert_eq!(cache.age(), 0.0);
}

#[test]
fn test_peek_and_contains_do_not_save_items() {
    let mut cache = GdsfCache::new(2.0);
    cache.set("a", "a");
    cache.set("b", "b");
    cache.get(&"a");

    for _ in 0..10 {
        assert_eq!(cache.peek(&"b"), Some(&"b"));
        assert!(cache.contains(&"b"));
    }

    assert!(cache.set("c", "c"));
    assert!(!cache.contains(&"b"));
}

#[test]
fn test_purge_resets_everything() {
    let mut cache: GdsfCache<String, String> = GdsfCache::new(10.0);
    cache.set("a".into(), "aaaa".into());
    cache.set("b".into(), "b".into());
    cache.get("a");

    cache.purge();
    assert_eq!(cache.len(), 0);
    assert_eq!(cache.size(), 0.0);
    assert_eq!(cache.age(), 0.0);
    assert!(cache.keys().is_empty());
    assert_eq!(cache.get("a"), None);
}

#[test]
fn test_eviction_callback_counts_departures() {
    let evictions = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&evictions);
    let on_evict: EvictCallback<String, String> = Box::new(move |_key, _value| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let mut cache = GdsfCache::with_evict(4.0, Some(on_evict));
    for i in 0..10 {
        cache.set(i.to_string(), "x".to_string());
    }

    let kept = cache.len();
    assert_eq!(evictions.load(Ordering::SeqCst), 10 - kept);
}

#[test]
fn test_custom_sizer_drives_admission() {
    let mut cache: GdsfCache<&str, Vec<u8>> =
        GdsfCache::with_sizer(100.0, |value| value.len() as f64);

    cache.set("a", vec![0u8; 60]);
    cache.set("b", vec![0u8; 30]);
    assert_eq!(cache.size(), 90.0);

    // 20 more bytes need room; the barely-hit 60-byte item is the cheapest
    assert!(cache.set("c", vec![0u8; 20]));
    assert!(!cache.contains(&"a"));
    assert_eq!(cache.size(), 50.0);
}

#[test]
fn test_remove_subtracts_size_without_aging() {
    let mut cache = GdsfCache::new(10.0);
    cache.set("a", "aaaa");
    cache.set("b", "b");

    assert!(cache.remove(&"a"));
    assert_eq!(cache.size(), 1.0);
    assert_eq!(cache.age(), 0.0);
    assert!(!cache.remove(&"a"));
}
