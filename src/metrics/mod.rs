//! Cache metrics.
//!
//! In-crate accounting for cache behavior: request and hit counters, byte
//! totals, and the aging-engine specifics. Reporting goes through
//! [`CacheMetrics::metrics`], which returns a `BTreeMap` so keys always come
//! out in the same order; reproducible output matters more here than the
//! difference between O(1) and O(log n) over a dozen keys.
//!
//! There is no exporter and no external metrics surface; these counters are
//! read through the cache types themselves.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

pub mod aging;

pub use aging::AgingCacheMetrics;

/// Counters common to every cache flavor in this crate.
#[derive(Debug, Default, Clone)]
pub struct CoreCacheMetrics {
    /// Total lookups (`get` calls).
    pub requests: u64,

    /// Lookups that found their key.
    pub cache_hits: u64,

    /// Items evicted to make room for an admission.
    pub evictions: u64,

    /// Items admitted into the cache.
    pub insertions: u64,

    /// Bytes served from the cache on hits.
    pub bytes_served_from_cache: f64,

    /// Bytes written into the cache by admissions.
    pub bytes_written_to_cache: f64,
}

impl CoreCacheMetrics {
    /// Records a lookup that found its key.
    pub fn record_hit(&mut self, object_size: f64) {
        self.requests += 1;
        self.cache_hits += 1;
        self.bytes_served_from_cache += object_size;
    }

    /// Records a lookup that missed. Misses are also derivable as
    /// `requests - cache_hits`.
    pub fn record_miss(&mut self) {
        self.requests += 1;
    }

    /// Records an admission of `object_size` bytes.
    pub fn record_insertion(&mut self, object_size: f64) {
        self.insertions += 1;
        self.bytes_written_to_cache += object_size;
    }

    /// Records one capacity eviction.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Hit ratio over all requests, 0.0 when nothing was requested.
    pub fn hit_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_hits as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Miss ratio over all requests, 0.0 when nothing was requested.
    pub fn miss_rate(&self) -> f64 {
        if self.requests > 0 {
            (self.requests - self.cache_hits) as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Converts the counters to a `BTreeMap` for reporting.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        metrics.insert("requests".to_string(), self.requests as f64);
        metrics.insert("cache_hits".to_string(), self.cache_hits as f64);
        metrics.insert(
            "cache_misses".to_string(),
            (self.requests - self.cache_hits) as f64,
        );
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert("insertions".to_string(), self.insertions as f64);

        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());

        metrics.insert(
            "bytes_served_from_cache".to_string(),
            self.bytes_served_from_cache,
        );
        metrics.insert(
            "bytes_written_to_cache".to_string(),
            self.bytes_written_to_cache,
        );

        if self.requests > 0 {
            metrics.insert(
                "eviction_rate".to_string(),
                self.evictions as f64 / self.requests as f64,
            );
        }

        metrics
    }
}

/// Uniform metrics-reporting interface implemented by every cache type.
pub trait CacheMetrics {
    /// Returns all metrics as key-value pairs in deterministic order.
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Algorithm name for identification (e.g. "LFUDA", "GDSF").
    fn algorithm_name(&self) -> &'static str;
}
