//! Aging-engine metrics.
//!
//! One metrics type serves both LFUDA and GDSF: the policies share a single
//! engine and differ only in the priority formula, so the interesting
//! counters (aging events, rejected oversized values) are the same.

extern crate alloc;

use super::{CacheMetrics, CoreCacheMetrics};
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// Metrics for the aging cache engine (extends [`CoreCacheMetrics`]).
#[derive(Debug, Default, Clone)]
pub struct AgingCacheMetrics {
    /// Counters common to all cache flavors.
    pub core: CoreCacheMetrics,

    /// Number of aging events (evictions that advanced the global age).
    pub aging_events: u64,

    /// Global age as of the most recent aging event.
    pub last_age: f64,

    /// Values rejected outright because they exceed the byte capacity.
    pub size_rejections: u64,
}

impl AgingCacheMetrics {
    /// Records an eviction advancing the global age to `age`.
    pub fn record_aging_event(&mut self, age: f64) {
        self.aging_events += 1;
        self.last_age = age;
    }

    /// Records a value rejected for exceeding the cache capacity.
    pub fn record_size_rejection(&mut self) {
        self.size_rejections += 1;
    }

    /// How often evictions advanced the age; 1.0 in this engine unless the
    /// cache has never evicted.
    pub fn aging_effectiveness(&self) -> f64 {
        if self.core.evictions > 0 {
            self.aging_events as f64 / self.core.evictions as f64
        } else {
            0.0
        }
    }

    /// Converts the counters to a `BTreeMap` for reporting.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.core.to_btreemap();

        metrics.insert("aging_events".to_string(), self.aging_events as f64);
        metrics.insert("last_age".to_string(), self.last_age);
        metrics.insert(
            "aging_effectiveness".to_string(),
            self.aging_effectiveness(),
        );
        metrics.insert("size_rejections".to_string(), self.size_rejections as f64);

        metrics
    }
}

impl CacheMetrics for AgingCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "AGING"
    }
}
