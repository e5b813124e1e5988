#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Quick Reference
//!
//! | Type | Description | Best Use Case |
//! |------|-------------|---------------|
//! | [`LfudaCache`] | LFU with Dynamic Aging | Evolving popularity, uniform sizes |
//! | [`GdsfCache`] | Greedy Dual-Size with Frequency | CDNs, variable-sized objects |
//! | `ConcurrentLfudaCache` | Single-lock thread-safe LFUDA | Shared caches across threads |
//! | `ConcurrentGdsfCache` | Single-lock thread-safe GDSF | Shared size-aware caches |
//!
//! ## Operation Surface
//!
//! | Operation | Mutates | Returns |
//! |-----------|---------|---------|
//! | `set(k, v)` | yes (hit on overwrite, may evict on insert) | `evicted: bool` |
//! | `get(&k)` | yes (hit) | `Option<&V>` |
//! | `peek(&k)` | no | `Option<&V>` |
//! | `contains(&k)` | no | `bool` |
//! | `remove(&k)` | yes (no aging) | `present: bool` |
//! | `purge()` | yes (resets age) | nothing |
//! | `keys()` | no | `Vec<K>`, highest priority first |
//! | `len()` / `size()` / `age()` | no | count / bytes / age |
//!
//! ## How Aging Works
//!
//! ```text
//! set("a"); set("b"); set("c")        age 0     a:1  b:1  c:1
//! get("a"); get("a")                  age 0     a:3  b:1  c:1
//! set("d")  -> evicts b or c          age 1     d enters at 1 + age = 2
//! set("e")  -> evicts the other      age 1     e enters at 2
//! ...the floor keeps rising; "a" must keep earning hits to stay ahead
//! ```
//!
//! ## Example
//!
//! ```rust
//! use lfuda::LfudaCache;
//!
//! let mut cache = LfudaCache::new(64.0);
//! cache.set("config", "{\"debug\":false}");
//!
//! assert_eq!(cache.get(&"config"), Some(&"{\"debug\":false}"));
//! assert_eq!(cache.peek(&"config"), Some(&"{\"debug\":false}")); // no hit
//! assert!(cache.remove(&"config"));
//! assert!(cache.is_empty());
//! ```
//!
//! ## Modules
//!
//! - [`lfuda`]: LFUDA cache implementation
//! - [`gdsf`]: GDSF cache implementation
//! - [`policy`]: the two priority-key formulas
//! - [`config`]: configuration structures
//! - [`metrics`]: in-crate cache metrics
//! - [`concurrent`]: single-lock thread-safe wrappers (requires the
//!   `concurrent` feature)

#![no_std]

extern crate alloc;

#[cfg(any(test, not(feature = "hashbrown")))]
extern crate std;

/// Item record and priority bucket.
///
/// The per-key record (value, byte weight, hits, priority key, bucket
/// back-reference) and the member set that forms one node of the bucket
/// chain.
pub(crate) mod entry;

/// Doubly linked bucket chain.
///
/// Internal infrastructure: an ordered chain with O(1) cursor insertion and
/// removal, built on raw pointers with sentinel nodes. Not part of the
/// public API.
pub(crate) mod list;

/// Aging eviction policies (LFUDA and GDSF priority formulas).
pub mod policy;

/// Shared aging cache engine behind both cache types.
pub(crate) mod segment;

/// Cache configuration structures.
pub mod config;

/// Least Frequently Used with Dynamic Aging (LFUDA) cache.
///
/// Priority = hits + age. The global age advances to the victim's priority
/// on every eviction, so stale but once-popular items eventually yield.
pub mod lfuda;

/// Greedy Dual-Size with Frequency (GDSF) cache.
///
/// Priority = hits / size + age. The size-aware variant: large items must
/// earn proportionally more hits to keep their bytes.
pub mod gdsf;

/// Cache metrics.
///
/// In-crate counters with deterministic `BTreeMap` reporting. No exporter.
pub mod metrics;

/// Thread-safe cache wrappers.
///
/// One `parking_lot::RwLock` around the engine; mutating operations
/// (including `get`, which counts a hit) take it exclusively, pure reads
/// share it. Available with the `concurrent` feature.
#[cfg(feature = "concurrent")]
pub mod concurrent;

// Re-export cache types
pub use gdsf::GdsfCache;
pub use lfuda::LfudaCache;

// Re-export the policy selector and the sizing/callback surface
pub use policy::Policy;
pub use segment::{display_size, EvictCallback, Sizer};

#[cfg(feature = "concurrent")]
pub use concurrent::{ConcurrentGdsfCache, ConcurrentLfudaCache};
