//! Thread-safe cache wrappers.
//!
//! Each wrapper owns its engine behind a single `parking_lot::RwLock`. The
//! lock is deliberately singular: the aging engine keeps global state (the
//! cache age and the byte load), so the key space cannot be sharded without
//! changing the algorithm's behavior.
//!
//! # Lock policy
//!
//! | Exclusive lock | Shared lock |
//! |----------------|-------------|
//! | `set`, `get`, `remove`, `purge`, `contains_or_set`, `peek_or_set` | `contains`, `peek`, `keys`, `len`, `is_empty`, `size`, `age` |
//!
//! `get` takes the exclusive lock because a hit mutates the index: it raises
//! the item's hit count and moves it between buckets. The compound
//! operations `contains_or_set` and `peek_or_set` hold one exclusive lock
//! across the presence check and the insert, so the check-then-set is atomic
//! with respect to other callers.
//!
//! The eviction callback runs while the exclusive lock is held. A callback
//! that calls back into the same cache will deadlock; not re-entering is the
//! caller's responsibility.
//!
//! No operation suspends or yields; every call runs to completion on the
//! caller's thread.
//!
//! # Example
//!
//! ```
//! use lfuda::concurrent::ConcurrentLfudaCache;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let cache: Arc<ConcurrentLfudaCache<String, String>> =
//!     Arc::new(ConcurrentLfudaCache::new(1024.0));
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|t| {
//!         let cache = Arc::clone(&cache);
//!         thread::spawn(move || {
//!             for i in 0..100 {
//!                 let key = format!("key_{t}_{i}");
//!                 cache.set(key.clone(), i.to_string());
//!                 let _ = cache.get(&key);
//!             }
//!         })
//!     })
//!     .collect();
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! ```

mod gdsf;
mod lfuda;

pub use self::gdsf::ConcurrentGdsfCache;
pub use self::lfuda::ConcurrentLfudaCache;
