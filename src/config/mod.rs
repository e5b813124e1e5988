//! Cache configuration.
//!
//! Small value-type configs for the two cache flavors. Each cache can be
//! built directly from a byte capacity (`new`) or from a config
//! (`from_config`) when the starting age needs to be set, e.g. when carrying
//! an age over from a previous cache generation.
//!
//! # Examples
//!
//! ```
//! use lfuda::config::LfudaCacheConfig;
//! use lfuda::LfudaCache;
//!
//! let config = LfudaCacheConfig::new(64.0 * 1024.0).with_initial_age(10.0);
//! let cache: LfudaCache<String, String> = LfudaCache::from_config(config, None);
//! assert_eq!(cache.age(), 10.0);
//! ```

pub mod gdsf;
pub mod lfuda;

pub use gdsf::GdsfCacheConfig;
pub use lfuda::LfudaCacheConfig;
