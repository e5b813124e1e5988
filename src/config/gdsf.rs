//! Configuration for the GDSF cache.

use core::fmt;

/// Configuration for a GDSF (Greedy Dual-Size with Frequency) cache.
///
/// GDSF folds the byte weight into the priority key
/// (`hits / size + age`), so on top of the byte budget the weight also
/// decides how many hits an item needs to keep its rank.
///
/// # Examples
///
/// ```
/// use lfuda::config::GdsfCacheConfig;
///
/// let config = GdsfCacheConfig::new(10.0 * 1024.0 * 1024.0);
/// assert_eq!(config.initial_age(), 0.0);
/// ```
#[derive(Clone, Copy)]
pub struct GdsfCacheConfig {
    /// Byte budget of the cache.
    capacity: f64,
    /// Starting value of the global age.
    initial_age: f64,
}

impl GdsfCacheConfig {
    /// Creates a configuration with the given byte capacity and an initial
    /// age of zero.
    #[must_use]
    pub fn new(capacity: f64) -> Self {
        Self {
            capacity,
            initial_age: 0.0,
        }
    }

    /// Sets the starting value of the global age.
    #[must_use]
    pub fn with_initial_age(mut self, initial_age: f64) -> Self {
        self.initial_age = initial_age;
        self
    }

    /// Returns the byte capacity.
    #[inline]
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Returns the starting age.
    #[inline]
    pub fn initial_age(&self) -> f64 {
        self.initial_age
    }
}

impl fmt::Debug for GdsfCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GdsfCacheConfig")
            .field("capacity", &self.capacity)
            .field("initial_age", &self.initial_age)
            .finish()
    }
}
