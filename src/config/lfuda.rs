//! Configuration for the LFUDA cache.

use core::fmt;

/// Configuration for an LFUDA (Least Frequently Used with Dynamic Aging)
/// cache.
///
/// # Required Parameters
///
/// - `capacity`: byte budget of the cache, set in the constructor. Must be
///   positive.
///
/// # Optional Parameters (Builder Methods)
///
/// - `initial_age`: starting value of the global age (default: 0.0). The age
///   stays monotone from whatever it starts at, so this is mainly useful for
///   carrying an age across cache generations.
///
/// # Examples
///
/// ```
/// use lfuda::config::LfudaCacheConfig;
///
/// let config = LfudaCacheConfig::new(1024.0).with_initial_age(5.0);
/// assert_eq!(config.capacity(), 1024.0);
/// assert_eq!(config.initial_age(), 5.0);
/// ```
#[derive(Clone, Copy)]
pub struct LfudaCacheConfig {
    /// Byte budget of the cache.
    capacity: f64,
    /// Starting value of the global age.
    initial_age: f64,
}

impl LfudaCacheConfig {
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

impl fmt::Debug for LfudaCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfudaCacheConfig")
            .field("capacity", &self.capacity)
            .field("initial_age", &self.initial_age)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lfuda_config_defaults() {
        let config = LfudaCacheConfig::new(100.0);
        assert_eq!(config.capacity(), 100.0);
        assert_eq!(config.initial_age(), 0.0);
    }

    #[test]
    fn test_lfuda_config_builder() {
        let config = LfudaCacheConfig::new(50.0).with_initial_age(12.5);
        assert_eq!(config.capacity(), 50.0);
        assert_eq!(config.initial_age(), 12.5);
    }
}
