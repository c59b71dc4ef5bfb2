use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::cache::bounded::BoundedCache;
use crate::cache::stats::CacheStats;
use crate::clock::{Clock, SystemClock};
use crate::error::ConfigError;

/// Thread-safe handle to a [`BoundedCache`].
///
/// Clones share the same cache. `get` updates recency, so it takes the write
/// lock and returns a clone of the value; `peek`, `contains` and `stats` only
/// take the read lock.
///
/// # Example
///
/// ```
/// use perfkit::cache::ConcurrentBoundedCache;
/// use std::thread;
///
/// let cache = ConcurrentBoundedCache::try_new(100).unwrap();
/// let writer = cache.clone();
///
/// thread::spawn(move || {
///     writer.set(1u64, "field-7".to_string());
/// })
/// .join()
/// .unwrap();
///
/// assert_eq!(cache.get(&1), Some("field-7".to_string()));
/// ```
pub struct ConcurrentBoundedCache<K, V, C = SystemClock> {
    inner: Arc<RwLock<BoundedCache<K, V, C>>>,
}

impl<K, V, C> Clone for ConcurrentBoundedCache<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V, C> fmt::Debug for ConcurrentBoundedCache<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConcurrentBoundedCache")
            .field(&*self.inner.read())
            .finish()
    }
}

impl<K, V> ConcurrentBoundedCache<K, V, SystemClock>
where
    K: Eq + Hash + Clone,
{
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `capacity` is zero.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        BoundedCache::try_new(capacity).map(Self::from_cache)
    }
}

impl<K, V, C> ConcurrentBoundedCache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `capacity` is zero.
    pub fn try_with_clock(capacity: usize, clock: C) -> Result<Self, ConfigError> {
        BoundedCache::try_with_clock(capacity, clock).map(Self::from_cache)
    }

    /// Wraps an existing cache.
    pub fn from_cache(cache: BoundedCache<K, V, C>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(cache)),
        }
    }

    /// Returns a clone of the value for `key`, marking it as recently used.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.write().get(key).cloned()
    }

    /// Returns a clone of the value without touching recency.
    pub fn peek(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.read().peek(key).cloned()
    }

    pub fn set(&self, key: K, value: V) -> Option<V> {
        self.inner.write().set(key, value)
    }

    pub fn set_with_size(&self, key: K, value: V, size_hint: u64) -> Option<V> {
        self.inner.write().set_with_size(key, value, size_hint)
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.write().remove(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.read().contains(key)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.read().capacity()
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.read().stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn clones_share_state() {
        let cache = ConcurrentBoundedCache::try_new(4).unwrap();
        let other = cache.clone();
        other.set("k", 1);
        assert_eq!(cache.peek(&"k"), Some(1));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn capacity_holds_under_parallel_writers() {
        let cache = ConcurrentBoundedCache::try_new(32).unwrap();
        let handles: Vec<_> = (0..4u64)
            .map(|t| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for i in 0..500u64 {
                        cache.set(t * 10_000 + i, i);
                        assert!(cache.len() <= 32);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(cache.len() <= 32);
        assert!(!cache.is_empty());
    }

    #[test]
    fn get_counts_hits() {
        let cache = ConcurrentBoundedCache::try_new(4).unwrap();
        cache.set(1, "x".to_string());
        cache.get(&1);
        cache.get(&1);
        assert_eq!(cache.stats().total_hits, 2);
    }
}
