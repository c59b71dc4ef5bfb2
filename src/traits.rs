//! # Cache Trait Hierarchy
//!
//! Trait seams for keyed caches. Memoizing consumers depend on [`CoreCache`]
//! and invalidation goes through [`MutableCache`].
//!
//! ```text
//!                ┌─────────────────────────────────────────┐
//!                │            CoreCache<K, V>              │
//!                │  insert / get / contains / len          │
//!                │  is_empty / capacity / clear            │
//!                └──────────────────┬──────────────────────┘
//!                                   │
//!                                   ▼
//!                ┌─────────────────────────────────────────┐
//!                │           MutableCache<K, V>            │
//!                │  remove / remove_batch                  │
//!                └──────────────────┬──────────────────────┘
//!                                   │
//!                                   ▼
//!                ┌─────────────────────────────────────────┐
//!                │           LruCacheTrait<K, V>           │
//!                │  pop_lru / peek_lru / recency_rank      │
//!                └─────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//!
//! Implementations are single-owner by default. Shared access goes through
//! [`ConcurrentBoundedCache`](crate::cache::ConcurrentBoundedCache) (feature
//! `concurrency`), which takes `&self` and returns cloned values instead of
//! implementing these traits.

/// Core cache operations that all caches support.
///
/// # Example
///
/// ```
/// use perfkit::cache::BoundedCache;
/// use perfkit::traits::CoreCache;
///
/// fn warm_cache<C: CoreCache<u64, String>>(cache: &mut C, data: &[(u64, String)]) {
///     for (key, value) in data {
///         cache.insert(*key, value.clone());
///     }
/// }
///
/// let mut cache = BoundedCache::try_new(100).unwrap();
/// warm_cache(&mut cache, &[(1, "one".to_string()), (2, "two".to_string())]);
/// assert_eq!(CoreCache::len(&cache), 2);
/// ```
pub trait CoreCache<K, V> {
    /// Inserts a key-value pair, returning the previous value if it existed.
    ///
    /// If the cache is at capacity, entries may be evicted according to the
    /// cache's eviction policy before the new entry is inserted.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Gets a reference to a value by key.
    ///
    /// May update recency bookkeeping. Use [`contains`](Self::contains) to
    /// check existence without affecting eviction order.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Checks if a key exists without updating access state.
    fn contains(&self, key: &K) -> bool;

    /// Returns the current number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if the cache contains no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum number of entries.
    fn capacity(&self) -> usize;

    /// Removes all entries.
    fn clear(&mut self);
}

/// Caches that support arbitrary key-based removal.
///
/// # Example
///
/// ```
/// use perfkit::cache::BoundedCache;
/// use perfkit::traits::{CoreCache, MutableCache};
///
/// let mut cache = BoundedCache::try_new(10).unwrap();
/// cache.insert(1, "one");
/// cache.insert(2, "two");
/// cache.insert(3, "three");
///
/// let removed = cache.remove_batch(&[1, 99, 3]);
/// assert_eq!(removed, vec![Some("one"), None, Some("three")]);
/// assert_eq!(CoreCache::len(&cache), 1);
/// ```
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes a specific key, returning its value if present.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Removes multiple keys. The default implementation loops over
    /// [`remove`](Self::remove).
    fn remove_batch(&mut self, keys: &[K]) -> Vec<Option<V>> {
        keys.iter().map(|k| self.remove(k)).collect()
    }
}

/// Recency-ordered caches.
pub trait LruCacheTrait<K, V>: MutableCache<K, V> {
    /// Removes and returns the least recently used entry.
    fn pop_lru(&mut self) -> Option<(K, V)>;

    /// Returns the least recently used entry without changing any state.
    fn peek_lru(&self) -> Option<(&K, &V)>;

    /// Position of `key` in eviction order; `0` is evicted first.
    fn recency_rank(&self, key: &K) -> Option<usize>;
}
