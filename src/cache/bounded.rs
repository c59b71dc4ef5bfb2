//! # Bounded LRU Cache
//!
//! Keyed memoization with a hard entry-count ceiling and batched
//! least-recently-used eviction.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                       BoundedCache<K, V, C>                          │
//!   │                                                                      │
//!   │   map: FxHashMap<K, CacheEntry<V>>                                   │
//!   │   ┌─────────┬──────────────────────────────────────────────────────┐ │
//!   │   │  "farm" │ data, created_at, last_accessed_at, size, hits, seq  │ │
//!   │   │  "crop" │ ...                                                  │ │
//!   │   └─────────┴──────────────────────────────────────────────────────┘ │
//!   │                                                                      │
//!   │   recency: BTreeMap<(last_accessed_at, seq), K>                      │
//!   │   ┌────────────────────┬─────────────────────┬─────────────────────┐ │
//!   │   │ (t0, 1) -> "crop"  │ (t0, 4) -> "herd"   │ (t3, 0) -> "farm"   │ │
//!   │   └────────────────────┴─────────────────────┴─────────────────────┘ │
//!   │     first = evicted first                           last = newest    │
//!   │                                                                      │
//!   │   clock: C   (SystemClock in production, ManualClock in tests)       │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The recency index orders entries by last access time, with equal times
//! broken by insertion sequence (earlier insert evicted first).
//!
//! ## Eviction
//!
//! ```text
//!   set(new_key) with len == capacity
//!     │
//!     ├─ required = len - (capacity - 1)
//!     ├─ batch    = ceil(capacity * 0.1)
//!     └─ pop max(required, batch) oldest entries, then insert
//! ```
//!
//! Eviction runs before the insert, so `len() <= capacity` holds after every
//! `set`.
//!
//! ## Operations
//!
//! | Operation          | Time       | Notes                                   |
//! |--------------------|------------|-----------------------------------------|
//! | `get`              | O(log n)   | Refreshes recency, bumps hit count      |
//! | `peek`/`contains`  | O(1)       | No bookkeeping                          |
//! | `set` (update)     | O(1)       | Keeps recency and hit count             |
//! | `set` (insert)     | O(log n)*  | *Plus O(b log n) for an eviction batch  |
//! | `remove`           | O(log n)   |                                         |
//! | `stats`            | O(n)       | Pure read                               |
//!
//! ## Example
//!
//! ```
//! use perfkit::cache::BoundedCache;
//!
//! let mut cache = BoundedCache::try_new(3).unwrap();
//! cache.set("a", 1);
//! cache.set("b", 2);
//! cache.set("c", 3);
//!
//! // Refresh "a"; "b" is now the least recently used entry
//! assert_eq!(cache.get(&"a"), Some(&1));
//!
//! cache.set("d", 4);
//! assert!(!cache.contains(&"b"));
//! assert!(cache.contains(&"a"));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;
use std::time::Instant;

use rustc_hash::FxHashMap;

use crate::cache::entry::CacheEntry;
use crate::cache::stats::CacheStats;
use crate::clock::{Clock, SystemClock};
use crate::error::{ConfigError, InvariantError};
use crate::traits::{CoreCache, LruCacheTrait, MutableCache};

/// Capacity used by a context when none is configured.
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// Fraction of capacity removed by one eviction pass (rounded up).
pub const EVICTION_FRACTION: f64 = 0.1;

/// `size_hint` recorded by [`BoundedCache::set`].
pub const DEFAULT_SIZE_HINT: u64 = 1;

// Upper bound on up-front allocation; larger caches grow on demand.
const MAX_PREALLOC: usize = 1024;

/// Minimum number of entries one eviction pass removes for `capacity`.
///
/// Computed as `ceil(capacity * 0.1)` in floating point, so the result
/// follows IEEE rounding for capacities whose tenth is not exact.
///
/// ```
/// use perfkit::cache::eviction_batch_size;
///
/// assert_eq!(eviction_batch_size(3), 1);
/// assert_eq!(eviction_batch_size(10), 1);
/// assert_eq!(eviction_batch_size(100), 10);
/// ```
#[inline]
pub fn eviction_batch_size(capacity: usize) -> usize {
    (capacity as f64 * EVICTION_FRACTION).ceil() as usize
}

/// Bounded key/value store with batched LRU eviction.
///
/// See the [module documentation](self) for the eviction rules.
pub struct BoundedCache<K, V, C = SystemClock> {
    map: FxHashMap<K, CacheEntry<V>>,
    recency: BTreeMap<(Instant, u64), K>,
    capacity: usize,
    next_seq: u64,
    clock: C,
}

impl<K, V> BoundedCache<K, V, SystemClock>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `capacity` is zero.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        Self::try_with_clock(capacity, SystemClock)
    }
}

impl<K, V, C> BoundedCache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    /// Creates a cache reading time from `clock`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `capacity` is zero.
    pub fn try_with_clock(capacity: usize, clock: C) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("cache capacity must be > 0"));
        }
        Ok(Self::with_clock_unchecked(capacity, clock))
    }

    /// Callers guarantee `capacity > 0`.
    pub(crate) fn with_clock_unchecked(capacity: usize, clock: C) -> Self {
        Self {
            map: FxHashMap::with_capacity_and_hasher(
                capacity.min(MAX_PREALLOC),
                Default::default(),
            ),
            recency: BTreeMap::new(),
            capacity,
            next_seq: 0,
            clock,
        }
    }

    /// Returns the value for `key`, marking it as most recently used.
    ///
    /// A miss changes nothing.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let now = self.clock.now();
        let entry = self.map.get_mut(key)?;

        let before = entry.recency_key();
        entry.record_hit(now);
        let after = entry.recency_key();

        if before != after {
            if let Some(owned) = self.recency.remove(&before) {
                self.recency.insert(after, owned);
            }
        }
        Some(entry.data())
    }

    /// Returns the value for `key` without touching recency or hit count.
    #[inline]
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.map.get(key).map(CacheEntry::data)
    }

    /// Returns the full entry for `key` without touching recency.
    #[inline]
    pub fn entry(&self, key: &K) -> Option<&CacheEntry<V>> {
        self.map.get(key)
    }

    /// Stores `value` under `key` with the default size hint.
    ///
    /// Returns the previous value when `key` was already present.
    #[inline]
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        self.set_with_size(key, value, DEFAULT_SIZE_HINT)
    }

    /// Stores `value` under `key` with caller-supplied size metadata.
    ///
    /// An existing key keeps its hit count and recency; its payload, size hint
    /// and creation time are replaced. A new key that would push the cache
    /// past capacity first triggers one eviction batch.
    pub fn set_with_size(&mut self, key: K, value: V, size_hint: u64) -> Option<V> {
        let now = self.clock.now();

        if let Some(entry) = self.map.get_mut(&key) {
            return Some(entry.overwrite(value, size_hint, now));
        }

        if self.map.len() >= self.capacity {
            self.evict_batch();
        }

        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.recency.insert((now, seq), key.clone());
        self.map.insert(key, CacheEntry::new(value, size_hint, now, seq));
        None
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let entry = self.map.remove(key)?;
        self.recency.remove(&entry.recency_key());
        Some(entry.into_data())
    }

    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops every entry. Insertion sequence restarts from zero.
    pub fn clear(&mut self) {
        self.map.clear();
        self.recency.clear();
        self.next_seq = 0;
    }

    /// Summarizes the current contents. Does not affect recency.
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        let mut stats = CacheStats {
            total_entries: self.map.len(),
            ..CacheStats::default()
        };
        let mut total_age_ms = 0.0;

        for entry in self.map.values() {
            stats.total_size = stats.total_size.saturating_add(entry.size_hint());
            stats.total_hits = stats.total_hits.saturating_add(entry.hit_count());
            total_age_ms += entry.age(now).as_secs_f64() * 1000.0;
        }

        if stats.total_entries > 0 {
            stats.average_age_ms = total_age_ms / stats.total_entries as f64;
        }
        stats
    }

    /// Iterates keys from least to most recently used.
    pub fn keys_by_recency(&self) -> impl Iterator<Item = &K> + '_ {
        self.recency.values()
    }

    /// Verifies that the map and the recency index agree.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantError`] describing the first inconsistency found.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.map.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "len {} exceeds capacity {}",
                self.map.len(),
                self.capacity
            )));
        }
        if self.map.len() != self.recency.len() {
            return Err(InvariantError::new(format!(
                "map holds {} entries but recency index holds {}",
                self.map.len(),
                self.recency.len()
            )));
        }
        for (recency_key, key) in &self.recency {
            match self.map.get(key) {
                Some(entry) if entry.recency_key() == *recency_key => {},
                Some(_) => {
                    return Err(InvariantError::new(
                        "recency index holds a stale position for a live key",
                    ));
                },
                None => {
                    return Err(InvariantError::new(
                        "recency index references a missing key",
                    ));
                },
            }
        }
        Ok(())
    }

    fn evict_batch(&mut self) -> usize {
        let len = self.map.len();
        let required = len.saturating_add(1).saturating_sub(self.capacity);
        let target = required.max(eviction_batch_size(self.capacity)).min(len);

        let mut evicted = 0;
        while evicted < target {
            let Some((_, key)) = self.recency.pop_first() else {
                break;
            };
            self.map.remove(&key);
            evicted += 1;
        }

        log::debug!(
            "bounded cache evicted {evicted} entries (len {len}, capacity {})",
            self.capacity
        );
        evicted
    }
}

impl<K, V, C> CoreCache<K, V> for BoundedCache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    #[inline]
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.set(key, value)
    }

    #[inline]
    fn get(&mut self, key: &K) -> Option<&V> {
        BoundedCache::get(self, key)
    }

    #[inline]
    fn contains(&self, key: &K) -> bool {
        BoundedCache::contains(self, key)
    }

    #[inline]
    fn len(&self) -> usize {
        BoundedCache::len(self)
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    fn clear(&mut self) {
        BoundedCache::clear(self);
    }
}

impl<K, V, C> MutableCache<K, V> for BoundedCache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    #[inline]
    fn remove(&mut self, key: &K) -> Option<V> {
        BoundedCache::remove(self, key)
    }
}

impl<K, V, C> LruCacheTrait<K, V> for BoundedCache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    fn pop_lru(&mut self) -> Option<(K, V)> {
        let (_, key) = self.recency.pop_first()?;
        let entry = self.map.remove(&key)?;
        Some((key, entry.into_data()))
    }

    fn peek_lru(&self) -> Option<(&K, &V)> {
        let (_, key) = self.recency.first_key_value()?;
        self.map.get(key).map(|entry| (key, entry.data()))
    }

    fn recency_rank(&self, key: &K) -> Option<usize> {
        let position = self.map.get(key)?.recency_key();
        Some(self.recency.range(..position).count())
    }
}

impl<K, V, C> fmt::Debug for BoundedCache<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedCache")
            .field("len", &self.map.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl<K, V, C> Extend<(K, V)> for BoundedCache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::time::Duration;

    fn manual(capacity: usize) -> (BoundedCache<&'static str, i32, ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let cache = BoundedCache::try_with_clock(capacity, clock.clone()).unwrap();
        (cache, clock)
    }

    // ==============================================
    // Construction
    // ==============================================

    mod construction {
        use super::*;

        #[test]
        fn zero_capacity_is_rejected() {
            let err = BoundedCache::<u64, u64>::try_new(0).unwrap_err();
            assert!(err.to_string().contains("capacity"));
        }

        #[test]
        fn new_cache_is_empty() {
            let cache: BoundedCache<u64, u64> = BoundedCache::try_new(100).unwrap();
            assert!(cache.is_empty());
            assert_eq!(cache.capacity(), 100);
            assert_eq!(cache.stats(), CacheStats::default());
        }

        #[test]
        fn huge_capacity_does_not_preallocate() {
            let cache: BoundedCache<u64, u64> = BoundedCache::try_new(usize::MAX).unwrap();
            assert_eq!(cache.capacity(), usize::MAX);
        }
    }

    // ==============================================
    // Get / set semantics
    // ==============================================

    mod access {
        use super::*;

        #[test]
        fn get_hit_updates_bookkeeping() {
            let (mut cache, clock) = manual(10);
            cache.set("a", 1);
            clock.advance(Duration::from_millis(40));

            assert_eq!(cache.get(&"a"), Some(&1));

            let entry = cache.entry(&"a").unwrap();
            assert_eq!(entry.hit_count(), 1);
            assert_eq!(entry.last_accessed_at() - entry.created_at(), Duration::from_millis(40));
        }

        #[test]
        fn get_miss_changes_nothing() {
            let (mut cache, _clock) = manual(10);
            cache.set("a", 1);
            assert_eq!(cache.get(&"zzz"), None);
            assert_eq!(cache.stats().total_hits, 0);
            cache.check_invariants().unwrap();
        }

        #[test]
        fn overwrite_preserves_hits_and_resets_age() {
            let (mut cache, clock) = manual(10);
            cache.set("a", 1);
            cache.get(&"a");
            cache.get(&"a");
            clock.advance(Duration::from_secs(2));

            assert_eq!(cache.set_with_size("a", 2, 16), Some(1));

            let entry = cache.entry(&"a").unwrap();
            assert_eq!(*entry.data(), 2);
            assert_eq!(entry.hit_count(), 2);
            assert_eq!(entry.size_hint(), 16);
            assert_eq!(entry.age(clock.now()), Duration::ZERO);
            assert_eq!(cache.len(), 1);
        }

        #[test]
        fn peek_does_not_refresh() {
            let (mut cache, clock) = manual(3);
            cache.set("a", 1);
            clock.advance(Duration::from_millis(1));
            cache.set("b", 2);
            clock.advance(Duration::from_millis(1));
            cache.set("c", 3);
            clock.advance(Duration::from_millis(1));

            assert_eq!(cache.peek(&"a"), Some(&1));
            cache.set("d", 4);

            assert!(!cache.contains(&"a"));
            assert_eq!(cache.entry(&"b").map(CacheEntry::hit_count), Some(0));
        }

        #[test]
        fn remove_keeps_index_consistent() {
            let (mut cache, _clock) = manual(5);
            cache.set("a", 1);
            cache.set("b", 2);

            assert_eq!(cache.remove(&"a"), Some(1));
            assert_eq!(cache.remove(&"a"), None);
            assert_eq!(cache.len(), 1);
            cache.check_invariants().unwrap();
        }
    }

    // ==============================================
    // Eviction
    // ==============================================

    mod eviction {
        use super::*;

        #[test]
        fn least_recently_used_goes_first() {
            let (mut cache, clock) = manual(3);
            cache.set("A", 1);
            clock.advance(Duration::from_millis(1));
            cache.set("B", 2);
            clock.advance(Duration::from_millis(1));
            cache.set("C", 3);
            clock.advance(Duration::from_millis(1));
            cache.get(&"A");
            clock.advance(Duration::from_millis(1));

            cache.set("D", 4);

            assert!(!cache.contains(&"B"));
            assert!(cache.contains(&"A"));
            assert!(cache.contains(&"C"));
            assert!(cache.contains(&"D"));
        }

        #[test]
        fn ties_break_by_insertion_order() {
            let (mut cache, _clock) = manual(3);
            cache.set("first", 1);
            cache.set("second", 2);
            cache.set("third", 3);

            cache.set("fourth", 4);

            assert!(!cache.contains(&"first"));
            assert!(cache.contains(&"second"));
        }

        #[test]
        fn equal_access_times_still_prefer_older_insert() {
            let (mut cache, clock) = manual(3);
            cache.set("a", 1);
            cache.set("b", 2);
            clock.advance(Duration::from_millis(5));
            cache.set("c", 3);
            // "a" and "c" now share a timestamp; "a" was inserted first
            cache.get(&"a");
            cache.get(&"b");

            cache.set("d", 4);

            assert!(!cache.contains(&"a"));
            assert!(cache.contains(&"b"));
            assert!(cache.contains(&"c"));
        }

        #[test]
        fn evicts_a_tenth_of_capacity_per_pass() {
            let clock = ManualClock::new();
            let mut cache = BoundedCache::try_with_clock(20, clock.clone()).unwrap();
            for i in 0..20u32 {
                cache.set(i, i);
                clock.advance(Duration::from_millis(1));
            }

            cache.set(100, 100);

            // ceil(20 * 0.1) = 2 evicted, then one inserted
            assert_eq!(cache.len(), 19);
            assert!(!cache.contains(&0));
            assert!(!cache.contains(&1));
            assert!(cache.contains(&2));
            cache.check_invariants().unwrap();
        }

        #[test]
        fn capacity_one_always_makes_room() {
            let (mut cache, _clock) = manual(1);
            cache.set("a", 1);
            cache.set("b", 2);
            assert_eq!(cache.len(), 1);
            assert!(cache.contains(&"b"));
        }

        #[test]
        fn updating_existing_key_never_evicts() {
            let (mut cache, _clock) = manual(2);
            cache.set("a", 1);
            cache.set("b", 2);
            cache.set("a", 10);
            assert_eq!(cache.len(), 2);
            assert!(cache.contains(&"b"));
        }

        #[test]
        fn batch_size_follows_float_ceil() {
            assert_eq!(eviction_batch_size(1), 1);
            assert_eq!(eviction_batch_size(9), 1);
            assert_eq!(eviction_batch_size(10), 1);
            assert_eq!(eviction_batch_size(11), 2);
            assert_eq!(eviction_batch_size(20), 2);
        }
    }

    // ==============================================
    // Stats / clear
    // ==============================================

    mod stats {
        use super::*;

        #[test]
        fn stats_sum_sizes_hits_and_ages() {
            let (mut cache, clock) = manual(10);
            cache.set_with_size("a", 1, 100);
            clock.advance(Duration::from_millis(100));
            cache.set_with_size("b", 2, 50);
            cache.get(&"a");
            cache.get(&"a");
            cache.get(&"b");

            let stats = cache.stats();
            assert_eq!(stats.total_entries, 2);
            assert_eq!(stats.total_size, 150);
            assert_eq!(stats.total_hits, 3);
            assert!((stats.average_age_ms - 50.0).abs() < 1e-6);
        }

        #[test]
        fn stats_do_not_reorder() {
            let (mut cache, clock) = manual(2);
            cache.set("a", 1);
            clock.advance(Duration::from_millis(1));
            cache.set("b", 2);
            let _ = cache.stats();
            cache.set("c", 3);
            assert!(!cache.contains(&"a"));
        }

        #[test]
        fn clear_resets_everything() {
            let (mut cache, _clock) = manual(4);
            cache.extend([("a", 1), ("b", 2)]);
            cache.get(&"a");

            cache.clear();

            assert!(cache.is_empty());
            assert_eq!(cache.stats(), CacheStats::default());
            cache.check_invariants().unwrap();
        }
    }

    // ==============================================
    // Trait surface
    // ==============================================

    mod traits {
        use super::*;

        #[test]
        fn lru_trait_reports_eviction_order() {
            let (mut cache, clock) = manual(4);
            cache.set("a", 1);
            clock.advance(Duration::from_millis(1));
            cache.set("b", 2);
            clock.advance(Duration::from_millis(1));
            cache.get(&"a");

            assert_eq!(cache.peek_lru(), Some((&"b", &2)));
            assert_eq!(cache.recency_rank(&"b"), Some(0));
            assert_eq!(cache.recency_rank(&"a"), Some(1));
            assert_eq!(cache.recency_rank(&"missing"), None);

            assert_eq!(cache.pop_lru(), Some(("b", 2)));
            assert_eq!(cache.keys_by_recency().copied().collect::<Vec<_>>(), vec!["a"]);
        }

        #[test]
        fn core_cache_insert_delegates_to_set() {
            fn fill<C: CoreCache<u32, u32>>(cache: &mut C) {
                for i in 0..10 {
                    cache.insert(i, i * 2);
                }
            }

            let mut cache = BoundedCache::try_new(5).unwrap();
            fill(&mut cache);
            assert!(CoreCache::len(&cache) <= 5);
            assert_eq!(CoreCache::get(&mut cache, &9), Some(&18));
        }
    }
}
