use std::mem;
use std::time::{Duration, Instant};

/// A value held by a [`BoundedCache`](super::BoundedCache) together with its
/// bookkeeping.
///
/// `hit_count` and `last_accessed_at` only change when the owning cache serves
/// a `get` for this exact key.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    data: V,
    created_at: Instant,
    last_accessed_at: Instant,
    size_hint: u64,
    hit_count: u64,
    // insertion sequence; breaks recency ties in favour of older entries
    seq: u64,
}

impl<V> CacheEntry<V> {
    pub(crate) fn new(data: V, size_hint: u64, now: Instant, seq: u64) -> Self {
        Self {
            data,
            created_at: now,
            last_accessed_at: now,
            size_hint,
            hit_count: 0,
            seq,
        }
    }

    #[inline]
    pub fn data(&self) -> &V {
        &self.data
    }

    #[inline]
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    #[inline]
    pub fn last_accessed_at(&self) -> Instant {
        self.last_accessed_at
    }

    /// Caller-supplied size metadata. No unit is enforced.
    #[inline]
    pub fn size_hint(&self) -> u64 {
        self.size_hint
    }

    #[inline]
    pub fn hit_count(&self) -> u64 {
        self.hit_count
    }

    /// Time since the entry was created (or last overwritten).
    #[inline]
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }

    #[inline]
    pub(crate) fn recency_key(&self) -> (Instant, u64) {
        (self.last_accessed_at, self.seq)
    }

    pub(crate) fn record_hit(&mut self, now: Instant) {
        self.last_accessed_at = self.last_accessed_at.max(now);
        self.hit_count = self.hit_count.saturating_add(1);
    }

    /// Replaces the payload and restarts the age. Recency and hit count are
    /// kept.
    pub(crate) fn overwrite(&mut self, data: V, size_hint: u64, now: Instant) -> V {
        self.created_at = now;
        self.size_hint = size_hint;
        mem::replace(&mut self.data, data)
    }

    pub(crate) fn into_data(self) -> V {
        self.data
    }
}
