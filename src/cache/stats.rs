/// Point-in-time summary of a [`BoundedCache`](super::BoundedCache).
///
/// Produced by `stats()`, which never touches recency.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct CacheStats {
    pub total_entries: usize,
    /// Sum of every entry's `size_hint`.
    pub total_size: u64,
    /// Sum of every entry's `hit_count`.
    pub total_hits: u64,
    /// Mean age of the entries in milliseconds; `0.0` when empty.
    pub average_age_ms: f64,
}

impl CacheStats {
    /// Mean hits per live entry; `0.0` when empty.
    pub fn hits_per_entry(&self) -> f64 {
        if self.total_entries == 0 {
            return 0.0;
        }
        self.total_hits as f64 / self.total_entries as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hits_per_entry_handles_empty() {
        assert_eq!(CacheStats::default().hits_per_entry(), 0.0);
    }

    #[test]
    fn hits_per_entry_divides() {
        let stats = CacheStats {
            total_entries: 4,
            total_size: 4,
            total_hits: 10,
            average_age_ms: 0.0,
        };
        assert_eq!(stats.hits_per_entry(), 2.5);
    }
}
