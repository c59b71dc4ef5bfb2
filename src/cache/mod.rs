//! Bounded keyed memoization.
//!
//! [`BoundedCache`] is the single-owner cache; [`ConcurrentBoundedCache`]
//! (feature `concurrency`) shares one behind a `parking_lot::RwLock`.

pub mod bounded;
#[cfg(feature = "concurrency")]
pub mod concurrent;
pub mod entry;
pub mod stats;

pub use bounded::{
    BoundedCache, DEFAULT_CACHE_CAPACITY, DEFAULT_SIZE_HINT, EVICTION_FRACTION, eviction_batch_size,
};
#[cfg(feature = "concurrency")]
pub use concurrent::ConcurrentBoundedCache;
pub use entry::CacheEntry;
pub use stats::CacheStats;
