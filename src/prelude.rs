pub use crate::builder::{PerformanceConfig, PerformanceConfigBuilder};
pub use crate::cache::{BoundedCache, CacheEntry, CacheStats};
#[cfg(feature = "concurrency")]
pub use crate::cache::ConcurrentBoundedCache;
pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::context::PerformanceContext;
pub use crate::debounce::Debouncer;
pub use crate::error::{ConfigError, InvariantError, PollerError};
pub use crate::metrics::{
    ConnectionType, MemoryProbe, MemoryUsage, MetricEvent, MetricSampler, MetricsSnapshot,
    PaintKind, PerformanceReport, SamplerOptions, Viewport,
};
pub use crate::preload::{PreloadHandle, PreloadKind, ResourcePreloader};
pub use crate::traits::{CoreCache, LruCacheTrait, MutableCache};
pub use crate::visibility::{Rect, VisibilityState, VisibilityTrigger};
pub use crate::window::{VirtualItem, VirtualRange, VirtualWindow, compute_range};
