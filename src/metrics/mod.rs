//! Runtime performance metrics.
//!
//! ```text
//!   platform adapters ──► MetricEvent ──► MetricsSnapshot::apply ──► classify
//!   (observers, poller)                    (pure merge)              (fixed thresholds)
//!                  └────────────── MetricSampler ───────────────────────┘
//! ```

pub mod classifier;
pub mod event;
pub mod poller;
pub mod sampler;
pub mod snapshot;

pub use classifier::{
    LOW_PERFORMANCE_SCORE, PerformanceCondition, PerformanceReport, classify,
};
pub use event::{MetricCategory, MetricEvent, PaintKind};
pub use poller::{DEFAULT_MEMORY_POLL_INTERVAL, MemoryPoller, MemoryProbe};
pub use sampler::{MetricSampler, SamplerOptions};
pub use snapshot::{ConnectionType, MemoryUsage, MetricsSnapshot, Viewport};
