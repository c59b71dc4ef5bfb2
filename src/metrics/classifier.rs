//! Low-performance classification.
//!
//! A snapshot scores one point per condition below; two or more points mark
//! the client as low-performance. Thresholds are crate constants so every
//! consumer classifies the same way.
//!
//! | Condition            | Trigger                              |
//! |----------------------|--------------------------------------|
//! | `SlowLcp`            | `lcp > 2500` ms                      |
//! | `SlowFid`            | `fid > 100` ms                       |
//! | `HighCls`            | `cls > 0.25`                         |
//! | `SlowFcp`            | `fcp > 1800` ms                      |
//! | `SlowTtfb`           | `ttfb > 600` ms                      |
//! | `HighMemoryUsage`    | `used / limit > 0.8`                 |
//! | `SlowConnection`     | connection is `slow-2g`, `2g`, `3g`  |
//!
//! Unknown measurements never score.

use crate::metrics::snapshot::MetricsSnapshot;

pub const LCP_THRESHOLD_MS: f64 = 2500.0;
pub const FID_THRESHOLD_MS: f64 = 100.0;
pub const CLS_THRESHOLD: f64 = 0.25;
pub const FCP_THRESHOLD_MS: f64 = 1800.0;
pub const TTFB_THRESHOLD_MS: f64 = 600.0;
pub const MEMORY_USAGE_THRESHOLD: f64 = 0.8;
/// Score at which a snapshot is classified as low-performance.
pub const LOW_PERFORMANCE_SCORE: u8 = 2;

/// A triggered classification condition.
///
/// Variants are declared in scoring order; reports list them in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PerformanceCondition {
    SlowLcp,
    SlowFid,
    HighCls,
    SlowFcp,
    SlowTtfb,
    HighMemoryUsage,
    SlowConnection,
}

impl PerformanceCondition {
    pub const ALL: [PerformanceCondition; 7] = [
        Self::SlowLcp,
        Self::SlowFid,
        Self::HighCls,
        Self::SlowFcp,
        Self::SlowTtfb,
        Self::HighMemoryUsage,
        Self::SlowConnection,
    ];

    /// Fixed remediation text for this condition.
    pub fn recommendation(self) -> &'static str {
        match self {
            Self::SlowLcp => {
                "Optimize largest contentful paint: compress large images and preload critical resources"
            },
            Self::SlowFid => "Reduce main-thread work to improve input responsiveness",
            Self::HighCls => "Reserve space for images and dynamic content to reduce layout shifts",
            Self::SlowFcp => "Inline critical CSS and defer non-essential scripts to speed up first paint",
            Self::SlowTtfb => "Improve server response time with caching or a CDN",
            Self::HighMemoryUsage => "Reduce memory usage by releasing unused caches and large objects",
            Self::SlowConnection => {
                "Slow connection detected: serve lighter assets and defer non-critical requests"
            },
        }
    }

    /// Returns `true` when `snapshot` triggers this condition.
    pub fn is_triggered(self, snapshot: &MetricsSnapshot) -> bool {
        match self {
            Self::SlowLcp => exceeds(snapshot.lcp, LCP_THRESHOLD_MS),
            Self::SlowFid => exceeds(snapshot.fid, FID_THRESHOLD_MS),
            Self::HighCls => exceeds(snapshot.cls, CLS_THRESHOLD),
            Self::SlowFcp => exceeds(snapshot.fcp, FCP_THRESHOLD_MS),
            Self::SlowTtfb => exceeds(snapshot.ttfb, TTFB_THRESHOLD_MS),
            Self::HighMemoryUsage => exceeds(
                snapshot.memory_usage.and_then(|m| m.usage_ratio()),
                MEMORY_USAGE_THRESHOLD,
            ),
            Self::SlowConnection => snapshot.connection_type.is_some_and(|c| c.is_slow()),
        }
    }
}

#[inline]
fn exceeds(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|v| v > threshold)
}

/// Outcome of [`classify`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PerformanceReport {
    pub score: u8,
    pub low_performance: bool,
    /// Triggered conditions in scoring order.
    pub conditions: Vec<PerformanceCondition>,
}

impl PerformanceReport {
    /// One remediation string per triggered condition, in scoring order.
    pub fn recommendations(&self) -> Vec<&'static str> {
        self.conditions
            .iter()
            .map(|condition| condition.recommendation())
            .collect()
    }
}

/// Scores `snapshot` against the fixed thresholds.
///
/// # Example
///
/// ```
/// use perfkit::metrics::{classify, ConnectionType, MetricsSnapshot, Viewport};
/// use std::time::Instant;
///
/// let mut snap = MetricsSnapshot::new(Viewport::try_new(800, 600).unwrap(), 1.0, Instant::now());
/// snap.lcp = Some(3000.0);
/// assert!(!classify(&snap).low_performance);
///
/// snap.connection_type = Some(ConnectionType::TwoG);
/// let report = classify(&snap);
/// assert_eq!(report.score, 2);
/// assert!(report.low_performance);
/// ```
pub fn classify(snapshot: &MetricsSnapshot) -> PerformanceReport {
    let conditions: Vec<_> = PerformanceCondition::ALL
        .into_iter()
        .filter(|condition| condition.is_triggered(snapshot))
        .collect();
    let score = conditions.len() as u8;

    PerformanceReport {
        score,
        low_performance: score >= LOW_PERFORMANCE_SCORE,
        conditions,
    }
}
