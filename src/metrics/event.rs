//! Typed observations fed into [`MetricsSnapshot::apply`](super::MetricsSnapshot::apply).
//!
//! Each variant carries exactly the fields of one signal category, so an
//! update can never touch fields outside its category.

use crate::metrics::snapshot::{ConnectionType, MemoryUsage, Viewport};

/// Paint timing entries that contribute to the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaintKind {
    FirstContentfulPaint,
    LargestContentfulPaint,
}

impl PaintKind {
    /// Maps a performance-entry name to a paint kind.
    ///
    /// ```
    /// use perfkit::metrics::PaintKind;
    ///
    /// assert_eq!(
    ///     PaintKind::from_entry_name("first-contentful-paint"),
    ///     Some(PaintKind::FirstContentfulPaint)
    /// );
    /// assert_eq!(PaintKind::from_entry_name("first-paint"), None);
    /// ```
    pub fn from_entry_name(name: &str) -> Option<Self> {
        match name {
            "first-contentful-paint" => Some(Self::FirstContentfulPaint),
            "largest-contentful-paint" => Some(Self::LargestContentfulPaint),
            _ => None,
        }
    }
}

/// Signal category used to enable or disable groups of events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricCategory {
    Paint,
    Input,
    LayoutShift,
    Navigation,
    Memory,
    Network,
    Viewport,
}

/// One observed platform signal.
///
/// Timings are milliseconds relative to navigation start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricEvent {
    /// FCP or LCP entry. Later LCP candidates replace earlier ones.
    Paint { kind: PaintKind, start_time: f64 },
    /// First input; delay is `processing_start - start_time`.
    FirstInput { start_time: f64, processing_start: f64 },
    /// Layout shift; shifts with `had_recent_input` do not count.
    LayoutShift { value: f64, had_recent_input: bool },
    /// Navigation timing; TTFB is `response_start - request_start`.
    Navigation { request_start: f64, response_start: f64 },
    Memory(MemoryUsage),
    Network(ConnectionType),
    Viewport {
        viewport: Viewport,
        device_pixel_ratio: f64,
    },
}

impl MetricEvent {
    pub fn category(&self) -> MetricCategory {
        match self {
            Self::Paint { .. } => MetricCategory::Paint,
            Self::FirstInput { .. } => MetricCategory::Input,
            Self::LayoutShift { .. } => MetricCategory::LayoutShift,
            Self::Navigation { .. } => MetricCategory::Navigation,
            Self::Memory(_) => MetricCategory::Memory,
            Self::Network(_) => MetricCategory::Network,
            Self::Viewport { .. } => MetricCategory::Viewport,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_match_variants() {
        let paint = MetricEvent::Paint {
            kind: PaintKind::LargestContentfulPaint,
            start_time: 1.0,
        };
        assert_eq!(paint.category(), MetricCategory::Paint);
        assert_eq!(
            MetricEvent::Network(ConnectionType::FourG).category(),
            MetricCategory::Network
        );
        assert_eq!(
            MetricEvent::LayoutShift {
                value: 0.1,
                had_recent_input: false
            }
            .category(),
            MetricCategory::LayoutShift
        );
    }

    #[test]
    fn lcp_entry_name_maps() {
        assert_eq!(
            PaintKind::from_entry_name("largest-contentful-paint"),
            Some(PaintKind::LargestContentfulPaint)
        );
    }
}
