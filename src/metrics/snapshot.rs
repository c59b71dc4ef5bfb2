use std::fmt;
use std::time::Instant;

use crate::error::ConfigError;
use crate::metrics::event::{MetricEvent, PaintKind};

/// Effective network connection class reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionType {
    Slow2g,
    TwoG,
    ThreeG,
    FourG,
    Unknown,
}

impl ConnectionType {
    /// Parses the platform's `effectiveType` string. Unrecognized values map
    /// to [`ConnectionType::Unknown`].
    pub fn from_effective_type(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "slow-2g" => Self::Slow2g,
            "2g" => Self::TwoG,
            "3g" => Self::ThreeG,
            "4g" => Self::FourG,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Slow2g => "slow-2g",
            Self::TwoG => "2g",
            Self::ThreeG => "3g",
            Self::FourG => "4g",
            Self::Unknown => "unknown",
        }
    }

    /// `slow-2g`, `2g` and `3g` count against performance.
    #[inline]
    pub fn is_slow(self) -> bool {
        matches!(self, Self::Slow2g | Self::TwoG | Self::ThreeG)
    }
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JS heap usage in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryUsage {
    pub used_bytes: u64,
    pub total_bytes: u64,
    pub limit_bytes: u64,
}

impl MemoryUsage {
    /// `used <= total <= limit`.
    #[inline]
    pub fn is_consistent(&self) -> bool {
        self.used_bytes <= self.total_bytes && self.total_bytes <= self.limit_bytes
    }

    /// `used / limit`, or `None` when the limit is unknown (zero).
    pub fn usage_ratio(&self) -> Option<f64> {
        if self.limit_bytes == 0 {
            return None;
        }
        Some(self.used_bytes as f64 / self.limit_bytes as f64)
    }
}

/// Viewport size in CSS pixels; both dimensions are positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    /// # Errors
    ///
    /// Returns [`ConfigError`] when either dimension is zero.
    pub fn try_new(width: u32, height: u32) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::new(format!(
                "viewport dimensions must be > 0 (got {width}x{height})"
            )));
        }
        Ok(Self { width, height })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Latest known performance measurements.
///
/// A snapshot is a value: [`apply`](Self::apply) returns a new snapshot and
/// leaves the receiver untouched. Fields a platform cannot measure stay
/// `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    /// Largest contentful paint, ms.
    pub lcp: Option<f64>,
    /// First input delay, ms.
    pub fid: Option<f64>,
    /// Cumulative layout shift score.
    pub cls: Option<f64>,
    /// First contentful paint, ms.
    pub fcp: Option<f64>,
    /// Time to first byte, ms.
    pub ttfb: Option<f64>,
    pub memory_usage: Option<MemoryUsage>,
    pub connection_type: Option<ConnectionType>,
    pub device_pixel_ratio: f64,
    pub viewport: Viewport,
    pub timestamp: Instant,
}

impl MetricsSnapshot {
    /// Empty snapshot for a freshly loaded page.
    ///
    /// A non-positive or non-finite `device_pixel_ratio` is read as `1.0`.
    pub fn new(viewport: Viewport, device_pixel_ratio: f64, at: Instant) -> Self {
        Self {
            lcp: None,
            fid: None,
            cls: None,
            fcp: None,
            ttfb: None,
            memory_usage: None,
            connection_type: None,
            device_pixel_ratio: positive_or(device_pixel_ratio, 1.0),
            viewport,
            timestamp: at,
        }
    }

    /// Merges `event` into a copy of this snapshot.
    ///
    /// Rejected events (negative or non-finite timings, inconsistent memory
    /// figures, shifts caused by recent input) yield an unchanged copy.
    pub fn apply(&self, event: &MetricEvent, at: Instant) -> MetricsSnapshot {
        self.try_apply(event, at).unwrap_or_else(|| self.clone())
    }

    /// Like [`apply`](Self::apply), but returns `None` when the event is
    /// rejected.
    ///
    /// ```
    /// use perfkit::metrics::{MetricEvent, MetricsSnapshot, Viewport};
    /// use std::time::Instant;
    ///
    /// let t0 = Instant::now();
    /// let snap = MetricsSnapshot::new(Viewport::try_new(1280, 720).unwrap(), 2.0, t0);
    ///
    /// let shifted = snap
    ///     .try_apply(&MetricEvent::LayoutShift { value: 0.05, had_recent_input: false }, t0)
    ///     .unwrap();
    /// assert_eq!(shifted.cls, Some(0.05));
    ///
    /// // Input-driven shifts are not layout instability
    /// let ignored = shifted.try_apply(
    ///     &MetricEvent::LayoutShift { value: 0.3, had_recent_input: true },
    ///     t0,
    /// );
    /// assert!(ignored.is_none());
    /// ```
    pub fn try_apply(&self, event: &MetricEvent, at: Instant) -> Option<MetricsSnapshot> {
        let mut next = self.clone();

        match *event {
            MetricEvent::Paint { kind, start_time } => {
                let value = non_negative(start_time)?;
                match kind {
                    PaintKind::FirstContentfulPaint => next.fcp = Some(value),
                    PaintKind::LargestContentfulPaint => next.lcp = Some(value),
                }
            },
            MetricEvent::FirstInput {
                start_time,
                processing_start,
            } => {
                let start = non_negative(start_time)?;
                let processing = non_negative(processing_start)?;
                next.fid = Some((processing - start).max(0.0));
            },
            MetricEvent::LayoutShift {
                value,
                had_recent_input,
            } => {
                if had_recent_input {
                    return None;
                }
                let value = non_negative(value)?;
                next.cls = Some(next.cls.unwrap_or(0.0) + value);
            },
            MetricEvent::Navigation {
                request_start,
                response_start,
            } => {
                let request = non_negative(request_start)?;
                let response = non_negative(response_start)?;
                next.ttfb = Some((response - request).max(0.0));
            },
            MetricEvent::Memory(usage) => {
                if !usage.is_consistent() {
                    log::warn!(
                        "rejecting memory sample: used {} / total {} / limit {}",
                        usage.used_bytes,
                        usage.total_bytes,
                        usage.limit_bytes
                    );
                    return None;
                }
                next.memory_usage = Some(usage);
            },
            MetricEvent::Network(connection) => next.connection_type = Some(connection),
            MetricEvent::Viewport {
                viewport,
                device_pixel_ratio,
            } => {
                next.viewport = viewport;
                next.device_pixel_ratio = positive_or(device_pixel_ratio, next.device_pixel_ratio);
            },
        }

        next.timestamp = self.timestamp.max(at);
        Some(next)
    }

    /// Starts a new navigation: layout shift accumulation restarts.
    pub fn reset_layout_shift(&self, at: Instant) -> MetricsSnapshot {
        MetricsSnapshot {
            cls: None,
            timestamp: self.timestamp.max(at),
            ..self.clone()
        }
    }
}

#[inline]
fn non_negative(value: f64) -> Option<f64> {
    (value.is_finite() && value >= 0.0).then_some(value)
}

#[inline]
fn positive_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}
