use crate::clock::{Clock, SystemClock};
use crate::metrics::classifier::{PerformanceReport, classify};
use crate::metrics::event::{MetricCategory, MetricEvent};
use crate::metrics::snapshot::{MetricsSnapshot, Viewport};

/// Which signal categories a [`MetricSampler`] accepts.
///
/// Viewport events are always accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerOptions {
    /// Paint, input, layout-shift and navigation timings.
    pub enable_metric_sampling: bool,
    pub enable_memory_monitoring: bool,
    pub enable_network_monitoring: bool,
}

impl Default for SamplerOptions {
    fn default() -> Self {
        Self {
            enable_metric_sampling: true,
            enable_memory_monitoring: true,
            enable_network_monitoring: true,
        }
    }
}

impl SamplerOptions {
    pub fn accepts(&self, category: MetricCategory) -> bool {
        match category {
            MetricCategory::Paint
            | MetricCategory::Input
            | MetricCategory::LayoutShift
            | MetricCategory::Navigation => self.enable_metric_sampling,
            MetricCategory::Memory => self.enable_memory_monitoring,
            MetricCategory::Network => self.enable_network_monitoring,
            MetricCategory::Viewport => true,
        }
    }
}

/// Holds the live [`MetricsSnapshot`] and classifies it.
///
/// Platform adapters (paint observers, resize listeners, the
/// [`MemoryPoller`](super::MemoryPoller)) call [`record`](Self::record); the
/// merge itself is [`MetricsSnapshot::apply`].
///
/// # Example
///
/// ```
/// use perfkit::metrics::{
///     ConnectionType, MetricEvent, MetricSampler, PaintKind, SamplerOptions, Viewport,
/// };
///
/// let mut sampler = MetricSampler::new(
///     SamplerOptions::default(),
///     Viewport::try_new(1280, 720).unwrap(),
///     1.0,
/// );
///
/// sampler.record(MetricEvent::Paint {
///     kind: PaintKind::LargestContentfulPaint,
///     start_time: 4200.0,
/// });
/// sampler.record(MetricEvent::Network(ConnectionType::ThreeG));
///
/// assert!(sampler.is_low_performance());
/// assert_eq!(sampler.recommendations().len(), 2);
/// ```
#[derive(Debug)]
pub struct MetricSampler<C = SystemClock> {
    options: SamplerOptions,
    snapshot: MetricsSnapshot,
    report: PerformanceReport,
    clock: C,
}

impl MetricSampler<SystemClock> {
    pub fn new(options: SamplerOptions, viewport: Viewport, device_pixel_ratio: f64) -> Self {
        Self::with_clock(options, viewport, device_pixel_ratio, SystemClock)
    }
}

impl<C: Clock> MetricSampler<C> {
    pub fn with_clock(
        options: SamplerOptions,
        viewport: Viewport,
        device_pixel_ratio: f64,
        clock: C,
    ) -> Self {
        let snapshot = MetricsSnapshot::new(viewport, device_pixel_ratio, clock.now());
        let report = classify(&snapshot);
        Self {
            options,
            snapshot,
            report,
            clock,
        }
    }

    #[inline]
    pub fn options(&self) -> SamplerOptions {
        self.options
    }

    /// Applies `event` if its category is enabled.
    ///
    /// Returns `true` when the snapshot changed.
    pub fn record(&mut self, event: MetricEvent) -> bool {
        if !self.options.accepts(event.category()) {
            log::trace!("ignoring disabled {:?} event", event.category());
            return false;
        }
        let Some(next) = self.snapshot.try_apply(&event, self.clock.now()) else {
            return false;
        };
        self.replace(next);
        true
    }

    /// Restarts layout-shift accumulation for a new navigation.
    pub fn reset_navigation(&mut self) {
        let next = self.snapshot.reset_layout_shift(self.clock.now());
        self.replace(next);
    }

    /// Copy of the current snapshot.
    #[inline]
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.snapshot.clone()
    }

    /// Classification of the current snapshot.
    #[inline]
    pub fn report(&self) -> PerformanceReport {
        self.report.clone()
    }

    #[inline]
    pub fn is_low_performance(&self) -> bool {
        self.report.low_performance
    }

    #[inline]
    pub fn recommendations(&self) -> Vec<&'static str> {
        self.report.recommendations()
    }

    fn replace(&mut self, next: MetricsSnapshot) {
        let report = classify(&next);
        if report.low_performance != self.report.low_performance {
            log::info!(
                "performance verdict changed: low_performance={} (score {}, conditions {:?})",
                report.low_performance,
                report.score,
                report.conditions
            );
        }
        self.snapshot = next;
        self.report = report;
    }
}
