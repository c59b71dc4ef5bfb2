//! Explicit owner of the shared performance state.
//!
//! A [`PerformanceContext`] is built once from a validated
//! [`PerformanceConfig`] and passed to whatever needs it. It owns the shared
//! [`MetricSampler`], the [`ResourcePreloader`] and, once started, the
//! [`MemoryPoller`]; the other components are created from it with the
//! configured defaults and then owned by the caller.
//!
//! ```text
//!   PerformanceContext
//!   ├── sampler:   Arc<Mutex<MetricSampler>>  ◄── record(), MemoryPoller
//!   ├── preloader: ResourcePreloader          ──► PreloadHandle
//!   ├── poller:    Option<MemoryPoller>
//!   └── factories: cache() window() visibility_trigger() debouncer()
//! ```

use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::builder::PerformanceConfig;
use crate::cache::BoundedCache;
use crate::clock::{Clock, SystemClock};
use crate::debounce::Debouncer;
use crate::error::{ConfigError, PollerError};
use crate::metrics::{
    MemoryPoller, MemoryProbe, MetricEvent, MetricSampler, MetricsSnapshot, PerformanceReport,
    Viewport,
};
use crate::preload::ResourcePreloader;
use crate::visibility::VisibilityTrigger;
use crate::window::VirtualWindow;

/// Shared performance state and component factory.
///
/// # Example
///
/// ```
/// use perfkit::builder::PerformanceConfig;
/// use perfkit::context::PerformanceContext;
/// use perfkit::metrics::{ConnectionType, MetricEvent, Viewport};
///
/// let config = PerformanceConfig::builder().cache_capacity(2).try_build().unwrap();
/// let ctx = PerformanceContext::new(config, Viewport::try_new(390, 844).unwrap(), 3.0);
///
/// let mut cache = ctx.cache::<&str, u32>();
/// cache.set("herd", 40);
/// assert_eq!(cache.capacity(), 2);
///
/// ctx.record(MetricEvent::Network(ConnectionType::TwoG));
/// assert_eq!(ctx.report().score, 1);
/// assert!(!ctx.is_low_performance());
/// ```
#[derive(Debug)]
pub struct PerformanceContext<C = SystemClock> {
    config: PerformanceConfig,
    clock: C,
    sampler: Arc<Mutex<MetricSampler<C>>>,
    preloader: ResourcePreloader,
    poller: Option<MemoryPoller>,
}

impl PerformanceContext<SystemClock> {
    pub fn new(config: PerformanceConfig, viewport: Viewport, device_pixel_ratio: f64) -> Self {
        Self::with_clock(config, viewport, device_pixel_ratio, SystemClock)
    }
}

impl<C> PerformanceContext<C>
where
    C: Clock + Clone,
{
    /// Creates a context whose sampler and caches read time from `clock`.
    pub fn with_clock(
        config: PerformanceConfig,
        viewport: Viewport,
        device_pixel_ratio: f64,
        clock: C,
    ) -> Self {
        let sampler = MetricSampler::with_clock(
            config.sampler_options(),
            viewport,
            device_pixel_ratio,
            clock.clone(),
        );
        Self {
            config,
            clock,
            sampler: Arc::new(Mutex::new(sampler)),
            preloader: ResourcePreloader::new(),
            poller: None,
        }
    }

    #[inline]
    pub fn config(&self) -> &PerformanceConfig {
        &self.config
    }

    /// Handle to the shared sampler, for platform event adapters.
    pub fn sampler(&self) -> Arc<Mutex<MetricSampler<C>>> {
        Arc::clone(&self.sampler)
    }

    /// Forwards `event` to the shared sampler.
    pub fn record(&self, event: MetricEvent) -> bool {
        self.sampler.lock().record(event)
    }

    /// Starts a new navigation: layout-shift accumulation restarts.
    pub fn reset_navigation(&self) {
        self.sampler.lock().reset_navigation();
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.sampler.lock().snapshot()
    }

    pub fn report(&self) -> PerformanceReport {
        self.sampler.lock().report()
    }

    pub fn is_low_performance(&self) -> bool {
        self.sampler.lock().is_low_performance()
    }

    pub fn recommendations(&self) -> Vec<&'static str> {
        self.sampler.lock().recommendations()
    }

    #[inline]
    pub fn preloader(&self) -> &ResourcePreloader {
        &self.preloader
    }

    /// A new cache with the configured capacity and the context's clock.
    pub fn cache<K, V>(&self) -> BoundedCache<K, V, C>
    where
        K: Eq + Hash + Clone,
    {
        BoundedCache::with_clock_unchecked(self.config.cache_capacity(), self.clock.clone())
    }

    /// A window with the configured overscan.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `item_height` is zero.
    pub fn window(
        &self,
        item_height: u32,
        container_height: u32,
    ) -> Result<VirtualWindow, ConfigError> {
        VirtualWindow::try_new(item_height, container_height, self.config.overscan())
    }

    /// A trigger with the configured threshold and lazy-load margin.
    pub fn visibility_trigger(&self, trigger_once: bool) -> VisibilityTrigger {
        VisibilityTrigger::from_validated(
            self.config.visibility_threshold(),
            trigger_once,
            self.config.lazy_load_margin_px(),
        )
    }

    /// A debouncer with the configured delay.
    pub fn debouncer<T>(&self, initial: T) -> Debouncer<T> {
        Debouncer::new(initial, self.config.debounce_delay())
    }

    #[inline]
    pub fn is_monitoring_memory(&self) -> bool {
        self.poller.as_ref().is_some_and(MemoryPoller::is_running)
    }

    /// Stops the memory poller, if running. The context stays usable.
    pub fn shutdown(&mut self) {
        if let Some(mut poller) = self.poller.take() {
            poller.stop();
        }
    }
}

impl<C> PerformanceContext<C>
where
    C: Clock + Clone + Send + 'static,
{
    /// Starts polling `probe` on the configured interval.
    ///
    /// Returns `Ok(false)` without spawning when memory monitoring is
    /// disabled. A poller that is already running is stopped and replaced.
    ///
    /// # Errors
    ///
    /// Returns [`PollerError`] if the polling thread cannot be spawned.
    pub fn start_memory_monitoring<P>(&mut self, probe: P) -> Result<bool, PollerError>
    where
        P: MemoryProbe,
    {
        if !self.config.sampler_options().enable_memory_monitoring {
            log::debug!("memory monitoring disabled; not starting poller");
            return Ok(false);
        }
        self.shutdown();
        let poller = MemoryPoller::spawn(
            Arc::clone(&self.sampler),
            probe,
            self.config.memory_poll_interval(),
        )?;
        self.poller = Some(poller);
        Ok(true)
    }
}

impl<C> Drop for PerformanceContext<C> {
    fn drop(&mut self) {
        if let Some(mut poller) = self.poller.take() {
            poller.stop();
        }
    }
}
