//! Validated configuration for a [`PerformanceContext`](crate::context::PerformanceContext).
//!
//! ## Example
//!
//! ```rust
//! use perfkit::builder::PerformanceConfig;
//! use std::time::Duration;
//!
//! let config = PerformanceConfig::builder()
//!     .cache_capacity(500)
//!     .debounce_delay(Duration::from_millis(150))
//!     .enable_memory_monitoring(false)
//!     .try_build()
//!     .unwrap();
//!
//! assert_eq!(config.cache_capacity(), 500);
//! assert_eq!(config.overscan(), 5);
//! assert!(!config.sampler_options().enable_memory_monitoring);
//! ```

use std::time::Duration;

use crate::cache::bounded::DEFAULT_CACHE_CAPACITY;
use crate::debounce::{DEFAULT_DEBOUNCE_DELAY, MAX_DEBOUNCE_DELAY};
use crate::error::ConfigError;
use crate::metrics::poller::DEFAULT_MEMORY_POLL_INTERVAL;
use crate::metrics::sampler::SamplerOptions;
use crate::visibility::{DEFAULT_LAZY_LOAD_MARGIN_PX, DEFAULT_VISIBILITY_THRESHOLD};
use crate::window::DEFAULT_OVERSCAN;

/// Settings shared by every component a context creates.
///
/// Only obtainable through [`PerformanceConfigBuilder::try_build`] (or
/// [`Default`]), so every instance is valid.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceConfig {
    sampler: SamplerOptions,
    cache_capacity: usize,
    overscan: usize,
    lazy_load_margin_px: f64,
    debounce_delay: Duration,
    visibility_threshold: f64,
    memory_poll_interval: Duration,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            sampler: SamplerOptions::default(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            overscan: DEFAULT_OVERSCAN,
            lazy_load_margin_px: DEFAULT_LAZY_LOAD_MARGIN_PX,
            debounce_delay: DEFAULT_DEBOUNCE_DELAY,
            visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
            memory_poll_interval: DEFAULT_MEMORY_POLL_INTERVAL,
        }
    }
}

impl PerformanceConfig {
    pub fn builder() -> PerformanceConfigBuilder {
        PerformanceConfigBuilder::new()
    }

    /// Signal categories the shared sampler accepts.
    #[inline]
    pub fn sampler_options(&self) -> SamplerOptions {
        self.sampler
    }

    #[inline]
    pub fn cache_capacity(&self) -> usize {
        self.cache_capacity
    }

    #[inline]
    pub fn overscan(&self) -> usize {
        self.overscan
    }

    #[inline]
    pub fn lazy_load_margin_px(&self) -> f64 {
        self.lazy_load_margin_px
    }

    #[inline]
    pub fn debounce_delay(&self) -> Duration {
        self.debounce_delay
    }

    #[inline]
    pub fn visibility_threshold(&self) -> f64 {
        self.visibility_threshold
    }

    #[inline]
    pub fn memory_poll_interval(&self) -> Duration {
        self.memory_poll_interval
    }
}

/// Builder for [`PerformanceConfig`]. Unset fields keep their defaults.
#[derive(Debug, Clone, Default)]
pub struct PerformanceConfigBuilder {
    config: PerformanceConfig,
}

impl PerformanceConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable_metric_sampling(mut self, enabled: bool) -> Self {
        self.config.sampler.enable_metric_sampling = enabled;
        self
    }

    pub fn enable_memory_monitoring(mut self, enabled: bool) -> Self {
        self.config.sampler.enable_memory_monitoring = enabled;
        self
    }

    pub fn enable_network_monitoring(mut self, enabled: bool) -> Self {
        self.config.sampler.enable_network_monitoring = enabled;
        self
    }

    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.config.cache_capacity = capacity;
        self
    }

    pub fn overscan(mut self, overscan: usize) -> Self {
        self.config.overscan = overscan;
        self
    }

    pub fn lazy_load_margin_px(mut self, margin: f64) -> Self {
        self.config.lazy_load_margin_px = margin;
        self
    }

    pub fn debounce_delay(mut self, delay: Duration) -> Self {
        self.config.debounce_delay = delay;
        self
    }

    pub fn visibility_threshold(mut self, threshold: f64) -> Self {
        self.config.visibility_threshold = threshold;
        self
    }

    pub fn memory_poll_interval(mut self, interval: Duration) -> Self {
        self.config.memory_poll_interval = interval;
        self
    }

    /// Validates and returns the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a zero cache capacity, a negative or
    /// non-finite lazy-load margin, a debounce delay above
    /// [`MAX_DEBOUNCE_DELAY`], a visibility threshold outside `[0, 1]`, or a
    /// zero memory poll interval.
    pub fn try_build(self) -> Result<PerformanceConfig, ConfigError> {
        let config = self.config;
        if config.cache_capacity == 0 {
            return Err(ConfigError::new("cache_capacity must be > 0"));
        }
        if !config.lazy_load_margin_px.is_finite() || config.lazy_load_margin_px < 0.0 {
            return Err(ConfigError::new(format!(
                "lazy_load_margin_px must be finite and >= 0 (got {})",
                config.lazy_load_margin_px
            )));
        }
        if config.debounce_delay > MAX_DEBOUNCE_DELAY {
            return Err(ConfigError::new(format!(
                "debounce_delay must be <= {MAX_DEBOUNCE_DELAY:?} (got {:?})",
                config.debounce_delay
            )));
        }
        if !(0.0..=1.0).contains(&config.visibility_threshold) {
            return Err(ConfigError::new(format!(
                "visibility_threshold must be within [0, 1] (got {})",
                config.visibility_threshold
            )));
        }
        if config.memory_poll_interval.is_zero() {
            return Err(ConfigError::new("memory_poll_interval must be > 0"));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = PerformanceConfig::builder().try_build().unwrap();
        assert_eq!(config, PerformanceConfig::default());
        assert_eq!(config.cache_capacity(), 100);
        assert_eq!(config.overscan(), 5);
        assert_eq!(config.lazy_load_margin_px(), 50.0);
        assert_eq!(config.debounce_delay(), Duration::from_millis(300));
        assert_eq!(config.visibility_threshold(), 0.1);
        assert_eq!(config.memory_poll_interval(), Duration::from_secs(10));
        assert_eq!(config.sampler_options(), SamplerOptions::default());
    }

    #[test]
    fn toggles_flow_into_sampler_options() {
        let config = PerformanceConfig::builder()
            .enable_metric_sampling(false)
            .enable_network_monitoring(false)
            .try_build()
            .unwrap();
        let options = config.sampler_options();
        assert!(!options.enable_metric_sampling);
        assert!(options.enable_memory_monitoring);
        assert!(!options.enable_network_monitoring);
    }

    #[test]
    fn rejects_invalid_values() {
        let cases = [
            PerformanceConfig::builder().cache_capacity(0),
            PerformanceConfig::builder().lazy_load_margin_px(-1.0),
            PerformanceConfig::builder().lazy_load_margin_px(f64::INFINITY),
            PerformanceConfig::builder().visibility_threshold(1.01),
            PerformanceConfig::builder().visibility_threshold(f64::NAN),
            PerformanceConfig::builder().memory_poll_interval(Duration::ZERO),
            PerformanceConfig::builder().debounce_delay(Duration::MAX),
        ];
        for builder in cases {
            assert!(builder.try_build().is_err());
        }
    }

    #[test]
    fn debounce_delay_bound_is_inclusive() {
        let config = PerformanceConfig::builder()
            .debounce_delay(MAX_DEBOUNCE_DELAY)
            .try_build()
            .unwrap();
        assert_eq!(config.debounce_delay(), MAX_DEBOUNCE_DELAY);

        let err = PerformanceConfig::builder()
            .debounce_delay(MAX_DEBOUNCE_DELAY + Duration::from_millis(1))
            .try_build()
            .unwrap_err();
        assert!(err.message().contains("debounce_delay"));
    }

    #[test]
    fn error_names_the_field() {
        let err = PerformanceConfig::builder()
            .cache_capacity(0)
            .try_build()
            .unwrap_err();
        assert!(err.message().contains("cache_capacity"));
    }
}
