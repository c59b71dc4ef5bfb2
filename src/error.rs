//! Error types for the perfkit library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when construction parameters are invalid
//!   (zero capacity, zero item height, out-of-range thresholds).
//! - [`InvariantError`]: Returned when internal data-structure invariants are
//!   violated (debug-only `check_invariants` methods).
//! - [`PollerError`]: Returned when a background poller cannot be started.
//!
//! Expected runtime conditions (cache miss, empty list, missing platform
//! capability) are never errors; they surface as `None` or empty results.
//!
//! ## Example Usage
//!
//! ```
//! use perfkit::cache::BoundedCache;
//! use perfkit::error::ConfigError;
//!
//! let cache: Result<BoundedCache<String, i32>, ConfigError> = BoundedCache::try_new(100);
//! assert!(cache.is_ok());
//!
//! // Zero capacity is caught without panicking
//! let bad = BoundedCache::<String, i32>::try_new(0);
//! assert!(bad.is_err());
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when construction parameters are invalid.
///
/// Produced by fallible constructors such as
/// [`BoundedCache::try_new`](crate::cache::BoundedCache::try_new),
/// [`VirtualWindow::try_new`](crate::window::VirtualWindow::try_new) and
/// [`PerformanceConfigBuilder::try_build`](crate::builder::PerformanceConfigBuilder::try_build).
/// Carries a human-readable description of which parameter failed validation.
///
/// # Example
///
/// ```
/// use perfkit::window::VirtualWindow;
///
/// let err = VirtualWindow::try_new(0, 600, 5).unwrap_err();
/// assert!(err.to_string().contains("item height"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal invariants are violated.
///
/// Produced by [`BoundedCache::check_invariants`](crate::cache::BoundedCache::check_invariants).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// PollerError
// ---------------------------------------------------------------------------

/// Error returned when a background poller thread cannot be spawned.
#[derive(Debug)]
pub struct PollerError {
    msg: String,
    source: Option<std::io::Error>,
}

impl PollerError {
    pub(crate) fn spawn_failed(source: std::io::Error) -> Self {
        Self {
            msg: format!("failed to spawn poller thread: {source}"),
            source: Some(source),
        }
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.msg
    }
}

impl fmt::Display for PollerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.msg)
    }
}

impl std::error::Error for PollerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|err| err as &(dyn std::error::Error + 'static))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- ConfigError ------------------------------------------------------

    #[test]
    fn config_display_shows_message() {
        let err = ConfigError::new("capacity must be > 0");
        assert_eq!(err.to_string(), "capacity must be > 0");
    }

    #[test]
    fn config_message_accessor() {
        let err = ConfigError::new("test");
        assert_eq!(err.message(), "test");
    }

    #[test]
    fn config_clone_and_eq() {
        let a = ConfigError::new("x");
        let b = a.clone();
        assert_eq!(a, b);
    }

    #[test]
    fn config_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<ConfigError>();
    }

    // -- InvariantError ---------------------------------------------------

    #[test]
    fn invariant_display_shows_message() {
        let err = InvariantError::new("index length mismatch");
        assert_eq!(err.to_string(), "index length mismatch");
    }

    #[test]
    fn invariant_debug_includes_message() {
        let err = InvariantError::new("stale recency key");
        assert!(format!("{err:?}").contains("stale recency key"));
    }

    // -- PollerError ------------------------------------------------------

    #[test]
    fn poller_error_exposes_io_source() {
        use std::error::Error;

        let err = PollerError::spawn_failed(std::io::Error::other("no threads"));
        assert!(err.message().contains("no threads"));
        assert!(err.source().is_some());
    }
}
