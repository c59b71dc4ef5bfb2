//! Value debouncing.
//!
//! [`Debouncer`] is timer-free: callers pass the current instant to
//! [`push`](Debouncer::push) and [`poll`](Debouncer::poll), and a scheduler
//! adapter can sleep until [`deadline`](Debouncer::deadline). Each push moves
//! the deadline, so a superseded deadline can never commit.
//!
//! ```text
//!   push(1) push(2) push(3)
//!     │ 50ms  │ 50ms  │
//!     ▼       ▼       ▼
//!   ──●───────●───────●──────────────── delay ──────────────►● commit(3)
//! ```

use std::time::{Duration, Instant};

/// Delay used when none is configured.
pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_millis(300);

/// Largest delay a [`PerformanceConfig`](crate::builder::PerformanceConfig)
/// accepts.
pub const MAX_DEBOUNCE_DELAY: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    /// `None` when `now + delay` overflows; such a value never settles.
    deadline: Option<Instant>,
}

/// Holds a committed value and at most one pending replacement.
///
/// # Example
///
/// ```
/// use perfkit::debounce::Debouncer;
/// use std::time::{Duration, Instant};
///
/// let mut search = Debouncer::new(String::new(), Duration::from_millis(300));
/// let t0 = Instant::now();
///
/// search.push("ca".to_string(), t0);
/// search.push("cattle".to_string(), t0 + Duration::from_millis(80));
///
/// assert_eq!(search.poll(t0 + Duration::from_millis(300)), None);
/// assert_eq!(
///     search.poll(t0 + Duration::from_millis(380)).map(String::as_str),
///     Some("cattle")
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    committed: T,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(initial: T, delay: Duration) -> Self {
        Self {
            delay,
            committed: initial,
            pending: None,
        }
    }

    #[inline]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// The last value that settled.
    #[inline]
    pub fn committed(&self) -> &T {
        &self.committed
    }

    #[inline]
    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref().map(|p| &p.value)
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value will settle, if any.
    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().and_then(|p| p.deadline)
    }

    /// Replaces the pending value and restarts the delay from `now`.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some(Pending {
            value,
            deadline: now.checked_add(self.delay),
        });
    }

    /// Commits the pending value if its deadline has passed.
    ///
    /// Returns the newly committed value exactly once per settled push;
    /// returns `None` otherwise.
    pub fn poll(&mut self, now: Instant) -> Option<&T> {
        let due = self
            .pending
            .as_ref()
            .and_then(|pending| pending.deadline)
            .is_some_and(|deadline| now >= deadline);
        if !due {
            return None;
        }
        let pending = self.pending.take()?;
        self.committed = pending.value;
        Some(&self.committed)
    }

    /// Drops the pending value without committing it (teardown).
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    pub fn into_committed(self) -> T {
        self.committed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn rapid_pushes_commit_only_the_last() {
        let mut debouncer = Debouncer::new(0, ms(300));
        let t0 = Instant::now();
        let mut commits = Vec::new();

        for (i, value) in [1, 2, 3].into_iter().enumerate() {
            let at = t0 + ms(50 * i as u64);
            if let Some(v) = debouncer.poll(at) {
                commits.push((*v, at));
            }
            debouncer.push(value, at);
        }

        let last_push = t0 + ms(100);
        let mut tick = last_push;
        while tick <= last_push + ms(600) {
            if let Some(v) = debouncer.poll(tick) {
                commits.push((*v, tick));
            }
            tick += ms(10);
        }

        assert_eq!(commits.len(), 1);
        let (value, at) = commits[0];
        assert_eq!(value, 3);
        assert!(at - last_push >= ms(300));
        assert_eq!(*debouncer.committed(), 3);
    }

    #[test]
    fn superseded_deadline_never_fires() {
        let mut debouncer = Debouncer::new("a", ms(100));
        let t0 = Instant::now();

        debouncer.push("b", t0);
        debouncer.push("c", t0 + ms(90));

        // "b"'s original deadline
        assert_eq!(debouncer.poll(t0 + ms(100)), None);
        assert_eq!(*debouncer.committed(), "a");
        assert_eq!(debouncer.deadline(), Some(t0 + ms(190)));
    }

    #[test]
    fn cancel_discards_pending() {
        let mut debouncer = Debouncer::new(1, ms(10));
        let t0 = Instant::now();
        debouncer.push(2, t0);

        assert_eq!(debouncer.cancel(), Some(2));
        assert_eq!(debouncer.poll(t0 + ms(1000)), None);
        assert_eq!(debouncer.into_committed(), 1);
    }

    #[test]
    fn zero_delay_commits_on_next_poll() {
        let mut debouncer = Debouncer::new(0u8, Duration::ZERO);
        let t0 = Instant::now();
        debouncer.push(9, t0);
        assert!(debouncer.is_pending());
        assert_eq!(debouncer.poll(t0), Some(&9));
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.pending(), None);
    }

    #[test]
    fn unrepresentable_deadline_never_settles() {
        let mut debouncer = Debouncer::new(0u8, Duration::MAX);
        let t0 = Instant::now();
        debouncer.push(1, t0);

        assert!(debouncer.is_pending());
        assert_eq!(debouncer.deadline(), None);
        assert_eq!(debouncer.poll(t0 + Duration::from_secs(86_400)), None);
        assert_eq!(debouncer.cancel(), Some(1));
        assert_eq!(*debouncer.committed(), 0);
    }
}
