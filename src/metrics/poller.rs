//! Background memory polling.
//!
//! Heap usage has no change notification, so it is sampled on a fixed
//! interval. The poller owns one thread that samples a [`MemoryProbe`]
//! immediately and then every interval, recording each sample into a shared
//! [`MetricSampler`].
//!
//! ```text
//!   spawn ──► sample ──► record ──► wait(interval | shutdown) ──┐
//!               ▲                                               │
//!               └────────────────── timeout ◄──────────────────┘
//!                                   shutdown ──► exit
//! ```
//!
//! [`MemoryPoller::stop`] (or drop) signals shutdown and joins the thread,
//! so no sample is recorded after it returns.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{RecvTimeoutError, Sender};
use parking_lot::Mutex;

use crate::clock::Clock;
use crate::error::PollerError;
use crate::metrics::event::MetricEvent;
use crate::metrics::sampler::MetricSampler;
use crate::metrics::snapshot::MemoryUsage;

/// Interval between memory samples.
pub const DEFAULT_MEMORY_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Platform memory source.
///
/// Returning `None` means the platform cannot report memory; nothing is
/// recorded for that tick.
pub trait MemoryProbe: Send + 'static {
    fn sample(&mut self) -> Option<MemoryUsage>;
}

impl<F> MemoryProbe for F
where
    F: FnMut() -> Option<MemoryUsage> + Send + 'static,
{
    fn sample(&mut self) -> Option<MemoryUsage> {
        self()
    }
}

/// Handle to a running memory polling thread.
#[derive(Debug)]
pub struct MemoryPoller {
    shutdown: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl MemoryPoller {
    /// Starts polling `probe` every `interval`.
    ///
    /// # Errors
    ///
    /// Returns [`PollerError`] if the thread cannot be spawned.
    pub fn spawn<P, C>(
        sampler: Arc<Mutex<MetricSampler<C>>>,
        mut probe: P,
        interval: Duration,
    ) -> Result<Self, PollerError>
    where
        P: MemoryProbe,
        C: Clock + Send + 'static,
    {
        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded::<()>(1);

        let handle = std::thread::Builder::new()
            .name("perfkit-memory-poller".to_string())
            .spawn(move || {
                log::info!("memory poller started with interval {interval:?}");
                loop {
                    if let Some(usage) = probe.sample() {
                        sampler.lock().record(MetricEvent::Memory(usage));
                    }
                    match shutdown_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {},
                        Ok(()) => break,
                        Err(RecvTimeoutError::Disconnected) => {
                            log::warn!("memory poller shutdown channel disconnected");
                            break;
                        },
                    }
                }
                log::info!("memory poller stopped");
            })
            .map_err(PollerError::spawn_failed)?;

        Ok(Self {
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Stops the thread and waits for it to exit. Idempotent.
    pub fn stop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            // A full or closed channel means the thread is already exiting
            let _ = shutdown.try_send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("memory poller thread panicked");
            }
        }
    }
}

impl Drop for MemoryPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::sampler::SamplerOptions;
    use crate::metrics::snapshot::Viewport;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn shared_sampler(options: SamplerOptions) -> Arc<Mutex<MetricSampler>> {
        Arc::new(Mutex::new(MetricSampler::new(
            options,
            Viewport::try_new(1024, 768).unwrap(),
            1.0,
        )))
    }

    fn usage(used: u64) -> MemoryUsage {
        MemoryUsage {
            used_bytes: used,
            total_bytes: 1_000,
            limit_bytes: 1_000,
        }
    }

    #[test]
    fn samples_immediately_and_stops_synchronously() {
        let sampler = shared_sampler(SamplerOptions::default());
        let calls = Arc::new(AtomicUsize::new(0));
        let probe_calls = Arc::clone(&calls);

        let mut poller = MemoryPoller::spawn(
            Arc::clone(&sampler),
            move || {
                probe_calls.fetch_add(1, Ordering::SeqCst);
                Some(usage(900))
            },
            Duration::from_secs(3600),
        )
        .unwrap();

        // Long interval: wait for the first sample
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while calls.load(Ordering::SeqCst) == 0 && std::time::Instant::now() < deadline {
            std::thread::yield_now();
        }

        poller.stop();
        assert!(!poller.is_running());

        let after_stop = calls.load(Ordering::SeqCst);
        assert_eq!(after_stop, 1);
        assert_eq!(sampler.lock().snapshot().memory_usage, Some(usage(900)));

        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(calls.load(Ordering::SeqCst), after_stop);
        poller.stop();
    }

    #[test]
    fn polls_repeatedly_on_short_interval() {
        let sampler = shared_sampler(SamplerOptions::default());
        let calls = Arc::new(AtomicUsize::new(0));
        let probe_calls = Arc::clone(&calls);

        let poller = MemoryPoller::spawn(
            Arc::clone(&sampler),
            move || {
                let n = probe_calls.fetch_add(1, Ordering::SeqCst) as u64;
                Some(usage(n.min(1_000)))
            },
            Duration::from_millis(1),
        )
        .unwrap();

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while calls.load(Ordering::SeqCst) < 3 && std::time::Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(1));
        }
        drop(poller);

        assert!(calls.load(Ordering::SeqCst) >= 3);
    }

    #[test]
    fn missing_capability_records_nothing() {
        let sampler = shared_sampler(SamplerOptions::default());
        let mut poller =
            MemoryPoller::spawn(Arc::clone(&sampler), || None, Duration::from_millis(1)).unwrap();
        std::thread::sleep(Duration::from_millis(10));
        poller.stop();

        assert_eq!(sampler.lock().snapshot().memory_usage, None);
    }
}
