//! Sink metrics for observability
//!
//! Counters for the life of a line: admitted into the queue, written to the
//! destination, or lost along the way (overflow drop, post-shutdown
//! rejection, destination failure).

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for sink observability
///
/// # Example
///
/// ```
/// use blocking_log_sink::SinkMetrics;
///
/// let metrics = SinkMetrics::new();
///
/// metrics.record_admitted();
/// metrics.record_written();
///
/// assert_eq!(metrics.admitted(), 1);
/// assert_eq!(metrics.written(), 1);
/// ```
#[derive(Debug)]
pub struct SinkMetrics {
    /// Lines accepted into the queue
    admitted: AtomicU64,

    /// Lines successfully handed to the destination
    written: AtomicU64,

    /// Lines the destination failed to write
    write_failures: AtomicU64,

    /// Lines dropped by a lossy overflow policy
    dropped_overflow: AtomicU64,

    /// Lines submitted after shutdown
    rejected_after_shutdown: AtomicU64,

    /// Number of submissions that found the queue full
    queue_full_events: AtomicU64,
}

impl SinkMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            admitted: AtomicU64::new(0),
            written: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            dropped_overflow: AtomicU64::new(0),
            rejected_after_shutdown: AtomicU64::new(0),
            queue_full_events: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn admitted(&self) -> u64 {
        self.admitted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped_overflow(&self) -> u64 {
        self.dropped_overflow.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rejected_after_shutdown(&self) -> u64 {
        self.rejected_after_shutdown.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn queue_full_events(&self) -> u64 {
        self.queue_full_events.load(Ordering::Relaxed)
    }

    /// Record an admitted line, returning the previous count
    #[inline]
    pub fn record_admitted(&self) -> u64 {
        self.admitted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_written(&self) -> u64 {
        self.written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dropped_overflow(&self) -> u64 {
        self.dropped_overflow.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rejected(&self) -> u64 {
        self.rejected_after_shutdown.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_queue_full(&self) -> u64 {
        self.queue_full_events.fetch_add(1, Ordering::Relaxed)
    }

    /// Total lines lost for any reason
    pub fn lost(&self) -> u64 {
        self.write_failures() + self.dropped_overflow() + self.rejected_after_shutdown()
    }

    /// Get drop rate as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been submitted.
    pub fn drop_rate(&self) -> f64 {
        let lost = self.lost() as f64;
        let total = self.written() as f64 + lost;
        if total == 0.0 {
            0.0
        } else {
            (lost / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.admitted.store(0, Ordering::Relaxed);
        self.written.store(0, Ordering::Relaxed);
        self.write_failures.store(0, Ordering::Relaxed);
        self.dropped_overflow.store(0, Ordering::Relaxed);
        self.rejected_after_shutdown.store(0, Ordering::Relaxed);
        self.queue_full_events.store(0, Ordering::Relaxed);
    }
}

impl Default for SinkMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SinkMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            admitted: AtomicU64::new(self.admitted()),
            written: AtomicU64::new(self.written()),
            write_failures: AtomicU64::new(self.write_failures()),
            dropped_overflow: AtomicU64::new(self.dropped_overflow()),
            rejected_after_shutdown: AtomicU64::new(self.rejected_after_shutdown()),
            queue_full_events: AtomicU64::new(self.queue_full_events()),
        }
    }
}
