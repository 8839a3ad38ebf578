//! Interval-based progress logging shared across threads.

use log::info;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counts processed items and logs a line each time the count crosses a
/// multiple of the interval.
///
/// Safe to share between the record source and workers behind an `Arc`.
///
/// # Example
/// ```
/// use tweetstat_lib::progress::ProgressTracker;
///
/// let tracker = ProgressTracker::new("Read records").with_interval(100);
/// for _ in 0..250 {
///     tracker.add(1); // logs "Read records 100", "Read records 200"
/// }
/// tracker.finish(); // logs "Read records 250 (complete)"
/// assert_eq!(tracker.count(), 250);
/// ```
pub struct ProgressTracker {
    interval: u64,
    message: String,
    count: AtomicU64,
}

impl ProgressTracker {
    /// Creates a tracker with the default interval of 100,000 items.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { interval: 100_000, message: message.into(), count: AtomicU64::new(0) }
    }

    /// Sets the logging interval (clamped to at least 1).
    #[must_use]
    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval.max(1);
        self
    }

    /// Adds `additional` items, logging every interval boundary crossed.
    ///
    /// Returns `true` if the new count sits exactly on a boundary.
    pub fn add(&self, additional: u64) -> bool {
        let prev = self.count.fetch_add(additional, Ordering::Relaxed);
        let now = prev + additional;
        for milestone in (prev / self.interval + 1)..=(now / self.interval) {
            info!("{} {}", self.message, milestone * self.interval);
        }
        now > 0 && now.is_multiple_of(self.interval)
    }

    /// Logs the final count unless the last boundary already reported it.
    pub fn finish(&self) {
        let count = self.count();
        if count > 0 && !count.is_multiple_of(self.interval) {
            info!("{} {} (complete)", self.message, count);
        }
    }

    /// Current count.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}
