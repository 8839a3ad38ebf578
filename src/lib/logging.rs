//! Logging helpers for stage timing and run summaries.

use std::time::{Duration, Instant};

use crate::metrics::{RunMetrics, format_count};

/// Formats a duration in human-readable form.
///
/// Sub-second durations are shown in milliseconds, since most stages on
/// modest inputs finish in well under a second.
///
/// # Examples
///
/// ```
/// use tweetstat_lib::logging::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
/// assert_eq!(format_duration(Duration::from_secs(45)), "45s");
/// assert_eq!(format_duration(Duration::from_secs(135)), "2m 15s");
/// assert_eq!(format_duration(Duration::from_secs(5400)), "1h 30m");
/// ```
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs == 0 {
        format!("{}ms", duration.as_millis())
    } else if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        let mins = secs / 60;
        let remaining_secs = secs % 60;
        if remaining_secs == 0 { format!("{mins}m") } else { format!("{mins}m {remaining_secs}s") }
    } else {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        if mins == 0 { format!("{hours}h") } else { format!("{hours}h {mins}m") }
    }
}

/// Formats a throughput as records per second.
///
/// # Examples
///
/// ```
/// use tweetstat_lib::logging::format_rate;
/// use std::time::Duration;
///
/// assert_eq!(format_rate(1000, Duration::from_secs(1)), "1,000 records/s");
/// assert_eq!(format_rate(30, Duration::from_secs(60)), "30.0 records/min");
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_rate(count: u64, duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 0.001 {
        return format!("{} records/s", format_count(count));
    }

    let rate = count as f64 / secs;
    if rate >= 1.0 {
        format!("{} records/s", format_count(rate as u64))
    } else {
        format!("{:.1} records/min", count as f64 / (secs / 60.0))
    }
}

/// Logs the end-of-run summary.
pub fn log_run_summary(metrics: &RunMetrics) {
    log::info!("Run Summary:");
    log::info!("  Records: {}", format_count(metrics.records));
    log::info!("  Tokens: {}", format_count(metrics.total_tokens));
    log::info!("  Distinct tokens: {}", format_count(metrics.distinct_tokens));
    log::info!("  Word groups written: {}", metrics.word_groups);
    log::info!(
        "  Workers: {} spawned, peak {} concurrent",
        metrics.workers_spawned,
        metrics.peak_workers
    );
    if metrics.records > 0 {
        log::info!("  Mean tokens per record: {:.2}", metrics.mean_tokens_per_record());
        log::info!("  Distinct words per record: {}..={}", metrics.min_feature, metrics.max_feature);
        log::info!("  Final median: {:.2}", metrics.final_median);
    }
    log::info!(
        "  Elapsed: {} (ingest {:.2}s, output {:.2}s, merge {:.2}s)",
        format_duration(Duration::from_secs_f64(metrics.total_seconds())),
        metrics.ingest_seconds,
        metrics.output_seconds,
        metrics.merge_seconds
    );
}

/// Tracks the wall-clock time of one pipeline stage.
///
/// Logs when created and again on completion with a count and rate.
///
/// # Examples
///
/// ```no_run
/// use tweetstat_lib::logging::OperationTimer;
///
/// let timer = OperationTimer::new("Reading records");
/// // ... do work ...
/// timer.log_completion(10_000);
/// ```
pub struct OperationTimer {
    operation: String,
    start_time: Instant,
}

impl OperationTimer {
    /// Creates a new operation timer and logs the start.
    #[must_use]
    pub fn new(operation: &str) -> Self {
        log::info!("{operation} ...");
        Self { operation: operation.to_string(), start_time: Instant::now() }
    }

    /// Time elapsed since the timer started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Logs the completion with item count and rate, returning the elapsed time.
    pub fn log_completion(&self, count: u64) -> Duration {
        let duration = self.elapsed();
        log::info!(
            "{} completed: {} in {} ({})",
            self.operation,
            format_count(count),
            format_duration(duration),
            format_rate(count, duration)
        );
        duration
    }
}
