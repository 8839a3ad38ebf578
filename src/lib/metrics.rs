//! Run metrics and TSV output.
//!
//! Re-exports the metric types from `tweetstat-metrics` so that callers can use
//! `tweetstat_lib::metrics::RunMetrics` without a direct dependency on that crate.

pub use tweetstat_metrics::{
    Metric, RunMetrics, format_count, write_metrics, write_metrics_auto,
};
