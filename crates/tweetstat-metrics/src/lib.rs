#![deny(unsafe_code)]

//! Structured metric types and TSV writer for tweetstat runs.
//!
//! This crate provides:
//! - [`Metric`] trait for serializable metric rows
//! - [`RunMetrics`] describing a single pipeline run
//! - [`writer`] module for TSV file output

pub mod run;
pub mod writer;

use serde::{Deserialize, Serialize};

pub use run::RunMetrics;
pub use writer::{write_metrics, write_metrics_auto};

/// Formats a count with thousands separators.
///
/// # Example
/// ```
/// use tweetstat_metrics::format_count;
/// assert_eq!(format_count(1234567), "1,234,567");
/// assert_eq!(format_count(12), "12");
/// ```
#[must_use]
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// A metric row that can be written to and read back from TSV.
pub trait Metric: Serialize + for<'de> Deserialize<'de> + Clone + Default {
    /// Human-readable name used in error messages and logs.
    fn metric_name() -> &'static str;
}
