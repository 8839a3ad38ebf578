#![deny(unsafe_code)]

//! Streaming running median over a bounded integer domain.
//!
//! This crate provides:
//! - [`Histogram`] - a fixed-size frequency table over `[0, max_value]`
//! - [`RunningMedian`] - an order-statistics tracker that keeps two pointers
//!   (value, rank within value) into the histogram and moves them by one slot
//!   per consumed value, so each update is O(1) amortized
//!
//! Values must be fed in the order they occurred; the tracker is single-threaded
//! and owns its histogram.
//!
//! # Example
//!
//! ```
//! use tweetstat_median::RunningMedian;
//!
//! let mut tracker = RunningMedian::new(10);
//! let medians: Vec<f64> = [5, 3, 8, 1]
//!     .into_iter()
//!     .map(|x| tracker.push(x).unwrap())
//!     .collect();
//! assert_eq!(medians, vec![5.0, 4.0, 5.0, 4.0]);
//! ```

pub mod histogram;
pub mod tracker;

use thiserror::Error;

pub use histogram::Histogram;
pub use tracker::{MedianPointers, OrderPointer, RunningMedian, format_median};

/// Result type alias for median operations.
pub type Result<T> = std::result::Result<T, MedianError>;

/// Errors raised by the median engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MedianError {
    /// A value fell outside the configured domain `[0, max]`.
    #[error(
        "Feature value {value} exceeds the configured bound {max}; increase the maximum record length"
    )]
    DomainBoundViolation {
        /// The offending value
        value: u32,
        /// Largest value the histogram can hold
        max: u32,
    },
}
