//! Incremental order-statistics tracker for the running median.
//!
//! The tracker keeps two pointers into a [`Histogram`]: the lower median
//! (1-based sorted index `ceil(n/2)`) and the upper median (`floor(n/2) + 1`).
//! Each pointer is a bucket value plus a rank within that bucket. A newly
//! recorded value is treated as the last element of its bucket, so a pointer
//! `(v, r)` keeps its sorted index when the new value is `>= v` and shifts up by
//! one when it is `< v`.
//!
//! Because `n` grows by one per call, each target index moves by at most one
//! slot, so at most one pointer takes a single step forward or back. A step
//! stays inside the bucket when possible and otherwise scans to the nearest
//! nonzero bucket.
//!
//! ```text
//! sorted:   1 1 1 2 2 2        n = 6
//! buckets:  [1]=3  [2]=3
//! lower:    (1, 3)  -> third 1  (index 3)
//! upper:    (2, 1)  -> first 2  (index 4)
//! ```

use crate::{Histogram, Result};

/// A position in the sorted multiset: a bucket value and a 1-based rank within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderPointer {
    /// Histogram bucket
    pub value: u32,
    /// 1-based rank within the bucket
    pub rank: u64,
}

/// Snapshot of both median pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MedianPointers {
    /// Lower median pointer
    pub lower: OrderPointer,
    /// Upper median pointer
    pub upper: OrderPointer,
}

/// Running median over values in `[0, max_value]`, fed in sequence order.
#[derive(Debug, Clone)]
pub struct RunningMedian {
    histogram: Histogram,
    len: u64,
    lower: OrderPointer,
    upper: OrderPointer,
}

impl RunningMedian {
    /// Creates a tracker for values in `[0, max_value]`.
    #[must_use]
    pub fn new(max_value: u32) -> Self {
        Self {
            histogram: Histogram::new(max_value),
            len: 0,
            lower: OrderPointer::default(),
            upper: OrderPointer::default(),
        }
    }

    /// Consumes the next value and returns the median of all values seen so far.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MedianError::DomainBoundViolation`] if `value` is larger
    /// than the configured maximum. The tracker state is unchanged on error.
    pub fn push(&mut self, value: u32) -> Result<f64> {
        self.histogram.increment(value)?;
        self.len += 1;

        if self.len == 1 {
            self.lower = OrderPointer { value, rank: 1 };
            self.upper = self.lower;
            return Ok(f64::from(value));
        }

        if self.len.is_multiple_of(2) {
            // Pointers coincided; they split into two adjacent slots.
            if value >= self.upper.value {
                self.upper = self.step_forward(self.upper);
            } else {
                self.lower = self.step_back(self.lower);
            }
        } else if value >= self.upper.value {
            self.lower = self.upper;
        } else if value < self.lower.value {
            self.upper = self.lower;
        } else {
            // New value landed between the two medians: it becomes the middle.
            self.lower = self.step_forward(self.lower);
            self.upper = self.lower;
        }

        Ok(self.current())
    }

    /// Number of values consumed.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Returns `true` if no values have been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current median, or `None` before the first value.
    #[must_use]
    pub fn median(&self) -> Option<f64> {
        (self.len > 0).then(|| self.current())
    }

    /// Current pointer pair, or `None` before the first value.
    #[must_use]
    pub fn pointers(&self) -> Option<MedianPointers> {
        (self.len > 0).then_some(MedianPointers { lower: self.lower, upper: self.upper })
    }

    /// Read access to the underlying histogram.
    #[must_use]
    pub fn histogram(&self) -> &Histogram {
        &self.histogram
    }

    fn current(&self) -> f64 {
        (f64::from(self.lower.value) + f64::from(self.upper.value)) / 2.0
    }

    fn step_forward(&self, pointer: OrderPointer) -> OrderPointer {
        if self.histogram.count(pointer.value) > pointer.rank {
            return OrderPointer { value: pointer.value, rank: pointer.rank + 1 };
        }
        let value = self
            .histogram
            .next_nonzero_above(pointer.value)
            .expect("upper median target must exist above the current pointer");
        OrderPointer { value, rank: 1 }
    }

    fn step_back(&self, pointer: OrderPointer) -> OrderPointer {
        if pointer.rank > 1 {
            return OrderPointer { value: pointer.value, rank: pointer.rank - 1 };
        }
        let value = self
            .histogram
            .next_nonzero_below(pointer.value)
            .expect("lower median target must exist below the current pointer");
        OrderPointer { value, rank: self.histogram.count(value) }
    }
}

/// Formats a median with exactly two fractional digits (`1.00`, `1.50`).
///
/// Medians are averages of two integers, so they are always exact at two
/// decimal places.
#[must_use]
pub fn format_median(median: f64) -> String {
    format!("{median:.2}")
}
