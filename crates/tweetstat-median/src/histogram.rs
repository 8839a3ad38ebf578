//! Fixed-size frequency table over a bounded integer domain.

use crate::{MedianError, Result};

/// Occurrence counts for every value in `[0, max_value]`.
///
/// The table is allocated once with `max_value + 1` zeroed buckets and never
/// resized. A value outside the domain is rejected rather than clamped, since it
/// means the bound was configured too small for the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: Vec<u64>,
    total: u64,
}

impl Histogram {
    /// Creates an empty histogram covering `[0, max_value]`.
    #[must_use]
    pub fn new(max_value: u32) -> Self {
        Self { counts: vec![0; max_value as usize + 1], total: 0 }
    }

    /// Largest value this histogram accepts.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn max_value(&self) -> u32 {
        (self.counts.len() - 1) as u32
    }

    /// Number of occurrences recorded for `value` (0 when out of range).
    #[must_use]
    pub fn count(&self, value: u32) -> u64 {
        self.counts.get(value as usize).copied().unwrap_or(0)
    }

    /// Total number of values recorded.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Records one occurrence of `value` and returns the new bucket count.
    ///
    /// # Errors
    ///
    /// Returns [`MedianError::DomainBoundViolation`] if `value > max_value`; the
    /// histogram is left unchanged in that case.
    pub fn increment(&mut self, value: u32) -> Result<u64> {
        let max = self.max_value();
        let bucket = self
            .counts
            .get_mut(value as usize)
            .ok_or(MedianError::DomainBoundViolation { value, max })?;
        *bucket += 1;
        self.total += 1;
        Ok(*bucket)
    }

    /// Smallest value strictly greater than `value` with a nonzero count.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn next_nonzero_above(&self, value: u32) -> Option<u32> {
        let start = value as usize + 1;
        self.counts.get(start..)?.iter().position(|&c| c > 0).map(|offset| (start + offset) as u32)
    }

    /// Largest value strictly less than `value` with a nonzero count.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn next_nonzero_below(&self, value: u32) -> Option<u32> {
        let end = (value as usize).min(self.counts.len());
        self.counts[..end].iter().rposition(|&c| c > 0).map(|idx| idx as u32)
    }

    /// Iterates over `(value, count)` for every nonzero bucket in ascending order.
    #[allow(clippy::cast_possible_truncation)]
    pub fn iter(&self) -> impl Iterator<Item = (u32, u64)> + '_ {
        self.counts.iter().enumerate().filter(|(_, c)| **c > 0).map(|(v, &c)| (v as u32, c))
    }
}
