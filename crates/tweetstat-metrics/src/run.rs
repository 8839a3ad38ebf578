//! Metrics describing one pipeline run.

use serde::{Deserialize, Serialize};

use crate::Metric;

/// Summary of a single `tweetstat run` invocation.
///
/// One row is written per run. Timings are wall-clock seconds per stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    /// Number of input records (lines)
    pub records: u64,
    /// Total tokens seen across all records
    pub total_tokens: u64,
    /// Number of distinct tokens across all records
    pub distinct_tokens: u64,
    /// Number of per-group word files written
    pub word_groups: u64,
    /// Workers spawned over the whole run
    pub workers_spawned: u64,
    /// Largest number of workers alive at once
    pub peak_workers: u64,
    /// Coordinator polling ticks
    pub coordinator_ticks: u64,
    /// Smallest feature value observed
    pub min_feature: u32,
    /// Largest feature value observed
    pub max_feature: u32,
    /// Median after the last record
    pub final_median: f64,
    /// Seconds spent reading and processing records
    pub ingest_seconds: f64,
    /// Seconds spent replaying medians and writing word files
    pub output_seconds: f64,
    /// Seconds spent merging word files
    pub merge_seconds: f64,
}

impl Metric for RunMetrics {
    fn metric_name() -> &'static str {
        "run"
    }
}

impl RunMetrics {
    /// Total wall-clock seconds across all stages.
    #[must_use]
    pub fn total_seconds(&self) -> f64 {
        self.ingest_seconds + self.output_seconds + self.merge_seconds
    }

    /// Mean tokens per record, or 0 for an empty run.
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "record counts never exceed 2^53")]
    pub fn mean_tokens_per_record(&self) -> f64 {
        if self.records == 0 { 0.0 } else { self.total_tokens as f64 / self.records as f64 }
    }
}
