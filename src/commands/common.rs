//! CLI options shared across commands.
//!
//! Composed into command structs with `#[command(flatten)]`.

use std::path::PathBuf;

use clap::Args;

use tweetstat_lib::pipeline::{DEFAULT_TEMP_PREFIX, DEFAULT_WORDS_FILE};
use tweetstat_lib::validation::validate_file_name;

/// Where the word list is written and what its group files are called.
#[derive(Debug, Clone, Args)]
pub struct WordFileOptions {
    /// Merged, alphabetised word list file name (within the output directory)
    #[arg(long = "words-file", default_value = DEFAULT_WORDS_FILE)]
    pub words_file: String,

    /// Prefix of the per-character word group files
    #[arg(long = "temp-prefix", default_value = DEFAULT_TEMP_PREFIX)]
    pub temp_prefix: String,
}

impl WordFileOptions {
    /// Checks that both names are plain file names.
    ///
    /// # Errors
    ///
    /// Returns an error if either name is empty or contains a path separator.
    pub fn validate(&self) -> anyhow::Result<()> {
        validate_file_name(&self.words_file, "words-file")?;
        validate_file_name(&self.temp_prefix, "temp-prefix")?;
        Ok(())
    }
}

/// Worker pool sizing options.
#[derive(Debug, Clone, Args)]
pub struct PoolOptions {
    /// Milliseconds between worker pool scaling decisions
    #[arg(long = "poll-interval-ms", default_value = "100")]
    pub poll_interval_ms: u64,

    /// Backlog size each worker is expected to absorb before another is spawned
    #[arg(long = "throughput-per-worker", default_value = "1000")]
    pub throughput_per_worker: u64,

    /// Upper bound on concurrently running workers (unbounded if not set)
    #[arg(long = "max-workers")]
    pub max_workers: Option<usize>,
}

/// Optional run metrics output.
#[derive(Debug, Clone, Default, Args)]
pub struct MetricsOptions {
    /// Optional TSV file receiving run metrics
    #[arg(long = "metrics")]
    pub metrics: Option<PathBuf>,
}
