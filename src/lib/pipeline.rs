//! End-to-end run: ingest, replay, word files, merge.
//!
//! ```text
//! Stage 1 (ingest)
//!   source thread ──tagged records──▶ Backlog ──▶ adaptive workers
//!                                                   │         │
//!                                         SequenceStore    WordTally
//! Stage 2 (output)
//!   SequenceStore ─▶ replay ─▶ RunningMedian ─▶ medians file
//!   WordTally     ─▶ sorted group files (rayon)          } run concurrently
//! Stage 3 (merge, optional)
//!   group files ─▶ words file
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::thread;

use log::info;
use tweetstat_median::{MedianError, RunningMedian, format_median};

use crate::errors::{Result, TweetstatError};
use crate::logging::OperationTimer;
use crate::metrics::RunMetrics;
use crate::pool::{PoolConfig, PoolStats, WorkerPool};
use crate::progress::ProgressTracker;
use crate::record::{PositionedRecord, distinct_token_count, max_feature_for_length};
use crate::sequence_store::SequenceStore;
use crate::source::{Backlog, read_records};
use crate::validation::{
    ensure_output_dir, validate_at_most, validate_file_exists, validate_file_name,
    validate_min_max, validate_positive,
};
use crate::word_tally::{DEFAULT_MAX_DISCRIMINATOR, DEFAULT_MIN_DISCRIMINATOR, WordTally};
use crate::word_writer::{GroupFileLayout, merge_group_files, write_group_files};

/// Default medians file name.
pub const DEFAULT_MEDIANS_FILE: &str = "ft2.txt";
/// Default merged words file name.
pub const DEFAULT_WORDS_FILE: &str = "ft1.txt";
/// Default group file prefix.
pub const DEFAULT_TEMP_PREFIX: &str = "words_";
/// Default maximum record length in characters.
pub const DEFAULT_MAX_RECORD_LENGTH: usize = 140;

/// Largest accepted maximum record length; sizes the median histogram and the
/// word column width.
pub const MAX_RECORD_LENGTH_LIMIT: usize = 65_536;

const REPLAY_PROGRESS_INTERVAL: u64 = 1_000_000;

/// Everything a run needs; built by the CLI or directly by callers.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Input text file, one record per line
    pub input: PathBuf,
    /// Directory receiving every output file
    pub output_dir: PathBuf,
    /// Medians file name within `output_dir`
    pub medians_file: String,
    /// Merged words file name within `output_dir`
    pub words_file: String,
    /// Prefix of the per-group word files
    pub temp_prefix: String,
    /// Lowest accepted leading code point
    pub min_discriminator: u32,
    /// Highest accepted leading code point
    pub max_discriminator: u32,
    /// Longest expected record, in characters
    pub max_record_length: usize,
    /// Concatenate the group files into the words file
    pub merge_words: bool,
    /// Worker pool sizing
    pub pool: PoolConfig,
}

impl PipelineConfig {
    /// Creates a configuration with defaults for everything but the paths.
    #[must_use]
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
            medians_file: DEFAULT_MEDIANS_FILE.to_string(),
            words_file: DEFAULT_WORDS_FILE.to_string(),
            temp_prefix: DEFAULT_TEMP_PREFIX.to_string(),
            min_discriminator: DEFAULT_MIN_DISCRIMINATOR,
            max_discriminator: DEFAULT_MAX_DISCRIMINATOR,
            max_record_length: DEFAULT_MAX_RECORD_LENGTH,
            merge_words: true,
            pool: PoolConfig::default(),
        }
    }

    /// Checks every parameter without touching the filesystem.
    ///
    /// # Errors
    ///
    /// Returns [`TweetstatError::InvalidParameter`] naming the first bad option.
    pub fn validate(&self) -> Result<()> {
        validate_min_max(
            self.min_discriminator,
            self.max_discriminator,
            "min-discriminator",
            "max-discriminator",
        )?;
        validate_positive(self.max_record_length as u64, "max-record-length")?;
        validate_at_most(self.max_record_length, MAX_RECORD_LENGTH_LIMIT, "max-record-length")?;
        validate_positive(self.pool.throughput_per_worker, "throughput-per-worker")?;
        validate_positive(
            u64::try_from(self.pool.poll_interval.as_millis()).unwrap_or(u64::MAX),
            "poll-interval-ms",
        )?;
        if let Some(max) = self.pool.max_workers {
            validate_positive(max as u64, "max-workers")?;
        }
        validate_file_name(&self.medians_file, "medians-file")?;
        validate_file_name(&self.words_file, "words-file")?;
        validate_file_name(&self.temp_prefix, "temp-prefix")?;
        Ok(())
    }

    /// Largest feature the median histogram accepts.
    #[must_use]
    pub fn max_feature(&self) -> u32 {
        max_feature_for_length(self.max_record_length)
    }

    /// Path of the medians file.
    #[must_use]
    pub fn medians_path(&self) -> PathBuf {
        self.output_dir.join(&self.medians_file)
    }

    /// Path of the merged words file.
    #[must_use]
    pub fn words_path(&self) -> PathBuf {
        self.output_dir.join(&self.words_file)
    }

    /// Naming scheme for this run's group files.
    #[must_use]
    pub fn group_layout(&self) -> GroupFileLayout {
        let largest_index = (self.max_discriminator - self.min_discriminator) as usize;
        GroupFileLayout::new(&self.output_dir, &self.temp_prefix, largest_index)
    }
}

/// Feature range and last median seen by the replay pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReplaySummary {
    /// Features replayed
    pub records: u64,
    /// Smallest feature
    pub min_feature: u32,
    /// Largest feature
    pub max_feature: u32,
    /// Median after the last feature (0 when empty)
    pub final_median: f64,
}

/// Feeds features in order through a [`RunningMedian`], passing each new
/// median to `emit`.
///
/// # Errors
///
/// Returns [`TweetstatError::DomainBound`] for a feature above `max_feature`
/// (nothing further is emitted), or the first error returned by `emit`.
pub fn replay_medians<I, F>(features: I, max_feature: u32, mut emit: F) -> Result<ReplaySummary>
where
    I: IntoIterator<Item = u32>,
    F: FnMut(f64) -> Result<()>,
{
    let mut tracker = RunningMedian::new(max_feature);
    let mut summary = ReplaySummary { min_feature: u32::MAX, ..ReplaySummary::default() };
    let progress = ProgressTracker::new("Replayed medians").with_interval(REPLAY_PROGRESS_INTERVAL);

    for feature in features {
        let median = tracker.push(feature)?;
        emit(median)?;
        summary.min_feature = summary.min_feature.min(feature);
        summary.max_feature = summary.max_feature.max(feature);
        summary.final_median = median;
        progress.add(1);
    }
    progress.finish();

    summary.records = tracker.len();
    if summary.records == 0 {
        summary.min_feature = 0;
    }
    Ok(summary)
}

fn write_medians_file(
    store: SequenceStore,
    records: u64,
    max_feature: u32,
    path: &Path,
) -> Result<ReplaySummary> {
    let replay = store.into_replay(records)?;
    let file = File::create(path).map_err(|e| TweetstatError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    let summary = replay_medians(replay.map(|(_, feature)| feature), max_feature, |median| {
        writeln!(writer, "{}", format_median(median)).map_err(|e| TweetstatError::io(path, e))
    })?;
    writer.flush().map_err(|e| TweetstatError::io(path, e))?;
    Ok(summary)
}

/// Decodes one tagged record and files its feature and tokens.
///
/// Nothing is stored for a record whose feature exceeds `max_feature`, so an
/// out-of-bound record fails ingestion before any output file exists.
///
/// # Errors
///
/// Returns [`TweetstatError::MalformedRecord`], [`TweetstatError::DomainBound`]
/// or [`TweetstatError::DiscriminatorOutOfRange`].
pub fn process_record(
    tagged: &str,
    max_feature: u32,
    store: &SequenceStore,
    tally: &WordTally,
) -> Result<()> {
    let record = PositionedRecord::decode(tagged)?;
    let feature = u32::try_from(distinct_token_count(record.tokens())).unwrap_or(u32::MAX);
    if feature > max_feature {
        return Err(MedianError::DomainBoundViolation { value: feature, max: max_feature }.into());
    }
    store.insert(record.position, feature);
    tally.add_all(record.tokens())
}

struct Ingested {
    records: u64,
    store: SequenceStore,
    tally: WordTally,
    pool: PoolStats,
}

fn ingest(config: &PipelineConfig) -> Result<Ingested> {
    let backlog = Backlog::new();
    let store = SequenceStore::new();
    let tally = WordTally::new(config.min_discriminator, config.max_discriminator)?;
    let pool = WorkerPool::new(config.pool);
    let max_feature = config.max_feature();

    let (records, pool_stats) = thread::scope(|scope| {
        let source = scope.spawn(|| read_records(&config.input, &backlog));
        let pool_result = pool.run(&backlog, |tagged| process_record(&tagged, max_feature, &store, &tally));
        let source_result = source
            .join()
            .unwrap_or_else(|_| Err(TweetstatError::WorkerPanic("record source panicked".into())));
        // A source failure aborts the pool without an error of its own
        let records = source_result?;
        pool_result.map(|stats| (records, stats))
    })?;

    Ok(Ingested { records, store, tally, pool: pool_stats })
}

/// Runs the whole pipeline and returns its metrics.
///
/// # Errors
///
/// Returns the first error from any stage. Output files already written are
/// left in place.
pub fn run_pipeline(config: &PipelineConfig) -> Result<RunMetrics> {
    config.validate()?;
    validate_file_exists(&config.input, "Input file")?;
    ensure_output_dir(&config.output_dir)?;

    let timer = OperationTimer::new("Ingesting records");
    let Ingested { records, store, tally, pool } = ingest(config)?;
    let ingest_time = timer.log_completion(records);
    let total_tokens = tally.total_tokens();
    let distinct_tokens = tally.distinct_tokens();

    let timer = OperationTimer::new("Writing medians and word groups");
    let medians_path = config.medians_path();
    let layout = config.group_layout();
    let (replay, groups) = rayon::join(
        || write_medians_file(store, records, config.max_feature(), &medians_path),
        || write_group_files(&layout, tally.into_groups(), config.max_record_length),
    );
    let replay = replay?;
    let group_files = groups?;
    let output_time = timer.log_completion(records);
    info!("Wrote {} medians to {}", replay.records, medians_path.display());

    let mut merge_seconds = 0.0;
    if config.merge_words {
        let timer = OperationTimer::new("Merging word groups");
        let words_path = config.words_path();
        merge_group_files(&group_files, &words_path, false)?;
        merge_seconds = timer.log_completion(group_files.len() as u64).as_secs_f64();
        info!("Wrote merged word list to {}", words_path.display());
    } else {
        info!("Leaving {} word group files in {}", group_files.len(), config.output_dir.display());
    }

    Ok(RunMetrics {
        records,
        total_tokens,
        distinct_tokens,
        word_groups: group_files.len() as u64,
        workers_spawned: pool.workers_spawned,
        peak_workers: pool.peak_workers,
        coordinator_ticks: pool.ticks,
        min_feature: replay.min_feature,
        max_feature: replay.max_feature,
        final_median: replay.final_median,
        ingest_seconds: ingest_time.as_secs_f64(),
        output_seconds: output_time.as_secs_f64(),
        merge_seconds,
    })
}
