//! Compute the running median of distinct words per record and the grouped
//! word list for a text file.

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use tweetstat_lib::logging::log_run_summary;
use tweetstat_lib::metrics::write_metrics_auto;
use tweetstat_lib::pipeline::{DEFAULT_MEDIANS_FILE, PipelineConfig, run_pipeline};
use tweetstat_lib::pool::PoolConfig;

use crate::commands::command::Command;
use crate::commands::common::{MetricsOptions, PoolOptions, WordFileOptions};

/// Process a text file of records, one per line.
#[derive(Debug, Parser)]
#[command(
    name = "run",
    about = "\x1b[38;5;72m[PIPELINE]\x1b[0m       \x1b[36mRunning median of distinct words per line, plus word counts\x1b[0m",
    long_about = r#"
Process a text file of short records (one per line) and write two outputs to
the output directory:

  <medians-file>  one line per input record: the median, over all records so
                  far, of the number of distinct whitespace-separated words in
                  each record, with two decimal places.
  <words-file>    every word with its number of occurrences, sorted by word.
                  Words are grouped by leading character, each group is
                  written to <temp-prefix><index>.txt, and the groups are then
                  concatenated (unless --merge-words false).

Records are processed by a pool of worker threads that grows while the backlog
of unread records exceeds --throughput-per-worker per worker. The medians are
computed in input order after all records have been read.

Every word must start with a character whose code point lies within
[--min-discriminator, --max-discriminator], and no record may hold more than
ceil(--max-record-length / 2) distinct words; the run fails otherwise.

Example usage:
  tweetstat run -i tweets.txt -o out
  tweetstat run -i tweets.txt -o out --merge-words false --metrics out/run.tsv
"#
)]
pub struct Run {
    /// Input text file, one record per line
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,

    /// Output directory (created if absent)
    #[arg(short = 'o', long = "output-dir")]
    pub output_dir: PathBuf,

    /// Running medians file name (within the output directory)
    #[arg(long = "medians-file", default_value = DEFAULT_MEDIANS_FILE)]
    pub medians_file: String,

    /// Word file options
    #[command(flatten)]
    pub words: WordFileOptions,

    /// Lowest accepted code point for a word's first character
    #[arg(long = "min-discriminator", default_value = "33")]
    pub min_discriminator: u32,

    /// Highest accepted code point for a word's first character
    #[arg(long = "max-discriminator", default_value = "126")]
    pub max_discriminator: u32,

    /// Longest expected record in characters; bounds distinct words per record
    /// and sets the word column width
    #[arg(long = "max-record-length", default_value = "140")]
    pub max_record_length: usize,

    /// Concatenate the word group files into the words file
    #[arg(long = "merge-words", default_value = "true", action = clap::ArgAction::Set)]
    pub merge_words: bool,

    /// Wait for Enter before exiting
    #[arg(long = "wait-on-exit", default_value = "false")]
    pub wait_on_exit: bool,

    /// Worker pool options
    #[command(flatten)]
    pub pool: PoolOptions,

    /// Metrics output options
    #[command(flatten)]
    pub metrics: MetricsOptions,
}

impl Run {
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            medians_file: self.medians_file.clone(),
            words_file: self.words.words_file.clone(),
            temp_prefix: self.words.temp_prefix.clone(),
            min_discriminator: self.min_discriminator,
            max_discriminator: self.max_discriminator,
            max_record_length: self.max_record_length,
            merge_words: self.merge_words,
            pool: PoolConfig {
                poll_interval: Duration::from_millis(self.pool.poll_interval_ms),
                throughput_per_worker: self.pool.throughput_per_worker,
                max_workers: self.pool.max_workers,
            },
            ..PipelineConfig::new(&self.input, &self.output_dir)
        }
    }
}

impl Command for Run {
    fn execute(&self) -> Result<()> {
        let config = self.pipeline_config();
        config.validate()?;
        self.words.validate()?;

        info!("Starting Run");
        info!("Input: {}", config.input.display());
        info!("Output directory: {}", config.output_dir.display());
        info!(
            "Discriminator range: {}..={}, max record length {} (max {} distinct words)",
            config.min_discriminator,
            config.max_discriminator,
            config.max_record_length,
            config.max_feature()
        );
        match config.pool.max_workers {
            Some(max) => info!("Worker pool: up to {max} workers"),
            None => info!("Worker pool: unbounded"),
        }

        let metrics = run_pipeline(&config)
            .with_context(|| format!("Failed to process {}", config.input.display()))?;
        log_run_summary(&metrics);

        if let Some(path) = &self.metrics.metrics {
            write_metrics_auto(path, &[metrics])?;
            info!("Wrote run metrics to {}", path.display());
        }

        if self.wait_on_exit {
            eprintln!("Press Enter to exit");
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line).context("Failed to read from stdin")?;
        }

        Ok(())
    }
}
