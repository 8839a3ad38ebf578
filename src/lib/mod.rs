#![deny(unsafe_code)]
// Clippy lint configuration for CI
// - cast_*: feature values, counts and indices move between u32/u64/usize freely
// - missing_*_doc: error sections live on the public pipeline entry points
// - needless_pass_by_value: config and store values are consumed by stage functions
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::needless_pass_by_value,
    clippy::module_name_repetitions,
    clippy::uninlined_format_args
)]

//! # tweetstat - streaming text statistics
//!
//! Reads a large file of short text records (one per line) and produces two
//! outputs:
//!
//! - the running median of the number of distinct words per record, one line
//!   per record, in input order
//! - a word list with occurrence counts, alphabetised and grouped by leading
//!   character
//!
//! Records are processed by an adaptively sized pool of worker threads, in no
//! particular order. Each record's feature is stored under its input position
//! and the medians are computed afterwards in a single ordered replay, so the
//! output does not depend on scheduling.
//!
//! ## Modules
//!
//! ### Pipeline
//!
//! - **[`pipeline`]** - Stage orchestration and [`PipelineConfig`]
//! - **[`source`]** - Line reader feeding the shared [`source::Backlog`]
//! - **[`pool`]** - Adaptive worker pool and its spawn rule
//! - **[`record`]** - Tagged record codec and feature extraction
//! - **[`sequence_store`]** - Position-keyed feature store and ordered replay
//! - **[`word_tally`]** - Token counts sharded by leading character
//! - **[`word_writer`]** - Group files and the merged word list
//!
//! ### Utilities
//!
//! - **[`errors`]** - [`TweetstatError`] and the crate `Result` alias
//! - **[`validation`]** - Parameter and path checks
//! - **[`logging`]** - Stage timers and duration/rate formatting
//! - **[`progress`]** - Interval progress logging
//! - **[`metrics`]** - Run metrics and TSV output
//!
//! The running median itself lives in the `tweetstat-median` crate.
//!
//! ## Quick Start
//!
//! ```no_run
//! use tweetstat_lib::pipeline::{PipelineConfig, run_pipeline};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = PipelineConfig::new("tweets.txt", "out");
//! let metrics = run_pipeline(&config)?;
//! println!("{} records, final median {:.2}", metrics.records, metrics.final_median);
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod pool;
pub mod progress;
pub mod record;
pub mod sequence_store;
pub mod source;
pub mod validation;
pub mod word_tally;
pub mod word_writer;

pub use errors::{Result, TweetstatError};
pub use pipeline::{PipelineConfig, run_pipeline};
pub use tweetstat_median::{MedianError, RunningMedian};
