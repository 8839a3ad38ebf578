//! CLI command implementations for tweetstat.
//!
//! - [`run`] - Compute running medians and the word list from a text file
//! - [`merge`] - Concatenate word group files left by `run --merge-words false`

pub mod command;
pub mod common;
pub mod merge;
pub mod run;
