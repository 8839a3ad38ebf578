//! Integration tests for tweetstat.
//!
//! These tests run the library pipeline and the compiled binary end to end
//! against generated input files.

mod helpers;
mod test_error_paths;
mod test_pipeline_concurrency;
mod test_run_command;
