//! Custom error types for tweetstat operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tweetstat_median::MedianError;

/// Result type alias for tweetstat operations
pub type Result<T> = std::result::Result<T, TweetstatError>;

/// Error type for tweetstat operations.
///
/// Every variant is fatal for the run: nothing is retried.
#[derive(Error, Debug)]
pub enum TweetstatError {
    /// Invalid parameter value provided
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The parameter name
        parameter: String,
        /// Explanation of why it's invalid
        reason: String,
    },

    /// Input or output path is unusable
    #[error("Invalid {file_type} '{path}': {reason}")]
    InvalidFileFormat {
        /// Type of file (e.g., "Input file", "Output directory")
        file_type: String,
        /// Path to the file
        path: String,
        /// Explanation of the problem
        reason: String,
    },

    /// A feature value fell outside the histogram domain
    #[error(transparent)]
    DomainBound(#[from] MedianError),

    /// A token's leading character is outside the configured discriminator range
    #[error(
        "Token '{token}' starts with code point {value}, outside the discriminator range [{min}, {max}]"
    )]
    DiscriminatorOutOfRange {
        /// The offending token
        token: String,
        /// Code point of its first character
        value: u32,
        /// Lowest accepted code point
        min: u32,
        /// Highest accepted code point
        max: u32,
    },

    /// A tagged record did not start with a parseable position
    #[error("Malformed record, expected '<position> <payload>': '{record}'")]
    MalformedRecord {
        /// The record text (truncated for display)
        record: String,
    },

    /// No feature was stored for a position below the record count
    #[error("No feature recorded for position {position}; record positions are not contiguous")]
    SequenceGap {
        /// First missing position
        position: u64,
    },

    /// A feature was stored for a position at or beyond the record count
    #[error("Feature recorded for position {position} but only {expected_len} records were read")]
    UnexpectedPosition {
        /// The out-of-range position
        position: u64,
        /// Number of records the source produced
        expected_len: u64,
    },

    /// Read or write failure on a file
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        /// The failing path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// A worker thread panicked
    #[error("Worker thread panicked: {0}")]
    WorkerPanic(String),
}

impl TweetstatError {
    /// Wraps an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}
