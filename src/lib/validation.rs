//! Input validation utilities
//!
//! Validation helpers for command-line parameters and paths. Every helper
//! returns a structured [`TweetstatError`] naming the offending parameter or path.

use crate::errors::{Result, TweetstatError};
use std::fmt::Display;
use std::fs;
use std::path::Path;

/// Validate that a path exists and is a regular file
///
/// # Errors
/// Returns an error if the path does not exist or is a directory
///
/// # Example
/// ```
/// use tweetstat_lib::validation::validate_file_exists;
///
/// let result = validate_file_exists("/nonexistent/tweets.txt", "Input file");
/// assert!(result.is_err());
/// ```
pub fn validate_file_exists<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    let path_ref = path.as_ref();
    let reason = if !path_ref.exists() {
        "File does not exist"
    } else if !path_ref.is_file() {
        "Path is not a regular file"
    } else {
        return Ok(());
    };
    Err(TweetstatError::InvalidFileFormat {
        file_type: description.to_string(),
        path: path_ref.display().to_string(),
        reason: reason.to_string(),
    })
}

/// Create the output directory if needed and check that it is a directory
///
/// # Errors
/// Returns an error if the path exists but is not a directory, or cannot be created
pub fn ensure_output_dir<P: AsRef<Path>>(path: P) -> Result<()> {
    let path_ref = path.as_ref();
    if path_ref.exists() && !path_ref.is_dir() {
        return Err(TweetstatError::InvalidFileFormat {
            file_type: "Output directory".to_string(),
            path: path_ref.display().to_string(),
            reason: "Path exists and is not a directory".to_string(),
        });
    }
    fs::create_dir_all(path_ref).map_err(|e| TweetstatError::io(path_ref, e))
}

/// Validate that max >= min
///
/// # Errors
/// Returns an error if max < min
///
/// # Example
/// ```
/// use tweetstat_lib::validation::validate_min_max;
///
/// validate_min_max(33, 126, "min-discriminator", "max-discriminator").unwrap();
/// assert!(validate_min_max(126, 33, "min-discriminator", "max-discriminator").is_err());
/// ```
#[allow(clippy::needless_pass_by_value)]
pub fn validate_min_max<T: Ord + Display>(
    min_val: T,
    max_val: T,
    min_name: &str,
    max_name: &str,
) -> Result<()> {
    if max_val < min_val {
        return Err(TweetstatError::InvalidParameter {
            parameter: max_name.to_string(),
            reason: format!("{max_name} ({max_val}) must be >= {min_name} ({min_val})"),
        });
    }
    Ok(())
}

/// Validate that a numeric parameter is at least 1
///
/// # Errors
/// Returns an error if the value is zero
///
/// # Example
/// ```
/// use tweetstat_lib::validation::validate_positive;
///
/// validate_positive(1000_u32, "throughput-per-worker").unwrap();
/// assert!(validate_positive(0_u32, "throughput-per-worker").is_err());
/// ```
pub fn validate_positive<T: Into<u64> + Copy>(value: T, name: &str) -> Result<()> {
    if value.into() == 0 {
        return Err(TweetstatError::InvalidParameter {
            parameter: name.to_string(),
            reason: "must be >= 1".to_string(),
        });
    }
    Ok(())
}

/// Validate that a numeric parameter does not exceed an upper limit
///
/// # Errors
/// Returns an error if the value is greater than `limit`
///
/// # Example
/// ```
/// use tweetstat_lib::validation::validate_at_most;
///
/// validate_at_most(140, 65_536, "max-record-length").unwrap();
/// assert!(validate_at_most(usize::MAX, 65_536, "max-record-length").is_err());
/// ```
pub fn validate_at_most<T: Ord + Display>(value: T, limit: T, name: &str) -> Result<()> {
    if value > limit {
        return Err(TweetstatError::InvalidParameter {
            parameter: name.to_string(),
            reason: format!("{value} must be <= {limit}"),
        });
    }
    Ok(())
}

/// Validate that a file name has no directory components
///
/// Output names are joined onto the output directory, so separators would
/// silently write elsewhere.
///
/// # Errors
/// Returns an error if the name is empty or contains a path separator
pub fn validate_file_name(name: &str, parameter: &str) -> Result<()> {
    if name.is_empty() || name.contains(['/', '\\']) {
        return Err(TweetstatError::InvalidParameter {
            parameter: parameter.to_string(),
            reason: format!("'{name}' must be a plain, non-empty file name"),
        });
    }
    Ok(())
}
