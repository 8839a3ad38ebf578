//! Positioned records, their tagged wire form, and feature extraction.
//!
//! The record source tags each line with its position before placing it on the
//! backlog:
//!
//! ```text
//! "<position> <payload>"      e.g. "41 the quick brown fox"
//! ```
//!
//! Workers decode the tag, tokenize the payload on whitespace and derive the
//! record's feature: the number of distinct tokens.

use ahash::AHashSet;

use crate::errors::{Result, TweetstatError};

/// Longest slice of a bad record echoed back in a [`TweetstatError::MalformedRecord`].
const MAX_ERROR_ECHO: usize = 64;

/// One input line and its zero-based position in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedRecord {
    /// Zero-based line number
    pub position: u64,
    /// Raw line text without the terminator
    pub payload: String,
}

impl PositionedRecord {
    /// Creates a record.
    #[must_use]
    pub fn new(position: u64, payload: impl Into<String>) -> Self {
        Self { position, payload: payload.into() }
    }

    /// Encodes a position and payload into the tagged wire form.
    #[must_use]
    pub fn encode(position: u64, payload: &str) -> String {
        let mut tagged = String::with_capacity(payload.len() + 21);
        tagged.push_str(&position.to_string());
        tagged.push(' ');
        tagged.push_str(payload);
        tagged
    }

    /// Decodes a tagged record.
    ///
    /// # Errors
    ///
    /// Returns [`TweetstatError::MalformedRecord`] if the text does not begin
    /// with a decimal position followed by a single space.
    pub fn decode(tagged: &str) -> Result<Self> {
        let parsed = tagged
            .split_once(' ')
            .and_then(|(pos, payload)| pos.parse::<u64>().ok().map(|p| (p, payload)));
        match parsed {
            Some((position, payload)) => Ok(Self::new(position, payload)),
            None => Err(TweetstatError::MalformedRecord {
                record: tagged.chars().take(MAX_ERROR_ECHO).collect(),
            }),
        }
    }

    /// Whitespace-delimited tokens of the payload.
    pub fn tokens(&self) -> std::str::SplitWhitespace<'_> {
        self.payload.split_whitespace()
    }
}

/// Counts the distinct strings in `tokens`.
#[must_use]
pub fn distinct_token_count<'a>(tokens: impl IntoIterator<Item = &'a str>) -> usize {
    tokens.into_iter().collect::<AHashSet<_>>().len()
}

/// Largest feature a record of at most `max_record_length` characters can produce.
///
/// A line of `L` characters holds at most `ceil(L / 2)` distinct tokens
/// (single characters separated by single spaces).
///
/// # Example
/// ```
/// use tweetstat_lib::record::max_feature_for_length;
///
/// assert_eq!(max_feature_for_length(140), 70);
/// assert_eq!(max_feature_for_length(3), 2); // "a b"
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn max_feature_for_length(max_record_length: usize) -> u32 {
    max_record_length.div_ceil(2).min(u32::MAX as usize) as u32
}
