//! Token frequency tally grouped by leading character.
//!
//! Every token is filed under its *discriminator*, the code point of its first
//! character. The accepted range `[min, max]` is fixed up front and each
//! discriminator gets its own lock, so workers adding tokens that start with
//! different characters never contend.

use std::sync::atomic::{AtomicU64, Ordering};

use ahash::AHashMap;
use parking_lot::Mutex;

use crate::errors::{Result, TweetstatError};

/// Default lowest accepted discriminator (`'!'`).
pub const DEFAULT_MIN_DISCRIMINATOR: u32 = 33;

/// Default highest accepted discriminator (`'~'`).
pub const DEFAULT_MAX_DISCRIMINATOR: u32 = 126;

/// Returns the discriminator of `token`, or `None` for an empty token.
#[must_use]
pub fn discriminator(token: &str) -> Option<u32> {
    token.chars().next().map(u32::from)
}

/// Concurrent `token -> count` tally sharded by discriminator.
#[derive(Debug)]
pub struct WordTally {
    min: u32,
    max: u32,
    groups: Vec<Mutex<AHashMap<String, u64>>>,
    total_tokens: AtomicU64,
}

impl WordTally {
    /// Creates an empty tally accepting discriminators in `min..=max`.
    ///
    /// # Errors
    ///
    /// Returns [`TweetstatError::InvalidParameter`] if `min > max`.
    pub fn new(min: u32, max: u32) -> Result<Self> {
        if min > max {
            return Err(TweetstatError::InvalidParameter {
                parameter: "max-discriminator".to_string(),
                reason: format!("max-discriminator ({max}) must be >= min-discriminator ({min})"),
            });
        }
        let groups = (min..=max).map(|_| Mutex::new(AHashMap::new())).collect();
        Ok(Self { min, max, groups, total_tokens: AtomicU64::new(0) })
    }

    /// Number of groups, `max - min + 1`.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Counts one occurrence of `token`.
    ///
    /// # Errors
    ///
    /// Returns [`TweetstatError::DiscriminatorOutOfRange`] if the token's first
    /// character falls outside the configured range. Empty tokens are ignored.
    pub fn add(&self, token: &str) -> Result<()> {
        let Some(value) = discriminator(token) else { return Ok(()) };
        if value < self.min || value > self.max {
            return Err(TweetstatError::DiscriminatorOutOfRange {
                token: token.to_string(),
                value,
                min: self.min,
                max: self.max,
            });
        }

        let mut group = self.groups[(value - self.min) as usize].lock();
        match group.get_mut(token) {
            Some(count) => *count += 1,
            None => {
                group.insert(token.to_string(), 1);
            }
        }
        drop(group);
        self.total_tokens.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Counts every token yielded by `tokens`, stopping at the first error.
    ///
    /// # Errors
    ///
    /// See [`WordTally::add`].
    pub fn add_all<'a>(&self, tokens: impl IntoIterator<Item = &'a str>) -> Result<()> {
        tokens.into_iter().try_for_each(|token| self.add(token))
    }

    /// Occurrences counted so far.
    #[must_use]
    pub fn total_tokens(&self) -> u64 {
        self.total_tokens.load(Ordering::Relaxed)
    }

    /// Distinct tokens counted so far.
    #[must_use]
    pub fn distinct_tokens(&self) -> u64 {
        self.groups.iter().map(|g| g.lock().len() as u64).sum()
    }

    /// Returns the current count for `token` (0 if unseen or out of range).
    #[must_use]
    pub fn count(&self, token: &str) -> u64 {
        discriminator(token)
            .filter(|v| (self.min..=self.max).contains(v))
            .and_then(|v| self.groups[(v - self.min) as usize].lock().get(token).copied())
            .unwrap_or(0)
    }

    /// Consumes the tally, returning its non-empty groups in ascending
    /// discriminator order.
    #[must_use]
    pub fn into_groups(self) -> Vec<WordGroup> {
        let min = self.min;
        self.groups
            .into_iter()
            .enumerate()
            .map(|(index, group)| (index, group.into_inner()))
            .filter(|(_, words)| !words.is_empty())
            .map(|(index, words)| WordGroup { index, discriminator: min + index as u32, words })
            .collect()
    }
}

/// All tokens sharing one discriminator.
#[derive(Debug, Clone)]
pub struct WordGroup {
    /// Offset of the discriminator from the range minimum
    pub index: usize,
    /// Leading code point shared by every token in the group
    pub discriminator: u32,
    words: AHashMap<String, u64>,
}

impl WordGroup {
    /// Number of distinct tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` if the group holds no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Consumes the group, returning `(token, count)` pairs sorted by token
    /// in byte order.
    #[must_use]
    pub fn into_sorted(self) -> Vec<(String, u64)> {
        let mut words: Vec<_> = self.words.into_iter().collect();
        words.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        words
    }
}
