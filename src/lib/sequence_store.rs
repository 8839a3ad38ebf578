//! Concurrent position → feature store and its ordered replay.
//!
//! Workers finish records in any order, so each feature is written under its
//! original position. Once ingestion is complete the store is consumed by
//! [`SequenceStore::into_replay`], which checks that the positions are exactly
//! `0..N` and yields the features in position order.
//!
//! # Example
//!
//! ```
//! use tweetstat_lib::sequence_store::SequenceStore;
//!
//! let store = SequenceStore::new();
//! store.insert(2, 30);
//! store.insert(0, 10);
//! store.insert(1, 20);
//!
//! let features: Vec<_> = store.into_replay(3).unwrap().map(|(_, f)| f).collect();
//! assert_eq!(features, vec![10, 20, 30]);
//! ```

use ahash::AHashMap;
use parking_lot::Mutex;

use crate::errors::{Result, TweetstatError};

/// Number of independently locked shards.
const DEFAULT_SHARDS: usize = 64;

/// Thread-safe mapping from record position to feature value.
///
/// Positions are spread over shards by `position % shards`, so workers
/// writing neighbouring positions take different locks.
#[derive(Debug)]
pub struct SequenceStore {
    shards: Vec<Mutex<AHashMap<u64, u32>>>,
}

impl SequenceStore {
    /// Creates an empty store with the default shard count.
    #[must_use]
    pub fn new() -> Self {
        Self::with_shards(DEFAULT_SHARDS)
    }

    /// Creates an empty store with `shards` locks (at least 1).
    #[must_use]
    pub fn with_shards(shards: usize) -> Self {
        Self { shards: (0..shards.max(1)).map(|_| Mutex::new(AHashMap::new())).collect() }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn shard(&self, position: u64) -> &Mutex<AHashMap<u64, u32>> {
        &self.shards[(position % self.shards.len() as u64) as usize]
    }

    /// Records `feature` for `position`, returning any value it replaced.
    ///
    /// A repeated write to the same position overwrites the earlier value.
    pub fn insert(&self, position: u64, feature: u32) -> Option<u32> {
        self.shard(position).lock().insert(position, feature)
    }

    /// Returns the feature stored for `position`.
    #[must_use]
    pub fn get(&self, position: u64) -> Option<u32> {
        self.shard(position).lock().get(&position).copied()
    }

    /// Number of positions stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.lock().len()).sum()
    }

    /// Returns `true` if nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|s| s.lock().is_empty())
    }

    /// Consumes the store and returns its features in ascending position order.
    ///
    /// The whole key set is validated before anything is yielded, so a caller
    /// never observes a partial sequence.
    ///
    /// # Errors
    ///
    /// - [`TweetstatError::UnexpectedPosition`] if any position is `>= expected_len`
    ///   (the smallest such position is reported)
    /// - [`TweetstatError::SequenceGap`] naming the first position in
    ///   `0..expected_len` with no feature
    #[allow(clippy::cast_possible_truncation)]
    pub fn into_replay(self, expected_len: u64) -> Result<Replay> {
        let mut slots: Vec<Option<u32>> = vec![None; expected_len as usize];
        let mut out_of_range: Option<u64> = None;

        for shard in self.shards {
            for (position, feature) in shard.into_inner() {
                match slots.get_mut(position as usize) {
                    Some(slot) if position < expected_len => *slot = Some(feature),
                    _ => {
                        out_of_range = Some(out_of_range.map_or(position, |p| p.min(position)));
                    }
                }
            }
        }

        if let Some(position) = out_of_range {
            return Err(TweetstatError::UnexpectedPosition { position, expected_len });
        }

        let features = slots
            .into_iter()
            .enumerate()
            .map(|(position, slot)| {
                slot.ok_or(TweetstatError::SequenceGap { position: position as u64 })
            })
            .collect::<Result<Vec<u32>>>()?;

        Ok(Replay { features: features.into_iter(), next_position: 0 })
    }
}

impl Default for SequenceStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over `(position, feature)` in ascending position order.
#[derive(Debug)]
pub struct Replay {
    features: std::vec::IntoIter<u32>,
    next_position: u64,
}

impl Iterator for Replay {
    type Item = (u64, u32);

    fn next(&mut self) -> Option<Self::Item> {
        let feature = self.features.next()?;
        let position = self.next_position;
        self.next_position += 1;
        Some((position, feature))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.features.size_hint()
    }
}

impl ExactSizeIterator for Replay {}
