//! Record backlog and the producer that fills it.
//!
//! A single source thread reads the input line by line, tags each line with
//! its position and pushes it onto the [`Backlog`]. Workers pop from the other
//! end. The backlog also carries the run-wide completion and error state:
//!
//! - `done` is set by the source once the input is exhausted (or failed)
//! - the first error from any thread is kept and raises the abort flag, which
//!   tells the source and the workers to stop early

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_queue::SegQueue;
use log::debug;
use parking_lot::Mutex;

use crate::errors::{Result, TweetstatError};
use crate::progress::ProgressTracker;
use crate::record::PositionedRecord;

/// Interval between source progress log lines.
const SOURCE_PROGRESS_INTERVAL: u64 = 1_000_000;

/// Buffer size for the input reader.
const READ_BUFFER_SIZE: usize = 1 << 20;

/// Unbounded multi-consumer queue of tagged records plus shared run state.
#[derive(Debug, Default)]
pub struct Backlog {
    queue: SegQueue<String>,
    done: AtomicBool,
    abort: AtomicBool,
    error: Mutex<Option<TweetstatError>>,
}

impl Backlog {
    /// Creates an empty backlog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues a tagged record.
    pub fn push(&self, tagged: String) {
        self.queue.push(tagged);
    }

    /// Dequeues a tagged record, or `None` if the backlog is momentarily empty.
    pub fn pop(&self) -> Option<String> {
        self.queue.pop()
    }

    /// Number of records waiting.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if no records are waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Marks the source as finished; no further records will be pushed.
    pub fn mark_done(&self) {
        self.done.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once the source has finished.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::SeqCst)
    }

    /// Signals every thread to stop without recording an error.
    pub fn abort(&self) {
        self.abort.store(true, Ordering::SeqCst);
    }

    /// Records an error and signals every thread to stop.
    ///
    /// Only the first error is kept.
    pub fn fail(&self, error: TweetstatError) {
        self.abort();
        let mut guard = self.error.lock();
        if guard.is_none() {
            *guard = Some(error);
        }
    }

    /// Returns `true` if any thread has failed.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.abort.load(Ordering::Relaxed)
    }

    /// Takes the stored error, if any.
    pub fn take_error(&self) -> Option<TweetstatError> {
        self.error.lock().take()
    }
}

/// Reads `\n` or `\r\n` terminated lines from `reader` onto the backlog.
///
/// Positions start at 0 and increase by one per line. Invalid UTF-8 is
/// replaced rather than rejected. Reading stops early if the backlog has been
/// aborted. Returns the number of records pushed.
///
/// # Errors
///
/// Returns the underlying I/O error if a read fails.
pub fn push_lines<R: BufRead>(
    mut reader: R,
    backlog: &Backlog,
    progress: &ProgressTracker,
) -> std::io::Result<u64> {
    let mut buf = Vec::with_capacity(256);
    let mut position = 0u64;

    loop {
        if backlog.is_aborted() {
            debug!("Record source stopping early at position {position}");
            break;
        }
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        let payload = String::from_utf8_lossy(&buf);
        backlog.push(PositionedRecord::encode(position, &payload));
        position += 1;
        progress.add(1);
    }

    Ok(position)
}

/// Reads every line of `path` onto the backlog, then marks it done.
///
/// The backlog is marked done on every exit path. On failure the backlog is
/// aborted so the workers stop, and the error is returned to the caller.
///
/// # Errors
///
/// Returns [`TweetstatError::Io`] naming `path` if it cannot be opened or read.
pub fn read_records<P: AsRef<Path>>(path: P, backlog: &Backlog) -> Result<u64> {
    let path = path.as_ref();
    let progress = ProgressTracker::new("Read records").with_interval(SOURCE_PROGRESS_INTERVAL);

    let result = File::open(path)
        .and_then(|file| {
            push_lines(BufReader::with_capacity(READ_BUFFER_SIZE, file), backlog, &progress)
        })
        .map_err(|e| TweetstatError::io(path, e));

    if result.is_ok() {
        progress.finish();
    } else {
        backlog.abort();
    }
    backlog.mark_done();
    result
}
