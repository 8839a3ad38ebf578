//! Adaptive worker pool that drains the record backlog.
//!
//! The calling thread acts as coordinator. Every tick it inspects the backlog
//! and grows the pool by at most one worker when
//!
//! ```text
//! (active == 0 && backlog > 0) || backlog > throughput_per_worker * active
//! ```
//!
//! Workers never block: each pops records until the backlog is momentarily
//! empty and then exits, so the pool shrinks to zero on its own when the
//! source falls behind. The run is complete once the source is done, the
//! backlog is empty and no worker is active.
//!
//! The first error from a worker aborts the backlog. The coordinator stops
//! spawning, waits for the remaining workers to notice and exit, then returns
//! the error.

use std::any::Any;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::thread::{self, ScopedJoinHandle};
use std::time::Duration;

use log::{debug, trace};

use crate::errors::{Result, TweetstatError};
use crate::source::Backlog;

/// Default coordinator tick.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Default backlog size each worker is expected to absorb.
pub const DEFAULT_THROUGHPUT_PER_WORKER: u64 = 1000;

/// Pool sizing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Coordinator sleep between spawn decisions
    pub poll_interval: Duration,
    /// Backlog records per active worker before another is spawned
    pub throughput_per_worker: u64,
    /// Optional cap on concurrently active workers
    pub max_workers: Option<usize>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            throughput_per_worker: DEFAULT_THROUGHPUT_PER_WORKER,
            max_workers: None,
        }
    }
}

/// Counters collected by the coordinator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Workers started over the whole run
    pub workers_spawned: u64,
    /// Largest number of workers active at once
    pub peak_workers: u64,
    /// Coordinator ticks
    pub ticks: u64,
    /// Records handed to the processing function
    pub records_processed: u64,
}

/// Returns `true` if the coordinator should start one more worker.
///
/// # Example
/// ```
/// use tweetstat_lib::pool::should_spawn;
///
/// assert!(should_spawn(1, 0, 1000));      // work waiting, nobody on it
/// assert!(!should_spawn(1000, 1, 1000));  // one worker keeps up
/// assert!(should_spawn(2001, 2, 1000));   // falling behind
/// ```
#[must_use]
pub fn should_spawn(backlog: usize, active: usize, throughput_per_worker: u64) -> bool {
    let backlog = backlog as u64;
    let active = active as u64;
    (active == 0 && backlog > 0) || backlog > throughput_per_worker.saturating_mul(active)
}

/// Decrements the active count when a worker exits, including by panic.
struct ActiveGuard<'a>(&'a AtomicUsize);

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Coordinator for an adaptively sized set of worker threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerPool {
    config: PoolConfig,
}

impl WorkerPool {
    /// Creates a pool with the given sizing parameters.
    #[must_use]
    pub fn new(config: PoolConfig) -> Self {
        Self { config }
    }

    /// Sizing parameters.
    #[must_use]
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    fn spawn_allowed(&self, backlog: usize, active: usize) -> bool {
        self.config.max_workers.is_none_or(|max| active < max)
            && should_spawn(backlog, active, self.config.throughput_per_worker)
    }

    /// Drains `backlog`, calling `process` once per tagged record, until the
    /// source is done and every record has been handled.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by `process` (or recorded on the
    /// backlog by anyone else), or [`TweetstatError::WorkerPanic`] if a worker
    /// panicked. In either case all workers have exited before this returns.
    pub fn run<F>(&self, backlog: &Backlog, process: F) -> Result<PoolStats>
    where
        F: Fn(String) -> Result<()> + Sync,
    {
        let active = AtomicUsize::new(0);
        let processed = AtomicU64::new(0);
        let mut stats = PoolStats::default();

        thread::scope(|scope| {
            let mut handles: Vec<ScopedJoinHandle<'_, ()>> = Vec::new();

            loop {
                reap_finished(&mut handles, backlog);

                let running = active.load(Ordering::SeqCst);
                if backlog.is_aborted() {
                    if running == 0 {
                        break;
                    }
                } else if backlog.is_done() && backlog.is_empty() && running == 0 {
                    break;
                } else {
                    let waiting = backlog.len();
                    let spawn = self.spawn_allowed(waiting, running);
                    trace!("Tick {}: backlog={waiting} active={running} spawn={spawn}", stats.ticks);
                    if spawn {
                        active.fetch_add(1, Ordering::SeqCst);
                        stats.workers_spawned += 1;
                        stats.peak_workers = stats.peak_workers.max((running + 1) as u64);
                        debug!(
                            "Spawning worker {} ({} active, backlog {waiting})",
                            stats.workers_spawned,
                            running + 1
                        );
                        let (active, processed, process) = (&active, &processed, &process);
                        handles.push(scope.spawn(move || {
                            let _guard = ActiveGuard(active);
                            worker_loop(backlog, process, processed);
                        }));
                    }
                }

                stats.ticks += 1;
                thread::sleep(self.config.poll_interval);
            }

            for handle in handles {
                join_worker(handle, backlog);
            }
        });

        stats.records_processed = processed.load(Ordering::SeqCst);
        match backlog.take_error() {
            Some(error) => Err(error),
            None => Ok(stats),
        }
    }
}

fn worker_loop<F>(backlog: &Backlog, process: &F, processed: &AtomicU64)
where
    F: Fn(String) -> Result<()>,
{
    while !backlog.is_aborted() {
        let Some(tagged) = backlog.pop() else { break };
        processed.fetch_add(1, Ordering::Relaxed);
        if let Err(error) = process(tagged) {
            backlog.fail(error);
            break;
        }
    }
}

fn reap_finished(handles: &mut Vec<ScopedJoinHandle<'_, ()>>, backlog: &Backlog) {
    let mut i = 0;
    while i < handles.len() {
        if handles[i].is_finished() {
            join_worker(handles.swap_remove(i), backlog);
        } else {
            i += 1;
        }
    }
}

fn join_worker(handle: ScopedJoinHandle<'_, ()>, backlog: &Backlog) {
    if let Err(panic_info) = handle.join() {
        backlog.fail(TweetstatError::WorkerPanic(extract_panic_message(&*panic_info)));
    }
}

fn extract_panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
