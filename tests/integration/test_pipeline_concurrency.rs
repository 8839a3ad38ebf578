//! Concurrency tests for the ingest pipeline.
//!
//! These run the library pipeline with aggressive pool settings and check that
//! the output matches a single-threaded reference, whatever order the workers
//! happened to finish in.

use std::thread;
use std::time::Duration;

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tempfile::TempDir;
use tweetstat_lib::pool::{PoolConfig, WorkerPool};
use tweetstat_lib::record::PositionedRecord;
use tweetstat_lib::sequence_store::SequenceStore;
use tweetstat_lib::source::Backlog;
use tweetstat_lib::{PipelineConfig, run_pipeline};

use crate::helpers::{
    assert_word_file, fast_config, naive_medians, random_records, read_medians, word_counts,
    write_lines,
};

#[test]
fn test_many_workers_preserve_order() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("tweets.txt");
    let out = temp_dir.path().join("out");
    let lines = random_records(&mut StdRng::seed_from_u64(42), 20_000, 30);
    write_lines(&input, &lines);

    let mut config = fast_config(&input, &out);
    config.pool.throughput_per_worker = 1;
    let metrics = run_pipeline(&config).unwrap();

    assert_eq!(metrics.records, 20_000);
    assert!(metrics.workers_spawned >= 1);
    assert_eq!(read_medians(&out.join("ft2.txt")), naive_medians(&lines));
    assert_word_file(&out.join("ft1.txt"), 140, &word_counts(&lines));
}

#[test]
fn test_single_worker_cap_matches_unbounded() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("tweets.txt");
    let lines = random_records(&mut StdRng::seed_from_u64(3), 5_000, 15);
    write_lines(&input, &lines);

    let single = temp_dir.path().join("single");
    let mut config = fast_config(&input, &single);
    config.pool.max_workers = Some(1);
    let metrics = run_pipeline(&config).unwrap();
    assert_eq!(metrics.peak_workers, 1);

    let many = temp_dir.path().join("many");
    let mut config = fast_config(&input, &many);
    config.pool.throughput_per_worker = 5;
    run_pipeline(&config).unwrap();

    for name in ["ft1.txt", "ft2.txt"] {
        assert_eq!(
            std::fs::read(single.join(name)).unwrap(),
            std::fs::read(many.join(name)).unwrap(),
            "{name} differs"
        );
    }
}

#[test]
fn test_store_filled_out_of_order_by_pool() {
    let backlog = Backlog::new();
    let store = SequenceStore::new();
    let n = 10_000u64;

    // Push in reverse so completion order is unrelated to position
    for position in (0..n).rev() {
        backlog.push(PositionedRecord::encode(position, &"w ".repeat((position % 9) as usize)));
    }
    backlog.mark_done();

    let config = PoolConfig {
        poll_interval: Duration::from_millis(1),
        throughput_per_worker: 100,
        max_workers: None,
    };
    let stats = WorkerPool::new(config)
        .run(&backlog, |tagged| {
            let record = PositionedRecord::decode(&tagged)?;
            store.insert(record.position, record.tokens().count() as u32);
            Ok(())
        })
        .unwrap();
    assert_eq!(stats.records_processed, n);

    for (position, feature) in store.into_replay(n).unwrap() {
        assert_eq!(u64::from(feature), position % 9);
    }
}

#[test]
fn test_pool_grows_under_backlog_pressure() {
    let backlog = Backlog::new();
    for position in 0..40_000 {
        backlog.push(PositionedRecord::encode(position, "x"));
    }
    backlog.mark_done();

    let config = PoolConfig {
        poll_interval: Duration::from_millis(1),
        throughput_per_worker: 1_000,
        max_workers: None,
    };
    let stats = WorkerPool::new(config)
        .run(&backlog, |_| {
            thread::sleep(Duration::from_micros(50));
            Ok(())
        })
        .unwrap();
    assert!(stats.peak_workers > 1, "pool never grew: {stats:?}");
    assert_eq!(stats.records_processed, 40_000);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_pipeline_matches_reference(seed in any::<u64>(), n in 0usize..400, throughput in 1u64..50) {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("tweets.txt");
        let out = temp_dir.path().join("out");
        let lines = random_records(&mut StdRng::seed_from_u64(seed), n, 12);
        write_lines(&input, &lines);

        let mut config: PipelineConfig = fast_config(&input, &out);
        config.pool.throughput_per_worker = throughput;
        let metrics = run_pipeline(&config).unwrap();

        prop_assert_eq!(metrics.records, n as u64);
        prop_assert_eq!(read_medians(&out.join("ft2.txt")), naive_medians(&lines));
    }
}
