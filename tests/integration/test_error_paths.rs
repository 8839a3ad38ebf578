//! Error path integration tests.
//!
//! Each failure must abort the run with a diagnostic naming the bad value,
//! both through the library and as a non-zero exit from the binary.

use std::fs;
use std::process::Command;

use rstest::rstest;
use tempfile::TempDir;
use tweetstat_lib::{MedianError, TweetstatError, run_pipeline};

use crate::helpers::{fast_config, tweetstat_bin, write_lines};

#[test]
fn test_feature_above_bound_halts_pipeline() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("tweets.txt");
    // Seven distinct words but a 10-character bound allows at most five
    write_lines(&input, &["a".to_string(), "a b c d e f g".to_string(), "b".to_string()]);

    let out = temp_dir.path().join("out");
    let mut config = fast_config(&input, &out);
    config.max_record_length = 10;
    let err = run_pipeline(&config).unwrap_err();
    assert!(
        matches!(
            err,
            TweetstatError::DomainBound(MedianError::DomainBoundViolation { value: 7, max: 5 })
        ),
        "{err:?}"
    );

    // Neither a truncated medians file nor any word group file is left behind
    assert!(!out.join("ft2.txt").exists());
    let leftovers: Vec<_> = fs::read_dir(&out).unwrap().map(|e| e.unwrap().file_name()).collect();
    assert!(leftovers.is_empty(), "{leftovers:?}");
}

#[test]
fn test_discriminator_out_of_range() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("tweets.txt");
    write_lines(&input, &["hello world".to_string(), "Ünïcode here".to_string()]);

    let err = run_pipeline(&fast_config(&input, &temp_dir.path().join("out"))).unwrap_err();
    match err {
        TweetstatError::DiscriminatorOutOfRange { token, value, min, max } => {
            assert_eq!(token, "Ünïcode");
            assert_eq!((value, min, max), (220, 33, 126));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_widened_discriminator_range_accepts_unicode() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("tweets.txt");
    write_lines(&input, &["Ünïcode here".to_string()]);

    let mut config = fast_config(&input, &temp_dir.path().join("out"));
    config.max_discriminator = 0x24F;
    let metrics = run_pipeline(&config).unwrap();
    assert_eq!(metrics.word_groups, 2);
}

#[test]
fn test_missing_input() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.txt");
    let err = run_pipeline(&fast_config(&missing, temp_dir.path())).unwrap_err();
    assert!(matches!(err, TweetstatError::InvalidFileFormat { .. }));
    assert!(err.to_string().contains("missing.txt"));
}

#[test]
fn test_output_dir_is_a_file() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("tweets.txt");
    write_lines(&input, &["x".to_string()]);
    let err = run_pipeline(&fast_config(&input, &input)).unwrap_err();
    assert!(err.to_string().contains("not a directory"));
}

#[rstest]
#[case(&["--min-discriminator", "100", "--max-discriminator", "50"], "max-discriminator")]
#[case(&["--throughput-per-worker", "0"], "throughput-per-worker")]
#[case(&["--poll-interval-ms", "0"], "poll-interval-ms")]
#[case(&["--max-record-length", "0"], "max-record-length")]
#[case(&["--max-record-length", "18446744073709551615"], "max-record-length")]
#[case(&["--medians-file", "a/b.txt"], "medians-file")]
fn test_binary_rejects_bad_parameters(#[case] extra: &[&str], #[case] parameter: &str) {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("tweets.txt");
    fs::write(&input, "a b\n").unwrap();
    let out = temp_dir.path().join("out");

    let output = Command::new(tweetstat_bin())
        .args(["run", "-i", input.to_str().unwrap(), "-o", out.to_str().unwrap()])
        .args(extra)
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(parameter), "stderr did not name {parameter}: {stderr}");
    assert!(!out.join("ft2.txt").exists());
}

#[test]
fn test_binary_fails_on_domain_bound() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("tweets.txt");
    fs::write(&input, "a b c d\n").unwrap();
    let out = temp_dir.path().join("out");

    let output = Command::new(tweetstat_bin())
        .args(["run", "-i", input.to_str().unwrap(), "-o", out.to_str().unwrap()])
        .args(["--max-record-length", "4"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Feature value 4"), "{stderr}");
    assert!(!out.join("ft2.txt").exists());
}
