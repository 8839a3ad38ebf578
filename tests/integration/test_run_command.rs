//! Integration tests for the `run` command.

use std::fs;
use std::process::Command;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tempfile::TempDir;

use crate::helpers::{
    assert_word_file, naive_medians, random_records, read_medians, tweetstat_bin, word_counts,
    write_lines,
};

fn run_binary(args: &[&str]) -> std::process::Output {
    Command::new(tweetstat_bin()).args(args).output().expect("Failed to run tweetstat")
}

#[test]
fn test_run_basic() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("tweets.txt");
    let out = temp_dir.path().join("out");
    let lines: Vec<String> =
        ["is #bigdata finally the answer to end poverty? @lavanyarathnam http://ow.ly/o8gt3 #analytics",
         "interview: xia wang, astrazeneca on #bigdata and the promise of effective healthcare #kdn http://ow.ly/ot2uj",
         "big data is not just for big business. on how #bigdata is being deployed for small businesses: http://bddy.me/1bzukb3  @cxotodayalerts #smb"]
            .iter()
            .map(ToString::to_string)
            .collect();
    write_lines(&input, &lines);

    let output = run_binary(&[
        "run",
        "-i",
        input.to_str().unwrap(),
        "-o",
        out.to_str().unwrap(),
        "--poll-interval-ms",
        "5",
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    assert_eq!(read_medians(&out.join("ft2.txt")), vec!["11.00", "12.50", "14.00"]);
    assert_word_file(&out.join("ft1.txt"), 140, &word_counts(&lines));
    let leftovers: Vec<_> = fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .filter(|name| name.starts_with("words_"))
        .collect();
    assert!(leftovers.is_empty(), "group files left behind: {leftovers:?}");
}

#[test]
fn test_run_random_input_matches_reference() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("tweets.txt");
    let out = temp_dir.path().join("out");
    let lines = random_records(&mut StdRng::seed_from_u64(7), 3_000, 25);
    write_lines(&input, &lines);

    let output = run_binary(&[
        "run",
        "-i",
        input.to_str().unwrap(),
        "-o",
        out.to_str().unwrap(),
        "--poll-interval-ms",
        "1",
        "--throughput-per-worker",
        "50",
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    assert_eq!(read_medians(&out.join("ft2.txt")), naive_medians(&lines));
    assert_word_file(&out.join("ft1.txt"), 140, &word_counts(&lines));
}

#[test]
fn test_run_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("tweets.txt");
    write_lines(&input, &random_records(&mut StdRng::seed_from_u64(11), 2_000, 20));

    let mut outputs = Vec::new();
    for name in ["first", "second"] {
        let out = temp_dir.path().join(name);
        let output = run_binary(&[
            "run",
            "-i",
            input.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
            "--poll-interval-ms",
            "1",
            "--throughput-per-worker",
            "10",
        ]);
        assert!(output.status.success());
        outputs.push((fs::read(out.join("ft2.txt")).unwrap(), fs::read(out.join("ft1.txt")).unwrap()));
    }
    assert_eq!(outputs[0], outputs[1]);
}

#[test]
fn test_run_without_merge_then_merge_command() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("tweets.txt");
    let out = temp_dir.path().join("out");
    let lines = vec!["apple ant".to_string(), "bee apple".to_string(), "#tag".to_string()];
    write_lines(&input, &lines);

    let output = run_binary(&[
        "run",
        "-i",
        input.to_str().unwrap(),
        "-o",
        out.to_str().unwrap(),
        "--merge-words",
        "false",
        "--words-file",
        "words.txt",
        "--max-record-length",
        "20",
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(!out.join("words.txt").exists());
    for name in ["words_02.txt", "words_64.txt", "words_65.txt"] {
        assert!(out.join(name).exists(), "missing {name}");
    }

    let output = run_binary(&["merge", "-d", out.to_str().unwrap(), "--words-file", "words.txt"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_word_file(&out.join("words.txt"), 20, &word_counts(&lines));
    assert!(!out.join("words_64.txt").exists());
}

#[test]
fn test_run_writes_metrics() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("tweets.txt");
    let out = temp_dir.path().join("out");
    let metrics = temp_dir.path().join("run.tsv");
    write_lines(&input, &["a b".to_string(), "c".to_string()]);

    let output = run_binary(&[
        "run",
        "-i",
        input.to_str().unwrap(),
        "-o",
        out.to_str().unwrap(),
        "--metrics",
        metrics.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    let text = fs::read_to_string(&metrics).unwrap();
    let mut rows = text.lines();
    let header: Vec<_> = rows.next().unwrap().split('\t').collect();
    let values: Vec<_> = rows.next().unwrap().split('\t').collect();
    let field = |name: &str| values[header.iter().position(|h| *h == name).unwrap()];
    assert_eq!(field("records"), "2");
    assert_eq!(field("total_tokens"), "3");
    assert_eq!(field("word_groups"), "3");
    assert_eq!(field("final_median"), "1.5");
}

#[test]
fn test_run_empty_input() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("empty.txt");
    let out = temp_dir.path().join("out");
    fs::write(&input, "").unwrap();

    let output = run_binary(&["run", "-i", input.to_str().unwrap(), "-o", out.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(fs::read_to_string(out.join("ft2.txt")).unwrap(), "");
    assert_eq!(fs::read_to_string(out.join("ft1.txt")).unwrap(), "");
}

#[test]
fn test_version_and_help() {
    let output = run_binary(&["--version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains(env!("CARGO_PKG_VERSION")));

    let output = run_binary(&["run", "--help"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("--throughput-per-worker"));
}
