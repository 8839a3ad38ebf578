//! Input files and reference results for integration tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rand::Rng;
use rand::rngs::StdRng;
use tweetstat_lib::PipelineConfig;
use tweetstat_lib::pool::PoolConfig;

/// Words starting with printable ASCII, including punctuation-led tokens.
const VOCABULARY: &[&str] = &[
    "the", "a", "cat", "dog", "sat", "on", "mat", "#rustlang", "@friend", "!!!", "42", "Zebra",
    "zebra", "quick", "brown", "fox", "jumps", "over", "lazy", "~tilde", "http://x.io", "I'm",
    "{json}", "[tag]", "and", "ant", "apple", "Apple", "b", "bb",
];

/// Writes `lines` to `path`, one per line.
pub fn write_lines(path: &Path, lines: &[String]) {
    let mut text = lines.join("\n");
    if !lines.is_empty() {
        text.push('\n');
    }
    fs::write(path, text).expect("Failed to write input file");
}

/// Generates `n` records of 0..=`max_words` words drawn from a small vocabulary,
/// with occasional repeated and doubled spaces.
pub fn random_records(rng: &mut StdRng, n: usize, max_words: usize) -> Vec<String> {
    (0..n)
        .map(|_| {
            let words = rng.random_range(0..=max_words);
            let mut line = String::new();
            for i in 0..words {
                if i > 0 {
                    line.push_str(if rng.random_range(0..10) == 0 { "  " } else { " " });
                }
                line.push_str(VOCABULARY[rng.random_range(0..VOCABULARY.len())]);
            }
            line
        })
        .collect()
}

/// Distinct whitespace-separated tokens in `line`.
pub fn feature(line: &str) -> u32 {
    line.split_whitespace().collect::<HashSet<_>>().len() as u32
}

/// Running medians computed by sorting the prefix at every step.
pub fn naive_medians(lines: &[String]) -> Vec<String> {
    let mut seen: Vec<u32> = Vec::with_capacity(lines.len());
    lines
        .iter()
        .map(|line| {
            seen.push(feature(line));
            let mut sorted = seen.clone();
            sorted.sort_unstable();
            let n = sorted.len();
            let median = if n % 2 == 1 {
                f64::from(sorted[n / 2])
            } else {
                f64::from(sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
            };
            format!("{median:.2}")
        })
        .collect()
}

/// Word counts across all lines, in byte order.
pub fn word_counts(lines: &[String]) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for token in lines.iter().flat_map(|l| l.split_whitespace()) {
        *counts.entry(token.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Default configuration with a short coordinator tick.
pub fn fast_config(input: &Path, output_dir: &Path) -> PipelineConfig {
    PipelineConfig {
        pool: PoolConfig { poll_interval: Duration::from_millis(2), ..PoolConfig::default() },
        ..PipelineConfig::new(input, output_dir)
    }
}

/// Path of the compiled binary.
pub fn tweetstat_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_tweetstat"))
}
