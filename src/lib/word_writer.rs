//! Per-group word files and their concatenation into one word list.
//!
//! Each non-empty [`WordGroup`] is written to `<prefix><index>.txt`, with the
//! index zero-padded to the width of the largest possible index so that file
//! names sort in discriminator order. Each line is the token left-aligned in a
//! fixed-width column followed by its count:
//!
//! ```text
//! and      2
//! ant      1
//! ```
//!
//! [`merge_group_files`] concatenates the group files in order and removes
//! them afterwards.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::debug;
use rayon::prelude::*;

use crate::errors::{Result, TweetstatError};
use crate::logging::format_duration;
use crate::word_tally::WordGroup;

/// Extension shared by every group file.
pub const GROUP_FILE_EXTENSION: &str = ".txt";

const WRITE_BUFFER_SIZE: usize = 256 * 1024;

/// Names group files for one output directory.
#[derive(Debug, Clone)]
pub struct GroupFileLayout {
    dir: PathBuf,
    prefix: String,
    index_width: usize,
}

impl GroupFileLayout {
    /// Creates a layout whose indices are padded to the width of `largest_index`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>, largest_index: usize) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            index_width: largest_index.to_string().len(),
        }
    }

    /// File name for group `index`.
    ///
    /// # Example
    /// ```
    /// use tweetstat_lib::word_writer::GroupFileLayout;
    ///
    /// let layout = GroupFileLayout::new("/out", "words_", 93);
    /// assert_eq!(layout.file_name(7), "words_07.txt");
    /// ```
    #[must_use]
    pub fn file_name(&self, index: usize) -> String {
        format!("{}{index:0width$}{GROUP_FILE_EXTENSION}", self.prefix, width = self.index_width)
    }

    /// Full path for group `index`.
    #[must_use]
    pub fn path(&self, index: usize) -> PathBuf {
        self.dir.join(self.file_name(index))
    }
}

/// Writes sorted `(token, count)` lines to `writer`, padding tokens to `pad_width`.
///
/// Tokens longer than `pad_width` are written whole.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn write_words<W: Write>(
    writer: &mut W,
    words: &[(String, u64)],
    pad_width: usize,
) -> io::Result<()> {
    for (token, count) in words {
        writeln!(writer, "{token:<pad_width$}{count}")?;
    }
    Ok(())
}

fn write_group(path: &Path, group: WordGroup, pad_width: usize) -> Result<()> {
    let start = Instant::now();
    let discriminator = char::from_u32(group.discriminator).unwrap_or(char::REPLACEMENT_CHARACTER);
    let words = group.into_sorted();

    let file = File::create(path).map_err(|e| TweetstatError::io(path, e))?;
    let mut writer = BufWriter::with_capacity(WRITE_BUFFER_SIZE, file);
    write_words(&mut writer, &words, pad_width)
        .and_then(|()| writer.flush())
        .map_err(|e| TweetstatError::io(path, e))?;

    debug!(
        "'{discriminator}' words written to {} in {} ({} distinct)",
        path.display(),
        format_duration(start.elapsed()),
        words.len()
    );
    Ok(())
}

/// Sorts and writes every group to its own file, in parallel.
///
/// Returns the paths written, in ascending discriminator order.
///
/// # Errors
///
/// Returns [`TweetstatError::Io`] for the first file that cannot be written.
pub fn write_group_files(
    layout: &GroupFileLayout,
    groups: Vec<WordGroup>,
    pad_width: usize,
) -> Result<Vec<PathBuf>> {
    groups
        .into_par_iter()
        .map(|group| {
            let path = layout.path(group.index);
            write_group(&path, group, pad_width).map(|()| path)
        })
        .collect()
}

/// Lists the group files in `dir` for `prefix`, sorted by file name.
///
/// A group file is named `<prefix><digits>.txt`.
///
/// # Errors
///
/// Returns [`TweetstatError::Io`] if the directory cannot be read.
pub fn find_group_files(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| TweetstatError::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| TweetstatError::io(dir, e))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        let is_group = name
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_suffix(GROUP_FILE_EXTENSION))
            .is_some_and(|index| !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()));
        if is_group && entry.path().is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Concatenates `files` in the given order into `output`, returning the
/// number of bytes written.
///
/// The inputs are removed after the output has been flushed unless
/// `keep_inputs` is set.
///
/// # Errors
///
/// Returns [`TweetstatError::Io`] naming whichever file failed.
pub fn merge_group_files(files: &[PathBuf], output: &Path, keep_inputs: bool) -> Result<u64> {
    let out = File::create(output).map_err(|e| TweetstatError::io(output, e))?;
    let mut writer = BufWriter::with_capacity(WRITE_BUFFER_SIZE, out);
    let mut bytes = 0u64;

    for file in files {
        let mut reader = File::open(file).map_err(|e| TweetstatError::io(file, e))?;
        bytes += io::copy(&mut reader, &mut writer).map_err(|e| TweetstatError::io(file, e))?;
    }
    writer.flush().map_err(|e| TweetstatError::io(output, e))?;

    if !keep_inputs {
        for file in files {
            fs::remove_file(file).map_err(|e| TweetstatError::io(file, e))?;
        }
    }
    Ok(bytes)
}
