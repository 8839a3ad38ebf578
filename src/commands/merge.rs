//! Concatenate word group files into the final word list.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;
use log::info;

use tweetstat_lib::logging::OperationTimer;
use tweetstat_lib::word_writer::{find_group_files, merge_group_files};

use crate::commands::command::Command;
use crate::commands::common::WordFileOptions;

/// Merge the word group files left in a directory by `run --merge-words false`.
#[derive(Debug, Parser)]
#[command(
    name = "merge",
    about = "\x1b[38;5;166m[UTILITIES]\x1b[0m      \x1b[36mConcatenate word group files into one word list\x1b[0m",
    long_about = r#"
Concatenate the word group files <temp-prefix><index>.txt found in a directory,
in file-name order, into <words-file> in the same directory. The group files
are deleted afterwards unless --keep-temp is given.

Example usage:
  tweetstat merge -d out
  tweetstat merge -d out --temp-prefix g_ --words-file words.txt --keep-temp
"#
)]
pub struct Merge {
    /// Directory holding the group files
    #[arg(short = 'd', long = "dir")]
    pub dir: PathBuf,

    /// Word file options
    #[command(flatten)]
    pub words: WordFileOptions,

    /// Keep the group files after merging
    #[arg(long = "keep-temp", default_value = "false")]
    pub keep_temp: bool,
}

impl Command for Merge {
    fn execute(&self) -> Result<()> {
        self.words.validate()?;
        if !self.dir.is_dir() {
            bail!("Directory does not exist: {}", self.dir.display());
        }

        let files = find_group_files(&self.dir, &self.words.temp_prefix)?;
        if files.is_empty() {
            bail!(
                "No group files matching '{}<index>.txt' in {}",
                self.words.temp_prefix,
                self.dir.display()
            );
        }

        let timer = OperationTimer::new("Merging word groups");
        let output = self.dir.join(&self.words.words_file);
        let bytes = merge_group_files(&files, &output, self.keep_temp)?;
        timer.log_completion(files.len() as u64);
        info!("Wrote {} bytes from {} group files to {}", bytes, files.len(), output.display());
        Ok(())
    }
}
