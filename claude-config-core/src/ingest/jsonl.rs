//! Lazy JSONL record reader
//!
//! Yields one `serde_json::Value` per well-formed line. Blank lines, lines
//! that fail to decode as UTF-8 and lines that are not valid JSON are skipped
//! one at a time; the rest of the file is still read.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

/// Iterator over the records of a newline-delimited JSON file.
pub struct JsonlRecords<R = BufReader<File>> {
    lines: Lines<R>,
    path: PathBuf,
    line_number: usize,
    skipped: usize,
}

impl JsonlRecords {
    /// Open `path` for reading. Fails only if the file cannot be opened.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to open {}: {}", path.display(), e),
            ))
        })?;
        Ok(Self::from_reader(BufReader::new(file), path))
    }
}

impl<R: BufRead> JsonlRecords<R> {
    /// Read records from any buffered reader; `path` is used for log messages only.
    pub fn from_reader(reader: R, path: &Path) -> Self {
        Self {
            lines: reader.lines(),
            path: path.to_path_buf(),
            line_number: 0,
            skipped: 0,
        }
    }

    /// Number of non-blank lines skipped so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<R: BufRead> Iterator for JsonlRecords<R> {
    type Item = serde_json::Value;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            self.line_number += 1;

            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    self.skipped += 1;
                    tracing::debug!(
                        path = %self.path.display(),
                        line = self.line_number,
                        error = %e,
                        "Skipping unreadable line"
                    );
                    continue;
                }
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match serde_json::from_str(trimmed) {
                Ok(value) => return Some(value),
                Err(e) => {
                    self.skipped += 1;
                    tracing::debug!(
                        path = %self.path.display(),
                        line = self.line_number,
                        error = %e,
                        "Skipping malformed JSON line"
                    );
                }
            }
        }
    }
}
