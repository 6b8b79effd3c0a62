//! Run-scoped scalar log sink
//!
//! [`ScalarWriter`] persists `(channel, step, value)` records for a single
//! training run. Records are buffered in memory and appended to disk —
//! a JSON-lines file plus a CSV mirror — only on [`ScalarWriter::flush`].
//! The training loop flushes once per epoch, so at most one epoch of
//! buffered records is lost if the process dies mid-epoch.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A single scalar data point in a named channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarRecord {
    /// Channel name, e.g. `"Loss/train"`.
    pub tag: String,
    /// Monotonic step index within the channel.
    pub step: u64,
    /// Recorded value.
    pub value: f64,
}

/// Append-only scalar time-series writer scoped to one run directory.
pub struct ScalarWriter {
    dir: PathBuf,
    jsonl: File,
    csv: csv::Writer<File>,
    buffer: Vec<ScalarRecord>,
}

impl ScalarWriter {
    /// Create a writer for the given run directory, creating the directory
    /// and its log files as needed.
    pub fn create(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)
            .map_err(|e| Error::io(format!("creating run directory {}", dir.display()), e))?;

        let jsonl_path = dir.join("scalars.jsonl");
        let jsonl = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&jsonl_path)
            .map_err(|e| Error::io(format!("opening {}", jsonl_path.display()), e))?;

        let csv_path = dir.join("scalars.csv");
        let csv_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&csv_path)
            .map_err(|e| Error::io(format!("opening {}", csv_path.display()), e))?;
        let csv = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(csv_file);

        Ok(Self {
            dir,
            jsonl,
            csv,
            buffer: Vec::new(),
        })
    }

    /// Buffer a scalar record. Nothing reaches disk until [`flush`].
    ///
    /// [`flush`]: ScalarWriter::flush
    pub fn add_scalar(&mut self, tag: &str, value: f64, step: u64) {
        self.buffer.push(ScalarRecord {
            tag: tag.to_string(),
            step,
            value,
        });
    }

    /// Append all buffered records to disk and sync the files.
    pub fn flush(&mut self) -> Result<()> {
        for record in &self.buffer {
            let line = serde_json::to_string(record)
                .map_err(|e| Error::serialization(format!("encoding scalar record: {e}")))?;
            writeln!(self.jsonl, "{line}")
                .map_err(|e| Error::io("appending scalar record", e))?;
            self.csv
                .serialize(record)
                .map_err(Error::Csv)?;
        }
        self.buffer.clear();

        self.jsonl
            .flush()
            .map_err(|e| Error::io("flushing scalar log", e))?;
        self.csv
            .flush()
            .map_err(|e| Error::io("flushing scalar CSV mirror", e))?;
        Ok(())
    }

    /// Number of records waiting for the next flush.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// The run directory this writer logs into.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Read all records back from a run directory's JSON-lines log.
pub fn read_scalars(dir: impl AsRef<Path>) -> Result<Vec<ScalarRecord>> {
    let path = dir.as_ref().join("scalars.jsonl");
    let contents = std::fs::read_to_string(&path)
        .map_err(|e| Error::io(format!("reading {}", path.display()), e))?;

    contents
        .lines()
        .map(|line| {
            serde_json::from_str(line)
                .map_err(|e| Error::serialization(format!("decoding scalar record: {e}")))
        })
        .collect()
}
