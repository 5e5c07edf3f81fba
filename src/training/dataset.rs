//! Append-only JSON Lines storage for training events

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::TrainingEvent;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize training event: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("malformed event on line {line}: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Writes one event per line, never truncating an existing file
#[derive(Debug)]
pub struct DatasetWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    written: usize,
}

impl DatasetWriter {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        tracing::debug!("Opened dataset {}", path.display());

        Ok(Self {
            path,
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Events appended through this writer
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn append(&mut self, event: &TrainingEvent) -> Result<(), DatasetError> {
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    pub fn append_all<'a, I>(&mut self, events: I) -> Result<(), DatasetError>
    where
        I: IntoIterator<Item = &'a TrainingEvent>,
    {
        for event in events {
            self.append(event)?;
        }
        Ok(())
    }

    /// Flush buffered lines and return how many were written
    pub fn finish(mut self) -> Result<usize, DatasetError> {
        self.writer.flush()?;
        self.writer.get_ref().sync_all()?;
        Ok(self.written)
    }
}

/// Read every event back, skipping blank lines
pub fn read_events(path: impl AsRef<Path>) -> Result<Vec<TrainingEvent>, DatasetError> {
    let reader = BufReader::new(File::open(path)?);
    let mut events = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event = serde_json::from_str(&line).map_err(|source| DatasetError::Malformed {
            line: index + 1,
            source,
        })?;
        events.push(event);
    }

    Ok(events)
}
