//! Batch round-trip harness.
//!
//! Writes a corpus through the columnar writer one bounded row batch at a time,
//! then reads the artifact back batch by batch. The batch buffer is allocated once
//! and reset after every flush.

use crate::corpus::InputCorpus;
use crate::error::{Result, VerifyError};
use crate::scenario::TestCase;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use strata_core::{CompressionType, RowBatch, Schema, StrataConfig};
use strata_storage::{FileReader, FileWriter, ReaderOptions, WriterOptions};
use tracing::{debug, warn};

/// Column name used for the single field of every scenario schema
pub const VALUE_COLUMN: &str = "value";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HarnessState {
    Open,
    Accumulating,
    Flushing,
    Closed,
}

impl fmt::Display for HarnessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HarnessState::Open => "open",
            HarnessState::Accumulating => "accumulating",
            HarnessState::Flushing => "flushing",
            HarnessState::Closed => "closed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HarnessOptions {
    /// Rows per batch on both the write and read path
    pub capacity: usize,
    pub compression: CompressionType,
    /// Rows per stored block
    pub block_rows: usize,
    pub work_dir: PathBuf,
    pub artifact_prefix: String,
    pub extension: String,
}

impl HarnessOptions {
    pub fn from_config(config: &StrataConfig) -> Self {
        Self {
            capacity: config.batch.capacity,
            compression: config.storage.compression,
            block_rows: config.storage.block_rows,
            work_dir: config.storage.work_dir.clone(),
            artifact_prefix: config.storage.artifact_prefix.clone(),
            extension: config.storage.extension.clone(),
        }
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn compression(mut self, compression: CompressionType) -> Self {
        self.compression = compression;
        self
    }

    pub fn block_rows(mut self, block_rows: usize) -> Self {
        self.block_rows = block_rows;
        self
    }

    pub fn work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = work_dir.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(VerifyError::Config("batch capacity must be greater than 0".to_string()));
        }
        if self.block_rows == 0 {
            return Err(VerifyError::Config("block_rows must be greater than 0".to_string()));
        }
        Ok(())
    }

    /// Artifact location for `case`
    pub fn artifact_path(&self, case: &TestCase) -> PathBuf {
        self.work_dir
            .join(format!("{}.{}.{}", self.artifact_prefix, case.name(), self.extension))
    }
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self::from_config(&StrataConfig::default())
    }
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Scenario artifact file, deleted on creation and again on drop
#[derive(Debug)]
pub struct ScenarioArtifact {
    path: PathBuf,
}

impl ScenarioArtifact {
    pub fn prepare(options: &HarnessOptions, case: &TestCase) -> Result<Self> {
        fs::create_dir_all(&options.work_dir)?;
        let path = options.artifact_path(case);
        remove_if_exists(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScenarioArtifact {
    fn drop(&mut self) {
        if let Err(e) = remove_if_exists(&self.path) {
            warn!("Failed to remove artifact {}: {}", self.path.display(), e);
        }
    }
}

/// Values read back plus batch statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundTrip {
    pub rows: Vec<Option<String>>,
    /// Batches handed to the writer
    pub flushes: usize,
    /// Non-empty batches returned by the reader
    pub batches_read: usize,
}

pub struct BatchRoundTripHarness<'a> {
    case: &'a TestCase,
    options: &'a HarnessOptions,
    state: HarnessState,
}

impl<'a> BatchRoundTripHarness<'a> {
    pub fn new(case: &'a TestCase, options: &'a HarnessOptions) -> Self {
        Self {
            case,
            options,
            state: HarnessState::Open,
        }
    }

    pub fn state(&self) -> HarnessState {
        self.state
    }

    fn transition(&mut self, next: HarnessState) {
        debug!(scenario = %self.case.name(), from = %self.state, to = %next, "harness transition");
        self.state = next;
    }

    /// Write `corpus` to a fresh artifact, read it back and remove the artifact
    pub fn run(&mut self, corpus: &InputCorpus) -> Result<RoundTrip> {
        self.options.validate()?;
        let artifact = ScenarioArtifact::prepare(self.options, self.case)?;
        let flushes = self.write(artifact.path(), corpus)?;
        let (rows, batches_read) = self.read(artifact.path())?;
        Ok(RoundTrip {
            rows,
            flushes,
            batches_read,
        })
    }

    /// Write pass. Returns the number of batches flushed.
    pub fn write(&mut self, path: &Path, corpus: &InputCorpus) -> Result<usize> {
        self.transition(HarnessState::Open);
        let schema = Schema::single(VALUE_COLUMN, self.case.data_type()?);
        let writer_options = WriterOptions::new(schema.clone())
            .compression(self.options.compression)
            .block_rows(self.options.block_rows);
        let mut writer = FileWriter::create(path, writer_options)?;
        let mut batch = schema.create_row_batch(self.options.capacity);
        self.transition(HarnessState::Accumulating);

        let mut flushes = 0;
        for value in corpus.iter() {
            if batch.is_full() {
                self.flush(&mut writer, &mut batch)?;
                flushes += 1;
            }
            let row = batch.size;
            batch.column_mut(0)?.set_optional(row, value.map(str::as_bytes))?;
            batch.size += 1;
        }
        if !batch.is_empty() {
            self.flush(&mut writer, &mut batch)?;
            flushes += 1;
        }

        let footer = writer.close()?;
        debug!(
            scenario = %self.case.name(),
            rows = footer.row_count,
            blocks = footer.blocks.len(),
            flushes,
            "writer closed"
        );
        self.transition(HarnessState::Closed);
        Ok(flushes)
    }

    fn flush(&mut self, writer: &mut FileWriter, batch: &mut RowBatch) -> Result<()> {
        self.transition(HarnessState::Flushing);
        writer.append_batch(batch)?;
        batch.reset();
        self.transition(HarnessState::Accumulating);
        Ok(())
    }

    /// Read pass with the case's trim policy. Returns rows and batch count.
    pub fn read(&self, path: &Path) -> Result<(Vec<Option<String>>, usize)> {
        let mut reader = FileReader::open(path, ReaderOptions::default().rtrim_char(self.case.trim))?;
        let mut batch = reader.schema().create_row_batch(self.options.capacity);
        let mut rows = Vec::with_capacity(reader.row_count());
        let mut batches = 0;

        while reader.next_batch(&mut batch)? {
            let column = batch.column(0)?;
            for row in 0..batch.size {
                rows.push(column.read_as_text(row)?);
            }
            batches += 1;
        }
        reader.close()?;

        debug!(scenario = %self.case.name(), rows = rows.len(), batches, "reader closed");
        Ok((rows, batches))
    }
}
