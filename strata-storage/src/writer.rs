use strata_core::{Error, Result, RowBatch, schema::{DataType, Schema}, types::CompressionType};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::block::{Block, BlockMetadata};
use crate::columnar_format::StringValues;
use crate::utf8;

/// Leading and trailing file marker
pub const MAGIC: &[u8; 5] = b"STRA1";

/// Everything the reader needs to locate blocks, written at the end of the file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileFooter {
    pub schema: Schema,
    pub blocks: Vec<BlockMetadata>,
    pub row_count: usize,
}

#[derive(Debug, Clone)]
pub struct WriterOptions {
    pub schema: Schema,
    pub compression: CompressionType,
    /// Rows buffered per column before a block is emitted
    pub block_rows: usize,
}

impl WriterOptions {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            compression: CompressionType::None,
            block_rows: 10_000,
        }
    }

    pub fn compression(mut self, compression: CompressionType) -> Self {
        self.compression = compression;
        self
    }

    pub fn block_rows(mut self, block_rows: usize) -> Self {
        self.block_rows = block_rows.max(1);
        self
    }
}

/// Truncate one raw value to the declared length of `data_type`.
///
/// CHAR values are stored unpadded; the reader applies the pad, so spaces that
/// belong to the value are never confused with padding.
pub fn enforce_length<'a>(data_type: &DataType, bytes: &'a [u8]) -> &'a [u8] {
    match data_type.max_length() {
        Some(n) => utf8::truncate_to_codepoints(bytes, n as usize),
        None => bytes,
    }
}

/// Columnar file writer. Rows arrive in batches and are persisted in blocks;
/// the file is only readable after [`FileWriter::close`].
pub struct FileWriter {
    path: PathBuf,
    file: BufWriter<File>,
    options: WriterOptions,
    pending: Vec<StringValues>,
    pending_rows: usize,
    blocks: Vec<BlockMetadata>,
    offset: u64,
    rows_written: usize,
}

impl FileWriter {
    pub fn create(path: impl AsRef<Path>, options: WriterOptions) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = BufWriter::new(File::create(&path)?);
        file.write_all(MAGIC)?;

        debug!(path = %path.display(), schema = %options.schema, "Created writer");

        Ok(Self {
            path,
            file,
            pending: vec![Vec::new(); options.schema.len()],
            pending_rows: 0,
            blocks: Vec::new(),
            offset: MAGIC.len() as u64,
            rows_written: 0,
            options,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn schema(&self) -> &Schema {
        &self.options.schema
    }

    /// Rows accepted so far, including rows not yet written to a block
    pub fn row_count(&self) -> usize {
        self.rows_written + self.pending_rows
    }

    /// Append the first `batch.size` rows of `batch`
    pub fn append_batch(&mut self, batch: &RowBatch) -> Result<()> {
        if batch.columns.len() != self.options.schema.len() {
            return Err(Error::SchemaMismatch(format!(
                "batch has {} columns, schema {} has {}",
                batch.columns.len(),
                self.options.schema,
                self.options.schema.len()
            )));
        }
        if batch.size > batch.capacity() {
            return Err(Error::BatchFull {
                row: batch.size,
                capacity: batch.capacity(),
            });
        }

        // A rejected batch must leave no rows behind
        let columns = batch.columns.iter().zip(&self.options.schema.fields);
        for (column, field) in columns.filter(|(_, field)| !field.nullable) {
            if let Some(row) = (0..batch.size).find(|&row| column.value(row).is_none()) {
                return Err(Error::SchemaMismatch(format!(
                    "null in non-nullable column '{}' at row {}",
                    field.name, row
                )));
            }
        }

        for row in 0..batch.size {
            let columns = batch.columns.iter().zip(&self.options.schema.fields);
            for (column_id, (column, field)) in columns.enumerate() {
                let value = column
                    .value(row)
                    .map(|bytes| enforce_length(&field.data_type, bytes).to_vec());
                self.pending[column_id].push(value);
            }
            self.pending_rows += 1;

            if self.pending_rows >= self.options.block_rows {
                self.flush_block()?;
            }
        }

        debug!(rows = batch.size, total = self.row_count(), "Appended batch");
        Ok(())
    }

    fn flush_block(&mut self) -> Result<()> {
        if self.pending_rows == 0 {
            return Ok(());
        }

        for (column_id, values) in self.pending.iter_mut().enumerate() {
            let block = Block::encode(column_id as u32, values, self.options.compression)?;
            self.file.write_all(&block.data)?;

            let metadata = BlockMetadata {
                block_id: self.blocks.len() as u64,
                column_id: column_id as u32,
                row_start: self.rows_written,
                row_count: block.row_count,
                offset: self.offset,
                compression: block.compression,
                uncompressed_size: block.uncompressed_size,
                compressed_size: block.compressed_size(),
                null_count: block.null_count,
            };
            debug!(
                block_id = metadata.block_id,
                column_id,
                rows = metadata.row_count,
                bytes = metadata.compressed_size,
                "Wrote block"
            );

            self.offset += metadata.compressed_size as u64;
            self.blocks.push(metadata);
            values.clear();
        }

        self.rows_written += self.pending_rows;
        self.pending_rows = 0;
        Ok(())
    }

    /// Flush buffered rows and write the footer. Consumes the writer.
    pub fn close(mut self) -> Result<FileFooter> {
        self.flush_block()?;

        let footer = FileFooter {
            schema: self.options.schema.clone(),
            blocks: std::mem::take(&mut self.blocks),
            row_count: self.rows_written,
        };
        let footer_bytes = bincode::serialize(&footer)
            .map_err(|e| Error::Serialization(format!("Failed to serialize footer: {}", e)))?;

        self.file.write_all(&footer_bytes)?;
        self.file.write_all(&(footer_bytes.len() as u64).to_le_bytes())?;
        self.file.write_all(MAGIC)?;
        self.file.flush()?;
        self.file.get_ref().sync_all()?;

        debug!(
            path = %self.path.display(),
            rows = footer.row_count,
            blocks = footer.blocks.len(),
            "Closed writer"
        );
        Ok(footer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::{FileReader, ReaderOptions};
    use strata_core::schema::Field;

    fn batch_of(values: &[Option<&str>]) -> RowBatch {
        let mut batch = RowBatch::new(1, values.len().max(1));
        for value in values {
            let row = batch.size;
            batch.columns[0].set_optional(row, value.map(str::as_bytes)).unwrap();
            batch.size += 1;
        }
        batch
    }

    #[test]
    fn test_enforce_length() {
        assert_eq!(enforce_length(&DataType::Varchar(2), "🌻🐝🍯".as_bytes()), "🌻🐝".as_bytes());
        assert_eq!(enforce_length(&DataType::Char(3), "αβ".as_bytes()), "αβ".as_bytes());
        assert_eq!(enforce_length(&DataType::Char(3), "αβγδ".as_bytes()), "αβγ".as_bytes());
        assert_eq!(enforce_length(&DataType::Char(3), "ab cd".as_bytes()), "ab ".as_bytes());
        assert_eq!(enforce_length(&DataType::String, "αβγδ".as_bytes()), "αβγδ".as_bytes());
    }

    #[test]
    fn test_write_emits_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let schema = Schema::single("value", DataType::Varchar(3));
        let mut writer = FileWriter::create(
            dir.path().join("blocks.strata"),
            WriterOptions::new(schema).block_rows(2),
        )
        .unwrap();

        writer.append_batch(&batch_of(&[Some("a"), Some("b"), Some("c")])).unwrap();
        assert_eq!(writer.row_count(), 3);
        let footer = writer.close().unwrap();

        assert_eq!(footer.row_count, 3);
        assert_eq!(footer.blocks.len(), 2);
        assert_eq!(footer.blocks[1].row_start, 2);
        assert_eq!(footer.blocks[1].offset, footer.blocks[0].offset + footer.blocks[0].compressed_size as u64);
    }

    #[test]
    fn test_column_count_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = FileWriter::create(
            dir.path().join("mismatch.strata"),
            WriterOptions::new(Schema::single("value", DataType::Char(1))),
        )
        .unwrap();
        let batch = RowBatch::new(2, 1);
        assert!(matches!(writer.append_batch(&batch), Err(Error::SchemaMismatch(_))));
    }

    #[test]
    fn test_non_nullable_rejects_null() {
        let dir = tempfile::tempdir().unwrap();
        let mut field = Field::new("value", DataType::Char(2));
        field.nullable = false;
        let mut writer = FileWriter::create(
            dir.path().join("nulls.strata"),
            WriterOptions::new(Schema::new(vec![field])),
        )
        .unwrap();
        assert!(writer.append_batch(&batch_of(&[None])).is_err());
    }

    #[test]
    fn test_rejected_batch_leaves_no_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rejected.strata");
        let mut required = Field::new("b", DataType::Varchar(5));
        required.nullable = false;
        let schema = Schema::new(vec![Field::new("a", DataType::Varchar(5)), required]);
        let mut writer = FileWriter::create(&path, WriterOptions::new(schema.clone())).unwrap();

        let mut stale = schema.create_row_batch(1);
        stale.columns[0].set_value(0, b"stale").unwrap();
        stale.columns[1].set_null(0).unwrap();
        stale.size = 1;
        assert!(matches!(writer.append_batch(&stale), Err(Error::SchemaMismatch(_))));
        assert_eq!(writer.row_count(), 0);

        let mut good = schema.create_row_batch(1);
        good.columns[0].set_value(0, b"good").unwrap();
        good.columns[1].set_value(0, b"x").unwrap();
        good.size = 1;
        writer.append_batch(&good).unwrap();
        writer.close().unwrap();

        let mut reader = FileReader::open(&path, ReaderOptions::default()).unwrap();
        let mut batch = reader.schema().create_row_batch(4);
        assert!(reader.next_batch(&mut batch).unwrap());
        assert_eq!(batch.size, 1);
        assert_eq!(batch.columns[0].read_as_text(0).unwrap(), Some("good".to_string()));
        assert_eq!(batch.columns[1].read_as_text(0).unwrap(), Some("x".to_string()));
        assert!(!reader.next_batch(&mut batch).unwrap());
    }

    #[test]
    fn test_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("file.strata");
        let writer = FileWriter::create(&path, WriterOptions::new(Schema::single("v", DataType::String))).unwrap();
        writer.close().unwrap();
        assert!(path.exists());
    }
}
