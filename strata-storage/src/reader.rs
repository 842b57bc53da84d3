use strata_core::{Error, Result, RowBatch, schema::Schema};
use bytes::Bytes;
use std::borrow::Cow;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::block::{Block, BlockMetadata};
use crate::columnar_format::StringValues;
use crate::utf8;
use crate::writer::{FileFooter, MAGIC};

/// Footers beyond this size are treated as corruption
const MAX_FOOTER_SIZE: u64 = 64 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Return CHAR values without their fixed-length pad
    pub rtrim_char: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self { rtrim_char: true }
    }
}

impl ReaderOptions {
    pub fn rtrim_char(mut self, rtrim: bool) -> Self {
        self.rtrim_char = rtrim;
        self
    }
}

/// Decoded block currently being served for one column
struct LoadedBlock {
    row_start: usize,
    values: StringValues,
}

/// Sequential batch reader over a closed file
pub struct FileReader {
    path: PathBuf,
    file: File,
    options: ReaderOptions,
    schema: Schema,
    row_count: usize,
    /// Block metadata per column, in row order
    column_blocks: Vec<Vec<BlockMetadata>>,
    block_cursor: Vec<usize>,
    loaded: Vec<Option<LoadedBlock>>,
    next_row: usize,
}

impl FileReader {
    pub fn open(path: impl AsRef<Path>, options: ReaderOptions) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = File::open(&path)?;
        let file_len = file.metadata()?.len();
        let magic_len = MAGIC.len() as u64;
        let trailer_len = 8 + magic_len;

        if file_len < magic_len + trailer_len {
            return Err(Error::Deserialization(format!(
                "{} is too short ({} bytes) to be a strata file",
                path.display(),
                file_len
            )));
        }

        let mut head = [0u8; 5];
        file.read_exact(&mut head)?;
        if &head != MAGIC {
            return Err(Error::Deserialization(format!("{}: bad leading magic", path.display())));
        }

        let mut trailer = [0u8; 13];
        file.seek(SeekFrom::Start(file_len - trailer_len))?;
        file.read_exact(&mut trailer)?;
        if &trailer[8..] != MAGIC {
            return Err(Error::Deserialization(format!("{}: bad trailing magic", path.display())));
        }

        let mut len_bytes = [0u8; 8];
        len_bytes.copy_from_slice(&trailer[..8]);
        let footer_len = u64::from_le_bytes(len_bytes);
        let body_end = file_len - trailer_len;
        if footer_len > MAX_FOOTER_SIZE || footer_len > body_end - magic_len {
            return Err(Error::Deserialization(format!(
                "{}: footer length {} out of range",
                path.display(),
                footer_len
            )));
        }

        let footer_start = body_end - footer_len;
        let mut footer_bytes = vec![0u8; footer_len as usize];
        file.seek(SeekFrom::Start(footer_start))?;
        file.read_exact(&mut footer_bytes)?;
        let footer: FileFooter = bincode::deserialize(&footer_bytes)
            .map_err(|e| Error::Deserialization(format!("Failed to deserialize footer: {}", e)))?;

        let schema = footer.schema;
        let mut column_blocks = vec![Vec::new(); schema.len()];
        for block in footer.blocks {
            let row_end = block.row_start.checked_add(block.row_count);
            if row_end.map_or(true, |end| end > footer.row_count) {
                return Err(Error::Deserialization(format!(
                    "Block {} rows {}+{} exceed the file's {} rows",
                    block.block_id, block.row_start, block.row_count, footer.row_count
                )));
            }
            let end = block.offset.checked_add(block.compressed_size as u64);
            if block.offset < magic_len || end.map_or(true, |end| end > footer_start) {
                return Err(Error::Deserialization(format!(
                    "Block {} lies outside the data region",
                    block.block_id
                )));
            }
            let blocks = column_blocks.get_mut(block.column_id as usize).ok_or_else(|| {
                Error::Deserialization(format!("Block {} references unknown column {}", block.block_id, block.column_id))
            })?;
            blocks.push(block);
        }
        for blocks in &mut column_blocks {
            blocks.sort_by_key(|b| b.row_start);
        }

        debug!(path = %path.display(), %schema, rows = footer.row_count, "Opened reader");

        Ok(Self {
            path,
            file,
            options,
            row_count: footer.row_count,
            block_cursor: vec![0; schema.len()],
            loaded: (0..schema.len()).map(|_| None).collect(),
            column_blocks,
            schema,
            next_row: 0,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Make sure the loaded block for `column` covers `row`
    fn ensure_loaded(&mut self, column: usize, row: usize) -> Result<()> {
        if let Some(loaded) = &self.loaded[column] {
            if row >= loaded.row_start && row < loaded.row_start + loaded.values.len() {
                return Ok(());
            }
        }

        let blocks = &self.column_blocks[column];
        let mut cursor = self.block_cursor[column];
        while cursor < blocks.len() && blocks[cursor].row_end() <= row {
            cursor += 1;
        }
        let meta = blocks
            .get(cursor)
            .filter(|meta| meta.contains_row(row))
            .cloned()
            .ok_or_else(|| {
                Error::Deserialization(format!("No block holds row {} of column {}", row, column))
            })?;
        self.block_cursor[column] = cursor;

        let mut data = vec![0u8; meta.compressed_size];
        self.file.seek(SeekFrom::Start(meta.offset))?;
        self.file.read_exact(&mut data)?;

        let block = Block {
            column_id: meta.column_id,
            data: Bytes::from(data),
            row_count: meta.row_count,
            null_count: meta.null_count,
            compression: meta.compression,
            uncompressed_size: meta.uncompressed_size,
        };
        let values = block.decode()?;
        debug!(block_id = meta.block_id, column, rows = values.len(), "Loaded block");

        self.loaded[column] = Some(LoadedBlock {
            row_start: meta.row_start,
            values,
        });
        Ok(())
    }

    /// Refill `batch` with the next rows. Returns `false` once every row has been read.
    pub fn next_batch(&mut self, batch: &mut RowBatch) -> Result<bool> {
        batch.reset();

        if batch.columns.len() != self.schema.len() {
            return Err(Error::SchemaMismatch(format!(
                "batch has {} columns, schema {} has {}",
                batch.columns.len(),
                self.schema,
                self.schema.len()
            )));
        }
        if batch.capacity() == 0 {
            return Err(Error::Storage("cannot read into a zero-capacity batch".to_string()));
        }
        if self.next_row >= self.row_count {
            return Ok(false);
        }

        let rows = batch.capacity().min(self.row_count - self.next_row);
        for column in 0..self.schema.len() {
            let data_type = self.schema.fields[column].data_type;
            let pad_to = match data_type.max_length() {
                Some(n) if data_type.is_fixed_length() && !self.options.rtrim_char => Some(n as usize),
                _ => None,
            };

            for i in 0..rows {
                let row = self.next_row + i;
                self.ensure_loaded(column, row)?;

                let value = self.loaded[column]
                    .as_ref()
                    .and_then(|loaded| loaded.values[row - loaded.row_start].as_deref())
                    .map(|bytes| match pad_to {
                        Some(n) => Cow::Owned(utf8::pad_to_codepoints(bytes, n)),
                        None => Cow::Borrowed(bytes),
                    });
                batch.columns[column].set_optional(i, value.as_deref())?;
            }
        }

        batch.size = rows;
        self.next_row += rows;
        Ok(true)
    }

    pub fn close(self) -> Result<()> {
        debug!(path = %self.path.display(), rows_read = self.next_row, "Closed reader");
        Ok(())
    }
}
