use strata_core::{Error, Result, types::CompressionType};
use serde::{Deserialize, Serialize};
use bytes::Bytes;

use crate::columnar_format::{StringBlockCodec, StringValues};
use crate::compression::{create_compressor, create_decompressor};

/// One column's rows for a block, encoded and compressed.
// Not serializable: only BlockMetadata goes into the footer
#[derive(Debug, Clone)]
pub struct Block {
    pub column_id: u32,
    pub data: Bytes,
    pub row_count: usize,
    pub null_count: usize,
    pub compression: CompressionType,
    pub uncompressed_size: usize,
}

impl Block {
    pub fn encode(column_id: u32, values: &StringValues, compression: CompressionType) -> Result<Self> {
        let encoded = StringBlockCodec::encode(values)?;
        let compressor = create_compressor(compression);
        let compressed = compressor.compress(&encoded)?;
        Ok(Self {
            column_id,
            data: Bytes::from(compressed),
            row_count: values.len(),
            null_count: values.iter().filter(|v| v.is_none()).count(),
            compression: compressor.compression_type(),
            uncompressed_size: encoded.len(),
        })
    }

    pub fn decode(&self) -> Result<StringValues> {
        let decompressed = create_decompressor(self.compression)
            .decompress(&self.data, self.uncompressed_size)?;
        if decompressed.len() != self.uncompressed_size {
            return Err(Error::Deserialization(format!(
                "Block size mismatch: expected {} bytes, got {}",
                self.uncompressed_size,
                decompressed.len()
            )));
        }
        StringBlockCodec::decode(&decompressed, self.row_count)
    }

    pub fn compressed_size(&self) -> usize {
        self.data.len()
    }
}

/// Location and shape of a block inside a file, stored in the footer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockMetadata {
    pub block_id: u64,
    pub column_id: u32,
    pub row_start: usize,
    pub row_count: usize,
    pub offset: u64,
    pub compression: CompressionType,
    pub uncompressed_size: usize,
    pub compressed_size: usize,
    pub null_count: usize,
}

impl BlockMetadata {
    pub fn row_end(&self) -> usize {
        self.row_start + self.row_count
    }

    pub fn contains_row(&self, row: usize) -> bool {
        row >= self.row_start && row < self.row_end()
    }
}
