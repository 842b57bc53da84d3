//! Block codecs. Every block is compressed on its own so the reader can
//! decode any block without touching its neighbours.

use strata_core::{Error, Result, types::CompressionType};

/// Upper bound on a single decompressed block
pub const MAX_DECOMPRESSED_SIZE: usize = 100 * 1024 * 1024;

const ZSTD_LEVEL: i32 = 3;
const LZ4_ACCELERATION: i32 = 4;

pub trait Compressor: Send + Sync {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>>;
    fn compression_type(&self) -> CompressionType;
}

pub trait Decompressor: Send + Sync {
    /// `expected_len` is the uncompressed size recorded in the block metadata
    fn decompress(&self, data: &[u8], expected_len: usize) -> Result<Vec<u8>>;
}

/// Single codec for every `CompressionType`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockCodec {
    kind: CompressionType,
}

impl BlockCodec {
    pub fn new(kind: CompressionType) -> Self {
        Self { kind }
    }

    fn encode_failed(&self, reason: impl std::fmt::Display) -> Error {
        Error::Serialization(format!("{} block encode failed: {}", self.kind, reason))
    }

    fn decode_failed(&self, reason: impl std::fmt::Display) -> Error {
        Error::Deserialization(format!("{} block decode failed: {}", self.kind, reason))
    }

    fn within_limit(&self, len: usize) -> Result<()> {
        if len > MAX_DECOMPRESSED_SIZE {
            return Err(self.decode_failed(format_args!(
                "{} bytes exceeds the {} byte block limit",
                len, MAX_DECOMPRESSED_SIZE
            )));
        }
        Ok(())
    }
}

impl Compressor for BlockCodec {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        match self.kind {
            CompressionType::None => Ok(data.to_vec()),
            CompressionType::LZ4 => {
                let mode = lz4::block::CompressionMode::FAST(LZ4_ACCELERATION);
                // length-prefixed, so decoding needs no size hint
                lz4::block::compress(data, Some(mode), true).map_err(|e| self.encode_failed(e))
            }
            CompressionType::Zstd => zstd::encode_all(data, ZSTD_LEVEL).map_err(|e| self.encode_failed(e)),
            CompressionType::Snappy => snap::raw::Encoder::new()
                .compress_vec(data)
                .map_err(|e| self.encode_failed(e)),
        }
    }

    fn compression_type(&self) -> CompressionType {
        self.kind
    }
}

impl Decompressor for BlockCodec {
    fn decompress(&self, data: &[u8], expected_len: usize) -> Result<Vec<u8>> {
        self.within_limit(expected_len)?;
        let out = match self.kind {
            CompressionType::None => data.to_vec(),
            CompressionType::LZ4 => lz4::block::decompress(data, None).map_err(|e| self.decode_failed(e))?,
            CompressionType::Zstd => zstd::decode_all(data).map_err(|e| self.decode_failed(e))?,
            CompressionType::Snappy => snap::raw::Decoder::new()
                .decompress_vec(data)
                .map_err(|e| self.decode_failed(e))?,
        };
        self.within_limit(out.len())?;
        Ok(out)
    }
}

pub fn create_compressor(compression_type: CompressionType) -> Box<dyn Compressor> {
    Box::new(BlockCodec::new(compression_type))
}

pub fn create_decompressor(compression_type: CompressionType) -> Box<dyn Decompressor> {
    Box::new(BlockCodec::new(compression_type))
}
