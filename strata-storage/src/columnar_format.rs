// Columnar layout for one block of string values:
// [null bitmap: ceil(n/8) bytes][offsets: (n+1) x u32 LE][concatenated bytes]

use strata_core::{Error, Result};
use bytes::{BufMut, Bytes, BytesMut};

/// Rows of a string column; `None` is a null
pub type StringValues = Vec<Option<Vec<u8>>>;

pub struct StringBlockCodec;

impl StringBlockCodec {
    /// Pack a validity bitmap, one bit per row, set for null rows
    pub fn write_null_bitmap(values: &StringValues) -> Bytes {
        let byte_count = values.len().div_ceil(8);
        let mut buffer = BytesMut::zeroed(byte_count);

        for (i, value) in values.iter().enumerate() {
            if value.is_none() {
                buffer[i / 8] |= 1 << (i % 8);
            }
        }

        buffer.freeze()
    }

    pub fn read_null_bitmap(bytes: &[u8], count: usize) -> Vec<bool> {
        (0..count)
            .map(|i| bytes.get(i / 8).is_some_and(|b| b & (1 << (i % 8)) != 0))
            .collect()
    }

    pub fn encode(values: &StringValues) -> Result<Bytes> {
        let total: usize = values.iter().flatten().map(|v| v.len()).sum();
        if total > u32::MAX as usize {
            return Err(Error::Storage(format!(
                "Block data of {} bytes exceeds u32 offsets",
                total
            )));
        }

        let bitmap = Self::write_null_bitmap(values);
        let mut buffer = BytesMut::with_capacity(bitmap.len() + 4 * (values.len() + 1) + total);
        buffer.put_slice(&bitmap);

        let mut offset = 0u32;
        buffer.put_u32_le(offset);
        for value in values {
            offset += value.as_ref().map_or(0, |v| v.len() as u32);
            buffer.put_u32_le(offset);
        }

        for value in values.iter().flatten() {
            buffer.put_slice(value);
        }

        Ok(buffer.freeze())
    }

    pub fn decode(bytes: &[u8], row_count: usize) -> Result<StringValues> {
        let bitmap_len = row_count.div_ceil(8);
        let offsets_len = row_count
            .checked_add(1)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| Error::Deserialization(format!("Row count {} overflows", row_count)))?;
        let header_len = bitmap_len + offsets_len;

        if bytes.len() < header_len {
            return Err(Error::Deserialization(format!(
                "Block of {} bytes is shorter than its {} byte header",
                bytes.len(),
                header_len
            )));
        }

        let nulls = Self::read_null_bitmap(&bytes[..bitmap_len], row_count);
        let offsets: Vec<usize> = bytes[bitmap_len..header_len]
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]) as usize)
            .collect();
        let data = &bytes[header_len..];

        let mut result = Vec::with_capacity(row_count);
        for (i, window) in offsets.windows(2).enumerate() {
            let (start, end) = (window[0], window[1]);
            if end < start {
                return Err(Error::Deserialization(format!(
                    "Invalid offset ordering at row {}: start {} > end {}",
                    i, start, end
                )));
            }
            if end > data.len() {
                return Err(Error::Deserialization(format!(
                    "Offset {} exceeds string data length {}",
                    end,
                    data.len()
                )));
            }

            if nulls[i] {
                result.push(None);
            } else {
                result.push(Some(data[start..end].to_vec()));
            }
        }

        Ok(result)
    }
}
