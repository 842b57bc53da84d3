use crate::{Error, Result};

/// Byte-oriented column vector backing one field of a [`crate::batch::RowBatch`].
///
/// Slots are preallocated up to the batch capacity and reused across resets, so
/// refilling a batch does not allocate once each slot has grown to its working size.
#[derive(Debug, Clone)]
pub struct BytesColumnVector {
    values: Vec<Vec<u8>>,
    is_null: Vec<bool>,
    pub no_nulls: bool,
}

impl BytesColumnVector {
    pub fn new(capacity: usize) -> Self {
        Self {
            values: vec![Vec::new(); capacity],
            is_null: vec![false; capacity],
            no_nulls: true,
        }
    }

    pub fn capacity(&self) -> usize {
        self.values.len()
    }

    fn check_row(&self, row: usize) -> Result<()> {
        if row >= self.values.len() {
            return Err(Error::BatchFull {
                row,
                capacity: self.values.len(),
            });
        }
        Ok(())
    }

    /// Copy `bytes` into slot `row`
    pub fn set_value(&mut self, row: usize, bytes: &[u8]) -> Result<()> {
        self.check_row(row)?;
        let slot = &mut self.values[row];
        slot.clear();
        slot.extend_from_slice(bytes);
        self.is_null[row] = false;
        Ok(())
    }

    pub fn set_null(&mut self, row: usize) -> Result<()> {
        self.check_row(row)?;
        self.values[row].clear();
        self.is_null[row] = true;
        self.no_nulls = false;
        Ok(())
    }

    /// Store an optional value: `None` becomes a null slot
    pub fn set_optional(&mut self, row: usize, bytes: Option<&[u8]>) -> Result<()> {
        match bytes {
            Some(bytes) => self.set_value(row, bytes),
            None => self.set_null(row),
        }
    }

    pub fn is_null(&self, row: usize) -> bool {
        self.is_null.get(row).copied().unwrap_or(false)
    }

    /// Raw bytes at `row`, `None` for a null slot or an out-of-range row
    pub fn value(&self, row: usize) -> Option<&[u8]> {
        if row >= self.values.len() || self.is_null[row] {
            return None;
        }
        Some(&self.values[row])
    }

    /// Decode `row` as UTF-8 text. Nulls stay absent.
    pub fn read_as_text(&self, row: usize) -> Result<Option<String>> {
        self.check_row(row)?;
        if self.is_null[row] {
            return Ok(None);
        }
        std::str::from_utf8(&self.values[row])
            .map(|s| Some(s.to_string()))
            .map_err(|e| Error::InvalidUtf8 {
                row,
                reason: e.to_string(),
            })
    }

    /// Clear every slot while keeping its allocation
    pub fn reset(&mut self) {
        for slot in &mut self.values {
            slot.clear();
        }
        self.is_null.fill(false);
        self.no_nulls = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_read_value() {
        let mut col = BytesColumnVector::new(4);
        col.set_value(0, "αβγ".as_bytes()).unwrap();
        col.set_value(1, "🌻".as_bytes()).unwrap();
        assert_eq!(col.read_as_text(0).unwrap().as_deref(), Some("αβγ"));
        assert_eq!(col.read_as_text(1).unwrap().as_deref(), Some("🌻"));
        assert_eq!(col.value(0), Some("αβγ".as_bytes()));
    }

    #[test]
    fn test_null_slots() {
        let mut col = BytesColumnVector::new(2);
        col.set_null(1).unwrap();
        assert!(col.is_null(1));
        assert!(!col.no_nulls);
        assert_eq!(col.read_as_text(1).unwrap(), None);
        assert_eq!(col.value(1), None);

        col.set_value(1, b"x").unwrap();
        assert!(!col.is_null(1));
    }

    #[test]
    fn test_out_of_capacity_is_batch_full() {
        let mut col = BytesColumnVector::new(1);
        assert!(matches!(
            col.set_value(1, b"x"),
            Err(Error::BatchFull { row: 1, capacity: 1 })
        ));
        assert!(col.set_null(5).is_err());
    }

    #[test]
    fn test_invalid_utf8() {
        let mut col = BytesColumnVector::new(1);
        col.set_value(0, &[0xF0, 0x9F]).unwrap();
        assert!(matches!(col.read_as_text(0), Err(Error::InvalidUtf8 { row: 0, .. })));
    }

    #[test]
    fn test_reset_keeps_capacity() {
        let mut col = BytesColumnVector::new(3);
        col.set_value(0, b"abc").unwrap();
        col.set_null(2).unwrap();
        col.reset();
        assert_eq!(col.capacity(), 3);
        assert!(col.no_nulls);
        assert!(!col.is_null(2));
        assert_eq!(col.value(0), Some(&b""[..]));
    }
}
