use crate::column::BytesColumnVector;
use crate::{Error, Result};

/// Capacity-bounded group of rows moved together through the write or read path.
///
/// `size` is the number of populated rows; every column holds `capacity` slots.
#[derive(Debug, Clone)]
pub struct RowBatch {
    pub size: usize,
    capacity: usize,
    pub columns: Vec<BytesColumnVector>,
}

impl RowBatch {
    pub fn new(num_columns: usize, capacity: usize) -> Self {
        Self {
            size: 0,
            capacity,
            columns: (0..num_columns)
                .map(|_| BytesColumnVector::new(capacity))
                .collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.size >= self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn column(&self, idx: usize) -> Result<&BytesColumnVector> {
        let count = self.columns.len();
        self.columns.get(idx).ok_or_else(|| {
            Error::SchemaMismatch(format!("column {} out of range ({} columns)", idx, count))
        })
    }

    pub fn column_mut(&mut self, idx: usize) -> Result<&mut BytesColumnVector> {
        let count = self.columns.len();
        self.columns.get_mut(idx).ok_or_else(|| {
            Error::SchemaMismatch(format!("column {} out of range ({} columns)", idx, count))
        })
    }

    /// Empty the batch without releasing slot buffers
    pub fn reset(&mut self) {
        self.size = 0;
        for column in &mut self.columns {
            column.reset();
        }
    }
}
