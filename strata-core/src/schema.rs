use crate::batch::RowBatch;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// String column types. `Char` and `Varchar` carry their declared length in codepoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    String,
    Char(u32),
    Varchar(u32),
}

impl DataType {
    /// Fixed-length CHAR(n). `max_length` must be positive.
    pub fn char(max_length: u32) -> Result<Self> {
        Self::check_length("char", max_length)?;
        Ok(DataType::Char(max_length))
    }

    /// Variable-length VARCHAR(n). `max_length` must be positive.
    pub fn varchar(max_length: u32) -> Result<Self> {
        Self::check_length("varchar", max_length)?;
        Ok(DataType::Varchar(max_length))
    }

    fn check_length(kind: &str, max_length: u32) -> Result<()> {
        if max_length == 0 {
            return Err(Error::InvalidDataType {
                expected: format!("{}(n) with n > 0", kind),
                actual: format!("{}(0)", kind),
            });
        }
        Ok(())
    }

    /// Declared length in codepoints, `None` for unbounded strings
    pub fn max_length(&self) -> Option<u32> {
        match self {
            DataType::String => None,
            DataType::Char(n) | DataType::Varchar(n) => Some(*n),
        }
    }

    /// Whether values are space-padded to the declared length
    pub fn is_fixed_length(&self) -> bool {
        matches!(self, DataType::Char(_))
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::String => write!(f, "string"),
            DataType::Char(n) => write!(f, "char({})", n),
            DataType::Varchar(n) => write!(f, "varchar({})", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Schema with exactly one column
    pub fn single(name: impl Into<String>, data_type: DataType) -> Self {
        Self::new(vec![Field::new(name, data_type)])
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Allocate a row batch with one bytes vector per field
    pub fn create_row_batch(&self, capacity: usize) -> RowBatch {
        RowBatch::new(self.fields.len(), capacity)
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "struct<")?;
        for (idx, field) in self.fields.iter().enumerate() {
            if idx > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}:{}", field.name, field.data_type)?;
        }
        write!(f, ">")
    }
}
