pub mod types;
pub mod error;
pub mod schema;
pub mod column;
pub mod batch;
pub mod config;

pub use error::{Error, Result};
pub use schema::{Schema, Field, DataType};
pub use column::BytesColumnVector;
pub use batch::RowBatch;
pub use types::CompressionType;
pub use config::{StrataConfig, ConfigError};
