use crate::scenario::StringKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("Storage error: {0}")]
    Storage(#[from] strata_core::Error),

    #[error("Scenario {scenario} ({kind}({max_length})): row {index} expected {expected:?}, got {actual:?}")]
    Divergence {
        scenario: String,
        kind: StringKind,
        max_length: u32,
        index: usize,
        expected: Option<String>,
        actual: Option<String>,
    },

    #[error("Scenario {scenario}: expected {expected} rows, read back {actual}")]
    LengthMismatch {
        scenario: String,
        expected: usize,
        actual: usize,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<strata_core::ConfigError> for VerifyError {
    fn from(err: strata_core::ConfigError) -> Self {
        VerifyError::Config(err.to_string())
    }
}

impl From<std::io::Error> for VerifyError {
    fn from(err: std::io::Error) -> Self {
        VerifyError::Storage(strata_core::Error::Io(err))
    }
}

pub type Result<T> = std::result::Result<T, VerifyError>;
