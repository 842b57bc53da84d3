use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Compression algorithm applied to each stored block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionType {
    #[default]
    None,
    LZ4,
    Zstd,
    Snappy,
}

impl fmt::Display for CompressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionType::None => write!(f, "none"),
            CompressionType::LZ4 => write!(f, "lz4"),
            CompressionType::Zstd => write!(f, "zstd"),
            CompressionType::Snappy => write!(f, "snappy"),
        }
    }
}

impl FromStr for CompressionType {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(CompressionType::None),
            "lz4" => Ok(CompressionType::LZ4),
            "zstd" => Ok(CompressionType::Zstd),
            "snappy" => Ok(CompressionType::Snappy),
            other => Err(crate::Error::Configuration(format!(
                "unknown compression type '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_type_display() {
        assert_eq!(CompressionType::LZ4.to_string(), "lz4");
        assert_eq!(CompressionType::Zstd.to_string(), "zstd");
        assert_eq!(CompressionType::Snappy.to_string(), "snappy");
        assert_eq!(CompressionType::None.to_string(), "none");
    }

    #[test]
    fn test_compression_type_parse() {
        assert_eq!("LZ4".parse::<CompressionType>().unwrap(), CompressionType::LZ4);
        assert_eq!(" zstd ".parse::<CompressionType>().unwrap(), CompressionType::Zstd);
        assert!("gzip".parse::<CompressionType>().is_err());
    }
}
