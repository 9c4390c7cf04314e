use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use zip::CompressionMethod;

use crate::error::MarsError;

/// Per-entry compression method written into the container.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecId {
    Store,
    #[default]
    Deflate,
    Zstd,
}

impl CodecId {
    pub fn method(self) -> CompressionMethod {
        match self {
            CodecId::Store => CompressionMethod::Stored,
            CodecId::Deflate => CompressionMethod::Deflated,
            CodecId::Zstd => CompressionMethod::Zstd,
        }
    }
}

impl fmt::Display for CodecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CodecId::Store => "store",
            CodecId::Deflate => "deflate",
            CodecId::Zstd => "zstd",
        })
    }
}

impl FromStr for CodecId {
    type Err = MarsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "store" | "stored" => Ok(CodecId::Store),
            "deflate" | "deflated" => Ok(CodecId::Deflate),
            "zstd" => Ok(CodecId::Zstd),
            other => Err(MarsError::InvalidOptions(format!("unknown codec: {other}"))),
        }
    }
}
