use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Value for {key} too large: {size} bytes (max: {max})")]
    QuotaExceeded { key: String, size: usize, max: usize },

    #[error("Corrupt chunk {key}: {reason}")]
    CorruptChunk { key: String, reason: String },

    #[error("Failed to encode records: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to decode telemetry: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
