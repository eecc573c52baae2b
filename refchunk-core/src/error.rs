//! Error types shared by the chunking pipelines

use thiserror::Error;

/// Errors raised while reading inputs, staging annotations or writing chunks.
///
/// Every variant is fatal for a run: nothing is retried and lines already
/// written to the output stay where they are.
#[derive(Debug, Error)]
pub enum ChunkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed attribute token: '{token}' (expected key=value)")]
    MalformedAttribute { token: String },

    #[error("Malformed record at line {line}: {message}")]
    MalformedRecord { line: usize, message: String },

    #[error("Unknown annotation source: {0}")]
    UnknownSource(String),

    #[error("Invalid chunk size {0}: sequence chunks need a width of at least 2")]
    InvalidChunkSize(u64),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Staging store error: {0}")]
    Store(String),
}

impl ChunkError {
    pub fn malformed_record<S: Into<String>>(line: usize, message: S) -> Self {
        Self::MalformedRecord {
            line,
            message: message.into(),
        }
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for ChunkError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Store(err.to_string())
    }
}

pub type ChunkResult<T> = Result<T, ChunkError>;
