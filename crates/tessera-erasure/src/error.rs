//! Error types for the erasure-coding core.

use tessera_crypto::{ErrorCategory, Sanitize};
use tessera_field::FieldError;
use thiserror::Error;

/// Errors produced by encoding, decoding and streaming.
#[derive(Debug, Error)]
pub enum ErasureError {
    /// Input rejected before any coding work
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// Configuration parameters out of range or inconsistent
    #[error("invalid encoding configuration: {0}")]
    InvalidConfig(&'static str),

    /// Fewer shards available than data shards required
    #[error("insufficient shards: have {available}, need {required}")]
    InsufficientShards {
        /// Usable shards present
        available: usize,
        /// Data-shard count of the configuration
        required: usize,
    },

    /// Shards whose metadata disagrees, or that belong to different chunks
    #[error("incompatible shards: {0}")]
    IncompatibleShards(&'static str),

    /// Recomputed parity or checksum disagrees with the provided shards
    #[error("shard contents failed verification")]
    CorruptedShards,

    /// The streaming decoder ended with undecodable chunks
    #[error("stream ended with undecodable chunks")]
    IncompleteStream {
        /// Chunk indices that never accumulated enough shards
        missing: Vec<u64>,
    },

    /// Field or matrix arithmetic failure (singular submatrix)
    #[error(transparent)]
    Field(#[from] FieldError),

    /// I/O failure while reading the input stream
    #[error("stream read failed: {0}")]
    Io(#[from] std::io::Error),
}

impl Sanitize for ErasureError {
    fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidConfig(_) => ErrorCategory::InvalidConfig,
            Self::InsufficientShards { .. } | Self::IncompleteStream { .. } => {
                ErrorCategory::InsufficientShares
            }
            Self::IncompatibleShards(_) => ErrorCategory::IncompatibleShares,
            Self::InvalidInput(_) | Self::CorruptedShards => ErrorCategory::ValidationFailed,
            Self::Field(_) | Self::Io(_) => ErrorCategory::OperationFailed,
        }
    }
}

/// Result type for the erasure-coding core.
pub type ErasureResult<T> = Result<T, ErasureError>;
