//! Shard and shard-metadata value types.

use crate::config::EncodingConfig;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

/// Metadata carried by every shard of an encoding operation.
///
/// All shards produced by one `encode` call share one metadata value; the
/// decoder uses it to check that a shard collection belongs together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardMetadata {
    /// Byte length of the pre-encoding input
    pub original_size: u64,
    /// Configuration the shards were produced under
    pub config: EncodingConfig,
    /// SHA-256 of the pre-encoding input
    pub checksum: [u8; 32],
    /// Encoding time, milliseconds since the Unix epoch
    pub timestamp_ms: u64,
    /// Chunk number when produced by the streaming encoder
    pub chunk_index: Option<u64>,
}

impl ShardMetadata {
    /// Build metadata for an input buffer.
    #[must_use]
    pub fn for_input(input: &[u8], config: EncodingConfig, chunk_index: Option<u64>) -> Self {
        Self {
            original_size: input.len() as u64,
            config,
            checksum: Sha256::digest(input).into(),
            timestamp_ms: now_ms(),
            chunk_index,
        }
    }

    /// Whether two metadata values describe the same encoding operation.
    /// The timestamp does not participate.
    #[must_use]
    pub fn is_compatible(&self, other: &Self) -> bool {
        self.original_size == other.original_size
            && self.config == other.config
            && self.checksum == other.checksum
            && self.chunk_index == other.chunk_index
    }
}

/// One piece of an erasure-coded buffer.
///
/// Indices below `config.data_shards()` hold input bytes verbatim
/// (systematic encoding); the rest hold parity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shard {
    /// Shard index in `[0, total_shards)`
    pub index: usize,
    /// Shard payload, exactly `config.shard_size()` bytes
    pub data: Vec<u8>,
    /// Operation metadata shared by sibling shards
    pub metadata: ShardMetadata,
}

impl Shard {
    /// Create a new shard.
    #[must_use]
    pub fn new(index: usize, data: Vec<u8>, metadata: ShardMetadata) -> Self {
        Self {
            index,
            data,
            metadata,
        }
    }

    /// Whether this shard carries input bytes.
    #[must_use]
    pub fn is_data(&self) -> bool {
        self.index < self.metadata.config.data_shards()
    }

    /// Whether this shard carries parity.
    #[must_use]
    pub fn is_parity(&self) -> bool {
        !self.is_data()
    }
}

pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
