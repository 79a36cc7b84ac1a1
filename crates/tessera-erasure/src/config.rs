//! Encoding configuration.

use crate::error::{ErasureError, ErasureResult};
use serde::{Deserialize, Serialize};

/// Upper bound on `data_shards + parity_shards`, fixed by the field size.
pub const MAX_TOTAL_SHARDS: usize = 256;

/// Default number of data shards.
pub const DEFAULT_DATA_SHARDS: usize = 16;

/// Default number of parity shards.
pub const DEFAULT_PARITY_SHARDS: usize = 4;

/// Default shard size in bytes.
pub const DEFAULT_SHARD_SIZE: usize = 1024;

/// Validated Reed-Solomon configuration.
///
/// `data_shards` (k) is the minimum shard count needed for recovery;
/// `parity_shards` (m) is the loss tolerance; `shard_size` is the byte
/// length of every shard and fixes the chunk granularity of the streaming
/// encoder at `k * shard_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncodingConfig {
    data_shards: usize,
    parity_shards: usize,
    shard_size: usize,
}

impl EncodingConfig {
    /// Create a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ErasureError::InvalidConfig`] if either shard count is
    /// zero, the total exceeds the field size, or `shard_size` is zero.
    pub fn new(
        data_shards: usize,
        parity_shards: usize,
        shard_size: usize,
    ) -> ErasureResult<Self> {
        if data_shards == 0 {
            return Err(ErasureError::InvalidConfig("at least one data shard required"));
        }
        if parity_shards == 0 {
            return Err(ErasureError::InvalidConfig(
                "at least one parity shard required",
            ));
        }
        if data_shards + parity_shards > MAX_TOTAL_SHARDS {
            return Err(ErasureError::InvalidConfig(
                "total shard count exceeds the field size",
            ));
        }
        if shard_size == 0 {
            return Err(ErasureError::InvalidConfig("shard size must be non-zero"));
        }
        Ok(Self {
            data_shards,
            parity_shards,
            shard_size,
        })
    }

    /// Number of data shards (k).
    #[must_use]
    pub fn data_shards(&self) -> usize {
        self.data_shards
    }

    /// Number of parity shards (m).
    #[must_use]
    pub fn parity_shards(&self) -> usize {
        self.parity_shards
    }

    /// Shard length in bytes.
    #[must_use]
    pub fn shard_size(&self) -> usize {
        self.shard_size
    }

    /// Total number of shards (n = k + m).
    #[must_use]
    pub fn total_shards(&self) -> usize {
        self.data_shards + self.parity_shards
    }

    /// Number of input bytes covered by one chunk (`k * shard_size`).
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.data_shards * self.shard_size
    }

    /// Number of shards that can be lost while staying recoverable.
    #[must_use]
    pub fn fault_tolerance(&self) -> usize {
        self.parity_shards
    }
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            data_shards: DEFAULT_DATA_SHARDS,
            parity_shards: DEFAULT_PARITY_SHARDS,
            shard_size: DEFAULT_SHARD_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        assert!(EncodingConfig::new(1, 1, 1).is_ok());
        assert!(EncodingConfig::new(16, 4, 1024).is_ok());
        assert!(EncodingConfig::new(128, 128, 64).is_ok());

        assert!(EncodingConfig::new(0, 4, 1024).is_err());
        assert!(EncodingConfig::new(4, 0, 1024).is_err());
        assert!(EncodingConfig::new(200, 57, 1024).is_err());
        assert!(EncodingConfig::new(4, 2, 0).is_err());
    }

    #[test]
    fn test_derived_quantities() {
        let config = EncodingConfig::new(8, 6, 2048).unwrap();
        assert_eq!(config.total_shards(), 14);
        assert_eq!(config.chunk_size(), 16384);
        assert_eq!(config.fault_tolerance(), 6);
    }

    #[test]
    fn test_default_is_valid() {
        let config = EncodingConfig::default();
        assert!(
            EncodingConfig::new(
                config.data_shards(),
                config.parity_shards(),
                config.shard_size()
            )
            .is_ok()
        );
    }
}
