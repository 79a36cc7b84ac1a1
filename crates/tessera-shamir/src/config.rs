//! Sharing configuration.

use crate::error::{ShamirError, ShamirResult};
use serde::{Deserialize, Serialize};

/// Upper bound on the number of shares per split.
pub const MAX_SHARES: u8 = 128;

/// Upper bound on the secret size in bytes.
pub const MAX_SECRET_SIZE: usize = 1024;

/// Size of the field every byte is shared over. Fixed.
pub const FIELD_SIZE: usize = 256;

/// Validated k-of-n sharing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SssConfig {
    threshold: u8,
    total_shares: u8,
    secret_max_size: usize,
}

impl SssConfig {
    /// Create a validated configuration with the default secret-size cap.
    ///
    /// # Errors
    ///
    /// Returns [`ShamirError::InvalidConfig`] if `threshold` is zero,
    /// exceeds `total_shares`, or `total_shares` exceeds [`MAX_SHARES`].
    pub fn new(threshold: u8, total_shares: u8) -> ShamirResult<Self> {
        if threshold == 0 {
            return Err(ShamirError::InvalidConfig("threshold must be at least one"));
        }
        if threshold > total_shares {
            return Err(ShamirError::InvalidConfig(
                "threshold cannot exceed the total share count",
            ));
        }
        if total_shares > MAX_SHARES {
            return Err(ShamirError::InvalidConfig("too many shares requested"));
        }
        Ok(Self {
            threshold,
            total_shares,
            secret_max_size: MAX_SECRET_SIZE,
        })
    }

    /// Lower the secret-size cap for this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ShamirError::InvalidConfig`] if `limit` is zero or above
    /// [`MAX_SECRET_SIZE`].
    pub fn with_secret_max_size(mut self, limit: usize) -> ShamirResult<Self> {
        if limit == 0 || limit > MAX_SECRET_SIZE {
            return Err(ShamirError::InvalidConfig(
                "secret size cap out of supported range",
            ));
        }
        self.secret_max_size = limit;
        Ok(self)
    }

    /// Minimum shares needed for reconstruction (k).
    #[must_use]
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Total shares produced by a split (n).
    #[must_use]
    pub fn total_shares(&self) -> u8 {
        self.total_shares
    }

    /// Largest secret this configuration will split.
    #[must_use]
    pub fn secret_max_size(&self) -> usize {
        self.secret_max_size
    }
}

impl Default for SssConfig {
    fn default() -> Self {
        Self {
            threshold: 3,
            total_shares: 5,
            secret_max_size: MAX_SECRET_SIZE,
        }
    }
}
