//! Share and share-metadata value types.

use crate::config::SssConfig;
use crate::error::ShamirResult;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};
use tessera_crypto::{SecureRng, secure};

/// Metadata binding a share set to its originating split operation.
///
/// Two metadata values are compatible when threshold, total share count,
/// secret size, secret hash and share-set id all match; the timestamp is
/// informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareMetadata {
    /// Minimum shares needed for reconstruction (k)
    pub threshold: u8,
    /// Total shares produced (n)
    pub total_shares: u8,
    /// Byte length of the secret
    pub secret_size: usize,
    /// SHA-256 of the secret
    pub secret_hash: [u8; 32],
    /// Split time, milliseconds since the Unix epoch
    pub timestamp_ms: u64,
    /// Unique identifier of the split operation; never blank
    pub share_set_id: String,
}

impl ShareMetadata {
    /// Build metadata for a split of `secret`, drawing a fresh share-set
    /// id from the CSPRNG.
    ///
    /// # Errors
    ///
    /// Propagates CSPRNG failure.
    pub fn for_secret(secret: &[u8], config: &SssConfig) -> ShamirResult<Self> {
        Ok(Self {
            threshold: config.threshold(),
            total_shares: config.total_shares(),
            secret_size: secret.len(),
            secret_hash: Sha256::digest(secret).into(),
            timestamp_ms: now_ms(),
            share_set_id: hex::encode(SecureRng::new().array::<8>()?),
        })
    }

    /// Whether two metadata values belong to the same split operation.
    #[must_use]
    pub fn is_compatible(&self, other: &Self) -> bool {
        self.threshold == other.threshold
            && self.total_shares == other.total_shares
            && self.secret_size == other.secret_size
            && self.secret_hash == other.secret_hash
            && self.share_set_id == other.share_set_id
    }
}

/// One participant's share of a split secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretShare {
    /// Share index (the polynomial evaluation point), in `[1, 128]`
    pub index: u8,
    /// Share payload, `metadata.secret_size` bytes
    pub data: Vec<u8>,
    /// Metadata shared by sibling shares
    pub metadata: ShareMetadata,
    /// SHA-256 over index, payload and share-set id
    pub data_hash: [u8; 32],
}

impl SecretShare {
    /// Create a share, computing its integrity hash.
    #[must_use]
    pub fn new(index: u8, data: Vec<u8>, metadata: ShareMetadata) -> Self {
        let data_hash = Self::compute_data_hash(index, &data, &metadata.share_set_id);
        Self {
            index,
            data,
            metadata,
            data_hash,
        }
    }

    /// Reassemble a share from parsed parts without recomputing the hash.
    #[must_use]
    pub fn from_parts(
        index: u8,
        data: Vec<u8>,
        metadata: ShareMetadata,
        data_hash: [u8; 32],
    ) -> Self {
        Self {
            index,
            data,
            metadata,
            data_hash,
        }
    }

    /// The integrity hash rule: SHA-256 of the decimal ASCII index, the
    /// payload and the share-set id, in that order.
    #[must_use]
    pub fn compute_data_hash(index: u8, data: &[u8], share_set_id: &str) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(index.to_string().as_bytes());
        hasher.update(data);
        hasher.update(share_set_id.as_bytes());
        hasher.finalize().into()
    }

    /// Whether the stored hash matches a recomputation, compared in
    /// constant time.
    #[must_use]
    pub fn verify_integrity(&self) -> bool {
        let expected =
            Self::compute_data_hash(self.index, &self.data, &self.metadata.share_set_id);
        secure::constant_time_eq(&expected, &self.data_hash)
    }
}

// Shares are secret material; Debug shows shape, never contents.
impl fmt::Debug for SecretShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretShare")
            .field("index", &self.index)
            .field("data_len", &self.data.len())
            .field("share_set_id", &self.metadata.share_set_id)
            .finish_non_exhaustive()
    }
}

pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
