//! Share validation.
//!
//! Individual shares are checked for structural sanity and integrity;
//! collections additionally for duplicates, mutual compatibility and the
//! threshold. The collection checks run in a fixed order so the reported
//! failure is deterministic.

use crate::config::{MAX_SECRET_SIZE, MAX_SHARES};
use crate::error::{ShamirError, ShamirResult};
use crate::share::{SecretShare, ShareMetadata};

/// Validate a single share: metadata invariants, index range, payload
/// length and integrity hash (constant-time comparison).
///
/// # Errors
///
/// Returns [`ShamirError::InvalidShare`] naming the first failed check.
pub fn validate_share(share: &SecretShare) -> ShamirResult<()> {
    let meta = &share.metadata;
    if meta.threshold == 0 || meta.threshold > meta.total_shares {
        return Err(ShamirError::InvalidShare("metadata threshold out of range"));
    }
    if meta.total_shares > MAX_SHARES {
        return Err(ShamirError::InvalidShare("metadata share count too large"));
    }
    if meta.secret_size == 0 || meta.secret_size > MAX_SECRET_SIZE {
        return Err(ShamirError::InvalidShare("metadata secret size out of range"));
    }
    if meta.share_set_id.trim().is_empty() {
        return Err(ShamirError::InvalidShare("blank share set identifier"));
    }
    if share.index == 0 || share.index > meta.total_shares {
        return Err(ShamirError::InvalidShare("share index out of range"));
    }
    if share.data.len() != meta.secret_size {
        return Err(ShamirError::InvalidShare("share length mismatch"));
    }
    if !share.verify_integrity() {
        return Err(ShamirError::InvalidShare("integrity hash mismatch"));
    }
    Ok(())
}

/// Validate a share collection for reconstruction and return the metadata
/// the collection agrees on.
///
/// Check order: non-empty, each share individually valid, no duplicate
/// indices, all metadata compatible (with `expected` too, when given),
/// and finally the threshold.
///
/// # Errors
///
/// - [`ShamirError::InsufficientShares`] for an empty or sub-threshold set
/// - [`ShamirError::InvalidShare`] if any share fails its own checks
/// - [`ShamirError::IncompatibleShares`] on duplicates or metadata mismatch
pub fn validate_shares<'a>(
    shares: &'a [SecretShare],
    expected: Option<&ShareMetadata>,
) -> ShamirResult<&'a ShareMetadata> {
    let Some(first) = shares.first() else {
        return Err(ShamirError::InsufficientShares {
            available: 0,
            required: expected.map_or(1, |m| m.threshold as usize),
        });
    };

    for share in shares {
        validate_share(share)?;
    }

    let mut indices: Vec<u8> = shares.iter().map(|s| s.index).collect();
    indices.sort_unstable();
    indices.dedup();
    if indices.len() != shares.len() {
        return Err(ShamirError::IncompatibleShares("duplicate share indices"));
    }

    let reference = &first.metadata;
    if shares
        .iter()
        .any(|s| !s.metadata.is_compatible(reference))
    {
        return Err(ShamirError::IncompatibleShares(
            "shares come from different split operations",
        ));
    }
    if let Some(expected) = expected {
        if !reference.is_compatible(expected) {
            return Err(ShamirError::IncompatibleShares(
                "shares do not match the expected metadata",
            ));
        }
    }

    if shares.len() < reference.threshold as usize {
        return Err(ShamirError::InsufficientShares {
            available: shares.len(),
            required: reference.threshold as usize,
        });
    }
    Ok(reference)
}

/// Verify a reconstructed secret against metadata: exact size and SHA-256
/// match (constant-time).
///
/// # Errors
///
/// Returns [`ShamirError::ReconstructionFailed`] on any mismatch.
pub fn validate_reconstruction(secret: &[u8], metadata: &ShareMetadata) -> ShamirResult<()> {
    use sha2::{Digest, Sha256};
    use tessera_crypto::secure;

    if secret.len() != metadata.secret_size {
        return Err(ShamirError::ReconstructionFailed);
    }
    let hash: [u8; 32] = Sha256::digest(secret).into();
    if !secure::constant_time_eq(&hash, &metadata.secret_hash) {
        return Err(ShamirError::ReconstructionFailed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SssConfig;
    use crate::split::split;

    fn split_sample() -> crate::split::SplitSecret {
        split(b"validation sample", &SssConfig::new(3, 5).unwrap()).unwrap()
    }

    #[test]
    fn test_valid_collection_passes() {
        let out = split_sample();
        let meta = validate_shares(&out.shares, Some(&out.metadata)).unwrap();
        assert!(meta.is_compatible(&out.metadata));
    }

    #[test]
    fn test_empty_collection() {
        assert!(matches!(
            validate_shares(&[], None),
            Err(ShamirError::InsufficientShares { available: 0, .. })
        ));
    }

    #[test]
    fn test_tampered_share_rejected_before_threshold_check() {
        let mut out = split_sample();
        out.shares[0].data[0] ^= 1;
        // only two shares, but the tampered one must be reported first
        let err = validate_shares(&out.shares[..2], None).unwrap_err();
        assert!(matches!(err, ShamirError::InvalidShare(_)));
    }

    #[test]
    fn test_duplicate_indices_rejected() {
        let out = split_sample();
        let dup = vec![
            out.shares[0].clone(),
            out.shares[0].clone(),
            out.shares[2].clone(),
        ];
        assert!(matches!(
            validate_shares(&dup, None),
            Err(ShamirError::IncompatibleShares(_))
        ));
    }

    #[test]
    fn test_mixed_operations_rejected() {
        let a = split_sample();
        let b = split_sample();
        let mixed = vec![
            a.shares[0].clone(),
            a.shares[1].clone(),
            b.shares[2].clone(),
        ];
        assert!(matches!(
            validate_shares(&mixed, None),
            Err(ShamirError::IncompatibleShares(_))
        ));
    }

    #[test]
    fn test_below_threshold_rejected() {
        let out = split_sample();
        assert!(matches!(
            validate_shares(&out.shares[..2], None),
            Err(ShamirError::InsufficientShares {
                available: 2,
                required: 3
            })
        ));
    }

    #[test]
    fn test_wrong_expected_metadata_rejected() {
        let a = split_sample();
        let b = split_sample();
        assert!(matches!(
            validate_shares(&a.shares, Some(&b.metadata)),
            Err(ShamirError::IncompatibleShares(_))
        ));
    }

    #[test]
    fn test_reconstruction_validation() {
        let out = split_sample();
        assert!(validate_reconstruction(b"validation sample", &out.metadata).is_ok());
        assert!(validate_reconstruction(b"validation sampl", &out.metadata).is_err());
        assert!(validate_reconstruction(b"validation sampleX", &out.metadata).is_err());
    }
}
