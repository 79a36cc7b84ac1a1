//! Secret reconstruction by Lagrange interpolation at zero.

use crate::error::{ShamirError, ShamirResult};
use crate::share::{SecretShare, ShareMetadata};
use crate::validate;
use tessera_crypto::secure;
use tessera_field::gf;
use zeroize::Zeroizing;

/// Reconstruct a secret from its shares.
///
/// The collection is validated first (see [`validate::validate_shares`]);
/// reconstruction then uses the first `threshold` shares in input order,
/// so the caller controls which shares participate. The result is checked
/// against the metadata's size and secret hash before it is returned; the
/// candidate buffer is wiped if the check fails.
///
/// # Errors
///
/// Any validation error, or [`ShamirError::ReconstructionFailed`] if the
/// recovered bytes do not match the metadata fingerprint.
pub fn reconstruct(
    shares: &[SecretShare],
    expected: Option<&ShareMetadata>,
) -> ShamirResult<Vec<u8>> {
    let metadata = validate::validate_shares(shares, expected)?;
    let k = metadata.threshold as usize;
    let used = &shares[..k];

    // Lagrange basis at x = 0 depends only on the share indices, so it is
    // computed once and reused for every byte position.
    let xs: Vec<u8> = used.iter().map(|s| s.index).collect();
    let mut basis = Vec::with_capacity(k);
    for (j, &xj) in xs.iter().enumerate() {
        let mut numerator = 1u8;
        let mut denominator = 1u8;
        for (l, &xl) in xs.iter().enumerate() {
            if l != j {
                numerator = gf::mul(numerator, xl);
                denominator = gf::mul(denominator, gf::sub(xj, xl));
            }
        }
        basis.push(gf::div(numerator, denominator)?);
    }

    let mut secret = Zeroizing::new(vec![0u8; metadata.secret_size]);
    for (byte_idx, out) in secret.iter_mut().enumerate() {
        let mut acc = 0u8;
        for (j, share) in used.iter().enumerate() {
            acc = gf::add(acc, gf::mul(share.data[byte_idx], basis[j]));
        }
        *out = acc;
    }

    validate::validate_reconstruction(&secret, metadata)?;
    Ok(secret.to_vec())
}

/// Reconstruct a UTF-8 string secret.
///
/// # Errors
///
/// As for [`reconstruct`]; a secret that is not valid UTF-8 is reported
/// as [`ShamirError::ReconstructionFailed`] after wiping the recovered
/// bytes.
pub fn reconstruct_string(
    shares: &[SecretShare],
    expected: Option<&ShareMetadata>,
) -> ShamirResult<String> {
    let bytes = reconstruct(shares, expected)?;
    String::from_utf8(bytes).map_err(|e| {
        let mut leaked = e.into_bytes();
        secure::clear(&mut leaked);
        ShamirError::ReconstructionFailed
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SssConfig;
    use crate::split::{split, split_str};

    #[test]
    fn test_roundtrip_exact_threshold() {
        let secret = b"round trip secret";
        let out = split(secret, &SssConfig::new(3, 5).unwrap()).unwrap();
        let recovered = reconstruct(&out.shares[..3], Some(&out.metadata)).unwrap();
        assert_eq!(recovered, secret);
    }

    #[test]
    fn test_roundtrip_every_three_subset() {
        let secret = b"subset test";
        let out = split(secret, &SssConfig::new(3, 5).unwrap()).unwrap();
        for a in 0..5 {
            for b in (a + 1)..5 {
                for c in (b + 1)..5 {
                    let subset = vec![
                        out.shares[a].clone(),
                        out.shares[b].clone(),
                        out.shares[c].clone(),
                    ];
                    assert_eq!(
                        reconstruct(&subset, None).unwrap(),
                        secret,
                        "failed for subset ({a}, {b}, {c})"
                    );
                }
            }
        }
    }

    #[test]
    fn test_extra_shares_are_ignored_deterministically() {
        let secret = b"first k shares win";
        let out = split(secret, &SssConfig::new(2, 6).unwrap()).unwrap();
        // all six shares supplied; the first two are used
        assert_eq!(reconstruct(&out.shares, None).unwrap(), secret);
        // reversed order selects a different pair; result is identical
        let reversed: Vec<_> = out.shares.iter().rev().cloned().collect();
        assert_eq!(reconstruct(&reversed, None).unwrap(), secret);
    }

    #[test]
    fn test_insufficient_shares() {
        let out = split(b"secret", &SssConfig::new(3, 5).unwrap()).unwrap();
        assert!(matches!(
            reconstruct(&out.shares[..2], None),
            Err(ShamirError::InsufficientShares {
                available: 2,
                required: 3
            })
        ));
    }

    #[test]
    fn test_tampered_share_rejected() {
        let mut out = split(b"tamper", &SssConfig::new(3, 5).unwrap()).unwrap();
        out.shares[0].data[0] ^= 0x01;
        assert!(matches!(
            reconstruct(&out.shares[..3], None),
            Err(ShamirError::InvalidShare(_))
        ));
    }

    #[test]
    fn test_consistent_tamper_caught_by_secret_hash() {
        // rewrite a share and fix up its integrity hash; the per-share
        // check passes but the secret fingerprint must still catch it
        let mut out = split(b"deep tamper", &SssConfig::new(2, 3).unwrap()).unwrap();
        let victim = &mut out.shares[0];
        victim.data[0] ^= 0xFF;
        victim.data_hash = crate::share::SecretShare::compute_data_hash(
            victim.index,
            &victim.data,
            &victim.metadata.share_set_id,
        );
        assert!(matches!(
            reconstruct(&out.shares[..2], None),
            Err(ShamirError::ReconstructionFailed)
        ));
    }

    #[test]
    fn test_string_roundtrip() {
        let out = split_str("Hello, Shamir!", &SssConfig::new(2, 4).unwrap()).unwrap();
        let recovered = reconstruct_string(&out.shares[1..3], Some(&out.metadata)).unwrap();
        assert_eq!(recovered, "Hello, Shamir!");
    }

    #[test]
    fn test_full_byte_range_secret() {
        let secret: Vec<u8> = (0..=255u8).collect();
        let out = split(&secret, &SssConfig::new(4, 7).unwrap()).unwrap();
        let recovered = reconstruct(&out.shares[2..6], None).unwrap();
        assert_eq!(recovered, secret);
    }
}
