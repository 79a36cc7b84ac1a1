//! End-to-end Shamir secret sharing scenarios.

use tessera_integration_tests::{index_subsets, seeded_bytes};
use tessera_shamir::{
    SecretShare, ShamirError, SssConfig, reconstruct, reconstruct_string, split, split_str,
    validate_shares,
};

const GREETING: &str = "Hello, Shamir Secret Sharing!";

/// 3-of-5 text secret, reconstructed from shares {1, 3, 5}.
#[test]
fn test_3_of_5_text_roundtrip() {
    let out = split_str(GREETING, &SssConfig::new(3, 5).unwrap()).unwrap();

    let chosen: Vec<SecretShare> = out
        .shares
        .iter()
        .filter(|s| [1u8, 3, 5].contains(&s.index))
        .cloned()
        .collect();
    assert_eq!(
        reconstruct_string(&chosen, Some(&out.metadata)).unwrap(),
        GREETING
    );
}

/// Any k-subset of shares reconstructs the secret.
#[test]
fn test_every_k_subset_reconstructs() {
    let secret = seeded_bytes(0x5A5A, 96);
    let out = split(&secret, &SssConfig::new(3, 6).unwrap()).unwrap();

    for subset in index_subsets(6, 3) {
        let chosen: Vec<SecretShare> = subset.iter().map(|&i| out.shares[i].clone()).collect();
        assert_eq!(
            reconstruct(&chosen, None).unwrap(),
            secret,
            "failed for share subset {subset:?}"
        );
    }
}

/// Two shares under a threshold of three must be refused.
#[test]
fn test_insufficient_shares() {
    let out = split_str(GREETING, &SssConfig::new(3, 5).unwrap()).unwrap();
    let err = reconstruct(&out.shares[..2], None).unwrap_err();
    assert!(matches!(
        err,
        ShamirError::InsufficientShares {
            available: 2,
            required: 3
        }
    ));
}

/// Flipping the low bit of one byte of one share must be detected.
#[test]
fn test_single_bit_tamper_detected() {
    let mut out = split_str(GREETING, &SssConfig::new(3, 5).unwrap()).unwrap();
    out.shares[0].data[0] ^= 0x01;

    let chosen: Vec<SecretShare> = out.shares[..3].to_vec();
    assert!(matches!(
        validate_shares(&chosen, None),
        Err(ShamirError::InvalidShare(_))
    ));
    assert!(matches!(
        reconstruct(&chosen, None),
        Err(ShamirError::InvalidShare(_))
    ));
}

/// Mixing shares from two splits of the same secret must be detected.
#[test]
fn test_cross_operation_mixing_detected() {
    let config = SssConfig::new(3, 5).unwrap();
    let a = split_str(GREETING, &config).unwrap();
    let b = split_str(GREETING, &config).unwrap();

    let mixed = vec![
        a.shares[0].clone(),
        a.shares[1].clone(),
        b.shares[2].clone(),
    ];
    assert!(matches!(
        reconstruct(&mixed, None),
        Err(ShamirError::IncompatibleShares(_))
    ));
}

#[test]
fn test_maximum_size_binary_secret() {
    let secret = seeded_bytes(0x1024, 1024);
    let out = split(&secret, &SssConfig::new(5, 9).unwrap()).unwrap();
    let recovered = reconstruct(&out.shares[4..9], Some(&out.metadata)).unwrap();
    assert_eq!(recovered, secret);
}

#[test]
fn test_non_utf8_secret_fails_string_reconstruction() {
    let out = split(&[0xFF, 0xFE, 0x00, 0x80], &SssConfig::new(2, 3).unwrap()).unwrap();
    assert!(matches!(
        reconstruct_string(&out.shares[..2], None),
        Err(ShamirError::ReconstructionFailed)
    ));
    // byte reconstruction of the same shares still works
    assert_eq!(
        reconstruct(&out.shares[..2], None).unwrap(),
        vec![0xFF, 0xFE, 0x00, 0x80]
    );
}

#[test]
fn test_wide_configuration() {
    let secret = seeded_bytes(0x7777, 40);
    let out = split(&secret, &SssConfig::new(2, 128).unwrap()).unwrap();
    assert_eq!(out.shares.len(), 128);
    let ends = vec![out.shares[0].clone(), out.shares[127].clone()];
    assert_eq!(reconstruct(&ends, None).unwrap(), secret);
}
