//! Secret splitting.
//!
//! Every byte of the secret is shared independently: a fresh random
//! polynomial of degree k-1 with the byte as constant term, evaluated at
//! x = 1..=n. Coefficient buffers live in `Zeroizing` storage so they are
//! wiped on every exit path.

use crate::config::SssConfig;
use crate::error::{ShamirError, ShamirResult};
use crate::share::{SecretShare, ShareMetadata};
use tessera_crypto::SecureRng;
use tessera_field::poly;
use tracing::warn;
use zeroize::Zeroizing;

/// The outcome of a split: the shares to distribute and the metadata they
/// all embed.
#[derive(Debug, Clone)]
pub struct SplitSecret {
    /// One share per participant, indices 1..=n
    pub shares: Vec<SecretShare>,
    /// The operation metadata, also embedded in every share
    pub metadata: ShareMetadata,
}

/// Split a secret under a k-of-n configuration.
///
/// # Errors
///
/// - [`ShamirError::InvalidSecret`] if the secret is empty or exceeds
///   `config.secret_max_size()`
/// - [`ShamirError::Random`] if the CSPRNG fails
pub fn split(secret: &[u8], config: &SssConfig) -> ShamirResult<SplitSecret> {
    if secret.is_empty() {
        return Err(ShamirError::InvalidSecret("secret is empty"));
    }
    if secret.len() > config.secret_max_size() {
        return Err(ShamirError::InvalidSecret(
            "secret exceeds the configured size cap",
        ));
    }
    if config.threshold() == 1 {
        warn!("threshold of one offers no secrecy against a single share holder");
    }

    let metadata = ShareMetadata::for_secret(secret, config)?;
    let k = config.threshold() as usize;
    let n = config.total_shares() as usize;

    let mut share_bufs: Vec<Vec<u8>> = (0..n)
        .map(|_| Vec::with_capacity(secret.len()))
        .collect();
    let mut rng = SecureRng::new();
    let mut coeffs = Zeroizing::new(vec![0u8; k]);

    for &secret_byte in secret {
        coeffs[0] = secret_byte;
        if k > 1 {
            // resample until the polynomial has true degree > 0, so no
            // share equals the secret byte across the board
            loop {
                rng.fill(&mut coeffs[1..])?;
                if coeffs[1..].iter().any(|&c| c != 0) {
                    break;
                }
            }
        }
        for (x, buf) in (1..=n as u8).zip(share_bufs.iter_mut()) {
            buf.push(poly::eval(&coeffs, x));
        }
    }

    let shares = share_bufs
        .into_iter()
        .enumerate()
        .map(|(i, buf)| SecretShare::new((i + 1) as u8, buf, metadata.clone()))
        .collect();

    Ok(SplitSecret { shares, metadata })
}

/// Split a UTF-8 string secret.
///
/// # Errors
///
/// As for [`split`].
pub fn split_str(secret: &str, config: &SssConfig) -> ShamirResult<SplitSecret> {
    split(secret.as_bytes(), config)
}
