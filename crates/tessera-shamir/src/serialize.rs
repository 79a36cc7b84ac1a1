//! Share text format, versioned.
//!
//! Wire form of a share:
//!
//! ```text
//! v2.0 (current): SSS_2.0_{index}_{b64(metadata)}_{b64(data)}_{b64(data_hash)}
//! v1.0 (legacy):  SSS_1.0_{index}_{b64(metadata)}_{b64(data)}
//! ```
//!
//! Metadata is the Base64 of `k|n|size|b64(secret_hash)|epoch_ms|set_id`.
//! Base64 uses the standard alphabet, which never contains `_`, so the
//! underscore is an unambiguous field separator. v1.0 shares are accepted
//! on input only; their integrity hash is recomputed under the v2 rule and
//! re-serialization always emits v2.0.

use crate::error::{ShamirError, ShamirResult};
use crate::share::{SecretShare, ShareMetadata};
use base64::{Engine as _, engine::general_purpose::STANDARD};

/// Format prefix of every serialized share.
pub const SHARE_PREFIX: &str = "SSS";

/// Current wire version.
pub const VERSION_CURRENT: &str = "2.0";

/// Legacy wire version, accepted on input only.
pub const VERSION_LEGACY: &str = "1.0";

/// Encode metadata to its wire form.
#[must_use]
pub fn encode_metadata(metadata: &ShareMetadata) -> String {
    let inner = format!(
        "{}|{}|{}|{}|{}|{}",
        metadata.threshold,
        metadata.total_shares,
        metadata.secret_size,
        STANDARD.encode(metadata.secret_hash),
        metadata.timestamp_ms,
        metadata.share_set_id,
    );
    STANDARD.encode(inner)
}

/// Decode metadata from its wire form.
///
/// # Errors
///
/// Returns [`ShamirError::InvalidShare`] for malformed input.
pub fn decode_metadata(text: &str) -> ShamirResult<ShareMetadata> {
    let raw = STANDARD
        .decode(text.trim())
        .map_err(|_| ShamirError::InvalidShare("metadata is not valid base64"))?;
    let inner = String::from_utf8(raw)
        .map_err(|_| ShamirError::InvalidShare("metadata is not valid text"))?;

    let fields: Vec<&str> = inner.split('|').collect();
    let [threshold, total_shares, secret_size, secret_hash, timestamp_ms, share_set_id] =
        fields.as_slice()
    else {
        return Err(ShamirError::InvalidShare("metadata field count mismatch"));
    };

    let threshold: u8 = threshold
        .parse()
        .map_err(|_| ShamirError::InvalidShare("metadata threshold is not a number"))?;
    let total_shares: u8 = total_shares
        .parse()
        .map_err(|_| ShamirError::InvalidShare("metadata share count is not a number"))?;
    let secret_size: usize = secret_size
        .parse()
        .map_err(|_| ShamirError::InvalidShare("metadata secret size is not a number"))?;
    let timestamp_ms: u64 = timestamp_ms
        .parse()
        .map_err(|_| ShamirError::InvalidShare("metadata timestamp is not a number"))?;

    let hash_bytes = STANDARD
        .decode(secret_hash)
        .map_err(|_| ShamirError::InvalidShare("metadata hash is not valid base64"))?;
    let secret_hash: [u8; 32] = hash_bytes
        .try_into()
        .map_err(|_| ShamirError::InvalidShare("metadata hash length mismatch"))?;

    if share_set_id.trim().is_empty() {
        return Err(ShamirError::InvalidShare("blank share set identifier"));
    }

    Ok(ShareMetadata {
        threshold,
        total_shares,
        secret_size,
        secret_hash,
        timestamp_ms,
        share_set_id: (*share_set_id).to_string(),
    })
}

/// Serialize a share in the current (v2.0) wire form.
#[must_use]
pub fn encode_share(share: &SecretShare) -> String {
    format!(
        "{}_{}_{}_{}_{}_{}",
        SHARE_PREFIX,
        VERSION_CURRENT,
        share.index,
        encode_metadata(&share.metadata),
        STANDARD.encode(&share.data),
        STANDARD.encode(share.data_hash),
    )
}

/// Parse a share from its wire form, accepting v2.0 and legacy v1.0.
///
/// A v1.0 share carries no integrity hash; one is recomputed under the
/// v2.0 rule, so re-serializing the result upgrades it to v2.0.
///
/// # Errors
///
/// - [`ShamirError::UnsupportedVersion`] for an unknown version tag
/// - [`ShamirError::InvalidShare`] for any other malformed input
pub fn decode_share(text: &str) -> ShamirResult<SecretShare> {
    let parts: Vec<&str> = text.trim().split('_').collect();
    if parts.len() < 2 || parts[0] != SHARE_PREFIX {
        return Err(ShamirError::InvalidShare("unrecognized share framing"));
    }

    match parts[1] {
        VERSION_CURRENT => {
            let [_, _, index, metadata, data, data_hash] = parts.as_slice() else {
                return Err(ShamirError::InvalidShare("share field count mismatch"));
            };
            let index = parse_index(index)?;
            let metadata = decode_metadata(metadata)?;
            let data = STANDARD
                .decode(data)
                .map_err(|_| ShamirError::InvalidShare("share payload is not valid base64"))?;
            let hash_bytes = STANDARD
                .decode(data_hash)
                .map_err(|_| ShamirError::InvalidShare("share hash is not valid base64"))?;
            let data_hash: [u8; 32] = hash_bytes
                .try_into()
                .map_err(|_| ShamirError::InvalidShare("share hash length mismatch"))?;
            Ok(SecretShare::from_parts(index, data, metadata, data_hash))
        }
        VERSION_LEGACY => {
            let [_, _, index, metadata, data] = parts.as_slice() else {
                return Err(ShamirError::InvalidShare("share field count mismatch"));
            };
            let index = parse_index(index)?;
            let metadata = decode_metadata(metadata)?;
            let data = STANDARD
                .decode(data)
                .map_err(|_| ShamirError::InvalidShare("share payload is not valid base64"))?;
            Ok(SecretShare::new(index, data, metadata))
        }
        _ => Err(ShamirError::UnsupportedVersion),
    }
}

fn parse_index(text: &str) -> ShamirResult<u8> {
    let index: u8 = text
        .parse()
        .map_err(|_| ShamirError::InvalidShare("share index is not a number"))?;
    if index == 0 {
        return Err(ShamirError::InvalidShare("share index out of range"));
    }
    Ok(index)
}
