//! # Tessera Erasure
//!
//! Systematic Reed-Solomon erasure coding over GF(256).
//!
//! This crate provides:
//! - Encoding of a byte buffer into `k` data shards plus `m` parity shards
//! - Recovery of the original buffer from any `k` of the `k + m` shards
//! - Chunked streaming encode/decode with ordered chunk emission
//! - Parity and checksum verification of reconstructed data
//!
//! The first `k` shards carry the input verbatim (systematic encoding), so
//! the no-loss path is a concatenation. Shard metadata ties a shard set to
//! its originating operation; mixing operations is detected, not decoded.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod shard;
pub mod stream;

pub use config::{EncodingConfig, MAX_TOTAL_SHARDS};
pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::{ErasureError, ErasureResult};
pub use shard::{Shard, ShardMetadata};
pub use stream::{StreamDecoder, StreamEncoder, decode_stream, encode_stream};

/// Encode a buffer under `config`.
///
/// Convenience wrapper over [`Encoder`]; build an [`Encoder`] directly to
/// amortize matrix construction over many buffers.
///
/// # Errors
///
/// See [`Encoder::encode`].
pub fn encode(data: &[u8], config: EncodingConfig) -> ErasureResult<Vec<Shard>> {
    Encoder::new(config)?.encode(data)
}

/// Recover the original buffer from a shard collection.
///
/// The configuration is taken from the shards' own metadata. Build a
/// [`Decoder`] directly to reuse its inverse cache across calls.
///
/// # Errors
///
/// See [`Decoder::decode`].
pub fn decode(shards: &[Shard]) -> ErasureResult<Vec<u8>> {
    let Some(first) = shards.first() else {
        return Err(ErasureError::InsufficientShards {
            available: 0,
            required: 1,
        });
    };
    Decoder::new(first.metadata.config)?.decode(shards)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_level_roundtrip() {
        let config = EncodingConfig::new(5, 3, 128).unwrap();
        let data: Vec<u8> = (0..600).map(|i| (i % 256) as u8).collect();

        let shards = encode(&data, config).unwrap();
        assert_eq!(shards.len(), 8);

        let survivors: Vec<Shard> = shards.into_iter().skip(3).collect();
        assert_eq!(decode(&survivors).unwrap(), data);
    }

    #[test]
    fn test_decode_empty_collection() {
        assert!(matches!(
            decode(&[]),
            Err(ErasureError::InsufficientShards { available: 0, .. })
        ));
    }
}
