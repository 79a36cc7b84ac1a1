//! Systematic Reed-Solomon encoding.

use crate::config::EncodingConfig;
use crate::error::{ErasureError, ErasureResult};
use crate::shard::{Shard, ShardMetadata};
use tessera_field::{Matrix, gf};

/// Systematic Reed-Solomon encoder.
///
/// Holds the encoder matrix G(k, n) for its configuration; encoding is a
/// pure function over the input, so one encoder can be shared freely
/// across threads.
pub struct Encoder {
    config: EncodingConfig,
    matrix: Matrix,
}

impl Encoder {
    /// Create an encoder, building the systematic matrix for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ErasureError::Field`] if matrix construction fails; this
    /// cannot happen for a validated [`EncodingConfig`].
    pub fn new(config: EncodingConfig) -> ErasureResult<Self> {
        let matrix = Matrix::systematic(config.data_shards(), config.total_shards())?;
        Ok(Self { config, matrix })
    }

    /// The configuration this encoder was built for.
    #[must_use]
    pub fn config(&self) -> &EncodingConfig {
        &self.config
    }

    /// The systematic encoder matrix.
    #[must_use]
    pub(crate) fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// Encode a buffer into `k + m` shards.
    ///
    /// The first `k` shards carry the input verbatim (zero-padded to
    /// `shard_size`); the remaining `m` carry parity. All shards share
    /// metadata holding the input's length and SHA-256 checksum.
    ///
    /// # Errors
    ///
    /// Returns [`ErasureError::InvalidInput`] if `data` is empty or longer
    /// than one chunk (`k * shard_size`); the streaming encoder handles
    /// arbitrary lengths.
    pub fn encode(&self, data: &[u8]) -> ErasureResult<Vec<Shard>> {
        if data.is_empty() {
            return Err(ErasureError::InvalidInput("cannot encode an empty buffer"));
        }
        if data.len() > self.config.chunk_size() {
            return Err(ErasureError::InvalidInput(
                "buffer exceeds one chunk; use the streaming encoder",
            ));
        }
        let metadata = ShardMetadata::for_input(data, self.config, None);
        Ok(self.encode_chunk(data, metadata))
    }

    /// Encode one chunk under pre-built metadata. The caller guarantees
    /// `0 < data.len() <= chunk_size`.
    pub(crate) fn encode_chunk(&self, data: &[u8], metadata: ShardMetadata) -> Vec<Shard> {
        let k = self.config.data_shards();
        let m = self.config.parity_shards();
        let shard_size = self.config.shard_size();

        // Partition into k data shards, zero-padding the tail.
        let mut data_shards: Vec<Vec<u8>> = Vec::with_capacity(k);
        for i in 0..k {
            let start = (i * shard_size).min(data.len());
            let end = ((i + 1) * shard_size).min(data.len());
            let mut shard = data[start..end].to_vec();
            shard.resize(shard_size, 0);
            data_shards.push(shard);
        }

        // Parity rows of G times the data columns.
        let mut parity_shards: Vec<Vec<u8>> = vec![vec![0u8; shard_size]; m];
        for (j, parity) in parity_shards.iter_mut().enumerate() {
            let row = self.matrix.row(k + j);
            for (i, data_shard) in data_shards.iter().enumerate() {
                gf::mul_add_slice(parity, data_shard, row[i]);
            }
        }

        data_shards
            .into_iter()
            .chain(parity_shards)
            .enumerate()
            .map(|(index, shard)| Shard::new(index, shard, metadata.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_produces_n_shards() {
        let config = EncodingConfig::new(4, 2, 16).unwrap();
        let encoder = Encoder::new(config).unwrap();
        let data: Vec<u8> = (0..50u8).collect();

        let shards = encoder.encode(&data).unwrap();
        assert_eq!(shards.len(), 6);
        for (i, shard) in shards.iter().enumerate() {
            assert_eq!(shard.index, i);
            assert_eq!(shard.data.len(), 16);
            assert_eq!(shard.metadata.original_size, 50);
        }
    }

    #[test]
    fn test_systematic_prefix_is_input() {
        let config = EncodingConfig::new(3, 2, 4).unwrap();
        let encoder = Encoder::new(config).unwrap();
        let data = [1u8, 2, 3, 4, 5, 6, 7, 8, 9, 10];

        let shards = encoder.encode(&data).unwrap();
        assert_eq!(shards[0].data, vec![1, 2, 3, 4]);
        assert_eq!(shards[1].data, vec![5, 6, 7, 8]);
        // last data shard zero-padded
        assert_eq!(shards[2].data, vec![9, 10, 0, 0]);
    }

    #[test]
    fn test_parity_is_linear_in_data() {
        // encoding the XOR of two inputs gives the XOR of their parities
        let config = EncodingConfig::new(2, 2, 4).unwrap();
        let encoder = Encoder::new(config).unwrap();
        let a = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let b = [9u8, 8, 7, 6, 5, 4, 3, 2];
        let ab: Vec<u8> = a.iter().zip(&b).map(|(x, y)| x ^ y).collect();

        let sa = encoder.encode(&a).unwrap();
        let sb = encoder.encode(&b).unwrap();
        let sab = encoder.encode(&ab).unwrap();
        for j in 2..4 {
            let xored: Vec<u8> = sa[j].data.iter().zip(&sb[j].data).map(|(x, y)| x ^ y).collect();
            assert_eq!(sab[j].data, xored);
        }
    }

    #[test]
    fn test_rejects_empty_and_oversize() {
        let config = EncodingConfig::new(2, 1, 4).unwrap();
        let encoder = Encoder::new(config).unwrap();
        assert!(matches!(
            encoder.encode(&[]),
            Err(ErasureError::InvalidInput(_))
        ));
        assert!(matches!(
            encoder.encode(&[0u8; 9]),
            Err(ErasureError::InvalidInput(_))
        ));
        assert!(encoder.encode(&[0u8; 8]).is_ok());
    }
}
