//! Reed-Solomon decoding with strategy selection.
//!
//! Two paths: a fast path when every data shard survived, and a
//! matrix-inversion path that recovers missing data shards from any `k`
//! survivors. Inverses are memoized per row set in a bounded concurrent
//! cache.

use crate::config::EncodingConfig;
use crate::error::{ErasureError, ErasureResult};
use crate::shard::Shard;
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tessera_field::{Matrix, gf};
use tracing::debug;

/// Entry bound for the inverse cache; reaching it clears the cache.
const INVERSE_CACHE_CAPACITY: usize = 64;

/// Reed-Solomon decoder.
///
/// Stateless apart from the inverse cache, which is safe for concurrent
/// use and only ever affects speed, never results.
pub struct Decoder {
    config: EncodingConfig,
    matrix: Matrix,
    inverse_cache: DashMap<Vec<usize>, Arc<Matrix>>,
}

impl Decoder {
    /// Create a decoder for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ErasureError::Field`] if matrix construction fails; this
    /// cannot happen for a validated [`EncodingConfig`].
    pub fn new(config: EncodingConfig) -> ErasureResult<Self> {
        let matrix = Matrix::systematic(config.data_shards(), config.total_shards())?;
        Ok(Self {
            config,
            matrix,
            inverse_cache: DashMap::new(),
        })
    }

    /// The configuration this decoder was built for.
    #[must_use]
    pub fn config(&self) -> &EncodingConfig {
        &self.config
    }

    /// Recover the original buffer from any `k` of its shards.
    ///
    /// Shards are validated first (consistent metadata, correct lengths;
    /// duplicates by index are dropped, keeping the first occurrence).
    /// Recovery prefers the lowest-index shards so repeated losses hit the
    /// same cached inverse. After reconstruction, parity is recomputed and
    /// compared against every provided parity shard, and the metadata
    /// checksum is checked against the reconstructed bytes.
    ///
    /// # Errors
    ///
    /// - [`ErasureError::InsufficientShards`] with fewer than `k` distinct shards
    /// - [`ErasureError::IncompatibleShards`] on metadata disagreement
    /// - [`ErasureError::CorruptedShards`] when verification fails
    pub fn decode(&self, shards: &[Shard]) -> ErasureResult<Vec<u8>> {
        let selected = self.validate(shards)?;
        let data_shards = self.recover_data(&selected)?;
        self.verify_parity(&data_shards, &selected)?;
        self.assemble(&data_shards, &selected)
    }

    /// Rebuild the complete shard set from any `k` shards.
    ///
    /// Missing data shards are recovered as in [`Self::decode`], missing
    /// parity shards are re-derived from the recovered data, and provided
    /// shards are passed through. The result always holds all
    /// `total_shards` shards in index order, verified the same way
    /// [`Self::decode`] verifies.
    ///
    /// # Errors
    ///
    /// As for [`Self::decode`].
    pub fn reconstruct_shards(&self, shards: &[Shard]) -> ErasureResult<Vec<Shard>> {
        let selected = self.validate(shards)?;
        let data_shards = self.recover_data(&selected)?;
        self.verify_parity(&data_shards, &selected)?;
        // checksum check needs the assembled buffer even though the
        // caller asked for shards
        let _ = self.assemble(&data_shards, &selected)?;

        let k = self.config.data_shards();
        let metadata = selected[0].metadata.clone();
        let mut rebuilt: Vec<Shard> = data_shards
            .into_iter()
            .enumerate()
            .map(|(i, data)| Shard::new(i, data, metadata.clone()))
            .collect();

        let mut provided_parity: Vec<Option<&Shard>> =
            vec![None; self.config.parity_shards()];
        for &shard in selected.iter().filter(|s| s.index >= k) {
            provided_parity[shard.index - k] = Some(shard);
        }
        for (j, provided) in provided_parity.into_iter().enumerate() {
            let shard = match provided {
                Some(shard) => shard.clone(),
                None => {
                    let row = self.matrix.row(k + j);
                    let mut parity = vec![0u8; self.config.shard_size()];
                    for (i, data) in rebuilt[..k].iter().enumerate() {
                        gf::mul_add_slice(&mut parity, &data.data, row[i]);
                    }
                    Shard::new(k + j, parity, metadata.clone())
                }
            };
            rebuilt.push(shard);
        }
        Ok(rebuilt)
    }

    /// Recover all `k` data-shard buffers from a validated selection.
    fn recover_data(&self, selected: &[&Shard]) -> ErasureResult<Vec<Vec<u8>>> {
        let k = self.config.data_shards();
        let shard_size = self.config.shard_size();

        let mut data_shards: Vec<Option<Vec<u8>>> = vec![None; k];
        for shard in selected {
            if shard.index < k {
                data_shards[shard.index] = Some(shard.data.clone());
            }
        }
        let missing: Vec<usize> = (0..k).filter(|&i| data_shards[i].is_none()).collect();

        if missing.is_empty() {
            debug!(shards = selected.len(), "decoding via fast path");
        } else {
            let survivors = &selected[..k];
            let rows: Vec<usize> = survivors.iter().map(|s| s.index).collect();
            debug!(?rows, missing = missing.len(), "decoding via matrix inversion");
            let inverse = self.inverse_for(&rows)?;
            for &d in &missing {
                let mut recovered = vec![0u8; shard_size];
                for (j, survivor) in survivors.iter().enumerate() {
                    gf::mul_add_slice(&mut recovered, &survivor.data, inverse.get(d, j));
                }
                data_shards[d] = Some(recovered);
            }
        }

        Ok(data_shards.into_iter().flatten().collect())
    }

    /// Concatenate data shards, truncate to the recorded size and check
    /// the metadata checksum.
    fn assemble(&self, data_shards: &[Vec<u8>], selected: &[&Shard]) -> ErasureResult<Vec<u8>> {
        let original_size = selected[0].metadata.original_size as usize;
        let mut result = Vec::with_capacity(original_size);
        for shard in data_shards {
            result.extend_from_slice(shard);
        }
        result.truncate(original_size);

        let checksum: [u8; 32] = Sha256::digest(&result).into();
        if checksum != selected[0].metadata.checksum {
            return Err(ErasureError::CorruptedShards);
        }
        Ok(result)
    }

    /// Parity-check a complete shard set.
    ///
    /// Returns `Ok(false)` if any shard is absent (verification needs all
    /// of them) or any parity row disagrees with the data shards.
    ///
    /// # Errors
    ///
    /// Returns [`ErasureError::IncompatibleShards`] on metadata
    /// disagreement, as for [`Self::decode`].
    pub fn verify(&self, shards: &[Shard]) -> ErasureResult<bool> {
        let selected = self.validate(shards)?;
        if selected.len() < self.config.total_shards() {
            return Ok(false);
        }
        let k = self.config.data_shards();
        let data_shards: Vec<Vec<u8>> = selected[..k].iter().map(|s| s.data.clone()).collect();
        Ok(self.verify_parity(&data_shards, &selected).is_ok())
    }

    /// Validate a shard collection and return it deduplicated by index,
    /// in ascending index order.
    fn validate<'a>(&self, shards: &'a [Shard]) -> ErasureResult<Vec<&'a Shard>> {
        let required = self.config.data_shards();
        let Some(first) = shards.first() else {
            return Err(ErasureError::InsufficientShards {
                available: 0,
                required,
            });
        };
        let reference = &first.metadata;
        if reference.config != self.config {
            return Err(ErasureError::IncompatibleShards(
                "shard configuration differs from decoder configuration",
            ));
        }
        if reference.original_size as usize > self.config.chunk_size() {
            return Err(ErasureError::InvalidInput("recorded size exceeds one chunk"));
        }

        let mut selected: Vec<&Shard> = Vec::with_capacity(shards.len());
        for shard in shards {
            if !shard.metadata.is_compatible(reference) {
                return Err(ErasureError::IncompatibleShards(
                    "shard metadata does not match the other shards",
                ));
            }
            if shard.index >= self.config.total_shards() {
                return Err(ErasureError::InvalidInput("shard index out of range"));
            }
            if shard.data.len() != self.config.shard_size() {
                return Err(ErasureError::InvalidInput("shard length mismatch"));
            }
            selected.push(shard);
        }

        selected.sort_by_key(|s| s.index);
        selected.dedup_by_key(|s| s.index);
        if selected.len() < required {
            return Err(ErasureError::InsufficientShards {
                available: selected.len(),
                required,
            });
        }
        Ok(selected)
    }

    /// Recompute parity from the full data-shard set and compare it with
    /// every provided parity shard.
    fn verify_parity(&self, data_shards: &[Vec<u8>], selected: &[&Shard]) -> ErasureResult<()> {
        let k = self.config.data_shards();
        for shard in selected.iter().filter(|s| s.index >= k) {
            let row = self.matrix.row(shard.index);
            let mut expected = vec![0u8; self.config.shard_size()];
            for (i, data) in data_shards.iter().enumerate() {
                gf::mul_add_slice(&mut expected, data, row[i]);
            }
            if expected != shard.data {
                return Err(ErasureError::CorruptedShards);
            }
        }
        Ok(())
    }

    fn inverse_for(&self, rows: &[usize]) -> ErasureResult<Arc<Matrix>> {
        if let Some(inverse) = self.inverse_cache.get(rows) {
            debug!(?rows, "inverse cache hit");
            return Ok(Arc::clone(&inverse));
        }
        let inverse = Arc::new(self.matrix.select_rows(rows)?.invert()?);
        if self.inverse_cache.len() >= INVERSE_CACHE_CAPACITY {
            self.inverse_cache.clear();
        }
        self.inverse_cache
            .insert(rows.to_vec(), Arc::clone(&inverse));
        Ok(inverse)
    }

    /// Number of cached inverses, for introspection in tests.
    #[must_use]
    pub fn cached_inverses(&self) -> usize {
        self.inverse_cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::Encoder;

    fn encode_sample(k: usize, m: usize, shard_size: usize, len: usize) -> (Vec<Shard>, Vec<u8>) {
        let config = EncodingConfig::new(k, m, shard_size).unwrap();
        let data: Vec<u8> = (0..len).map(|i| (i * 31 % 251) as u8).collect();
        let shards = Encoder::new(config).unwrap().encode(&data).unwrap();
        (shards, data)
    }

    fn decoder_for(shards: &[Shard]) -> Decoder {
        Decoder::new(shards[0].metadata.config).unwrap()
    }

    #[test]
    fn test_fast_path_roundtrip() {
        let (shards, data) = encode_sample(4, 2, 64, 200);
        let decoder = decoder_for(&shards);
        let recovered = decoder.decode(&shards[..4]).unwrap();
        assert_eq!(recovered, data);
        assert_eq!(decoder.cached_inverses(), 0);
    }

    #[test]
    fn test_recovery_from_parity() {
        let (shards, data) = encode_sample(4, 3, 64, 230);
        let decoder = decoder_for(&shards);

        // drop data shards 0 and 2
        let survivors: Vec<Shard> = shards
            .iter()
            .filter(|s| s.index != 0 && s.index != 2)
            .cloned()
            .collect();
        let recovered = decoder.decode(&survivors).unwrap();
        assert_eq!(recovered, data);
        assert_eq!(decoder.cached_inverses(), 1);
    }

    #[test]
    fn test_cache_reuse_across_decodes() {
        let (shards, data) = encode_sample(4, 2, 32, 100);
        let decoder = decoder_for(&shards);
        let survivors: Vec<Shard> = shards.iter().skip(1).cloned().collect();

        for _ in 0..3 {
            assert_eq!(decoder.decode(&survivors).unwrap(), data);
        }
        assert_eq!(decoder.cached_inverses(), 1);
    }

    #[test]
    fn test_insufficient_shards() {
        let (shards, _) = encode_sample(4, 2, 32, 100);
        let decoder = decoder_for(&shards);
        let err = decoder.decode(&shards[..3]).unwrap_err();
        assert!(matches!(
            err,
            ErasureError::InsufficientShards {
                available: 3,
                required: 4
            }
        ));
    }

    #[test]
    fn test_duplicate_shards_are_redundant() {
        let (shards, _) = encode_sample(4, 2, 32, 100);
        let decoder = decoder_for(&shards);
        // three distinct shards plus a duplicate are still insufficient
        let mut subset: Vec<Shard> = shards[..3].to_vec();
        subset.push(shards[0].clone());
        assert!(matches!(
            decoder.decode(&subset),
            Err(ErasureError::InsufficientShards { available: 3, .. })
        ));
    }

    #[test]
    fn test_mixed_operations_rejected() {
        let (mut shards, _) = encode_sample(4, 2, 32, 100);
        let (other, _) = encode_sample(4, 2, 32, 101);
        shards[5] = other[5].clone();
        let decoder = decoder_for(&shards);
        assert!(matches!(
            decoder.decode(&shards),
            Err(ErasureError::IncompatibleShards(_))
        ));
    }

    #[test]
    fn test_corrupted_parity_detected() {
        let (mut shards, _) = encode_sample(4, 2, 32, 100);
        let decoder = decoder_for(&shards);
        shards[4].data[7] ^= 0x01;
        assert!(matches!(
            decoder.decode(&shards),
            Err(ErasureError::CorruptedShards)
        ));
    }

    #[test]
    fn test_corrupted_data_detected_by_checksum() {
        let (mut shards, _) = encode_sample(4, 2, 32, 100);
        let decoder = decoder_for(&shards);
        shards[1].data[0] ^= 0x80;
        // decode from data shards only; the checksum still catches it
        assert!(matches!(
            decoder.decode(&shards[..4]),
            Err(ErasureError::CorruptedShards)
        ));
    }

    #[test]
    fn test_reconstruct_shards_repairs_full_set() {
        let (shards, _) = encode_sample(4, 3, 32, 120);
        let decoder = decoder_for(&shards);

        // lose one data shard and one parity shard
        let survivors: Vec<Shard> = shards
            .iter()
            .filter(|s| s.index != 1 && s.index != 5)
            .cloned()
            .collect();
        let rebuilt = decoder.reconstruct_shards(&survivors).unwrap();
        assert_eq!(rebuilt.len(), 7);
        for (i, shard) in rebuilt.iter().enumerate() {
            assert_eq!(shard.index, i);
            assert_eq!(shard.data, shards[i].data);
        }
        // the repaired set verifies as a whole
        assert!(decoder.verify(&rebuilt).unwrap());
    }

    #[test]
    fn test_verify() {
        let (mut shards, _) = encode_sample(4, 2, 32, 100);
        let decoder = decoder_for(&shards);
        assert!(decoder.verify(&shards).unwrap());
        assert!(!decoder.verify(&shards[..5]).unwrap());
        shards[5].data[3] ^= 0xFF;
        assert!(!decoder.verify(&shards).unwrap());
    }

    #[test]
    fn test_wrong_length_shard_rejected() {
        let (mut shards, _) = encode_sample(4, 2, 32, 100);
        let decoder = decoder_for(&shards);
        shards[0].data.pop();
        assert!(matches!(
            decoder.decode(&shards),
            Err(ErasureError::InvalidInput(_))
        ));
    }
}
