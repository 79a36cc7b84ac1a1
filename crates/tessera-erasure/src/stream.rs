//! Chunked streaming encode and decode.
//!
//! The encoder pulls fixed-size chunks (`k * shard_size` bytes) from an
//! async reader and yields one shard group per chunk, tagging every shard
//! with a monotonically increasing `chunk_index`. The decoder is a push
//! state machine: it accepts shard batches in any order, decodes a chunk
//! as soon as enough shards have arrived, and emits decoded chunks in
//! ascending `chunk_index` order, buffering out-of-order completions.
//!
//! Both directions are single-producer/single-consumer; the async pumps at
//! the bottom connect them to bounded `mpsc` channels so the consumer's
//! demand is the only thing driving work.

use crate::config::EncodingConfig;
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{ErasureError, ErasureResult};
use crate::shard::{Shard, ShardMetadata};
use std::collections::BTreeMap;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;
use tracing::debug;

/// Pull-based streaming encoder over an async byte source.
///
/// Finite and not restartable: after the source reports end-of-stream the
/// encoder only ever returns `None`.
pub struct StreamEncoder<R> {
    reader: R,
    encoder: Encoder,
    next_chunk: u64,
    done: bool,
}

impl<R: AsyncRead + Unpin> StreamEncoder<R> {
    /// Create a streaming encoder.
    ///
    /// # Errors
    ///
    /// Propagates encoder-matrix construction failures.
    pub fn new(reader: R, config: EncodingConfig) -> ErasureResult<Self> {
        Ok(Self {
            reader,
            encoder: Encoder::new(config)?,
            next_chunk: 0,
            done: false,
        })
    }

    /// Number of chunks produced so far.
    #[must_use]
    pub fn chunks_produced(&self) -> u64 {
        self.next_chunk
    }

    /// Read the next chunk and encode it into its `n` shards.
    ///
    /// Returns `Ok(None)` at end-of-stream. The final chunk may be
    /// shorter than `k * shard_size`; its true length is recorded in the
    /// shard metadata.
    ///
    /// # Errors
    ///
    /// Returns [`ErasureError::Io`] if the underlying reader fails.
    pub async fn next_group(&mut self) -> ErasureResult<Option<Vec<Shard>>> {
        if self.done {
            return Ok(None);
        }

        let chunk_size = self.encoder.config().chunk_size();
        let mut buf = vec![0u8; chunk_size];
        let mut filled = 0usize;
        while filled < chunk_size {
            let n = self.reader.read(&mut buf[filled..]).await?;
            if n == 0 {
                self.done = true;
                break;
            }
            filled += n;
        }
        if filled == 0 {
            return Ok(None);
        }

        let chunk = &buf[..filled];
        let metadata =
            ShardMetadata::for_input(chunk, *self.encoder.config(), Some(self.next_chunk));
        let group = self.encoder.encode_chunk(chunk, metadata);
        self.next_chunk += 1;
        Ok(Some(group))
    }
}

/// Push-based streaming decoder with ordered emission.
#[derive(Default)]
pub struct StreamDecoder {
    decoder: Option<Decoder>,
    /// Shards buffered per chunk, below the decode threshold.
    pending: BTreeMap<u64, Vec<Shard>>,
    /// Decoded chunks waiting for their turn to be emitted.
    ready: BTreeMap<u64, Vec<u8>>,
    next_emit: u64,
    emitted: u64,
    highest_seen: Option<u64>,
}

impl StreamDecoder {
    /// Create an empty stream decoder. The configuration is taken from
    /// the first shard that arrives.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a batch of shards.
    ///
    /// Any chunk that accumulates `k` distinct shards is decoded
    /// immediately; decoded chunks are held back until all earlier chunks
    /// have been emitted. At most one chunk is emitted per call.
    ///
    /// # Errors
    ///
    /// - [`ErasureError::IncompatibleShards`] if a shard carries no
    ///   `chunk_index` or disagrees with the stream's configuration
    /// - any [`Decoder::decode`] error for a chunk that reached its
    ///   decode threshold
    pub fn accept(&mut self, batch: Vec<Shard>) -> ErasureResult<Option<Vec<u8>>> {
        for shard in batch {
            let Some(chunk_index) = shard.metadata.chunk_index else {
                return Err(ErasureError::IncompatibleShards(
                    "shard carries no chunk index",
                ));
            };
            if self.decoder.is_none() {
                self.decoder = Some(Decoder::new(shard.metadata.config)?);
            }
            self.highest_seen = Some(self.highest_seen.map_or(chunk_index, |h| h.max(chunk_index)));
            if chunk_index < self.next_emit || self.ready.contains_key(&chunk_index) {
                // chunk already decoded; surplus shard
                continue;
            }
            self.pending.entry(chunk_index).or_default().push(shard);
        }

        self.decode_saturated_chunks()?;

        if let Some(bytes) = self.ready.remove(&self.next_emit) {
            self.next_emit += 1;
            self.emitted += 1;
            return Ok(Some(bytes));
        }
        Ok(None)
    }

    /// Finish the stream, draining every remaining in-order chunk.
    ///
    /// # Errors
    ///
    /// Returns [`ErasureError::IncompleteStream`] naming every chunk that
    /// was seen (or skipped over) but could not be decoded.
    pub fn finish(mut self) -> ErasureResult<Vec<Vec<u8>>> {
        self.decode_saturated_chunks()?;

        let mut tail = Vec::new();
        while let Some(bytes) = self.ready.remove(&self.next_emit) {
            self.next_emit += 1;
            self.emitted += 1;
            tail.push(bytes);
        }

        let Some(highest) = self.highest_seen else {
            return Ok(tail);
        };
        if self.next_emit > highest {
            return Ok(tail);
        }
        let missing: Vec<u64> = (self.next_emit..=highest)
            .filter(|i| !self.ready.contains_key(i))
            .collect();
        Err(ErasureError::IncompleteStream { missing })
    }

    /// Decode every pending chunk that has reached `k` distinct shards.
    fn decode_saturated_chunks(&mut self) -> ErasureResult<()> {
        let Some(decoder) = &self.decoder else {
            return Ok(());
        };
        let required = decoder.config().data_shards();
        let saturated: Vec<u64> = self
            .pending
            .iter()
            .filter(|(_, shards)| distinct_indices(shards) >= required)
            .map(|(&idx, _)| idx)
            .collect();
        for idx in saturated {
            let shards = self.pending.remove(&idx).unwrap_or_default();
            let bytes = decoder.decode(&shards)?;
            debug!(chunk = idx, "stream chunk decoded");
            self.ready.insert(idx, bytes);
        }
        Ok(())
    }

    /// Number of chunks emitted so far.
    #[must_use]
    pub fn decoded_count(&self) -> u64 {
        self.emitted
    }

    /// The chunk index the decoder must emit next.
    #[must_use]
    pub fn next_chunk(&self) -> u64 {
        self.next_emit
    }

    /// Chunk indices currently buffered below their decode threshold.
    #[must_use]
    pub fn pending_chunks(&self) -> Vec<u64> {
        self.pending.keys().copied().collect()
    }
}

fn distinct_indices(shards: &[Shard]) -> usize {
    let mut indices: Vec<usize> = shards.iter().map(|s| s.index).collect();
    indices.sort_unstable();
    indices.dedup();
    indices.len()
}

/// Drive a [`StreamEncoder`] into a channel until end-of-stream.
///
/// Stops early (and without error) if the receiving side goes away, so a
/// cancelled consumer releases buffers promptly.
///
/// # Errors
///
/// Propagates reader and encoding failures.
pub async fn encode_stream<R: AsyncRead + Unpin>(
    reader: R,
    config: EncodingConfig,
    tx: mpsc::Sender<Vec<Shard>>,
) -> ErasureResult<()> {
    let mut encoder = StreamEncoder::new(reader, config)?;
    while let Some(group) = encoder.next_group().await? {
        if tx.send(group).await.is_err() {
            break;
        }
    }
    Ok(())
}

/// Drive a [`StreamDecoder`] from a channel of shard batches into a
/// channel of decoded chunks, in ascending `chunk_index` order.
///
/// # Errors
///
/// Propagates decode failures and reports missing chunks at end-of-stream
/// as [`ErasureError::IncompleteStream`].
pub async fn decode_stream(
    mut rx: mpsc::Receiver<Vec<Shard>>,
    tx: mpsc::Sender<Vec<u8>>,
) -> ErasureResult<()> {
    let mut decoder = StreamDecoder::new();
    while let Some(batch) = rx.recv().await {
        if let Some(bytes) = decoder.accept(batch)? {
            if tx.send(bytes).await.is_err() {
                return Ok(());
            }
        }
    }
    for bytes in decoder.finish()? {
        if tx.send(bytes).await.is_err() {
            return Ok(());
        }
    }
    Ok(())
}
