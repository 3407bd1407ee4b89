//! Batch decoding and deterministic sharding.

use serde_json::Value;
use sha2::{Digest, Sha256};
use venuescope_core::RawPost;

use crate::error::PipelineError;

/// One element of an input batch.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEntry {
    Post(RawPost),
    /// An element that did not decode as a post. Counted invalid, never
    /// analyzed.
    Malformed { index: usize, reason: String },
}

impl BatchEntry {
    /// Post id, if this entry decoded.
    #[must_use]
    pub fn post_id(&self) -> Option<&str> {
        match self {
            BatchEntry::Post(p) => Some(&p.id),
            BatchEntry::Malformed { .. } => None,
        }
    }
}

impl From<RawPost> for BatchEntry {
    fn from(post: RawPost) -> Self {
        BatchEntry::Post(post)
    }
}

/// Decode a JSON array of posts.
///
/// Elements that fail to decode become [`BatchEntry::Malformed`] in place.
///
/// # Errors
///
/// Returns [`PipelineError::Batch`] if `json` is not valid JSON or its top
/// level is not an array.
pub fn decode_batch(json: &str) -> Result<Vec<BatchEntry>, PipelineError> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| PipelineError::Batch(e.to_string()))?;
    let Value::Array(items) = value else {
        return Err(PipelineError::Batch(
            "expected a JSON array of posts".to_string(),
        ));
    };

    Ok(items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match serde_json::from_value::<RawPost>(item) {
            Ok(post) => BatchEntry::Post(post),
            Err(e) => {
                tracing::debug!(index, error = %e, "batch element did not decode");
                BatchEntry::Malformed {
                    index,
                    reason: e.to_string(),
                }
            }
        })
        .collect())
}

/// Shard index for `key`: the first eight bytes of its SHA-256 digest,
/// big-endian, modulo `shards`.
#[must_use]
pub fn shard_of(key: &str, shards: usize) -> usize {
    let shards = shards.max(1);
    let digest = Sha256::digest(key.as_bytes());
    let mut prefix = [0_u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    let n = u64::from_be_bytes(prefix);
    // usize is at most 64 bits, so the remainder fits.
    usize::try_from(n % shards as u64).unwrap_or(0)
}

/// Partition `entries` into `shards` groups (at least one).
///
/// Posts are placed by their id, so every copy of a post id lands in the same
/// shard and duplicate detection inside a shard stays exact. Malformed
/// entries are placed by their batch index. Relative order within a shard is
/// the input order.
///
/// Comment ids are not considered: a comment id repeated under two posts in
/// different shards is counted once per shard.
#[must_use]
pub fn shard_entries(entries: Vec<BatchEntry>, shards: usize) -> Vec<Vec<BatchEntry>> {
    let shards = shards.max(1);
    let mut out: Vec<Vec<BatchEntry>> = (0..shards).map(|_| Vec::new()).collect();
    for entry in entries {
        let slot = match &entry {
            BatchEntry::Post(p) => shard_of(&p.id, shards),
            BatchEntry::Malformed { index, .. } => index % shards,
        };
        out[slot].push(entry);
    }
    out
}
