//! Mock Scheme Hooks
//!
//! Deterministic SHA-256 stand-ins for the scheme hashing operations so the
//! core algorithms can be exercised with reproducible values. Node indices
//! are folded in little-endian order; the ladder test vectors depend on it.

use sha2::{Digest, Sha256};

use crate::error::MtlResult;
use crate::mtl::{MessageHash, MsgRandomizer, SchemeHooks};
use crate::node_set::SeriesId;

/// Mock hook set hashing everything with plain SHA-256
pub struct MockHooks {
    hash_size: usize,
}

impl MockHooks {
    pub fn new(hash_size: usize) -> Self {
        Self { hash_size }
    }
}

impl SchemeHooks for MockHooks {
    fn hash_size(&self) -> usize {
        self.hash_size
    }

    fn hash_message(
        &self,
        _sid: &SeriesId,
        _node_id: u32,
        randomizer: MsgRandomizer<'_>,
        msg: &[u8],
        _ctx_str: Option<&str>,
    ) -> MtlResult<MessageHash> {
        let rand_bytes = match randomizer {
            MsgRandomizer::Fresh(bytes) | MsgRandomizer::Canonical(bytes) => bytes,
        };
        let mut hasher = Sha256::new();
        hasher.update(rand_bytes);
        hasher.update(msg);
        Ok(MessageHash {
            data_value: hasher.finalize().to_vec(),
            rmtl: rand_bytes.to_vec(),
        })
    }

    fn hash_leaf(&self, _sid: &SeriesId, node_id: u32, msg: &[u8]) -> MtlResult<Vec<u8>> {
        let mut hasher = Sha256::new();
        hasher.update(node_id.to_le_bytes());
        hasher.update(msg);
        Ok(hasher.finalize().to_vec())
    }

    fn hash_node(
        &self,
        _sid: &SeriesId,
        left: u32,
        right: u32,
        left_hash: &[u8],
        right_hash: &[u8],
    ) -> MtlResult<Vec<u8>> {
        let mut hasher = Sha256::new();
        hasher.update(left.to_le_bytes());
        hasher.update(right.to_le_bytes());
        hasher.update(left_hash);
        hasher.update(right_hash);
        Ok(hasher.finalize().to_vec())
    }
}
