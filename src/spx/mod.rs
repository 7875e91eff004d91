//! SPHINCS+ / SLH-DSA Scheme Hooks
//!
//! Binds the MTL engine's three hash operations to the SPHINCS+ hash
//! families. Two branches exist: SHA-2 (compressed addresses, HMAC PRF,
//! MGF1 message expansion) and SHAKE-256 (full addresses, XOF everywhere).
//! Robust and simple leaf/node variants are both kept; SLH-DSA always binds
//! the simple one.

pub mod address;
pub mod funcs;

use crate::error::{MtlError, MtlResult};
use crate::mtl::{MessageHash, MsgRandomizer, SchemeHooks};
use crate::node_set::SeriesId;

use address::{
    adrs_compressed, adrs_full, ADRS_COMPRESSED_LEN, ADRS_TYPE_DATA, ADRS_TYPE_MSG,
    ADRS_TYPE_TREE,
};
use funcs::{
    hmac_sha256, hmac_sha512, mgf1_sha256, mgf1_sha512, sha256, sha512, shake256, spx_sha2,
    spx_shake,
};

/// Hash family driving one scheme binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpxHash {
    Sha2,
    Shake,
}

/// SPHINCS+ key material used by the MTL hash operations
#[derive(Clone)]
pub struct SphincsParams {
    /// Public key seed (first n bytes of the public key)
    pub pk_seed: Vec<u8>,
    /// Public key root (second n bytes of the public key)
    pub pk_root: Vec<u8>,
    /// Secret PRF key; absent on verification-only contexts
    pub prf: Option<Vec<u8>>,
    /// Robust leaf/node hashing (legacy SPHINCS+; SLH-DSA uses simple)
    pub robust: bool,
}

/// Scheme hook set for the SPHINCS+ family
pub struct SphincsHooks {
    params: SphincsParams,
    branch: SpxHash,
}

impl SphincsHooks {
    pub fn new(params: SphincsParams, branch: SpxHash) -> MtlResult<Self> {
        if params.pk_seed.is_empty() || params.pk_seed.len() != params.pk_root.len() {
            return Err(MtlError::BadParam(
                "public seed and root must carry the security parameter length".into(),
            ));
        }
        if let Some(prf) = &params.prf {
            if prf.len() != params.pk_seed.len() {
                return Err(MtlError::BadParam(
                    "PRF key must carry the security parameter length".into(),
                ));
            }
        }
        Ok(Self { params, branch })
    }

    fn n(&self) -> usize {
        self.params.pk_seed.len()
    }

    /// `PRF_msg(SK.prf, OptRand, M)`: HMAC-SHA-X on the SHA-2 branch,
    /// SHAKE256 on the SHAKE branch, truncated to n
    fn prf_msg(&self, prf: &[u8], optrand: &[u8], data: &[u8]) -> MtlResult<Vec<u8>> {
        let n = self.n();
        match self.branch {
            SpxHash::Sha2 => {
                let mut buffer = Vec::with_capacity(optrand.len() + data.len());
                buffer.extend_from_slice(optrand);
                buffer.extend_from_slice(data);
                let mut rmtl = if n <= 16 {
                    hmac_sha256(prf, &buffer)?.to_vec()
                } else {
                    hmac_sha512(prf, &buffer)?.to_vec()
                };
                rmtl.truncate(n);
                Ok(rmtl)
            }
            SpxHash::Shake => {
                let mut buffer = Vec::with_capacity(prf.len() + optrand.len() + data.len());
                buffer.extend_from_slice(prf);
                buffer.extend_from_slice(optrand);
                buffer.extend_from_slice(data);
                Ok(shake256(&buffer, n))
            }
        }
    }

    /// `H_msg_mtl(R, PK.seed, PK.root, M)`: SHA-X then MGF1 expansion on the
    /// SHA-2 branch, SHAKE256 on the SHAKE branch
    fn h_msg(&self, rmtl: &[u8], data: &[u8]) -> Vec<u8> {
        let n = self.n();
        let mut buffer = Vec::with_capacity(
            rmtl.len() + self.params.pk_seed.len() + self.params.pk_root.len() + data.len(),
        );
        buffer.extend_from_slice(rmtl);
        buffer.extend_from_slice(&self.params.pk_seed);
        buffer.extend_from_slice(&self.params.pk_root);
        buffer.extend_from_slice(data);

        match self.branch {
            SpxHash::Sha2 => {
                let digest = if n <= 16 {
                    sha256(&buffer).to_vec()
                } else {
                    sha512(&buffer).to_vec()
                };
                let mut mgf_seed =
                    Vec::with_capacity(rmtl.len() + self.params.pk_seed.len() + digest.len());
                mgf_seed.extend_from_slice(rmtl);
                mgf_seed.extend_from_slice(&self.params.pk_seed);
                mgf_seed.extend_from_slice(&digest);
                if n <= 16 {
                    mgf1_sha256(&mgf_seed, n)
                } else {
                    mgf1_sha512(&mgf_seed, n)
                }
            }
            SpxHash::Shake => shake256(&buffer, n),
        }
    }

    /// Robust-mode bitmask over `data_len` bytes.
    ///
    /// The mask input is a buffer of seed-length + 22 bytes holding the seed
    /// copy with the compressed address prefix written over its start,
    /// zero-filled to the end. The robust test vectors are computed over
    /// exactly this layout.
    fn robust_mask(&self, adrs: &[u8], data_len: usize) -> Vec<u8> {
        let seed = &self.params.pk_seed;
        let mut mask_input = vec![0u8; seed.len() + ADRS_COMPRESSED_LEN];
        mask_input[..seed.len()].copy_from_slice(seed);
        mask_input[..ADRS_COMPRESSED_LEN].copy_from_slice(&adrs[..ADRS_COMPRESSED_LEN]);

        match self.branch {
            SpxHash::Sha2 => {
                if self.n() <= 16 {
                    mgf1_sha256(&mask_input, data_len)
                } else {
                    mgf1_sha512(&mask_input, data_len)
                }
            }
            SpxHash::Shake => shake256(&mask_input, data_len),
        }
    }

    fn mask_if_robust(&self, adrs: &[u8], data: &[u8]) -> Vec<u8> {
        if !self.params.robust {
            return data.to_vec();
        }
        let mask = self.robust_mask(adrs, data.len());
        data.iter().zip(mask.iter()).map(|(d, m)| d ^ m).collect()
    }

    /// `F`/`H`: the branch tree hash over an already-masked data buffer
    fn tree_hash(&self, adrs: &[u8], data: &[u8]) -> Vec<u8> {
        match self.branch {
            SpxHash::Sha2 => spx_sha2(&self.params.pk_seed, adrs, data, self.n()),
            SpxHash::Shake => spx_shake(&self.params.pk_seed, adrs, data, self.n()),
        }
    }
}

impl SchemeHooks for SphincsHooks {
    fn hash_size(&self) -> usize {
        self.n()
    }

    fn hash_message(
        &self,
        sid: &SeriesId,
        node_id: u32,
        randomizer: MsgRandomizer<'_>,
        msg: &[u8],
        _ctx_str: Option<&str>,
    ) -> MtlResult<MessageHash> {
        // The context string binds at the ladder separation layer, not here.
        if msg.is_empty() {
            return Err(MtlError::NullInput("empty message".into()));
        }

        // Both branches prepend the full message address to the message
        let adrs = adrs_full(ADRS_TYPE_MSG, sid, 0, node_id);
        let mut adrs_msg = Vec::with_capacity(adrs.len() + msg.len());
        adrs_msg.extend_from_slice(&adrs);
        adrs_msg.extend_from_slice(msg);

        let rmtl = match randomizer {
            MsgRandomizer::Fresh(optrand) => {
                let prf = self.params.prf.as_ref().ok_or_else(|| {
                    MtlError::SignFail(
                        "message randomization requires the secret PRF key".into(),
                    )
                })?;
                self.prf_msg(prf, optrand, &adrs_msg)?
            }
            MsgRandomizer::Canonical(value) => {
                if value.len() != self.n() {
                    return Err(MtlError::BadParam(format!(
                        "randomizer length {} does not match the security parameter {}",
                        value.len(),
                        self.n()
                    )));
                }
                value.to_vec()
            }
        };

        let data_value = self.h_msg(&rmtl, &adrs_msg);
        Ok(MessageHash { data_value, rmtl })
    }

    fn hash_leaf(&self, sid: &SeriesId, node_id: u32, msg: &[u8]) -> MtlResult<Vec<u8>> {
        if msg.is_empty() {
            return Err(MtlError::NullInput("empty data value".into()));
        }
        let adrs: Vec<u8> = match self.branch {
            SpxHash::Sha2 => adrs_compressed(ADRS_TYPE_DATA, sid, node_id, node_id).to_vec(),
            SpxHash::Shake => adrs_full(ADRS_TYPE_DATA, sid, node_id, node_id).to_vec(),
        };
        let data = self.mask_if_robust(&adrs, msg);
        Ok(self.tree_hash(&adrs, &data))
    }

    fn hash_node(
        &self,
        sid: &SeriesId,
        left: u32,
        right: u32,
        left_hash: &[u8],
        right_hash: &[u8],
    ) -> MtlResult<Vec<u8>> {
        if left_hash.len() != self.n() || right_hash.len() != self.n() {
            return Err(MtlError::BadParam(
                "child hash length does not match the security parameter".into(),
            ));
        }
        let adrs: Vec<u8> = match self.branch {
            SpxHash::Sha2 => adrs_compressed(ADRS_TYPE_TREE, sid, left, right).to_vec(),
            SpxHash::Shake => adrs_full(ADRS_TYPE_TREE, sid, left, right).to_vec(),
        };
        let mut children = Vec::with_capacity(left_hash.len() + right_hash.len());
        children.extend_from_slice(left_hash);
        children.extend_from_slice(right_hash);
        let data = self.mask_if_robust(&adrs, &children);
        Ok(self.tree_hash(&adrs, &data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: [u8; 32] = [
        0x66, 0x87, 0x0c, 0x58, 0x1e, 0x05, 0x1e, 0x75, 0x06, 0xb5, 0x59, 0x89, 0x75, 0x08,
        0xe7, 0x2c, 0x03, 0x69, 0x6e, 0x98, 0x22, 0x87, 0x08, 0xe2, 0xf1, 0x85, 0xb2, 0xe5,
        0x60, 0xbf, 0xaa, 0x46,
    ];
    const PUBKEY: [u8; 32] = [
        0xb3, 0x07, 0xb6, 0xed, 0x82, 0x4e, 0x9f, 0x39, 0xbe, 0x88, 0x2d, 0xff, 0xf6, 0xda,
        0x04, 0x71, 0x20, 0x39, 0xdf, 0xd9, 0x42, 0x45, 0xda, 0x64, 0x3e, 0xd3, 0x84, 0xe7,
        0x7b, 0xc6, 0x5e, 0x83,
    ];
    const PRF: [u8; 32] = [
        0x3b, 0x70, 0x6b, 0xde, 0x28, 0xe4, 0xf9, 0x93, 0xbe, 0x88, 0x2d, 0xff, 0xf6, 0xda,
        0x04, 0x71, 0x20, 0x39, 0xdf, 0xd9, 0x42, 0x45, 0xda, 0x64, 0x3e, 0xd3, 0x84, 0xe7,
        0x7b, 0xc6, 0x5e, 0x83,
    ];
    const SID: [u8; 8] = [0x28, 0xe7, 0x56, 0xf0, 0xb4, 0x61, 0xf6, 0x79];
    const MSG: [u8; 32] = [
        0x8a, 0x44, 0x26, 0x42, 0xad, 0x4a, 0x96, 0x1f, 0xb4, 0x47, 0x52, 0x3b, 0x26, 0x42,
        0xe7, 0x9b, 0x65, 0xf4, 0x46, 0x49, 0xf1, 0xbd, 0x62, 0xa6, 0xc4, 0x19, 0xd8, 0x82,
        0xdf, 0x2d, 0x9a, 0xd0,
    ];
    const HASH_LEFT: [u8; 32] = MSG;
    const HASH_RIGHT: [u8; 32] = [
        0xe7, 0xf1, 0x10, 0x39, 0xf3, 0xa9, 0x2a, 0xdf, 0xcc, 0xbc, 0x6c, 0x9f, 0x54, 0x60,
        0xef, 0xdd, 0x97, 0x95, 0xc9, 0x0d, 0x00, 0x75, 0x1c, 0xc1, 0x61, 0x6f, 0x0c, 0x2f,
        0xf6, 0x9d, 0x3d, 0x77,
    ];

    fn hooks(branch: SpxHash, robust: bool) -> SphincsHooks {
        SphincsHooks::new(
            SphincsParams {
                pk_seed: SEED.to_vec(),
                pk_root: PUBKEY.to_vec(),
                prf: Some(PRF.to_vec()),
                robust,
            },
            branch,
        )
        .unwrap()
    }

    fn sid() -> SeriesId {
        SeriesId::new(&SID).unwrap()
    }

    #[test]
    fn shake_leaf_hash_matches_reference() {
        let hash = hooks(SpxHash::Shake, false)
            .hash_leaf(&sid(), 11, &MSG)
            .unwrap();
        let expected =
            hex::decode("63e0e50df3c44ae17873d42e21c9c53c13ecb71a5ad572a9839086c3e4886838")
                .unwrap();
        assert_eq!(hash, expected);
    }

    #[test]
    fn robust_shake_leaf_hash_matches_reference() {
        let hash = hooks(SpxHash::Shake, true)
            .hash_leaf(&sid(), 11, &MSG)
            .unwrap();
        let expected =
            hex::decode("022a3662d71bbecc74f929762d975f0ee35b5a5fd80e85e0605ac920e34125ee")
                .unwrap();
        assert_eq!(hash, expected);
    }

    #[test]
    fn shake_internal_hash_matches_reference() {
        let hash = hooks(SpxHash::Shake, false)
            .hash_node(&sid(), 8, 9, &HASH_LEFT, &HASH_RIGHT)
            .unwrap();
        let expected =
            hex::decode("fb7240db2b7b040ca1b2553fdbffe5595480284960b8e44d3265bc5e29296473")
                .unwrap();
        assert_eq!(hash, expected);
    }

    #[test]
    fn leaf_hash_depends_on_every_input() {
        let hooks = hooks(SpxHash::Shake, false);
        let base = hooks.hash_leaf(&sid(), 11, &MSG).unwrap();

        let mut other_msg = MSG;
        other_msg[14] = 0x7e;
        assert_ne!(hooks.hash_leaf(&sid(), 11, &other_msg).unwrap(), base);
        assert_ne!(hooks.hash_leaf(&sid(), 0, &MSG).unwrap(), base);

        let other_sid = SeriesId::new(&[0xff; 8]).unwrap();
        assert_ne!(hooks.hash_leaf(&other_sid, 11, &MSG).unwrap(), base);
    }

    #[test]
    fn sha2_branch_outputs_carry_the_security_parameter() {
        for robust in [false, true] {
            let hooks = hooks(SpxHash::Sha2, robust);
            let leaf = hooks.hash_leaf(&sid(), 3, &MSG).unwrap();
            assert_eq!(leaf.len(), 32);
            let node = hooks
                .hash_node(&sid(), 8, 9, &HASH_LEFT, &HASH_RIGHT)
                .unwrap();
            assert_eq!(node.len(), 32);
        }
    }

    #[test]
    fn fresh_then_canonical_round_trip() {
        // The data value derived at signing time must be reproducible from
        // the canonical randomizer alone, with no PRF key available.
        for branch in [SpxHash::Sha2, SpxHash::Shake] {
            let signer = hooks(branch, false);
            let optrand = [0x5au8; 32];
            let signed = signer
                .hash_message(&sid(), 7, MsgRandomizer::Fresh(&optrand), b"message", None)
                .unwrap();
            assert_eq!(signed.rmtl.len(), 32);

            let verifier = SphincsHooks::new(
                SphincsParams {
                    pk_seed: SEED.to_vec(),
                    pk_root: PUBKEY.to_vec(),
                    prf: None,
                    robust: false,
                },
                branch,
            )
            .unwrap();
            let reverified = verifier
                .hash_message(
                    &sid(),
                    7,
                    MsgRandomizer::Canonical(&signed.rmtl),
                    b"message",
                    None,
                )
                .unwrap();
            assert_eq!(reverified.data_value, signed.data_value);
            assert_eq!(reverified.rmtl, signed.rmtl);
        }
    }

    #[test]
    fn fresh_hashing_without_prf_key_fails() {
        let verifier = SphincsHooks::new(
            SphincsParams {
                pk_seed: SEED.to_vec(),
                pk_root: PUBKEY.to_vec(),
                prf: None,
                robust: false,
            },
            SpxHash::Shake,
        )
        .unwrap();
        let result = verifier.hash_message(
            &sid(),
            0,
            MsgRandomizer::Fresh(&[0u8; 32]),
            b"message",
            None,
        );
        assert!(matches!(result, Err(MtlError::SignFail(_))));
    }

    #[test]
    fn message_hash_is_randomizer_sensitive() {
        let hooks = hooks(SpxHash::Shake, false);
        let a = hooks
            .hash_message(&sid(), 0, MsgRandomizer::Canonical(&[0x01; 32]), b"m", None)
            .unwrap();
        let b = hooks
            .hash_message(&sid(), 0, MsgRandomizer::Canonical(&[0x02; 32]), b"m", None)
            .unwrap();
        assert_ne!(a.data_value, b.data_value);
    }
}
