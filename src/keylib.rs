//! Library Façade
//!
//! Key lifecycle and signature assembly around one MTL context: key
//! generation against the underlying scheme, persisted key blobs,
//! condensed and full signatures, and the two verification entry points.

use crate::codec;
use crate::error::{MtlError, MtlResult};
use crate::mtl::{rung, MtlContext};
use crate::node_set::{Seed, SeriesId};
use crate::registry::{algorithm_props, AlgorithmProps};
use crate::signer::{self, LadderSigner};
use crate::spx::{SphincsHooks, SphincsParams};

/// Key blob flag: message hashing draws fresh randomizers
const RANDOMIZER_FLAG: u16 = 0x01;

/// Smallest byte count the trailing part of a full signature must have to
/// plausibly hold a signed ladder
const MIN_SIGNED_LADDER_LEN: usize = 100;

/// Value cursor returned by append operations.
///
/// Handles carry the series id by value; a handle minted before the key was
/// loaded (or for an earlier series) holds a zero sid and is rebound to the
/// current series before use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handle {
    /// Series id the leaf was appended under
    pub sid: Vec<u8>,
    /// Index of the appended leaf
    pub leaf_index: u32,
}

impl Handle {
    /// Handle for a known leaf index with no series binding yet
    pub fn unbound(leaf_index: u32) -> Self {
        Self {
            sid: Vec::new(),
            leaf_index,
        }
    }

    fn is_unbound(&self) -> bool {
        self.sid.iter().all(|&b| b == 0)
    }
}

/// One MTL signing (or verification) key: algorithm descriptor, underlying
/// scheme instance, and the node set context
pub struct MtlKey {
    props: &'static AlgorithmProps,
    signer: Box<dyn LadderSigner>,
    mtl: MtlContext,
}

fn build_context(
    props: &'static AlgorithmProps,
    signer: &dyn LadderSigner,
    ctx_str: Option<&str>,
    sid: SeriesId,
) -> MtlResult<MtlContext> {
    let n = props.sec_param;
    let pk = signer.public_key();
    if pk.len() < 2 * n {
        return Err(MtlError::BadValue(format!(
            "public key of {} bytes cannot carry seed and root",
            pk.len()
        )));
    }
    let sk = signer.secret_key();
    let prf = if sk.len() >= 2 * n {
        Some(sk[n..2 * n].to_vec())
    } else {
        None
    };

    let hooks = SphincsHooks::new(
        SphincsParams {
            pk_seed: pk[..n].to_vec(),
            pk_root: pk[n..2 * n].to_vec(),
            prf,
            robust: props.robust,
        },
        props.hash,
    )?;
    let seed = Seed::new(&pk[..n])?;
    MtlContext::new(seed, sid, ctx_str, props.randomize, Box::new(hooks))
}

impl MtlKey {
    /// Generate a fresh key for the named algorithm, sampling a new series id
    pub fn generate(algorithm: &str, ctx_str: Option<&str>) -> MtlResult<Self> {
        let props = algorithm_props(algorithm)?;
        let signer = signer::generate(props)?;
        let sid = SeriesId::random(props.sid_len)?;
        let mtl = build_context(props, signer.as_ref(), ctx_str, sid)?;
        Ok(Self { props, signer, mtl })
    }

    /// Build a verification-only key from an existing public key and series id
    pub fn from_public_key(
        algorithm: &str,
        ctx_str: Option<&str>,
        public_key: &[u8],
        sid: &[u8],
    ) -> MtlResult<Self> {
        let props = algorithm_props(algorithm)?;
        let signer = signer::from_keys(props, None, public_key)?;
        let sid = SeriesId::new(sid)?;
        let mtl = build_context(props, signer.as_ref(), ctx_str, sid)?;
        Ok(Self { props, signer, mtl })
    }

    /// Algorithm descriptor this key was created under
    pub fn algorithm(&self) -> &'static AlgorithmProps {
        self.props
    }

    /// Serialized public key of the underlying scheme
    pub fn public_key_bytes(&self) -> &[u8] {
        self.signer.public_key()
    }

    /// Series id of the node series
    pub fn sid(&self) -> &SeriesId {
        self.mtl.sid()
    }

    /// Number of messages appended so far
    pub fn leaf_count(&self) -> u32 {
        self.mtl.leaf_count()
    }

    /// Borrow the MTL context
    pub fn context(&self) -> &MtlContext {
        &self.mtl
    }

    /// Serialize the key state: algorithm, key material, context string,
    /// series id, and every leaf hash (plus randomizers in randomized mode).
    /// Interior tree pages are recomputed on load, never persisted.
    pub fn to_bytes(&self) -> MtlResult<Vec<u8>> {
        let hash_size = self.mtl.hash_size();
        let leaf_count = self.mtl.leaf_count();

        let mut buffer = Vec::new();
        codec::write_field(&mut buffer, self.props.name.as_bytes(), 1, 1024)?;
        codec::write_field(&mut buffer, self.signer.secret_key(), 0, 256)?;
        codec::write_field(&mut buffer, self.signer.public_key(), 1, 128)?;

        let mut flags = 0u16;
        if self.props.randomize {
            flags |= RANDOMIZER_FLAG;
        }
        codec::write_u16(&mut buffer, flags);

        let ctx_str = self.mtl.ctx_str().unwrap_or("");
        codec::write_field(&mut buffer, ctx_str.as_bytes(), 0, 256)?;
        codec::write_field(&mut buffer, self.mtl.sid().as_bytes(), 0, 64)?;

        codec::write_u32(&mut buffer, leaf_count);
        codec::write_u16(&mut buffer, hash_size as u16);

        for leaf in 0..leaf_count {
            buffer.extend_from_slice(&self.mtl.nodes().fetch(leaf, leaf)?);
        }
        if self.props.randomize {
            for leaf in 0..leaf_count {
                buffer.extend_from_slice(&self.mtl.nodes().randomizer(leaf)?);
            }
        }
        Ok(buffer)
    }

    /// Reload a key from its serialized state.
    ///
    /// Leaf hashes are re-inserted in ascending order with the interior
    /// nodes recomputed after each, then the randomizers are restored.
    pub fn from_bytes(buffer: &[u8]) -> MtlResult<Self> {
        if buffer.is_empty() {
            return Err(MtlError::NullInput("empty key buffer".into()));
        }
        let mut offset = 0usize;

        let algo_name = codec::read_field(buffer, &mut offset, 1, 1024)?;
        let algo_name = String::from_utf8(algo_name)
            .map_err(|_| MtlError::BadValue("algorithm name is not valid UTF-8".into()))?;
        let props = algorithm_props(&algo_name)?;

        let secret = codec::read_field(buffer, &mut offset, 0, 256)?;
        let public = codec::read_field(buffer, &mut offset, 1, 128)?;

        let flags = codec::read_u16(buffer, &mut offset)?;
        let randomized = flags & RANDOMIZER_FLAG != 0;
        if randomized != props.randomize {
            return Err(MtlError::BadValue(
                "randomizer flag disagrees with the algorithm descriptor".into(),
            ));
        }

        let ctx_bytes = codec::read_field(buffer, &mut offset, 0, 256)?;
        let ctx_str = if ctx_bytes.is_empty() {
            None
        } else {
            Some(String::from_utf8(ctx_bytes).map_err(|_| {
                MtlError::BadValue("context string is not valid UTF-8".into())
            })?)
        };

        let sid_bytes = codec::read_field(buffer, &mut offset, 1, 64)?;
        let sid = SeriesId::new(&sid_bytes)?;

        let leaf_count = codec::read_u32(buffer, &mut offset)?;
        let hash_size = codec::read_u16(buffer, &mut offset)? as usize;
        if hash_size != props.sec_param {
            return Err(MtlError::BadValue(format!(
                "hash size {} disagrees with the algorithm descriptor",
                hash_size
            )));
        }

        let secret = if secret.is_empty() {
            None
        } else {
            Some(secret)
        };
        let signer = signer::from_keys(props, secret.as_deref(), &public)?;
        let mut mtl = build_context(props, signer.as_ref(), ctx_str.as_deref(), sid)?;

        for leaf in 0..leaf_count {
            let hash = codec::read_exact(buffer, &mut offset, hash_size)?;
            mtl.nodes_mut().insert(leaf, leaf, hash)?;
            mtl.update_parents(leaf)?;
        }
        if randomized {
            for leaf in 0..leaf_count {
                let value = codec::read_exact(buffer, &mut offset, hash_size)?;
                mtl.nodes_mut().insert_randomizer(leaf, value)?;
            }
        }

        Ok(Self { props, signer, mtl })
    }

    /// Append a message to the node series, returning the handle for its leaf
    pub fn sign_append(&mut self, msg: &[u8]) -> MtlResult<Handle> {
        if !self.signer.can_sign() {
            return Err(MtlError::SignFail(
                "key holds no secret material".into(),
            ));
        }
        let leaf_index = self.mtl.hash_and_append(msg)?;
        Ok(Handle {
            sid: self.mtl.sid().as_bytes().to_vec(),
            leaf_index,
        })
    }

    /// Rebind a handle whose series id is zero or stale to the current series
    pub fn rebind_handle(&self, handle: &mut Handle) {
        if handle.sid.len() != self.mtl.sid().len() || handle.is_unbound() {
            handle.sid = self.mtl.sid().as_bytes().to_vec();
        }
    }

    fn check_handle(&self, handle: &Handle) -> MtlResult<()> {
        if handle.sid != self.mtl.sid().as_bytes() {
            return Err(MtlError::BadParam(
                "handle does not belong to this node series".into(),
            ));
        }
        if handle.leaf_index >= self.mtl.leaf_count() {
            return Err(MtlError::BadParam(format!(
                "handle leaf {} is outside the node series",
                handle.leaf_index
            )));
        }
        Ok(())
    }

    /// Condensed signature for a handle: randomizer and authentication path
    pub fn condensed_signature(&self, handle: &Handle) -> MtlResult<Vec<u8>> {
        self.check_handle(handle)?;
        let (randomizer, auth) = self.mtl.randomizer_and_authpath(handle.leaf_index)?;
        codec::auth_path_to_bytes(&randomizer, &auth, self.mtl.hash_size())
    }

    /// Current ladder, serialized and signed by the underlying scheme:
    /// `ladder_bytes || u32(sig_len) || sig_bytes`
    pub fn signed_ladder(&self) -> MtlResult<Vec<u8>> {
        let ladder = self.mtl.ladder()?;
        let ladder_bytes = codec::ladder_to_bytes(&ladder, self.mtl.hash_size())?;
        let signed_input = self
            .mtl
            .scheme_separated_input(&ladder_bytes, &self.props.oid);
        let sig = self.signer.sign(&signed_input)?;

        let mut buffer = Vec::with_capacity(ladder_bytes.len() + 4 + sig.len());
        buffer.extend_from_slice(&ladder_bytes);
        codec::write_u32(&mut buffer, sig.len() as u32);
        buffer.extend_from_slice(&sig);
        Ok(buffer)
    }

    /// Full signature: condensed signature followed by a fresh signed ladder
    pub fn full_signature(&self, handle: &Handle) -> MtlResult<Vec<u8>> {
        let mut buffer = self.condensed_signature(handle)?;
        buffer.extend_from_slice(&self.signed_ladder()?);
        Ok(buffer)
    }

    /// Verify a condensed or full signature over `msg`.
    ///
    /// When `ladder` carries a pre-verified ladder it is used exclusively;
    /// otherwise the trailing bytes of `sig` must hold a signed ladder.
    /// Returns the byte length of the condensed part on success.
    pub fn verify(&self, msg: &[u8], sig: &[u8], ladder: Option<&[u8]>) -> MtlResult<usize> {
        if msg.is_empty() || sig.is_empty() {
            return Err(MtlError::NullInput("empty message or signature".into()));
        }
        let hash_size = self.mtl.hash_size();
        let (randomizer, auth, condensed_len) =
            codec::auth_path_from_bytes(sig, hash_size, self.props.sid_len)?;

        if let Some(ladder_buf) = ladder {
            // Pre-verified ladder: the only success path for this call
            let (ladder, _) =
                codec::ladder_from_bytes(ladder_buf, hash_size, self.props.sid_len)
                    .map_err(|_| {
                        MtlError::Indeterminate("supplied ladder is truncated".into())
                    })?;
            let assoc = rung(&auth, &ladder)?;
            self.mtl
                .hash_and_verify(msg, &randomizer, &auth, assoc)?;
            return Ok(condensed_len);
        }

        if condensed_len >= sig.len() {
            // Nothing after the condensed signature to anchor it to
            return Err(MtlError::NoLadder);
        }

        let trailing = &sig[condensed_len..];
        if trailing.len() <= MIN_SIGNED_LADDER_LEN {
            return Err(MtlError::Indeterminate(
                "trailing bytes are too short to hold a signed ladder".into(),
            ));
        }
        self.verify_signed_ladder(trailing)?;
        let (ladder, _) = codec::ladder_from_bytes(trailing, hash_size, self.props.sid_len)
            .map_err(|_| MtlError::Indeterminate("signed ladder is truncated".into()))?;
        let assoc = rung(&auth, &ladder)?;
        self.mtl
            .hash_and_verify(msg, &randomizer, &auth, assoc)?;
        Ok(condensed_len)
    }

    /// Verify a signed ladder against the underlying scheme.
    ///
    /// The verifier recomputes the scheme separator over the decoded ladder
    /// bytes; success means the underlying verification succeeded.
    pub fn verify_signed_ladder(&self, buffer: &[u8]) -> MtlResult<()> {
        if buffer.is_empty() {
            return Err(MtlError::NullInput("empty ladder buffer".into()));
        }
        let hash_size = self.mtl.hash_size();
        let (_, ladder_len) =
            codec::ladder_from_bytes(buffer, hash_size, self.props.sid_len)
                .map_err(|_| MtlError::Indeterminate("ladder is truncated".into()))?;

        let mut offset = ladder_len;
        let sig_len = codec::read_u32(buffer, &mut offset)
            .map_err(|_| MtlError::Indeterminate("ladder signature length is missing".into()))?
            as usize;
        let sig = codec::read_exact(buffer, &mut offset, sig_len)
            .map_err(|_| MtlError::Indeterminate("ladder signature is truncated".into()))?;

        let signed_input = self
            .mtl
            .scheme_separated_input(&buffer[..ladder_len], &self.props.oid);
        self.signer.verify(&signed_input, sig)
    }
}
