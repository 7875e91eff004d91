//! MTL Mode Core
//!
//! Implementation of the Merkle tree ladder mode algorithms from
//! draft-harvey-cfrg-mtl-mode: node set append, authentication path and
//! ladder computation, rung selection, and verification, together with the
//! hash-and-append / hash-and-verify abstractions built on top of them.
//!
//! Scheme-specific hashing is injected through the [`SchemeHooks`] trait so
//! the same engine serves every underlying signature binding.

use subtle::ConstantTimeEq;

use crate::bits::{bit_width, lsb, msb};
use crate::error::{MtlError, MtlResult};
use crate::node_set::{NodeSet, Seed, SeriesId};

/// Ladder domain separator octet prepended before underlying signing
pub const MTL_LADDER_SEP: u8 = 129;

/// Maximum context string length in bytes (its length is wired as one octet)
pub const MAX_CTX_STR_LEN: usize = 255;

/// Per-leaf randomizer value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Randomizer {
    /// Randomizer bytes, one hash length long
    pub value: Vec<u8>,
}

/// Authentication path from a leaf up to one rung of a ladder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPath {
    /// MTL bit flags
    pub flags: u16,
    /// Series id of the node set the path was drawn from
    pub sid: SeriesId,
    /// Leaf index the path authenticates
    pub leaf_index: u32,
    /// Left index of the rung the path was built against
    pub rung_left: u32,
    /// Right index of the rung the path was built against
    pub rung_right: u32,
    /// Sibling hashes, one per level from the leaf up to the rung
    pub sibling_hashes: Vec<Vec<u8>>,
}

impl AuthPath {
    /// Number of sibling hashes in the path
    pub fn sibling_hash_count(&self) -> u16 {
        self.sibling_hashes.len() as u16
    }
}

/// One perfect-subtree root of a ladder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rung {
    /// Left leaf index covered by this rung
    pub left: u32,
    /// Right leaf index covered by this rung
    pub right: u32,
    /// Root hash of the subtree
    pub hash: Vec<u8>,
}

/// Ordered set of rungs tiling the current leaf range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ladder {
    /// MTL bit flags
    pub flags: u16,
    /// Series id of the node set the ladder was drawn from
    pub sid: SeriesId,
    /// Rungs in strictly decreasing subtree-height order
    pub rungs: Vec<Rung>,
}

impl Ladder {
    /// Number of rungs in the ladder
    pub fn rung_count(&self) -> u16 {
        self.rungs.len() as u16
    }
}

/// Randomizer argument for message hashing.
///
/// The signer passes `Fresh` bytes and the hook derives the canonical
/// randomizer through the scheme PRF; the verifier passes back the
/// `Canonical` value carried in the condensed signature (it has no secret
/// PRF key to re-derive it with).
#[derive(Debug, Clone, Copy)]
pub enum MsgRandomizer<'a> {
    /// Freshly generated randomizer input; the hook derives the canonical value
    Fresh(&'a [u8]),
    /// Canonical randomizer recovered from a condensed signature
    Canonical(&'a [u8]),
}

/// Output of the message hashing hook
#[derive(Debug, Clone)]
pub struct MessageHash {
    /// Randomized data value appended to the node set
    pub data_value: Vec<u8>,
    /// Canonical randomizer to persist and carry in condensed signatures
    pub rmtl: Vec<u8>,
}

/// Scheme-specific hashing operations bound to one MTL context.
///
/// Bundles the three hash operations together with the key material they
/// need, so a context carries exactly one dispatch point.
pub trait SchemeHooks {
    /// Security parameter n: byte length of every node hash
    fn hash_size(&self) -> usize;

    /// Randomize a message into the data value for its leaf node
    fn hash_message(
        &self,
        sid: &SeriesId,
        node_id: u32,
        randomizer: MsgRandomizer<'_>,
        msg: &[u8],
        ctx_str: Option<&str>,
    ) -> MtlResult<MessageHash>;

    /// Hash a data value to produce a leaf node
    fn hash_leaf(&self, sid: &SeriesId, node_id: u32, msg: &[u8]) -> MtlResult<Vec<u8>>;

    /// Hash two child nodes to produce an internal node
    fn hash_node(
        &self,
        sid: &SeriesId,
        left: u32,
        right: u32,
        left_hash: &[u8],
        right_hash: &[u8],
    ) -> MtlResult<Vec<u8>>;
}

/// MTL node set context: one growing forest bound to one keypair
pub struct MtlContext {
    seed: Seed,
    sid: SeriesId,
    randomize: bool,
    ctx_str: Option<String>,
    hooks: Box<dyn SchemeHooks>,
    nodes: NodeSet,
}

impl MtlContext {
    /// Initialize a node set context (draft algorithm 3).
    ///
    /// The seed and series id are duplicated into the context; the context
    /// string is cloned, never aliased.
    pub fn new(
        seed: Seed,
        sid: SeriesId,
        ctx_str: Option<&str>,
        randomize: bool,
        hooks: Box<dyn SchemeHooks>,
    ) -> MtlResult<Self> {
        if let Some(ctx) = ctx_str {
            if ctx.len() > MAX_CTX_STR_LEN {
                return Err(MtlError::BadValue(format!(
                    "context string length {} exceeds {}",
                    ctx.len(),
                    MAX_CTX_STR_LEN
                )));
            }
        }
        if hooks.hash_size() != seed.len() {
            return Err(MtlError::BadParam(format!(
                "scheme hash size {} does not match seed length {}",
                hooks.hash_size(),
                seed.len()
            )));
        }
        let nodes = NodeSet::new(seed.len())?;
        Ok(Self {
            seed,
            sid,
            randomize,
            ctx_str: ctx_str.map(str::to_owned),
            hooks,
            nodes,
        })
    }

    pub fn sid(&self) -> &SeriesId {
        &self.sid
    }

    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    pub fn ctx_str(&self) -> Option<&str> {
        self.ctx_str.as_deref()
    }

    pub fn randomize(&self) -> bool {
        self.randomize
    }

    pub fn leaf_count(&self) -> u32 {
        self.nodes.leaf_count()
    }

    pub fn hash_size(&self) -> usize {
        self.nodes.hash_size()
    }

    pub(crate) fn nodes(&self) -> &NodeSet {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut NodeSet {
        &mut self.nodes
    }

    /// Produce the randomizer for the next message: fresh CSPRNG bytes in
    /// randomized mode, a copy of the public seed otherwise
    pub fn generate_randomizer(&self) -> MtlResult<Randomizer> {
        if self.randomize {
            use rand::RngCore;
            let mut value = vec![0u8; self.nodes.hash_size()];
            rand::rngs::OsRng
                .try_fill_bytes(&mut value)
                .map_err(|e| MtlError::ResourceFail(format!("unable to draw random bytes: {}", e)))?;
            Ok(Randomizer { value })
        } else {
            Ok(Randomizer {
                value: self.seed.as_bytes().to_vec(),
            })
        }
    }

    /// Append a data value as leaf `leaf_index` (draft algorithm 4).
    ///
    /// Stores the leaf hash and completes every parent subtree that the new
    /// leaf closes.
    pub fn append(&mut self, data_value: &[u8], leaf_index: u32) -> MtlResult<()> {
        if data_value.is_empty() {
            return Err(MtlError::NullInput("empty data value".into()));
        }
        let leaf_hash = self
            .hooks
            .hash_leaf(&self.sid, leaf_index, data_value)?;
        self.nodes.insert(leaf_index, leaf_index, &leaf_hash)?;
        self.fill_parents(leaf_index)
    }

    /// Complete the internal hashes for every subtree ending at `leaf_index`.
    ///
    /// Also the only legal way to back-fill interior nodes when a persisted
    /// key is reloaded leaf-by-leaf.
    pub fn update_parents(&mut self, leaf_index: u32) -> MtlResult<()> {
        self.fill_parents(leaf_index)
    }

    fn fill_parents(&mut self, leaf_index: u32) -> MtlResult<()> {
        for k in 1..=lsb(leaf_index + 1) {
            let left = leaf_index - (1 << k) + 1;
            let mid = leaf_index - (1 << (k - 1)) + 1;
            let hash_left = self.nodes.fetch(left, mid - 1)?;
            let hash_right = self.nodes.fetch(mid, leaf_index)?;
            let hash = self.hooks.hash_node(
                &self.sid,
                left,
                leaf_index,
                &hash_left,
                &hash_right,
            )?;
            self.nodes.insert(left, leaf_index, &hash)?;
        }
        Ok(())
    }

    /// Randomize a message and append it as the next leaf.
    ///
    /// Returns the index of the appended leaf. The canonical randomizer
    /// derived by the scheme hook is stored alongside the leaf.
    pub fn hash_and_append(&mut self, msg: &[u8]) -> MtlResult<u32> {
        if msg.is_empty() {
            return Err(MtlError::NullInput("empty message".into()));
        }
        let randomizer = self.generate_randomizer()?;
        // The leaf count advances exactly once, inside the node set insert.
        let leaf_index = self.nodes.leaf_count();

        let MessageHash { data_value, rmtl } = self.hooks.hash_message(
            &self.sid,
            leaf_index,
            MsgRandomizer::Fresh(&randomizer.value),
            msg,
            self.ctx_str.as_deref(),
        )?;

        self.nodes.insert_randomizer(leaf_index, &rmtl)?;
        self.append(&data_value, leaf_index)?;
        Ok(leaf_index)
    }

    /// Compute the authentication path for a leaf (draft algorithm 5).
    ///
    /// The path runs from the leaf to the smallest perfect subtree currently
    /// covering it, one sibling hash per level.
    pub fn authpath(&self, leaf_index: u32) -> MtlResult<AuthPath> {
        let leaf_count = self.nodes.leaf_count();
        if leaf_index >= leaf_count {
            log::error!("auth path index {} outside node set", leaf_index);
            return Err(MtlError::BadParam(format!(
                "leaf {} is outside the node set",
                leaf_index
            )));
        }

        // Find the rung index pair covering the leaf
        let lc = u64::from(leaf_count);
        let leaf = u64::from(leaf_index);
        let mut left: u64 = 0;
        let mut right: u64 = 0;
        for i in (0..=u64::from(msb(leaf_count)) + 1).rev() {
            if lc & (1u64 << i) != 0 {
                right = left + (1u64 << i) - 1;
                if leaf <= right {
                    break;
                }
                left = right + 1;
            }
        }

        // Collect the sibling nodes from the leaf up to the rung
        let count = bit_width((right - left) as u32);
        let mut sibling_hashes = Vec::with_capacity(count as usize);
        for index in 0..count {
            let span = 1u32 << index;
            let path_left = if leaf_index & span != 0 {
                (!(span - 1) & leaf_index) - span
            } else {
                (!(span - 1) & leaf_index) + span
            };
            let path_right = path_left + span - 1;
            sibling_hashes.push(self.nodes.fetch(path_left, path_right)?);
        }

        Ok(AuthPath {
            flags: 0,
            sid: self.sid.clone(),
            leaf_index,
            rung_left: left as u32,
            rung_right: right as u32,
            sibling_hashes,
        })
    }

    /// Compute the Merkle tree ladder for the node set (draft algorithm 6).
    ///
    /// Rungs are emitted from largest subtree span to smallest and tile
    /// `[0, leaf_count)` contiguously.
    pub fn ladder(&self) -> MtlResult<Ladder> {
        let leaf_count = self.nodes.leaf_count();
        if leaf_count == 0 {
            return Err(MtlError::BadParam("node set has no leaves".into()));
        }

        let lc = u64::from(leaf_count);
        let mut rungs = Vec::with_capacity(bit_width(leaf_count) as usize);
        let mut left: u64 = 0;
        for i in (0..=u64::from(msb(leaf_count))).rev() {
            if lc & (1u64 << i) != 0 {
                let right = left + (1u64 << i) - 1;
                let hash = self.nodes.fetch(left as u32, right as u32)?;
                rungs.push(Rung {
                    left: left as u32,
                    right: right as u32,
                    hash,
                });
                left = right + 1;
            }
        }

        Ok(Ladder {
            flags: 0,
            sid: self.sid.clone(),
            rungs,
        })
    }

    /// Fetch the stored randomizer and authentication path for a leaf
    pub fn randomizer_and_authpath(
        &self,
        leaf_index: u32,
    ) -> MtlResult<(Randomizer, AuthPath)> {
        let value = self.nodes.randomizer(leaf_index)?;
        let auth = self.authpath(leaf_index)?;
        Ok((Randomizer { value }, auth))
    }

    /// Verify a data value against an authentication path and rung
    /// (draft algorithm 8).
    pub fn verify(&self, data_value: &[u8], auth: &AuthPath, rung: &Rung) -> MtlResult<()> {
        if data_value.is_empty() {
            return Err(MtlError::NullInput("empty data value".into()));
        }
        let count = auth.sibling_hashes.len() as u32;
        if count > 31 {
            return Err(MtlError::BadParam(format!(
                "sibling hash count {} out of range",
                count
            )));
        }

        let leaf_index = auth.leaf_index;
        let mut target = self
            .hooks
            .hash_leaf(&auth.sid, leaf_index, data_value)?;

        // A leaf-level rung is compared directly
        if leaf_index == rung.left && leaf_index == rung.right {
            return compare_rung_hash(&target, &rung.hash);
        }

        // Recompute internal nodes up the path until the rung pair matches
        for i in 1..=count {
            let span = 1u32 << i;
            let left = leaf_index & !(span - 1);
            let right = left + span - 1;
            let mid = left + (span >> 1);
            let sibling = &auth.sibling_hashes[(i - 1) as usize];

            target = if leaf_index < mid {
                self.hooks
                    .hash_node(&auth.sid, left, right, &target, sibling)?
            } else {
                self.hooks
                    .hash_node(&auth.sid, left, right, sibling, &target)?
            };

            if left == rung.left && right == rung.right {
                return compare_rung_hash(&target, &rung.hash);
            }
        }

        Err(MtlError::BogusCrypto)
    }

    /// Re-randomize a message with the carried randomizer and verify it
    pub fn hash_and_verify(
        &self,
        msg: &[u8],
        randomizer: &Randomizer,
        auth: &AuthPath,
        rung: &Rung,
    ) -> MtlResult<()> {
        if msg.is_empty() {
            return Err(MtlError::NullInput("empty message".into()));
        }
        let MessageHash { data_value, .. } = self.hooks.hash_message(
            &self.sid,
            auth.leaf_index,
            MsgRandomizer::Canonical(&randomizer.value),
            msg,
            self.ctx_str.as_deref(),
        )?;
        self.verify(&data_value, auth, rung)
    }

    /// Prefix serialized ladder bytes with the scheme separator:
    /// `octet(MTL_LADDER_SEP) || octet(len(ctx)) || ctx || oid || ladder`
    pub fn scheme_separated_input(&self, ladder_bytes: &[u8], oid: &[u8]) -> Vec<u8> {
        let ctx = self.ctx_str.as_deref().unwrap_or("").as_bytes();
        let mut buffer = Vec::with_capacity(2 + ctx.len() + oid.len() + ladder_bytes.len());
        buffer.push(MTL_LADDER_SEP);
        buffer.push(ctx.len() as u8);
        buffer.extend_from_slice(ctx);
        buffer.extend_from_slice(oid);
        buffer.extend_from_slice(ladder_bytes);
        buffer
    }
}

/// Select the ladder rung associated with an authentication path
/// (draft algorithm 7).
///
/// The path must follow the binary rung strategy for its leaf; among the
/// rungs covering the leaf the one with the smallest degree wins. No usable
/// rung is reported as [`MtlError::NoLadder`].
pub fn rung<'a>(auth: &AuthPath, ladder: &'a Ladder) -> MtlResult<&'a Rung> {
    if auth.sid != ladder.sid {
        log::error!("sid mismatch between auth path and ladder");
        return Err(MtlError::BadParam(
            "auth path and ladder series ids differ".into(),
        ));
    }

    let count = auth.sibling_hashes.len() as u32;
    if count > 31 {
        return Err(MtlError::BadParam(format!(
            "sibling hash count {} out of range",
            count
        )));
    }

    // The path shape must match the binary rung strategy
    let leaf_index = auth.leaf_index;
    let bin_power = (1u32 << count) - 1;
    let expect_left = leaf_index & !bin_power;
    let expect_right = expect_left + bin_power;
    if auth.rung_left != expect_left || auth.rung_right != expect_right {
        log::error!("auth path rung pair does not cover its leaf");
        return Err(MtlError::BadParam(
            "auth path rung pair does not cover its leaf".into(),
        ));
    }

    let mut assoc: Option<&Rung> = None;
    let mut min_degree = u32::MAX;
    for candidate in &ladder.rungs {
        if candidate.left > leaf_index || candidate.right < leaf_index {
            continue;
        }
        let width = candidate.right - candidate.left + 1;
        let degree = lsb(width);
        if (degree <= lsb(candidate.left) || lsb(candidate.left) == 0)
            && width == (1u32 << degree)
            && degree <= count
            && degree < min_degree
        {
            assoc = Some(candidate);
            min_degree = degree;
        }
    }

    assoc.ok_or(MtlError::NoLadder)
}

fn compare_rung_hash(target: &[u8], expected: &[u8]) -> MtlResult<()> {
    if target.len() == expected.len() && bool::from(target.ct_eq(expected)) {
        Ok(())
    } else {
        Err(MtlError::BogusCrypto)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockHooks;

    fn test_context(randomize: bool) -> MtlContext {
        let seed = Seed::new(&[0u8; 32]).unwrap();
        let sid = SeriesId::new(&[0u8; 8]).unwrap();
        MtlContext::new(seed, sid, None, randomize, Box::new(MockHooks::new(32))).unwrap()
    }

    fn append_messages(ctx: &mut MtlContext, count: u32) {
        for i in 0..count {
            let leaf = ctx.hash_and_append(b"Test Data String").unwrap();
            assert_eq!(leaf, i);
        }
    }

    #[test]
    fn ladder_of_four_leaves_has_one_rung() {
        let rung_data =
            hex::decode("0eeadb7e9386f7ce6a24708fc138fd726b0cefbf9349cbc8b040e3b55ac2da91")
                .unwrap();

        let mut ctx = test_context(false);
        append_messages(&mut ctx, 4);

        let ladder = ctx.ladder().unwrap();
        assert_eq!(ladder.flags, 0);
        assert_eq!(ladder.sid, *ctx.sid());
        assert_eq!(ladder.rung_count(), 1);
        assert_eq!(ladder.rungs[0].left, 0);
        assert_eq!(ladder.rungs[0].right, 3);
        assert_eq!(ladder.rungs[0].hash, rung_data);
    }

    #[test]
    fn ladder_of_six_leaves_has_two_rungs() {
        let rung_0 =
            hex::decode("0eeadb7e9386f7ce6a24708fc138fd726b0cefbf9349cbc8b040e3b55ac2da91")
                .unwrap();
        let rung_1 =
            hex::decode("2d3a8fb7bececa5a8c5253b8a71c22ee2340f1d03a5185740629199451bc4324")
                .unwrap();

        let mut ctx = test_context(false);
        append_messages(&mut ctx, 6);

        let ladder = ctx.ladder().unwrap();
        assert_eq!(ladder.rung_count(), 2);
        assert_eq!((ladder.rungs[0].left, ladder.rungs[0].right), (0, 3));
        assert_eq!(ladder.rungs[0].hash, rung_0);
        assert_eq!((ladder.rungs[1].left, ladder.rungs[1].right), (4, 5));
        assert_eq!(ladder.rungs[1].hash, rung_1);
    }

    #[test]
    fn ladder_on_empty_node_set_fails() {
        let ctx = test_context(false);
        assert!(ctx.ladder().is_err());
    }

    #[test]
    fn ladder_rungs_tile_the_leaf_range() {
        for count in 1u32..=16 {
            let mut ctx = test_context(false);
            append_messages(&mut ctx, count);
            let ladder = ctx.ladder().unwrap();

            let mut expected_left = 0u32;
            let mut span = u32::MAX;
            for rung in &ladder.rungs {
                assert_eq!(rung.left, expected_left);
                let width = rung.right - rung.left + 1;
                assert!(width.is_power_of_two());
                assert!(width < span, "rungs must shrink strictly");
                span = width;
                expected_left = rung.right + 1;
            }
            assert_eq!(expected_left, count);
        }
    }

    #[test]
    fn authpath_outside_node_set_fails() {
        let mut ctx = test_context(false);
        append_messages(&mut ctx, 4);
        assert!(ctx.authpath(4).is_err());
    }

    #[test]
    fn every_leaf_verifies_against_its_rung() {
        for count in 1u32..=9 {
            let mut ctx = test_context(false);
            append_messages(&mut ctx, count);
            let ladder = ctx.ladder().unwrap();

            for leaf in 0..count {
                let (randomizer, auth) = ctx.randomizer_and_authpath(leaf).unwrap();
                let assoc = rung(&auth, &ladder).unwrap();
                assert_eq!(
                    auth.sibling_hash_count() as u32,
                    bit_width(auth.rung_right - auth.rung_left)
                );
                ctx.hash_and_verify(b"Test Data String", &randomizer, &auth, assoc)
                    .unwrap();
            }
        }
    }

    #[test]
    fn randomized_mode_verifies_too() {
        let mut ctx = test_context(true);
        append_messages(&mut ctx, 5);
        let ladder = ctx.ladder().unwrap();
        let (randomizer, auth) = ctx.randomizer_and_authpath(2).unwrap();
        let assoc = rung(&auth, &ladder).unwrap();
        ctx.hash_and_verify(b"Test Data String", &randomizer, &auth, assoc)
            .unwrap();
    }

    #[test]
    fn flipping_any_randomizer_byte_is_bogus() {
        let mut ctx = test_context(true);
        append_messages(&mut ctx, 4);
        let ladder = ctx.ladder().unwrap();
        let (randomizer, auth) = ctx.randomizer_and_authpath(1).unwrap();
        let assoc = rung(&auth, &ladder).unwrap();

        for byte in 0..randomizer.value.len() {
            let mut tampered = randomizer.clone();
            tampered.value[byte] ^= 0x01;
            let result = ctx.hash_and_verify(b"Test Data String", &tampered, &auth, assoc);
            assert!(matches!(result, Err(MtlError::BogusCrypto)));
        }
    }

    #[test]
    fn wrong_message_is_bogus() {
        let mut ctx = test_context(false);
        append_messages(&mut ctx, 4);
        let ladder = ctx.ladder().unwrap();
        let (randomizer, auth) = ctx.randomizer_and_authpath(3).unwrap();
        let assoc = rung(&auth, &ladder).unwrap();
        let result = ctx.hash_and_verify(b"Test Data Strinh", &randomizer, &auth, assoc);
        assert!(matches!(result, Err(MtlError::BogusCrypto)));
    }

    #[test]
    fn rung_selection_rejects_foreign_sid() {
        let mut ctx = test_context(false);
        append_messages(&mut ctx, 4);
        let mut ladder = ctx.ladder().unwrap();
        ladder.sid = SeriesId::new(&[0xffu8; 8]).unwrap();
        let auth = ctx.authpath(0).unwrap();
        assert!(matches!(
            rung(&auth, &ladder),
            Err(MtlError::BadParam(_))
        ));
    }

    #[test]
    fn rung_selection_rejects_uncovering_pair() {
        let mut ctx = test_context(false);
        append_messages(&mut ctx, 4);
        let ladder = ctx.ladder().unwrap();
        let mut auth = ctx.authpath(0).unwrap();
        auth.rung_left = 6;
        auth.rung_right = 10;
        assert!(matches!(
            rung(&auth, &ladder),
            Err(MtlError::BadParam(_))
        ));
    }

    #[test]
    fn rung_selection_without_candidate_is_no_ladder() {
        let mut ctx = test_context(false);
        append_messages(&mut ctx, 6);
        let ladder = ctx.ladder().unwrap();

        // Path for leaf 4 covered only by the (4,5) rung; drop that rung.
        let auth = ctx.authpath(4).unwrap();
        let mut pruned = ladder.clone();
        pruned.rungs.retain(|r| r.left != 4);
        assert!(matches!(rung(&auth, &pruned), Err(MtlError::NoLadder)));
    }

    #[test]
    fn interior_nodes_match_recomputation() {
        // Append/fetch round trip: every interior valid pair is the hash of
        // its two children.
        let mut ctx = test_context(false);
        append_messages(&mut ctx, 8);

        let hooks = MockHooks::new(32);
        for span_log in 1..=3u32 {
            let span = 1u32 << span_log;
            for left in (0u32..8).step_by(span as usize) {
                let right = left + span - 1;
                let mid = left + span / 2;
                let l = ctx.nodes().fetch(left, mid - 1).unwrap();
                let r = ctx.nodes().fetch(mid, right).unwrap();
                let expected = hooks
                    .hash_node(ctx.sid(), left, right, &l, &r)
                    .unwrap();
                assert_eq!(ctx.nodes().fetch(left, right).unwrap(), expected);
            }
        }
    }

    #[test]
    fn scheme_separated_input_layout() {
        let seed = Seed::new(&[0u8; 32]).unwrap();
        let sid = SeriesId::new(&[0u8; 8]).unwrap();
        let ctx = MtlContext::new(
            seed,
            sid,
            Some("ctx"),
            false,
            Box::new(MockHooks::new(32)),
        )
        .unwrap();

        let oid = [0x2b, 0xce, 0x0f, 0x06, 0x0d, 0x10];
        let buffer = ctx.scheme_separated_input(b"LADDER", &oid);
        assert_eq!(buffer[0], MTL_LADDER_SEP);
        assert_eq!(buffer[1], 3);
        assert_eq!(&buffer[2..5], b"ctx");
        assert_eq!(&buffer[5..11], &oid);
        assert_eq!(&buffer[11..], b"LADDER");
    }
}
