//! Merkle Tree Ladder (MTL) Mode
//!
//! Hash-based signing construction that amortises one expensive
//! post-quantum signature across many messages. A signer grows a forest of
//! perfect Merkle subtrees over message hashes; the subtree roots form a
//! ladder that is signed once with the underlying SLH-DSA scheme, while
//! each message gets a short condensed signature (randomizer plus
//! authentication path) checked against a rung of an authenticated ladder.
//!
//! Layering, top down: the [`keylib`] façade drives the [`mtl`] core, which
//! stores hashes in the paged [`node_set`] addressed through the [`bits`]
//! algebra. Scheme-specific hashing is injected by the [`spx`] hooks, and
//! the underlying signature stays behind the [`signer`] contract.

pub mod bits;
pub mod codec;
pub mod display;
pub mod error;
pub mod keylib;
pub mod mtl;
pub mod node_set;
pub mod registry;
pub mod signer;
pub mod spx;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{MtlError, MtlResult};
pub use keylib::{Handle, MtlKey};
pub use mtl::{
    rung, AuthPath, Ladder, MessageHash, MsgRandomizer, MtlContext, Randomizer, Rung,
    SchemeHooks,
};
pub use node_set::{NodeSet, Seed, SeriesId};
pub use registry::{algorithm_props, registered_names, AlgorithmProps};
pub use signer::LadderSigner;
pub use spx::{SphincsHooks, SphincsParams, SpxHash};
