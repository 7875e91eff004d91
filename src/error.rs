//! MTL Mode Status Taxonomy
//!
//! Every fallible operation in the crate reports through one discriminated
//! status type. Codec failures are local to the offending record, crypto
//! mismatches are non-recoverable, and allocation failures never retry.

/// Error type covering the full MTL status catalogue
#[derive(Debug, thiserror::Error)]
pub enum MtlError {
    #[error("Required input missing: {0}")]
    NullInput(String),

    #[error("Invalid parameter: {0}")]
    BadParam(String),

    #[error("Resource failure: {0}")]
    ResourceFail(String),

    #[error("Unknown algorithm: {0}")]
    BadAlgorithm(String),

    #[error("Invalid field value: {0}")]
    BadValue(String),

    #[error("Signing failure: {0}")]
    SignFail(String),

    #[error("Authentication failure")]
    BogusCrypto,

    #[error("Signature has no usable ladder")]
    NoLadder,

    #[error("Validity cannot be determined: {0}")]
    Indeterminate(String),
}

/// Result type for MTL operations
pub type MtlResult<T> = Result<T, MtlError>;
