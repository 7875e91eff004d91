//! Underlying Signature Binding
//!
//! The MTL engine touches the expensive post-quantum scheme only at ladder
//! signing and ladder verification, through the [`LadderSigner`] contract.
//! One binding is provided, over the RustCrypto SLH-DSA parameter sets.

use signature::{Keypair, Signer, Verifier};
use slh_dsa::{
    ParameterSet, Sha2_128f, Sha2_128s, Sha2_192f, Sha2_192s, Sha2_256f, Sha2_256s, Shake128f,
    Shake128s, Shake192f, Shake192s, Shake256f, Shake256s, Signature, SigningKey, VerifyingKey,
};

use crate::error::{MtlError, MtlResult};
use crate::registry::AlgorithmProps;

/// Contract for the signature scheme a ladder is anchored to
pub trait LadderSigner {
    /// Name of the underlying algorithm
    fn algorithm(&self) -> &'static str;

    /// Serialized public key
    fn public_key(&self) -> &[u8];

    /// Serialized secret key; empty for verification-only instances
    fn secret_key(&self) -> &[u8];

    /// Whether signing operations are available
    fn can_sign(&self) -> bool {
        !self.secret_key().is_empty()
    }

    /// Sign `msg`, returning the detached signature bytes
    fn sign(&self, msg: &[u8]) -> MtlResult<Vec<u8>>;

    /// Verify a detached signature over `msg`
    fn verify(&self, msg: &[u8], sig: &[u8]) -> MtlResult<()>;
}

struct SlhDsaSigner<P: ParameterSet> {
    name: &'static str,
    signing: Option<SigningKey<P>>,
    verifying: VerifyingKey<P>,
    secret: Vec<u8>,
    public: Vec<u8>,
}

impl<P: ParameterSet> LadderSigner for SlhDsaSigner<P> {
    fn algorithm(&self) -> &'static str {
        self.name
    }

    fn public_key(&self) -> &[u8] {
        &self.public
    }

    fn secret_key(&self) -> &[u8] {
        &self.secret
    }

    fn sign(&self, msg: &[u8]) -> MtlResult<Vec<u8>> {
        let signing = self
            .signing
            .as_ref()
            .ok_or_else(|| MtlError::SignFail("no secret key is available".into()))?;
        let signature = signing
            .try_sign(msg)
            .map_err(|e| MtlError::SignFail(format!("underlying sign failed: {}", e)))?;
        Ok(signature.to_bytes().to_vec())
    }

    fn verify(&self, msg: &[u8], sig: &[u8]) -> MtlResult<()> {
        let signature = Signature::<P>::try_from(sig)
            .map_err(|_| MtlError::BadValue("malformed underlying signature".into()))?;
        self.verifying
            .verify(msg, &signature)
            .map_err(|_| MtlError::BogusCrypto)
    }
}

fn generate_typed<P: ParameterSet + 'static>(name: &'static str) -> Box<dyn LadderSigner> {
    let signing = SigningKey::<P>::new(&mut rand::rngs::OsRng);
    let verifying = signing.verifying_key();
    let secret = signing.to_bytes().to_vec();
    let public = verifying.to_bytes().to_vec();
    Box::new(SlhDsaSigner {
        name,
        signing: Some(signing),
        verifying,
        secret,
        public,
    })
}

fn from_keys_typed<P: ParameterSet + 'static>(
    name: &'static str,
    secret: Option<&[u8]>,
    public: &[u8],
) -> MtlResult<Box<dyn LadderSigner>> {
    let verifying = VerifyingKey::<P>::try_from(public)
        .map_err(|_| MtlError::BadValue("public key length does not match the scheme".into()))?;
    let signing = match secret {
        Some(bytes) => Some(SigningKey::<P>::try_from(bytes).map_err(|_| {
            MtlError::BadValue("secret key length does not match the scheme".into())
        })?),
        None => None,
    };
    Ok(Box::new(SlhDsaSigner {
        name,
        secret: secret.map(<[u8]>::to_vec).unwrap_or_default(),
        public: public.to_vec(),
        signing,
        verifying,
    }))
}

/// Generate a fresh keypair for the scheme named by `props`
pub fn generate(props: &AlgorithmProps) -> MtlResult<Box<dyn LadderSigner>> {
    let name = props.underlying;
    Ok(match name {
        "SLH-DSA-SHAKE-128s" => generate_typed::<Shake128s>(name),
        "SLH-DSA-SHAKE-128f" => generate_typed::<Shake128f>(name),
        "SLH-DSA-SHAKE-192s" => generate_typed::<Shake192s>(name),
        "SLH-DSA-SHAKE-192f" => generate_typed::<Shake192f>(name),
        "SLH-DSA-SHAKE-256s" => generate_typed::<Shake256s>(name),
        "SLH-DSA-SHAKE-256f" => generate_typed::<Shake256f>(name),
        "SLH-DSA-SHA2-128s" => generate_typed::<Sha2_128s>(name),
        "SLH-DSA-SHA2-128f" => generate_typed::<Sha2_128f>(name),
        "SLH-DSA-SHA2-192s" => generate_typed::<Sha2_192s>(name),
        "SLH-DSA-SHA2-192f" => generate_typed::<Sha2_192f>(name),
        "SLH-DSA-SHA2-256s" => generate_typed::<Sha2_256s>(name),
        "SLH-DSA-SHA2-256f" => generate_typed::<Sha2_256f>(name),
        other => return Err(MtlError::BadAlgorithm(other.to_string())),
    })
}

/// Instantiate the scheme named by `props` from serialized key material.
///
/// Verification-only instances pass `secret = None`.
pub fn from_keys(
    props: &AlgorithmProps,
    secret: Option<&[u8]>,
    public: &[u8],
) -> MtlResult<Box<dyn LadderSigner>> {
    let name = props.underlying;
    match name {
        "SLH-DSA-SHAKE-128s" => from_keys_typed::<Shake128s>(name, secret, public),
        "SLH-DSA-SHAKE-128f" => from_keys_typed::<Shake128f>(name, secret, public),
        "SLH-DSA-SHAKE-192s" => from_keys_typed::<Shake192s>(name, secret, public),
        "SLH-DSA-SHAKE-192f" => from_keys_typed::<Shake192f>(name, secret, public),
        "SLH-DSA-SHAKE-256s" => from_keys_typed::<Shake256s>(name, secret, public),
        "SLH-DSA-SHAKE-256f" => from_keys_typed::<Shake256f>(name, secret, public),
        "SLH-DSA-SHA2-128s" => from_keys_typed::<Sha2_128s>(name, secret, public),
        "SLH-DSA-SHA2-128f" => from_keys_typed::<Sha2_128f>(name, secret, public),
        "SLH-DSA-SHA2-192s" => from_keys_typed::<Sha2_192s>(name, secret, public),
        "SLH-DSA-SHA2-192f" => from_keys_typed::<Sha2_192f>(name, secret, public),
        "SLH-DSA-SHA2-256s" => from_keys_typed::<Sha2_256s>(name, secret, public),
        "SLH-DSA-SHA2-256f" => from_keys_typed::<Sha2_256f>(name, secret, public),
        other => Err(MtlError::BadAlgorithm(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::algorithm_props;

    #[test]
    fn sign_verify_round_trip() {
        let props = algorithm_props("SLH-DSA-MTL-SHA2-128F").unwrap();
        let signer = generate(props).unwrap();
        assert!(signer.can_sign());
        assert_eq!(signer.public_key().len(), 2 * props.sec_param);
        assert_eq!(signer.secret_key().len(), 4 * props.sec_param);

        let sig = signer.sign(b"ladder bytes").unwrap();
        signer.verify(b"ladder bytes", &sig).unwrap();
        assert!(matches!(
            signer.verify(b"other bytes", &sig),
            Err(MtlError::BogusCrypto)
        ));
    }

    #[test]
    fn rehydrated_keys_interoperate() {
        let props = algorithm_props("SLH-DSA-MTL-SHA2-128F").unwrap();
        let signer = generate(props).unwrap();
        let sig = signer.sign(b"message").unwrap();

        let verifier = from_keys(props, None, signer.public_key()).unwrap();
        assert!(!verifier.can_sign());
        verifier.verify(b"message", &sig).unwrap();
        assert!(verifier.sign(b"message").is_err());

        let resigner =
            from_keys(props, Some(signer.secret_key()), signer.public_key()).unwrap();
        let sig2 = resigner.sign(b"message").unwrap();
        verifier.verify(b"message", &sig2).unwrap();
    }

    #[test]
    fn malformed_public_key_is_rejected() {
        let props = algorithm_props("SLH-DSA-MTL-SHA2-128F").unwrap();
        assert!(from_keys(props, None, &[0u8; 7]).is_err());
    }
}
