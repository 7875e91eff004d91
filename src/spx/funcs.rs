//! Hash and PRF Adapters
//!
//! Uniform byte-slice wrappers over the digest primitives the SPHINCS+
//! bindings compose: SHA-2, SHAKE-256, HMAC, MGF1 expansion, and the
//! block padding applied to the public seed on the SHA-2 branch.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256, Sha512};
use sha3::{
    digest::{ExtendableOutput, Update, XofReader},
    Shake256,
};

use crate::error::{MtlError, MtlResult};

type HmacSha256 = Hmac<Sha256>;
type HmacSha512 = Hmac<Sha512>;

/// SHA-256 block size in bytes
pub const SHA2_256_BLOCK_SIZE: usize = 64;
/// SHA-512 block size in bytes
pub const SHA2_512_BLOCK_SIZE: usize = 128;

pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

pub fn sha512(data: &[u8]) -> [u8; 64] {
    Sha512::digest(data).into()
}

/// SHAKE-256 with `out_len` bytes of output
pub fn shake256(data: &[u8], out_len: usize) -> Vec<u8> {
    let mut hasher = Shake256::default();
    hasher.update(data);
    let mut reader = hasher.finalize_xof();
    let mut out = vec![0u8; out_len];
    reader.read(&mut out);
    out
}

pub fn hmac_sha256(key: &[u8], data: &[u8]) -> MtlResult<[u8; 32]> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| MtlError::BadParam(format!("HMAC key setup failed: {}", e)))?;
    Mac::update(&mut mac, data);
    Ok(mac.finalize().into_bytes().into())
}

pub fn hmac_sha512(key: &[u8], data: &[u8]) -> MtlResult<[u8; 64]> {
    let mut mac = HmacSha512::new_from_slice(key)
        .map_err(|e| MtlError::BadParam(format!("HMAC key setup failed: {}", e)))?;
    Mac::update(&mut mac, data);
    Ok(mac.finalize().into_bytes().into())
}

/// MGF1 over SHA-256: counter blocks `SHA-256(seed || be32(i))`
pub fn mgf1_sha256(seed: &[u8], out_len: usize) -> Vec<u8> {
    mgf1(seed, out_len, 32, |data| sha256(data).to_vec())
}

/// MGF1 over SHA-512
pub fn mgf1_sha512(seed: &[u8], out_len: usize) -> Vec<u8> {
    mgf1(seed, out_len, 64, |data| sha512(data).to_vec())
}

fn mgf1(seed: &[u8], out_len: usize, digest_len: usize, digest: impl Fn(&[u8]) -> Vec<u8>) -> Vec<u8> {
    let mut out = Vec::with_capacity(out_len + digest_len);
    let mut buffer = Vec::with_capacity(seed.len() + 4);
    let mut counter: u32 = 0;
    while out.len() < out_len {
        buffer.clear();
        buffer.extend_from_slice(seed);
        buffer.extend_from_slice(&counter.to_be_bytes());
        out.extend_from_slice(&digest(&buffer));
        counter += 1;
    }
    out.truncate(out_len);
    out
}

/// Right-pad `data` with zeros to a multiple of `block_len`
pub fn block_pad(data: &[u8], block_len: usize) -> Vec<u8> {
    let padded_len = data.len().div_ceil(block_len) * block_len;
    let mut out = vec![0u8; padded_len];
    out[..data.len()].copy_from_slice(data);
    out
}

/// SHA-2 tree hash: `SHA-X(BlockPad(PK.seed) || ADRS^c || data)` truncated
/// to `hash_len`; SHA-256 and a 64-byte block for n <= 16, SHA-512 and a
/// 128-byte block otherwise
pub fn spx_sha2(seed: &[u8], adrs: &[u8], data: &[u8], hash_len: usize) -> Vec<u8> {
    let block = if hash_len <= 16 {
        SHA2_256_BLOCK_SIZE
    } else {
        SHA2_512_BLOCK_SIZE
    };
    let padded_seed = block_pad(seed, block);

    let mut buffer = Vec::with_capacity(padded_seed.len() + adrs.len() + data.len());
    buffer.extend_from_slice(&padded_seed);
    buffer.extend_from_slice(adrs);
    buffer.extend_from_slice(data);

    let mut out = if hash_len <= 16 {
        sha256(&buffer).to_vec()
    } else {
        sha512(&buffer).to_vec()
    };
    out.truncate(hash_len);
    out
}

/// SHAKE tree hash: `SHAKE256(PK.seed || ADRS || data, 8n)`
pub fn spx_shake(seed: &[u8], adrs: &[u8], data: &[u8], hash_len: usize) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(seed.len() + adrs.len() + data.len());
    buffer.extend_from_slice(seed);
    buffer.extend_from_slice(adrs);
    buffer.extend_from_slice(data);
    shake256(&buffer, hash_len)
}
