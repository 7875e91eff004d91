//! Wire Codec
//!
//! Fixed-layout encoders and decoders for authentication paths, ladders,
//! and the length-prefixed fields of the persisted key blob. All integers
//! are big-endian. Every length read from a buffer is checked against the
//! remaining bytes and the field's declared bounds before any allocation.

use crate::error::{MtlError, MtlResult};
use crate::mtl::{AuthPath, Ladder, Randomizer, Rung};
use crate::node_set::SeriesId;

/// Decoded sibling-hash counts above this are structurally impossible
const MAX_SIBLING_HASHES: u16 = 32;

pub fn write_u16(buffer: &mut Vec<u8>, value: u16) {
    buffer.extend_from_slice(&value.to_be_bytes());
}

pub fn write_u32(buffer: &mut Vec<u8>, value: u32) {
    buffer.extend_from_slice(&value.to_be_bytes());
}

pub fn read_u16(buffer: &[u8], offset: &mut usize) -> MtlResult<u16> {
    let bytes = read_exact(buffer, offset, 2)?;
    Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
}

pub fn read_u32(buffer: &[u8], offset: &mut usize) -> MtlResult<u32> {
    let bytes = read_exact(buffer, offset, 4)?;
    Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

pub fn read_exact<'a>(buffer: &'a [u8], offset: &mut usize, len: usize) -> MtlResult<&'a [u8]> {
    let end = offset
        .checked_add(len)
        .filter(|&end| end <= buffer.len())
        .ok_or_else(|| MtlError::BadValue("buffer is truncated".into()))?;
    let slice = &buffer[*offset..end];
    *offset = end;
    Ok(slice)
}

/// Write one length-prefixed field (4-byte big-endian length, then bytes)
pub fn write_field(
    buffer: &mut Vec<u8>,
    data: &[u8],
    min_len: usize,
    max_len: usize,
) -> MtlResult<()> {
    if data.len() < min_len || data.len() > max_len {
        return Err(MtlError::BadValue(format!(
            "field length {} outside [{}, {}]",
            data.len(),
            min_len,
            max_len
        )));
    }
    write_u32(buffer, data.len() as u32);
    buffer.extend_from_slice(data);
    Ok(())
}

/// Read one length-prefixed field, bounds-checking the declared length
/// before allocating
pub fn read_field(
    buffer: &[u8],
    offset: &mut usize,
    min_len: usize,
    max_len: usize,
) -> MtlResult<Vec<u8>> {
    let len = read_u32(buffer, offset)? as usize;
    if len < min_len || len > max_len {
        log::error!("field length {} outside [{}, {}]", len, min_len, max_len);
        return Err(MtlError::BadValue(format!(
            "field length {} outside [{}, {}]",
            len, min_len, max_len
        )));
    }
    Ok(read_exact(buffer, offset, len)?.to_vec())
}

/// Serialize a randomizer and authentication path:
/// `randomizer | flags | sid | leaf_index | rung_left | rung_right |
/// sibling_hash_count | sibling_hashes`
pub fn auth_path_to_bytes(
    randomizer: &Randomizer,
    auth: &AuthPath,
    hash_size: usize,
) -> MtlResult<Vec<u8>> {
    if randomizer.value.len() != hash_size {
        return Err(MtlError::BadParam(format!(
            "randomizer length {} does not match hash size {}",
            randomizer.value.len(),
            hash_size
        )));
    }
    for sibling in &auth.sibling_hashes {
        if sibling.len() != hash_size {
            return Err(MtlError::BadParam(
                "sibling hash length does not match hash size".into(),
            ));
        }
    }

    let total = 16 + hash_size + auth.sid.len() + auth.sibling_hashes.len() * hash_size;
    let mut buffer = Vec::with_capacity(total);
    buffer.extend_from_slice(&randomizer.value);
    write_u16(&mut buffer, auth.flags);
    buffer.extend_from_slice(auth.sid.as_bytes());
    write_u32(&mut buffer, auth.leaf_index);
    write_u32(&mut buffer, auth.rung_left);
    write_u32(&mut buffer, auth.rung_right);
    write_u16(&mut buffer, auth.sibling_hash_count());
    for sibling in &auth.sibling_hashes {
        buffer.extend_from_slice(sibling);
    }
    Ok(buffer)
}

/// Parse a randomizer and authentication path from the front of `buffer`.
///
/// Returns the decoded values and the number of bytes consumed; trailing
/// bytes (a signed ladder in full signatures) are left for the caller.
pub fn auth_path_from_bytes(
    buffer: &[u8],
    hash_size: usize,
    sid_len: usize,
) -> MtlResult<(Randomizer, AuthPath, usize)> {
    if hash_size == 0 || sid_len == 0 {
        return Err(MtlError::BadParam("hash and sid sizes must be nonzero".into()));
    }

    let mut offset = 0usize;
    let randomizer = Randomizer {
        value: read_exact(buffer, &mut offset, hash_size)?.to_vec(),
    };
    let flags = read_u16(buffer, &mut offset)?;
    let sid = SeriesId::new(read_exact(buffer, &mut offset, sid_len)?)?;
    let leaf_index = read_u32(buffer, &mut offset)?;
    let rung_left = read_u32(buffer, &mut offset)?;
    let rung_right = read_u32(buffer, &mut offset)?;
    let count = read_u16(buffer, &mut offset)?;
    if count > MAX_SIBLING_HASHES {
        log::error!("sibling hash count {} is out of range", count);
        return Err(MtlError::BadValue(format!(
            "sibling hash count {} is out of range",
            count
        )));
    }
    let mut sibling_hashes = Vec::with_capacity(count as usize);
    for _ in 0..count {
        sibling_hashes.push(read_exact(buffer, &mut offset, hash_size)?.to_vec());
    }

    Ok((
        randomizer,
        AuthPath {
            flags,
            sid,
            leaf_index,
            rung_left,
            rung_right,
            sibling_hashes,
        },
        offset,
    ))
}

/// Serialize a ladder:
/// `flags | sid | rung_count | {left | right | hash}^rung_count`
pub fn ladder_to_bytes(ladder: &Ladder, hash_size: usize) -> MtlResult<Vec<u8>> {
    for rung in &ladder.rungs {
        if rung.hash.len() != hash_size {
            return Err(MtlError::BadParam(
                "rung hash length does not match hash size".into(),
            ));
        }
    }

    let total = 4 + ladder.sid.len() + (8 + hash_size) * ladder.rungs.len();
    let mut buffer = Vec::with_capacity(total);
    write_u16(&mut buffer, ladder.flags);
    buffer.extend_from_slice(ladder.sid.as_bytes());
    write_u16(&mut buffer, ladder.rung_count());
    for rung in &ladder.rungs {
        write_u32(&mut buffer, rung.left);
        write_u32(&mut buffer, rung.right);
        buffer.extend_from_slice(&rung.hash);
    }
    Ok(buffer)
}

/// Parse a ladder from the front of `buffer`, returning it together with
/// the number of bytes consumed
pub fn ladder_from_bytes(
    buffer: &[u8],
    hash_size: usize,
    sid_len: usize,
) -> MtlResult<(Ladder, usize)> {
    if hash_size == 0 || sid_len == 0 {
        return Err(MtlError::BadParam("hash and sid sizes must be nonzero".into()));
    }

    let mut offset = 0usize;
    let flags = read_u16(buffer, &mut offset)?;
    let sid = SeriesId::new(read_exact(buffer, &mut offset, sid_len)?)?;
    let rung_count = read_u16(buffer, &mut offset)? as usize;

    // The declared count must fit in the remaining bytes before any rung
    // storage is allocated.
    let remaining = buffer.len() - offset;
    if rung_count.checked_mul(8 + hash_size).map_or(true, |need| need > remaining) {
        log::error!("ladder rung count {} exceeds the buffer", rung_count);
        return Err(MtlError::BadValue(format!(
            "ladder rung count {} exceeds the buffer",
            rung_count
        )));
    }

    let mut rungs = Vec::with_capacity(rung_count);
    for _ in 0..rung_count {
        let left = read_u32(buffer, &mut offset)?;
        let right = read_u32(buffer, &mut offset)?;
        let hash = read_exact(buffer, &mut offset, hash_size)?.to_vec();
        rungs.push(Rung { left, right, hash });
    }

    Ok((Ladder { flags, sid, rungs }, offset))
}
