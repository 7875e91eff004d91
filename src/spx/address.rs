//! SPHINCS+ Address Construction
//!
//! MTL node hashing binds every hash to an ADRS structure carrying the
//! series id and the node index pair. The SHAKE branch uses the full
//! 32-byte layout, the SHA-2 branch the 22-byte compressed one. The series
//! id is right-aligned in the tree field when shorter than it.

use crate::node_set::SeriesId;

/// ADRS type for message hashing
pub const ADRS_TYPE_MSG: u32 = 16;
/// ADRS type for leaf (data value) hashing
pub const ADRS_TYPE_DATA: u32 = 17;
/// ADRS type for internal tree node hashing
pub const ADRS_TYPE_TREE: u32 = 18;

/// Full ADRS length in bytes
pub const ADRS_FULL_LEN: usize = 32;
/// Compressed ADRS length in bytes
pub const ADRS_COMPRESSED_LEN: usize = 22;

const FULL_TREE_OFFSET: usize = 4;
const FULL_TREE_LEN: usize = 12;
const FULL_TYPE_OFFSET: usize = 16;
const FULL_A2_OFFSET: usize = 24;
const FULL_A3_OFFSET: usize = 28;

const COMPRESSED_TREE_OFFSET: usize = 1;
const COMPRESSED_TREE_LEN: usize = 8;
const COMPRESSED_TYPE_OFFSET: usize = 9;
const COMPRESSED_A2_OFFSET: usize = 14;
const COMPRESSED_A3_OFFSET: usize = 18;

fn place_sid(buffer: &mut [u8], sid: &SeriesId) {
    let field_len = buffer.len();
    let sid_bytes = sid.as_bytes();
    if sid_bytes.len() >= field_len {
        buffer.copy_from_slice(&sid_bytes[..field_len]);
    } else {
        let offset = field_len - sid_bytes.len();
        buffer[offset..].copy_from_slice(sid_bytes);
    }
}

/// Build a full ADRS: `layer:4 | tree:12 | type:4 | a1:4 | a2:4 | a3:4`
pub fn adrs_full(adrs_type: u32, sid: &SeriesId, left: u32, right: u32) -> [u8; ADRS_FULL_LEN] {
    let mut adrs = [0u8; ADRS_FULL_LEN];
    place_sid(
        &mut adrs[FULL_TREE_OFFSET..FULL_TREE_OFFSET + FULL_TREE_LEN],
        sid,
    );
    adrs[FULL_TYPE_OFFSET..FULL_TYPE_OFFSET + 4].copy_from_slice(&adrs_type.to_be_bytes());
    adrs[FULL_A2_OFFSET..FULL_A2_OFFSET + 4].copy_from_slice(&left.to_be_bytes());
    adrs[FULL_A3_OFFSET..FULL_A3_OFFSET + 4].copy_from_slice(&right.to_be_bytes());
    adrs
}

/// Build a compressed ADRS: `layer:1 | tree:8 | type:4 | a1:1 | a2:4 | a3:4`
/// (the type value occupies the first octet of its field)
pub fn adrs_compressed(
    adrs_type: u32,
    sid: &SeriesId,
    left: u32,
    right: u32,
) -> [u8; ADRS_COMPRESSED_LEN] {
    let mut adrs = [0u8; ADRS_COMPRESSED_LEN];
    place_sid(
        &mut adrs[COMPRESSED_TREE_OFFSET..COMPRESSED_TREE_OFFSET + COMPRESSED_TREE_LEN],
        sid,
    );
    adrs[COMPRESSED_TYPE_OFFSET] = adrs_type as u8;
    adrs[COMPRESSED_A2_OFFSET..COMPRESSED_A2_OFFSET + 4].copy_from_slice(&left.to_be_bytes());
    adrs[COMPRESSED_A3_OFFSET..COMPRESSED_A3_OFFSET + 4].copy_from_slice(&right.to_be_bytes());
    adrs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compressed_layout_matches_reference() {
        let sid = SeriesId::new(&[0x55; 64]).unwrap();
        let adrs = adrs_compressed(ADRS_TYPE_DATA, &sid, 0, 9);

        let expected: [u8; ADRS_COMPRESSED_LEN] = [
            0x00, 0x55, 0x55, 0x55, 0x55, 0x55, 0x55, 0x55, 0x55, 0x11, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x09,
        ];
        assert_eq!(adrs, expected);
    }

    #[test]
    fn full_layout_matches_reference() {
        let sid = SeriesId::new(&[0x55; 8]).unwrap();
        let adrs = adrs_full(ADRS_TYPE_DATA, &sid, 0, 9);

        let expected: [u8; ADRS_FULL_LEN] = [
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x55, 0x55, 0x55, 0x55, 0x55,
            0x55, 0x55, 0x55, 0x00, 0x00, 0x00, 0x11, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x09,
        ];
        assert_eq!(adrs, expected);
    }

    #[test]
    fn short_sid_is_right_aligned() {
        let sid = SeriesId::new(&[0xaa, 0xbb]).unwrap();
        let adrs = adrs_full(ADRS_TYPE_TREE, &sid, 1, 2);
        assert_eq!(&adrs[4..14], &[0u8; 10]);
        assert_eq!(&adrs[14..16], &[0xaa, 0xbb]);

        let adrs = adrs_compressed(ADRS_TYPE_TREE, &sid, 1, 2);
        assert_eq!(&adrs[1..7], &[0u8; 6]);
        assert_eq!(&adrs[7..9], &[0xaa, 0xbb]);
    }
}
