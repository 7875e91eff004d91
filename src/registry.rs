//! Algorithm Registry
//!
//! Closed enumeration of the supported MTL algorithm identifiers. Each
//! entry binds a canonical name to the security parameter, the hash branch,
//! the underlying SLH-DSA parameter set name, and the 6-byte MTL object
//! identifier used in scheme separation.

use crate::error::{MtlError, MtlResult};
use crate::spx::SpxHash;

/// Series identifier length prescribed for every registered algorithm
pub const SID_LEN: usize = 8;

/// Properties of one registered MTL algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlgorithmProps {
    /// Canonical MTL algorithm name
    pub name: &'static str,
    /// Security parameter n in bytes
    pub sec_param: usize,
    /// NIST security level
    pub nist_level: u8,
    /// Whether message hashing draws fresh per-leaf randomizers
    pub randomize: bool,
    /// Robust leaf/node hashing (always simple for SLH-DSA)
    pub robust: bool,
    /// Series identifier length in bytes
    pub sid_len: usize,
    /// Hash family branch
    pub hash: SpxHash,
    /// Underlying signature scheme name
    pub underlying: &'static str,
    /// MTL object identifier bound into the ladder separator
    pub oid: [u8; 6],
}

/// The closed algorithm table
pub const ALGORITHMS: [AlgorithmProps; 12] = [
    AlgorithmProps {
        name: "SLH-DSA-MTL-SHAKE-128S",
        sec_param: 16,
        nist_level: 1,
        randomize: true,
        robust: false,
        sid_len: SID_LEN,
        hash: SpxHash::Shake,
        underlying: "SLH-DSA-SHAKE-128s",
        oid: [0x2b, 0xce, 0x0f, 0x06, 0x0d, 0x10],
    },
    AlgorithmProps {
        name: "SLH-DSA-MTL-SHAKE-128F",
        sec_param: 16,
        nist_level: 1,
        randomize: true,
        robust: false,
        sid_len: SID_LEN,
        hash: SpxHash::Shake,
        underlying: "SLH-DSA-SHAKE-128f",
        oid: [0x2b, 0xce, 0x0f, 0x06, 0x0d, 0x0d],
    },
    AlgorithmProps {
        name: "SLH-DSA-MTL-SHAKE-192S",
        sec_param: 24,
        nist_level: 3,
        randomize: true,
        robust: false,
        sid_len: SID_LEN,
        hash: SpxHash::Shake,
        underlying: "SLH-DSA-SHAKE-192s",
        oid: [0x2b, 0xce, 0x0f, 0x06, 0x0e, 0x0c],
    },
    AlgorithmProps {
        name: "SLH-DSA-MTL-SHAKE-192F",
        sec_param: 24,
        nist_level: 3,
        randomize: true,
        robust: false,
        sid_len: SID_LEN,
        hash: SpxHash::Shake,
        underlying: "SLH-DSA-SHAKE-192f",
        oid: [0x2b, 0xce, 0x0f, 0x06, 0x0e, 0x0a],
    },
    AlgorithmProps {
        name: "SLH-DSA-MTL-SHAKE-256S",
        sec_param: 32,
        nist_level: 5,
        randomize: true,
        robust: false,
        sid_len: SID_LEN,
        hash: SpxHash::Shake,
        underlying: "SLH-DSA-SHAKE-256s",
        oid: [0x2b, 0xce, 0x0f, 0x06, 0x0f, 0x0c],
    },
    AlgorithmProps {
        name: "SLH-DSA-MTL-SHAKE-256F",
        sec_param: 32,
        nist_level: 5,
        randomize: true,
        robust: false,
        sid_len: SID_LEN,
        hash: SpxHash::Shake,
        underlying: "SLH-DSA-SHAKE-256f",
        oid: [0x2b, 0xce, 0x0f, 0x06, 0x0f, 0x0a],
    },
    AlgorithmProps {
        name: "SLH-DSA-MTL-SHA2-128S",
        sec_param: 16,
        nist_level: 1,
        randomize: true,
        robust: false,
        sid_len: SID_LEN,
        hash: SpxHash::Sha2,
        underlying: "SLH-DSA-SHA2-128s",
        oid: [0x2b, 0xce, 0x0f, 0x06, 0x0a, 0x10],
    },
    AlgorithmProps {
        name: "SLH-DSA-MTL-SHA2-128F",
        sec_param: 16,
        nist_level: 1,
        randomize: true,
        robust: false,
        sid_len: SID_LEN,
        hash: SpxHash::Sha2,
        underlying: "SLH-DSA-SHA2-128f",
        oid: [0x2b, 0xce, 0x0f, 0x06, 0x0a, 0x0d],
    },
    AlgorithmProps {
        name: "SLH-DSA-MTL-SHA2-192S",
        sec_param: 24,
        nist_level: 3,
        randomize: true,
        robust: false,
        sid_len: SID_LEN,
        hash: SpxHash::Sha2,
        underlying: "SLH-DSA-SHA2-192s",
        oid: [0x2b, 0xce, 0x0f, 0x06, 0x0b, 0x0c],
    },
    AlgorithmProps {
        name: "SLH-DSA-MTL-SHA2-192F",
        sec_param: 24,
        nist_level: 3,
        randomize: true,
        robust: false,
        sid_len: SID_LEN,
        hash: SpxHash::Sha2,
        underlying: "SLH-DSA-SHA2-192f",
        oid: [0x2b, 0xce, 0x0f, 0x06, 0x0b, 0x0a],
    },
    AlgorithmProps {
        name: "SLH-DSA-MTL-SHA2-256S",
        sec_param: 32,
        nist_level: 5,
        randomize: true,
        robust: false,
        sid_len: SID_LEN,
        hash: SpxHash::Sha2,
        underlying: "SLH-DSA-SHA2-256s",
        oid: [0x2b, 0xce, 0x0f, 0x06, 0x0c, 0x0c],
    },
    AlgorithmProps {
        name: "SLH-DSA-MTL-SHA2-256F",
        sec_param: 32,
        nist_level: 5,
        randomize: true,
        robust: false,
        sid_len: SID_LEN,
        hash: SpxHash::Sha2,
        underlying: "SLH-DSA-SHA2-256f",
        oid: [0x2b, 0xce, 0x0f, 0x06, 0x0c, 0x0a],
    },
];

/// Look an algorithm up by its canonical name
pub fn algorithm_props(name: &str) -> MtlResult<&'static AlgorithmProps> {
    ALGORITHMS
        .iter()
        .find(|props| props.name == name)
        .ok_or_else(|| MtlError::BadAlgorithm(name.to_string()))
}

/// Names of every registered algorithm, in table order
pub fn registered_names() -> Vec<&'static str> {
    ALGORITHMS.iter().map(|props| props.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name() {
        let props = algorithm_props("SLH-DSA-MTL-SHAKE-128S").unwrap();
        assert_eq!(props.sec_param, 16);
        assert_eq!(props.hash, SpxHash::Shake);
        assert_eq!(props.oid, [0x2b, 0xce, 0x0f, 0x06, 0x0d, 0x10]);

        let props = algorithm_props("SLH-DSA-MTL-SHA2-256F").unwrap();
        assert_eq!(props.sec_param, 32);
        assert_eq!(props.hash, SpxHash::Sha2);
        assert_eq!(props.oid, [0x2b, 0xce, 0x0f, 0x06, 0x0c, 0x0a]);
    }

    #[test]
    fn unknown_name_is_bad_algorithm() {
        assert!(matches!(
            algorithm_props("SLH-DSA-MTL-SHA3-128S"),
            Err(MtlError::BadAlgorithm(_))
        ));
    }

    #[test]
    fn table_is_consistent() {
        assert_eq!(registered_names().len(), 12);
        for props in &ALGORITHMS {
            assert!(matches!(props.sec_param, 16 | 24 | 32));
            assert_eq!(props.sid_len, SID_LEN);
            assert!(!props.robust);
            assert_eq!(&props.oid[..4], &[0x2b, 0xce, 0x0f, 0x06]);
        }
    }
}
