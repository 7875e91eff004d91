//! Paged Node Set Storage
//!
//! A node series stores every leaf, internal, and randomizer hash in two
//! parallel sparse page planes. Pages are allocated lazily on first write
//! and persist for the life of the context; fetches hand out owned copies
//! so callers never hold references into growable storage.

use crate::bits;
use crate::error::{MtlError, MtlResult};

/// Maximum pages per plane
pub const TREE_MAX_PAGES: usize = 8192;
/// Page size in bytes
pub const TREE_PAGE_SIZE: usize = 1_048_576;
/// Maximum length of a series identifier in bytes
pub const MAX_SID_LEN: usize = 64;
/// Maximum hash (and seed, and randomizer) length in bytes
pub const MAX_HASH_LEN: usize = 64;

/// Series identifier binding one node series to one underlying keypair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesId {
    bytes: Vec<u8>,
}

impl SeriesId {
    /// Wrap existing identifier bytes (at most 64)
    pub fn new(bytes: &[u8]) -> MtlResult<Self> {
        if bytes.is_empty() || bytes.len() > MAX_SID_LEN {
            return Err(MtlError::BadValue(format!(
                "series id length {} out of range",
                bytes.len()
            )));
        }
        Ok(Self {
            bytes: bytes.to_vec(),
        })
    }

    /// Sample a fresh identifier of `len` bytes from the system CSPRNG
    pub fn random(len: usize) -> MtlResult<Self> {
        use rand::RngCore;
        if len == 0 || len > MAX_SID_LEN {
            return Err(MtlError::BadValue(format!(
                "series id length {} out of range",
                len
            )));
        }
        let mut bytes = vec![0u8; len];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Seed carrying the underlying-scheme public seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed {
    bytes: Vec<u8>,
}

impl Seed {
    /// Wrap existing seed bytes (at most 64)
    pub fn new(bytes: &[u8]) -> MtlResult<Self> {
        if bytes.is_empty() || bytes.len() > MAX_HASH_LEN {
            return Err(MtlError::BadValue(format!(
                "seed length {} out of range",
                bytes.len()
            )));
        }
        Ok(Self {
            bytes: bytes.to_vec(),
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// One sparse page plane
struct PagePlane {
    pages: Vec<Option<Box<[u8]>>>,
}

impl PagePlane {
    fn new() -> Self {
        Self { pages: Vec::new() }
    }

    /// Write `data` at byte offset `addr`, allocating pages on demand.
    /// Hash sizes that do not divide the page size produce entries
    /// straddling a page boundary; the write is split accordingly.
    fn write(&mut self, addr: u64, data: &[u8]) -> MtlResult<()> {
        let mut addr = addr;
        let mut data = data;
        while !data.is_empty() {
            let page = (addr / TREE_PAGE_SIZE as u64) as usize;
            let offset = (addr % TREE_PAGE_SIZE as u64) as usize;
            let chunk = data.len().min(TREE_PAGE_SIZE - offset);

            if page >= TREE_MAX_PAGES {
                log::error!("tree entry out of range (page {})", page);
                return Err(MtlError::ResourceFail(format!(
                    "page {} exceeds the per-plane cap",
                    page
                )));
            }
            if self.pages.len() <= page {
                self.pages.resize_with(page + 1, || None);
            }
            let buffer = self.pages[page]
                .get_or_insert_with(|| vec![0u8; TREE_PAGE_SIZE].into_boxed_slice());
            buffer[offset..offset + chunk].copy_from_slice(&data[..chunk]);

            addr += chunk as u64;
            data = &data[chunk..];
        }
        Ok(())
    }

    /// Read `len` bytes at byte offset `addr`, or None when any page
    /// involved was never written
    fn read(&self, addr: u64, len: usize) -> Option<Vec<u8>> {
        let mut out = Vec::with_capacity(len);
        let mut addr = addr;
        let mut remaining = len;
        while remaining > 0 {
            let page = (addr / TREE_PAGE_SIZE as u64) as usize;
            let offset = (addr % TREE_PAGE_SIZE as u64) as usize;
            let chunk = remaining.min(TREE_PAGE_SIZE - offset);

            let buffer = self.pages.get(page)?.as_ref()?;
            out.extend_from_slice(&buffer[offset..offset + chunk]);

            addr += chunk as u64;
            remaining -= chunk;
        }
        Some(out)
    }
}

/// Persistent store of node hashes and leaf randomizers for one series
pub struct NodeSet {
    leaf_count: u32,
    hash_size: usize,
    tree: PagePlane,
    randomizers: PagePlane,
}

impl NodeSet {
    /// Initialize an empty node set for hashes of `hash_size` bytes
    pub fn new(hash_size: usize) -> MtlResult<Self> {
        if hash_size == 0 || hash_size > MAX_HASH_LEN {
            return Err(MtlError::BadParam(format!(
                "hash size {} out of range",
                hash_size
            )));
        }
        Ok(Self {
            leaf_count: 0,
            hash_size,
            tree: PagePlane::new(),
            randomizers: PagePlane::new(),
        })
    }

    /// Count of leaves covered by this node set; monotone non-decreasing
    pub fn leaf_count(&self) -> u32 {
        self.leaf_count
    }

    /// Hash size in bytes for every stored node
    pub fn hash_size(&self) -> usize {
        self.hash_size
    }

    /// Insert the hash for the subtree `(left, right)`.
    ///
    /// Inserting node `(l, r)` advances the leaf count to `r + 1` when it
    /// exceeds the current value; lower nodes are assumed to be added
    /// atomically with their leaves.
    pub fn insert(&mut self, left: u32, right: u32, hash: &[u8]) -> MtlResult<()> {
        if hash.len() != self.hash_size {
            return Err(MtlError::BadParam(format!(
                "hash length {} does not match node set hash size {}",
                hash.len(),
                self.hash_size
            )));
        }
        let id = bits::node_id(left, right).map_err(|_| {
            log::error!("attempted to insert invalid node ({}, {})", left, right);
            MtlError::BadParam(format!("invalid subtree ({}, {})", left, right))
        })?;

        self.tree
            .write(u64::from(id) * self.hash_size as u64, hash)?;
        self.leaf_count = self.leaf_count.max(right + 1);
        Ok(())
    }

    /// Insert the randomizer bound to `leaf` on the randomizer plane
    pub fn insert_randomizer(&mut self, leaf: u32, randomizer: &[u8]) -> MtlResult<()> {
        if randomizer.len() != self.hash_size {
            return Err(MtlError::BadParam(format!(
                "randomizer length {} does not match node set hash size {}",
                randomizer.len(),
                self.hash_size
            )));
        }
        // Leaf pairs only
        bits::node_id(leaf, leaf).map_err(|_| {
            log::error!("attempted to insert randomizer for invalid leaf {}", leaf);
            MtlError::BadParam(format!("invalid leaf index {}", leaf))
        })?;

        self.randomizers
            .write(u64::from(leaf) * self.hash_size as u64, randomizer)
    }

    /// Fetch an owned copy of the hash stored for `(left, right)`.
    ///
    /// Internal nodes are only fetchable once every descendant leaf has
    /// been inserted.
    pub fn fetch(&self, left: u32, right: u32) -> MtlResult<Vec<u8>> {
        let id = bits::node_id(left, right)?;
        if right >= self.leaf_count {
            log::error!("attempted fetch of ({}, {}) before insert", left, right);
            return Err(MtlError::BadParam(format!(
                "attempted fetch of ({}, {}) before insert",
                left, right
            )));
        }
        self.tree
            .read(u64::from(id) * self.hash_size as u64, self.hash_size)
            .ok_or_else(|| {
                log::error!("attempted fetch of ({}, {}) before insert", left, right);
                MtlError::BadParam(format!(
                    "attempted fetch of ({}, {}) before insert",
                    left, right
                ))
            })
    }

    /// Fetch an owned copy of the randomizer bound to `leaf`
    pub fn randomizer(&self, leaf: u32) -> MtlResult<Vec<u8>> {
        bits::node_id(leaf, leaf)?;
        // Leaves and their randomizers are inserted together
        if leaf >= self.leaf_count {
            log::error!("attempted fetch of randomizer {} before insert", leaf);
            return Err(MtlError::BadParam(format!(
                "attempted fetch of randomizer {} before insert",
                leaf
            )));
        }
        self.randomizers
            .read(u64::from(leaf) * self.hash_size as u64, self.hash_size)
            .ok_or_else(|| {
                MtlError::BadParam(format!(
                    "attempted fetch of randomizer {} before insert",
                    leaf
                ))
            })
    }
}
