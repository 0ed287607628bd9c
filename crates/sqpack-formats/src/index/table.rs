//! `.index` and `.index2` hash tables

use super::error::{IndexError, IndexResult};
use super::location::{Location, PackedLocation};
use binrw::{BinRead, BinWrite};
use serde::{Deserialize, Serialize};
use sqpack_hash::{HashResult, IndexHash, index_hash, index2_hash};
use std::collections::HashMap;
use std::io::Cursor;

/// Which of the two hash tables an operation targets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    /// Directory + filename hashes, 16-byte entries
    #[default]
    Index,
    /// Full-path hash, 8-byte entries
    Index2,
}

impl IndexKind {
    /// Size of one table entry
    pub const fn entry_size(self) -> usize {
        match self {
            Self::Index => 16,
            Self::Index2 => 8,
        }
    }

    /// File extension used for this table
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Index2 => "index2",
        }
    }

    /// Table key for a logical path
    ///
    /// Fails with [`sqpack_hash::HashError::InvalidPath`] when an `.index`
    /// key is requested for a path without a directory.
    pub fn key_for(self, path: &str) -> HashResult<u64> {
        match self {
            Self::Index => Ok(index_hash(path)?.key()),
            Self::Index2 => Ok(u64::from(index2_hash(path))),
        }
    }
}

/// 16-byte `.index` entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct IndexEntry {
    /// CRC32 of the filename
    pub file_hash: u32,
    /// CRC32 of the directory
    pub dir_hash: u32,
    /// Packed location word
    #[br(map = PackedLocation)]
    #[bw(map = |l: &PackedLocation| l.raw())]
    pub location: PackedLocation,
    /// Reserved, written as zero
    pub reserved: u32,
}

impl IndexEntry {
    /// Combined 64-bit key
    pub const fn key(&self) -> u64 {
        IndexHash::new(self.dir_hash, self.file_hash).key()
    }
}

/// 8-byte `.index2` entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct Index2Entry {
    /// CRC32 of the full path
    pub path_hash: u32,
    /// Packed location word
    #[br(map = PackedLocation)]
    #[bw(map = |l: &PackedLocation| l.raw())]
    pub location: PackedLocation,
}

/// Hash → location map in insertion order
///
/// Keys are the combined 64-bit hash for `.index` and the zero-extended
/// 32-bit hash for `.index2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexTable {
    kind: IndexKind,
    order: Vec<u64>,
    entries: HashMap<u64, PackedLocation>,
    duplicates: usize,
}

impl IndexTable {
    /// Create an empty table
    pub fn new(kind: IndexKind) -> Self {
        Self {
            kind,
            order: Vec::new(),
            entries: HashMap::new(),
            duplicates: 0,
        }
    }

    /// Table kind
    pub const fn kind(&self) -> IndexKind {
        self.kind
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Entries that repeated an earlier key while parsing
    pub const fn duplicate_count(&self) -> usize {
        self.duplicates
    }

    /// Whether `key` is present
    pub fn contains(&self, key: u64) -> bool {
        self.entries.contains_key(&key)
    }

    /// Decoded location for `key`
    pub fn get(&self, key: u64) -> Option<Location> {
        self.entries.get(&key).map(|packed| packed.location())
    }

    /// Raw packed word for `key`
    pub fn get_packed(&self, key: u64) -> Option<PackedLocation> {
        self.entries.get(&key).copied()
    }

    /// Insert a location, returning the previous one for the same key
    ///
    /// A replaced key keeps its original position in the output order.
    pub fn insert(&mut self, key: u64, location: Location) -> IndexResult<Option<Location>> {
        let packed = location.pack()?;
        Ok(self.insert_packed(key, packed).map(PackedLocation::location))
    }

    fn insert_packed(&mut self, key: u64, packed: PackedLocation) -> Option<PackedLocation> {
        let previous = self.entries.insert(key, packed);
        if previous.is_none() {
            self.order.push(key);
        }
        previous
    }

    /// Iterate `(key, location)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (u64, Location)> + '_ {
        self.order
            .iter()
            .filter_map(|key| self.entries.get(key).map(|p| (*key, p.location())))
    }

    /// Parse a table region entry by entry; the last duplicate wins
    pub fn parse(kind: IndexKind, data: &[u8]) -> IndexResult<Self> {
        let entry_size = kind.entry_size();
        if data.len() % entry_size != 0 {
            return Err(IndexError::InvalidTableSize {
                size: data.len(),
                entry_size,
            });
        }

        let mut table = Self::new(kind);
        let mut cursor = Cursor::new(data);
        for _ in 0..data.len() / entry_size {
            let (key, packed) = match kind {
                IndexKind::Index => {
                    let entry = IndexEntry::read(&mut cursor)?;
                    (entry.key(), entry.location)
                }
                IndexKind::Index2 => {
                    let entry = Index2Entry::read(&mut cursor)?;
                    (u64::from(entry.path_hash), entry.location)
                }
            };
            if table.insert_packed(key, packed).is_some() {
                table.duplicates += 1;
            }
        }

        Ok(table)
    }

    /// Serialize all entries in insertion order
    pub fn build(&self) -> IndexResult<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::with_capacity(self.len() * self.kind.entry_size()));
        for key in &self.order {
            let Some(&location) = self.entries.get(key) else {
                continue;
            };
            match self.kind {
                IndexKind::Index => {
                    let hash = IndexHash::from_key(*key);
                    IndexEntry {
                        file_hash: hash.file_hash,
                        dir_hash: hash.dir_hash,
                        location,
                        reserved: 0,
                    }
                    .write(&mut cursor)?;
                }
                IndexKind::Index2 => {
                    Index2Entry {
                        path_hash: *key as u32,
                        location,
                    }
                    .write(&mut cursor)?;
                }
            }
        }
        Ok(cursor.into_inner())
    }
}
