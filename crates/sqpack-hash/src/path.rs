//! Path hashing for the `.index` and `.index2` hash tables
//!
//! Both tables address a logical path by the CRC32 of its lowercased form.
//! `.index` splits the path at the last `/` and hashes the directory and the
//! filename separately; `.index2` hashes the whole path.
//!
//! The checksum is the reflected CRC32 (polynomial `0xEDB88320`, initial
//! accumulator `0xFFFFFFFF`) *without* the customary final inversion, so the
//! hash of the empty input is `0xFFFFFFFF` rather than `0`.

use crate::error::{HashError, HashResult};
use std::fmt;

/// Compute the container CRC32 of `data`
///
/// # Examples
///
/// ```
/// use sqpack_hash::crc32;
///
/// assert_eq!(crc32(b""), 0xFFFF_FFFF);
/// assert_eq!(crc32(b"test"), 0x2780_81F3);
/// ```
pub fn crc32(data: &[u8]) -> u32 {
    // crc32fast finishes with `!acc`; undo it to keep the raw accumulator
    !crc32fast::hash(data)
}

/// Lowercase a logical path the way the hash tables expect
pub fn normalize_path(path: &str) -> String {
    path.to_lowercase()
}

/// Directory and filename hashes of a logical path (`.index` key)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexHash {
    /// CRC32 of the lowercased directory part
    pub dir_hash: u32,
    /// CRC32 of the lowercased filename part
    pub file_hash: u32,
}

impl IndexHash {
    /// Create from raw components
    pub const fn new(dir_hash: u32, file_hash: u32) -> Self {
        Self {
            dir_hash,
            file_hash,
        }
    }

    /// Combined 64-bit table key: directory hash in the high word
    pub const fn key(&self) -> u64 {
        ((self.dir_hash as u64) << 32) | self.file_hash as u64
    }

    /// Split a combined 64-bit key back into its components
    pub const fn from_key(key: u64) -> Self {
        Self {
            dir_hash: (key >> 32) as u32,
            file_hash: key as u32,
        }
    }
}

impl fmt::Display for IndexHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}/{:08x}", self.dir_hash, self.file_hash)
    }
}

/// Hash a logical path for the `.index` table
///
/// The path is lowercased and split at its last `/`. A path without a
/// directory component, or one that ends in `/`, cannot be addressed.
pub fn index_hash(path: &str) -> HashResult<IndexHash> {
    let lowered = normalize_path(path);
    let (dir, file) = lowered
        .rsplit_once('/')
        .ok_or_else(|| HashError::InvalidPath(path.to_string()))?;

    if file.is_empty() {
        return Err(HashError::InvalidPath(path.to_string()));
    }

    Ok(IndexHash {
        dir_hash: crc32(dir.as_bytes()),
        file_hash: crc32(file.as_bytes()),
    })
}

/// Hash a logical path for the `.index2` table
pub fn index2_hash(path: &str) -> u32 {
    crc32(normalize_path(path).as_bytes())
}
