//! Hashing primitives for SqPack containers
//!
//! This crate provides the two hash families the container format relies on:
//!
//! - **Path hashing**: a CRC32 variant used to address logical files in the
//!   `.index` (directory + filename) and `.index2` (full path) hash tables
//! - **Header digests**: SHA-1 digests stored in zero-padded 64-byte fields at
//!   the end of every 1024-byte container, index and data header
//!
//! # Examples
//!
//! ```
//! use sqpack_hash::{crc32, index_hash, index2_hash};
//!
//! assert_eq!(crc32(b"test"), 0x278081F3);
//!
//! let hash = index_hash("exd/root.exl").expect("path has a directory");
//! assert_eq!(hash.dir_hash, 0xE39B7999);
//! assert_eq!(hash.file_hash, 0x51B57EBC);
//!
//! assert_eq!(index2_hash("EXD/Root.exl"), 0x3E16266C);
//! ```

#![warn(missing_docs)]

pub mod digest;
pub mod error;
pub mod path;

pub use digest::{DIGEST_FIELD_SIZE, Sha1Digest, seal_header, sha1_field};
pub use error::{HashError, HashResult};
pub use path::{IndexHash, crc32, index_hash, index2_hash, normalize_path};
