//! Container header shared by every file of a SqPack file set
//!
//! Each `.index`, `.index2` and `.datN` file starts with a fixed 1024-byte
//! little-endian header identifying the file kind and build stamp. Data files
//! follow it with a second 1024-byte [`DataHeader`] describing the payload.
//!
//! ```text
//! .index / .index2             .datN
//! +------------------+         +------------------+  0x000
//! | ContainerHeader  |         | ContainerHeader  |
//! +------------------+         +------------------+  0x400
//! | IndexHeader      |         | DataHeader       |
//! +------------------+         +------------------+  0x800
//! | hash table       |         | stored files ... |
//! +------------------+         +------------------+
//! ```
//!
//! The trailing SHA-1 of each header is written but never checked on read;
//! only the magic is validated.

mod data_header;
mod error;
mod header;

pub use data_header::{DATA_HEADER_SIZE, DataHeader, MAX_DATA_FILE_SIZE};
pub use error::{ContainerError, ContainerResult};
pub use header::{
    BuildStamp, CONTAINER_HEADER_SIZE, ContainerHeader, FileKind, Platform, SQPACK_MAGIC,
};

/// Offset of the first payload byte in index and data files
pub const PREAMBLE_SIZE: usize = CONTAINER_HEADER_SIZE + DATA_HEADER_SIZE;
