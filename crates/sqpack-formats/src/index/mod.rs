//! Index files mapping logical paths to data-file locations
//!
//! A SqPack file set carries two independent hash tables over the same
//! stored files:
//!
//! - **`.index`**: 16-byte entries keyed by the directory and filename CRC32
//!   of the path
//! - **`.index2`**: 8-byte entries keyed by the CRC32 of the full path
//!
//! Both share one packed 32-bit location encoding ([`PackedLocation`]) and
//! one file layout: container header, [`IndexHeader`], then the table.
//!
//! # Example
//!
//! ```
//! use sqpack_formats::container::{BuildStamp, Platform};
//! use sqpack_formats::index::{IndexFile, IndexKind, IndexTable, Location};
//!
//! let mut table = IndexTable::new(IndexKind::Index2);
//! let key = IndexKind::Index2.key_for("exd/root.exl")?;
//! table.insert(key, Location::new(0, 2048))?;
//!
//! let file = IndexFile::new(table, 1, Platform::Win32, BuildStamp::new(20240131, 12345600));
//! let bytes = file.to_bytes()?;
//!
//! let parsed = IndexFile::parse(&bytes, IndexKind::Index2)?;
//! assert_eq!(parsed.table.get(key), Some(Location::new(0, 2048)));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod file;
mod header;
mod location;
mod table;

pub use error::{IndexError, IndexResult};
pub use file::IndexFile;
pub use header::{INDEX_HEADER_SIZE, IndexHeader, SideTable};
pub use location::{Location, MAX_DATA_FILE_ID, PackedLocation, STORED_FILE_ALIGNMENT};
pub use table::{Index2Entry, IndexEntry, IndexKind, IndexTable};
