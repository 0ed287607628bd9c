//! Async access to SqPack file sets on local disk
//!
//! A file set is identified by a path prefix `P` and consists of:
//!
//! - `P.index`: directory + filename hash table
//! - `P.index2`: full-path hash table
//! - `P.dat0` .. `P.dat3`: data files holding the stored records
//!
//! [`ArchiveWriter`] appends compressed records and writes both hash tables
//! on close. [`ArchiveReader`] loads both tables at open time and reads
//! records on demand, opening each data file at most once. [`SheetReader`]
//! and [`SheetWriter`] layer the sheet formats on top.
//!
//! # Example
//!
//! ```no_run
//! use sqpack_storage::{ArchiveConfig, ArchiveReader, ArchiveWriter};
//!
//! # async fn example() -> sqpack_storage::Result<()> {
//! let mut writer = ArchiveWriter::create("out/0a0000.win32", ArchiveConfig::default()).await?;
//! writer.add_file("exd/root.exl", b"EXLT,2").await?;
//! let summary = writer.close().await?;
//! println!("wrote {} files", summary.file_count);
//!
//! let reader = ArchiveReader::open("out/0a0000.win32").await?;
//! assert_eq!(reader.read_file("exd/root.exl").await?.as_deref(), Some(&b"EXLT,2"[..]));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod config;
pub mod reader;
pub mod sheets;
pub mod writer;

pub use config::ArchiveConfig;
pub use reader::ArchiveReader;
pub use sheets::{SheetReader, SheetWriter};
pub use writer::{ArchiveSummary, ArchiveWriter, DataFileSummary};

pub use sqpack_formats::index::{IndexKind, Location};

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Path could not be hashed.
    #[error("Hash error: {0}")]
    Hash(#[from] sqpack_hash::HashError),

    /// Container header error.
    #[error("Container error: {0}")]
    Container(#[from] sqpack_formats::container::ContainerError),

    /// Index file error.
    #[error("Index error: {0}")]
    Index(#[from] sqpack_formats::index::IndexError),

    /// Stored record error.
    #[error("Block error: {0}")]
    Block(#[from] sqpack_formats::block::BlockError),

    /// Sheet format error.
    #[error("Sheet error: {0}")]
    Sheet(#[from] sqpack_formats::sheet::SheetError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Path already written to this archive.
    #[error("Duplicate path: {0}")]
    DuplicatePath(String),

    /// Append position or record length not on a 128-byte boundary.
    #[error("Misaligned append: offset {offset:#x}, length {length}")]
    Misaligned {
        /// Append offset
        offset: u64,
        /// Record length
        length: usize,
    },

    /// Every addressable data file is full.
    #[error("Data file limit reached: at most {max} data files")]
    DataFileLimit {
        /// Number of addressable data files
        max: usize,
    },
}

/// File names of one file set, derived from its path prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSetPaths {
    prefix: PathBuf,
}

impl FileSetPaths {
    /// Create from a prefix such as `sqpack/ffxiv/0a0000.win32`.
    pub fn new(prefix: impl AsRef<Path>) -> Self {
        Self {
            prefix: prefix.as_ref().to_path_buf(),
        }
    }

    /// Path prefix.
    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    fn with_suffix(&self, suffix: &str) -> PathBuf {
        let mut name = self.prefix.clone().into_os_string();
        name.push(".");
        name.push(suffix);
        PathBuf::from(name)
    }

    /// `P.index` or `P.index2`.
    pub fn index(&self, kind: IndexKind) -> PathBuf {
        self.with_suffix(kind.extension())
    }

    /// `P.dat{id}`.
    pub fn data(&self, data_file_id: u8) -> PathBuf {
        self.with_suffix(&format!("dat{data_file_id}"))
    }
}
