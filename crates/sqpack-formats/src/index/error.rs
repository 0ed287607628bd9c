//! Index error types

use thiserror::Error;

/// Index-specific error type
#[derive(Debug, Error)]
pub enum IndexError {
    /// Container header problem
    #[error("container header: {0}")]
    Container(#[from] crate::container::ContainerError),

    /// Index header describes an impossible layout
    #[error("invalid index header: {0}")]
    InvalidHeader(String),

    /// Table region is not a whole number of entries
    #[error("invalid table size {size} for {entry_size}-byte entries")]
    InvalidTableSize {
        /// Table size in bytes
        size: usize,
        /// Entry size for this table kind
        entry_size: usize,
    },

    /// Stored-file offset cannot be packed (not 128-byte aligned)
    #[error("offset {0:#x} is not aligned to 128 bytes")]
    UnalignedOffset(u64),

    /// Stored-file offset is beyond what the packed word can address
    #[error("offset {0:#x} exceeds the addressable range")]
    OffsetOutOfRange(u64),

    /// Data file id does not fit the packed word
    #[error("data file id {0} exceeds the maximum of {max}", max = super::MAX_DATA_FILE_ID)]
    DataFileIdOutOfRange(u8),

    /// Binary parsing error
    #[error("binary parsing error: {0}")]
    BinRw(#[from] binrw::Error),
}

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;
