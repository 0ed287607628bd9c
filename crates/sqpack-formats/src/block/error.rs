//! Stored-file block error types

use super::header::StoredFileKind;
use thiserror::Error;

/// Block-specific error type
#[derive(Debug, Error)]
pub enum BlockError {
    /// Unknown stored-file kind value
    #[error("invalid stored-file kind: {0}")]
    InvalidKind(u32),

    /// Known kind this codec does not handle
    #[error("unsupported stored-file kind: {0:?}")]
    UnsupportedKind(StoredFileKind),

    /// File-info header describes an impossible layout
    #[error("invalid file-info header: {0}")]
    InvalidHeader(String),

    /// Record ends before a structure it declares
    #[error("truncated record: need {expected} bytes, got {actual}")]
    Truncated {
        /// Bytes required
        expected: usize,
        /// Bytes available
        actual: usize,
    },

    /// Chunk header or payload disagrees with the chunk table
    #[error("corrupt chunk {index}: {reason}")]
    CorruptChunk {
        /// Chunk position in the chunk table
        index: usize,
        /// What did not match
        reason: String,
    },

    /// Decoded length differs from the declared raw size
    #[error("size mismatch: header declares {expected} bytes, decoded {actual}")]
    SizeMismatch {
        /// Raw size from the file-info header
        expected: usize,
        /// Bytes actually produced
        actual: usize,
    },

    /// Compression level outside 0..=9
    #[error("invalid compression level {0} (expected 0-9)")]
    InvalidCompressionLevel(u32),

    /// Slice size outside the chunk limits
    #[error("invalid slice size: {size} bytes (must be between 1 and {max} bytes)")]
    InvalidSliceSize {
        /// The rejected size
        size: usize,
        /// Largest allowed slice
        max: usize,
    },

    /// Input does not fit the 32-bit raw size field
    #[error("file of {0} bytes is too large to store")]
    FileTooLarge(usize),

    /// Compression/decompression error
    #[error("compression error: {0}")]
    Compression(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Binary parsing error
    #[error("binary parsing error: {0}")]
    BinRw(#[from] binrw::Error),
}

/// Result type for block operations
pub type BlockResult<T> = Result<T, BlockError>;
