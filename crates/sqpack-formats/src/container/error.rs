//! Container header error types

use thiserror::Error;

/// Container-specific error type
#[derive(Debug, Error)]
pub enum ContainerError {
    /// Magic bytes do not match `SqPack\0\0`
    #[error("invalid container magic: expected [53 71 50 61 63 6B 00 00], got {0:02X?}")]
    InvalidMagic([u8; 8]),

    /// Not enough bytes for a full header
    #[error("truncated header: need {expected} bytes, got {actual}")]
    Truncated {
        /// Bytes required
        expected: usize,
        /// Bytes available
        actual: usize,
    },

    /// Unknown file kind value
    #[error("invalid file kind: {0}")]
    InvalidFileKind(u32),

    /// Unknown platform id
    #[error("invalid platform id: {0}")]
    InvalidPlatform(u8),

    /// File kind differs from what the caller expected
    #[error("unexpected file kind: expected {expected:?}, got {actual:?}")]
    UnexpectedFileKind {
        /// Kind the caller asked for
        expected: super::FileKind,
        /// Kind found in the header
        actual: super::FileKind,
    },

    /// Binary parsing error
    #[error("binary parsing error: {0}")]
    BinRw(#[from] binrw::Error),
}

/// Result type for container operations
pub type ContainerResult<T> = Result<T, ContainerError>;
