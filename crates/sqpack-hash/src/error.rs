//! Error types for hashing operations

use thiserror::Error;

/// Errors that can occur while hashing logical paths
#[derive(Debug, Error)]
pub enum HashError {
    /// Path cannot be split into a directory and a filename
    #[error("Invalid path for hashing: {0:?}")]
    InvalidPath(String),
}

/// Result type for hashing operations
pub type HashResult<T> = Result<T, HashError>;
