//! Configuration for archive readers and writers

use crate::{Result, StorageError};
use serde::{Deserialize, Serialize};
use sqpack_formats::block::{DEFAULT_COMPRESSION_LEVEL, MAX_COMPRESSION_LEVEL};
use sqpack_formats::container::{BuildStamp, MAX_DATA_FILE_SIZE, PREAMBLE_SIZE, Platform};
use sqpack_formats::index::IndexKind;
use std::path::Path;

/// Configuration for archive readers and writers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// DEFLATE level (0-9) used by the writer
    pub compression_level: u32,

    /// Size at which the writer moves on to the next data file
    pub max_data_file_size: u64,

    /// Platform id written into container headers
    pub platform: Platform,

    /// Hash table consulted by `read_file` and `has_file`
    pub preferred_index: IndexKind,

    /// Fixed build date/time; the current time when unset
    pub build_stamp: Option<BuildStamp>,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            max_data_file_size: MAX_DATA_FILE_SIZE,
            platform: Platform::Win32,
            preferred_index: IndexKind::Index,
            build_stamp: None,
        }
    }
}

impl ArchiveConfig {
    /// Set the compression level
    #[must_use]
    pub const fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level;
        self
    }

    /// Set the data file roll-over size
    #[must_use]
    pub const fn with_max_data_file_size(mut self, size: u64) -> Self {
        self.max_data_file_size = size;
        self
    }

    /// Set the platform id
    #[must_use]
    pub const fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Set the hash table used for lookups
    #[must_use]
    pub const fn with_preferred_index(mut self, kind: IndexKind) -> Self {
        self.preferred_index = kind;
        self
    }

    /// Pin the build stamp for reproducible output
    #[must_use]
    pub const fn with_build_stamp(mut self, stamp: BuildStamp) -> Self {
        self.build_stamp = Some(stamp);
        self
    }

    /// Build stamp to write: the pinned one or the current time
    pub fn stamp(&self) -> BuildStamp {
        self.build_stamp.unwrap_or_else(BuildStamp::now)
    }

    /// Reject values the writer cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.compression_level > MAX_COMPRESSION_LEVEL {
            return Err(StorageError::Config(format!(
                "compression level {} exceeds {MAX_COMPRESSION_LEVEL}",
                self.compression_level
            )));
        }
        if self.max_data_file_size <= PREAMBLE_SIZE as u64 {
            return Err(StorageError::Config(format!(
                "max data file size {} leaves no room after the {PREAMBLE_SIZE}-byte preamble",
                self.max_data_file_size
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| StorageError::Config(format!("invalid JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::from_json(&text)
    }
}
