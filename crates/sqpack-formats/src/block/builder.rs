//! Stored-file record builder

use super::chunk::{MAX_CHUNK_SLICE, encode_chunk};
use super::compression::{DEFAULT_COMPRESSION_LEVEL, MAX_COMPRESSION_LEVEL};
use super::error::{BlockError, BlockResult};
use super::header::FileInfoHeader;

/// Builder turning raw file bytes into a standard stored-file record
#[derive(Debug, Clone, Copy)]
pub struct StoredFileBuilder {
    level: u32,
    slice_size: usize,
}

impl Default for StoredFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StoredFileBuilder {
    /// Create a builder with level 6 and 16000-byte slices
    pub fn new() -> Self {
        Self {
            level: DEFAULT_COMPRESSION_LEVEL,
            slice_size: MAX_CHUNK_SLICE,
        }
    }

    /// Set the DEFLATE level (0-9)
    pub fn with_compression_level(mut self, level: u32) -> BlockResult<Self> {
        if level > MAX_COMPRESSION_LEVEL {
            return Err(BlockError::InvalidCompressionLevel(level));
        }
        self.level = level;
        Ok(self)
    }

    /// Set the raw slice size per chunk (1-16000 bytes)
    pub fn with_slice_size(mut self, size: usize) -> BlockResult<Self> {
        if !(1..=MAX_CHUNK_SLICE).contains(&size) {
            return Err(BlockError::InvalidSliceSize {
                size,
                max: MAX_CHUNK_SLICE,
            });
        }
        self.slice_size = size;
        Ok(self)
    }

    /// Configured compression level
    pub const fn compression_level(&self) -> u32 {
        self.level
    }

    /// Encode `data` into a record: file-info header then chunk bodies
    ///
    /// The result is a multiple of 128 bytes long. Empty input still
    /// produces one chunk.
    pub fn build(&self, data: &[u8]) -> BlockResult<Vec<u8>> {
        let raw_size = u32::try_from(data.len()).map_err(|_| BlockError::FileTooLarge(data.len()))?;

        let slices: Vec<&[u8]> = if data.is_empty() {
            vec![data]
        } else {
            data.chunks(self.slice_size).collect()
        };

        let mut bodies = Vec::new();
        let mut chunks = Vec::with_capacity(slices.len());
        for slice in slices {
            let (body, mut info) = encode_chunk(slice, self.level)?;
            info.relative_offset = bodies.len() as u32;
            bodies.extend_from_slice(&body);
            chunks.push(info);
        }

        let header = FileInfoHeader::standard(raw_size, chunks);
        let mut record = header.to_bytes()?;
        record.extend_from_slice(&bodies);
        Ok(record)
    }
}

/// Encode `data` with the default slice size at `level`
pub fn encode_stored_file(data: &[u8], level: u32) -> BlockResult<Vec<u8>> {
    StoredFileBuilder::new()
        .with_compression_level(level)?
        .build(data)
}
