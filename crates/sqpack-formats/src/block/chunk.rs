//! Compressed chunk bodies

use binrw::{BinRead, BinWrite};
use std::io::Cursor;

use super::compression::{deflate, inflate};
use super::error::{BlockError, BlockResult};
use super::header::ChunkInfo;
use crate::index::STORED_FILE_ALIGNMENT;

/// Size of the header in front of each chunk's DEFLATE data
pub const CHUNK_HEADER_SIZE: usize = 16;

/// Largest raw slice stored in a single chunk
pub const MAX_CHUNK_SLICE: usize = 16_000;

/// Header in front of each chunk's DEFLATE data
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(big)]
pub struct ChunkHeader {
    /// Header size (always 16)
    pub header_size: u32,
    /// Reserved
    pub reserved: u32,
    /// Bytes of DEFLATE data following the header
    pub compressed_size: u32,
    /// Bytes the data inflates to
    pub uncompressed_size: u32,
}

/// Compress one raw slice into a padded chunk body
///
/// Returns the padded body and its chunk-info entry; the caller fills in the
/// relative offset.
pub fn encode_chunk(slice: &[u8], level: u32) -> BlockResult<(Vec<u8>, ChunkInfo)> {
    if slice.len() > MAX_CHUNK_SLICE {
        return Err(BlockError::InvalidSliceSize {
            size: slice.len(),
            max: MAX_CHUNK_SLICE,
        });
    }
    let compressed = deflate(slice, level)?;
    let header = ChunkHeader {
        header_size: CHUNK_HEADER_SIZE as u32,
        reserved: 0,
        compressed_size: compressed.len() as u32,
        uncompressed_size: slice.len() as u32,
    };

    let padded =
        (CHUNK_HEADER_SIZE + compressed.len()).next_multiple_of(STORED_FILE_ALIGNMENT as usize);
    let mut cursor = Cursor::new(Vec::with_capacity(padded));
    header.write(&mut cursor)?;
    let mut body = cursor.into_inner();
    body.extend_from_slice(&compressed);
    body.resize(padded, 0);

    let info = ChunkInfo {
        relative_offset: 0,
        compressed_size: u16::try_from(padded).map_err(|_| {
            BlockError::Compression(format!("chunk of {padded} bytes exceeds the table field"))
        })?,
        uncompressed_size: slice.len() as u16,
    };
    Ok((body, info))
}

/// Inflate the chunk starting at `data[0]` and check it against `info`
pub fn decode_chunk(data: &[u8], info: &ChunkInfo, index: usize) -> BlockResult<Vec<u8>> {
    if data.len() < CHUNK_HEADER_SIZE {
        return Err(BlockError::Truncated {
            expected: CHUNK_HEADER_SIZE,
            actual: data.len(),
        });
    }
    let header = ChunkHeader::read(&mut Cursor::new(&data[..CHUNK_HEADER_SIZE]))?;

    if header.compressed_size > u32::from(info.compressed_size) {
        return Err(BlockError::CorruptChunk {
            index,
            reason: format!(
                "compressed size {} exceeds the reserved {}",
                header.compressed_size, info.compressed_size
            ),
        });
    }
    if header.uncompressed_size != u32::from(info.uncompressed_size) {
        return Err(BlockError::CorruptChunk {
            index,
            reason: format!(
                "uncompressed size {} differs from the table's {}",
                header.uncompressed_size, info.uncompressed_size
            ),
        });
    }

    let end = CHUNK_HEADER_SIZE + header.compressed_size as usize;
    let payload = data.get(CHUNK_HEADER_SIZE..end).ok_or(BlockError::Truncated {
        expected: end,
        actual: data.len(),
    })?;

    let expected = usize::from(info.uncompressed_size);
    let inflated = inflate(payload, expected)?;
    if inflated.len() != expected {
        return Err(BlockError::CorruptChunk {
            index,
            reason: format!("inflated to {} bytes, expected {expected}", inflated.len()),
        });
    }
    Ok(inflated)
}
