//! Raw DEFLATE helpers

use super::error::{BlockError, BlockResult};
use flate2::Compression;
use flate2::read::{DeflateDecoder, DeflateEncoder};
use std::io::Read;

/// Highest accepted compression level
pub const MAX_COMPRESSION_LEVEL: u32 = 9;

/// Compression level used when none is configured
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Raw-DEFLATE `data` (no zlib or gzip framing)
pub fn deflate(data: &[u8], level: u32) -> BlockResult<Vec<u8>> {
    if level > MAX_COMPRESSION_LEVEL {
        return Err(BlockError::InvalidCompressionLevel(level));
    }
    let mut encoder = DeflateEncoder::new(data, Compression::new(level));
    let mut compressed = Vec::new();
    encoder
        .read_to_end(&mut compressed)
        .map_err(|e| BlockError::Compression(format!("deflate failed: {e}")))?;
    Ok(compressed)
}

/// Inflate raw-DEFLATE `data`, reading at most `limit + 1` bytes
///
/// The extra byte lets callers detect a stream that inflates past its
/// declared size without buffering the whole overrun.
pub fn inflate(data: &[u8], limit: usize) -> BlockResult<Vec<u8>> {
    let mut decoder = DeflateDecoder::new(data).take(limit as u64 + 1);
    let mut decompressed = Vec::with_capacity(limit);
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| BlockError::Compression(format!("inflate failed: {e}")))?;
    Ok(decompressed)
}
