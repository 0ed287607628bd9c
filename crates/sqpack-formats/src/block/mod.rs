//! Stored-file records inside `.datN` files
//!
//! Each logical file is stored as one record at a 128-byte aligned offset:
//!
//! ```text
//! +---------------------------+
//! | FileInfoHeader            |  header_size bytes (multiple of 128)
//! |   fixed fields            |
//! |   chunk table             |
//! +---------------------------+
//! | chunk 0: ChunkHeader      |  16 bytes
//! |          DEFLATE data     |
//! |          zero padding     |  up to the next 128-byte boundary
//! +---------------------------+
//! | chunk 1 ...               |
//! +---------------------------+
//! ```
//!
//! Every field in a record is big-endian. Chunks hold at most 16000 raw
//! bytes and are compressed independently with raw DEFLATE.
//!
//! # Example
//!
//! ```
//! use sqpack_formats::block::{decode_stored_file, encode_stored_file};
//!
//! let data = vec![7u8; 40_000];
//! let record = encode_stored_file(&data, 6)?;
//! assert_eq!(record.len() % 128, 0);
//! assert_eq!(decode_stored_file(&record)?, data);
//! # Ok::<(), sqpack_formats::block::BlockError>(())
//! ```

mod builder;
mod chunk;
mod compression;
mod error;
mod header;

pub use builder::{StoredFileBuilder, encode_stored_file};
pub use chunk::{CHUNK_HEADER_SIZE, ChunkHeader, MAX_CHUNK_SLICE, decode_chunk, encode_chunk};
pub use compression::{DEFAULT_COMPRESSION_LEVEL, MAX_COMPRESSION_LEVEL, deflate, inflate};
pub use error::{BlockError, BlockResult};
pub use header::{CHUNK_INFO_SIZE, CHUNK_TABLE_OFFSET, ChunkInfo, FileInfoHeader, StoredFileKind};

/// Decode a complete stored-file record
///
/// `record` starts at the file-info header and must extend at least to the
/// end of the last chunk.
pub fn decode_stored_file(record: &[u8]) -> BlockResult<Vec<u8>> {
    let header = FileInfoHeader::from_bytes(record)?;
    decode_with_header(&header, record)
}

/// Decode a record whose header has already been parsed
pub fn decode_with_header(header: &FileInfoHeader, record: &[u8]) -> BlockResult<Vec<u8>> {
    match header.kind()? {
        StoredFileKind::Standard => {}
        StoredFileKind::Empty => return Ok(Vec::new()),
        other => return Err(BlockError::UnsupportedKind(other)),
    }

    let base = header.header_size as usize;
    let capacity = (header.raw_size as usize).min(header.chunks.len() * MAX_CHUNK_SLICE);
    let mut output = Vec::with_capacity(capacity);
    for (index, info) in header.chunks.iter().enumerate() {
        let start = base + info.relative_offset as usize;
        let chunk = record.get(start..).ok_or(BlockError::Truncated {
            expected: start,
            actual: record.len(),
        })?;
        output.extend_from_slice(&decode_chunk(chunk, info, index)?);
    }

    if output.len() != header.raw_size as usize {
        return Err(BlockError::SizeMismatch {
            expected: header.raw_size as usize,
            actual: output.len(),
        });
    }
    Ok(output)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn noisy(len: usize, seed: u64) -> Vec<u8> {
        let mut rng = fastrand::Rng::with_seed(seed);
        (0..len).map(|_| rng.u8(..)).collect()
    }

    #[test]
    fn test_single_chunk_round_trip() {
        let data = b"exd/root.exl contents".to_vec();
        let record = encode_stored_file(&data, 6).expect("encode");
        let header = FileInfoHeader::from_bytes(&record).expect("header");
        assert_eq!(header.kind().unwrap(), StoredFileKind::Standard);
        assert_eq!(header.raw_size, data.len() as u32);
        assert_eq!(header.chunks.len(), 1);
        assert_eq!(header.record_size(), record.len());
        assert_eq!(decode_stored_file(&record).expect("decode"), data);
    }

    #[test]
    fn test_multi_chunk_round_trip() {
        let data = noisy(40_000, 7);
        let record = encode_stored_file(&data, 6).expect("encode");
        let header = FileInfoHeader::from_bytes(&record).expect("header");

        let sizes: Vec<u16> = header.chunks.iter().map(|c| c.uncompressed_size).collect();
        assert_eq!(sizes, vec![16_000, 16_000, 8_000]);

        let mut expected_offset = 0;
        for chunk in &header.chunks {
            assert_eq!(chunk.relative_offset, expected_offset);
            assert_eq!(u32::from(chunk.compressed_size) % 128, 0);
            expected_offset += u32::from(chunk.compressed_size);
        }
        assert_eq!(header.used_blocks * 128, expected_offset);
        assert_eq!(record.len(), header.header_size as usize + expected_offset as usize);

        assert_eq!(decode_stored_file(&record).expect("decode"), data);
    }

    #[test]
    fn test_exact_slice_boundary() {
        let data = noisy(MAX_CHUNK_SLICE * 2, 3);
        let record = encode_stored_file(&data, 1).expect("encode");
        let header = FileInfoHeader::from_bytes(&record).expect("header");
        assert_eq!(header.chunks.len(), 2);
        assert_eq!(decode_stored_file(&record).expect("decode"), data);
    }

    #[test]
    fn test_empty_file_has_one_chunk() {
        let record = encode_stored_file(&[], 6).expect("encode");
        let header = FileInfoHeader::from_bytes(&record).expect("header");
        assert_eq!(header.raw_size, 0);
        assert_eq!(header.chunks.len(), 1);
        assert_eq!(header.chunks[0].uncompressed_size, 0);
        assert_eq!(record.len(), 256);
        assert!(decode_stored_file(&record).expect("decode").is_empty());
    }

    #[test]
    fn test_custom_slice_size() {
        let data = noisy(1000, 11);
        let record = StoredFileBuilder::new()
            .with_slice_size(300)
            .expect("slice size")
            .build(&data)
            .expect("encode");
        let header = FileInfoHeader::from_bytes(&record).expect("header");
        assert_eq!(header.chunks.len(), 4);
        assert_eq!(decode_stored_file(&record).expect("decode"), data);

        assert!(StoredFileBuilder::new().with_slice_size(0).is_err());
        assert!(StoredFileBuilder::new().with_slice_size(16_001).is_err());
    }

    #[test]
    fn test_corrupt_chunk_detected() {
        let data = noisy(20_000, 5);
        let mut record = encode_stored_file(&data, 6).expect("encode");
        let header = FileInfoHeader::from_bytes(&record).expect("header");

        // Claim more compressed bytes than chunk 1 reserves
        let chunk = header.header_size as usize + header.chunks[1].relative_offset as usize;
        let oversized = u32::from(header.chunks[1].compressed_size) + 1;
        record[chunk + 8..chunk + 12].copy_from_slice(&oversized.to_be_bytes());

        assert!(matches!(
            decode_stored_file(&record),
            Err(BlockError::CorruptChunk { index: 1, .. })
        ));
    }

    #[test]
    fn test_size_mismatch_detected() {
        let data = noisy(5_000, 9);
        let mut record = encode_stored_file(&data, 6).expect("encode");
        record[8..12].copy_from_slice(&5_001u32.to_be_bytes());

        assert!(matches!(
            decode_stored_file(&record),
            Err(BlockError::SizeMismatch {
                expected: 5_001,
                actual: 5_000
            })
        ));
    }

    #[test]
    fn test_other_kinds() {
        let mut record = encode_stored_file(b"model", 6).expect("encode");
        record[4..8].copy_from_slice(&3u32.to_be_bytes());
        assert!(matches!(
            decode_stored_file(&record),
            Err(BlockError::UnsupportedKind(StoredFileKind::Model))
        ));

        record[4..8].copy_from_slice(&1u32.to_be_bytes());
        assert!(decode_stored_file(&record).expect("empty kind").is_empty());

        record[4..8].copy_from_slice(&7u32.to_be_bytes());
        assert!(matches!(
            decode_stored_file(&record),
            Err(BlockError::InvalidKind(7))
        ));
    }

    #[test]
    fn test_truncated_record() {
        let record = encode_stored_file(&noisy(3_000, 1), 6).expect("encode");
        assert!(matches!(
            decode_stored_file(&record[..record.len() - 128]),
            Err(BlockError::Truncated { .. })
        ));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            #[test]
            fn records_decode_to_input(
                data in prop::collection::vec(any::<u8>(), 0..40_000),
                level in 0u32..=9
            ) {
                let record = encode_stored_file(&data, level)
                    .map_err(|e| TestCaseError::fail(e.to_string()))?;
                prop_assert_eq!(record.len() % 128, 0);
                let decoded = decode_stored_file(&record)
                    .map_err(|e| TestCaseError::fail(e.to_string()))?;
                prop_assert_eq!(decoded, data);
            }
        }
    }
}
