//! 1024-byte index header following the container header

use super::error::{IndexError, IndexResult};
use binrw::{BinRead, BinWrite};
use sqpack_hash::{DIGEST_FIELD_SIZE, seal_header};
use std::io::Cursor;

/// Size of the index header, including its trailing digest
pub const INDEX_HEADER_SIZE: usize = 1024;

const FORMAT_VERSION: u32 = 1;

/// Offset/size/digest triple describing one table region
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
pub struct SideTable {
    /// Region offset from the start of the file
    pub offset: u32,
    /// Region size in bytes
    pub size: u32,
    /// SHA-1 of the region, zero padded
    pub digest: [u8; DIGEST_FIELD_SIZE],
}

impl SideTable {
    /// Zero-length region placed at `offset`
    pub const fn empty_at(offset: u32) -> Self {
        Self {
            offset,
            size: 0,
            digest: [0u8; DIGEST_FIELD_SIZE],
        }
    }
}

/// Index header describing where the hash table lives
///
/// The synonym, empty-block and directory tables are always written as
/// zero-length regions and ignored on read.
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct IndexHeader {
    /// Header size (always 1024)
    pub header_size: u32,
    /// Format version
    pub format_version: u32,
    /// Hash table offset from the start of the file
    pub table_offset: u32,
    /// Hash table size in bytes
    pub table_size: u32,
    /// SHA-1 of the hash table bytes, zero padded
    pub table_digest: [u8; DIGEST_FIELD_SIZE],
    /// Number of `.datN` files in the set
    pub data_file_count: u32,
    /// Synonym (collision) table
    pub synonyms: SideTable,
    /// Empty block table
    pub empty_blocks: SideTable,
    /// Directory index table
    pub directories: SideTable,
}

impl IndexHeader {
    /// Create a header for a table stored at `table_offset`
    pub fn new(
        table_offset: u32,
        table_size: u32,
        table_digest: [u8; DIGEST_FIELD_SIZE],
        data_file_count: u32,
    ) -> Self {
        let side_offset = table_offset + table_size;
        Self {
            header_size: INDEX_HEADER_SIZE as u32,
            format_version: FORMAT_VERSION,
            table_offset,
            table_size,
            table_digest,
            data_file_count,
            synonyms: SideTable::empty_at(side_offset),
            empty_blocks: SideTable::empty_at(side_offset),
            directories: SideTable::empty_at(side_offset),
        }
    }

    /// Parse from the bytes directly after the container header
    pub fn from_bytes(data: &[u8]) -> IndexResult<Self> {
        if data.len() < INDEX_HEADER_SIZE {
            return Err(IndexError::InvalidHeader(format!(
                "need {INDEX_HEADER_SIZE} bytes, got {}",
                data.len()
            )));
        }
        let header = Self::read(&mut Cursor::new(&data[..INDEX_HEADER_SIZE]))?;
        if header.header_size as usize != INDEX_HEADER_SIZE {
            return Err(IndexError::InvalidHeader(format!(
                "unexpected header size {}",
                header.header_size
            )));
        }
        Ok(header)
    }

    /// Serialize to a sealed 1024-byte block
    pub fn to_bytes(&self) -> IndexResult<[u8; INDEX_HEADER_SIZE]> {
        let mut buf = [0u8; INDEX_HEADER_SIZE];
        self.write(&mut Cursor::new(&mut buf[..]))?;
        seal_header(&mut buf);
        Ok(buf)
    }
}
