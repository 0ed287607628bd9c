//! Complete `.index` / `.index2` file

use super::error::{IndexError, IndexResult};
use super::header::{INDEX_HEADER_SIZE, IndexHeader};
use super::table::{IndexKind, IndexTable};
use crate::container::{
    BuildStamp, CONTAINER_HEADER_SIZE, ContainerHeader, FileKind, PREAMBLE_SIZE, Platform,
};
use sqpack_hash::sha1_field;

/// Parsed or to-be-written index file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexFile {
    /// Container header
    pub container: ContainerHeader,
    /// Index header
    pub header: IndexHeader,
    /// Hash table
    pub table: IndexTable,
}

impl IndexFile {
    /// Assemble an index file around `table`
    ///
    /// The index header is filled in by [`to_bytes`](Self::to_bytes); the
    /// one stored here only carries the data file count until then.
    pub fn new(
        table: IndexTable,
        data_file_count: u32,
        platform: Platform,
        stamp: BuildStamp,
    ) -> Self {
        Self {
            container: ContainerHeader::new(FileKind::Index, platform, stamp),
            header: IndexHeader::new(PREAMBLE_SIZE as u32, 0, [0u8; 64], data_file_count),
            table,
        }
    }

    /// Table kind
    pub const fn kind(&self) -> IndexKind {
        self.table.kind()
    }

    /// Parse a whole index file
    ///
    /// Side tables are ignored. Entries are read from the region the header
    /// describes, which must lie inside `data`.
    pub fn parse(data: &[u8], kind: IndexKind) -> IndexResult<Self> {
        let container = ContainerHeader::from_bytes_expecting(data, FileKind::Index)?;
        let header = IndexHeader::from_bytes(&data[CONTAINER_HEADER_SIZE..])?;

        let start = header.table_offset as usize;
        let end = start
            .checked_add(header.table_size as usize)
            .filter(|&end| end <= data.len())
            .ok_or_else(|| {
                IndexError::InvalidHeader(format!(
                    "table {}+{} exceeds file size {}",
                    header.table_offset,
                    header.table_size,
                    data.len()
                ))
            })?;
        if start < CONTAINER_HEADER_SIZE + INDEX_HEADER_SIZE {
            return Err(IndexError::InvalidHeader(format!(
                "table offset {start} overlaps the headers"
            )));
        }

        let table = IndexTable::parse(kind, &data[start..end])?;
        Ok(Self {
            container,
            header,
            table,
        })
    }

    /// Serialize the file, recomputing the table size and digest
    pub fn to_bytes(&self) -> IndexResult<Vec<u8>> {
        let table = self.table.build()?;
        let table_size = u32::try_from(table.len()).map_err(|_| {
            IndexError::InvalidHeader(format!("table of {} bytes is too large", table.len()))
        })?;
        let header = IndexHeader::new(
            PREAMBLE_SIZE as u32,
            table_size,
            sha1_field(&table),
            self.header.data_file_count,
        );

        let mut out = Vec::with_capacity(PREAMBLE_SIZE + table.len());
        out.extend_from_slice(&self.container.to_bytes()?);
        out.extend_from_slice(&header.to_bytes()?);
        out.extend_from_slice(&table);
        Ok(out)
    }
}
