//! File-info header at the start of every stored-file record

use binrw::io::{Read, Seek, Write};
use binrw::{BinRead, BinResult, BinWrite};

use super::error::{BlockError, BlockResult};
use crate::index::STORED_FILE_ALIGNMENT;

/// Offset of the first chunk-info entry
pub const CHUNK_TABLE_OFFSET: usize = 0x18;

/// Size of one chunk-info entry
pub const CHUNK_INFO_SIZE: usize = 8;

/// Payload kind of a stored file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum StoredFileKind {
    /// Placeholder with no payload
    Empty = 1,
    /// Generic chunked payload
    Standard = 2,
    /// Model payload (not handled)
    Model = 3,
    /// Texture payload (not handled)
    Texture = 4,
}

impl TryFrom<u32> for StoredFileKind {
    type Error = BlockError;

    fn try_from(value: u32) -> BlockResult<Self> {
        match value {
            1 => Ok(Self::Empty),
            2 => Ok(Self::Standard),
            3 => Ok(Self::Model),
            4 => Ok(Self::Texture),
            other => Err(BlockError::InvalidKind(other)),
        }
    }
}

/// One entry of the chunk table
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(big)]
pub struct ChunkInfo {
    /// Chunk start, relative to the end of the file-info header
    pub relative_offset: u32,
    /// Padded on-disk size of the chunk (header + data + padding)
    pub compressed_size: u16,
    /// Bytes the chunk inflates to
    pub uncompressed_size: u16,
}

/// File-info header
///
/// | Offset | Size | Field |
/// |--------|------|-------|
/// | 0x00   | 4    | Header size (multiple of 128) |
/// | 0x04   | 4    | Kind |
/// | 0x08   | 4    | Raw size |
/// | 0x0C   | 4    | Chunk count |
/// | 0x10   | 4    | 128-byte blocks used by chunk bodies |
/// | 0x14   | 4    | Chunk count (repeated) |
/// | 0x18   | 8*n  | Chunk table |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfoHeader {
    /// Header size including the chunk table and padding
    pub header_size: u32,
    /// Raw kind value
    pub kind: u32,
    /// Size of the decoded file
    pub raw_size: u32,
    /// 128-byte blocks occupied by the chunk bodies
    pub used_blocks: u32,
    /// Chunk table
    pub chunks: Vec<ChunkInfo>,
}

impl BinRead for FileInfoHeader {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let header_size = u32::read_options(reader, endian, ())?;
        let kind = u32::read_options(reader, endian, ())?;
        let raw_size = u32::read_options(reader, endian, ())?;
        let chunk_count = u32::read_options(reader, endian, ())?;
        let used_blocks = u32::read_options(reader, endian, ())?;
        // Repeated chunk count, not used
        let _ = u32::read_options(reader, endian, ())?;

        let table_end = CHUNK_TABLE_OFFSET as u64 + u64::from(chunk_count) * CHUNK_INFO_SIZE as u64;
        if table_end > u64::from(header_size) {
            return Err(binrw::Error::Custom {
                pos: 0x0C,
                err: Box::new(BlockError::InvalidHeader(format!(
                    "{chunk_count} chunks do not fit a {header_size}-byte header"
                ))),
            });
        }

        let mut chunks = Vec::with_capacity(chunk_count as usize);
        for _ in 0..chunk_count {
            chunks.push(ChunkInfo::read_options(reader, endian, ())?);
        }

        Ok(Self {
            header_size,
            kind,
            raw_size,
            used_blocks,
            chunks,
        })
    }
}

impl BinWrite for FileInfoHeader {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<()> {
        let chunk_count = self.chunks.len() as u32;
        self.header_size.write_options(writer, endian, ())?;
        self.kind.write_options(writer, endian, ())?;
        self.raw_size.write_options(writer, endian, ())?;
        chunk_count.write_options(writer, endian, ())?;
        self.used_blocks.write_options(writer, endian, ())?;
        chunk_count.write_options(writer, endian, ())?;
        for chunk in &self.chunks {
            chunk.write_options(writer, endian, ())?;
        }

        let written = CHUNK_TABLE_OFFSET + self.chunks.len() * CHUNK_INFO_SIZE;
        let padding = (self.header_size as usize).saturating_sub(written);
        writer.write_all(&vec![0u8; padding])?;
        Ok(())
    }
}

impl FileInfoHeader {
    /// Header for a standard file with the given chunk table
    pub fn standard(raw_size: u32, chunks: Vec<ChunkInfo>) -> Self {
        let header_size = Self::size_for(chunks.len()) as u32;
        let body: usize = chunks.iter().map(|c| usize::from(c.compressed_size)).sum();
        Self {
            header_size,
            kind: StoredFileKind::Standard as u32,
            raw_size,
            used_blocks: (body / STORED_FILE_ALIGNMENT as usize) as u32,
            chunks,
        }
    }

    /// Header size needed for `chunk_count` chunks
    pub const fn size_for(chunk_count: usize) -> usize {
        (CHUNK_TABLE_OFFSET + chunk_count * CHUNK_INFO_SIZE)
            .next_multiple_of(STORED_FILE_ALIGNMENT as usize)
    }

    /// Decoded kind
    pub fn kind(&self) -> BlockResult<StoredFileKind> {
        StoredFileKind::try_from(self.kind)
    }

    /// Read only the leading header-size field
    pub fn peek_header_size(data: &[u8]) -> BlockResult<u32> {
        let bytes: [u8; 4] = data
            .get(..4)
            .and_then(|b| b.try_into().ok())
            .ok_or(BlockError::Truncated {
                expected: 4,
                actual: data.len(),
            })?;
        Ok(u32::from_be_bytes(bytes))
    }

    /// Parse from the start of a record
    pub fn from_bytes(data: &[u8]) -> BlockResult<Self> {
        let header_size = Self::peek_header_size(data)? as usize;
        if data.len() < header_size {
            return Err(BlockError::Truncated {
                expected: header_size,
                actual: data.len(),
            });
        }
        let mut cursor = binrw::io::Cursor::new(&data[..header_size]);
        Self::read_be(&mut cursor).map_err(|e| match e {
            binrw::Error::Custom { err, .. } => match err.downcast::<BlockError>() {
                Ok(block) => *block,
                Err(other) => BlockError::InvalidHeader(format!("{other:?}")),
            },
            binrw::Error::Io(io) if io.kind() == std::io::ErrorKind::UnexpectedEof => {
                BlockError::InvalidHeader(format!("header of {header_size} bytes is too short"))
            }
            other => BlockError::BinRw(other),
        })
    }

    /// Serialize, padded to `header_size`
    pub fn to_bytes(&self) -> BlockResult<Vec<u8>> {
        let mut cursor = binrw::io::Cursor::new(Vec::with_capacity(self.header_size as usize));
        self.write_be(&mut cursor)?;
        Ok(cursor.into_inner())
    }

    /// Total record length: header plus the furthest chunk end
    pub fn record_size(&self) -> usize {
        let body = self
            .chunks
            .iter()
            .map(|c| c.relative_offset as usize + usize::from(c.compressed_size))
            .max()
            .unwrap_or(0);
        self.header_size as usize + body
    }
}
