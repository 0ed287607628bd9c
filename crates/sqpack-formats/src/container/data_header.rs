//! 1024-byte data header following the container header of a `.datN` file

use super::error::{ContainerError, ContainerResult};
use binrw::{BinRead, BinWrite};
use sqpack_hash::{DIGEST_FIELD_SIZE, seal_header};
use std::io::Cursor;

/// Size of the data header, including its trailing digest
pub const DATA_HEADER_SIZE: usize = 1024;

/// Largest size a single data file may grow to
pub const MAX_DATA_FILE_SIZE: u64 = 2_000_000_000;

const FORMAT_VERSION: u32 = 1;
const DATA_MARKER: u32 = 0x10;

/// Payload description written when a data file is finalized
///
/// | Offset | Size | Field |
/// |--------|------|-------|
/// | 0x00   | 4    | Header size (1024) |
/// | 0x04   | 4    | Format version (1) |
/// | 0x08   | 4    | Marker (0x10) |
/// | 0x0C   | 8    | Payload size in bytes |
/// | 0x14   | 4    | Spanned file number (data file id + 1) |
/// | 0x18   | 4    | Reserved |
/// | 0x1C   | 8    | Maximum file size |
/// | 0x24   | 64   | SHA-1 of the payload |
/// | 0x3C0  | 64   | SHA-1 of bytes 0x000..0x3C0 |
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct DataHeader {
    /// Header size (always 1024)
    pub header_size: u32,
    /// Format version
    pub format_version: u32,
    /// Constant marker
    pub marker: u32,
    /// Number of payload bytes after the 2048-byte preamble
    pub data_size: u64,
    /// Data file id + 1
    #[brw(pad_after = 4)]
    pub spanned_file: u32,
    /// Roll-over limit the file was written with
    pub max_file_size: u64,
    /// SHA-1 of the payload, zero padded
    pub data_digest: [u8; DIGEST_FIELD_SIZE],
}

impl DataHeader {
    /// Create a header describing a finalized payload
    pub fn new(data_file_id: u8, data_size: u64, data_digest: [u8; DIGEST_FIELD_SIZE]) -> Self {
        Self {
            header_size: DATA_HEADER_SIZE as u32,
            format_version: FORMAT_VERSION,
            marker: DATA_MARKER,
            data_size,
            spanned_file: u32::from(data_file_id) + 1,
            max_file_size: MAX_DATA_FILE_SIZE,
            data_digest,
        }
    }

    /// Placeholder written when a data file is created
    pub fn placeholder(data_file_id: u8) -> Self {
        Self::new(data_file_id, 0, [0u8; DIGEST_FIELD_SIZE])
    }

    /// Parse from the bytes directly after the container header
    pub fn from_bytes(data: &[u8]) -> ContainerResult<Self> {
        if data.len() < DATA_HEADER_SIZE {
            return Err(ContainerError::Truncated {
                expected: DATA_HEADER_SIZE,
                actual: data.len(),
            });
        }
        Ok(Self::read(&mut Cursor::new(&data[..DATA_HEADER_SIZE]))?)
    }

    /// Serialize to a sealed 1024-byte block
    pub fn to_bytes(&self) -> ContainerResult<[u8; DATA_HEADER_SIZE]> {
        let mut buf = [0u8; DATA_HEADER_SIZE];
        self.write(&mut Cursor::new(&mut buf[..]))?;
        seal_header(&mut buf);
        Ok(buf)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use sqpack_hash::sha1_field;

    #[test]
    fn test_data_header_layout() {
        let digest = sha1_field(b"payload");
        let header = DataHeader::new(2, 0x1234_5678_9A, digest);
        let bytes = header.to_bytes().expect("serialize");

        assert_eq!(u32::from_le_bytes(bytes[0x00..0x04].try_into().unwrap()), 1024);
        assert_eq!(u32::from_le_bytes(bytes[0x08..0x0C].try_into().unwrap()), 0x10);
        assert_eq!(
            u64::from_le_bytes(bytes[0x0C..0x14].try_into().unwrap()),
            0x1234_5678_9A
        );
        assert_eq!(u32::from_le_bytes(bytes[0x14..0x18].try_into().unwrap()), 3);
        assert_eq!(
            u64::from_le_bytes(bytes[0x1C..0x24].try_into().unwrap()),
            MAX_DATA_FILE_SIZE
        );
        assert_eq!(&bytes[0x24..0x64], &digest[..]);
        assert_eq!(bytes[960..], sha1_field(&bytes[..960])[..]);

        assert_eq!(DataHeader::from_bytes(&bytes).expect("parse"), header);
    }

    #[test]
    fn test_placeholder_is_empty() {
        let header = DataHeader::placeholder(0);
        assert_eq!(header.data_size, 0);
        assert_eq!(header.spanned_file, 1);
        assert!(header.data_digest.iter().all(|&b| b == 0));
    }
}
