//! 1024-byte container header

use super::error::{ContainerError, ContainerResult};
use binrw::{BinRead, BinWrite};
use chrono::{Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};
use sqpack_hash::seal_header;
use std::io::Cursor;

/// Container magic bytes
pub const SQPACK_MAGIC: [u8; 8] = *b"SqPack\0\0";

/// Size of the container header, including its trailing digest
pub const CONTAINER_HEADER_SIZE: usize = 1024;

const FORMAT_VERSION: u32 = 1;

/// Kind of file a container header introduces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum FileKind {
    /// `.datN` data file
    Data = 1,
    /// `.index` or `.index2` file
    Index = 2,
}

impl TryFrom<u32> for FileKind {
    type Error = ContainerError;

    fn try_from(value: u32) -> ContainerResult<Self> {
        match value {
            1 => Ok(Self::Data),
            2 => Ok(Self::Index),
            other => Err(ContainerError::InvalidFileKind(other)),
        }
    }
}

/// Platform id stored in byte 8 of the header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Platform {
    /// Windows builds
    #[default]
    Win32 = 0,
    /// PlayStation 3 builds
    Ps3 = 1,
    /// PlayStation 4 builds
    Ps4 = 2,
}

impl TryFrom<u8> for Platform {
    type Error = ContainerError;

    fn try_from(value: u8) -> ContainerResult<Self> {
        match value {
            0 => Ok(Self::Win32),
            1 => Ok(Self::Ps3),
            2 => Ok(Self::Ps4),
            other => Err(ContainerError::InvalidPlatform(other)),
        }
    }
}

/// Build date (`yyyymmdd`) and time (`hhmmss00`) written into headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStamp {
    /// Date as decimal `yyyymmdd`
    pub date: u32,
    /// Time as decimal `hhmmss00`
    pub time: u32,
}

impl BuildStamp {
    /// Create from raw decimal values
    pub const fn new(date: u32, time: u32) -> Self {
        Self { date, time }
    }

    /// Stamp for the current UTC time
    pub fn now() -> Self {
        let now = Utc::now();
        let date = now.year().unsigned_abs() * 10_000 + now.month() * 100 + now.day();
        let time = now.hour() * 1_000_000 + now.minute() * 10_000 + now.second() * 100;
        Self { date, time }
    }
}

/// Container header at offset 0 of every file in the set
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct ContainerHeader {
    /// Magic bytes (always `SqPack\0\0`)
    pub magic: [u8; 8],
    /// Raw platform id
    #[brw(pad_after = 3)]
    pub platform: u8,
    /// Header size (always 1024)
    pub header_size: u32,
    /// Format version (always 1)
    pub format_version: u32,
    /// Raw file kind
    pub file_kind: u32,
    /// Build date, `yyyymmdd`
    pub build_date: u32,
    /// Build time, `hhmmss00`
    pub build_time: u32,
}

impl ContainerHeader {
    /// Create a header for a new file
    pub fn new(kind: FileKind, platform: Platform, stamp: BuildStamp) -> Self {
        Self {
            magic: SQPACK_MAGIC,
            platform: platform as u8,
            header_size: CONTAINER_HEADER_SIZE as u32,
            format_version: FORMAT_VERSION,
            file_kind: kind as u32,
            build_date: stamp.date,
            build_time: stamp.time,
        }
    }

    /// Decoded file kind
    pub fn kind(&self) -> ContainerResult<FileKind> {
        FileKind::try_from(self.file_kind)
    }

    /// Decoded platform
    pub fn platform(&self) -> ContainerResult<Platform> {
        Platform::try_from(self.platform)
    }

    /// Build stamp recorded in the header
    pub const fn stamp(&self) -> BuildStamp {
        BuildStamp::new(self.build_date, self.build_time)
    }

    /// Parse a header from the start of `data`
    ///
    /// Only the magic and the file kind are validated. The trailing digest is
    /// not checked.
    pub fn from_bytes(data: &[u8]) -> ContainerResult<Self> {
        if data.len() < CONTAINER_HEADER_SIZE {
            return Err(ContainerError::Truncated {
                expected: CONTAINER_HEADER_SIZE,
                actual: data.len(),
            });
        }

        let mut magic = [0u8; 8];
        magic.copy_from_slice(&data[..8]);
        if magic != SQPACK_MAGIC {
            return Err(ContainerError::InvalidMagic(magic));
        }

        let header = Self::read(&mut Cursor::new(&data[..CONTAINER_HEADER_SIZE]))?;
        header.kind()?;
        Ok(header)
    }

    /// Parse a header and require a specific file kind
    pub fn from_bytes_expecting(data: &[u8], expected: FileKind) -> ContainerResult<Self> {
        let header = Self::from_bytes(data)?;
        let actual = header.kind()?;
        if actual != expected {
            return Err(ContainerError::UnexpectedFileKind { expected, actual });
        }
        Ok(header)
    }

    /// Serialize to a sealed 1024-byte block
    pub fn to_bytes(&self) -> ContainerResult<[u8; CONTAINER_HEADER_SIZE]> {
        let mut buf = [0u8; CONTAINER_HEADER_SIZE];
        self.write(&mut Cursor::new(&mut buf[..]))?;
        seal_header(&mut buf);
        Ok(buf)
    }
}

impl crate::SqPackFormat for ContainerHeader {
    fn parse(data: &[u8]) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self::from_bytes(data)?)
    }

    fn build(&self) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        Ok(self.to_bytes()?.to_vec())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::SqPackFormat;
    use sqpack_hash::sha1_field;

    fn stamp() -> BuildStamp {
        BuildStamp::new(2024_01_31, 12_34_56_00)
    }

    #[test]
    fn test_header_layout() {
        let header = ContainerHeader::new(FileKind::Index, Platform::Win32, stamp());
        let bytes = header.to_bytes().expect("serialize");

        assert_eq!(&bytes[..8], b"SqPack\0\0");
        assert_eq!(bytes[8], 0);
        assert_eq!(&bytes[9..12], &[0, 0, 0]);
        assert_eq!(u32::from_le_bytes(bytes[0x0C..0x10].try_into().unwrap()), 1024);
        assert_eq!(u32::from_le_bytes(bytes[0x10..0x14].try_into().unwrap()), 1);
        assert_eq!(u32::from_le_bytes(bytes[0x14..0x18].try_into().unwrap()), 2);
        assert_eq!(
            u32::from_le_bytes(bytes[0x18..0x1C].try_into().unwrap()),
            2024_01_31
        );
        assert_eq!(
            u32::from_le_bytes(bytes[0x1C..0x20].try_into().unwrap()),
            12_34_56_00
        );
        assert!(bytes[0x20..960].iter().all(|&b| b == 0));
        assert_eq!(bytes[960..], sha1_field(&bytes[..960])[..]);
    }

    #[test]
    fn test_header_round_trip() {
        let header = ContainerHeader::new(FileKind::Data, Platform::Ps4, stamp());
        crate::test_utils::test_build_parse(&header).expect("round trip");

        let built = header.build().expect("build");
        ContainerHeader::verify_round_trip(&built).expect("byte-identical");

        let parsed = ContainerHeader::from_bytes(&built).expect("parse");
        assert_eq!(parsed.kind().expect("kind"), FileKind::Data);
        assert_eq!(parsed.platform().expect("platform"), Platform::Ps4);
        assert_eq!(parsed.stamp(), stamp());
    }

    #[test]
    fn test_bad_magic_rejected() {
        let mut bytes = ContainerHeader::new(FileKind::Index, Platform::Win32, stamp())
            .to_bytes()
            .expect("serialize");
        bytes[0] = b'X';
        assert!(matches!(
            ContainerHeader::from_bytes(&bytes),
            Err(ContainerError::InvalidMagic(_))
        ));
    }

    #[test]
    fn test_digest_not_verified_on_read() {
        let mut bytes = ContainerHeader::new(FileKind::Index, Platform::Win32, stamp())
            .to_bytes()
            .expect("serialize");
        bytes[1000] ^= 0xFF;
        assert!(ContainerHeader::from_bytes(&bytes).is_ok());
    }

    #[test]
    fn test_truncated_header_rejected() {
        let bytes = [0u8; 100];
        assert!(matches!(
            ContainerHeader::from_bytes(&bytes),
            Err(ContainerError::Truncated {
                expected: 1024,
                actual: 100
            })
        ));
    }

    #[test]
    fn test_unexpected_kind_rejected() {
        let bytes = ContainerHeader::new(FileKind::Data, Platform::Win32, stamp())
            .to_bytes()
            .expect("serialize");
        assert!(matches!(
            ContainerHeader::from_bytes_expecting(&bytes, FileKind::Index),
            Err(ContainerError::UnexpectedFileKind { .. })
        ));
    }

    #[test]
    fn test_build_stamp_now_is_plausible() {
        let stamp = BuildStamp::now();
        assert!(stamp.date > 2020_00_00);
        assert_eq!(stamp.time % 100, 0);
    }
}
