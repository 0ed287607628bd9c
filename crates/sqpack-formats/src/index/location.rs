//! Packed 32-bit location word shared by both hash tables
//!
//! ```text
//!  31                               4   3   2   1   0
//! +----------------------------------+---+-------+---+
//! |          offset / 128            | - |  dat  | S |
//! +----------------------------------+---+-------+---+
//! ```
//!
//! - `S`: synonym flag (collision list, always written as 0)
//! - `dat`: data file id, extracted as `(word % 8) >> 1`
//! - offset: `(word & !0xF) * 8`
//!
//! Only two bits carry the data file id; bit 3 is never read back.

use super::error::{IndexError, IndexResult};
use std::fmt;

/// Stored files start on this boundary inside a data file
pub const STORED_FILE_ALIGNMENT: u64 = 128;

/// Highest data file id the packed word can express
pub const MAX_DATA_FILE_ID: u8 = 3;

/// Physical location of a stored file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    /// Which `.datN` file holds the record
    pub data_file_id: u8,
    /// Byte offset of the record inside that file
    pub offset: u64,
}

impl Location {
    /// Create a location
    pub const fn new(data_file_id: u8, offset: u64) -> Self {
        Self {
            data_file_id,
            offset,
        }
    }

    /// Pack into the on-disk word
    pub fn pack(self) -> IndexResult<PackedLocation> {
        if self.data_file_id > MAX_DATA_FILE_ID {
            return Err(IndexError::DataFileIdOutOfRange(self.data_file_id));
        }
        if self.offset % STORED_FILE_ALIGNMENT != 0 {
            return Err(IndexError::UnalignedOffset(self.offset));
        }
        let scaled = u32::try_from(self.offset / 8)
            .map_err(|_| IndexError::OffsetOutOfRange(self.offset))?;

        Ok(PackedLocation(scaled | (u32::from(self.data_file_id) << 1)))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dat{}@{:#x}", self.data_file_id, self.offset)
    }
}

/// Location word as stored in a table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackedLocation(pub u32);

impl PackedLocation {
    /// Raw word
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Synonym flag (bit 0)
    pub const fn is_synonym(self) -> bool {
        self.0 & 1 == 1
    }

    /// Data file id (bits 1-2)
    pub const fn data_file_id(self) -> u8 {
        ((self.0 % 8) >> 1) as u8
    }

    /// Byte offset inside the data file
    pub const fn offset(self) -> u64 {
        (self.0 & !0xF) as u64 * 8
    }

    /// Decode to a [`Location`]
    pub const fn location(self) -> Location {
        Location::new(self.data_file_id(), self.offset())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_known_word() {
        let packed = Location::new(1, 0x800).pack().expect("pack");
        assert_eq!(packed.raw(), 0x100 | 0b010);
        assert_eq!(packed.location(), Location::new(1, 0x800));
        assert!(!packed.is_synonym());
    }

    #[test]
    fn test_decode_masks_like_the_reader() {
        // Bit 3 set: not part of the data file id, dropped by `& !0xF`
        let word = PackedLocation(0x0000_1000 | 0b1110);
        assert_eq!(word.data_file_id(), 3);
        assert_eq!(word.offset(), 0x1000 * 8);

        let synonym = PackedLocation(0x0000_1001);
        assert!(synonym.is_synonym());
        assert_eq!(synonym.data_file_id(), 0);
    }

    #[test]
    fn test_unaligned_offset_rejected() {
        assert!(matches!(
            Location::new(0, 2049).pack(),
            Err(IndexError::UnalignedOffset(2049))
        ));
        assert!(matches!(
            Location::new(0, 64).pack(),
            Err(IndexError::UnalignedOffset(64))
        ));
    }

    #[test]
    fn test_data_file_id_limit() {
        assert!(Location::new(3, 0).pack().is_ok());
        assert!(matches!(
            Location::new(4, 0).pack(),
            Err(IndexError::DataFileIdOutOfRange(4))
        ));
    }

    #[test]
    fn test_offset_range_limit() {
        let max = (u64::from(u32::MAX) & !0xF) * 8;
        let packed = Location::new(2, max).pack().expect("largest offset");
        assert_eq!(packed.offset(), max);
        assert!(matches!(
            Location::new(0, max + 128).pack(),
            Err(IndexError::OffsetOutOfRange(_))
        ));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn aligned_locations_round_trip(
                data_file_id in 0u8..=MAX_DATA_FILE_ID,
                block in 0u64..(1u64 << 28)
            ) {
                let location = Location::new(data_file_id, block * STORED_FILE_ALIGNMENT);
                let packed = location.pack().map_err(|e| TestCaseError::fail(e.to_string()))?;
                prop_assert_eq!(packed.location(), location);
                prop_assert!(!packed.is_synonym());
            }
        }
    }
}
