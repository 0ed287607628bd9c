//! Column types and definitions

use binrw::{BinRead, BinWrite};

use super::error::{SheetError, SheetResult};

/// Data type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ColumnType {
    /// 32-bit offset into the row's string tail
    String = 0x00,
    /// One byte, true iff 1
    Bool = 0x01,
    /// Signed 8-bit
    Int8 = 0x02,
    /// Unsigned 8-bit
    UInt8 = 0x03,
    /// Signed 16-bit
    Int16 = 0x04,
    /// Unsigned 16-bit
    UInt16 = 0x05,
    /// Signed 32-bit
    Int32 = 0x06,
    /// Unsigned 32-bit
    UInt32 = 0x07,
    /// IEEE 754 single precision
    Float32 = 0x09,
    /// Signed 64-bit
    Int64 = 0x0A,
    /// Unsigned 64-bit
    UInt64 = 0x0B,
    /// Bit 0 of a shared byte
    PackedBool0 = 0x19,
    /// Bit 1 of a shared byte
    PackedBool1 = 0x1A,
    /// Bit 2 of a shared byte
    PackedBool2 = 0x1B,
    /// Bit 3 of a shared byte
    PackedBool3 = 0x1C,
    /// Bit 4 of a shared byte
    PackedBool4 = 0x1D,
    /// Bit 5 of a shared byte
    PackedBool5 = 0x1E,
    /// Bit 6 of a shared byte
    PackedBool6 = 0x1F,
    /// Bit 7 of a shared byte
    PackedBool7 = 0x20,
}

impl TryFrom<u16> for ColumnType {
    type Error = SheetError;

    fn try_from(value: u16) -> SheetResult<Self> {
        Ok(match value {
            0x00 => Self::String,
            0x01 => Self::Bool,
            0x02 => Self::Int8,
            0x03 => Self::UInt8,
            0x04 => Self::Int16,
            0x05 => Self::UInt16,
            0x06 => Self::Int32,
            0x07 => Self::UInt32,
            0x09 => Self::Float32,
            0x0A => Self::Int64,
            0x0B => Self::UInt64,
            0x19 => Self::PackedBool0,
            0x1A => Self::PackedBool1,
            0x1B => Self::PackedBool2,
            0x1C => Self::PackedBool3,
            0x1D => Self::PackedBool4,
            0x1E => Self::PackedBool5,
            0x1F => Self::PackedBool6,
            0x20 => Self::PackedBool7,
            other => return Err(SheetError::InvalidColumnType(other)),
        })
    }
}

impl ColumnType {
    /// Packed-bool column for `bit` (0-7)
    pub fn packed_bool(bit: u8) -> SheetResult<Self> {
        let raw = Self::PackedBool0 as u16 + u16::from(bit);
        if bit >= 8 {
            return Err(SheetError::InvalidColumnType(raw));
        }
        Self::try_from(raw)
    }

    /// Bit tested by a packed-bool column
    pub const fn packed_bit(self) -> Option<u8> {
        match self {
            Self::PackedBool0
            | Self::PackedBool1
            | Self::PackedBool2
            | Self::PackedBool3
            | Self::PackedBool4
            | Self::PackedBool5
            | Self::PackedBool6
            | Self::PackedBool7 => Some((self as u16 - Self::PackedBool0 as u16) as u8),
            _ => None,
        }
    }

    /// Bytes the column occupies in the fixed region
    pub const fn size(self) -> usize {
        match self {
            Self::Int16 | Self::UInt16 => 2,
            Self::String | Self::Int32 | Self::UInt32 | Self::Float32 => 4,
            Self::Int64 | Self::UInt64 => 8,
            // Bool, 8-bit integers and the shared packed-bool byte
            _ => 1,
        }
    }
}

/// Column type and byte offset inside the fixed row region
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(big)]
pub struct ColumnDefinition {
    /// Data type
    #[br(try_map = |raw: u16| ColumnType::try_from(raw))]
    #[bw(map = |kind: &ColumnType| *kind as u16)]
    pub kind: ColumnType,
    /// Offset from the start of the fixed region
    pub offset: u16,
}

impl ColumnDefinition {
    /// Create a column definition
    pub const fn new(kind: ColumnType, offset: u16) -> Self {
        Self { kind, offset }
    }

    /// Byte range inside a region of `row_data_size` bytes
    pub fn range(&self, row_data_size: u16) -> SheetResult<std::ops::Range<usize>> {
        let start = usize::from(self.offset);
        let end = start + self.kind.size();
        if end > usize::from(row_data_size) {
            return Err(SheetError::ColumnOutOfBounds {
                offset: self.offset,
                size: self.kind.size(),
                row_data_size,
            });
        }
        Ok(start..end)
    }
}
